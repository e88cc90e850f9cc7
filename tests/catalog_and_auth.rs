mod common;

use common::{admin, create_category, customer, fixed_now, test_state};
use storefront_api::{
    config::AdminSeed,
    dto::{
        auth::{LoginRequest, RegisterRequest},
        catalog::{CreateCategoryRequest, ProductRequest},
    },
    error::AppError,
    models::Role,
    services::{admin_service, auth_service, catalog_service},
};
use uuid::Uuid;

fn product(name: &str, category_id: Uuid, is_active: bool) -> ProductRequest {
    ProductRequest {
        name: name.into(),
        description: Some("Stoneware".into()),
        price: 1250,
        stock_qty: 7,
        image_url: None,
        category_id,
        is_active,
    }
}

fn register(email: &str, password: &str) -> RegisterRequest {
    RegisterRequest {
        email: email.into(),
        password: password.into(),
        display_name: None,
    }
}

#[tokio::test]
async fn register_then_login_issues_a_verifiable_token() -> anyhow::Result<()> {
    let state = test_state().await?;

    let registered = auth_service::register_user(&state, register("  Ada@Example.com ", "s3cret!"))
        .await?
        .data
        .unwrap();
    assert_eq!(registered.email, "ada@example.com");

    let err = auth_service::register_user(&state, register("ADA@example.com", "other"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(ref m) if m == "Email is already registered."));

    let token = auth_service::login_user(
        &state,
        LoginRequest {
            email: "ada@example.com".into(),
            password: "s3cret!".into(),
        },
    )
    .await?
    .data
    .unwrap()
    .token;

    let claims = state.tokens.verify(&token)?;
    assert_eq!(claims.user_id, registered.id);
    assert_eq!(claims.role, Role::User);
    Ok(())
}

#[tokio::test]
async fn bad_credentials_are_unauthorized() -> anyhow::Result<()> {
    let state = test_state().await?;
    auth_service::register_user(&state, register("ada@example.com", "s3cret!")).await?;

    for (email, password) in [("ada@example.com", "wrong"), ("nobody@example.com", "s3cret!")] {
        let err = auth_service::login_user(
            &state,
            LoginRequest {
                email: email.into(),
                password: password.into(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(ref m) if m == "Invalid credentials."));
    }

    let err = auth_service::register_user(&state, register("   ", "pw"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(ref m) if m == "Email and password are required."));
    Ok(())
}

#[tokio::test]
async fn admins_manage_roles_and_see_stats() -> anyhow::Result<()> {
    let state = test_state().await?;
    let boss = admin(&state).await?;
    let user = customer(&state).await?;

    let err = admin_service::set_role(&state, &user, user.user_id, "Admin")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden));

    let err = admin_service::set_role(&state, &boss, user.user_id, "Owner")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let err = admin_service::set_role(&state, &boss, Uuid::new_v4(), "Admin")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound));

    let promoted = admin_service::set_role(&state, &boss, user.user_id, "Admin")
        .await?
        .data
        .unwrap();
    assert_eq!(promoted.role, Role::Admin);

    let users = admin_service::list_users(&state, &boss).await?.data.unwrap().items;
    assert_eq!(users.len(), 2);
    assert!(users.iter().all(|u| u.role == Role::Admin));

    let stats = admin_service::admin_stats(&state, &boss).await?.data.unwrap();
    assert_eq!(stats.total_accounts, 2);
    assert_eq!(stats.total_products, 0);
    assert_eq!(stats.total_orders, 0);
    Ok(())
}

#[tokio::test]
async fn me_reflects_the_stored_account() -> anyhow::Result<()> {
    let state = test_state().await?;
    let user = customer(&state).await?;

    let me = admin_service::me(&state, &user).await?.data.unwrap();
    assert_eq!(me.id, user.user_id);
    assert_eq!(me.email, user.email);
    assert_eq!(me.role, Role::User);

    let mut ghost = user.clone();
    ghost.user_id = Uuid::new_v4();
    let err = admin_service::me(&state, &ghost).await.unwrap_err();
    assert!(matches!(err, AppError::Unauthorized(_)));
    Ok(())
}

#[tokio::test]
async fn admin_seed_is_idempotent() -> anyhow::Result<()> {
    let state = test_state().await?;
    let seed = AdminSeed {
        email: "Root@Example.com".into(),
        password: "changeme".into(),
    };

    auth_service::ensure_admin_account(&state.orm, &seed, fixed_now()).await?;
    auth_service::ensure_admin_account(&state.orm, &seed, fixed_now()).await?;

    let boss = admin(&state).await?;
    let users = admin_service::list_users(&state, &boss).await?.data.unwrap().items;
    let seeded: Vec<_> = users.iter().filter(|u| u.email == "root@example.com").collect();
    assert_eq!(seeded.len(), 1);
    assert_eq!(seeded[0].role, Role::Admin);
    Ok(())
}

#[tokio::test]
async fn category_names_are_unique_ignoring_case() -> anyhow::Result<()> {
    let state = test_state().await?;
    let boss = admin(&state).await?;
    let user = customer(&state).await?;

    let created = catalog_service::create_category(
        &state,
        &boss,
        CreateCategoryRequest { name: "  Mugs ".into() },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(created.name, "Mugs");

    let err = catalog_service::create_category(&state, &boss, CreateCategoryRequest { name: "MUGS".into() })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    let err = catalog_service::create_category(&state, &boss, CreateCategoryRequest { name: " ".into() })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(ref m) if m == "Name is required."));

    let err = catalog_service::create_category(&state, &user, CreateCategoryRequest { name: "Tees".into() })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden));

    create_category(&state, "Apparel").await?;
    let names: Vec<String> = catalog_service::list_categories(&state)
        .await?
        .data
        .unwrap()
        .items
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(names, vec!["Apparel".to_string(), "Mugs".to_string()]);
    Ok(())
}

#[tokio::test]
async fn public_listing_hides_inactive_products() -> anyhow::Result<()> {
    let state = test_state().await?;
    let boss = admin(&state).await?;
    let mugs = create_category(&state, "Mugs").await?;

    let shown = catalog_service::create_product(&state, &boss, product("Ferris Mug", mugs, true))
        .await?
        .data
        .unwrap();
    let hidden = catalog_service::create_product(&state, &boss, product("Old Mug", mugs, false))
        .await?
        .data
        .unwrap();

    let listed = catalog_service::list_products(&state).await?.data.unwrap().items;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, shown.id);
    assert_eq!(listed[0].category_name.as_deref(), Some("Mugs"));

    let fetched = catalog_service::get_product(&state, hidden.id).await?.data.unwrap();
    assert!(!fetched.is_active);
    Ok(())
}

#[tokio::test]
async fn product_writes_are_validated() -> anyhow::Result<()> {
    let state = test_state().await?;
    let boss = admin(&state).await?;
    let user = customer(&state).await?;
    let mugs = create_category(&state, "Mugs").await?;

    let err = catalog_service::create_product(&state, &boss, product("Mug", Uuid::new_v4(), true))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(ref m) if m == "CategoryId does not exist."));

    let mut negative = product("Mug", mugs, true);
    negative.price = -1;
    let err = catalog_service::create_product(&state, &boss, negative)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(ref m) if m == "Price must be >= 0."));

    let err = catalog_service::create_product(&state, &user, product("Mug", mugs, true))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden));

    let err = catalog_service::update_product(&state, &boss, Uuid::new_v4(), product("Mug", mugs, true))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound));

    let created = catalog_service::create_product(&state, &boss, product("Mug", mugs, true))
        .await?
        .data
        .unwrap();
    let mut edit = product("Big Mug", mugs, true);
    edit.stock_qty = 40;
    let updated = catalog_service::update_product(&state, &boss, created.id, edit)
        .await?
        .data
        .unwrap();
    assert_eq!(updated.name, "Big Mug");
    assert_eq!(updated.stock_qty, 40);

    let err = catalog_service::delete_product(&state, &boss, Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound));
    Ok(())
}

#[tokio::test]
async fn deleting_a_category_removes_its_products() -> anyhow::Result<()> {
    let state = test_state().await?;
    let boss = admin(&state).await?;
    let mugs = create_category(&state, "Mugs").await?;
    let created = catalog_service::create_product(&state, &boss, product("Mug", mugs, true))
        .await?
        .data
        .unwrap();

    catalog_service::delete_category(&state, &boss, mugs).await?;

    let err = catalog_service::get_product(&state, created.id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound));
    let err = catalog_service::delete_category(&state, &boss, mugs).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound));
    Ok(())
}
