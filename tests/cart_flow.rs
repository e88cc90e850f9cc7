mod common;

use common::{create_product, customer, admin, fixed_now, test_state};
use sea_orm::{ActiveModelTrait, Set};
use storefront_api::{
    db::is_unique_violation,
    dto::cart::AddToCartRequest,
    entity::cart_items::ActiveModel as CartActive,
    error::AppError,
    services::{cart_service, catalog_service},
};
use uuid::Uuid;

fn add(product_id: Uuid, quantity: i32) -> AddToCartRequest {
    AddToCartRequest {
        product_id,
        quantity,
    }
}

#[tokio::test]
async fn adding_the_same_product_twice_merges_into_one_line() -> anyhow::Result<()> {
    let state = test_state().await?;
    let user = customer(&state).await?;
    let mug = create_product(&state, "Mug", 1000, 10).await?;

    cart_service::add_to_cart(&state, &user, add(mug, 2)).await?;
    let resp = cart_service::add_to_cart(&state, &user, add(mug, 3)).await?;
    assert_eq!(resp.data.unwrap().message, "Added to cart.");

    let cart = cart_service::get_cart(&state, &user).await?.data.unwrap();
    assert_eq!(cart.items.len(), 1);
    assert_eq!(cart.items[0].quantity, 5);
    assert_eq!(cart.items[0].product_name.as_deref(), Some("Mug"));
    assert_eq!(cart.items[0].line_total, 5000);
    assert_eq!(cart.total, 5000);
    Ok(())
}

#[tokio::test]
async fn cumulative_quantity_beyond_stock_is_rejected() -> anyhow::Result<()> {
    let state = test_state().await?;
    let user = customer(&state).await?;
    let mug = create_product(&state, "Mug", 1000, 5).await?;

    cart_service::add_to_cart(&state, &user, add(mug, 3)).await?;
    let err = cart_service::add_to_cart(&state, &user, add(mug, 3))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(ref m) if m == "Not enough stock."));

    let cart = cart_service::get_cart(&state, &user).await?.data.unwrap();
    assert_eq!(cart.items[0].quantity, 3);
    Ok(())
}

#[tokio::test]
async fn other_carts_do_not_count_against_stock() -> anyhow::Result<()> {
    let state = test_state().await?;
    let first = customer(&state).await?;
    let second = customer(&state).await?;
    let mug = create_product(&state, "Mug", 1000, 5).await?;

    cart_service::add_to_cart(&state, &first, add(mug, 5)).await?;
    cart_service::add_to_cart(&state, &second, add(mug, 5)).await?;
    Ok(())
}

#[tokio::test]
async fn bad_quantity_or_product_is_a_validation_error() -> anyhow::Result<()> {
    let state = test_state().await?;
    let user = customer(&state).await?;
    let mug = create_product(&state, "Mug", 1000, 5).await?;

    let err = cart_service::add_to_cart(&state, &user, add(mug, 0))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(ref m) if m == "Quantity must be > 0."));

    let err = cart_service::add_to_cart(&state, &user, add(Uuid::new_v4(), 1))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(ref m) if m == "Invalid product."));

    let cart = cart_service::get_cart(&state, &user).await?.data.unwrap();
    assert!(cart.items.is_empty());
    assert_eq!(cart.total, 0);
    Ok(())
}

#[tokio::test]
async fn only_the_owner_can_remove_a_cart_line() -> anyhow::Result<()> {
    let state = test_state().await?;
    let owner = customer(&state).await?;
    let stranger = customer(&state).await?;
    let mug = create_product(&state, "Mug", 1000, 5).await?;

    cart_service::add_to_cart(&state, &owner, add(mug, 1)).await?;
    let item_id = cart_service::get_cart(&state, &owner).await?.data.unwrap().items[0].id;

    let err = cart_service::remove_from_cart(&state, &stranger, item_id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound));

    cart_service::remove_from_cart(&state, &owner, item_id).await?;
    let cart = cart_service::get_cart(&state, &owner).await?.data.unwrap();
    assert!(cart.items.is_empty());

    let err = cart_service::remove_from_cart(&state, &owner, item_id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound));
    Ok(())
}

#[tokio::test]
async fn clearing_empties_only_the_callers_cart() -> anyhow::Result<()> {
    let state = test_state().await?;
    let first = customer(&state).await?;
    let second = customer(&state).await?;
    let mug = create_product(&state, "Mug", 1000, 5).await?;
    let tee = create_product(&state, "Tee", 2000, 5).await?;

    cart_service::add_to_cart(&state, &first, add(mug, 1)).await?;
    cart_service::add_to_cart(&state, &first, add(tee, 1)).await?;
    cart_service::add_to_cart(&state, &second, add(mug, 2)).await?;

    cart_service::clear_cart(&state, &first).await?;
    cart_service::clear_cart(&state, &first).await?;

    assert!(cart_service::get_cart(&state, &first).await?.data.unwrap().items.is_empty());
    assert_eq!(cart_service::get_cart(&state, &second).await?.data.unwrap().items.len(), 1);
    Ok(())
}

#[tokio::test]
async fn deleted_products_show_as_unnamed_zero_price_lines() -> anyhow::Result<()> {
    let state = test_state().await?;
    let user = customer(&state).await?;
    let boss = admin(&state).await?;
    let mug = create_product(&state, "Mug", 1000, 5).await?;
    let tee = create_product(&state, "Tee", 2000, 5).await?;

    cart_service::add_to_cart(&state, &user, add(mug, 2)).await?;
    cart_service::add_to_cart(&state, &user, add(tee, 1)).await?;
    catalog_service::delete_product(&state, &boss, mug).await?;

    let cart = cart_service::get_cart(&state, &user).await?.data.unwrap();
    assert_eq!(cart.items.len(), 2);
    let gone = cart.items.iter().find(|l| l.product_id == mug).unwrap();
    assert_eq!(gone.product_name, None);
    assert_eq!(gone.price, 0);
    assert_eq!(gone.line_total, 0);
    assert_eq!(cart.total, 2000);
    Ok(())
}

#[tokio::test]
async fn cart_total_that_overflows_is_a_validation_error() -> anyhow::Result<()> {
    let state = test_state().await?;
    let user = customer(&state).await?;
    let pricey = create_product(&state, "Yacht", i64::MAX / 2 + 1, 10).await?;

    cart_service::add_to_cart(&state, &user, add(pricey, 2)).await?;
    let err = cart_service::get_cart(&state, &user).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(ref m) if m == "Cart total is too large."));
    Ok(())
}

#[tokio::test]
async fn simultaneous_first_adds_end_in_one_merged_line() -> anyhow::Result<()> {
    let state = test_state().await?;
    let user = customer(&state).await?;
    let mug = create_product(&state, "Mug", 1000, 10).await?;

    // The test pool holds a single SQLite connection, so the two transactions
    // run one after the other rather than truly interleaving.
    let (first, second) = tokio::join!(
        cart_service::add_to_cart(&state, &user, add(mug, 2)),
        cart_service::add_to_cart(&state, &user, add(mug, 3)),
    );
    first?;
    second?;

    let cart = cart_service::get_cart(&state, &user).await?.data.unwrap();
    assert_eq!(cart.items.len(), 1);
    assert_eq!(cart.items[0].quantity, 5);
    Ok(())
}

#[tokio::test]
async fn a_second_row_for_the_same_product_is_a_unique_violation() -> anyhow::Result<()> {
    let state = test_state().await?;
    let user = customer(&state).await?;
    let mug = create_product(&state, "Mug", 1000, 10).await?;

    cart_service::add_to_cart(&state, &user, add(mug, 1)).await?;
    let err = CartActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(user.user_id),
        product_id: Set(mug),
        quantity: Set(1),
        created_at: Set(fixed_now().into()),
    }
    .insert(&state.orm)
    .await
    .unwrap_err();

    // This is the error add_to_cart treats as "lost the race" and retries.
    assert!(is_unique_violation(&err));
    Ok(())
}
