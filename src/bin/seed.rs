use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use storefront_api::{
    config::{AdminSeed, AppConfig},
    db::{create_orm_conn, run_migrations},
    entity::{
        categories::{ActiveModel as CategoryActive, Column as CatCol, Entity as Categories},
        products::{ActiveModel as ProductActive, Column as ProdCol, Entity as Products},
        users::{ActiveModel as UserActive, Column as UserCol, Entity as Users},
    },
    models::Role,
    security::hash_password,
    services::auth_service::ensure_admin_account,
};
use uuid::Uuid;

// (category, name, description, price in cents, stock)
const PRODUCTS: &[(&str, &str, &str, i64, i32)] = &[
    ("Apparel", "Ferris Hoodie", "Warm hoodie for Rustaceans", 5500, 50),
    ("Apparel", "Crab Socks", "Two pairs, one size", 900, 120),
    ("Kitchen", "Ferris Mug", "Coffee tastes better with Ferris", 1200, 100),
    ("Stationery", "Sticker Pack", "Decorate your laptop", 500, 200),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let orm = create_orm_conn(&config.database_url).await?;
    run_migrations(&orm).await?;

    let admin = config.admin_seed.clone().unwrap_or_else(|| AdminSeed {
        email: "admin@example.com".into(),
        password: "admin123".into(),
    });
    ensure_admin_account(&orm, &admin, Utc::now()).await?;
    println!("Ensured admin {}", admin.email);

    ensure_user(&orm, "user@example.com", "user123").await?;
    seed_catalog(&orm).await?;

    println!("Seed completed");
    Ok(())
}

async fn ensure_user(orm: &DatabaseConnection, email: &str, password: &str) -> anyhow::Result<()> {
    let exists = Users::find()
        .filter(UserCol::Email.eq(email))
        .one(orm)
        .await?
        .is_some();
    if !exists {
        UserActive {
            id: Set(Uuid::new_v4()),
            email: Set(email.to_string()),
            password_hash: Set(hash_password(password)?),
            role: Set(Role::User.as_str().to_string()),
            display_name: Set(None),
            created_at: Set(Utc::now().into()),
        }
        .insert(orm)
        .await?;
    }
    println!("Ensured user {email}");
    Ok(())
}

async fn seed_catalog(orm: &DatabaseConnection) -> anyhow::Result<()> {
    for (category, name, description, price, stock) in PRODUCTS {
        let category_id = match Categories::find()
            .filter(CatCol::Name.eq(*category))
            .one(orm)
            .await?
        {
            Some(existing) => existing.id,
            None => {
                CategoryActive {
                    id: Set(Uuid::new_v4()),
                    name: Set(category.to_string()),
                    created_at: Set(Utc::now().into()),
                }
                .insert(orm)
                .await?
                .id
            }
        };

        let exists = Products::find()
            .filter(ProdCol::Name.eq(*name))
            .one(orm)
            .await?
            .is_some();
        if exists {
            continue;
        }

        ProductActive {
            id: Set(Uuid::new_v4()),
            name: Set(name.to_string()),
            description: Set(Some(description.to_string())),
            price: Set(*price),
            stock_qty: Set(*stock),
            image_url: Set(None),
            is_active: Set(true),
            category_id: Set(category_id),
            created_at: Set(Utc::now().into()),
        }
        .insert(orm)
        .await?;
    }

    println!("Seeded catalog");
    Ok(())
}
