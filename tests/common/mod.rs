#![allow(dead_code)]

use std::{
    collections::VecDeque,
    sync::{
        Arc, Mutex,
        atomic::{AtomicU32, Ordering},
    },
};

use chrono::{DateTime, TimeZone, Utc};
use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use storefront_api::{
    clock::{Clock, OrderNumberSuffix},
    config::JwtConfig,
    db::{create_orm_conn, run_migrations},
    dto::orders::{OrderLineRequest, ShippingDetails},
    entity::{
        categories::ActiveModel as CategoryActive,
        products::{ActiveModel as ProductActive, Entity as Products},
        users::ActiveModel as UserActive,
    },
    middleware::auth::AuthUser,
    models::Role,
    state::AppState,
};
use uuid::Uuid;

pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// `000001`, `000002`, ... so order numbers are predictable.
#[derive(Default)]
pub struct SequentialSuffix(AtomicU32);

impl OrderNumberSuffix for SequentialSuffix {
    fn next_suffix(&self) -> String {
        let n = self.0.fetch_add(1, Ordering::SeqCst) + 1;
        format!("{n:06}")
    }
}

/// Hands out the scripted suffixes in order, then `fallback` forever.
pub struct ScriptedSuffix {
    script: Mutex<VecDeque<String>>,
    fallback: String,
}

impl ScriptedSuffix {
    pub fn new(script: &[&str], fallback: &str) -> Self {
        Self {
            script: Mutex::new(script.iter().map(|s| s.to_string()).collect()),
            fallback: fallback.to_string(),
        }
    }
}

impl OrderNumberSuffix for ScriptedSuffix {
    fn next_suffix(&self) -> String {
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone())
    }
}

pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 18, 9, 30, 0).unwrap()
}

pub fn jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "integration-test-secret".into(),
        issuer: "storefront-api".into(),
        audience: "storefront-client".into(),
        expires_minutes: 60,
    }
}

/// Fresh in-memory database with the schema applied.
pub async fn test_state() -> anyhow::Result<AppState> {
    let orm = create_orm_conn("sqlite::memory:").await?;
    run_migrations(&orm).await?;
    Ok(AppState::new(orm, &jwt_config())
        .with_clock(Arc::new(FixedClock(fixed_now())))
        .with_order_numbers(Arc::new(SequentialSuffix::default())))
}

/// Inserts an account directly; the password hash is a placeholder, so these
/// accounts cannot log in.
pub async fn create_account(state: &AppState, email: &str, role: Role) -> anyhow::Result<AuthUser> {
    let user = UserActive {
        id: Set(Uuid::new_v4()),
        email: Set(email.to_string()),
        password_hash: Set("not-a-real-hash".into()),
        role: Set(role.as_str().to_string()),
        display_name: Set(None),
        created_at: Set(fixed_now().into()),
    }
    .insert(&state.orm)
    .await?;

    Ok(AuthUser {
        user_id: user.id,
        email: user.email,
        role,
    })
}

pub async fn customer(state: &AppState) -> anyhow::Result<AuthUser> {
    create_account(state, &format!("{}@example.com", Uuid::new_v4().simple()), Role::User).await
}

pub async fn admin(state: &AppState) -> anyhow::Result<AuthUser> {
    create_account(state, &format!("admin-{}@example.com", Uuid::new_v4().simple()), Role::Admin).await
}

pub async fn create_category(state: &AppState, name: &str) -> anyhow::Result<Uuid> {
    let category = CategoryActive {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        created_at: Set(fixed_now().into()),
    }
    .insert(&state.orm)
    .await?;
    Ok(category.id)
}

/// An active product in a fresh category.
pub async fn create_product(
    state: &AppState,
    name: &str,
    price: i64,
    stock_qty: i32,
) -> anyhow::Result<Uuid> {
    let category_id = create_category(state, &format!("Category {}", Uuid::new_v4().simple())).await?;
    let product = ProductActive {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        description: Set(None),
        price: Set(price),
        stock_qty: Set(stock_qty),
        image_url: Set(None),
        is_active: Set(true),
        category_id: Set(category_id),
        created_at: Set(fixed_now().into()),
    }
    .insert(&state.orm)
    .await?;
    Ok(product.id)
}

pub async fn stock_of(state: &AppState, product_id: Uuid) -> anyhow::Result<i32> {
    let product = Products::find_by_id(product_id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| anyhow::anyhow!("product {product_id} is gone"))?;
    Ok(product.stock_qty)
}

pub fn shipping() -> ShippingDetails {
    ShippingDetails {
        shipping_name: "Ada Lovelace".into(),
        shipping_address: "12 Analytical Row".into(),
        phone: "555-0100".into(),
    }
}

pub fn line(product_id: Uuid, quantity: i32) -> OrderLineRequest {
    OrderLineRequest {
        product_id,
        quantity,
    }
}
