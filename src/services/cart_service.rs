use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit,
    db::is_unique_violation,
    dto::cart::{AddToCartRequest, CartMessage, CartView},
    entity::{
        cart_items::{ActiveModel as CartActive, Column as CartCol, Entity as CartItems},
        products::Entity as Products,
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::CartLine,
    response::{ApiResponse, Meta},
    state::AppState,
};

/// Cart contents priced at the products' current prices. Rows whose product
/// has since been deleted show up with no name and a zero price.
pub async fn get_cart(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<CartView>> {
    let rows = CartItems::find()
        .filter(CartCol::UserId.eq(user.user_id))
        .order_by_asc(CartCol::CreatedAt)
        .find_also_related(Products)
        .all(&state.orm)
        .await?;

    let items: Vec<CartLine> = rows
        .into_iter()
        .map(|(item, product)| {
            let (product_name, price) = match product {
                Some(p) => (Some(p.name), p.price),
                None => (None, 0),
            };
            Ok(CartLine {
                id: item.id,
                product_id: item.product_id,
                product_name,
                price,
                quantity: item.quantity,
                line_total: line_total(price, item.quantity)?,
            })
        })
        .collect::<AppResult<Vec<_>>>()?;

    let total = cart_total(&items)?;
    let meta = Meta::count(items.len());
    Ok(ApiResponse::success("OK", CartView { items, total }, Some(meta)))
}

/// Adds to the caller's cart, merging with an existing row for the same product.
///
/// Stock is not reserved here; only the caller's own cart quantity is checked
/// against the live stock level. Other carts are never counted.
pub async fn add_to_cart(
    state: &AppState,
    user: &AuthUser,
    payload: AddToCartRequest,
) -> AppResult<ApiResponse<CartMessage>> {
    if payload.quantity <= 0 {
        return Err(AppError::validation("Quantity must be > 0."));
    }

    // Two first adds for the same product can both miss the existing row; the
    // loser hits the unique index and goes again through the merge path.
    let (product_id, quantity) = match merge_into_cart(state, user, &payload).await {
        Err(AppError::OrmError(err)) if is_unique_violation(&err) => {
            tracing::debug!(
                user_id = %user.user_id,
                product_id = %payload.product_id,
                "cart row created concurrently, merging"
            );
            merge_into_cart(state, user, &payload).await?
        }
        other => other?,
    };

    tracing::debug!(user_id = %user.user_id, product_id = %product_id, quantity, "cart updated");
    audit::record(
        &state.orm,
        Some(user.user_id),
        "cart_add",
        "cart_items",
        serde_json::json!({ "product_id": product_id, "quantity": payload.quantity }),
        state.clock.now(),
    )
    .await;

    Ok(ApiResponse::success(
        "OK",
        CartMessage {
            message: "Added to cart.".into(),
        },
        None,
    ))
}

/// One transaction: insert a new row or raise the existing one. Returns the
/// product id and the row's new quantity.
async fn merge_into_cart(
    state: &AppState,
    user: &AuthUser,
    payload: &AddToCartRequest,
) -> AppResult<(Uuid, i32)> {
    let txn = state.orm.begin().await?;

    let product = Products::find_by_id(payload.product_id)
        .one(&txn)
        .await?
        .filter(|p| p.is_active)
        .ok_or_else(|| AppError::validation("Invalid product."))?;

    let existing = CartItems::find()
        .filter(CartCol::UserId.eq(user.user_id))
        .filter(CartCol::ProductId.eq(product.id))
        .lock_exclusive()
        .one(&txn)
        .await?;

    let current = existing.as_ref().map(|item| item.quantity).unwrap_or(0);
    let quantity = merged_quantity(current, payload.quantity, product.stock_qty)?;

    let now = state.clock.now();
    match existing {
        Some(item) => {
            let mut active: CartActive = item.into();
            active.quantity = Set(quantity);
            active.update(&txn).await?;
        }
        None => {
            CartActive {
                id: Set(Uuid::new_v4()),
                user_id: Set(user.user_id),
                product_id: Set(product.id),
                quantity: Set(quantity),
                created_at: Set(now.into()),
            }
            .insert(&txn)
            .await?;
        }
    }

    txn.commit().await?;
    Ok((product.id, quantity))
}

/// Only rows owned by the caller can be removed; anything else is `NotFound`.
pub async fn remove_from_cart(state: &AppState, user: &AuthUser, cart_item_id: Uuid) -> AppResult<()> {
    let result = CartItems::delete_many()
        .filter(CartCol::Id.eq(cart_item_id))
        .filter(CartCol::UserId.eq(user.user_id))
        .exec(&state.orm)
        .await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    audit::record(
        &state.orm,
        Some(user.user_id),
        "cart_remove",
        "cart_items",
        serde_json::json!({ "cart_item_id": cart_item_id }),
        state.clock.now(),
    )
    .await;

    Ok(())
}

pub async fn clear_cart(state: &AppState, user: &AuthUser) -> AppResult<()> {
    let result = CartItems::delete_many()
        .filter(CartCol::UserId.eq(user.user_id))
        .exec(&state.orm)
        .await?;

    if result.rows_affected > 0 {
        audit::record(
            &state.orm,
            Some(user.user_id),
            "cart_clear",
            "cart_items",
            serde_json::json!({ "removed": result.rows_affected }),
            state.clock.now(),
        )
        .await;
    }

    Ok(())
}

fn line_total(price: i64, quantity: i32) -> AppResult<i64> {
    price
        .checked_mul(i64::from(quantity))
        .ok_or_else(|| AppError::validation("Cart total is too large."))
}

fn cart_total(items: &[CartLine]) -> AppResult<i64> {
    items.iter().try_fold(0i64, |total, line| {
        total
            .checked_add(line.line_total)
            .ok_or_else(|| AppError::validation("Cart total is too large."))
    })
}

fn merged_quantity(current: i32, requested: i32, stock: i32) -> AppResult<i32> {
    let wanted = current
        .checked_add(requested)
        .ok_or_else(|| AppError::validation("Not enough stock."))?;
    if wanted > stock {
        return Err(AppError::validation("Not enough stock."));
    }
    Ok(wanted)
}
