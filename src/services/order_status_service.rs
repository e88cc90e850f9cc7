use std::collections::BTreeMap;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseTransaction, EntityTrait, QueryFilter, QuerySelect, Set,
    TransactionTrait, sea_query::Expr,
};
use uuid::Uuid;

use crate::{
    audit,
    dto::orders::{PaymentResult, StatusChanged},
    entity::{
        order_items::{Column as OrderItemCol, Entity as OrderItems, Model as OrderItemModel},
        orders::{ActiveModel as OrderActive, Column as OrderCol, Entity as Orders},
        products::{Column as ProdCol, Entity as Products},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::OrderStatus,
    response::{ApiResponse, Meta},
    services::order_service::parse_status,
    state::AppState,
};

/// Simulated payment for one of the caller's own orders. Paying twice is not an error.
pub async fn pay_order(state: &AppState, user: &AuthUser, id: Uuid) -> AppResult<ApiResponse<PaymentResult>> {
    let txn = state.orm.begin().await?;
    let order = Orders::find()
        .filter(OrderCol::Id.eq(id))
        .filter(OrderCol::UserId.eq(user.user_id))
        .lock_exclusive()
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;

    let message = match parse_status(&order.status)? {
        OrderStatus::Cancelled => return Err(AppError::validation("Order is cancelled.")),
        OrderStatus::Shipped => return Err(AppError::validation("Order already shipped.")),
        OrderStatus::Paid => "Already paid.",
        OrderStatus::Pending => {
            let mut active: OrderActive = order.clone().into();
            active.status = Set(OrderStatus::Paid.as_str().to_string());
            active.update(&txn).await?;
            "Payment successful (simulated)."
        }
    };
    txn.commit().await?;

    if message != "Already paid." {
        tracing::info!(order_id = %order.id, user_id = %user.user_id, "order paid");
        audit::record(
            &state.orm,
            Some(user.user_id),
            "order_pay",
            "orders",
            serde_json::json!({ "order_id": order.id }),
            state.clock.now(),
        )
        .await;
    }

    Ok(ApiResponse::success(
        message,
        PaymentResult {
            message: message.to_string(),
            id: order.id,
            order_number: order.order_number,
            status: OrderStatus::Paid,
        },
        Some(Meta::empty()),
    ))
}

/// Admin status change. Entering `Cancelled` returns every line's quantity to stock.
pub async fn update_order_status(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    raw_status: &str,
) -> AppResult<ApiResponse<StatusChanged>> {
    ensure_admin(user)?;
    let next: OrderStatus = raw_status
        .parse()
        .map_err(|_| AppError::validation("Invalid status. Use Pending, Paid, Shipped, Cancelled."))?;

    let txn = state.orm.begin().await?;
    let order = Orders::find_by_id(id)
        .lock_exclusive()
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;

    let current = parse_status(&order.status)?;
    check_transition(current, next)?;

    if next == OrderStatus::Cancelled {
        let items = OrderItems::find()
            .filter(OrderItemCol::OrderId.eq(order.id))
            .all(&txn)
            .await?;
        restock(&txn, &items).await?;
    }

    let mut active: OrderActive = order.into();
    active.status = Set(next.as_str().to_string());
    let order = active.update(&txn).await?;
    txn.commit().await?;

    tracing::info!(order_id = %order.id, from = %current, to = %next, "order status changed");
    audit::record(
        &state.orm,
        Some(user.user_id),
        "order_status_update",
        "orders",
        serde_json::json!({ "order_id": order.id, "from": current.as_str(), "to": next.as_str() }),
        state.clock.now(),
    )
    .await;

    Ok(ApiResponse::success(
        "Status updated",
        StatusChanged {
            id: order.id,
            order_number: order.order_number,
            status: next,
        },
        Some(Meta::empty()),
    ))
}

/// Terminal states are reported with their own message before the generic edge check.
pub(crate) fn check_transition(current: OrderStatus, next: OrderStatus) -> AppResult<()> {
    match current {
        OrderStatus::Cancelled => Err(AppError::validation("Cancelled orders cannot be changed.")),
        OrderStatus::Shipped if next != OrderStatus::Shipped => {
            Err(AppError::validation("Shipped orders cannot be changed."))
        }
        _ if current.can_transition_to(next) => Ok(()),
        _ => Err(AppError::validation(format!(
            "Invalid status transition from {current} to {next}."
        ))),
    }
}

/// Products deleted since the order was placed are skipped.
async fn restock(txn: &DatabaseTransaction, items: &[OrderItemModel]) -> AppResult<()> {
    let mut per_product: BTreeMap<Uuid, i32> = BTreeMap::new();
    for item in items {
        *per_product.entry(item.product_id).or_insert(0) += item.quantity;
    }

    for (product_id, quantity) in per_product {
        let result = Products::update_many()
            .col_expr(ProdCol::StockQty, Expr::col(ProdCol::StockQty).add(quantity))
            .filter(ProdCol::Id.eq(product_id))
            .exec(txn)
            .await?;
        if result.rows_affected == 0 {
            tracing::debug!(product_id = %product_id, "restock skipped, product no longer exists");
        }
    }
    Ok(())
}
