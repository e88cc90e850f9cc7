use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseTransaction, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait, sea_query::Expr,
};
use uuid::Uuid;

use crate::{
    audit,
    clock::format_order_number,
    db::is_unique_violation,
    dto::orders::{CreateOrderRequest, OrderLineRequest, OrderList, OrderPlaced, ShippingDetails},
    entity::{
        cart_items::{Column as CartCol, Entity as CartItems},
        order_items::{
            ActiveModel as OrderItemActive, Column as OrderItemCol, Entity as OrderItems,
        },
        orders::{ActiveModel as OrderActive, Column as OrderCol, Entity as Orders, Model as OrderModel},
        products::{Column as ProdCol, Entity as Products, Model as ProductModel},
        users::Entity as Users,
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{Order, OrderItem, OrderStatus},
    response::{ApiResponse, Meta},
    state::AppState,
};

const ORDER_NUMBER_ATTEMPTS: u32 = 5;

/// A validated order line with its price snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PlannedLine {
    pub product_id: Uuid,
    pub quantity: i32,
    pub unit_price: i64,
    pub line_total: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct OrderPlan {
    pub lines: Vec<PlannedLine>,
    pub total_amount: i64,
}

impl OrderPlan {
    /// Total quantity to take from each product, keyed in lock order.
    fn decrements(&self) -> BTreeMap<Uuid, i32> {
        let mut per_product = BTreeMap::new();
        for line in &self.lines {
            *per_product.entry(line.product_id).or_insert(0) += line.quantity;
        }
        per_product
    }
}

/// Places an order from an explicit list of lines. The caller's cart is untouched.
pub async fn create_order(
    state: &AppState,
    user: &AuthUser,
    payload: CreateOrderRequest,
) -> AppResult<ApiResponse<OrderPlaced>> {
    check_line_shape(&payload.items, "Order must contain items.")?;

    let txn = state.orm.begin().await?;
    let placed = place_order(&txn, state, user, &payload.shipping, &payload.items).await?;
    txn.commit().await?;

    after_placed(state, user, &placed, "order_create").await;
    Ok(ApiResponse::success("Order placed", placed, Some(Meta::empty())))
}

/// Turns the caller's cart into an order and empties the cart, atomically.
pub async fn checkout_cart(
    state: &AppState,
    user: &AuthUser,
    shipping: ShippingDetails,
) -> AppResult<ApiResponse<OrderPlaced>> {
    let txn = state.orm.begin().await?;

    let lines: Vec<OrderLineRequest> = CartItems::find()
        .filter(CartCol::UserId.eq(user.user_id))
        .order_by_asc(CartCol::CreatedAt)
        .lock_exclusive()
        .all(&txn)
        .await?
        .into_iter()
        .map(|item| OrderLineRequest {
            product_id: item.product_id,
            quantity: item.quantity,
        })
        .collect();
    check_line_shape(&lines, "Cart is empty.")?;

    let placed = place_order(&txn, state, user, &shipping, &lines).await?;

    CartItems::delete_many()
        .filter(CartCol::UserId.eq(user.user_id))
        .exec(&txn)
        .await?;

    txn.commit().await?;

    after_placed(state, user, &placed, "checkout").await;
    Ok(ApiResponse::success("Checkout success", placed, Some(Meta::empty())))
}

pub async fn list_my_orders(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<OrderList>> {
    let orders = Orders::find()
        .filter(OrderCol::UserId.eq(user.user_id))
        .order_by_desc(OrderCol::CreatedAt)
        .order_by_desc(OrderCol::OrderNumber)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|order| (order, None))
        .collect();

    let items = with_items(&state.orm, orders).await?;
    let meta = Meta::count(items.len());
    Ok(ApiResponse::success("Ok", OrderList { items }, Some(meta)))
}

/// Every order in the store, with the customer's email.
pub async fn list_all_orders(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<OrderList>> {
    ensure_admin(user)?;
    let orders = Orders::find()
        .order_by_desc(OrderCol::CreatedAt)
        .order_by_desc(OrderCol::OrderNumber)
        .find_also_related(Users)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|(order, customer)| (order, customer.map(|c| c.email)))
        .collect();

    let items = with_items(&state.orm, orders).await?;
    let meta = Meta::count(items.len());
    Ok(ApiResponse::success("Orders", OrderList { items }, Some(meta)))
}

/// Core of both order paths; runs entirely inside `txn`.
///
/// The referenced product rows are locked in id order before anything is
/// checked, and each decrement is guarded by `stock_qty >= quantity`, so two
/// concurrent orders cannot both take the last units.
async fn place_order(
    txn: &DatabaseTransaction,
    state: &AppState,
    user: &AuthUser,
    shipping: &ShippingDetails,
    lines: &[OrderLineRequest],
) -> AppResult<OrderPlaced> {
    let ids: BTreeSet<Uuid> = lines.iter().map(|line| line.product_id).collect();
    let products: HashMap<Uuid, ProductModel> = Products::find()
        .filter(ProdCol::Id.is_in(ids))
        .order_by_asc(ProdCol::Id)
        .lock_exclusive()
        .all(txn)
        .await?
        .into_iter()
        .map(|product| (product.id, product))
        .collect();

    let plan = plan_order(lines, &products)?;

    for (product_id, quantity) in plan.decrements() {
        let name = products
            .get(&product_id)
            .map(|p| p.name.as_str())
            .unwrap_or_default();
        take_stock(txn, product_id, name, quantity).await?;
    }

    let order = insert_order(txn, state, user, shipping, plan.total_amount).await?;

    for (position, line) in plan.lines.iter().enumerate() {
        OrderItemActive {
            id: Set(Uuid::new_v4()),
            order_id: Set(order.id),
            position: Set(position as i32),
            product_id: Set(line.product_id),
            quantity: Set(line.quantity),
            unit_price: Set(line.unit_price),
            line_total: Set(line.line_total),
        }
        .insert(txn)
        .await?;
    }

    Ok(OrderPlaced {
        id: order.id,
        order_number: order.order_number,
        total_amount: order.total_amount,
    })
}

/// Decrements stock only while at least `quantity` remains, so a stale read
/// can never drive it negative.
pub async fn take_stock<C: ConnectionTrait>(
    db: &C,
    product_id: Uuid,
    product_name: &str,
    quantity: i32,
) -> AppResult<()> {
    let result = Products::update_many()
        .col_expr(ProdCol::StockQty, Expr::col(ProdCol::StockQty).sub(quantity))
        .filter(ProdCol::Id.eq(product_id))
        .filter(ProdCol::StockQty.gte(quantity))
        .exec(db)
        .await?;
    if result.rows_affected != 1 {
        return Err(AppError::validation(format!(
            "Not enough stock for {product_name}"
        )));
    }
    Ok(())
}

/// Inserts the order header under a fresh order number. A number that is
/// already taken is rolled back to a savepoint and drawn again.
async fn insert_order(
    txn: &DatabaseTransaction,
    state: &AppState,
    user: &AuthUser,
    shipping: &ShippingDetails,
    total_amount: i64,
) -> AppResult<OrderModel> {
    let now = state.clock.now();
    for attempt in 1..=ORDER_NUMBER_ATTEMPTS {
        let order_number = format_order_number(now, &state.order_numbers.next_suffix());
        let savepoint = txn.begin().await?;
        let inserted = OrderActive {
            id: Set(Uuid::new_v4()),
            user_id: Set(user.user_id),
            order_number: Set(order_number.clone()),
            status: Set(OrderStatus::Pending.as_str().to_string()),
            total_amount: Set(total_amount),
            shipping_name: Set(shipping.shipping_name.trim().to_string()),
            shipping_address: Set(shipping.shipping_address.trim().to_string()),
            phone: Set(shipping.phone.trim().to_string()),
            created_at: Set(now.into()),
        }
        .insert(&savepoint)
        .await;

        match inserted {
            Ok(order) => {
                savepoint.commit().await?;
                return Ok(order);
            }
            Err(err) if is_unique_violation(&err) => {
                savepoint.rollback().await?;
                tracing::warn!(%order_number, attempt, "order number already taken, drawing another");
            }
            Err(err) => return Err(err.into()),
        }
    }

    Err(AppError::Internal(anyhow::anyhow!(
        "no free order number after {ORDER_NUMBER_ATTEMPTS} attempts"
    )))
}

/// Rejects an empty line list or a non-positive quantity before any lookup.
fn check_line_shape(lines: &[OrderLineRequest], empty_message: &str) -> AppResult<()> {
    if lines.is_empty() {
        return Err(AppError::validation(empty_message));
    }
    if lines.iter().any(|line| line.quantity <= 0) {
        return Err(AppError::validation("Quantity must be greater than 0."));
    }
    Ok(())
}

/// Validates lines in the order given against a snapshot of the products and
/// prices them. The first failing line aborts the whole plan. Lines naming the
/// same product draw down a shared remaining stock.
pub(crate) fn plan_order(
    lines: &[OrderLineRequest],
    products: &HashMap<Uuid, ProductModel>,
) -> AppResult<OrderPlan> {
    check_line_shape(lines, "Order must contain items.")?;

    let mut remaining: HashMap<Uuid, i32> = HashMap::new();
    let mut planned = Vec::with_capacity(lines.len());
    let mut total_amount: i64 = 0;

    for line in lines {
        let product = products
            .get(&line.product_id)
            .filter(|p| p.is_active)
            .ok_or_else(|| AppError::validation(format!("Invalid product {}", line.product_id)))?;

        let available = remaining.entry(product.id).or_insert(product.stock_qty);
        if *available < line.quantity {
            return Err(AppError::validation(format!(
                "Not enough stock for {}",
                product.name
            )));
        }
        *available -= line.quantity;

        let line_total = product
            .price
            .checked_mul(i64::from(line.quantity))
            .ok_or_else(|| AppError::validation("Order total is too large."))?;
        total_amount = total_amount
            .checked_add(line_total)
            .ok_or_else(|| AppError::validation("Order total is too large."))?;

        planned.push(PlannedLine {
            product_id: product.id,
            quantity: line.quantity,
            unit_price: product.price,
            line_total,
        });
    }

    Ok(OrderPlan {
        lines: planned,
        total_amount,
    })
}

async fn after_placed(state: &AppState, user: &AuthUser, placed: &OrderPlaced, action: &str) {
    tracing::info!(
        order_id = %placed.id,
        order_number = %placed.order_number,
        total_amount = placed.total_amount,
        user_id = %user.user_id,
        "order placed"
    );
    audit::record(
        &state.orm,
        Some(user.user_id),
        action,
        "orders",
        serde_json::json!({ "order_id": placed.id, "order_number": placed.order_number }),
        state.clock.now(),
    )
    .await;
}

/// Attaches line items (in line order, with current product names) to orders.
async fn with_items<C: ConnectionTrait>(
    db: &C,
    orders: Vec<(OrderModel, Option<String>)>,
) -> AppResult<Vec<Order>> {
    let ids: Vec<Uuid> = orders.iter().map(|(order, _)| order.id).collect();
    let mut items_by_order: HashMap<Uuid, Vec<OrderItem>> = HashMap::new();
    if !ids.is_empty() {
        let rows = OrderItems::find()
            .filter(OrderItemCol::OrderId.is_in(ids))
            .order_by_asc(OrderItemCol::OrderId)
            .order_by_asc(OrderItemCol::Position)
            .find_also_related(Products)
            .all(db)
            .await?;
        for (item, product) in rows {
            items_by_order
                .entry(item.order_id)
                .or_default()
                .push(OrderItem {
                    id: item.id,
                    product_id: item.product_id,
                    product_name: product.map(|p| p.name),
                    quantity: item.quantity,
                    unit_price: item.unit_price,
                    line_total: item.line_total,
                });
        }
    }

    orders
        .into_iter()
        .map(|(order, customer_email)| {
            let items = items_by_order.remove(&order.id).unwrap_or_default();
            order_from_entity(order, customer_email, items)
        })
        .collect()
}

pub(crate) fn parse_status(raw: &str) -> AppResult<OrderStatus> {
    raw.parse::<OrderStatus>()
        .map_err(|e| AppError::Internal(anyhow::anyhow!("stored order status is invalid: {e}")))
}

fn order_from_entity(
    model: OrderModel,
    customer_email: Option<String>,
    items: Vec<OrderItem>,
) -> AppResult<Order> {
    Ok(Order {
        id: model.id,
        order_number: model.order_number,
        user_id: model.user_id,
        customer_email,
        status: parse_status(&model.status)?,
        created_at: model.created_at.with_timezone(&Utc),
        total_amount: model.total_amount,
        shipping_name: model.shipping_name,
        shipping_address: model.shipping_address,
        phone: model.phone,
        items,
    })
}
