use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post},
};
use uuid::Uuid;

use crate::{
    dto::{
        cart::{AddToCartRequest, CartMessage, CartView},
        orders::{OrderPlaced, ShippingDetails},
    },
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    routes::params::AddToCartQuery,
    services::{cart_service, order_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(cart_list).delete(clear_cart))
        .route("/add", post(add_to_cart))
        .route("/checkout", post(checkout))
        .route("/{id}", delete(remove_from_cart))
}

#[utoipa::path(
    get,
    path = "/api/cart",
    responses(
        (status = 200, description = "Cart lines at current prices", body = ApiResponse<CartView>)
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn cart_list(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<CartView>>> {
    let resp = cart_service::get_cart(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/cart/add",
    params(AddToCartQuery),
    responses(
        (status = 200, description = "Added or merged into the cart", body = ApiResponse<CartMessage>),
        (status = 400, description = "Invalid product, quantity or not enough stock"),
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn add_to_cart(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<AddToCartQuery>,
) -> AppResult<Json<ApiResponse<CartMessage>>> {
    let payload = AddToCartRequest {
        product_id: query.product_id,
        quantity: query.quantity,
    };
    let resp = cart_service::add_to_cart(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/cart/{id}",
    params(("id" = Uuid, Path, description = "Cart item id")),
    responses(
        (status = 204, description = "Removed"),
        (status = 404, description = "No such item in the caller's cart")
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn remove_from_cart(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    cart_service::remove_from_cart(&state, &user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    delete,
    path = "/api/cart",
    responses((status = 204, description = "Cart emptied")),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn clear_cart(State(state): State<AppState>, user: AuthUser) -> AppResult<StatusCode> {
    cart_service::clear_cart(&state, &user).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/cart/checkout",
    request_body = ShippingDetails,
    responses(
        (status = 200, description = "Order placed from the cart", body = ApiResponse<OrderPlaced>),
        (status = 400, description = "Empty cart, invalid product or not enough stock")
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn checkout(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<ShippingDetails>,
) -> AppResult<Json<ApiResponse<OrderPlaced>>> {
    let resp = order_service::checkout_cart(&state, &user, payload).await?;
    Ok(Json(resp))
}
