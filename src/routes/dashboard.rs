use axum::{Json, Router, extract::State, routing::get};

use crate::{
    dto::auth::{AdminStats, Me},
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    services::admin_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/me", get(me))
        .route("/admin/stats", get(admin_stats))
}

#[utoipa::path(
    get,
    path = "/api/dashboard/me",
    responses(
        (status = 200, description = "Current account", body = ApiResponse<Me>),
        (status = 401, description = "Missing token or account gone")
    ),
    security(("bearer_auth" = [])),
    tag = "Dashboard"
)]
pub async fn me(State(state): State<AppState>, user: AuthUser) -> AppResult<Json<ApiResponse<Me>>> {
    let resp = admin_service::me(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/dashboard/admin/stats",
    responses(
        (status = 200, description = "Store totals", body = ApiResponse<AdminStats>),
        (status = 403, description = "Admin only")
    ),
    security(("bearer_auth" = [])),
    tag = "Dashboard"
)]
pub async fn admin_stats(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<AdminStats>>> {
    let resp = admin_service::admin_stats(&state, &user).await?;
    Ok(Json(resp))
}
