use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
};
use uuid::Uuid;

use crate::{
    dto::auth::{LoginRequest, LoginResponse, RegisterRequest, RegisteredUser, UserList},
    error::AppResult,
    middleware::auth::AuthUser,
    models::UserSummary,
    response::ApiResponse,
    routes::params::RoleQuery,
    services::{
        admin_service,
        auth_service::{login_user, register_user},
    },
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/set-role/{user_id}", put(set_role))
        .route("/users", get(list_users))
}

#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Register user", body = ApiResponse<RegisteredUser>),
        (status = 400, description = "Missing email or password"),
        (status = 409, description = "Email is already registered")
    ),
    tag = "Auth"
)]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<RegisteredUser>>)> {
    let resp = register_user(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login user", body = ApiResponse<LoginResponse>),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "Auth"
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<ApiResponse<LoginResponse>>> {
    let resp = login_user(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/auth/set-role/{user_id}",
    params(
        ("user_id" = Uuid, Path, description = "Account id"),
        RoleQuery
    ),
    responses(
        (status = 200, description = "Role updated", body = ApiResponse<UserSummary>),
        (status = 400, description = "Unknown role"),
        (status = 404, description = "Account not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Auth"
)]
pub async fn set_role(
    State(state): State<AppState>,
    user: AuthUser,
    Path(user_id): Path<Uuid>,
    Query(query): Query<RoleQuery>,
) -> AppResult<Json<ApiResponse<UserSummary>>> {
    let resp = admin_service::set_role(&state, &user, user_id, &query.role).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/auth/users",
    responses(
        (status = 200, description = "All accounts", body = ApiResponse<UserList>),
        (status = 403, description = "Admin only")
    ),
    security(("bearer_auth" = [])),
    tag = "Auth"
)]
pub async fn list_users(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<UserList>>> {
    let resp = admin_service::list_users(&state, &user).await?;
    Ok(Json(resp))
}
