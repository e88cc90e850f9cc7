use sea_orm::{ActiveModelTrait, EntityTrait, PaginatorTrait, QueryOrder, Set};
use uuid::Uuid;

use crate::{
    audit,
    dto::auth::{AdminStats, Me, UserList},
    entity::{
        orders::Entity as Orders,
        products::Entity as Products,
        users::{ActiveModel as UserActive, Column as UserCol, Entity as Users, Model as UserModel},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{Role, UserSummary},
    response::{ApiResponse, Meta},
    services::auth_service::parse_role,
    state::AppState,
};

pub async fn list_users(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<UserList>> {
    ensure_admin(user)?;
    let items = Users::find()
        .order_by_asc(UserCol::Email)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(user_summary)
        .collect::<AppResult<Vec<_>>>()?;

    let meta = Meta::count(items.len());
    Ok(ApiResponse::success("Users", UserList { items }, Some(meta)))
}

/// The new role shows up in the target's tokens from their next login.
pub async fn set_role(
    state: &AppState,
    user: &AuthUser,
    target_id: Uuid,
    raw_role: &str,
) -> AppResult<ApiResponse<UserSummary>> {
    ensure_admin(user)?;
    let role: Role = raw_role
        .parse()
        .map_err(|_| AppError::validation("Role must be User or Admin."))?;

    let target = Users::find_by_id(target_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: UserActive = target.into();
    active.role = Set(role.as_str().to_string());
    let updated = active.update(&state.orm).await?;

    tracing::info!(user_id = %updated.id, role = %role, "role changed");
    audit::record(
        &state.orm,
        Some(user.user_id),
        "user_set_role",
        "users",
        serde_json::json!({ "user_id": updated.id, "role": role.as_str() }),
        state.clock.now(),
    )
    .await;

    Ok(ApiResponse::success("Role updated", user_summary(updated)?, Some(Meta::empty())))
}

/// Reads the stored account rather than echoing the token, so a deleted
/// account stops working here even with an unexpired token.
pub async fn me(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<Me>> {
    let account = Users::find_by_id(user.user_id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Account no longer exists".into()))?;

    Ok(ApiResponse::success(
        "OK",
        Me {
            id: account.id,
            email: account.email,
            role: parse_role(&account.role)?,
        },
        None,
    ))
}

pub async fn admin_stats(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<AdminStats>> {
    ensure_admin(user)?;
    let stats = AdminStats {
        total_accounts: Users::find().count(&state.orm).await?,
        total_products: Products::find().count(&state.orm).await?,
        total_orders: Orders::find().count(&state.orm).await?,
    };
    Ok(ApiResponse::success("Stats", stats, Some(Meta::empty())))
}

fn user_summary(model: UserModel) -> AppResult<UserSummary> {
    Ok(UserSummary {
        id: model.id,
        role: parse_role(&model.role)?,
        email: model.email,
    })
}
