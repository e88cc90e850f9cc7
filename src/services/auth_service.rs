use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use crate::{
    audit,
    config::AdminSeed,
    db::conflict_on_unique,
    dto::auth::{LoginRequest, LoginResponse, RegisterRequest, RegisteredUser},
    entity::users::{ActiveModel as UserActive, Column as UserCol, Entity as Users, Model as UserModel},
    error::{AppError, AppResult},
    models::Role,
    response::{ApiResponse, Meta},
    security::{hash_password, verify_password},
    state::AppState,
};

const INVALID_CREDENTIALS: &str = "Invalid credentials.";

pub async fn register_user(
    state: &AppState,
    payload: RegisterRequest,
) -> AppResult<ApiResponse<RegisteredUser>> {
    let email = normalize_email(&payload.email);
    if email.is_empty() || payload.password.trim().is_empty() {
        return Err(AppError::validation("Email and password are required."));
    }

    if find_by_email(&state.orm, &email).await?.is_some() {
        return Err(AppError::Conflict("Email is already registered.".into()));
    }

    let now = state.clock.now();
    let display_name = payload
        .display_name
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty());
    let user = insert_user(&state.orm, &email, &payload.password, Role::User, display_name, now)
        .await
        .map_err(|err| match err {
            AppError::OrmError(db) => conflict_on_unique("Email is already registered.")(db),
            other => other,
        })?;

    tracing::info!(user_id = %user.id, "user registered");
    audit::record(
        &state.orm,
        Some(user.id),
        "user_register",
        "users",
        serde_json::json!({ "user_id": user.id }),
        now,
    )
    .await;

    Ok(ApiResponse::success(
        "User created",
        RegisteredUser {
            id: user.id,
            email: user.email,
        },
        None,
    ))
}

/// Unknown email and wrong password are indistinguishable to the caller.
pub async fn login_user(state: &AppState, payload: LoginRequest) -> AppResult<ApiResponse<LoginResponse>> {
    let email = normalize_email(&payload.email);
    let user = find_by_email(&state.orm, &email)
        .await?
        .ok_or_else(|| AppError::Unauthorized(INVALID_CREDENTIALS.into()))?;

    if !verify_password(&payload.password, &user.password_hash)? {
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into()));
    }

    let role = parse_role(&user.role)?;
    // Expiry is checked against the system clock when the token is verified.
    let token = state.tokens.issue(user.id, &user.email, role, Utc::now())?;

    audit::record(
        &state.orm,
        Some(user.id),
        "user_login",
        "users",
        serde_json::json!({ "user_id": user.id }),
        state.clock.now(),
    )
    .await;

    Ok(ApiResponse::success(
        "Logged in",
        LoginResponse { token },
        Some(Meta::empty()),
    ))
}

/// Creates the configured admin account if no account holds that email yet.
/// An existing account is promoted to admin; its password is left alone.
pub async fn ensure_admin_account<C: ConnectionTrait>(
    db: &C,
    seed: &AdminSeed,
    now: DateTime<Utc>,
) -> AppResult<()> {
    let email = normalize_email(&seed.email);
    match find_by_email(db, &email).await? {
        Some(user) if user.role == Role::Admin.as_str() => {
            tracing::debug!(email = %email, "admin account already present");
        }
        Some(user) => {
            let mut active: UserActive = user.into();
            active.role = Set(Role::Admin.as_str().to_string());
            active.update(db).await?;
            tracing::info!(email = %email, "existing account promoted to admin");
        }
        None => {
            insert_user(db, &email, &seed.password, Role::Admin, None, now).await?;
            tracing::info!(email = %email, "admin account seeded");
        }
    }
    Ok(())
}

pub(crate) fn parse_role(raw: &str) -> AppResult<Role> {
    raw.parse::<Role>()
        .map_err(|e| AppError::Internal(anyhow::anyhow!("stored role is invalid: {e}")))
}

fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

async fn find_by_email<C: ConnectionTrait>(db: &C, email: &str) -> AppResult<Option<UserModel>> {
    Ok(Users::find()
        .filter(UserCol::Email.eq(email))
        .one(db)
        .await?)
}

async fn insert_user<C: ConnectionTrait>(
    db: &C,
    email: &str,
    password: &str,
    role: Role,
    display_name: Option<String>,
    now: DateTime<Utc>,
) -> AppResult<UserModel> {
    let password_hash = hash_password(password)?;
    let user = UserActive {
        id: Set(Uuid::new_v4()),
        email: Set(email.to_string()),
        password_hash: Set(password_hash),
        role: Set(role.as_str().to_string()),
        display_name: Set(display_name),
        created_at: Set(now.into()),
    }
    .insert(db)
    .await?;
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emails_are_trimmed_and_lowercased() {
        assert_eq!(normalize_email("  Ada@Example.COM "), "ada@example.com");
    }

    #[test]
    fn stored_roles_parse() {
        assert_eq!(parse_role("Admin").unwrap(), Role::Admin);
        assert!(matches!(parse_role("root"), Err(AppError::Internal(_))));
    }
}
