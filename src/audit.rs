use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ConnectionTrait, Set};
use serde_json::Value;
use uuid::Uuid;

use crate::{entity::audit_logs::ActiveModel as AuditActive, error::AppResult};

pub async fn log_audit<C: ConnectionTrait>(
    db: &C,
    user_id: Option<Uuid>,
    action: &str,
    resource: Option<&str>,
    metadata: Option<Value>,
    at: DateTime<Utc>,
) -> AppResult<()> {
    AuditActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        action: Set(action.to_string()),
        resource: Set(resource.map(str::to_string)),
        metadata: Set(metadata),
        created_at: Set(at.into()),
    }
    .insert(db)
    .await?;

    Ok(())
}

/// Audit failures never fail the request that triggered them.
pub async fn record<C: ConnectionTrait>(
    db: &C,
    user_id: Option<Uuid>,
    action: &str,
    resource: &str,
    metadata: Value,
    at: DateTime<Utc>,
) {
    if let Err(err) = log_audit(db, user_id, action, Some(resource), Some(metadata), at).await {
        tracing::warn!(error = %err, action, "audit log failed");
    }
}
