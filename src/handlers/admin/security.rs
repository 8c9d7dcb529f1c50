use axum::extract::Query;
use axum::{Extension, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use std::net::Ipv4Addr;

use crate::database::manager::DatabaseManager;
use crate::database::models::admin::{AdminUser, LoginAttempt};
use crate::database::security;
use crate::error::ApiError;
use crate::middleware::{AdminContext, ApiResponse, ApiResult};

const DEFAULT_ATTEMPT_LIMIT: i64 = 50;
const MAX_ATTEMPT_LIMIT: i64 = 500;

#[derive(Debug, Deserialize)]
pub struct AttemptsQuery {
    pub limit: Option<i64>,
}

/// GET /api/admin/security/attempts - recent login attempts, newest first
pub async fn list_attempts(Query(query): Query<AttemptsQuery>) -> ApiResult<Vec<LoginAttempt>> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_ATTEMPT_LIMIT)
        .clamp(1, MAX_ATTEMPT_LIMIT);

    let pool = DatabaseManager::pool().await?;
    let attempts = security::recent_attempts(&pool, limit).await?;
    Ok(ApiResponse::success(attempts))
}

#[derive(Debug, Deserialize)]
pub struct AllowedIpsPayload {
    pub allowed_ips: Vec<String>,
}

/// PUT /api/admin/security/allowed-ips - replace the caller's allow-list.
/// Every entry must be a dotted-quad IPv4 address; an empty list removes the
/// restriction.
pub async fn put_allowed_ips(
    Extension(context): Extension<AdminContext>,
    Json(payload): Json<AllowedIpsPayload>,
) -> ApiResult<AdminUser> {
    for ip in &payload.allowed_ips {
        if ip.parse::<Ipv4Addr>().is_err() {
            return Err(ApiError::bad_request(format!(
                "Invalid IPv4 address: {}",
                ip
            )));
        }
    }

    let pool = DatabaseManager::pool().await?;
    let admin = security::set_allowed_ips(&pool, context.admin.id, &payload.allowed_ips).await?;
    Ok(ApiResponse::success(admin))
}

/// POST /api/admin/security/cleanup - purge old attempt rows via the
/// store-side retention procedure, using the configured retention.
pub async fn cleanup_attempts() -> ApiResult<Value> {
    let retention_hours = crate::config::config().security.attempt_retention_hours;
    let pool = DatabaseManager::pool().await?;
    security::cleanup_old_attempts(&pool, retention_hours).await?;
    Ok(ApiResponse::success(
        json!({ "cleaned": true, "retention_hours": retention_hours }),
    ))
}
