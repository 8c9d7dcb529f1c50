use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::admin::{AdminUser, LoginAttempt};

const ADMIN_COLUMNS: &str =
    "id, user_id, allowed_ips, is_active, last_login_at, created_at, updated_at";

/// Count attempts from this exact IP inside the trailing sliding window.
pub async fn count_recent_attempts(
    pool: &PgPool,
    ip_address: &str,
    window_mins: i64,
) -> Result<i64, DatabaseError> {
    let (count,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM admin_login_attempts \
         WHERE ip_address = $1 AND created_at >= now() - ($2 * interval '1 minute')",
    )
    .bind(ip_address)
    .bind(window_mins)
    .fetch_one(pool)
    .await?;

    Ok(count)
}

/// Append one audit row. Called exactly once per gatekeeper invocation.
pub async fn insert_attempt(
    pool: &PgPool,
    ip_address: &str,
    user_agent: Option<&str>,
    success: bool,
) -> Result<(), DatabaseError> {
    sqlx::query(
        "INSERT INTO admin_login_attempts (ip_address, user_agent, success) VALUES ($1, $2, $3)",
    )
    .bind(ip_address)
    .bind(user_agent)
    .bind(success)
    .execute(pool)
    .await?;

    Ok(())
}

/// Recent attempts for the admin security tab, newest first.
pub async fn recent_attempts(pool: &PgPool, limit: i64) -> Result<Vec<LoginAttempt>, DatabaseError> {
    let attempts = sqlx::query_as::<_, LoginAttempt>(
        "SELECT id, ip_address, user_agent, success, created_at \
         FROM admin_login_attempts ORDER BY created_at DESC LIMIT $1",
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(attempts)
}

/// Look up the active admin row for an authenticated account. Inactive rows
/// are invisible here: revocation works by flipping is_active off.
pub async fn find_active_admin(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Option<AdminUser>, DatabaseError> {
    let admin = sqlx::query_as::<_, AdminUser>(&format!(
        "SELECT {} FROM admin_users WHERE user_id = $1 AND is_active = TRUE",
        ADMIN_COLUMNS
    ))
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(admin)
}

pub async fn touch_last_login(pool: &PgPool, admin_id: Uuid) -> Result<(), DatabaseError> {
    sqlx::query("UPDATE admin_users SET last_login_at = now(), updated_at = now() WHERE id = $1")
        .bind(admin_id)
        .execute(pool)
        .await?;

    Ok(())
}

/// Replace an admin's IP allow-list; returns the updated row.
pub async fn set_allowed_ips(
    pool: &PgPool,
    admin_id: Uuid,
    allowed_ips: &[String],
) -> Result<AdminUser, DatabaseError> {
    let admin = sqlx::query_as::<_, AdminUser>(&format!(
        "UPDATE admin_users SET allowed_ips = $2, updated_at = now() \
         WHERE id = $1 RETURNING {}",
        ADMIN_COLUMNS
    ))
    .bind(admin_id)
    .bind(allowed_ips)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound(format!("Admin not found: {}", admin_id)))?;

    Ok(admin)
}

/// Register an account as an admin. Operator-only path, used by the CLI.
pub async fn create_admin(
    pool: &PgPool,
    user_id: Uuid,
    allowed_ips: &[String],
) -> Result<AdminUser, DatabaseError> {
    let admin = sqlx::query_as::<_, AdminUser>(&format!(
        "INSERT INTO admin_users (user_id, allowed_ips, is_active) \
         VALUES ($1, $2, TRUE) RETURNING {}",
        ADMIN_COLUMNS
    ))
    .bind(user_id)
    .bind(allowed_ips)
    .fetch_one(pool)
    .await?;

    Ok(admin)
}

/// Invoke the retention procedure that purges attempt rows older than the
/// given number of hours.
pub async fn cleanup_old_attempts(pool: &PgPool, retention_hours: i64) -> Result<(), DatabaseError> {
    sqlx::query("SELECT cleanup_old_login_attempts($1)")
        .bind(retention_hours)
        .execute(pool)
        .await?;

    Ok(())
}
