use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::DatabaseError;

/// Append a download log row and bump the base's counter through the
/// server-side `increment_download_count` procedure. The procedure does an
/// atomic in-place UPDATE, so concurrent downloads never lose increments the
/// way a client read-increment-write would.
pub async fn record_download(
    pool: &PgPool,
    base_id: Uuid,
    ip_address: &str,
    user_agent: Option<&str>,
) -> Result<(), DatabaseError> {
    sqlx::query("INSERT INTO downloads (base_id, ip_address, user_agent) VALUES ($1, $2, $3)")
        .bind(base_id)
        .bind(ip_address)
        .bind(user_agent)
        .execute(pool)
        .await?;

    sqlx::query("SELECT increment_download_count($1)")
        .bind(base_id)
        .execute(pool)
        .await?;

    Ok(())
}
