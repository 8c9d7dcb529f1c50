use axum::extract::Path;
use axum::http::HeaderMap;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::fingerprint;
use crate::database::manager::DatabaseManager;
use crate::database::models::rating::{NewRating, Rating};
use crate::database::{catalog, ratings};
use crate::middleware::{ApiResponse, ApiResult};

#[derive(Debug, Deserialize)]
pub struct RatingPayload {
    pub rating: i32,
    /// Client-derived fingerprint; server derives one from IP + user agent
    /// when absent.
    pub fingerprint: Option<String>,
}

/// Best-effort client address: first hop of X-Forwarded-For, if present.
pub fn client_ip(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}

pub fn user_agent(headers: &HeaderMap) -> Option<String> {
    headers
        .get("user-agent")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
}

/// POST /bases/:id/ratings - submit a 1-5 rating.
///
/// A duplicate for the same (base, fingerprint) pair comes back as 409
/// ALREADY_RATED - the expected path, not a failure. The base's average and
/// count are recomputed by the store, so concurrent submissions from
/// different fingerprints all count.
pub async fn submit_rating(
    Path(base_id): Path<Uuid>,
    headers: HeaderMap,
    Json(payload): Json<RatingPayload>,
) -> ApiResult<Rating> {
    let pool = DatabaseManager::pool().await?;

    // 404 before any insert for an unknown base
    catalog::get_base(&pool, base_id).await?;

    let ip_address = client_ip(&headers);
    let agent = user_agent(&headers);
    let browser_fingerprint = payload
        .fingerprint
        .filter(|f| !f.trim().is_empty())
        .unwrap_or_else(|| fingerprint::derive_fingerprint(&ip_address, agent.as_deref()));

    let rating = ratings::insert_rating(
        &pool,
        &NewRating {
            base_id,
            ip_address,
            browser_fingerprint,
            rating: payload.rating,
        },
    )
    .await?;

    Ok(ApiResponse::created(rating))
}
