use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One visitor rating for a base. At most one row exists per
/// (base_id, browser_fingerprint) pair; the duplicate insert is the expected
/// "already rated" path.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Rating {
    pub id: Uuid,
    pub base_id: Uuid,
    pub ip_address: String,
    pub browser_fingerprint: String,
    pub rating: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewRating {
    pub base_id: Uuid,
    pub ip_address: String,
    pub browser_fingerprint: String,
    pub rating: i32,
}
