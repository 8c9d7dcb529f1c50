use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Admin roster entry. Created out-of-band by an operator (`basevault admin
/// add`); `is_active = false` revokes access without deleting history.
/// An empty `allowed_ips` list means unrestricted.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AdminUser {
    pub id: Uuid,
    pub user_id: Uuid,
    pub allowed_ips: Vec<String>,
    pub is_active: bool,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Append-only audit row; exactly one is written per gatekeeper invocation,
/// including rate-limited ones.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LoginAttempt {
    pub id: Uuid,
    pub ip_address: String,
    pub user_agent: Option<String>,
    pub success: bool,
    pub created_at: DateTime<Utc>,
}
