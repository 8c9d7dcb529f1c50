use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::admin::AdminUser;
use crate::database::security;

/// Storage seam for the gatekeeper: rate-limit history, the admin roster and
/// the audit log all live behind this trait so the login algorithm can be
/// unit-tested against an in-memory implementation.
#[async_trait]
pub trait AdminStore: Send + Sync {
    /// Attempts recorded for this exact IP within the trailing window.
    async fn count_recent_attempts(
        &self,
        ip_address: &str,
        window_mins: i64,
    ) -> Result<i64, DatabaseError>;

    /// Append one audit row for this invocation.
    async fn record_attempt(
        &self,
        ip_address: &str,
        user_agent: Option<&str>,
        success: bool,
    ) -> Result<(), DatabaseError>;

    /// Active admin row for an authenticated account, if any.
    async fn find_active_admin(&self, user_id: Uuid) -> Result<Option<AdminUser>, DatabaseError>;

    async fn touch_last_login(&self, admin_id: Uuid) -> Result<(), DatabaseError>;
}

pub struct PgAdminStore {
    pool: PgPool,
}

impl PgAdminStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AdminStore for PgAdminStore {
    async fn count_recent_attempts(
        &self,
        ip_address: &str,
        window_mins: i64,
    ) -> Result<i64, DatabaseError> {
        security::count_recent_attempts(&self.pool, ip_address, window_mins).await
    }

    async fn record_attempt(
        &self,
        ip_address: &str,
        user_agent: Option<&str>,
        success: bool,
    ) -> Result<(), DatabaseError> {
        security::insert_attempt(&self.pool, ip_address, user_agent, success).await
    }

    async fn find_active_admin(&self, user_id: Uuid) -> Result<Option<AdminUser>, DatabaseError> {
        security::find_active_admin(&self.pool, user_id).await
    }

    async fn touch_last_login(&self, admin_id: Uuid) -> Result<(), DatabaseError> {
        security::touch_last_login(&self.pool, admin_id).await
    }
}
