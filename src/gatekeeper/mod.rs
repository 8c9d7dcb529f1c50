//! Admin login gatekeeper.
//!
//! One request/response handler that authenticates an administrator:
//! per-IP sliding-window rate limiting, credential verification, admin-role
//! check and optional IP allow-listing, in that strict order, before minting
//! a session. Each step short-circuits. All state lives in the store; the
//! gatekeeper itself is stateless between invocations.

pub mod store;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::auth::identity::{IdentityError, IdentityProvider, SignInOutcome};
use crate::auth::{self, JwtError, Session};
use crate::database::manager::DatabaseError;
use crate::database::models::account::AccountInfo;
use crate::database::models::admin::AdminUser;

pub use store::{AdminStore, PgAdminStore};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    pub ip_address: String,
    pub user_agent: Option<String>,
}

/// Success payload: the identity's user object, session tokens, and the
/// admin roster row.
#[derive(Debug, Serialize)]
pub struct LoginSuccess {
    pub user: AccountInfo,
    pub session: Session,
    pub admin_data: AdminUser,
}

#[derive(Debug, Error)]
pub enum GatekeeperError {
    #[error("Too many login attempts")]
    RateLimited,

    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Identity provider returned no user without an explicit error.
    #[error("Authentication failed")]
    AuthFailed,

    /// Authenticated but not an active admin.
    #[error("Access denied")]
    AccessDenied,

    #[error("IP address not allow-listed")]
    IpNotAllowed,

    #[error(transparent)]
    Identity(#[from] IdentityError),

    #[error(transparent)]
    Store(#[from] DatabaseError),

    #[error(transparent)]
    Session(#[from] JwtError),
}

impl From<GatekeeperError> for crate::error::ApiError {
    fn from(err: GatekeeperError) -> Self {
        use crate::error::ApiError;
        match err {
            GatekeeperError::RateLimited => ApiError::RateLimited,
            GatekeeperError::InvalidCredentials => ApiError::InvalidCredentials,
            GatekeeperError::AuthFailed => ApiError::AuthFailed,
            GatekeeperError::AccessDenied => ApiError::AccessDenied,
            GatekeeperError::IpNotAllowed => ApiError::IpNotAllowed,
            GatekeeperError::Identity(e) => {
                tracing::error!("Identity provider error: {}", e);
                ApiError::internal("Internal server error")
            }
            GatekeeperError::Store(e) => e.into(),
            GatekeeperError::Session(e) => e.into(),
        }
    }
}

pub struct Gatekeeper<I, S> {
    identity: I,
    store: S,
    max_attempts: i64,
    window_mins: i64,
}

impl<I, S> Gatekeeper<I, S>
where
    I: IdentityProvider,
    S: AdminStore,
{
    /// Build with the configured rate-limit threshold and window.
    pub fn new(identity: I, store: S) -> Self {
        let security = &crate::config::config().security;
        Self::with_limits(
            identity,
            store,
            security.rate_limit_max_attempts,
            security.rate_limit_window_mins,
        )
    }

    pub fn with_limits(identity: I, store: S, max_attempts: i64, window_mins: i64) -> Self {
        Self {
            identity,
            store,
            max_attempts,
            window_mins,
        }
    }

    /// Run the login algorithm. Strict order; each step short-circuits.
    ///
    /// The rate-limit count and the attempt insert are separate round trips
    /// with no transaction: a concurrent burst from one IP can momentarily
    /// exceed the threshold before the window catches up.
    pub async fn login(&self, request: &LoginRequest) -> Result<LoginSuccess, GatekeeperError> {
        let ip = request.ip_address.as_str();
        let user_agent = request.user_agent.as_deref();

        info!("Admin login attempt from IP: {}", ip);

        // 1. Rate check before credentials are even looked at. The blocked
        // attempt itself is logged so it counts toward future windows.
        let recent = self
            .store
            .count_recent_attempts(ip, self.window_mins)
            .await?;
        if recent >= self.max_attempts {
            info!("Rate limit exceeded for IP: {}", ip);
            self.log_attempt(ip, user_agent, false).await;
            return Err(GatekeeperError::RateLimited);
        }

        // 2. Credential verification. One audit row regardless of outcome,
        // success = (no auth error) - note NoUser logs success=true.
        let outcome = match self.identity.sign_in(&request.email, &request.password).await {
            Ok(outcome) => outcome,
            Err(err) => {
                self.log_attempt(ip, user_agent, false).await;
                return Err(err.into());
            }
        };

        let account = match outcome {
            SignInOutcome::Rejected => {
                self.log_attempt(ip, user_agent, false).await;
                info!("Failed login attempt for {}", request.email);
                return Err(GatekeeperError::InvalidCredentials);
            }
            SignInOutcome::NoUser => {
                self.log_attempt(ip, user_agent, true).await;
                return Err(GatekeeperError::AuthFailed);
            }
            SignInOutcome::Authenticated(account) => {
                self.log_attempt(ip, user_agent, true).await;
                account
            }
        };

        // 3. Admin-role check. The identity session minted above is not
        // revoked upstream; we simply refuse to hand it back.
        let admin = self
            .store
            .find_active_admin(account.id)
            .await?
            .ok_or_else(|| {
                info!("Non-admin user attempted access: {}", request.email);
                GatekeeperError::AccessDenied
            })?;

        // 4. IP allow-list: exact string match, no CIDR.
        if !admin.allowed_ips.is_empty() && !admin.allowed_ips.iter().any(|a| a == ip) {
            info!("IP not allow-listed for admin {}: {}", request.email, ip);
            return Err(GatekeeperError::IpNotAllowed);
        }

        // 5. Finalize: stamp last login, mint the session.
        self.store.touch_last_login(admin.id).await?;
        let session = auth::issue_session(account.id, &account.email)?;

        info!("Successful admin login: {}", request.email);

        Ok(LoginSuccess {
            user: account,
            session,
            admin_data: admin,
        })
    }

    /// Audit logging is best-effort: a failed insert is logged and never
    /// changes the login outcome.
    async fn log_attempt(&self, ip: &str, user_agent: Option<&str>, success: bool) {
        if let Err(err) = self.store.record_attempt(ip, user_agent, success).await {
            warn!("Failed to record login attempt for {}: {}", ip, err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{Duration, Utc};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use uuid::Uuid;

    struct MockIdentity {
        outcome: SignInOutcome,
        calls: AtomicUsize,
    }

    impl MockIdentity {
        fn new(outcome: SignInOutcome) -> Self {
            Self {
                outcome,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl IdentityProvider for &MockIdentity {
        async fn sign_in(
            &self,
            _email: &str,
            _password: &str,
        ) -> Result<SignInOutcome, IdentityError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.outcome.clone())
        }
    }

    #[derive(Debug, Clone)]
    struct AttemptRow {
        ip: String,
        success: bool,
        at: chrono::DateTime<Utc>,
    }

    #[derive(Default)]
    struct MockStore {
        attempts: Mutex<Vec<AttemptRow>>,
        admin: Option<AdminUser>,
        touched: Mutex<Vec<Uuid>>,
    }

    impl MockStore {
        fn with_admin(admin: AdminUser) -> Self {
            Self {
                admin: Some(admin),
                ..Default::default()
            }
        }

        fn attempt_count(&self) -> usize {
            self.attempts.lock().unwrap().len()
        }

        fn seed_attempts(&self, ip: &str, n: usize, age: Duration) {
            let mut attempts = self.attempts.lock().unwrap();
            for _ in 0..n {
                attempts.push(AttemptRow {
                    ip: ip.to_string(),
                    success: false,
                    at: Utc::now() - age,
                });
            }
        }
    }

    #[async_trait]
    impl AdminStore for &MockStore {
        async fn count_recent_attempts(
            &self,
            ip_address: &str,
            window_mins: i64,
        ) -> Result<i64, DatabaseError> {
            let cutoff = Utc::now() - Duration::minutes(window_mins);
            let attempts = self.attempts.lock().unwrap();
            Ok(attempts
                .iter()
                .filter(|a| a.ip == ip_address && a.at >= cutoff)
                .count() as i64)
        }

        async fn record_attempt(
            &self,
            ip_address: &str,
            _user_agent: Option<&str>,
            success: bool,
        ) -> Result<(), DatabaseError> {
            self.attempts.lock().unwrap().push(AttemptRow {
                ip: ip_address.to_string(),
                success,
                at: Utc::now(),
            });
            Ok(())
        }

        async fn find_active_admin(
            &self,
            user_id: Uuid,
        ) -> Result<Option<AdminUser>, DatabaseError> {
            Ok(self
                .admin
                .as_ref()
                .filter(|a| a.user_id == user_id && a.is_active)
                .cloned())
        }

        async fn touch_last_login(&self, admin_id: Uuid) -> Result<(), DatabaseError> {
            self.touched.lock().unwrap().push(admin_id);
            Ok(())
        }
    }

    fn admin_row(user_id: Uuid, allowed_ips: Vec<String>) -> AdminUser {
        AdminUser {
            id: Uuid::new_v4(),
            user_id,
            allowed_ips,
            is_active: true,
            last_login_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn authenticated(user_id: Uuid) -> SignInOutcome {
        SignInOutcome::Authenticated(AccountInfo {
            id: user_id,
            email: "admin@example.com".to_string(),
        })
    }

    fn request(ip: &str) -> LoginRequest {
        LoginRequest {
            email: "admin@example.com".to_string(),
            password: "password".to_string(),
            ip_address: ip.to_string(),
            user_agent: Some("test-agent".to_string()),
        }
    }

    #[tokio::test]
    async fn sixth_attempt_within_window_is_rate_limited() {
        let identity = MockIdentity::new(SignInOutcome::Rejected);
        let store = MockStore::default();
        let gatekeeper = Gatekeeper::with_limits(&identity, &store, 5, 60);

        // First 5 reach credential checking
        for _ in 0..5 {
            let result = gatekeeper.login(&request("9.9.9.9")).await;
            assert!(matches!(result, Err(GatekeeperError::InvalidCredentials)));
        }
        assert_eq!(identity.calls.load(Ordering::SeqCst), 5);

        // 6th is blocked before credentials, and the blocked attempt is
        // itself logged so it counts toward future windows
        let result = gatekeeper.login(&request("9.9.9.9")).await;
        assert!(matches!(result, Err(GatekeeperError::RateLimited)));
        assert_eq!(identity.calls.load(Ordering::SeqCst), 5);
        assert_eq!(store.attempt_count(), 6);
    }

    #[tokio::test]
    async fn attempts_outside_the_sliding_window_do_not_count() {
        let user_id = Uuid::new_v4();
        let identity = MockIdentity::new(authenticated(user_id));
        let store = MockStore::with_admin(admin_row(user_id, vec![]));
        store.seed_attempts("9.9.9.9", 5, Duration::minutes(61));

        let gatekeeper = Gatekeeper::with_limits(&identity, &store, 5, 60);
        let result = gatekeeper.login(&request("9.9.9.9")).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn rate_limit_is_per_ip() {
        let identity = MockIdentity::new(SignInOutcome::Rejected);
        let store = MockStore::default();
        store.seed_attempts("9.9.9.9", 5, Duration::minutes(1));

        let gatekeeper = Gatekeeper::with_limits(&identity, &store, 5, 60);
        // A different IP still reaches credential checking
        let result = gatekeeper.login(&request("8.8.8.8")).await;
        assert!(matches!(result, Err(GatekeeperError::InvalidCredentials)));
        assert_eq!(identity.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn inactive_admin_is_denied_without_a_session() {
        let user_id = Uuid::new_v4();
        let identity = MockIdentity::new(authenticated(user_id));
        let mut admin = admin_row(user_id, vec![]);
        admin.is_active = false;
        let store = MockStore::with_admin(admin);

        let gatekeeper = Gatekeeper::with_limits(&identity, &store, 5, 60);
        let result = gatekeeper.login(&request("1.2.3.4")).await;
        assert!(matches!(result, Err(GatekeeperError::AccessDenied)));
        assert!(store.touched.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn non_listed_ip_is_rejected() {
        let user_id = Uuid::new_v4();
        let identity = MockIdentity::new(authenticated(user_id));
        let store = MockStore::with_admin(admin_row(user_id, vec!["1.2.3.4".to_string()]));

        let gatekeeper = Gatekeeper::with_limits(&identity, &store, 5, 60);
        let result = gatekeeper.login(&request("5.6.7.8")).await;
        assert!(matches!(result, Err(GatekeeperError::IpNotAllowed)));
        assert!(store.touched.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn empty_allow_list_is_unrestricted_and_stamps_last_login() {
        let user_id = Uuid::new_v4();
        let identity = MockIdentity::new(authenticated(user_id));
        let store = MockStore::with_admin(admin_row(user_id, vec![]));

        let gatekeeper = Gatekeeper::with_limits(&identity, &store, 5, 60);
        let success = gatekeeper.login(&request("5.6.7.8")).await.unwrap();

        assert_eq!(success.user.id, user_id);
        assert!(!success.session.access_token.is_empty());
        assert_eq!(store.touched.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn every_invocation_writes_exactly_one_attempt_row() {
        let user_id = Uuid::new_v4();

        // Success
        let identity = MockIdentity::new(authenticated(user_id));
        let store = MockStore::with_admin(admin_row(user_id, vec![]));
        let gatekeeper = Gatekeeper::with_limits(&identity, &store, 5, 60);
        gatekeeper.login(&request("1.1.1.1")).await.unwrap();
        assert_eq!(store.attempt_count(), 1);
        assert!(store.attempts.lock().unwrap()[0].success);

        // Rejection
        let identity = MockIdentity::new(SignInOutcome::Rejected);
        let store = MockStore::default();
        let gatekeeper = Gatekeeper::with_limits(&identity, &store, 5, 60);
        let _ = gatekeeper.login(&request("1.1.1.1")).await;
        assert_eq!(store.attempt_count(), 1);
        assert!(!store.attempts.lock().unwrap()[0].success);

        // Denied admin check still logged the (successful) credential step
        let identity = MockIdentity::new(authenticated(user_id));
        let store = MockStore::default();
        let gatekeeper = Gatekeeper::with_limits(&identity, &store, 5, 60);
        let result = gatekeeper.login(&request("1.1.1.1")).await;
        assert!(matches!(result, Err(GatekeeperError::AccessDenied)));
        assert_eq!(store.attempt_count(), 1);
        assert!(store.attempts.lock().unwrap()[0].success);
    }

    #[tokio::test]
    async fn provider_without_user_or_error_maps_to_auth_failed() {
        let identity = MockIdentity::new(SignInOutcome::NoUser);
        let store = MockStore::default();
        let gatekeeper = Gatekeeper::with_limits(&identity, &store, 5, 60);

        let result = gatekeeper.login(&request("1.1.1.1")).await;
        assert!(matches!(result, Err(GatekeeperError::AuthFailed)));
        // success = (no auth error), so the audit row records true
        assert_eq!(store.attempt_count(), 1);
        assert!(store.attempts.lock().unwrap()[0].success);
    }
}
