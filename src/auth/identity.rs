use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;

use crate::auth::password;
use crate::database::models::account::{Account, AccountInfo};

/// Outcome of a password sign-in attempt.
///
/// `Rejected` covers both unknown email and wrong password so the two are
/// indistinguishable to the caller. `NoUser` is the odd provider state where
/// sign-in neither errored nor produced a user; the gatekeeper reports it
/// with a distinct AUTH_FAILED code.
#[derive(Debug, Clone, PartialEq)]
pub enum SignInOutcome {
    Authenticated(AccountInfo),
    Rejected,
    NoUser,
}

/// Infrastructure failure inside the identity layer (store unreachable,
/// corrupt stored hash). Never reveals whether the account exists.
#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("Identity store error: {0}")]
    Store(String),
}

/// The credential-verification seam. The gatekeeper is generic over this so
/// its control flow can be exercised without a database.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str) -> Result<SignInOutcome, IdentityError>;
}

/// Postgres-backed identity provider verifying argon2 hashes from the
/// accounts table.
pub struct PgIdentityProvider {
    pool: PgPool,
}

impl PgIdentityProvider {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IdentityProvider for PgIdentityProvider {
    async fn sign_in(&self, email: &str, password: &str) -> Result<SignInOutcome, IdentityError> {
        let account = sqlx::query_as::<_, Account>(
            "SELECT id, email, password_hash, created_at FROM accounts WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| IdentityError::Store(e.to_string()))?;

        let Some(account) = account else {
            return Ok(SignInOutcome::Rejected);
        };

        let verified = password::verify_password(password, &account.password_hash)
            .map_err(|e| IdentityError::Store(e.to_string()))?;

        if verified {
            Ok(SignInOutcome::Authenticated(AccountInfo::from(&account)))
        } else {
            Ok(SignInOutcome::Rejected)
        }
    }
}

/// Create an account with a freshly hashed password. Used by the CLI for
/// out-of-band admin provisioning.
pub async fn create_account(
    pool: &PgPool,
    email: &str,
    plain_password: &str,
) -> Result<AccountInfo, IdentityError> {
    let hash =
        password::hash_password(plain_password).map_err(|e| IdentityError::Store(e.to_string()))?;

    let account = sqlx::query_as::<_, Account>(
        "INSERT INTO accounts (email, password_hash) VALUES ($1, $2) \
         RETURNING id, email, password_hash, created_at",
    )
    .bind(email)
    .bind(&hash)
    .fetch_one(pool)
    .await
    .map_err(|e| IdentityError::Store(e.to_string()))?;

    Ok(AccountInfo::from(&account))
}
