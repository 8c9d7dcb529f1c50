use axum::Json;

use crate::auth::identity::PgIdentityProvider;
use crate::database::manager::DatabaseManager;
use crate::error::ApiError;
use crate::gatekeeper::{Gatekeeper, LoginRequest, LoginSuccess, PgAdminStore};

/// POST /auth/admin/login - the admin gatekeeper endpoint.
///
/// Body: `{email, password, ip_address, user_agent?}`. On success returns
/// `{user, session, admin_data}` with status 200; failures return
/// `{error, code}` with one of 401/403/429/500. The CORS preflight never
/// reaches this handler - the CORS layer answers it with no body and no
/// audit row.
pub async fn admin_login(
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginSuccess>, ApiError> {
    let pool = DatabaseManager::pool().await?;

    let gatekeeper = Gatekeeper::new(
        PgIdentityProvider::new(pool.clone()),
        PgAdminStore::new(pool),
    );

    let success = gatekeeper.login(&payload).await?;
    Ok(Json(success))
}
