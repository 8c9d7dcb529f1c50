use axum::{
    extract::Request,
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::auth;
use crate::database::manager::DatabaseManager;
use crate::database::models::admin::AdminUser;
use crate::database::security;
use crate::error::ApiError;

/// Authenticated admin context injected into protected requests.
///
/// The admin row is re-read from the store on every request rather than
/// trusting anything the client holds: flipping is_active off locks an admin
/// out immediately, valid session token or not.
#[derive(Clone, Debug)]
pub struct AdminContext {
    pub account_id: Uuid,
    pub email: String,
    pub admin: AdminUser,
}

/// Session-validation middleware for the /api/admin surface.
pub async fn admin_auth_middleware(
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(&headers).map_err(ApiError::unauthorized)?;

    let claims = auth::validate_jwt(&token)
        .map_err(|e| ApiError::unauthorized(format!("Invalid session: {}", e)))?;

    // Per-request admin re-validation
    let pool = DatabaseManager::pool().await?;
    let admin = security::find_active_admin(&pool, claims.sub)
        .await?
        .ok_or(ApiError::AccessDenied)?;

    let context = AdminContext {
        account_id: claims.sub,
        email: claims.email,
        admin,
    };
    request.extensions_mut().insert(context);

    Ok(next.run(request).await)
}

/// Extract the token from an `Authorization: Bearer ...` header
fn extract_bearer_token(headers: &HeaderMap) -> Result<String, String> {
    let auth_header = headers
        .get("authorization")
        .ok_or_else(|| "Missing Authorization header".to_string())?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format".to_string())?;

    if let Some(token) = auth_str.strip_prefix("Bearer ") {
        if token.trim().is_empty() {
            return Err("Empty session token".to_string());
        }
        Ok(token.to_string())
    } else {
        Err("Authorization header must use Bearer token format".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn bearer_extraction() {
        let mut headers = HeaderMap::new();
        assert!(extract_bearer_token(&headers).is_err());

        headers.insert("authorization", HeaderValue::from_static("Basic abc"));
        assert!(extract_bearer_token(&headers).is_err());

        headers.insert("authorization", HeaderValue::from_static("Bearer "));
        assert!(extract_bearer_token(&headers).is_err());

        headers.insert("authorization", HeaderValue::from_static("Bearer tok123"));
        assert_eq!(extract_bearer_token(&headers).unwrap(), "tok123");
    }
}
