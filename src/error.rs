// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

/// HTTP API error with appropriate status codes and stable client-facing codes.
///
/// The gatekeeper failure taxonomy (RATE_LIMITED, INVALID_CREDENTIALS,
/// AUTH_FAILED, ACCESS_DENIED, IP_NOT_ALLOWED) gets dedicated variants so the
/// client can render a precise message; everything else uses the generic
/// buckets.
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest(String),

    // 401 Unauthorized
    Unauthorized(String),
    InvalidCredentials,
    AuthFailed,

    // 403 Forbidden
    AccessDenied,
    IpNotAllowed,

    // 404 Not Found
    NotFound(String),

    // 409 Conflict - expected duplicate-rating path
    AlreadyRated,

    // 429 Too Many Requests
    RateLimited,

    // 500 Internal Server Error
    Internal(String),

    // 503 Service Unavailable
    ServiceUnavailable(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ApiError::AuthFailed => StatusCode::UNAUTHORIZED,
            ApiError::AccessDenied => StatusCode::FORBIDDEN,
            ApiError::IpNotAllowed => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::AlreadyRated => StatusCode::CONFLICT,
            ApiError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg) => msg,
            ApiError::Unauthorized(msg) => msg,
            ApiError::InvalidCredentials => "Invalid credentials",
            ApiError::AuthFailed => "Authentication failed",
            ApiError::AccessDenied => "Access denied. Admin privileges required.",
            ApiError::IpNotAllowed => "Access denied from this IP address.",
            ApiError::NotFound(msg) => msg,
            ApiError::AlreadyRated => "You have already rated this base.",
            ApiError::RateLimited => "Too many login attempts. Please try again later.",
            ApiError::Internal(_) => "Internal server error",
            ApiError::ServiceUnavailable(msg) => msg,
        }
    }

    /// Stable code for client-side handling
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::InvalidCredentials => "INVALID_CREDENTIALS",
            ApiError::AuthFailed => "AUTH_FAILED",
            ApiError::AccessDenied => "ACCESS_DENIED",
            ApiError::IpNotAllowed => "IP_NOT_ALLOWED",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::AlreadyRated => "ALREADY_RATED",
            ApiError::RateLimited => "RATE_LIMITED",
            ApiError::Internal(_) => "INTERNAL_ERROR",
            ApiError::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
        }
    }

    /// JSON response body: `{ "error": <message>, "code": <code> }`
    pub fn to_json(&self) -> Value {
        json!({
            "error": self.message(),
            "code": self.error_code(),
        })
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::Internal(message.into())
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        ApiError::ServiceUnavailable(message.into())
    }
}

// Convert store errors to ApiError without leaking internals to clients
impl From<crate::database::manager::DatabaseError> for ApiError {
    fn from(err: crate::database::manager::DatabaseError) -> Self {
        match err {
            crate::database::manager::DatabaseError::NotFound(msg) => ApiError::not_found(msg),
            crate::database::manager::DatabaseError::ConfigMissing(_)
            | crate::database::manager::DatabaseError::InvalidDatabaseUrl => {
                tracing::error!("Database configuration error: {}", err);
                ApiError::service_unavailable("Database temporarily unavailable")
            }
            crate::database::manager::DatabaseError::Sqlx(sqlx_err) => {
                // Log the real error but return generic message
                tracing::error!("SQLx error: {}", sqlx_err);
                ApiError::internal("Internal server error")
            }
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        tracing::error!("SQLx error: {}", err);
        ApiError::internal("Internal server error")
    }
}

impl From<crate::database::ratings::RatingError> for ApiError {
    fn from(err: crate::database::ratings::RatingError) -> Self {
        match err {
            crate::database::ratings::RatingError::AlreadyRated => ApiError::AlreadyRated,
            crate::database::ratings::RatingError::OutOfRange(_) => {
                ApiError::bad_request(err.to_string())
            }
            crate::database::ratings::RatingError::Database(e) => e.into(),
        }
    }
}

impl From<crate::ingest::IngestError> for ApiError {
    fn from(err: crate::ingest::IngestError) -> Self {
        // All ingest failures are validation problems with the uploaded file
        ApiError::bad_request(err.to_string())
    }
}

impl From<crate::auth::JwtError> for ApiError {
    fn from(err: crate::auth::JwtError) -> Self {
        tracing::error!("JWT error: {}", err);
        ApiError::internal("Internal server error")
    }
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status_code(), Json(self.to_json())).into_response()
    }
}
