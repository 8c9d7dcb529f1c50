pub mod auth;
pub mod response;

pub use auth::{admin_auth_middleware, AdminContext};
pub use response::{ApiResponse, ApiResult};
