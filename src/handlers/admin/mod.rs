pub mod analytics;
pub mod bases;
pub mod import;
pub mod security;
