pub mod auth;
pub mod catalog;
pub mod downloads;
pub mod ratings;
