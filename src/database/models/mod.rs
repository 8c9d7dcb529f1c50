pub mod account;
pub mod admin;
pub mod base;
pub mod download;
pub mod rating;
