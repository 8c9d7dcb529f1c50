pub mod catalog;
pub mod downloads;
pub mod manager;
pub mod models;
pub mod ratings;
pub mod security;
