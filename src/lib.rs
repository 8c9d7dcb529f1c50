pub mod auth;
pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod gatekeeper;
pub mod handlers;
pub mod ingest;
pub mod middleware;
