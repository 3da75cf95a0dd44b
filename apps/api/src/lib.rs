//! Inventory API Library
//!
//! Categories and items over SQLite, served as plain JSON REST endpoints,
//! with bearer-token authentication on every mutating route.

pub mod api;
pub mod auth;
pub mod config;
pub mod domain;
pub mod infrastructure;
