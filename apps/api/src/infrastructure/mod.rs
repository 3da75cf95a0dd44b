// Infrastructure layer module
// SQLite connection handling, schema management and repository adapters
// Follows Hexagonal Architecture

pub mod database;
pub mod repositories;
