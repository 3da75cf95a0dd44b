// Repository implementations (data access layer)
// Adapters that implement domain repository interfaces over SQLite

mod rows;
pub mod sqlite_category_repository;
pub mod sqlite_item_repository;
pub mod sqlite_user_repository;

pub use sqlite_category_repository::SqliteCategoryRepository;
pub use sqlite_item_repository::SqliteItemRepository;
pub use sqlite_user_repository::SqliteUserRepository;

use crate::domain::repositories::RepositoryError;

/// Whether the error is a UNIQUE constraint violation
fn is_unique_violation(error: &sqlx::Error) -> bool {
    matches!(error, sqlx::Error::Database(db) if db.is_unique_violation())
}

/// Whether the error is a FOREIGN KEY constraint violation
fn is_foreign_key_violation(error: &sqlx::Error) -> bool {
    matches!(error, sqlx::Error::Database(db) if db.is_foreign_key_violation())
}

fn database_error(context: &str, error: sqlx::Error) -> RepositoryError {
    RepositoryError::Database(format!("{}: {}", context, error))
}
