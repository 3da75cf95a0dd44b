use thiserror::Error;

/// Errors reported by persistence adapters
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("{entity} already exists: {value}")]
    Duplicate { entity: &'static str, value: String },

    #[error("Category does not exist: {0}")]
    UnknownCategory(i64),

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: i64 },

    #[error("Corrupt {column} value in row {id}: {reason}")]
    CorruptRow {
        column: &'static str,
        id: i64,
        reason: String,
    },

    #[error("Database error: {0}")]
    Database(String),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;
