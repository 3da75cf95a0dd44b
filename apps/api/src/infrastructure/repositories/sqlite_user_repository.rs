use async_trait::async_trait;
use sqlx::SqlitePool;

use super::rows::UserRow;
use super::{database_error, is_unique_violation};
use crate::domain::repositories::{RepositoryError, RepositoryResult, UserRepository};
use crate::domain::user::{User, Username};

/// SQLite implementation of UserRepository
pub struct SqliteUserRepository {
    pool: SqlitePool,
}

impl SqliteUserRepository {
    /// Creates a new SqliteUserRepository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn create(&self, username: &Username, password_hash: &str) -> RepositoryResult<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (username, password_hash)
            VALUES (?, ?)
            "#,
        )
        .bind(username.as_str())
        .bind(password_hash)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                RepositoryError::Duplicate {
                    entity: "User",
                    value: username.to_string(),
                }
            } else {
                database_error("Failed to create user", e)
            }
        })?;

        Ok(result.last_insert_rowid())
    }

    async fn find_by_username(&self, username: &Username) -> RepositoryResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, password_hash
            FROM users
            WHERE username = ?
            "#,
        )
        .bind(username.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| database_error("Failed to find user by username", e))?;

        row.map(User::try_from).transpose()
    }
}
