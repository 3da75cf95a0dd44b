use async_trait::async_trait;

use super::RepositoryResult;
use crate::domain::user::{User, Username};

/// Repository trait for user accounts
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Create a user from an already hashed password, returning its id
    ///
    /// Fails with `RepositoryError::Duplicate` when the username is taken.
    async fn create(&self, username: &Username, password_hash: &str) -> RepositoryResult<i64>;

    /// Find a user by username
    async fn find_by_username(&self, username: &Username) -> RepositoryResult<Option<User>>;
}
