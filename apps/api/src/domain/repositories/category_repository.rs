use async_trait::async_trait;

use super::RepositoryResult;
use crate::domain::category::{Category, CategoryName, CategoryWithItems};

/// Repository trait for categories
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// All categories ordered by id
    async fn list(&self) -> RepositoryResult<Vec<Category>>;

    /// All categories, each with the items filed under it
    async fn list_with_items(&self) -> RepositoryResult<Vec<CategoryWithItems>>;

    /// Create a category, returning its id
    ///
    /// Fails with `RepositoryError::Duplicate` when the name is taken.
    async fn create(&self, name: &CategoryName) -> RepositoryResult<i64>;
}
