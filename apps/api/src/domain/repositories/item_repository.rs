use async_trait::async_trait;

use super::RepositoryResult;
use crate::domain::item::{Item, ItemChanges, NewItem};

/// Repository trait for inventory items
#[async_trait]
pub trait ItemRepository: Send + Sync {
    /// One page of items ordered by id
    async fn list(&self, limit: i64, offset: i64) -> RepositoryResult<Vec<Item>>;

    /// Total number of stored items
    async fn count(&self) -> RepositoryResult<i64>;

    /// Find an item by its id
    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Item>>;

    /// All items of one category ordered by id
    async fn find_by_category(&self, category_id: i64) -> RepositoryResult<Vec<Item>>;

    /// Insert an item, returning its id
    ///
    /// Fails with `RepositoryError::UnknownCategory` without writing a row
    /// when the category does not exist.
    async fn create(&self, item: &NewItem) -> RepositoryResult<i64>;

    /// Replace name, description and price, refreshing `updated_at`
    async fn update(&self, id: i64, changes: &ItemChanges) -> RepositoryResult<()>;

    /// Delete an item by id
    async fn delete(&self, id: i64) -> RepositoryResult<()>;
}
