use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

use super::rows::ItemRow;
use super::{database_error, is_foreign_key_violation};
use crate::domain::repositories::{ItemRepository, RepositoryError, RepositoryResult};
use crate::domain::{Item, ItemChanges, NewItem};

/// SQLite implementation of ItemRepository
///
/// Prices are persisted as decimal text and timestamps as RFC 3339 text.
pub struct SqliteItemRepository {
    pool: SqlitePool,
}

impl SqliteItemRepository {
    /// Creates a new SqliteItemRepository
    ///
    /// # Arguments
    /// * `pool` - SQLx connection pool for SQLite
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn into_items(rows: Vec<ItemRow>) -> RepositoryResult<Vec<Item>> {
    rows.into_iter().map(Item::try_from).collect()
}

#[async_trait]
impl ItemRepository for SqliteItemRepository {
    async fn list(&self, limit: i64, offset: i64) -> RepositoryResult<Vec<Item>> {
        let rows = sqlx::query_as::<_, ItemRow>(
            r#"
            SELECT id, category_id, name, description, price, created_at, updated_at
            FROM items
            ORDER BY id
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| database_error("Failed to list items", e))?;

        into_items(rows)
    }

    async fn count(&self) -> RepositoryResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM items")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| database_error("Failed to count items", e))
    }

    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Item>> {
        let row = sqlx::query_as::<_, ItemRow>(
            r#"
            SELECT id, category_id, name, description, price, created_at, updated_at
            FROM items
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| database_error("Failed to find item by id", e))?;

        row.map(Item::try_from).transpose()
    }

    async fn find_by_category(&self, category_id: i64) -> RepositoryResult<Vec<Item>> {
        let rows = sqlx::query_as::<_, ItemRow>(
            r#"
            SELECT id, category_id, name, description, price, created_at, updated_at
            FROM items
            WHERE category_id = ?
            ORDER BY id
            "#,
        )
        .bind(category_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| database_error("Failed to find items by category", e))?;

        into_items(rows)
    }

    async fn create(&self, item: &NewItem) -> RepositoryResult<i64> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| database_error("Failed to begin transaction", e))?;

        let category_found =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM categories WHERE id = ?")
                .bind(item.category_id())
                .fetch_one(&mut *tx)
                .await
                .map_err(|e| database_error("Failed to look up category", e))?;

        if category_found == 0 {
            return Err(RepositoryError::UnknownCategory(item.category_id()));
        }

        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO items (category_id, name, description, price, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(item.category_id())
        .bind(item.name())
        .bind(item.description())
        .bind(item.price().to_string())
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                RepositoryError::UnknownCategory(item.category_id())
            } else {
                database_error("Failed to create item", e)
            }
        })?;

        tx.commit()
            .await
            .map_err(|e| database_error("Failed to commit item", e))?;

        Ok(result.last_insert_rowid())
    }

    async fn update(&self, id: i64, changes: &ItemChanges) -> RepositoryResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE items
            SET name = ?, description = ?, price = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(changes.name())
        .bind(changes.description())
        .bind(changes.price().to_string())
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| database_error("Failed to update item", e))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound { entity: "Item", id });
        }

        Ok(())
    }

    async fn delete(&self, id: i64) -> RepositoryResult<()> {
        let result = sqlx::query("DELETE FROM items WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| database_error("Failed to delete item", e))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound { entity: "Item", id });
        }

        Ok(())
    }
}
