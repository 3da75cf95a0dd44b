use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::SqlitePool;

use super::rows::ItemSummaryRow;
use super::{database_error, is_unique_violation};
use crate::domain::repositories::{CategoryRepository, RepositoryError, RepositoryResult};
use crate::domain::{Category, CategoryName, CategoryWithItems, ItemSummary};

/// SQLite implementation of CategoryRepository
pub struct SqliteCategoryRepository {
    pool: SqlitePool,
}

impl SqliteCategoryRepository {
    /// Creates a new SqliteCategoryRepository
    ///
    /// # Arguments
    /// * `pool` - SQLx connection pool for SQLite
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CategoryRepository for SqliteCategoryRepository {
    async fn list(&self) -> RepositoryResult<Vec<Category>> {
        let rows = sqlx::query_as::<_, (i64, String)>(
            r#"
            SELECT id, name
            FROM categories
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| database_error("Failed to list categories", e))?;

        Ok(rows
            .into_iter()
            .map(|(id, name)| Category { id, name })
            .collect())
    }

    async fn list_with_items(&self) -> RepositoryResult<Vec<CategoryWithItems>> {
        let categories = self.list().await?;

        let rows = sqlx::query_as::<_, ItemSummaryRow>(
            r#"
            SELECT id, category_id, name, description, price
            FROM items
            ORDER BY category_id, id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| database_error("Failed to list category items", e))?;

        let mut items_by_category: HashMap<i64, Vec<ItemSummary>> = HashMap::new();
        for row in rows {
            let category_id = row.category_id;
            items_by_category
                .entry(category_id)
                .or_default()
                .push(ItemSummary::try_from(row)?);
        }

        Ok(categories
            .into_iter()
            .map(|category| CategoryWithItems {
                items: items_by_category.remove(&category.id).unwrap_or_default(),
                id: category.id,
                name: category.name,
            })
            .collect())
    }

    async fn create(&self, name: &CategoryName) -> RepositoryResult<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO categories (name)
            VALUES (?)
            "#,
        )
        .bind(name.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                RepositoryError::Duplicate {
                    entity: "Category",
                    value: name.to_string(),
                }
            } else {
                database_error("Failed to create category", e)
            }
        })?;

        Ok(result.last_insert_rowid())
    }
}
