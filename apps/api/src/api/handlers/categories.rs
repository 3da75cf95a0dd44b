use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use sqlx::SqlitePool;

use super::MessageResponse;
use crate::api::errors::ApiError;
use crate::api::extract::{JsonBody, PathId};
use crate::api::middleware::BearerAuth;
use crate::domain::repositories::{CategoryRepository, ItemRepository};
use crate::domain::{Category, CategoryName, CategoryWithItems, Item};
use crate::infrastructure::repositories::{SqliteCategoryRepository, SqliteItemRepository};

/// Request body for creating a category
#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
}

/// List every category with its items
///
/// GET /categories
pub async fn list_categories(
    State(pool): State<SqlitePool>,
) -> Result<Json<Vec<CategoryWithItems>>, ApiError> {
    let category_repo = SqliteCategoryRepository::new(pool);
    Ok(Json(category_repo.list_with_items().await?))
}

/// List category ids and names
///
/// GET /categories/names
pub async fn list_category_names(
    State(pool): State<SqlitePool>,
) -> Result<Json<Vec<Category>>, ApiError> {
    let category_repo = SqliteCategoryRepository::new(pool);
    Ok(Json(category_repo.list().await?))
}

/// List the items of one category
///
/// GET /categories/:id/items
pub async fn list_category_items(
    State(pool): State<SqlitePool>,
    PathId(category_id): PathId,
) -> Result<Json<Vec<Item>>, ApiError> {
    let item_repo = SqliteItemRepository::new(pool);
    let items = item_repo.find_by_category(category_id).await?;

    if items.is_empty() {
        return Err(ApiError::not_found("No items found in this category"));
    }

    Ok(Json(items))
}

/// Create a category
///
/// POST /categories
pub async fn create_category(
    State(pool): State<SqlitePool>,
    _auth: BearerAuth,
    JsonBody(req): JsonBody<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let name = CategoryName::new(&req.name).map_err(ApiError::bad_request)?;

    let category_repo = SqliteCategoryRepository::new(pool);
    let category_id = category_repo.create(&name).await?;

    tracing::info!(category_id, name = %name, "Category created");

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::with_id(
            "Category created successfully",
            category_id,
        )),
    ))
}
