use axum::{extract::State, http::StatusCode, Json};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use super::MessageResponse;
use crate::api::errors::ApiError;
use crate::api::extract::{JsonBody, PathId, QueryParams};
use crate::api::middleware::BearerAuth;
use crate::domain::pagination::Pagination;
use crate::domain::repositories::ItemRepository;
use crate::domain::{Item, ItemChanges, NewItem, PageRequest};
use crate::infrastructure::repositories::SqliteItemRepository;

/// Query parameters for the item listing
#[derive(Debug, Default, Deserialize)]
pub struct ListItemsQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// One page of items
#[derive(Debug, Serialize)]
pub struct ItemsPage {
    pub items: Vec<Item>,
    pub pagination: Pagination,
}

/// Request body for creating an item
#[derive(Debug, Deserialize)]
pub struct CreateItemRequest {
    pub category_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
}

/// Request body for updating an item
#[derive(Debug, Deserialize)]
pub struct UpdateItemRequest {
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
}

/// List items a page at a time
///
/// GET /items?page=1&per_page=10
pub async fn list_items(
    State(pool): State<SqlitePool>,
    QueryParams(query): QueryParams<ListItemsQuery>,
) -> Result<Json<ItemsPage>, ApiError> {
    let page = PageRequest::new(query.page, query.per_page).map_err(ApiError::bad_request)?;

    let item_repo = SqliteItemRepository::new(pool);
    let items = item_repo.list(page.per_page(), page.offset()).await?;
    let total_items = item_repo.count().await?;

    Ok(Json(ItemsPage {
        items,
        pagination: page.summarize(total_items),
    }))
}

/// Get an item by ID
///
/// GET /items/:id
pub async fn get_item(
    State(pool): State<SqlitePool>,
    PathId(id): PathId,
) -> Result<Json<Item>, ApiError> {
    let item_repo = SqliteItemRepository::new(pool);
    let item = item_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Item not found"))?;

    Ok(Json(item))
}

/// Create an item
///
/// POST /items
pub async fn create_item(
    State(pool): State<SqlitePool>,
    _auth: BearerAuth,
    JsonBody(req): JsonBody<CreateItemRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let item = NewItem::new(req.category_id, &req.name, req.description, req.price)
        .map_err(ApiError::bad_request)?;

    let item_repo = SqliteItemRepository::new(pool);
    let item_id = item_repo.create(&item).await?;

    tracing::info!(item_id, category_id = item.category_id(), "Item created");

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::with_id("Item created", item_id)),
    ))
}

/// Replace an item's name, description and price
///
/// PUT /items/:id
///
/// The body must be well-formed JSON before the item is looked up, but its
/// fields are only checked once the item is known to exist.
pub async fn update_item(
    State(pool): State<SqlitePool>,
    PathId(id): PathId,
    _auth: BearerAuth,
    JsonBody(body): JsonBody<serde_json::Value>,
) -> Result<Json<MessageResponse>, ApiError> {
    let item_repo = SqliteItemRepository::new(pool);
    if item_repo.find_by_id(id).await?.is_none() {
        return Err(ApiError::not_found("Item not found"));
    }

    let req: UpdateItemRequest = serde_json::from_value(body)
        .map_err(|e| ApiError::bad_request(format!("Invalid JSON body: {}", e)))?;

    let changes =
        ItemChanges::new(&req.name, req.description, req.price).map_err(ApiError::bad_request)?;
    item_repo.update(id, &changes).await?;

    tracing::info!(item_id = id, "Item updated");

    Ok(Json(MessageResponse::new("Item updated")))
}

/// Delete an item
///
/// DELETE /items/:id
pub async fn delete_item(
    State(pool): State<SqlitePool>,
    PathId(id): PathId,
    _auth: BearerAuth,
) -> Result<Json<MessageResponse>, ApiError> {
    let item_repo = SqliteItemRepository::new(pool);
    if item_repo.find_by_id(id).await?.is_none() {
        return Err(ApiError::not_found("Item not found"));
    }

    item_repo.delete(id).await?;

    tracing::info!(item_id = id, "Item deleted");

    Ok(Json(MessageResponse::new("Item deleted")))
}
