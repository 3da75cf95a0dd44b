// HTTP handlers, one module per resource

pub mod auth;
pub mod categories;
pub mod items;

use serde::Serialize;

use crate::api::errors::ApiError;

/// Body returned by mutating endpoints
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            id: None,
        }
    }

    pub fn with_id(message: impl Into<String>, id: i64) -> Self {
        Self {
            message: message.into(),
            id: Some(id),
        }
    }
}

/// Fallback for unknown paths and unsupported methods
pub async fn not_found() -> ApiError {
    ApiError::not_found("Not Found")
}

/// Health check endpoint
///
/// GET /health
pub async fn health_check() -> &'static str {
    "OK"
}
