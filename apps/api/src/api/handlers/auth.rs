use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use super::MessageResponse;
use crate::api::errors::ApiError;
use crate::api::extract::JsonBody;
use crate::auth::{PasswordHasher, TokenService};
use crate::domain::repositories::{RepositoryError, UserRepository};
use crate::domain::user::Username;
use crate::infrastructure::repositories::SqliteUserRepository;

/// Request body for registration and login
///
/// Fields are optional so that an absent field yields the same 400 as an
/// empty one.
#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl CredentialsRequest {
    fn validate(self) -> Result<(Username, String), ApiError> {
        let missing = || ApiError::bad_request("Missing required fields");

        let username = self
            .username
            .ok_or_else(missing)
            .and_then(|name| Username::new(name).map_err(|_| missing()))?;
        let password = self.password.filter(|p| !p.is_empty()).ok_or_else(missing)?;

        Ok((username, password))
    }
}

/// Response from successful login
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
}

/// Register a new user
///
/// POST /register
pub async fn register(
    State(pool): State<SqlitePool>,
    State(passwords): State<Arc<PasswordHasher>>,
    JsonBody(req): JsonBody<CredentialsRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let (username, password) = req.validate()?;

    let user_repo = SqliteUserRepository::new(pool);
    if user_repo.find_by_username(&username).await?.is_some() {
        return Err(ApiError::bad_request("Username already exists"));
    }

    // bcrypt blocks for the whole hash
    let password_hash = tokio::task::spawn_blocking(move || passwords.hash(&password))
        .await
        .map_err(|e| ApiError::internal_server_error(format!("Password hashing task failed: {}", e)))?
        .map_err(|e| ApiError::internal_server_error(e.to_string()))?;

    let user_id = user_repo
        .create(&username, &password_hash)
        .await
        .map_err(|e| match e {
            RepositoryError::Duplicate { .. } => ApiError::bad_request("Username already exists"),
            other => ApiError::from(other),
        })?;

    tracing::info!(user_id, username = %username, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::with_id("User created successfully", user_id)),
    ))
}

/// Login with username and password
///
/// POST /login
pub async fn login(
    State(pool): State<SqlitePool>,
    State(passwords): State<Arc<PasswordHasher>>,
    State(tokens): State<Arc<TokenService>>,
    JsonBody(req): JsonBody<CredentialsRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let (username, password) = req.validate()?;

    let user_repo = SqliteUserRepository::new(pool);
    let user = user_repo
        .find_by_username(&username)
        .await?
        .ok_or_else(ApiError::unauthorized)?;

    let password_hash = user.password_hash;
    let valid = tokio::task::spawn_blocking(move || {
        passwords.check_password(&password_hash, &password)
    })
    .await
    .map_err(|e| ApiError::internal_server_error(format!("Password check task failed: {}", e)))?;

    if !valid {
        tracing::debug!(username = %username, "Login rejected");
        return Err(ApiError::unauthorized());
    }

    let token = tokens
        .issue()
        .map_err(|e| ApiError::internal_server_error(e.to_string()))?;

    tracing::info!(user_id = user.id, "User logged in");

    Ok(Json(LoginResponse { token }))
}
