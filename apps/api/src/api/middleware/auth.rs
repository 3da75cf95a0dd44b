use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};

use crate::api::errors::ApiError;
use crate::auth::TokenService;

const BEARER_PREFIX: &str = "Bearer ";

/// Authentication gate for mutating routes
///
/// Rejects with 401 before the handler body runs when the `Authorization`
/// header is missing, lacks the `Bearer ` prefix, or carries a token the
/// `TokenService` does not verify.
///
/// Usage:
/// ```rust,ignore
/// async fn protected_handler(_auth: BearerAuth) -> Result<String, ApiError> {
///     Ok("authenticated".to_string())
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct BearerAuth;

/// Extracts the token following the `Bearer ` prefix
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix(BEARER_PREFIX))
}

#[async_trait]
impl<S> FromRequestParts<S> for BearerAuth
where
    Arc<TokenService>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers).ok_or_else(|| {
            tracing::debug!(path = %parts.uri.path(), "Missing or malformed authorization header");
            ApiError::unauthorized()
        })?;

        let tokens = Arc::<TokenService>::from_ref(state);
        if !tokens.verify(token) {
            tracing::debug!(path = %parts.uri.path(), "Rejected bearer token");
            return Err(ApiError::unauthorized());
        }

        Ok(BearerAuth)
    }
}
