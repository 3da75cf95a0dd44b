use std::sync::Arc;

use axum::extract::FromRef;
use sqlx::SqlitePool;

use crate::auth::{PasswordHasher, TokenService};

/// Shared application state
///
/// Cloned into every request; all fields are cheap handles.
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub tokens: Arc<TokenService>,
    pub passwords: Arc<PasswordHasher>,
}

impl AppState {
    pub fn new(pool: SqlitePool, tokens: TokenService, passwords: PasswordHasher) -> Self {
        Self {
            pool,
            tokens: Arc::new(tokens),
            passwords: Arc::new(passwords),
        }
    }
}

impl FromRef<AppState> for SqlitePool {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}

impl FromRef<AppState> for Arc<TokenService> {
    fn from_ref(state: &AppState) -> Self {
        state.tokens.clone()
    }
}

impl FromRef<AppState> for Arc<PasswordHasher> {
    fn from_ref(state: &AppState) -> Self {
        state.passwords.clone()
    }
}
