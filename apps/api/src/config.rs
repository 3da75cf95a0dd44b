//! Runtime configuration.
//!
//! Values are assembled once at start-up (see `main.rs`) and handed to the
//! components that need them; nothing reads the environment afterwards.

use std::net::SocketAddr;

use chrono::{Duration, Utc};
use thiserror::Error;

use crate::auth::{PasswordHasher, TokenService, DEFAULT_TOKEN_TTL_SECS};

pub const DEFAULT_DATABASE_URL: &str = "sqlite://inventory.db";
pub const DEFAULT_PASSWORD_SECRET: &str = "dev-secret-key";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Token TTL must be a positive number of seconds that fits in a timestamp, got {0}")]
    InvalidTokenTtl(i64),
}

/// Database connection settings.
#[derive(Clone, Debug)]
pub struct DatabaseConfig {
    /// SQLite connection URL; the file is created when missing.
    pub url: String,
    /// Upper bound on pooled connections.
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_DATABASE_URL.to_string(),
            max_connections: 5,
        }
    }
}

/// HTTP listener settings.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

impl ServerConfig {
    /// Converts host and port into a socket address.
    pub fn addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }
}

/// Secrets and parameters for tokens and password digests.
#[derive(Clone)]
pub struct AuthConfig {
    /// Token signing secret; a random per-process secret is used when unset.
    pub token_secret: Option<String>,
    pub token_ttl_secs: i64,
    /// Server-wide secret mixed into every password digest.
    pub password_secret: String,
    pub password_hash_cost: u32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_secret: None,
            token_ttl_secs: DEFAULT_TOKEN_TTL_SECS,
            password_secret: DEFAULT_PASSWORD_SECRET.to_string(),
            password_hash_cost: bcrypt::DEFAULT_COST,
        }
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("token_secret", &self.token_secret.as_ref().map(|_| "<redacted>"))
            .field("token_ttl_secs", &self.token_ttl_secs)
            .field("password_secret", &"<redacted>")
            .field("password_hash_cost", &self.password_hash_cost)
            .finish()
    }
}

impl AuthConfig {
    /// Builds the token service, rejecting a TTL that is not positive or
    /// cannot be added to the current time.
    pub fn token_service(&self) -> Result<TokenService, ConfigError> {
        let ttl = Some(self.token_ttl_secs)
            .filter(|secs| *secs > 0)
            .and_then(Duration::try_seconds)
            .filter(|ttl| Utc::now().checked_add_signed(*ttl).is_some())
            .ok_or(ConfigError::InvalidTokenTtl(self.token_ttl_secs))?;

        Ok(match &self.token_secret {
            Some(secret) => TokenService::with_ttl(secret.as_bytes(), ttl),
            None => {
                tracing::warn!("TOKEN_SECRET not set, signing tokens with a random per-process secret");
                TokenService::ephemeral(ttl)
            }
        })
    }

    pub fn password_hasher(&self) -> PasswordHasher {
        if self.password_secret == DEFAULT_PASSWORD_SECRET {
            tracing::warn!("PASSWORD_SECRET not set, using the development default");
        }
        PasswordHasher::with_cost(self.password_secret.clone(), self.password_hash_cost)
    }
}
