// Authentication primitives
// Stateless bearer tokens and keyed password digests

pub mod password;
pub mod token;

pub use password::{PasswordError, PasswordHasher};
pub use token::{Claims, TokenError, TokenService, DEFAULT_TOKEN_TTL_SECS};
