// Password hashing utilities
// Passwords are peppered with a server-wide secret, then hashed with bcrypt

use bcrypt::{hash, verify, DEFAULT_COST};
use sha2::{Digest, Sha256};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("Failed to hash password: {0}")]
pub struct PasswordError(#[from] bcrypt::BcryptError);

/// Produces and checks keyed password digests
///
/// The password and the server secret are combined with SHA-256 and the
/// hex digest is bcrypt-hashed, so the stored hash is useless without the
/// secret and stays under bcrypt's 72-byte input limit.
///
/// # Example
/// ```
/// use inventory_api::auth::PasswordHasher;
///
/// let hasher = PasswordHasher::with_cost("server-secret", 4);
/// let hash = hasher.hash("my_password").expect("valid hash");
/// assert!(hasher.check_password(&hash, "my_password"));
/// ```
#[derive(Clone)]
pub struct PasswordHasher {
    secret: String,
    cost: u32,
}

impl std::fmt::Debug for PasswordHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordHasher")
            .field("cost", &self.cost)
            .finish_non_exhaustive()
    }
}

impl PasswordHasher {
    pub fn new(secret: impl Into<String>) -> Self {
        Self::with_cost(secret, DEFAULT_COST)
    }

    pub fn with_cost(secret: impl Into<String>, cost: u32) -> Self {
        Self {
            secret: secret.into(),
            cost,
        }
    }

    fn keyed_digest(&self, password: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(password.as_bytes());
        hasher.update(self.secret.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Hashes a password for storage
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        Ok(hash(self.keyed_digest(password), self.cost)?)
    }

    /// Checks a password against a stored hash
    ///
    /// An unparseable stored hash counts as a mismatch.
    pub fn check_password(&self, password_hash: &str, password: &str) -> bool {
        match verify(self.keyed_digest(password), password_hash) {
            Ok(valid) => valid,
            Err(e) => {
                tracing::warn!(error = %e, "Stored password hash could not be parsed");
                false
            }
        }
    }
}
