// Bearer token issuing and verification
// Tokens are HS256-signed JWTs whose only claims are issue and expiry times

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default lifetime of an issued token
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 3600;

/// Token claims
///
/// # Fields
/// * `iat` - Issue time (seconds since epoch)
/// * `exp` - Expiry time (seconds since epoch)
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Failed to encode token: {0}")]
    Encode(jsonwebtoken::errors::Error),

    #[error("Invalid token: {0}")]
    Invalid(jsonwebtoken::errors::Error),

    #[error("Token expiry is out of range")]
    ExpiryOutOfRange,
}

/// Issues and verifies expiring bearer tokens
///
/// Holds its signing secret; nothing is persisted, so a token stays valid
/// until it expires regardless of what happens to the account.
///
/// # Example
/// ```
/// use inventory_api::auth::TokenService;
///
/// let tokens = TokenService::new(b"your-secret-key");
/// let token = tokens.issue().expect("valid token");
/// assert!(tokens.verify(&token));
/// ```
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl TokenService {
    /// Creates a token service with the default one hour TTL
    pub fn new(secret: &[u8]) -> Self {
        Self::with_ttl(secret, Duration::seconds(DEFAULT_TOKEN_TTL_SECS))
    }

    /// Creates a token service with a custom TTL
    pub fn with_ttl(secret: &[u8], ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            ttl,
        }
    }

    /// Creates a token service signing with a fresh random 32-byte secret
    ///
    /// Tokens issued by one instance are rejected by every other.
    pub fn ephemeral(ttl: Duration) -> Self {
        let mut secret = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut secret);
        Self::with_ttl(&secret, ttl)
    }

    /// Issues a token expiring `ttl` from now
    pub fn issue(&self) -> Result<String, TokenError> {
        let expiry = Utc::now()
            .checked_add_signed(self.ttl)
            .ok_or(TokenError::ExpiryOutOfRange)?;
        self.issue_with_expiry(expiry)
    }

    /// Issues a token with an explicit expiry
    pub fn issue_with_expiry(&self, expiry: DateTime<Utc>) -> Result<String, TokenError> {
        let claims = Claims {
            iat: Utc::now().timestamp(),
            exp: expiry.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(TokenError::Encode)
    }

    /// Decodes a token, checking signature and expiry
    pub fn decode(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(TokenError::Invalid)
    }

    /// Returns false for malformed, forged or expired tokens
    pub fn verify(&self, token: &str) -> bool {
        self.decode(token).is_ok()
    }
}
