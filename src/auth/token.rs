//! Session token issuance and verification for openlms.
//!
//! Sessions are self-contained signed JWTs (HS256). The server holds only
//! the signing secret; nothing about a session is persisted. Verification
//! checks signature and expiry only and never consults the account store, so
//! a role change after issuance is not reflected until the token expires and
//! a new one is issued.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::db::Role;

/// Token-related errors.
#[derive(Error, Debug)]
pub enum TokenError {
    /// Signature mismatch, malformed structure, or expiry elapsed. The
    /// verifier deliberately does not distinguish these.
    #[error("invalid or expired token")]
    Invalid,

    /// Token could not be signed.
    #[error("token signing failed: {0}")]
    Signing(String),
}

/// JWT claims structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (account ID).
    pub sub: i64,
    /// Account email.
    pub email: String,
    /// Account role.
    pub role: Role,
    /// Issued at timestamp (seconds since epoch).
    pub iat: u64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: u64,
    /// JWT ID (unique identifier).
    pub jti: String,
}

/// Issues and verifies session tokens with a server-held secret.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    expiry_secs: u64,
}

impl TokenService {
    /// Create a new token service from a secret key and token lifetime.
    pub fn new(secret: &str, expiry_secs: u64) -> Self {
        let mut validation = Validation::default();
        validation.validate_exp = true;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            expiry_secs,
        }
    }

    /// The configured token lifetime in seconds.
    pub fn expiry_secs(&self) -> u64 {
        self.expiry_secs
    }

    /// Issue a signed session token for an account.
    pub fn issue(&self, account_id: i64, email: &str, role: Role) -> Result<String, TokenError> {
        let now = chrono::Utc::now().timestamp() as u64;
        let claims = Claims {
            sub: account_id,
            email: email.to_string(),
            role,
            iat: now,
            exp: now + self.expiry_secs,
            jti: uuid::Uuid::new_v4().to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Verify a token and return its claims.
    ///
    /// Returns [`TokenError::Invalid`] on signature mismatch, malformed
    /// structure, or elapsed expiry.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!("token validation failed: {}", e);
                TokenError::Invalid
            })
    }
}
