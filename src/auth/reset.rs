//! Password-reset tokens for openlms.
//!
//! A reset token is a high-entropy random value disclosed to the account
//! holder exactly once (inside an emailed link). Only its SHA-256 digest and
//! an expiry are persisted, so a stored token can never be replayed from the
//! database and redemption is valid at most once.

use rand_core::{OsRng, RngCore};
use sha2::{Digest, Sha256};

/// Reset token lifetime: 15 minutes.
pub const RESET_TOKEN_TTL_SECS: i64 = 15 * 60;

/// Number of random bytes in a reset token.
const RESET_TOKEN_BYTES: usize = 20;

/// A freshly generated reset token.
///
/// `plaintext` is handed to the mail boundary and then dropped; only
/// `digest` and `expires_at` are persisted on the account.
#[derive(Debug, Clone)]
pub struct ResetToken {
    /// The plaintext token (hex). Disclosed once, never stored or logged.
    pub plaintext: String,
    /// SHA-256 digest of the plaintext (hex).
    pub digest: String,
    /// Expiry timestamp, `now + 15 minutes`, formatted for the store.
    pub expires_at: String,
}

/// Generate a new reset token with a 15-minute expiry.
pub fn generate() -> ResetToken {
    let mut bytes = [0u8; RESET_TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    let plaintext = hex::encode(bytes);
    let digest = digest_token(&plaintext);
    let expires_at = (chrono::Utc::now() + chrono::Duration::seconds(RESET_TOKEN_TTL_SECS))
        .format("%Y-%m-%d %H:%M:%S")
        .to_string();

    ResetToken {
        plaintext,
        digest,
        expires_at,
    }
}

/// Compute the stored digest for a plaintext reset token.
pub fn digest_token(plaintext: &str) -> String {
    hex::encode(Sha256::digest(plaintext.as_bytes()))
}
