//! Authentication and authorization for openlms.

pub mod guard;
pub mod password;
pub mod reset;
pub mod token;

pub use guard::{check_role, require_admin, GuardError};
pub use password::{
    hash_password, validate_password, verify_password, PasswordError, MAX_PASSWORD_LENGTH,
    MIN_PASSWORD_LENGTH,
};
pub use reset::{digest_token, generate as generate_reset_token, ResetToken, RESET_TOKEN_TTL_SECS};
pub use token::{Claims, TokenError, TokenService};
