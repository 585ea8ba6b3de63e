//! Role-based authorization for openlms.
//!
//! A pure decision over an already-verified session: identity verification
//! (token signature and expiry) always happens first, in the extractor; only
//! then is the role evaluated here. No session is always denied.

use thiserror::Error;

use crate::auth::token::Claims;
use crate::db::Role;

/// Authorization errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GuardError {
    /// No verified session was presented.
    #[error("login required")]
    NotAuthenticated,

    /// The session's role is not in the operation's allowed set.
    #[error("insufficient role for this operation")]
    InsufficientRole,
}

/// Check that a verified session carries one of the allowed roles.
///
/// Stateless and side-effect free. `None` (unauthenticated) is always
/// denied, regardless of the allowed set.
pub fn check_role(session: Option<&Claims>, allowed: &[Role]) -> Result<(), GuardError> {
    let claims = session.ok_or(GuardError::NotAuthenticated)?;

    if allowed.contains(&claims.role) {
        Ok(())
    } else {
        Err(GuardError::InsufficientRole)
    }
}

/// Require an admin session.
pub fn require_admin(session: Option<&Claims>) -> Result<(), GuardError> {
    check_role(session, &[Role::Admin])
}
