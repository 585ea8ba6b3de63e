//! Account model for openlms.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Account role for permission decisions.
///
/// A closed enumeration consumed uniformly by the authorization guard;
/// role strings from the store or a token parse into it exactly once at the
/// boundary.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type,
)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Role {
    /// Regular user.
    #[default]
    User,
    /// Administrator.
    Admin,
}

impl Role {
    /// Convert role to its store string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            _ => Err(format!("unknown role: {s}")),
        }
    }
}

/// Account entity representing a registered user.
///
/// `password_hash`, `reset_token_hash` and `reset_token_expiry` never leave
/// the server; response DTOs are built from the other fields only.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Account {
    /// Unique account ID, assigned at creation, immutable.
    pub id: i64,
    /// Full display name.
    pub full_name: String,
    /// Email address (unique, case-insensitive, stored trimmed lowercase).
    pub email: String,
    /// Argon2 hash of the current password.
    pub password_hash: String,
    /// Account role.
    pub role: Role,
    /// SHA-256 digest of the outstanding reset token, if any.
    pub reset_token_hash: Option<String>,
    /// Expiry of the outstanding reset token, if any.
    ///
    /// Set and cleared together with `reset_token_hash`.
    pub reset_token_expiry: Option<String>,
    /// Account creation timestamp.
    pub created_at: String,
    /// Last modification timestamp.
    pub updated_at: String,
}

/// Data for creating a new account.
#[derive(Debug, Clone)]
pub struct NewAccount {
    /// Full display name.
    pub full_name: String,
    /// Email address (pre-normalized: trimmed, lowercase).
    pub email: String,
    /// Argon2 hash of the password (pre-hashed by the caller).
    pub password_hash: String,
    /// Account role (defaults to User).
    pub role: Role,
}

impl NewAccount {
    /// Create a new account record with the default role.
    pub fn new(
        full_name: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            full_name: full_name.into(),
            email: email.into(),
            password_hash: password_hash.into(),
            role: Role::User,
        }
    }

    /// Set the role.
    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_from_str() {
        assert_eq!(Role::from_str("user").unwrap(), Role::User);
        assert_eq!(Role::from_str("admin").unwrap(), Role::Admin);
        assert_eq!(Role::from_str("ADMIN").unwrap(), Role::Admin);
        assert!(Role::from_str("superuser").is_err());
    }

    #[test]
    fn test_role_as_str() {
        assert_eq!(Role::User.as_str(), "user");
        assert_eq!(Role::Admin.as_str(), "admin");
    }

    #[test]
    fn test_role_default() {
        assert_eq!(Role::default(), Role::User);
    }

    #[test]
    fn test_role_display() {
        assert_eq!(format!("{}", Role::Admin), "admin");
    }

    #[test]
    fn test_role_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
        let role: Role = serde_json::from_str("\"user\"").unwrap();
        assert_eq!(role, Role::User);
    }

    #[test]
    fn test_new_account_builder() {
        let account = NewAccount::new("Jane Doe", "jane@x.com", "hash").with_role(Role::Admin);

        assert_eq!(account.full_name, "Jane Doe");
        assert_eq!(account.email, "jane@x.com");
        assert_eq!(account.password_hash, "hash");
        assert_eq!(account.role, Role::Admin);
    }

    #[test]
    fn test_new_account_default_role() {
        let account = NewAccount::new("Jane Doe", "jane@x.com", "hash");
        assert_eq!(account.role, Role::User);
    }
}
