//! Response DTOs for the Web API.

use serde::Serialize;

use crate::db::Account;

/// Generic success envelope.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

/// Public view of an account.
///
/// Built from the account entity minus credential material: no password
/// hash, no reset fields.
#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: i64,
    #[serde(rename = "fullName")]
    pub full_name: String,
    pub email: String,
    pub role: String,
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

impl From<&Account> for UserInfo {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            full_name: account.full_name.clone(),
            email: account.email.clone(),
            role: account.role.to_string(),
            created_at: account.created_at.clone(),
        }
    }
}

/// Envelope carrying a user object.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub success: bool,
    pub message: String,
    pub user: UserInfo,
}

impl UserResponse {
    pub fn new(message: impl Into<String>, account: &Account) -> Self {
        Self {
            success: true,
            message: message.into(),
            user: UserInfo::from(account),
        }
    }
}
