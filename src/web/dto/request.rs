//! Request DTOs for the Web API.
//!
//! Field names follow the camelCase wire format the frontend sends.

use serde::Deserialize;
use validator::Validate;

/// User registration request.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Full display name.
    #[serde(rename = "fullName")]
    #[validate(length(min = 5, max = 50, message = "Name must be 5 to 50 characters"))]
    pub full_name: String,
    /// Email address.
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
    /// Password (plaintext; validated against the password policy in the
    /// handler, never persisted).
    pub password: String,
}

/// Login request.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address.
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
    /// Password.
    pub password: String,
}

/// Forgot-password request.
#[derive(Debug, Deserialize, Validate)]
pub struct ForgotPasswordRequest {
    /// Email address to send the reset link to.
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
}

/// Password reset request (token travels in the URL path).
#[derive(Debug, Deserialize, Validate)]
pub struct ResetPasswordRequest {
    /// New password.
    pub password: String,
}

/// Change-password request for a logged-in user.
#[derive(Debug, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    /// Current password, re-verified before the change.
    #[serde(rename = "oldPassword")]
    pub old_password: String,
    /// New password.
    #[serde(rename = "newPassword")]
    pub new_password: String,
}

/// Course creation request.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCourseRequest {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    #[validate(length(min = 1, message = "Category is required"))]
    pub category: String,
}

/// Course update request. Omitted fields are left unchanged.
#[derive(Debug, Deserialize, Default, Validate)]
pub struct UpdateCourseRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
}

/// Lecture creation request.
#[derive(Debug, Deserialize, Validate)]
pub struct AddLectureRequest {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[serde(default)]
    pub description: String,
}
