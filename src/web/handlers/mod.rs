//! HTTP handlers for the Web API.

pub mod auth;
pub mod course;

use std::sync::Arc;

use crate::auth::TokenService;
use crate::db::Database;
use crate::mail::Mailer;

pub use auth::{
    change_password, forgot_password, login, logout, me, register, reset_password,
};
pub use course::{
    add_lecture, create_course, delete_course, list_courses, list_lectures, update_course,
};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database handle. The sqlx pool inside is already thread-safe.
    pub db: Arc<Database>,
    /// Session token issuer/verifier.
    pub token_service: Arc<TokenService>,
    /// Outbound mail backend.
    pub mailer: Arc<Mailer>,
    /// Base URL of the frontend, used to build reset links.
    pub frontend_url: String,
}

impl AppState {
    /// Create a new application state.
    pub fn new(
        db: Arc<Database>,
        token_service: Arc<TokenService>,
        mailer: Arc<Mailer>,
        frontend_url: impl Into<String>,
    ) -> Self {
        Self {
            db,
            token_service,
            mailer,
            frontend_url: frontend_url.into(),
        }
    }
}
