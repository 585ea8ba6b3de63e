//! openlms - Learning management system backend.
//!
//! Accounts with Argon2-hashed passwords, JWT sessions carried in an
//! HttpOnly cookie, single-use password-reset tokens delivered by mail, and
//! a role-gated course catalogue, served over a REST API.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod mail;
pub mod web;

pub use auth::{
    check_role, digest_token, generate_reset_token, hash_password, require_admin,
    validate_password, verify_password, Claims, GuardError, PasswordError, ResetToken,
    TokenError, TokenService, MAX_PASSWORD_LENGTH, MIN_PASSWORD_LENGTH, RESET_TOKEN_TTL_SECS,
};
pub use config::Config;
pub use db::{Account, AccountRepository, Course, CourseRepository, Database, NewAccount, Role};
pub use error::{LmsError, Result};
pub use mail::Mailer;
pub use web::WebServer;
