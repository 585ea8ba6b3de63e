//! Web API module for openlms.
//!
//! REST API under `/api/v1`: account registration, login sessions carried in
//! an HttpOnly cookie, password recovery and the course catalogue.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use handlers::AppState;
pub use router::create_router;
pub use server::WebServer;
