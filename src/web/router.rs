//! Router configuration for the Web API.

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use super::handlers::{
    add_lecture, change_password, create_course, delete_course, forgot_password, list_courses,
    list_lectures, login, logout, me, register, reset_password, update_course, AppState,
};
use super::middleware::{create_cors_layer, session_auth};
use crate::auth::TokenService;

/// Create the main API router.
pub fn create_router(
    app_state: Arc<AppState>,
    token_service: Arc<TokenService>,
    cors_origins: &[String],
) -> Router {
    let user_routes = Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/me", get(me))
        .route("/reset", post(forgot_password))
        .route("/reset/:token", post(reset_password))
        .route("/change-password", post(change_password));

    let course_routes = Router::new()
        .route("/", get(list_courses).post(create_course))
        .route("/:id", put(update_course).delete(delete_course))
        .route("/:id/lectures", get(list_lectures).post(add_lecture));

    let api_routes = Router::new()
        .nest("/user", user_routes)
        .nest("/courses", course_routes);

    let token_service_for_middleware = token_service.clone();

    Router::new()
        .nest("/api/v1", api_routes)
        .merge(create_health_router())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer(cors_origins))
                .layer(middleware::from_fn(move |req, next| {
                    let state = token_service_for_middleware.clone();
                    session_auth(state, req, next)
                })),
        )
        .with_state(app_state)
}

/// Create a health check router.
///
/// Generic over the state so it can merge into a router that has not had
/// its state applied yet.
pub fn create_health_router<S: Clone + Send + Sync + 'static>() -> Router<S> {
    Router::new().route("/health", get(health_check))
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}
