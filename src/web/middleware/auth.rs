//! Session extraction middleware.
//!
//! Sessions arrive as the signed JWT in the `token` cookie; a `Bearer`
//! Authorization header is accepted as a fallback for non-browser clients.
//! Verification checks signature and expiry only, it never consults the
//! account store.

use axum::{
    body::Body,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, Request},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;

use crate::auth::{Claims, TokenService};
use crate::web::error::ApiError;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "token";

fn token_from_parts(parts: &Parts) -> Option<String> {
    let jar = CookieJar::from_headers(&parts.headers);
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        return Some(cookie.value().to_string());
    }

    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|header| header.strip_prefix("Bearer "))
        .map(|t| t.to_string())
}

/// Extractor for authenticated users.
///
/// Rejects with 401 when no token is presented or the token fails
/// verification.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut Parts,
        _state: &'life1 S,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            let token = token_from_parts(parts)
                .ok_or_else(|| ApiError::unauthorized("Please log in again"))?;

            let token_service = parts
                .extensions
                .get::<Arc<TokenService>>()
                .ok_or_else(|| ApiError::internal("token service not configured"))?;

            let claims = token_service.verify(&token).map_err(|e| {
                tracing::debug!("session verification failed: {}", e);
                ApiError::unauthorized("Please log in again")
            })?;

            Ok(AuthUser(claims))
        })
    }
}

/// Middleware function to inject the token service into request extensions.
pub async fn session_auth(
    token_service: Arc<TokenService>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    request.extensions_mut().insert(token_service);
    next.run(request).await
}
