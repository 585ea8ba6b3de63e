//! Account and session handlers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use std::sync::Arc;

use crate::auth::{
    digest_token, generate_reset_token, hash_password, validate_password, verify_password,
    PasswordError,
};
use crate::db::{Account, AccountRepository, NewAccount};
use crate::web::dto::{
    ChangePasswordRequest, ForgotPasswordRequest, LoginRequest, MessageResponse, RegisterRequest,
    ResetPasswordRequest, UserResponse, ValidatedJson,
};
use crate::web::error::ApiError;
use crate::web::middleware::{AuthUser, SESSION_COOKIE};

use super::AppState;

/// Generic message for credential mismatches on login. The same text covers
/// unknown email and wrong password so responses do not reveal which.
const LOGIN_MISMATCH: &str = "Email or password does not match";

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Map a password-subsystem error to its API response.
///
/// Policy violations and a wrong password are the caller's fault (400);
/// a hashing failure or an unparseable stored digest is server state gone
/// wrong and must surface as 500, never as an authentication answer.
fn password_error(e: PasswordError) -> ApiError {
    match e {
        PasswordError::TooShort | PasswordError::TooLong | PasswordError::VerificationFailed => {
            ApiError::bad_request(e.to_string())
        }
        PasswordError::InvalidHash | PasswordError::HashError(_) => {
            tracing::error!("password subsystem error: {}", e);
            ApiError::internal("An internal error occurred")
        }
    }
}

/// Like [`password_error`], but with a caller-chosen message for the wrong
/// password case.
fn verify_error(e: PasswordError, mismatch_message: &str) -> ApiError {
    match e {
        PasswordError::VerificationFailed => ApiError::bad_request(mismatch_message),
        other => password_error(other),
    }
}

fn session_cookie(token: String, expiry_secs: u64) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(expiry_secs as i64))
        .build()
}

/// Cookie that clears the session on the client.
fn removal_cookie() -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, ""))
        .path("/")
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::ZERO)
        .build()
}

fn issue_session(state: &AppState, account: &Account) -> Result<Cookie<'static>, ApiError> {
    let token = state
        .token_service
        .issue(account.id, &account.email, account.role)
        .map_err(|e| {
            tracing::error!("failed to issue session token: {}", e);
            ApiError::internal("Failed to create session")
        })?;
    Ok(session_cookie(token, state.token_service.expiry_secs()))
}

/// POST /api/v1/user/register - Create an account and log it in.
pub async fn register(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, CookieJar, Json<UserResponse>), ApiError> {
    validate_password(&req.password).map_err(password_error)?;

    let email = normalize_email(&req.email);
    let repo = AccountRepository::new(state.db.pool());

    if repo.find_by_email(&email).await?.is_some() {
        return Err(ApiError::bad_request("Email already exists"));
    }

    let password_hash = hash_password(&req.password).map_err(password_error)?;

    let account = repo
        .create(&NewAccount::new(req.full_name.trim(), email, password_hash))
        .await?;

    tracing::info!("account registered: {}", account.email);
    let jar = jar.add(issue_session(&state, &account)?);
    Ok((
        StatusCode::CREATED,
        jar,
        Json(UserResponse::new("User registered successfully", &account)),
    ))
}

/// POST /api/v1/user/login - Verify credentials and start a session.
pub async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<(CookieJar, Json<UserResponse>), ApiError> {
    if req.email.trim().is_empty() || req.password.is_empty() {
        return Err(ApiError::bad_request("Email and password are required"));
    }

    let repo = AccountRepository::new(state.db.pool());
    let account = repo
        .find_by_email(&normalize_email(&req.email))
        .await?
        .ok_or_else(|| ApiError::bad_request(LOGIN_MISMATCH))?;

    verify_password(&req.password, &account.password_hash)
        .map_err(|e| verify_error(e, LOGIN_MISMATCH))?;

    tracing::info!("login: {}", account.email);
    let jar = jar.add(issue_session(&state, &account)?);
    Ok((
        jar,
        Json(UserResponse::new("User logged in successfully", &account)),
    ))
}

/// POST /api/v1/user/logout - Clear the session cookie.
///
/// Purely client-side: issued tokens stay valid until expiry, there is no
/// server-side revocation list.
pub async fn logout(jar: CookieJar) -> (CookieJar, Json<MessageResponse>) {
    let jar = jar.add(removal_cookie());
    (jar, Json(MessageResponse::new("User logged out successfully")))
}

/// GET /api/v1/user/me - Current account details.
pub async fn me(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
) -> Result<Json<UserResponse>, ApiError> {
    let repo = AccountRepository::new(state.db.pool());
    let account = repo
        .find_by_id(claims.sub)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Please log in again"))?;

    Ok(Json(UserResponse::new("User details", &account)))
}

/// POST /api/v1/user/reset - Request a password-reset mail.
pub async fn forgot_password(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<ForgotPasswordRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let email = normalize_email(&req.email);
    let repo = AccountRepository::new(state.db.pool());
    let account = repo
        .find_by_email(&email)
        .await?
        .ok_or_else(|| ApiError::bad_request("Email not registered"))?;

    // Digest and expiry are persisted before the mail is attempted; the
    // plaintext only ever leaves the server inside the reset URL.
    let reset = generate_reset_token();
    repo.set_reset_token(account.id, &reset.digest, &reset.expires_at)
        .await?;

    let reset_url = format!(
        "{}/reset-password/{}",
        state.frontend_url.trim_end_matches('/'),
        reset.plaintext
    );

    if let Err(e) = state
        .mailer
        .send_password_reset(&account.email, &account.full_name, &reset_url)
        .await
    {
        tracing::error!("reset mail delivery failed for {}: {}", account.email, e);
        // The stored digest is useless without the plaintext, clear it so
        // the account is not left with an unredeemable token outstanding.
        repo.clear_reset_token(account.id).await?;
        return Err(ApiError::internal("Failed to send reset email"));
    }

    Ok(Json(MessageResponse::new(format!(
        "Reset password token has been sent to {} successfully",
        account.email
    ))))
}

/// POST /api/v1/user/reset/{token} - Redeem a reset token.
pub async fn reset_password(
    State(state): State<Arc<AppState>>,
    Path(token): Path<String>,
    ValidatedJson(req): ValidatedJson<ResetPasswordRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    validate_password(&req.password).map_err(password_error)?;

    // Same response for unknown, expired and already-used tokens.
    let invalid = || ApiError::bad_request("Token is invalid or expired, please try again");

    let digest = digest_token(&token);
    let repo = AccountRepository::new(state.db.pool());
    let account = repo
        .find_by_valid_reset_hash(&digest)
        .await?
        .ok_or_else(invalid)?;

    let password_hash = hash_password(&req.password).map_err(password_error)?;

    // Conditional update makes redemption single-use under concurrency.
    let redeemed = repo
        .complete_reset(account.id, &digest, &password_hash)
        .await?;
    if !redeemed {
        return Err(invalid());
    }

    tracing::info!("password reset completed for {}", account.email);
    Ok(Json(MessageResponse::new("Password changed successfully")))
}

/// POST /api/v1/user/change-password - Change password for a logged-in user.
pub async fn change_password(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    ValidatedJson(req): ValidatedJson<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    if req.old_password.is_empty() || req.new_password.is_empty() {
        return Err(ApiError::bad_request("Old and new password are required"));
    }
    validate_password(&req.new_password).map_err(password_error)?;

    let repo = AccountRepository::new(state.db.pool());
    let account = repo
        .find_by_id(claims.sub)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Please log in again"))?;

    verify_password(&req.old_password, &account.password_hash)
        .map_err(|e| verify_error(e, "Invalid old password"))?;

    let password_hash = hash_password(&req.new_password).map_err(password_error)?;
    repo.update_password(account.id, &password_hash).await?;

    tracing::info!("password changed for {}", account.email);
    Ok(Json(MessageResponse::new("Password changed successfully")))
}
