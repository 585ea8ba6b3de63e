//! Web API course tests.
//!
//! Integration tests for the course catalogue, focused on the role gate:
//! writes are admin-only, reads need at most a login.

use axum::http::header::AUTHORIZATION;
use axum_test::{TestResponse, TestServer};
use openlms::auth::TokenService;
use openlms::db::{AccountRepository, Role};
use openlms::mail::Mailer;
use openlms::web::handlers::AppState;
use openlms::web::router::create_router;
use openlms::Database;
use serde_json::{json, Value};
use std::sync::Arc;

const TEST_SECRET: &str = "test-secret-key-for-testing-only";

async fn create_test_server() -> (TestServer, Arc<Database>) {
    let db = Arc::new(
        Database::open_in_memory()
            .await
            .expect("Failed to create test database"),
    );
    let token_service = Arc::new(TokenService::new(TEST_SECRET, 900));

    let app_state = Arc::new(AppState::new(
        db.clone(),
        token_service.clone(),
        Arc::new(Mailer::Disabled),
        "http://localhost:3000",
    ));

    let router = create_router(app_state, token_service, &[]);
    let server = TestServer::new(router).expect("Failed to create test server");

    (server, db)
}

fn session_token(response: &TestResponse) -> String {
    response
        .headers()
        .get_all("set-cookie")
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find_map(|cookie| {
            let (name_value, _) = cookie.split_once(';').unwrap_or((cookie, ""));
            let (name, value) = name_value.split_once('=')?;
            (name.trim() == "token" && !value.is_empty()).then(|| value.to_string())
        })
        .expect("session cookie must be set")
}

/// Register an account and return its session token.
async fn register(server: &TestServer, name: &str, email: &str) -> String {
    let response = server
        .post("/api/v1/user/register")
        .json(&json!({
            "fullName": name,
            "email": email,
            "password": "password123"
        }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);
    session_token(&response)
}

/// Register an account, promote it to admin, and log in again so the new
/// session carries the admin role.
async fn register_admin(server: &TestServer, db: &Database, email: &str) -> String {
    register(server, "Site Admin", email).await;

    let repo = AccountRepository::new(db.pool());
    let account = repo.find_by_email(email).await.unwrap().unwrap();
    repo.update_role(account.id, Role::Admin).await.unwrap();

    // The pre-promotion token still says "user"; roles are read from the
    // token, so a fresh login is needed to pick up the change.
    let response = server
        .post("/api/v1/user/login")
        .json(&json!({"email": email, "password": "password123"}))
        .await;
    response.assert_status_ok();
    session_token(&response)
}

async fn create_course(server: &TestServer, token: &str) -> i64 {
    let response = server
        .post("/api/v1/courses")
        .add_header(AUTHORIZATION, format!("Bearer {}", token))
        .json(&json!({
            "title": "Intro to Rust",
            "description": "Ownership and borrowing",
            "category": "programming"
        }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);
    let body: Value = response.json();
    body["course"]["id"].as_i64().unwrap()
}

// ============================================================================
// Role gate
// ============================================================================

#[tokio::test]
async fn test_create_course_as_admin() {
    let (server, db) = create_test_server().await;
    let admin = register_admin(&server, &db, "admin@example.com").await;

    let id = create_course(&server, &admin).await;
    assert!(id > 0);
}

#[tokio::test]
async fn test_create_course_as_user_forbidden() {
    let (server, _db) = create_test_server().await;
    let user = register(&server, "Jane Richards", "jane@example.com").await;

    let response = server
        .post("/api/v1/courses")
        .add_header(AUTHORIZATION, format!("Bearer {}", user))
        .json(&json!({
            "title": "Intro to Rust",
            "description": "Ownership and borrowing",
            "category": "programming"
        }))
        .await;
    response.assert_status_forbidden();
}

#[tokio::test]
async fn test_create_course_unauthenticated() {
    let (server, _db) = create_test_server().await;

    let response = server
        .post("/api/v1/courses")
        .json(&json!({
            "title": "Intro to Rust",
            "description": "Ownership and borrowing",
            "category": "programming"
        }))
        .await;
    response.assert_status_unauthorized();
}

#[tokio::test]
async fn test_stale_token_keeps_old_role() {
    let (server, db) = create_test_server().await;
    let before_promotion = register(&server, "Jane Richards", "jane@example.com").await;

    let repo = AccountRepository::new(db.pool());
    let account = repo.find_by_email("jane@example.com").await.unwrap().unwrap();
    repo.update_role(account.id, Role::Admin).await.unwrap();

    // Role comes from the token, not the store, so the old session is still
    // a plain user until it is reissued.
    let response = server
        .post("/api/v1/courses")
        .add_header(AUTHORIZATION, format!("Bearer {}", before_promotion))
        .json(&json!({
            "title": "Intro to Rust",
            "description": "Ownership and borrowing",
            "category": "programming"
        }))
        .await;
    response.assert_status_forbidden();
}

// ============================================================================
// CRUD
// ============================================================================

#[tokio::test]
async fn test_list_courses_is_public() {
    let (server, db) = create_test_server().await;
    let admin = register_admin(&server, &db, "admin@example.com").await;
    create_course(&server, &admin).await;

    let response = server.get("/api/v1/courses").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["courses"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_update_course() {
    let (server, db) = create_test_server().await;
    let admin = register_admin(&server, &db, "admin@example.com").await;
    let id = create_course(&server, &admin).await;

    let response = server
        .put(&format!("/api/v1/courses/{id}"))
        .add_header(AUTHORIZATION, format!("Bearer {}", admin))
        .json(&json!({"title": "Advanced Rust"}))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["course"]["title"], "Advanced Rust");
    // Untouched fields survive a partial update
    assert_eq!(body["course"]["description"], "Ownership and borrowing");
}

#[tokio::test]
async fn test_update_missing_course() {
    let (server, db) = create_test_server().await;
    let admin = register_admin(&server, &db, "admin@example.com").await;

    let response = server
        .put("/api/v1/courses/999")
        .add_header(AUTHORIZATION, format!("Bearer {}", admin))
        .json(&json!({"title": "Advanced Rust"}))
        .await;
    response.assert_status_not_found();
}

#[tokio::test]
async fn test_delete_course() {
    let (server, db) = create_test_server().await;
    let admin = register_admin(&server, &db, "admin@example.com").await;
    let id = create_course(&server, &admin).await;

    let response = server
        .delete(&format!("/api/v1/courses/{id}"))
        .add_header(AUTHORIZATION, format!("Bearer {}", admin))
        .await;
    response.assert_status_ok();

    let response = server.get("/api/v1/courses").await;
    let body: Value = response.json();
    assert!(body["courses"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_course_as_user_forbidden() {
    let (server, db) = create_test_server().await;
    let admin = register_admin(&server, &db, "admin@example.com").await;
    let id = create_course(&server, &admin).await;

    let user = register(&server, "Jane Richards", "jane@example.com").await;
    let response = server
        .delete(&format!("/api/v1/courses/{id}"))
        .add_header(AUTHORIZATION, format!("Bearer {}", user))
        .await;
    response.assert_status_forbidden();
}

// ============================================================================
// Lectures
// ============================================================================

#[tokio::test]
async fn test_add_and_list_lectures() {
    let (server, db) = create_test_server().await;
    let admin = register_admin(&server, &db, "admin@example.com").await;
    let id = create_course(&server, &admin).await;

    for title in ["Getting started", "Structs and enums"] {
        let response = server
            .post(&format!("/api/v1/courses/{id}/lectures"))
            .add_header(AUTHORIZATION, format!("Bearer {}", admin))
            .json(&json!({"title": title, "description": "..."}))
            .await;
        response.assert_status(axum::http::StatusCode::CREATED);
    }

    // Any logged-in user can read lectures
    let user = register(&server, "Jane Richards", "jane@example.com").await;
    let response = server
        .get(&format!("/api/v1/courses/{id}/lectures"))
        .add_header(AUTHORIZATION, format!("Bearer {}", user))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    let lectures = body["lectures"].as_array().unwrap();
    assert_eq!(lectures.len(), 2);
    assert_eq!(lectures[0]["title"], "Getting started");
    assert_eq!(lectures[1]["title"], "Structs and enums");
}

#[tokio::test]
async fn test_list_lectures_requires_login() {
    let (server, db) = create_test_server().await;
    let admin = register_admin(&server, &db, "admin@example.com").await;
    let id = create_course(&server, &admin).await;

    let response = server.get(&format!("/api/v1/courses/{id}/lectures")).await;
    response.assert_status_unauthorized();
}

#[tokio::test]
async fn test_add_lecture_as_user_forbidden() {
    let (server, db) = create_test_server().await;
    let admin = register_admin(&server, &db, "admin@example.com").await;
    let id = create_course(&server, &admin).await;

    let user = register(&server, "Jane Richards", "jane@example.com").await;
    let response = server
        .post(&format!("/api/v1/courses/{id}/lectures"))
        .add_header(AUTHORIZATION, format!("Bearer {}", user))
        .json(&json!({"title": "Sneaky lecture"}))
        .await;
    response.assert_status_forbidden();
}

#[tokio::test]
async fn test_add_lecture_to_missing_course() {
    let (server, db) = create_test_server().await;
    let admin = register_admin(&server, &db, "admin@example.com").await;

    let response = server
        .post("/api/v1/courses/999/lectures")
        .add_header(AUTHORIZATION, format!("Bearer {}", admin))
        .json(&json!({"title": "Lost lecture"}))
        .await;
    response.assert_status_not_found();
}
