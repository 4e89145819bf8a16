//! Test helpers for Web API integration tests.
//!
//! Builds the real router over an in-memory database and offers helpers
//! for registering and authenticating users.

#![allow(dead_code)]

use std::sync::Arc;

use axum_test::TestServer;
use base64::Engine;
use serde_json::{json, Value};

use auth_service::config::WebConfig;
use auth_service::presence::PresencePolicy;
use auth_service::web::handlers::AppState;
use auth_service::web::middleware::JwtState;
use auth_service::web::router::{create_health_router, create_router};
use auth_service::Database;

/// JWT secret used by every test server.
pub const TEST_JWT_SECRET: &str = "test-secret-key-for-testing-only";

/// Default password for helper-registered users.
pub const TEST_PASSWORD: &str = "password123";

/// Create a test configuration.
pub fn create_test_config() -> WebConfig {
    WebConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec![],
        jwt_secret: TEST_JWT_SECRET.to_string(),
        jwt_access_token_expiry_secs: 900,
        jwt_refresh_token_expiry_days: 7,
    }
}

/// Create a test server with an in-memory database.
///
/// The database handle is returned so tests can inspect stored rows.
pub async fn create_test_server() -> (TestServer, Database) {
    create_test_server_with(create_test_config()).await
}

/// Create a test server from the given configuration, skipping validation.
pub async fn create_test_server_with(config: WebConfig) -> (TestServer, Database) {
    let db = Database::open_in_memory()
        .await
        .expect("Failed to create test database");

    let app_state = Arc::new(AppState::new(
        db.clone(),
        &config.jwt_secret,
        config.jwt_access_token_expiry_secs,
        config.jwt_refresh_token_expiry_days,
        PresencePolicy::default(),
    ));
    let jwt_state = Arc::new(JwtState::new(&config.jwt_secret));

    let router =
        create_router(app_state, jwt_state, &config.cors_origins).merge(create_health_router());
    let server = TestServer::new(router).expect("Failed to create test server");

    (server, db)
}

/// A registered user as seen by the tests.
pub struct TestUser {
    pub id: i64,
    pub username: String,
    pub access_token: String,
    pub refresh_token: String,
}

impl TestUser {
    /// `Authorization` header value for this user.
    pub fn bearer(&self) -> String {
        bearer(&self.access_token)
    }
}

/// `Authorization` header value for an access token.
pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

/// Registration body for `username` with default names and password.
pub fn registration_body(username: &str) -> Value {
    json!({
        "username": username,
        "password": TEST_PASSWORD,
        "email": format!("{username}@example.com"),
        "first_name": "Test",
        "last_name": "User"
    })
}

/// Register a user and return its id and tokens.
pub async fn register_user(server: &TestServer, username: &str) -> TestUser {
    let response = server
        .post("/api/auth/register")
        .json(&registration_body(username))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);

    let body: Value = response.json();
    TestUser {
        id: body["data"]["user"]["id"].as_i64().expect("user id"),
        username: username.to_string(),
        access_token: body["data"]["access_token"]
            .as_str()
            .expect("access token")
            .to_string(),
        refresh_token: body["data"]["refresh_token"]
            .as_str()
            .expect("refresh token")
            .to_string(),
    }
}

/// Login and return the response body.
pub async fn login_user(server: &TestServer, username: &str, password: &str) -> Value {
    server
        .post("/api/auth/login")
        .json(&json!({
            "username": username,
            "password": password
        }))
        .await
        .json::<Value>()
}

/// Decode the claims segment of a JWT without verifying it.
pub fn decode_claims(token: &str) -> Value {
    let payload = token.split('.').nth(1).expect("JWT payload segment");
    let bytes = base64::engine::general_purpose::URL_SAFE_NO_PAD
        .decode(payload)
        .expect("base64url payload");
    serde_json::from_slice(&bytes).expect("JSON claims")
}
