//! Shared helpers for the Gala integration tests.
//!
//! These tests require:
//! - A running `PostgreSQL` database (migrated via `gala-cli migrate`)
//! - The server running (`cargo run -p gala-server`)
//! - A test admin account, referenced by environment variables
//!
//! Environment:
//! - `GALA_BASE_URL` - API base URL (default: `http://localhost:8000`)
//! - `GALA_TEST_ADMIN_EMAIL` / `GALA_TEST_ADMIN_PASSWORD` - credentials of
//!   an active `admin`-role account created for the test run
//!
//! Run with: `cargo test -p gala-integration-tests -- --ignored`

#![cfg_attr(not(test), forbid(unsafe_code))]

use reqwest::Client;
use serde_json::Value;

/// Base URL for the API (configurable via environment).
#[must_use]
pub fn base_url() -> String {
    std::env::var("GALA_BASE_URL").unwrap_or_else(|_| "http://localhost:8000".to_string())
}

/// HTTP client with a cookie store, so the handshake cookie flows back on
/// the login call the same way a browser would send it.
///
/// # Panics
///
/// Panics if the client cannot be constructed.
#[must_use]
pub fn client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

/// Fetch a handshake value from `GET /auth/csrf-cookie`.
///
/// Returns the cookie value to echo in the `X-CSRF-Token` header; the
/// cookie itself stays in the client's store.
///
/// # Panics
///
/// Panics if the handshake endpoint misbehaves.
pub async fn handshake(client: &Client) -> String {
    let response = client
        .get(format!("{}/auth/csrf-cookie", base_url()))
        .send()
        .await
        .expect("Failed to begin handshake");
    assert_eq!(response.status(), reqwest::StatusCode::NO_CONTENT);

    response
        .headers()
        .get_all(reqwest::header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find_map(|raw| {
            let (name, rest) = raw.split_once('=')?;
            (name == "gala_csrf").then(|| rest.split(';').next().unwrap_or(rest).to_string())
        })
        .expect("handshake response did not set the csrf cookie")
}

/// Log in as the configured test admin and return the bearer token.
///
/// # Panics
///
/// Panics if the credentials are missing from the environment or rejected.
pub async fn login_admin(client: &Client) -> String {
    let email = std::env::var("GALA_TEST_ADMIN_EMAIL")
        .expect("GALA_TEST_ADMIN_EMAIL must be set for integration tests");
    let password = std::env::var("GALA_TEST_ADMIN_PASSWORD")
        .expect("GALA_TEST_ADMIN_PASSWORD must be set for integration tests");

    let proof = handshake(client).await;

    let response = client
        .post(format!("{}/login", base_url()))
        .header("X-CSRF-Token", proof)
        .json(&serde_json::json!({
            "email": email,
            "password": password,
            "device_name": "integration-tests",
        }))
        .send()
        .await
        .expect("Failed to log in");
    assert_eq!(response.status(), reqwest::StatusCode::OK);

    let body: Value = response.json().await.expect("Failed to parse login body");
    body["token"]
        .as_str()
        .expect("login response carries a token")
        .to_string()
}

/// Create a product through the admin surface; returns its id.
///
/// # Panics
///
/// Panics if the create call fails.
pub async fn create_product(client: &Client, token: &str, price: i64) -> i64 {
    let slug = format!("it-{}", uuid::Uuid::new_v4());

    let response = client
        .post(format!("{}/admin/produits", base_url()))
        .bearer_auth(token)
        .json(&serde_json::json!({
            "name": format!("Integration product {slug}"),
            "slug": slug,
            "description": "created by the integration tests",
            "price": price.to_string(),
            "category": "integration",
        }))
        .send()
        .await
        .expect("Failed to create product");
    assert_eq!(response.status(), reqwest::StatusCode::CREATED);

    let body: Value = response.json().await.expect("Failed to parse product body");
    body["data"]["id"].as_i64().expect("product id")
}
