//! Integration tests for the gated order lifecycle.
//!
//! Run with: `cargo test -p gala-integration-tests -- --ignored`

use reqwest::StatusCode;
use serde_json::{Value, json};

use gala_integration_tests::{base_url, client, create_product, login_admin};

/// Place a minimal order and return its id.
async fn place_order(client: &reqwest::Client, token: &str) -> i64 {
    let product = create_product(client, token, 5000).await;

    let response = client
        .post(format!("{}/commandes", base_url()))
        .json(&json!({
            "client_name": "Jean Dupont",
            "client_email": "jean@x.com",
            "client_phone": "0700000000",
            "produits": [{"id": product, "quantity": 1}],
        }))
        .send()
        .await
        .expect("Failed to place order");
    assert_eq!(response.status(), StatusCode::CREATED);

    let body: Value = response.json().await.expect("Failed to parse order");
    body["data"]["commande"]["id"].as_i64().expect("order id")
}

async fn set_status(
    client: &reqwest::Client,
    token: &str,
    id: i64,
    status: &str,
    override_requested: bool,
) -> reqwest::Response {
    client
        .put(format!("{}/admin/commandes/{id}", base_url()))
        .bearer_auth(token)
        .json(&json!({"status": status, "override": override_requested}))
        .send()
        .await
        .expect("Failed to update status")
}

#[tokio::test]
#[ignore = "Requires a running gala-server and a migrated database"]
async fn test_status_change_requires_a_token() {
    let client = client();

    let response = client
        .put(format!("{}/admin/commandes/1", base_url()))
        .json(&json!({"status": "confirmed"}))
        .send()
        .await
        .expect("Failed to send update");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires a running gala-server and a migrated database"]
async fn test_pending_order_can_be_confirmed() {
    let client = client();
    let token = login_admin(&client).await;
    let id = place_order(&client, &token).await;

    let response = set_status(&client, &token, id, "confirmed", false).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.expect("Failed to parse order");
    assert_eq!(body["data"]["status"], json!("confirmed"));

    // Reflected on the public tracking read as well.
    let response = client
        .get(format!("{}/commandes/{id}", base_url()))
        .send()
        .await
        .expect("Failed to fetch order");
    let body: Value = response.json().await.expect("Failed to parse order");
    assert_eq!(body["data"]["status"], json!("confirmed"));
}

#[tokio::test]
#[ignore = "Requires a running gala-server and a migrated database"]
async fn test_terminal_transition_needs_override() {
    let client = client();
    let token = login_admin(&client).await;
    let id = place_order(&client, &token).await;

    let response = set_status(&client, &token, id, "confirmed", false).await;
    assert_eq!(response.status(), StatusCode::OK);

    // confirmed -> cancelled is off the table without an override...
    let response = set_status(&client, &token, id, "cancelled", false).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // ...and the order is unchanged.
    let response = client
        .get(format!("{}/commandes/{id}", base_url()))
        .send()
        .await
        .expect("Failed to fetch order");
    let body: Value = response.json().await.expect("Failed to parse order");
    assert_eq!(body["data"]["status"], json!("confirmed"));

    // An explicit operator override goes through.
    let response = set_status(&client, &token, id, "cancelled", true).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires a running gala-server and a migrated database"]
async fn test_unknown_status_value_is_a_validation_error() {
    let client = client();
    let token = login_admin(&client).await;
    let id = place_order(&client, &token).await;

    let response = set_status(&client, &token, id, "en_attente", false).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = response.json().await.expect("Failed to parse error");
    assert!(body["errors"]["status"].is_array());
}

#[tokio::test]
#[ignore = "Requires a running gala-server and a migrated database"]
async fn test_line_items_keep_their_captured_price() {
    let client = client();
    let token = login_admin(&client).await;

    let product = create_product(&client, &token, 5000).await;
    let response = client
        .post(format!("{}/commandes", base_url()))
        .json(&json!({
            "client_name": "Jean Dupont",
            "client_email": "jean@x.com",
            "client_phone": "0700000000",
            "produits": [{"id": product, "quantity": 1}],
        }))
        .send()
        .await
        .expect("Failed to place order");
    let body: Value = response.json().await.expect("Failed to parse order");
    let id = body["data"]["commande"]["id"].as_i64().expect("order id");

    // Double the product's price after the order was placed.
    let response = client
        .put(format!("{}/admin/produits/{product}", base_url()))
        .bearer_auth(&token)
        .json(&json!({
            "name": "Repriced product",
            "slug": format!("repriced-{product}"),
            "description": "price doubled after an order captured it",
            "price": "10000",
            "category": "integration",
        }))
        .send()
        .await
        .expect("Failed to update product");
    assert_eq!(response.status(), StatusCode::OK);

    // The order still reads back with the price it was sold at.
    let response = client
        .get(format!("{}/commandes/{id}", base_url()))
        .send()
        .await
        .expect("Failed to fetch order");
    let body: Value = response.json().await.expect("Failed to parse order");
    assert_eq!(body["data"]["total"], json!("5000.00"));
    assert_eq!(body["data"]["produits"][0]["unit_price"], json!("5000.00"));
}
