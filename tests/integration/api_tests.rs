//! API integration tests
//!
//! These tests require a running server with a migrated database:
//! run with `cargo test -- --ignored` against http://localhost:8080.

use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use reqwest::multipart::Form;
use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api/v1";

/// Mint an editor token with the development secret
fn editor_token() -> String {
    let secret =
        std::env::var("JWT_SECRET").unwrap_or_else(|_| "change-this-secret-in-production".into());
    let now = Utc::now().timestamp();
    let claims = json!({
        "sub": "editor@comptoir.example",
        "user_id": 1,
        "role": "editor",
        "iat": now,
        "exp": now + 3600,
    });
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("Failed to encode token")
}

async fn preview(client: &Client, token: &str, csv: &str) -> Value {
    let form = Form::new().text("file", csv.to_string());
    let response = client
        .post(format!("{}/imports/preview", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .multipart(form)
        .send()
        .await
        .expect("Failed to send preview request");
    assert!(response.status().is_success());
    response.json().await.expect("Failed to parse preview response")
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_missing_token_rejected() {
    let client = Client::new();

    let response = client
        .get(format!("{}/products", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_list_products() {
    let client = Client::new();
    let token = editor_token();

    let response = client
        .get(format!("{}/products", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["items"].is_array());
    assert!(body["total"].is_number());
}

#[tokio::test]
#[ignore]
async fn test_list_collections() {
    let client = Client::new();
    let token = editor_token();

    let response = client
        .get(format!("{}/collections", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body.is_array());
}

const TWO_VARIANT_CSV: &str = "\
Name,Reference,Description,Price,Brand,Category,Collection,Color,Size,Stock,SKU,Materials,Care instructions,Made in
Breton Shirt,BR-100,Classic stripes,49.90,Armor,Tops,,Navy,S,4,BR-100-NAV-S,Cotton,Machine wash,France
Breton Shirt,BR-100,Classic stripes,49.90,Armor,Tops,,Navy,M,6,BR-100-NAV-M,Cotton,Machine wash,France
";

#[tokio::test]
#[ignore]
async fn test_preview_groups_variants_under_one_product() {
    let client = Client::new();
    let token = editor_token();

    let body = preview(&client, &token, TWO_VARIANT_CSV).await;

    assert_eq!(body["preview"]["total_rows"], 2);
    assert_eq!(body["preview"]["product_count"], 1);
    assert_eq!(body["preview"]["variant_count"], 2);
    assert_eq!(body["preview"]["can_import"], true);
    assert_eq!(body["rows"].as_array().expect("rows array").len(), 2);
}

#[tokio::test]
#[ignore]
async fn test_preview_then_execute() {
    let client = Client::new();
    let token = editor_token();

    let body = preview(&client, &token, TWO_VARIANT_CSV).await;
    assert_eq!(body["preview"]["can_import"], true);

    let response = client
        .post(format!("{}/imports/execute", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "rows": body["rows"] }))
        .send()
        .await
        .expect("Failed to send execute request");

    assert!(response.status().is_success());

    let result: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(result["errors"].as_array().expect("errors array").len(), 0);
    let created = result["products_created"].as_i64().unwrap_or(0)
        + result["products_updated"].as_i64().unwrap_or(0);
    assert_eq!(created, 1);
}

#[tokio::test]
#[ignore]
async fn test_re_execute_updates_instead_of_duplicating() {
    let client = Client::new();
    let token = editor_token();

    let body = preview(&client, &token, TWO_VARIANT_CSV).await;

    // First run creates, second run must update the same product
    for _ in 0..2 {
        let response = client
            .post(format!("{}/imports/execute", BASE_URL))
            .header("Authorization", format!("Bearer {}", token))
            .json(&json!({ "rows": body["rows"] }))
            .send()
            .await
            .expect("Failed to send execute request");
        assert!(response.status().is_success());
    }

    let response = client
        .get(format!("{}/products?name=Breton%20Shirt", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");
    let listing: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(listing["total"], 1);
}

#[tokio::test]
#[ignore]
async fn test_execute_refuses_rows_with_errors() {
    let client = Client::new();
    let token = editor_token();

    let csv = "\
Name,Reference,Description,Price,Brand,Category,Collection,Color,Size,Stock,SKU,Materials,Care instructions,Made in
Bad Jacket,BJ-1,,-10.00,Armor,Outerwear,,Black,M,2,BJ-1-BLK-M,,,
";
    let body = preview(&client, &token, csv).await;
    assert_eq!(body["preview"]["can_import"], false);

    let response = client
        .post(format!("{}/imports/execute", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "rows": body["rows"] }))
        .send()
        .await
        .expect("Failed to send execute request");

    assert!(response.status().is_success());

    let result: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(result["products_created"], 0);
    assert_eq!(result["variants_created"], 0);
    assert!(!result["errors"].as_array().expect("errors array").is_empty());
}

#[tokio::test]
#[ignore]
async fn test_paste_import_creates_placeholder_for_unknown_reference() {
    let client = Client::new();
    let token = editor_token();

    let text = "Marque\tGenre\tReference\tStock\nArmor\tTops\tPH-UNKNOWN-1\t7\n";
    let response = client
        .post(format!("{}/imports/paste", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "text": text }))
        .send()
        .await
        .expect("Failed to send paste request");

    assert!(response.status().is_success());

    let result: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(result["created"], 1);
    assert_eq!(result["errors"].as_array().expect("errors array").len(), 0);

    // The placeholder must be visible in the catalog under its reference
    let response = client
        .get(format!("{}/products?reference=PH-UNKNOWN-1", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");
    let listing: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(listing["total"], 1);
}
