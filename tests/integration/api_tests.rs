//! API tests against a running server

use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080";

/// Helper to create a book and return its id
async fn create_book(client: &Client, title: &str, author: &str) -> i64 {
    let response = client
        .post(format!("{}/", BASE_URL))
        .json(&json!({
            "title": title,
            "author": author
        }))
        .send()
        .await
        .expect("Failed to send create request");

    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse create response");
    body["id"].as_i64().expect("No book ID")
}

async fn delete_book(client: &Client, id: i64) {
    let _ = client
        .delete(format!("{}/{}/", BASE_URL, id))
        .send()
        .await;
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
async fn test_readiness() {
    let client = Client::new();

    let response = client
        .get(format!("{}/ready", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 200);
}

#[tokio::test]
#[ignore]
async fn test_list_books() {
    let client = Client::new();

    let response = client
        .get(format!("{}/", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body.is_array());
}

#[tokio::test]
#[ignore]
async fn test_create_update_and_delete_book() {
    let client = Client::new();
    let id = create_book(&client, "Test Book", "Test Author").await;

    // Update
    let response = client
        .put(format!("{}/{}/", BASE_URL, id))
        .json(&json!({
            "title": "Updated Book",
            "author": "Updated Author"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 200);

    // Fetch
    let response = client
        .get(format!("{}/{}/", BASE_URL, id))
        .send()
        .await
        .expect("Failed to send request");

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["title"], "Updated Book");
    assert_eq!(body["author"], "Updated Author");

    // Delete
    let response = client
        .delete(format!("{}/{}/", BASE_URL, id))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 204);

    let response = client
        .get(format!("{}/{}/", BASE_URL, id))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_list_keeps_insertion_order() {
    let client = Client::new();
    let first = create_book(&client, "Ordering A", "Author A").await;
    let second = create_book(&client, "Ordering B", "Author B").await;

    let body: Value = client
        .get(format!("{}/", BASE_URL))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");

    let ids: Vec<i64> = body
        .as_array()
        .expect("List is not an array")
        .iter()
        .filter_map(|book| book["id"].as_i64())
        .filter(|id| *id == first || *id == second)
        .collect();
    assert_eq!(ids, vec![first, second]);

    delete_book(&client, first).await;
    delete_book(&client, second).await;
}

#[tokio::test]
#[ignore]
async fn test_create_invalid_book() {
    let client = Client::new();

    let response = client
        .post(format!("{}/", BASE_URL))
        .json(&json!({
            "title": "Missing Author"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["author"].is_array());
}
