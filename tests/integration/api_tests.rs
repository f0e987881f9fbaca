//! API integration tests against a running server with an empty database

use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

fn base_url() -> String {
    std::env::var("CATALOG_BASE_URL").unwrap_or_else(|_| "http://localhost:4000".to_string())
}

/// Helper to create an author and return its id
async fn create_author(client: &Client, first: &str, last: &str) -> String {
    let response = client
        .post(format!("{}/authors", base_url()))
        .json(&json!({ "firstName": first, "lastName": last }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CREATED);

    let body: Value = response.json().await.expect("Failed to parse response");
    body["id"].as_str().expect("No author id").to_string()
}

async fn delete(client: &Client, path: &str) -> StatusCode {
    client
        .delete(format!("{}{}", base_url(), path))
        .send()
        .await
        .expect("Failed to send request")
        .status()
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", base_url()))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_book_lifecycle() {
    let client = Client::new();

    // Create an author
    let response = client
        .post(format!("{}/authors", base_url()))
        .json(&json!({
            "firstName": "Jane",
            "lastName": "Austen",
            "birthDate": "1775-12-16"
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CREATED);
    let author: Value = response.json().await.expect("Failed to parse response");
    let author_id = author["id"].as_str().expect("No author id").to_string();

    // Create a book
    let response = client
        .post(format!("{}/books", base_url()))
        .json(&json!({
            "title": "Pride and Prejudice",
            "isbn": "978-0-14-143951-8",
            "authorId": author_id
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CREATED);
    let book: Value = response.json().await.expect("Failed to parse response");
    let book_id = book["id"].as_str().expect("No book id").to_string();

    // The book comes back with its author
    let response = client
        .get(format!("{}/books/{}", base_url(), book_id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["id"], book_id);
    assert_eq!(body["author"]["id"], author_id);

    // Patch the genre
    let response = client
        .patch(format!("{}/books/{}", base_url(), book_id))
        .json(&json!({ "genre": "Romance" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = client
        .get(format!("{}/books/{}", base_url(), book_id))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(body["genre"], "Romance");
    assert_eq!(body["title"], "Pride and Prejudice");

    // An explicit null clears the genre
    let response = client
        .patch(format!("{}/books/{}", base_url(), book_id))
        .json(&json!({ "genre": null }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["genre"].is_null());

    // The author cannot go while the book references it
    assert_eq!(
        delete(&client, &format!("/authors/{}", author_id)).await,
        StatusCode::INTERNAL_SERVER_ERROR
    );

    // Delete the book, then it is gone
    assert_eq!(delete(&client, &format!("/books/{}", book_id)).await, StatusCode::NO_CONTENT);
    let response = client
        .get(format!("{}/books/{}", base_url(), book_id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Cleanup
    assert_eq!(delete(&client, &format!("/authors/{}", author_id)).await, StatusCode::NO_CONTENT);
}

#[tokio::test]
#[ignore]
async fn test_duplicate_isbn_rejected() {
    let client = Client::new();
    let author_id = create_author(&client, "Isaac", "Asimov").await;

    let payload = json!({
        "title": "Foundation",
        "isbn": "978-0-553-29335-7",
        "authorId": author_id
    });

    let first = client
        .post(format!("{}/books", base_url()))
        .json(&payload)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(first.status(), StatusCode::CREATED);
    let book: Value = first.json().await.expect("Failed to parse response");

    let second = client
        .post(format!("{}/books", base_url()))
        .json(&payload)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(second.status(), StatusCode::BAD_REQUEST);
    let body: Value = second.json().await.expect("Failed to parse response");
    assert!(body["message"].as_str().unwrap().contains("ISBN"));

    // Cleanup
    let book_id = book["id"].as_str().unwrap();
    delete(&client, &format!("/books/{}", book_id)).await;
    delete(&client, &format!("/authors/{}", author_id)).await;
}

#[tokio::test]
#[ignore]
async fn test_search_authors_case_insensitive() {
    let client = Client::new();
    let author_id = create_author(&client, "Ursula", "Le Guin").await;

    let body: Value = client
        .get(format!("{}/authors?search=LE%20GUIN", base_url()))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    let found = body
        .as_array()
        .unwrap()
        .iter()
        .any(|a| a["id"] == author_id.as_str());
    assert!(found);

    delete(&client, &format!("/authors/{}", author_id)).await;
}

#[tokio::test]
#[ignore]
async fn test_unknown_ids_are_not_found() {
    let client = Client::new();

    for path in ["/authors/unknown-id", "/books/unknown-id"] {
        let response = client
            .get(format!("{}{}", base_url(), path))
            .send()
            .await
            .expect("Failed to send request");
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{}", path);
    }
}

#[tokio::test]
#[ignore]
async fn test_strict_body_schema() {
    let client = Client::new();

    let response = client
        .post(format!("{}/authors", base_url()))
        .json(&json!({ "firstName": "A", "lastName": "B", "extra": true }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
