mod common;

use axum::http::StatusCode;
use serde_json::{Value, json};
use sqlx::PgPool;

// ─── Create ──────────────────────────────────────────────────────────────────

#[sqlx::test]
async fn test_create_category(pool: PgPool) {
    let user = common::create_test_user(&pool, "Ada", "ada@example.com", "secret1").await;
    let app = common::create_test_state(pool);
    let server = common::make_server(app.state.clone());

    let response = server
        .post("/api/category")
        .add_header("Authorization", common::bearer(user))
        .json(&json!({
            "name": "Rust Lang",
            "image": common::PNG_DATA_URL,
            "content": common::CATEGORY_CONTENT
        }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["slug"], "rust-lang");
    assert_eq!(body["posted_by"]["id"], user);

    let key = body["image"]["key"].as_str().unwrap();
    assert!(key.starts_with("category/"));
    assert!(key.ends_with(".png"));
    assert!(app.storage.contains(key));
    assert_eq!(app.storage.content_type(key).as_deref(), Some("image/png"));
}

#[sqlx::test]
async fn test_create_category_with_accented_name(pool: PgPool) {
    let user = common::create_test_user(&pool, "Ada", "ada@example.com", "secret1").await;
    common::create_test_category(&pool, "Caf", "caf", user).await;
    let app = common::create_test_state(pool);
    let server = common::make_server(app.state.clone());

    let response = server
        .post("/api/category")
        .add_header("Authorization", common::bearer(user))
        .json(&json!({
            "name": "Café",
            "image": common::PNG_DATA_URL,
            "content": common::CATEGORY_CONTENT
        }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["name"], "Café");
    assert_eq!(body["slug"], "cafe");

    server.get("/api/category/cafe").await.assert_status_ok();
}

#[sqlx::test]
async fn test_create_category_requires_signin(pool: PgPool) {
    let app = common::create_test_state(pool);
    let server = common::make_server(app.state.clone());

    server
        .post("/api/category")
        .json(&json!({
            "name": "Rust",
            "image": common::PNG_DATA_URL,
            "content": common::CATEGORY_CONTENT
        }))
        .await
        .assert_status_unauthorized();

    assert!(app.storage.is_empty());
}

#[sqlx::test]
async fn test_create_category_short_content(pool: PgPool) {
    let user = common::create_test_user(&pool, "Ada", "ada@example.com", "secret1").await;
    let app = common::create_test_state(pool);
    let server = common::make_server(app.state.clone());

    let response = server
        .post("/api/category")
        .add_header("Authorization", common::bearer(user))
        .json(&json!({ "name": "Rust", "image": common::PNG_DATA_URL, "content": "short" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert!(body["error"]["details"]["content"].is_array());
}

#[sqlx::test]
async fn test_create_category_invalid_image(pool: PgPool) {
    let user = common::create_test_user(&pool, "Ada", "ada@example.com", "secret1").await;
    let app = common::create_test_state(pool);
    let server = common::make_server(app.state.clone());

    let response = server
        .post("/api/category")
        .add_header("Authorization", common::bearer(user))
        .json(&json!({
            "name": "Rust",
            "image": "https://example.com/logo.png",
            "content": common::CATEGORY_CONTENT
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"]["message"], "Invalid image");
}

#[sqlx::test]
async fn test_create_category_upload_failure(pool: PgPool) {
    let user = common::create_test_user(&pool, "Ada", "ada@example.com", "secret1").await;
    let app = common::create_test_state(pool.clone());
    app.storage.set_fail_puts(true);
    let server = common::make_server(app.state.clone());

    let response = server
        .post("/api/category")
        .add_header("Authorization", common::bearer(user))
        .json(&json!({
            "name": "Rust",
            "image": common::PNG_DATA_URL,
            "content": common::CATEGORY_CONTENT
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"]["message"], "Upload to s3 failed");
    assert_eq!(common::count_rows(&pool, "categories").await, 0);
}

#[sqlx::test]
async fn test_create_duplicate_category_discards_upload(pool: PgPool) {
    let user = common::create_test_user(&pool, "Ada", "ada@example.com", "secret1").await;
    let app = common::create_test_state(pool);
    let server = common::make_server(app.state.clone());

    let body = json!({
        "name": "Rust",
        "image": common::PNG_DATA_URL,
        "content": common::CATEGORY_CONTENT
    });

    server
        .post("/api/category")
        .add_header("Authorization", common::bearer(user))
        .json(&body)
        .await
        .assert_status_ok();

    let response = server
        .post("/api/category")
        .add_header("Authorization", common::bearer(user))
        .json(&body)
        .await;

    response.assert_status(StatusCode::CONFLICT);
    let error: Value = response.json();
    assert_eq!(error["error"]["message"], "Duplicate category");
    assert_eq!(app.storage.len(), 1);
}

// ─── Read ────────────────────────────────────────────────────────────────────

#[sqlx::test]
async fn test_list_categories(pool: PgPool) {
    let user = common::create_test_user(&pool, "Ada", "ada@example.com", "secret1").await;
    common::create_test_category(&pool, "Rust", "rust", user).await;
    common::create_test_category(&pool, "Go", "go", user).await;

    let app = common::create_test_state(pool);
    let server = common::make_server(app.state.clone());

    let response = server.get("/api/categories").await;

    response.assert_status_ok();
    let body: Vec<Value> = response.json();
    let mut slugs: Vec<_> = body.iter().map(|c| c["slug"].as_str().unwrap()).collect();
    slugs.sort();
    assert_eq!(slugs, vec!["go", "rust"]);
}

#[sqlx::test]
async fn test_read_category_with_links(pool: PgPool) {
    let user = common::create_test_user(&pool, "Ada", "ada@example.com", "secret1").await;
    let rust = common::create_test_category(&pool, "Rust", "rust", user).await;
    let go = common::create_test_category(&pool, "Go", "go", user).await;
    for i in 0..3 {
        common::create_test_link(
            &pool,
            &format!("Rust {i}"),
            &format!("https://rust.example.com/{i}"),
            user,
            &[rust],
        )
        .await;
    }
    common::create_test_link(&pool, "Go 1", "https://go.example.com/1", user, &[go]).await;

    let app = common::create_test_state(pool);
    let server = common::make_server(app.state.clone());

    let response = server.get("/api/category/rust").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["category"]["slug"], "rust");
    assert_eq!(body["links"].as_array().unwrap().len(), 3);

    // Numeric strings are accepted for paging.
    let response = server
        .get("/api/category/rust")
        .add_query_param("limit", "2")
        .add_query_param("skip", "0")
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["links"].as_array().unwrap().len(), 2);

    let response = server
        .post("/api/category/rust")
        .json(&json!({ "limit": 2, "skip": 2 }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["links"].as_array().unwrap().len(), 1);
}

#[sqlx::test]
async fn test_read_category_invalid_paging(pool: PgPool) {
    let user = common::create_test_user(&pool, "Ada", "ada@example.com", "secret1").await;
    common::create_test_category(&pool, "Rust", "rust", user).await;

    let app = common::create_test_state(pool);
    let server = common::make_server(app.state.clone());

    server
        .get("/api/category/rust")
        .add_query_param("limit", "0")
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    server
        .get("/api/category/rust")
        .add_query_param("limit", "many")
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[sqlx::test]
async fn test_read_unknown_category(pool: PgPool) {
    let app = common::create_test_state(pool);
    let server = common::make_server(app.state.clone());

    let response = server.get("/api/category/missing").await;

    response.assert_status_not_found();
    let body: Value = response.json();
    assert_eq!(body["error"]["message"], "Category not found");
}

// ─── Update / Delete ─────────────────────────────────────────────────────────

#[sqlx::test]
async fn test_update_category_replaces_image(pool: PgPool) {
    let user = common::create_test_user(&pool, "Ada", "ada@example.com", "secret1").await;
    let app = common::create_test_state(pool);
    let server = common::make_server(app.state.clone());

    let created: Value = server
        .post("/api/category")
        .add_header("Authorization", common::bearer(user))
        .json(&json!({
            "name": "Rust",
            "image": common::PNG_DATA_URL,
            "content": common::CATEGORY_CONTENT
        }))
        .await
        .json();
    let old_key = created["image"]["key"].as_str().unwrap().to_string();

    let response = server
        .put("/api/category/rust")
        .add_header("Authorization", common::bearer(user))
        .json(&json!({
            "name": "Rust (2024)",
            "content": "Updated description of the Rust category.",
            "image": common::PNG_DATA_URL
        }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["name"], "Rust (2024)");
    assert_eq!(body["slug"], "rust");

    let new_key = body["image"]["key"].as_str().unwrap();
    assert_ne!(new_key, old_key);
    assert!(app.storage.contains(new_key));
    assert!(!app.storage.contains(&old_key));
}

#[sqlx::test]
async fn test_update_category_keeps_image(pool: PgPool) {
    let user = common::create_test_user(&pool, "Ada", "ada@example.com", "secret1").await;
    common::create_test_category(&pool, "Rust", "rust", user).await;

    let app = common::create_test_state(pool);
    let server = common::make_server(app.state.clone());

    let response = server
        .put("/api/category/rust")
        .add_header("Authorization", common::bearer(user))
        .json(&json!({ "name": "Rust", "content": "A longer description for Rust." }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["image"]["key"], "category/rust.png");
    assert_eq!(body["content"], "A longer description for Rust.");
}

#[sqlx::test]
async fn test_update_unknown_category(pool: PgPool) {
    let user = common::create_test_user(&pool, "Ada", "ada@example.com", "secret1").await;
    let app = common::create_test_state(pool);
    let server = common::make_server(app.state.clone());

    server
        .put("/api/category/missing")
        .add_header("Authorization", common::bearer(user))
        .json(&json!({ "name": "Missing", "content": common::CATEGORY_CONTENT }))
        .await
        .assert_status_not_found();
}

#[sqlx::test]
async fn test_delete_category(pool: PgPool) {
    let user = common::create_test_user(&pool, "Ada", "ada@example.com", "secret1").await;
    let app = common::create_test_state(pool.clone());
    let server = common::make_server(app.state.clone());

    server
        .post("/api/category")
        .add_header("Authorization", common::bearer(user))
        .json(&json!({
            "name": "Rust",
            "image": common::PNG_DATA_URL,
            "content": common::CATEGORY_CONTENT
        }))
        .await
        .assert_status_ok();

    let response = server
        .delete("/api/category/rust")
        .add_header("Authorization", common::bearer(user))
        .await;

    response.assert_status_ok();
    response.assert_json(&json!({ "message": "Category deleted successfully" }));
    assert!(app.storage.is_empty());
    assert_eq!(common::count_rows(&pool, "categories").await, 0);

    server
        .delete("/api/category/rust")
        .add_header("Authorization", common::bearer(user))
        .await
        .assert_status_not_found();
}

#[sqlx::test]
async fn test_delete_category_when_image_delete_fails(pool: PgPool) {
    let user = common::create_test_user(&pool, "Ada", "ada@example.com", "secret1").await;
    common::create_test_category(&pool, "Rust", "rust", user).await;

    let app = common::create_test_state(pool.clone());
    app.storage.set_fail_deletes(true);
    let server = common::make_server(app.state.clone());

    server
        .delete("/api/category/rust")
        .add_header("Authorization", common::bearer(user))
        .await
        .assert_status_ok();

    assert_eq!(common::count_rows(&pool, "categories").await, 0);
}
