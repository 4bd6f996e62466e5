mod common;

use axum::http::StatusCode;
use link_board::domain::notification_worker::PublishNotifier;
use serde_json::{Value, json};
use sqlx::PgPool;

async fn seed(pool: &PgPool) -> (i64, i64, i64) {
    let admin = common::create_admin_user(pool, "Root", "root@example.com", "secret1").await;
    let user = common::create_test_user(pool, "Ada", "ada@example.com", "secret1").await;
    let rust = common::create_test_category(pool, "Rust", "rust", admin).await;
    (admin, user, rust)
}

// ─── Create ──────────────────────────────────────────────────────────────────

#[sqlx::test]
async fn test_create_link_queues_notification(pool: PgPool) {
    let (_, user, rust) = seed(&pool).await;
    let mut app = common::create_test_state(pool);
    let server = common::make_server(app.state.clone());

    let response = server
        .post("/api/link")
        .add_header("Authorization", common::bearer(user))
        .json(&json!({
            "title": "The Rust Book",
            "url": "https://doc.rust-lang.org/book/#intro",
            "categories": [rust, rust],
            "type": "free",
            "medium": "book"
        }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["url"], "https://doc.rust-lang.org/book/#intro");
    assert_eq!(body["slug"], "https://doc.rust-lang.org/book/");
    assert_eq!(body["type"], "free");
    assert_eq!(body["medium"], "book");
    assert_eq!(body["posted_by"]["id"], user);
    assert_eq!(body["categories"].as_array().unwrap().len(), 1);
    assert_eq!(body["clicks"], 0);

    let event = app.published.try_recv().unwrap();
    assert_eq!(event.link_id, body["id"].as_i64().unwrap());
    assert_eq!(event.categories, vec![rust]);
}

#[sqlx::test]
async fn test_create_link_defaults(pool: PgPool) {
    let (_, user, rust) = seed(&pool).await;
    let app = common::create_test_state(pool);
    let server = common::make_server(app.state.clone());

    let response = server
        .post("/api/link")
        .add_header("Authorization", common::bearer(user))
        .json(&json!({ "title": "Talk", "url": "https://example.com/talk", "categories": [rust] }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["type"], "free");
    assert_eq!(body["medium"], "video");
}

#[sqlx::test]
async fn test_create_duplicate_link(pool: PgPool) {
    let (_, user, rust) = seed(&pool).await;
    let app = common::create_test_state(pool);
    let server = common::make_server(app.state.clone());

    server
        .post("/api/link")
        .add_header("Authorization", common::bearer(user))
        .json(&json!({ "title": "A", "url": "https://example.com/a", "categories": [rust] }))
        .await
        .assert_status_ok();

    let response = server
        .post("/api/link")
        .add_header("Authorization", common::bearer(user))
        .json(&json!({ "title": "B", "url": "HTTPS://EXAMPLE.com/a#again", "categories": [rust] }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
    let body: Value = response.json();
    assert_eq!(body["error"]["message"], "Link already exists");
}

#[sqlx::test]
async fn test_create_link_without_categories(pool: PgPool) {
    let (_, user, _) = seed(&pool).await;
    let app = common::create_test_state(pool);
    let server = common::make_server(app.state.clone());

    let response = server
        .post("/api/link")
        .add_header("Authorization", common::bearer(user))
        .json(&json!({ "title": "A", "url": "https://example.com/a", "categories": [] }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert!(body["error"]["details"]["categories"].is_array());
}

#[sqlx::test]
async fn test_create_link_requires_signin(pool: PgPool) {
    let (_, _, rust) = seed(&pool).await;
    let app = common::create_test_state(pool);
    let server = common::make_server(app.state.clone());

    server
        .post("/api/link")
        .json(&json!({ "title": "A", "url": "https://example.com/a", "categories": [rust] }))
        .await
        .assert_status_unauthorized();
}

#[sqlx::test]
async fn test_full_queue_records_failure(pool: PgPool) {
    let (_, user, rust) = seed(&pool).await;
    let app = common::create_test_state_with_capacity(pool.clone(), 1);
    let server = common::make_server(app.state.clone());

    for i in 0..2 {
        server
            .post("/api/link")
            .add_header("Authorization", common::bearer(user))
            .json(&json!({
                "title": format!("Link {i}"),
                "url": format!("https://example.com/{i}"),
                "categories": [rust]
            }))
            .await
            .assert_status_ok();
    }

    let reason: String = sqlx::query_scalar("SELECT reason FROM notification_failures")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(reason, "notification queue full");
}

#[sqlx::test]
async fn test_published_link_notifies_subscribers(pool: PgPool) {
    let (_, user, rust) = seed(&pool).await;
    let reader = common::create_test_user(&pool, "Grace", "grace@example.com", "secret1").await;
    common::subscribe(&pool, reader, rust).await;

    let mut app = common::create_test_state(pool);
    let server = common::make_server(app.state.clone());

    server
        .post("/api/link")
        .add_header("Authorization", common::bearer(user))
        .json(&json!({ "title": "Async Rust", "url": "https://example.com/async", "categories": [rust] }))
        .await
        .assert_status_ok();

    let event = app.published.try_recv().unwrap();
    app.state.notification_service.notify(event).await;

    let mails = app.mailer.messages_to("grace@example.com");
    assert_eq!(mails.len(), 1);
    assert!(mails[0].text_body.contains("https://example.com/async"));
    assert!(app.mailer.messages_to("ada@example.com").is_empty());
}

// ─── Read ────────────────────────────────────────────────────────────────────

#[sqlx::test]
async fn test_read_link(pool: PgPool) {
    let (_, user, rust) = seed(&pool).await;
    let id = common::create_test_link(&pool, "A", "https://example.com/a", user, &[rust]).await;
    common::set_clicks(&pool, id, 4).await;

    let app = common::create_test_state(pool);
    let server = common::make_server(app.state.clone());

    let response = server.get(&format!("/api/link/{id}")).await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["title"], "A");
    assert_eq!(body["clicks"], 4);
    assert_eq!(body["categories"][0]["slug"], "rust");
}

#[sqlx::test]
async fn test_read_missing_link(pool: PgPool) {
    let app = common::create_test_state(pool);
    let server = common::make_server(app.state.clone());

    server.get("/api/link/999").await.assert_status_not_found();
}

#[sqlx::test]
async fn test_non_numeric_link_id(pool: PgPool) {
    let (_, user, _) = seed(&pool).await;
    let app = common::create_test_state(pool);
    let server = common::make_server(app.state.clone());

    let response = server.get("/api/link/abc").await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "validation_error");
    assert_eq!(body["error"]["message"], "Invalid path parameters");

    let response = server
        .delete("/api/link/abc")
        .add_header("Authorization", common::bearer(user))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"]["message"], "Invalid path parameters");
}

// ─── Owner update / delete ───────────────────────────────────────────────────

#[sqlx::test]
async fn test_owner_updates_link(pool: PgPool) {
    let (_, user, rust) = seed(&pool).await;
    let id = common::create_test_link(&pool, "A", "https://example.com/a", user, &[rust]).await;

    let app = common::create_test_state(pool);
    let server = common::make_server(app.state.clone());

    let response = server
        .put(&format!("/api/link/{id}"))
        .add_header("Authorization", common::bearer(user))
        .json(&json!({
            "title": "A, revised",
            "url": "https://example.com/a2",
            "categories": [rust],
            "type": "paid"
        }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["title"], "A, revised");
    assert_eq!(body["slug"], "https://example.com/a2");
    assert_eq!(body["type"], "paid");
}

#[sqlx::test]
async fn test_other_user_cannot_update_link(pool: PgPool) {
    let (admin, user, rust) = seed(&pool).await;
    let id = common::create_test_link(&pool, "A", "https://example.com/a", admin, &[rust]).await;

    let app = common::create_test_state(pool);
    let server = common::make_server(app.state.clone());

    let response = server
        .put(&format!("/api/link/{id}"))
        .add_header("Authorization", common::bearer(user))
        .json(&json!({ "title": "Mine now", "url": "https://example.com/a", "categories": [rust] }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"]["message"], "You are not authorized");
}

#[sqlx::test]
async fn test_owner_route_unknown_link(pool: PgPool) {
    let (_, user, _) = seed(&pool).await;
    let app = common::create_test_state(pool);
    let server = common::make_server(app.state.clone());

    let response = server
        .delete("/api/link/999")
        .add_header("Authorization", common::bearer(user))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"]["message"], "Could not find link");
}

#[sqlx::test]
async fn test_owner_deletes_link(pool: PgPool) {
    let (_, user, rust) = seed(&pool).await;
    let id = common::create_test_link(&pool, "A", "https://example.com/a", user, &[rust]).await;

    let app = common::create_test_state(pool.clone());
    let server = common::make_server(app.state.clone());

    let response = server
        .delete(&format!("/api/link/{id}"))
        .add_header("Authorization", common::bearer(user))
        .await;

    response.assert_status_ok();
    response.assert_json(&json!({ "message": "Link removed successfully" }));
    assert_eq!(common::count_rows(&pool, "links").await, 0);
}

// ─── Admin ───────────────────────────────────────────────────────────────────

#[sqlx::test]
async fn test_admin_lists_links(pool: PgPool) {
    let (admin, user, rust) = seed(&pool).await;
    for i in 0..3 {
        common::create_test_link(
            &pool,
            &format!("L{i}"),
            &format!("https://example.com/{i}"),
            user,
            &[rust],
        )
        .await;
    }

    let app = common::create_test_state(pool);
    let server = common::make_server(app.state.clone());

    let response = server
        .get("/api/links")
        .add_query_param("limit", 2)
        .add_header("Authorization", common::bearer(admin))
        .await;
    response.assert_status_ok();
    let body: Vec<Value> = response.json();
    assert_eq!(body.len(), 2);

    let response = server
        .post("/api/links")
        .add_header("Authorization", common::bearer(admin))
        .json(&json!({ "limit": "10", "skip": "1" }))
        .await;
    response.assert_status_ok();
    let body: Vec<Value> = response.json();
    assert_eq!(body.len(), 2);
}

#[sqlx::test]
async fn test_subscriber_cannot_list_links(pool: PgPool) {
    let (_, user, _) = seed(&pool).await;
    let app = common::create_test_state(pool);
    let server = common::make_server(app.state.clone());

    server
        .get("/api/links")
        .add_header("Authorization", common::bearer(user))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[sqlx::test]
async fn test_admin_edits_any_link(pool: PgPool) {
    let (admin, user, rust) = seed(&pool).await;
    let id = common::create_test_link(&pool, "A", "https://example.com/a", user, &[rust]).await;

    let app = common::create_test_state(pool);
    let server = common::make_server(app.state.clone());

    server
        .put(&format!("/api/link/admin/{id}"))
        .add_header("Authorization", common::bearer(admin))
        .json(&json!({ "title": "Moderated", "url": "https://example.com/a", "categories": [rust] }))
        .await
        .assert_status_ok();

    server
        .delete(&format!("/api/link/admin/{id}"))
        .add_header("Authorization", common::bearer(admin))
        .await
        .assert_status_ok();

    server
        .get(&format!("/api/link/{id}"))
        .await
        .assert_status_not_found();
}

// ─── Clicks / Popular ────────────────────────────────────────────────────────

#[sqlx::test]
async fn test_click_count_increments(pool: PgPool) {
    let (_, user, rust) = seed(&pool).await;
    let id = common::create_test_link(&pool, "A", "https://example.com/a", user, &[rust]).await;

    let app = common::create_test_state(pool);
    let server = common::make_server(app.state.clone());

    server
        .post("/api/click-count")
        .json(&json!({ "linkId": id }))
        .await
        .assert_json(&json!({ "link_id": id, "clicks": 1 }));

    server
        .post("/api/click-count")
        .json(&json!({ "link_id": id }))
        .await
        .assert_json(&json!({ "link_id": id, "clicks": 2 }));
}

#[sqlx::test]
async fn test_popular_links(pool: PgPool) {
    let (admin, user, rust) = seed(&pool).await;
    let go = common::create_test_category(&pool, "Go", "go", admin).await;

    let mut ids = Vec::new();
    for (i, clicks) in [5, 1, 9, 3].into_iter().enumerate() {
        let id = common::create_test_link(
            &pool,
            &format!("R{i}"),
            &format!("https://example.com/r{i}"),
            user,
            &[rust],
        )
        .await;
        common::set_clicks(&pool, id, clicks).await;
        ids.push(id);
    }
    let go_link = common::create_test_link(&pool, "G", "https://example.com/g", user, &[go]).await;
    common::set_clicks(&pool, go_link, 100).await;

    let app = common::create_test_state(pool);
    let server = common::make_server(app.state.clone());

    let body: Vec<Value> = server.get("/api/link/popular").await.json();
    let popular: Vec<i64> = body.iter().map(|l| l["id"].as_i64().unwrap()).collect();
    assert_eq!(popular, vec![go_link, ids[2], ids[0]]);

    let body: Vec<Value> = server.get("/api/link/popular/rust").await.json();
    let popular: Vec<i64> = body.iter().map(|l| l["id"].as_i64().unwrap()).collect();
    assert_eq!(popular, vec![ids[2], ids[0], ids[3]]);

    server
        .get("/api/link/popular/missing")
        .await
        .assert_status_not_found();
}
