mod common;

use axum::http::StatusCode;
use serde_json::{Value, json};
use sqlx::PgPool;

// ─── Register / Activate ─────────────────────────────────────────────────────

#[sqlx::test]
async fn test_register_and_activate(pool: PgPool) {
    let admin = common::create_admin_user(&pool, "Root", "root@example.com", "secret1").await;
    let rust = common::create_test_category(&pool, "Rust", "rust", admin).await;

    let app = common::create_test_state(pool.clone());
    let server = common::make_server(app.state.clone());

    let response = server
        .post("/api/register")
        .json(&json!({
            "name": "Ada",
            "email": "Ada@Example.com",
            "password": "secret1",
            "categories": [rust]
        }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert!(
        body["message"]
            .as_str()
            .unwrap()
            .starts_with("Email has been sent to ada@example.com")
    );

    // Nothing is stored until the link is followed.
    assert_eq!(common::count_rows(&pool, "users").await, 1);

    let mails = app.mailer.messages_to("ada@example.com");
    assert_eq!(mails.len(), 1);
    let token = common::token_from_body(&mails[0].text_body, "/auth/activate/");

    let response = server
        .post("/api/register/activate")
        .json(&json!({ "token": token }))
        .await;

    response.assert_status_ok();
    response.assert_json(&json!({ "message": "Registration success. Please login." }));

    let (name, subscriptions): (String, i64) = sqlx::query_as(
        r#"
        SELECT u.name, (SELECT COUNT(*) FROM user_categories uc WHERE uc.user_id = u.id)
        FROM users u WHERE u.email = 'ada@example.com'
        "#,
    )
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(name, "Ada");
    assert_eq!(subscriptions, 1);
}

#[sqlx::test]
async fn test_register_taken_email(pool: PgPool) {
    common::create_test_user(&pool, "Ada", "ada@example.com", "secret1").await;
    let app = common::create_test_state(pool);
    let server = common::make_server(app.state.clone());

    let response = server
        .post("/api/register")
        .json(&json!({ "name": "Ada", "email": "ada@example.com", "password": "secret1" }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
    let body: Value = response.json();
    assert_eq!(body["error"]["message"], "Email is taken");
    assert!(app.mailer.messages().is_empty());
}

#[sqlx::test]
async fn test_register_twice_before_activation(pool: PgPool) {
    let app = common::create_test_state(pool);
    let server = common::make_server(app.state.clone());

    for _ in 0..2 {
        server
            .post("/api/register")
            .json(&json!({ "name": "A", "email": "a@x.com", "password": "secret1" }))
            .await
            .assert_status_ok();
    }

    assert_eq!(app.mailer.messages_to("a@x.com").len(), 2);
}

#[sqlx::test]
async fn test_register_rejects_short_password(pool: PgPool) {
    let app = common::create_test_state(pool);
    let server = common::make_server(app.state.clone());

    let response = server
        .post("/api/register")
        .json(&json!({ "name": "Ada", "email": "ada@example.com", "password": "12345" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "validation_error");
    assert!(body["error"]["details"]["password"].is_array());
}

#[sqlx::test]
async fn test_register_rejects_overlong_name(pool: PgPool) {
    let app = common::create_test_state(pool);
    let server = common::make_server(app.state.clone());

    let response = server
        .post("/api/register")
        .json(&json!({ "name": "N".repeat(200), "email": "long@example.com", "password": "secret1" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert!(body["error"]["details"]["name"].is_array());
    assert!(app.mailer.messages_to("long@example.com").is_empty());
}

#[sqlx::test]
async fn test_register_reports_mail_failure(pool: PgPool) {
    let app = common::create_test_state(pool);
    app.mailer.set_failing(true);
    let server = common::make_server(app.state.clone());

    let response = server
        .post("/api/register")
        .json(&json!({ "name": "Ada", "email": "ada@example.com", "password": "secret1" }))
        .await;

    response.assert_status_ok();
    response.assert_json(&json!({
        "message": "We could not verify your email. Please try again"
    }));
}

#[sqlx::test]
async fn test_activate_invalid_token(pool: PgPool) {
    let app = common::create_test_state(pool);
    let server = common::make_server(app.state.clone());

    let response = server
        .post("/api/register/activate")
        .json(&json!({ "token": "not.a.token" }))
        .await;

    response.assert_status_unauthorized();
    let body: Value = response.json();
    assert_eq!(body["error"]["message"], "Expired link. Try again");
}

#[sqlx::test]
async fn test_activate_twice(pool: PgPool) {
    let app = common::create_test_state(pool);
    let server = common::make_server(app.state.clone());

    server
        .post("/api/register")
        .json(&json!({ "name": "Ada", "email": "ada@example.com", "password": "secret1" }))
        .await
        .assert_status_ok();

    let token = common::token_from_body(&app.mailer.messages()[0].text_body, "/auth/activate/");

    server
        .post("/api/register/activate")
        .json(&json!({ "token": token }))
        .await
        .assert_status_ok();

    let response = server
        .post("/api/register/activate")
        .json(&json!({ "token": token }))
        .await;

    response.assert_status_unauthorized();
    let body: Value = response.json();
    assert_eq!(body["error"]["message"], "Email is taken");
}

// ─── Login ───────────────────────────────────────────────────────────────────

#[sqlx::test]
async fn test_login_success(pool: PgPool) {
    let id = common::create_test_user(&pool, "Ada", "ada@example.com", "secret1").await;
    let app = common::create_test_state(pool);
    let server = common::make_server(app.state.clone());

    let response = server
        .post("/api/login")
        .json(&json!({ "email": "ADA@example.com", "password": "secret1" }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["user"]["id"], id);
    assert_eq!(body["user"]["role"], "subscriber");
    assert!(body["user"].get("password_hash").is_none());

    let token = body["token"].as_str().unwrap();
    assert_eq!(common::test_signer().verify_session(token).unwrap(), id);
}

#[sqlx::test]
async fn test_login_wrong_password(pool: PgPool) {
    common::create_test_user(&pool, "Ada", "ada@example.com", "secret1").await;
    let app = common::create_test_state(pool);
    let server = common::make_server(app.state.clone());

    let response = server
        .post("/api/login")
        .json(&json!({ "email": "ada@example.com", "password": "secret2" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"]["message"], "Email and password do not match");
}

#[sqlx::test]
async fn test_login_unknown_user(pool: PgPool) {
    let app = common::create_test_state(pool);
    let server = common::make_server(app.state.clone());

    let response = server
        .post("/api/login")
        .json(&json!({ "email": "nobody@example.com", "password": "secret1" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(
        body["error"]["message"],
        "User with this email does not exist. Please register."
    );
}

// ─── Forgot / Reset password ─────────────────────────────────────────────────

#[sqlx::test]
async fn test_password_reset_flow(pool: PgPool) {
    common::create_test_user(&pool, "Ada", "ada@example.com", "secret1").await;
    let app = common::create_test_state(pool);
    let server = common::make_server(app.state.clone());

    let response = server
        .post("/api/forgot-password")
        .json(&json!({ "email": "ada@example.com" }))
        .await;

    response.assert_status_ok();
    response.assert_json(&json!({
        "message": "Email has been sent to ada@example.com. Click on the link to reset your password"
    }));

    let mails = app.mailer.messages_to("ada@example.com");
    let token = common::token_from_body(&mails[0].text_body, "/auth/password/reset/");

    server
        .post("/api/reset-password")
        .json(&json!({ "resetPasswordLink": token, "newPassword": "brand-new" }))
        .await
        .assert_status_ok();

    server
        .post("/api/login")
        .json(&json!({ "email": "ada@example.com", "password": "brand-new" }))
        .await
        .assert_status_ok();

    server
        .post("/api/login")
        .json(&json!({ "email": "ada@example.com", "password": "secret1" }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    // The token was consumed by the first reset.
    let response = server
        .post("/api/reset-password")
        .json(&json!({ "reset_password_link": token, "new_password": "another1" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"]["message"], "Invalid token. Try again.");
}

#[sqlx::test]
async fn test_forgot_password_unknown_email(pool: PgPool) {
    let app = common::create_test_state(pool);
    let server = common::make_server(app.state.clone());

    let response = server
        .post("/api/forgot-password")
        .json(&json!({ "email": "nobody@example.com" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"]["message"], "User with that email does not exist");
}

#[sqlx::test]
async fn test_reset_password_requires_token(pool: PgPool) {
    let app = common::create_test_state(pool);
    let server = common::make_server(app.state.clone());

    let response = server
        .post("/api/reset-password")
        .json(&json!({ "newPassword": "brand-new" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"]["message"], "Reset password link is required");
}

#[sqlx::test]
async fn test_reset_password_expired_link(pool: PgPool) {
    let app = common::create_test_state(pool);
    let server = common::make_server(app.state.clone());

    let response = server
        .post("/api/reset-password")
        .json(&json!({ "resetPasswordLink": "garbage", "newPassword": "brand-new" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"]["message"], "Expired Link. Try again.");
}

// ─── Guards ──────────────────────────────────────────────────────────────────

#[sqlx::test]
async fn test_missing_bearer_token(pool: PgPool) {
    let app = common::create_test_state(pool);
    let server = common::make_server(app.state.clone());

    server.get("/api/user").await.assert_status_unauthorized();
}

#[sqlx::test]
async fn test_garbage_bearer_token(pool: PgPool) {
    let app = common::create_test_state(pool);
    let server = common::make_server(app.state.clone());

    let response = server
        .get("/api/user")
        .add_header("Authorization", "Bearer nope")
        .await;

    response.assert_status_unauthorized();
    let body: Value = response.json();
    assert_eq!(body["error"]["message"], "Invalid or expired token");
}

#[sqlx::test]
async fn test_admin_resource_denied_for_subscriber(pool: PgPool) {
    let id = common::create_test_user(&pool, "Ada", "ada@example.com", "secret1").await;
    let app = common::create_test_state(pool);
    let server = common::make_server(app.state.clone());

    let response = server
        .get("/api/admin")
        .add_header("Authorization", common::bearer(id))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"]["message"], "Admin resource. Access denied");
}
