#![allow(dead_code)]

use axum_test::TestServer;
use link_board::domain::link_published::LinkPublished;
use link_board::infrastructure::mail::OutboxMailer;
use link_board::infrastructure::storage::MemoryStorage;
use link_board::routes::{RouterSettings, build_router};
use link_board::state::{AppState, StateDeps};
use link_board::utils::jwt::{TokenSecrets, TokenSigner};
use link_board::utils::password::hash_password;
use sqlx::PgPool;
use std::sync::Arc;
use tokio::sync::mpsc;

pub const CLIENT_URL: &str = "http://localhost:3000";

/// A 1x1 transparent PNG as a data URL.
pub const PNG_DATA_URL: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

pub const CATEGORY_CONTENT: &str = "Everything worth reading about this topic.";

pub fn test_signer() -> TokenSigner {
    TokenSigner::new(TokenSecrets {
        session: "test-session-secret".to_string(),
        activation: "test-activation-secret".to_string(),
        reset: "test-reset-secret".to_string(),
    })
}

/// Everything a test needs to look behind the HTTP surface.
pub struct TestApp {
    pub state: AppState,
    pub mailer: Arc<OutboxMailer>,
    pub storage: Arc<MemoryStorage>,
    pub published: mpsc::Receiver<LinkPublished>,
}

pub fn create_test_state(pool: PgPool) -> TestApp {
    create_test_state_with_capacity(pool, 100)
}

pub fn create_test_state_with_capacity(pool: PgPool, capacity: usize) -> TestApp {
    let mailer = Arc::new(OutboxMailer::new());
    let storage = Arc::new(MemoryStorage::new());
    let (tx, rx) = mpsc::channel(capacity);

    let state = AppState::new(StateDeps {
        pool: Arc::new(pool),
        tokens: test_signer(),
        mailer: mailer.clone(),
        storage: storage.clone(),
        publisher: tx,
        client_url: CLIENT_URL.to_string(),
    });

    TestApp {
        state,
        mailer,
        storage,
        published: rx,
    }
}

pub fn make_server(state: AppState) -> TestServer {
    let app = build_router(
        state,
        &RouterSettings {
            client_url: CLIENT_URL.to_string(),
            body_limit_bytes: 1024 * 1024,
        },
    );
    TestServer::new(app).unwrap()
}

pub async fn create_test_user(pool: &PgPool, name: &str, email: &str, password: &str) -> i64 {
    let hash = hash_password(password).unwrap();
    let username = email.split('@').next().unwrap().to_string();

    sqlx::query_scalar(
        "INSERT INTO users (username, name, email, password_hash) VALUES ($1, $2, $3, $4) RETURNING id",
    )
    .bind(username)
    .bind(name)
    .bind(email)
    .bind(hash)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn create_admin_user(pool: &PgPool, name: &str, email: &str, password: &str) -> i64 {
    let id = create_test_user(pool, name, email, password).await;
    sqlx::query("UPDATE users SET role = 'admin' WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await
        .unwrap();
    id
}

pub async fn subscribe(pool: &PgPool, user_id: i64, category_id: i64) {
    sqlx::query("INSERT INTO user_categories (user_id, category_id) VALUES ($1, $2)")
        .bind(user_id)
        .bind(category_id)
        .execute(pool)
        .await
        .unwrap();
}

pub fn bearer(user_id: i64) -> String {
    format!("Bearer {}", test_signer().sign_session(user_id).unwrap())
}

pub async fn create_test_category(pool: &PgPool, name: &str, slug: &str, posted_by: i64) -> i64 {
    sqlx::query_scalar(
        r#"
        INSERT INTO categories (name, slug, content, image_url, image_key, posted_by)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id
        "#,
    )
    .bind(name)
    .bind(slug)
    .bind(CATEGORY_CONTENT)
    .bind(format!("memory://category/{slug}.png"))
    .bind(format!("category/{slug}.png"))
    .bind(posted_by)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn create_test_link(
    pool: &PgPool,
    title: &str,
    url: &str,
    posted_by: i64,
    categories: &[i64],
) -> i64 {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO links (title, url, slug, posted_by) VALUES ($1, $2, $2, $3) RETURNING id",
    )
    .bind(title)
    .bind(url)
    .bind(posted_by)
    .fetch_one(pool)
    .await
    .unwrap();

    sqlx::query(
        "INSERT INTO link_categories (link_id, category_id) SELECT $1, c FROM UNNEST($2::bigint[]) AS c",
    )
    .bind(id)
    .bind(categories)
    .execute(pool)
    .await
    .unwrap();

    id
}

pub async fn set_clicks(pool: &PgPool, link_id: i64, clicks: i64) {
    sqlx::query(
        "INSERT INTO link_clicks (link_id, clicks) VALUES ($1, $2) ON CONFLICT (link_id) DO UPDATE SET clicks = $2",
    )
    .bind(link_id)
    .bind(clicks)
    .execute(pool)
    .await
    .unwrap();
}

pub async fn count_rows(pool: &PgPool, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .unwrap()
}

/// Pulls the token out of the first `{CLIENT_URL}{path}<token>` link in a text body.
pub fn token_from_body(body: &str, path: &str) -> String {
    let prefix = format!("{CLIENT_URL}{path}");
    let start = body.find(&prefix).unwrap() + prefix.len();
    body[start..]
        .split_whitespace()
        .next()
        .unwrap()
        .to_string()
}
