//! HTTP server initialization and runtime setup.
//!
//! Handles the database pool, external services, the notification worker and
//! the Axum server lifecycle.

use crate::config::Config;
use crate::domain::notification_worker::run_notification_worker;
use crate::infrastructure::mail::{Mailer, OutboxMailer, SmtpMailer};
use crate::infrastructure::storage::{MemoryStorage, MinioStorage, ObjectStorage};
use crate::routes::{RouterSettings, app_router};
use crate::state::{AppState, StateDeps};
use crate::utils::jwt::{TokenSecrets, TokenSigner};

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Builds the connection pool from the pool settings.
pub async fn connect_database(config: &Config) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;

    Ok(pool)
}

/// SMTP when configured, otherwise an outbox that only logs.
fn build_mailer(config: &Config) -> Result<Arc<dyn Mailer>> {
    match &config.smtp {
        Some(smtp) => {
            let mailer = SmtpMailer::new(smtp).context("Failed to configure SMTP")?;
            tracing::info!(host = %smtp.host, "Mail enabled (SMTP)");
            Ok(Arc::new(mailer))
        }
        None => {
            tracing::warn!("SMTP not configured, emails are kept in an in-memory outbox");
            Ok(Arc::new(OutboxMailer::new()))
        }
    }
}

/// S3-compatible storage when configured, otherwise an in-memory store.
async fn build_storage(config: &Config) -> Result<Arc<dyn ObjectStorage>> {
    match &config.s3 {
        Some(s3) => {
            let storage = MinioStorage::connect(s3)
                .await
                .context("Failed to connect to object storage")?;
            tracing::info!(endpoint = %s3.endpoint, bucket = %s3.bucket, "Object storage enabled");
            Ok(Arc::new(storage))
        }
        None => {
            tracing::warn!("S3 not configured, images are kept in memory");
            Ok(Arc::new(MemoryStorage::new()))
        }
    }
}

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL connection pool
/// - Apply migrations
/// - Mailer and object storage (or in-memory fallbacks)
/// - Background notification worker
/// - Axum HTTP server
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - SMTP or object storage is configured but unusable
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let pool = connect_database(&config).await?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;

    let mailer = build_mailer(&config)?;
    let storage = build_storage(&config).await?;

    let tokens = TokenSigner::new(TokenSecrets {
        session: config.jwt_secret.clone(),
        activation: config.jwt_account_activation.clone(),
        reset: config.jwt_reset_password.clone(),
    });

    let (publish_tx, publish_rx) = mpsc::channel(config.notification_queue_capacity);

    let state = AppState::new(StateDeps {
        pool: Arc::new(pool),
        tokens,
        mailer,
        storage,
        publisher: publish_tx,
        client_url: config.client_url.clone(),
    });

    tokio::spawn(run_notification_worker(
        publish_rx,
        state.notification_service.clone(),
        config.notification_worker_concurrency,
    ));
    tracing::info!(
        concurrency = config.notification_worker_concurrency,
        "Notification worker started"
    );

    let app = app_router(
        state,
        &RouterSettings {
            client_url: config.client_url.clone(),
            body_limit_bytes: config.body_limit_bytes,
        },
    );

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid listen address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
