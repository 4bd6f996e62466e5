//! PostgreSQL implementation of the notification failure log.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{NewNotificationFailure, NotificationFailure};
use crate::domain::repositories::NotificationRepository;
use crate::error::AppError;

#[derive(sqlx::FromRow)]
struct FailureRow {
    id: i64,
    link_id: i64,
    recipient: Option<String>,
    reason: String,
    created_at: DateTime<Utc>,
}

pub struct PgNotificationRepository {
    pool: Arc<PgPool>,
}

impl PgNotificationRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationRepository for PgNotificationRepository {
    async fn record_failure(&self, failure: NewNotificationFailure) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO notification_failures (link_id, recipient, reason) VALUES ($1, $2, $3)",
        )
        .bind(failure.link_id)
        .bind(failure.recipient)
        .bind(failure.reason)
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn list_recent(&self, limit: i64) -> Result<Vec<NotificationFailure>, AppError> {
        let rows = sqlx::query_as::<_, FailureRow>(
            r#"
            SELECT id, link_id, recipient, reason, created_at
            FROM notification_failures
            ORDER BY created_at DESC, id DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| NotificationFailure {
                id: r.id,
                link_id: r.link_id,
                recipient: r.recipient,
                reason: r.reason,
                created_at: r.created_at,
            })
            .collect())
    }
}
