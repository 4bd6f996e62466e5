//! Repository trait for the notification failure log.

use crate::domain::entities::{NewNotificationFailure, NotificationFailure};
use crate::error::AppError;
use async_trait::async_trait;

/// Persistent log of failed link-published notifications.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Appends a failure record.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn record_failure(&self, failure: NewNotificationFailure) -> Result<(), AppError>;

    /// Lists the most recent failures, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn list_recent(&self, limit: i64) -> Result<Vec<NotificationFailure>, AppError>;
}
