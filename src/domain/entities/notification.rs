//! Records of notification deliveries that did not go through.

use chrono::{DateTime, Utc};

/// A failed step of the link-published fan-out.
///
/// `recipient` is `None` when the failure happened before any recipient was
/// known, e.g. while looking up subscribers.
#[derive(Debug, Clone)]
pub struct NotificationFailure {
    pub id: i64,
    pub link_id: i64,
    pub recipient: Option<String>,
    pub reason: String,
    pub created_at: DateTime<Utc>,
}

/// Input data for logging a failure.
#[derive(Debug, Clone, PartialEq)]
pub struct NewNotificationFailure {
    pub link_id: i64,
    pub recipient: Option<String>,
    pub reason: String,
}
