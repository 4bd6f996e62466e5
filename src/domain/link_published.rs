//! Event emitted when a new link is published.

use crate::domain::entities::Link;

/// An in-memory notice that a link was created, queued for the fan-out worker.
///
/// Used to pass the newly created link from the HTTP handler to the background
/// worker via a channel, so the create response never waits on email delivery.
///
/// # Usage Flow
///
/// 1. Created by [`crate::application::services::LinkService::create`] after the insert commits
/// 2. Offered to the channel without waiting (dropped and logged if the queue is full)
/// 3. Processed by [`crate::domain::notification_worker::run_notification_worker`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkPublished {
    pub link_id: i64,
    pub title: String,
    pub url: String,
    /// Categories the link was filed under at creation time.
    pub categories: Vec<i64>,
}

impl LinkPublished {
    pub fn new(link_id: i64, title: String, url: String, categories: Vec<i64>) -> Self {
        Self {
            link_id,
            title,
            url,
            categories,
        }
    }
}

impl From<&Link> for LinkPublished {
    fn from(link: &Link) -> Self {
        Self::new(
            link.id,
            link.title.clone(),
            link.url.clone(),
            link.category_ids(),
        )
    }
}
