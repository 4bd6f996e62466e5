//! Subscriber fan-out for published links.

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use tracing::{debug, info, warn};

use crate::domain::entities::NewNotificationFailure;
use crate::domain::link_published::LinkPublished;
use crate::domain::notification_worker::PublishNotifier;
use crate::domain::repositories::{CategoryRepository, NotificationRepository, UserRepository};
use crate::infrastructure::mail::{Mailer, templates};

/// Emails every subscriber of a published link's categories.
///
/// Each subscriber gets exactly one email even when they follow several of
/// the link's categories. Failures are logged and appended to the failure
/// log; there is no retry.
pub struct NotificationService<U, C, N>
where
    U: UserRepository,
    C: CategoryRepository,
    N: NotificationRepository,
{
    users: Arc<U>,
    categories: Arc<C>,
    failures: Arc<N>,
    mailer: Arc<dyn Mailer>,
    client_url: String,
}

impl<U, C, N> NotificationService<U, C, N>
where
    U: UserRepository,
    C: CategoryRepository,
    N: NotificationRepository,
{
    pub fn new(
        users: Arc<U>,
        categories: Arc<C>,
        failures: Arc<N>,
        mailer: Arc<dyn Mailer>,
        client_url: String,
    ) -> Self {
        Self {
            users,
            categories,
            failures,
            mailer,
            client_url,
        }
    }

    async fn record(&self, link_id: i64, recipient: Option<String>, reason: String) {
        let failure = NewNotificationFailure {
            link_id,
            recipient,
            reason,
        };

        if let Err(e) = self.failures.record_failure(failure).await {
            warn!(link_id, error = %e, "Failed to record notification failure");
        }
    }
}

#[async_trait]
impl<U, C, N> PublishNotifier for NotificationService<U, C, N>
where
    U: UserRepository,
    C: CategoryRepository,
    N: NotificationRepository,
{
    async fn notify(&self, event: LinkPublished) {
        let link_id = event.link_id;

        let subscribers = match self.users.find_subscribers(&event.categories).await {
            Ok(users) => users,
            Err(e) => {
                warn!(link_id, error = %e, "Subscriber lookup failed");
                self.record(link_id, None, format!("subscriber lookup failed: {e}"))
                    .await;
                return;
            }
        };

        if subscribers.is_empty() {
            debug!(link_id, "No subscribers to notify");
            return;
        }

        let categories = match self.categories.find_by_ids(&event.categories).await {
            Ok(categories) => categories,
            Err(e) => {
                warn!(link_id, error = %e, "Category lookup failed");
                self.record(link_id, None, format!("category lookup failed: {e}"))
                    .await;
                return;
            }
        };

        let sends = subscribers.iter().map(|user| {
            let message =
                templates::link_published_email(&user.email, &self.client_url, &event, &categories);
            let mailer = self.mailer.clone();
            async move { (user.email.clone(), mailer.send(message).await) }
        });

        let mut delivered = 0usize;
        for (recipient, result) in join_all(sends).await {
            match result {
                Ok(()) => delivered += 1,
                Err(e) => {
                    warn!(link_id, recipient = %recipient, error = %e, "Notification email failed");
                    self.record(link_id, Some(recipient), e.to_string()).await;
                }
            }
        }

        info!(
            link_id,
            delivered,
            total = subscribers.len(),
            "Link notifications sent"
        );
    }
}
