//! Background worker draining the link-published queue.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::{Semaphore, mpsc};

use crate::domain::link_published::LinkPublished;

/// Delivers the notifications for one published link.
///
/// Implementations handle and log their own failures; the worker never sees
/// an error and never retries.
#[async_trait]
pub trait PublishNotifier: Send + Sync {
    async fn notify(&self, event: LinkPublished);
}

/// Consumes events until every sender is dropped.
///
/// Up to `concurrency` events are delivered at the same time. Once the channel
/// closes, in-flight deliveries are awaited before returning.
pub async fn run_notification_worker(
    mut rx: mpsc::Receiver<LinkPublished>,
    notifier: Arc<dyn PublishNotifier>,
    concurrency: usize,
) {
    let permits = Arc::new(Semaphore::new(concurrency.max(1)));

    while let Some(event) = rx.recv().await {
        let Ok(permit) = permits.clone().acquire_owned().await else {
            break;
        };
        let notifier = notifier.clone();

        tokio::spawn(async move {
            let link_id = event.link_id;
            notifier.notify(event).await;
            tracing::debug!(link_id, "Publish notifications processed");
            drop(permit);
        });
    }

    // Wait for in-flight deliveries by reclaiming every permit.
    let _ = permits.acquire_many(concurrency.max(1) as u32).await;
    tracing::info!("Notification worker stopped");
}
