//! Link publishing, retrieval and click counting.

use std::sync::Arc;

use serde_json::json;
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{info, warn};

use crate::domain::entities::{
    ClickCount, Link, LinkType, LinkUpdate, Medium, NewLink, NewNotificationFailure,
};
use crate::domain::link_published::LinkPublished;
use crate::domain::repositories::{CategoryRepository, LinkRepository, NotificationRepository};
use crate::error::AppError;
use crate::utils::link_url::canonicalize;

/// Number of links returned by the popularity queries.
pub const POPULAR_LIMIT: i64 = 3;

/// Editable fields of a link as submitted by a client.
#[derive(Debug, Clone)]
pub struct LinkDraft {
    pub title: String,
    pub url: String,
    pub link_type: LinkType,
    pub medium: Medium,
    pub categories: Vec<i64>,
}

/// A draft after trimming, slug derivation and category dedup.
struct Prepared {
    title: String,
    url: String,
    slug: String,
    categories: Vec<i64>,
}

/// Service for link CRUD, click counters and popularity.
///
/// A created link is announced on the publish queue without waiting. The
/// response never depends on whether the announcement was accepted.
pub struct LinkService<L: LinkRepository, C: CategoryRepository, N: NotificationRepository> {
    links: Arc<L>,
    categories: Arc<C>,
    failures: Arc<N>,
    publisher: mpsc::Sender<LinkPublished>,
}

impl<L, C, N> LinkService<L, C, N>
where
    L: LinkRepository,
    C: CategoryRepository,
    N: NotificationRepository,
{
    pub fn new(
        links: Arc<L>,
        categories: Arc<C>,
        failures: Arc<N>,
        publisher: mpsc::Sender<LinkPublished>,
    ) -> Self {
        Self {
            links,
            categories,
            failures,
            publisher,
        }
    }

    /// Publishes a link and queues the subscriber notification.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the URL is invalid, no category is
    /// given, or a category does not exist.
    /// Returns [`AppError::Conflict`] if the URL is already published.
    pub async fn create(&self, draft: LinkDraft, posted_by: i64) -> Result<Link, AppError> {
        let Prepared {
            title,
            url,
            slug,
            categories,
        } = Self::prepare(&draft)?;

        let new_link = NewLink {
            title,
            url,
            slug,
            link_type: draft.link_type,
            medium: draft.medium,
            categories,
            posted_by,
        };

        let link = self
            .links
            .create(new_link)
            .await
            .map_err(Self::duplicate_as_exists)?;

        info!(link_id = link.id, posted_by, "Link published");
        self.announce(&link).await;

        Ok(link)
    }

    /// Lists links newest first.
    pub async fn list(&self, limit: i64, skip: i64) -> Result<Vec<Link>, AppError> {
        self.links.list(limit, skip).await
    }

    /// Lists every link a user posted.
    pub async fn list_by_author(&self, user_id: i64) -> Result<Vec<Link>, AppError> {
        self.links.list_by_author(user_id).await
    }

    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the link does not exist.
    pub async fn read(&self, id: i64) -> Result<Link, AppError> {
        self.links
            .find_by_id(id)
            .await?
            .ok_or_else(|| Self::missing(id))
    }

    /// Replaces a link's fields and categories.
    ///
    /// Ownership is not checked here; see [`Self::ensure_owner`].
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the link disappeared.
    /// Returns [`AppError::Conflict`] if the new URL is already published.
    pub async fn update(&self, id: i64, draft: LinkDraft) -> Result<Link, AppError> {
        let Prepared {
            title,
            url,
            slug,
            categories,
        } = Self::prepare(&draft)?;

        let update = LinkUpdate {
            title,
            url,
            slug,
            link_type: draft.link_type,
            medium: draft.medium,
            categories,
        };

        let link = self
            .links
            .update(id, update)
            .await
            .map_err(Self::duplicate_as_exists)?
            .ok_or_else(|| Self::missing(id))?;

        info!(link_id = id, "Link updated");
        Ok(link)
    }

    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the link does not exist.
    pub async fn remove(&self, id: i64) -> Result<String, AppError> {
        if !self.links.delete(id).await? {
            return Err(Self::missing(id));
        }

        info!(link_id = id, "Link removed");
        Ok("Link removed successfully".to_string())
    }

    /// Checks that `user_id` posted the link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the link does not exist or belongs
    /// to someone else.
    pub async fn ensure_owner(&self, link_id: i64, user_id: i64) -> Result<(), AppError> {
        let owner = self
            .links
            .find_owner(link_id)
            .await?
            .ok_or_else(|| AppError::bad_request("Could not find link", json!({ "id": link_id })))?;

        if owner != user_id {
            return Err(AppError::bad_request("You are not authorized", json!({})));
        }

        Ok(())
    }

    /// Counts a click. Unknown ids get a counter of their own.
    pub async fn click_count(&self, link_id: i64) -> Result<ClickCount, AppError> {
        self.links.increment_clicks(link_id).await
    }

    /// The most clicked links overall.
    pub async fn popular(&self) -> Result<Vec<Link>, AppError> {
        self.links.most_clicked(None, POPULAR_LIMIT).await
    }

    /// The most clicked links within a category.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the slug is unknown.
    pub async fn popular_in_category(&self, slug: &str) -> Result<Vec<Link>, AppError> {
        let category = self
            .categories
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| AppError::not_found("Category not found", json!({ "slug": slug })))?;

        self.links
            .most_clicked(Some(category.id), POPULAR_LIMIT)
            .await
    }

    /// Reports whether the publish queue still has a consumer, and its free capacity.
    pub fn queue_status(&self) -> (bool, usize) {
        (!self.publisher.is_closed(), self.publisher.capacity())
    }

    fn prepare(draft: &LinkDraft) -> Result<Prepared, AppError> {
        let url = draft.url.trim().to_string();
        let slug = canonicalize(&url).map_err(|e| {
            AppError::bad_request("Invalid URL format", json!({ "reason": e.to_string() }))
        })?;

        let mut categories = draft.categories.clone();
        categories.sort_unstable();
        categories.dedup();

        if categories.is_empty() {
            return Err(AppError::bad_request(
                "Pick at least one category",
                json!({}),
            ));
        }

        Ok(Prepared {
            title: draft.title.trim().to_string(),
            url,
            slug,
            categories,
        })
    }

    async fn announce(&self, link: &Link) {
        let reason = match self.publisher.try_send(LinkPublished::from(link)) {
            Ok(()) => return,
            Err(TrySendError::Full(_)) => "notification queue full",
            Err(TrySendError::Closed(_)) => "notification queue closed",
        };

        warn!(link_id = link.id, reason, "Link published without notifications");

        let failure = NewNotificationFailure {
            link_id: link.id,
            recipient: None,
            reason: reason.to_string(),
        };

        if let Err(e) = self.failures.record_failure(failure).await {
            warn!(link_id = link.id, error = %e, "Failed to record notification failure");
        }
    }

    fn duplicate_as_exists(e: AppError) -> AppError {
        match e {
            AppError::Conflict { details, .. } => AppError::conflict("Link already exists", details),
            other => other,
        }
    }

    fn missing(id: i64) -> AppError {
        AppError::not_found("Link not found", json!({ "id": id }))
    }
}
