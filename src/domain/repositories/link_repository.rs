//! Repository trait for link data access.

use crate::domain::entities::{ClickCount, Link, LinkUpdate, NewLink};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for links and their click counters.
///
/// Every returned [`Link`] has its categories, author and click count
/// expanded.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_link.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Creates a link and files it under its categories in one transaction.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the slug (URL) already exists.
    /// Returns [`AppError::Validation`] if a category id does not exist.
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError>;

    /// Finds a link by id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_id(&self, id: i64) -> Result<Option<Link>, AppError>;

    /// Returns the id of the user who posted the link, if it exists.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_owner(&self, id: i64) -> Result<Option<i64>, AppError>;

    /// Lists links newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn list(&self, limit: i64, skip: i64) -> Result<Vec<Link>, AppError>;

    /// Lists links filed under a category, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn list_by_category(
        &self,
        category_id: i64,
        limit: i64,
        skip: i64,
    ) -> Result<Vec<Link>, AppError>;

    /// Lists every link posted by a user, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn list_by_author(&self, user_id: i64) -> Result<Vec<Link>, AppError>;

    /// Replaces a link's fields and categories. Returns `Ok(None)` if the link
    /// does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the new URL is already used.
    /// Returns [`AppError::Validation`] if a category id does not exist.
    async fn update(&self, id: i64, update: LinkUpdate) -> Result<Option<Link>, AppError>;

    /// Deletes a link and its click counter.
    ///
    /// Returns `Ok(true)` if a link was removed.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn delete(&self, id: i64) -> Result<bool, AppError>;

    /// Atomically increments the click counter for `link_id`, creating the
    /// counter if it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn increment_clicks(&self, link_id: i64) -> Result<ClickCount, AppError>;

    /// Returns the most clicked links, optionally within one category.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn most_clicked(
        &self,
        category_id: Option<i64>,
        limit: i64,
    ) -> Result<Vec<Link>, AppError>;
}
