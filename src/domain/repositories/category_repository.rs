//! Repository trait for categories.

use crate::domain::entities::{Category, CategoryPatch, NewCategory};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for categories.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgCategoryRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Creates a category.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the slug already exists.
    async fn create(&self, new_category: NewCategory) -> Result<Category, AppError>;

    /// Lists all categories ordered by name.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn list(&self) -> Result<Vec<Category>, AppError>;

    /// Finds a category by slug.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, AppError>;

    /// Loads the categories with the given ids. Unknown ids are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_ids(&self, ids: &[i64]) -> Result<Vec<Category>, AppError>;

    /// Updates a category. Returns `Ok(None)` if the slug does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn update(&self, slug: &str, patch: CategoryPatch)
    -> Result<Option<Category>, AppError>;

    /// Deletes a category and returns the removed row, or `Ok(None)` if the
    /// slug does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn delete(&self, slug: &str) -> Result<Option<Category>, AppError>;
}
