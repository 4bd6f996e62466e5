//! Repository trait for user accounts.

use crate::domain::entities::{NewUser, Role, User, UserPatch};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for user accounts and their category subscriptions.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgUserRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_user.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Finds a user by id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError>;

    /// Finds a user by email address.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    /// Creates a user together with its category subscriptions.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the email or username already exists.
    /// Returns [`AppError::Validation`] if a category id does not exist.
    async fn create(&self, new_user: NewUser) -> Result<User, AppError>;

    /// Applies a partial update. Returns `Ok(None)` if the user does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if a category id does not exist.
    async fn update(&self, id: i64, patch: UserPatch) -> Result<Option<User>, AppError>;

    /// Stores the pending password reset token, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the user does not exist.
    async fn set_reset_password_link(&self, id: i64, token: &str) -> Result<(), AppError>;

    /// Sets a new password hash for the user currently holding `token` and
    /// clears the token in the same statement.
    ///
    /// Returns the id of the updated user, or `Ok(None)` if no user holds it.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn reset_password(
        &self,
        token: &str,
        password_hash: &str,
    ) -> Result<Option<i64>, AppError>;

    /// Lists distinct users subscribed to at least one of the given categories.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_subscribers(&self, category_ids: &[i64]) -> Result<Vec<User>, AppError>;

    /// Lists all users, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn list(&self) -> Result<Vec<User>, AppError>;

    /// Changes the role of the user with the given email.
    ///
    /// Returns `Ok(false)` if no user has that email.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn set_role(&self, email: &str, role: Role) -> Result<bool, AppError>;
}
