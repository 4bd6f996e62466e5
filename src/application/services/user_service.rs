//! Profile reads and updates for the signed-in user.

use std::sync::Arc;

use serde_json::json;
use tracing::info;

use crate::application::services::auth_service::hash_password;
use crate::domain::entities::{Link, PublicUser, User, UserPatch};
use crate::domain::repositories::{LinkRepository, UserRepository};
use crate::error::AppError;
use crate::utils::password::is_acceptable_password;

/// A user's public profile and the links they posted.
#[derive(Debug, Clone)]
pub struct UserProfile {
    pub user: PublicUser,
    pub links: Vec<Link>,
}

/// Requested profile change. `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct ProfileChange {
    pub name: Option<String>,
    pub password: Option<String>,
    pub categories: Option<Vec<i64>>,
}

pub struct UserService<U: UserRepository, L: LinkRepository> {
    users: Arc<U>,
    links: Arc<L>,
}

impl<U: UserRepository, L: LinkRepository> UserService<U, L> {
    pub fn new(users: Arc<U>, links: Arc<L>) -> Self {
        Self { users, links }
    }

    /// Builds the profile payload for an already loaded user.
    pub async fn profile(&self, user: &User) -> Result<UserProfile, AppError> {
        let links = self.links.list_by_author(user.id).await?;

        Ok(UserProfile {
            user: user.to_public(),
            links,
        })
    }

    /// Applies a partial profile update.
    ///
    /// The password is checked before anything is written, so a rejected
    /// request leaves the profile as it was.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the password is too short or a
    /// category does not exist.
    /// Returns [`AppError::NotFound`] if the user no longer exists.
    pub async fn update(&self, user_id: i64, change: ProfileChange) -> Result<PublicUser, AppError> {
        if let Some(password) = &change.password
            && !is_acceptable_password(password)
        {
            return Err(AppError::bad_request(
                "Password must be at least 6 characters long",
                json!({}),
            ));
        }

        let password_hash = match change.password {
            Some(password) => Some(hash_password(password).await?),
            None => None,
        };

        let categories = change.categories.map(|mut ids| {
            ids.sort_unstable();
            ids.dedup();
            ids
        });

        let patch = UserPatch {
            name: change
                .name
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty()),
            password_hash,
            categories,
        };

        let user = self
            .users
            .update(user_id, patch)
            .await?
            .ok_or_else(|| AppError::not_found("User not found", json!({ "id": user_id })))?;

        info!(user_id, "Profile updated");
        Ok(user.to_public())
    }
}
