//! DTOs for the user profile endpoints.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::application::services::{ProfileChange, UserProfile};
use crate::domain::entities::{Link, PublicUser};

#[derive(Debug, Serialize)]
pub struct UserProfileResponse {
    pub user: PublicUser,
    pub links: Vec<Link>,
}

impl From<UserProfile> for UserProfileResponse {
    fn from(profile: UserProfile) -> Self {
        Self {
            user: profile.user,
            links: profile.links,
        }
    }
}

/// Body of `PUT /user`. Omitted fields are left unchanged, and so is the
/// password when it is sent as an empty string.
///
/// The password length is enforced by the service, which rejects the whole
/// update before writing anything.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 32, message = "Name must be between 1 and 32 characters"))]
    pub name: Option<String>,

    pub password: Option<String>,

    pub categories: Option<Vec<i64>>,
}

impl From<UpdateUserRequest> for ProfileChange {
    fn from(req: UpdateUserRequest) -> Self {
        ProfileChange {
            name: req.name,
            password: req.password.filter(|p| !p.is_empty()),
            categories: req.categories,
        }
    }
}
