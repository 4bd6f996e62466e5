//! DTOs for category endpoints.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::application::services::CategoryPage;
use crate::domain::entities::{Category, Link};

/// Body of `POST /category`.
///
/// `image` is a `data:image/<type>;base64,<payload>` URL.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCategoryRequest {
    #[validate(length(min = 1, max = 32, message = "Name is required"))]
    pub name: String,

    #[validate(length(min = 1, message = "Image is required"))]
    pub image: String,

    #[validate(length(min = 20, message = "Content is required and must be at least 20 characters long"))]
    pub content: String,
}

/// Body of `PUT /category/{slug}`. The image is kept when `image` is absent.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCategoryRequest {
    #[validate(length(min = 1, max = 32, message = "Name is required"))]
    pub name: String,

    #[validate(length(min = 20, message = "Content is required and must be at least 20 characters long"))]
    pub content: String,

    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CategoryPageResponse {
    pub category: Category,
    pub links: Vec<Link>,
}

impl From<CategoryPage> for CategoryPageResponse {
    fn from(page: CategoryPage) -> Self {
        Self {
            category: page.category,
            links: page.links,
        }
    }
}
