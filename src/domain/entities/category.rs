//! Category entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::user::Author;

/// Reference to an image kept in object storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRef {
    /// Public URL of the stored object.
    pub url: String,
    /// Object key inside the bucket.
    pub key: String,
}

/// A category that links are filed under and users subscribe to.
#[derive(Debug, Clone, Serialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub content: String,
    pub image: ImageRef,
    pub posted_by: Author,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Short category reference embedded in links.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRef {
    pub id: i64,
    pub name: String,
    pub slug: String,
}

impl Category {
    pub fn to_ref(&self) -> CategoryRef {
        CategoryRef {
            id: self.id,
            name: self.name.clone(),
            slug: self.slug.clone(),
        }
    }
}

/// Input data for creating a category.
#[derive(Debug, Clone)]
pub struct NewCategory {
    pub name: String,
    pub slug: String,
    pub content: String,
    pub image: ImageRef,
    pub posted_by: i64,
}

/// Update applied to an existing category.
///
/// Name and content are always replaced; `image` is only replaced when set.
#[derive(Debug, Clone)]
pub struct CategoryPatch {
    pub name: String,
    pub content: String,
    pub image: Option<ImageRef>,
}
