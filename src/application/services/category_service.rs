//! Category management with image upload.

use std::sync::Arc;

use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::entities::{Category, CategoryPatch, ImageRef, Link, NewCategory};
use crate::domain::repositories::{CategoryRepository, LinkRepository};
use crate::error::AppError;
use crate::infrastructure::storage::ObjectStorage;
use crate::utils::data_url::decode_image;
use crate::utils::slug::slugify;

/// A category together with one page of its links.
#[derive(Debug, Clone)]
pub struct CategoryPage {
    pub category: Category,
    pub links: Vec<Link>,
}

/// Service for category CRUD.
///
/// Object storage and the database are not updated atomically. A failed
/// insert removes the freshly uploaded image; every other stray object is
/// only logged.
pub struct CategoryService<C: CategoryRepository, L: LinkRepository> {
    categories: Arc<C>,
    links: Arc<L>,
    storage: Arc<dyn ObjectStorage>,
}

impl<C: CategoryRepository, L: LinkRepository> CategoryService<C, L> {
    pub fn new(categories: Arc<C>, links: Arc<L>, storage: Arc<dyn ObjectStorage>) -> Self {
        Self {
            categories,
            links,
            storage,
        }
    }

    /// Creates a category owned by `posted_by`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the name has no sluggable
    /// characters, the image is not a valid data URL, or the upload fails.
    /// Returns [`AppError::Conflict`] if a category with the same slug exists.
    pub async fn create(
        &self,
        name: &str,
        image: &str,
        content: &str,
        posted_by: i64,
    ) -> Result<Category, AppError> {
        let name = name.trim();
        let slug = slugify(name);
        if slug.is_empty() {
            return Err(AppError::bad_request(
                "Category name must contain letters or digits",
                json!({ "name": name }),
            ));
        }

        let image = self.upload(image).await?;
        let key = image.key.clone();

        let new_category = NewCategory {
            name: name.to_string(),
            slug: slug.clone(),
            content: content.to_string(),
            image,
            posted_by,
        };

        match self.categories.create(new_category).await {
            Ok(category) => {
                info!(slug = %category.slug, "Category created");
                Ok(category)
            }
            Err(e) => {
                self.discard_image(&key).await;
                match e {
                    AppError::Conflict { .. } => Err(AppError::conflict(
                        "Duplicate category",
                        json!({ "slug": slug }),
                    )),
                    other => Err(other),
                }
            }
        }
    }

    /// Lists every category.
    pub async fn list(&self) -> Result<Vec<Category>, AppError> {
        self.categories.list().await
    }

    /// Returns a category and a page of its newest links.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the slug is unknown.
    pub async fn read(&self, slug: &str, limit: i64, skip: i64) -> Result<CategoryPage, AppError> {
        let category = self.find(slug).await?;
        let links = self
            .links
            .list_by_category(category.id, limit, skip)
            .await?;

        Ok(CategoryPage { category, links })
    }

    /// Looks up a category by slug.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the slug is unknown.
    pub async fn find(&self, slug: &str) -> Result<Category, AppError> {
        self.categories
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| AppError::not_found("Category not found", json!({ "slug": slug })))
    }

    /// Replaces name and content, and the image when a new one is given.
    ///
    /// The slug is kept even when the name changes, so existing links to the
    /// category stay valid. The old image is removed only after the new
    /// reference is stored.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the slug is unknown.
    /// Returns [`AppError::Validation`] if the new image is invalid or the
    /// upload fails.
    pub async fn update(
        &self,
        slug: &str,
        name: &str,
        content: &str,
        image: Option<&str>,
    ) -> Result<Category, AppError> {
        let existing = self.find(slug).await?;

        let new_image = match image {
            Some(data_url) if !data_url.trim().is_empty() => Some(self.upload(data_url).await?),
            _ => None,
        };
        let new_key = new_image.as_ref().map(|i| i.key.clone());

        let patch = CategoryPatch {
            name: name.trim().to_string(),
            content: content.to_string(),
            image: new_image,
        };

        let updated = match self.categories.update(slug, patch).await {
            Ok(Some(category)) => category,
            Ok(None) => {
                if let Some(key) = &new_key {
                    self.discard_image(key).await;
                }
                return Err(AppError::not_found(
                    "Category not found",
                    json!({ "slug": slug }),
                ));
            }
            Err(e) => {
                if let Some(key) = &new_key {
                    self.discard_image(key).await;
                }
                return Err(e);
            }
        };

        if new_key.is_some() {
            self.discard_image(&existing.image.key).await;
        }

        info!(slug = %updated.slug, "Category updated");
        Ok(updated)
    }

    /// Deletes a category and then its image.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the slug is unknown.
    pub async fn remove(&self, slug: &str) -> Result<String, AppError> {
        let removed = self
            .categories
            .delete(slug)
            .await?
            .ok_or_else(|| AppError::not_found("Category not found", json!({ "slug": slug })))?;

        self.discard_image(&removed.image.key).await;

        info!(slug = %removed.slug, "Category deleted");
        Ok("Category deleted successfully".to_string())
    }

    async fn upload(&self, data_url: &str) -> Result<ImageRef, AppError> {
        let image = decode_image(data_url).map_err(|e| {
            AppError::bad_request("Invalid image", json!({ "reason": e.to_string() }))
        })?;

        let key = format!("category/{}.{}", Uuid::new_v4(), image.extension);
        let content_type = image.content_type();

        let url = self
            .storage
            .put(&key, image.bytes, &content_type)
            .await
            .map_err(|e| {
                warn!(key = %key, error = %e, "Image upload failed");
                AppError::bad_request("Upload to s3 failed", json!({}))
            })?;

        Ok(ImageRef { url, key })
    }

    async fn discard_image(&self, key: &str) {
        if let Err(e) = self.storage.delete(key).await {
            warn!(key = %key, error = %e, "Failed to delete stored image");
        }
    }
}
