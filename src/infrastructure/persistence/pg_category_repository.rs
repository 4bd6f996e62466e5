//! PostgreSQL implementation of the category repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{Author, Category, CategoryPatch, ImageRef, NewCategory};
use crate::domain::repositories::CategoryRepository;
use crate::error::AppError;

/// Columns selected from a `categories` row aliased `c` joined with its author `u`.
const CATEGORY_COLUMNS: &str = r#"
    c.id, c.name, c.slug, c.content, c.image_url, c.image_key,
    c.created_at, c.updated_at,
    u.id AS author_id, u.name AS author_name, u.username AS author_username
"#;

#[derive(sqlx::FromRow)]
struct CategoryRow {
    id: i64,
    name: String,
    slug: String,
    content: String,
    image_url: String,
    image_key: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    author_id: i64,
    author_name: String,
    author_username: String,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Category {
            id: row.id,
            name: row.name,
            slug: row.slug,
            content: row.content,
            image: ImageRef {
                url: row.image_url,
                key: row.image_key,
            },
            posted_by: Author {
                id: row.author_id,
                name: row.author_name,
                username: row.author_username,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// PostgreSQL repository for categories.
pub struct PgCategoryRepository {
    pool: Arc<PgPool>,
}

impl PgCategoryRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CategoryRepository for PgCategoryRepository {
    async fn create(&self, new_category: NewCategory) -> Result<Category, AppError> {
        let row = sqlx::query_as::<_, CategoryRow>(&format!(
            r#"
            WITH inserted AS (
                INSERT INTO categories (name, slug, content, image_url, image_key, posted_by)
                VALUES ($1, $2, $3, $4, $5, $6)
                RETURNING *
            )
            SELECT {CATEGORY_COLUMNS}
            FROM inserted c
            JOIN users u ON u.id = c.posted_by
            "#
        ))
        .bind(&new_category.name)
        .bind(&new_category.slug)
        .bind(&new_category.content)
        .bind(&new_category.image.url)
        .bind(&new_category.image.key)
        .bind(new_category.posted_by)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.into())
    }

    async fn list(&self) -> Result<Vec<Category>, AppError> {
        let rows = sqlx::query_as::<_, CategoryRow>(&format!(
            r#"
            SELECT {CATEGORY_COLUMNS}
            FROM categories c
            JOIN users u ON u.id = c.posted_by
            ORDER BY c.name, c.id
            "#
        ))
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Category::from).collect())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, AppError> {
        let row = sqlx::query_as::<_, CategoryRow>(&format!(
            r#"
            SELECT {CATEGORY_COLUMNS}
            FROM categories c
            JOIN users u ON u.id = c.posted_by
            WHERE c.slug = $1
            "#
        ))
        .bind(slug)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Category::from))
    }

    async fn find_by_ids(&self, ids: &[i64]) -> Result<Vec<Category>, AppError> {
        let rows = sqlx::query_as::<_, CategoryRow>(&format!(
            r#"
            SELECT {CATEGORY_COLUMNS}
            FROM categories c
            JOIN users u ON u.id = c.posted_by
            WHERE c.id = ANY($1)
            ORDER BY c.name, c.id
            "#
        ))
        .bind(ids)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Category::from).collect())
    }

    async fn update(
        &self,
        slug: &str,
        patch: CategoryPatch,
    ) -> Result<Option<Category>, AppError> {
        let (image_url, image_key) = match patch.image {
            Some(image) => (Some(image.url), Some(image.key)),
            None => (None, None),
        };

        let row = sqlx::query_as::<_, CategoryRow>(&format!(
            r#"
            WITH updated AS (
                UPDATE categories
                SET name = $2,
                    content = $3,
                    image_url = COALESCE($4, image_url),
                    image_key = COALESCE($5, image_key),
                    updated_at = NOW()
                WHERE slug = $1
                RETURNING *
            )
            SELECT {CATEGORY_COLUMNS}
            FROM updated c
            JOIN users u ON u.id = c.posted_by
            "#
        ))
        .bind(slug)
        .bind(&patch.name)
        .bind(&patch.content)
        .bind(image_url)
        .bind(image_key)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Category::from))
    }

    async fn delete(&self, slug: &str) -> Result<Option<Category>, AppError> {
        let row = sqlx::query_as::<_, CategoryRow>(&format!(
            r#"
            WITH deleted AS (
                DELETE FROM categories WHERE slug = $1
                RETURNING *
            )
            SELECT {CATEGORY_COLUMNS}
            FROM deleted c
            JOIN users u ON u.id = c.posted_by
            "#
        ))
        .bind(slug)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Category::from))
    }
}
