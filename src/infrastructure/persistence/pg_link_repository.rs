//! PostgreSQL implementation of the link repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, Transaction};
use std::sync::Arc;

use crate::domain::entities::{
    Author, CategoryRef, ClickCount, Link, LinkType, LinkUpdate, Medium, NewLink,
};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

/// Expands a link with its author, click count and categories.
const LINK_SELECT: &str = r#"
    SELECT
        l.id, l.title, l.url, l.slug, l.link_type, l.medium,
        l.created_at, l.updated_at,
        u.id AS author_id, u.name AS author_name, u.username AS author_username,
        COALESCE(lc.clicks, 0) AS clicks,
        COALESCE(
            (
                SELECT json_agg(
                    json_build_object('id', c.id, 'name', c.name, 'slug', c.slug)
                    ORDER BY c.name
                )
                FROM link_categories x
                JOIN categories c ON c.id = x.category_id
                WHERE x.link_id = l.id
            ),
            '[]'::json
        ) AS categories
    FROM links l
    JOIN users u ON u.id = l.posted_by
    LEFT JOIN link_clicks lc ON lc.link_id = l.id
"#;

#[derive(sqlx::FromRow)]
struct LinkRow {
    id: i64,
    title: String,
    url: String,
    slug: String,
    link_type: String,
    medium: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    author_id: i64,
    author_name: String,
    author_username: String,
    clicks: i64,
    categories: Json<Vec<CategoryRef>>,
}

impl TryFrom<LinkRow> for Link {
    type Error = AppError;

    fn try_from(row: LinkRow) -> Result<Self, Self::Error> {
        let corrupted = |e: String| {
            tracing::error!(link_id = row.id, error = %e, "Corrupted link record");
            AppError::internal("Corrupted link record", json!({}))
        };

        let link_type: LinkType = row.link_type.parse().map_err(corrupted)?;
        let medium: Medium = row.medium.parse().map_err(corrupted)?;

        Ok(Link {
            id: row.id,
            title: row.title,
            url: row.url,
            slug: row.slug,
            link_type,
            medium,
            categories: row.categories.0,
            posted_by: Author {
                id: row.author_id,
                name: row.author_name,
                username: row.author_username,
            },
            clicks: row.clicks,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// PostgreSQL repository for links and click counters.
///
/// Uses SQLx prepared statements for SQL injection protection and type safety.
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
}

impl PgLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    async fn file_under(
        tx: &mut Transaction<'_, Postgres>,
        link_id: i64,
        categories: &[i64],
    ) -> Result<(), AppError> {
        sqlx::query("DELETE FROM link_categories WHERE link_id = $1")
            .bind(link_id)
            .execute(&mut **tx)
            .await?;

        sqlx::query(
            r#"
            INSERT INTO link_categories (link_id, category_id)
            SELECT $1, c FROM UNNEST($2::bigint[]) AS c
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(link_id)
        .bind(categories)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }

    async fn fetch_many(
        &self,
        query: &str,
        bind: impl FnOnce(
            sqlx::query::QueryAs<'_, Postgres, LinkRow, sqlx::postgres::PgArguments>,
        )
            -> sqlx::query::QueryAs<'_, Postgres, LinkRow, sqlx::postgres::PgArguments>,
    ) -> Result<Vec<Link>, AppError> {
        let rows = bind(sqlx::query_as::<_, LinkRow>(query))
            .fetch_all(self.pool.as_ref())
            .await?;

        rows.into_iter().map(Link::try_from).collect()
    }
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError> {
        let mut tx = self.pool.begin().await?;

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO links (title, url, slug, link_type, medium, posted_by)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(&new_link.title)
        .bind(&new_link.url)
        .bind(&new_link.slug)
        .bind(new_link.link_type.as_str())
        .bind(new_link.medium.as_str())
        .bind(new_link.posted_by)
        .fetch_one(&mut *tx)
        .await?;

        Self::file_under(&mut tx, id, &new_link.categories).await?;

        tx.commit().await?;

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::internal("Link disappeared after insert", json!({ "id": id }))
        })
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Link>, AppError> {
        let row = sqlx::query_as::<_, LinkRow>(&format!("{LINK_SELECT} WHERE l.id = $1"))
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        row.map(Link::try_from).transpose()
    }

    async fn find_owner(&self, id: i64) -> Result<Option<i64>, AppError> {
        let owner = sqlx::query_scalar("SELECT posted_by FROM links WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(owner)
    }

    async fn list(&self, limit: i64, skip: i64) -> Result<Vec<Link>, AppError> {
        self.fetch_many(
            &format!("{LINK_SELECT} ORDER BY l.created_at DESC, l.id DESC LIMIT $1 OFFSET $2"),
            |q| q.bind(limit).bind(skip),
        )
        .await
    }

    async fn list_by_category(
        &self,
        category_id: i64,
        limit: i64,
        skip: i64,
    ) -> Result<Vec<Link>, AppError> {
        self.fetch_many(
            &format!(
                r#"{LINK_SELECT}
                WHERE EXISTS (
                    SELECT 1 FROM link_categories x
                    WHERE x.link_id = l.id AND x.category_id = $1
                )
                ORDER BY l.created_at DESC, l.id DESC
                LIMIT $2 OFFSET $3"#
            ),
            |q| q.bind(category_id).bind(limit).bind(skip),
        )
        .await
    }

    async fn list_by_author(&self, user_id: i64) -> Result<Vec<Link>, AppError> {
        self.fetch_many(
            &format!("{LINK_SELECT} WHERE l.posted_by = $1 ORDER BY l.created_at DESC, l.id DESC"),
            |q| q.bind(user_id),
        )
        .await
    }

    async fn update(&self, id: i64, update: LinkUpdate) -> Result<Option<Link>, AppError> {
        let mut tx = self.pool.begin().await?;

        let updated: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE links
            SET title = $2, url = $3, slug = $4, link_type = $5, medium = $6, updated_at = NOW()
            WHERE id = $1
            RETURNING id
            "#,
        )
        .bind(id)
        .bind(&update.title)
        .bind(&update.url)
        .bind(&update.slug)
        .bind(update.link_type.as_str())
        .bind(update.medium.as_str())
        .fetch_optional(&mut *tx)
        .await?;

        if updated.is_none() {
            tx.rollback().await?;
            return Ok(None);
        }

        Self::file_under(&mut tx, id, &update.categories).await?;

        tx.commit().await?;

        self.find_by_id(id).await
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("DELETE FROM links WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        sqlx::query("DELETE FROM link_clicks WHERE link_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(true)
    }

    async fn increment_clicks(&self, link_id: i64) -> Result<ClickCount, AppError> {
        let (link_id, clicks): (i64, i64) = sqlx::query_as(
            r#"
            INSERT INTO link_clicks (link_id, clicks)
            VALUES ($1, 1)
            ON CONFLICT (link_id) DO UPDATE SET clicks = link_clicks.clicks + 1
            RETURNING link_id, clicks
            "#,
        )
        .bind(link_id)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(ClickCount { link_id, clicks })
    }

    async fn most_clicked(
        &self,
        category_id: Option<i64>,
        limit: i64,
    ) -> Result<Vec<Link>, AppError> {
        self.fetch_many(
            &format!(
                r#"{LINK_SELECT}
                WHERE $1::bigint IS NULL OR EXISTS (
                    SELECT 1 FROM link_categories x
                    WHERE x.link_id = l.id AND x.category_id = $1
                )
                ORDER BY clicks DESC, l.created_at DESC, l.id DESC
                LIMIT $2"#
            ),
            |q| q.bind(category_id).bind(limit),
        )
        .await
    }
}
