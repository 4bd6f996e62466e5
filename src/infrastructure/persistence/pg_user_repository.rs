//! PostgreSQL implementation of the user repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::{PgPool, Postgres, Transaction};
use std::sync::Arc;

use crate::domain::entities::{NewUser, Role, User, UserPatch};
use crate::domain::repositories::UserRepository;
use crate::error::AppError;

const USER_SELECT: &str = r#"
    SELECT
        u.id, u.username, u.name, u.email, u.password_hash, u.role,
        u.reset_password_link, u.created_at, u.updated_at,
        ARRAY(
            SELECT uc.category_id FROM user_categories uc
            WHERE uc.user_id = u.id
            ORDER BY uc.category_id
        ) AS categories
    FROM users u
"#;

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    username: String,
    name: String,
    email: String,
    password_hash: String,
    role: String,
    reset_password_link: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    categories: Vec<i64>,
}

impl TryFrom<UserRow> for User {
    type Error = AppError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role: Role = row.role.parse().map_err(|e: String| {
            tracing::error!(user_id = row.id, error = %e, "Unknown role stored for user");
            AppError::internal("Corrupted user record", json!({}))
        })?;

        Ok(User {
            id: row.id,
            username: row.username,
            name: row.name,
            email: row.email,
            password_hash: row.password_hash,
            role,
            categories: row.categories,
            reset_password_link: row.reset_password_link,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// PostgreSQL repository for user accounts.
pub struct PgUserRepository {
    pool: Arc<PgPool>,
}

impl PgUserRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    async fn replace_categories(
        tx: &mut Transaction<'_, Postgres>,
        user_id: i64,
        categories: &[i64],
    ) -> Result<(), AppError> {
        sqlx::query("DELETE FROM user_categories WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut **tx)
            .await?;

        sqlx::query(
            r#"
            INSERT INTO user_categories (user_id, category_id)
            SELECT $1, c FROM UNNEST($2::bigint[]) AS c
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(categories)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }

    async fn fetch_one_by_id(&self, id: i64) -> Result<User, AppError> {
        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::internal("User disappeared after write", json!({ "id": id }))
        })
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        let row = sqlx::query_as::<_, UserRow>(&format!("{USER_SELECT} WHERE u.id = $1"))
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        row.map(User::try_from).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let row = sqlx::query_as::<_, UserRow>(&format!("{USER_SELECT} WHERE u.email = $1"))
            .bind(email)
            .fetch_optional(self.pool.as_ref())
            .await?;

        row.map(User::try_from).transpose()
    }

    async fn create(&self, new_user: NewUser) -> Result<User, AppError> {
        let mut tx = self.pool.begin().await?;

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO users (username, name, email, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(&new_user.username)
        .bind(&new_user.name)
        .bind(&new_user.email)
        .bind(&new_user.password_hash)
        .fetch_one(&mut *tx)
        .await?;

        Self::replace_categories(&mut tx, id, &new_user.categories).await?;

        tx.commit().await?;

        self.fetch_one_by_id(id).await
    }

    async fn update(&self, id: i64, patch: UserPatch) -> Result<Option<User>, AppError> {
        let mut tx = self.pool.begin().await?;

        let updated: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE users
            SET name = COALESCE($2, name),
                password_hash = COALESCE($3, password_hash),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id
            "#,
        )
        .bind(id)
        .bind(patch.name)
        .bind(patch.password_hash)
        .fetch_optional(&mut *tx)
        .await?;

        if updated.is_none() {
            tx.rollback().await?;
            return Ok(None);
        }

        if let Some(categories) = patch.categories {
            Self::replace_categories(&mut tx, id, &categories).await?;
        }

        tx.commit().await?;

        self.find_by_id(id).await
    }

    async fn set_reset_password_link(&self, id: i64, token: &str) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE users SET reset_password_link = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(token)
        .execute(self.pool.as_ref())
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("User not found", json!({ "id": id })));
        }

        Ok(())
    }

    async fn reset_password(
        &self,
        token: &str,
        password_hash: &str,
    ) -> Result<Option<i64>, AppError> {
        let id = sqlx::query_scalar(
            r#"
            UPDATE users
            SET password_hash = $2, reset_password_link = NULL, updated_at = NOW()
            WHERE reset_password_link = $1
            RETURNING id
            "#,
        )
        .bind(token)
        .bind(password_hash)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(id)
    }

    async fn find_subscribers(&self, category_ids: &[i64]) -> Result<Vec<User>, AppError> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            r#"{USER_SELECT}
            WHERE u.id IN (
                SELECT DISTINCT uc.user_id FROM user_categories uc
                WHERE uc.category_id = ANY($1)
            )
            ORDER BY u.id"#
        ))
        .bind(category_ids)
        .fetch_all(self.pool.as_ref())
        .await?;

        rows.into_iter().map(User::try_from).collect()
    }

    async fn list(&self) -> Result<Vec<User>, AppError> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "{USER_SELECT} ORDER BY u.created_at DESC, u.id DESC"
        ))
        .fetch_all(self.pool.as_ref())
        .await?;

        rows.into_iter().map(User::try_from).collect()
    }

    async fn set_role(&self, email: &str, role: Role) -> Result<bool, AppError> {
        let result =
            sqlx::query("UPDATE users SET role = $2, updated_at = NOW() WHERE email = $1")
                .bind(email)
                .bind(role.as_str())
                .execute(self.pool.as_ref())
                .await?;

        Ok(result.rows_affected() > 0)
    }
}
