//! PostgreSQL user store

use async_trait::async_trait;
use common::database::is_unique_violation;
use sqlx::{PgPool, Row, postgres::PgRow};
use tracing::{debug, info};
use uuid::Uuid;

use super::{StoreError, StoreResult, UserStore};
use crate::models::{NewUser, User};

const USERS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    username TEXT NOT NULL,
    first_name TEXT NOT NULL DEFAULT '',
    last_name TEXT NOT NULL DEFAULT '',
    password_hash TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    CONSTRAINT users_username_key UNIQUE (username)
)
"#;

/// User store for database operations
#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    /// Create a new user store
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the `users` table and its username constraint when missing
    pub async fn ensure_schema(&self) -> StoreResult<()> {
        info!("Ensuring users schema");
        sqlx::query(USERS_TABLE).execute(&self.pool).await?;
        Ok(())
    }
}

fn user_from_row(row: &PgRow) -> User {
    User {
        id: row.get("id"),
        username: row.get("username"),
        first_name: row.get("first_name"),
        last_name: row.get("last_name"),
        password_hash: row.get("password_hash"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn map_write_error(err: sqlx::Error, username: &str) -> StoreError {
    if is_unique_violation(&err) {
        StoreError::UsernameTaken(username.to_string())
    } else {
        StoreError::Database(err)
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn get_all_users(&self) -> StoreResult<Vec<User>> {
        debug!("Listing users");

        let rows = sqlx::query(
            r#"
            SELECT id, username, first_name, last_name, password_hash, created_at, updated_at
            FROM users
            ORDER BY created_at, id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(user_from_row).collect())
    }

    async fn get_user_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        debug!("Finding user by ID: {}", id);

        let row = sqlx::query(
            r#"
            SELECT id, username, first_name, last_name, password_hash, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(user_from_row))
    }

    async fn get_user_by_username_and_password(
        &self,
        username: &str,
        password_hash: &str,
    ) -> StoreResult<Option<User>> {
        debug!("Finding user by credentials: {}", username);

        let row = sqlx::query(
            r#"
            SELECT id, username, first_name, last_name, password_hash, created_at, updated_at
            FROM users
            WHERE username = $1 AND password_hash = $2
            "#,
        )
        .bind(username)
        .bind(password_hash)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(user_from_row))
    }

    async fn create_user(&self, new_user: &NewUser) -> StoreResult<User> {
        let row = sqlx::query(
            r#"
            INSERT INTO users (username, first_name, last_name, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING id, username, first_name, last_name, password_hash, created_at, updated_at
            "#,
        )
        .bind(&new_user.username)
        .bind(&new_user.first_name)
        .bind(&new_user.last_name)
        .bind(&new_user.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, &new_user.username))?;

        Ok(user_from_row(&row))
    }

    async fn update_user(&self, user: &User) -> StoreResult<User> {
        let row = sqlx::query(
            r#"
            UPDATE users
            SET username = $2, first_name = $3, last_name = $4, password_hash = $5,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, username, first_name, last_name, password_hash, created_at, updated_at
            "#,
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.password_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_write_error(e, &user.username))?;

        row.as_ref()
            .map(user_from_row)
            .ok_or(StoreError::NotFound(user.id))
    }

    async fn delete_user(&self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
