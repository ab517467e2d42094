//! PostgreSQL user repository

use anyhow::Result;
use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::PgRow};
use tracing::info;
use uuid::Uuid;

use super::UserRepository;
use crate::models::user::{BanUpdate, NewUser, User};

const USER_COLUMNS: &str =
    "id, email, full_name, password_hash, role, is_banned, created_at, updated_at";

/// User repository
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    /// Create a new user repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn user_from_row(row: &PgRow) -> Result<User> {
    Ok(User {
        id: row.try_get("id")?,
        email: row.try_get("email")?,
        full_name: row.try_get("full_name")?,
        password_hash: row.try_get("password_hash")?,
        role: row.try_get::<String, _>("role")?.parse()?,
        is_banned: row.try_get("is_banned")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, new_user: &NewUser) -> Result<Option<User>> {
        info!("Creating new user: {}", new_user.email);

        let sql = format!(
            r#"
            INSERT INTO users (id, email, full_name, password_hash, role)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT ((lower(email))) DO NOTHING
            RETURNING {USER_COLUMNS}
            "#
        );

        let row = sqlx::query(&sql)
            .bind(Uuid::new_v4())
            .bind(&new_user.email)
            .bind(&new_user.full_name)
            .bind(&new_user.password_hash)
            .bind(new_user.role.as_str())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(user_from_row).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        info!("Finding user by email: {}", email);

        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE lower(email) = lower($1)");
        let row = sqlx::query(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(user_from_row).transpose()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(user_from_row).transpose()
    }

    async fn list(&self) -> Result<Vec<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC");
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;

        rows.iter().map(user_from_row).collect()
    }

    async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn set_banned(&self, id: Uuid, banned: bool) -> Result<Option<BanUpdate>> {
        info!("Setting banned={} for user: {}", banned, id);

        let sql = format!(
            r#"
            WITH prev AS (
                SELECT id AS target_id, is_banned AS was_banned
                FROM users
                WHERE id = $1
                FOR UPDATE
            )
            UPDATE users
            SET is_banned = $2, updated_at = NOW()
            FROM prev
            WHERE users.id = prev.target_id
            RETURNING {USER_COLUMNS}, prev.was_banned
            "#
        );

        let row = sqlx::query(&sql)
            .bind(id)
            .bind(banned)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|row| -> Result<BanUpdate> {
            Ok(BanUpdate {
                user: user_from_row(&row)?,
                was_banned: row.try_get("was_banned")?,
            })
        })
        .transpose()
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(common::database::health_check(&self.pool).await?)
    }
}
