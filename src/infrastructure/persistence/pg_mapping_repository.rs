//! PostgreSQL implementation of the mapping repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{Claim, Mapping, NewMapping};
use crate::domain::repositories::MappingRepository;
use crate::error::AppError;

#[derive(sqlx::FromRow)]
struct MappingRow {
    id: i64,
    long_url: String,
    short_key: String,
    created_at: DateTime<Utc>,
}

impl From<MappingRow> for Mapping {
    fn from(row: MappingRow) -> Self {
        Mapping::new(row.id, row.long_url, row.short_key, row.created_at)
    }
}

const SELECT_BY_LONG: &str = r#"
    SELECT id, long_url, short_key, created_at
    FROM mappings
    WHERE long_url = $1
    ORDER BY id
    LIMIT 1
"#;

const INSERT: &str = r#"
    INSERT INTO mappings (long_url, short_key)
    VALUES ($1, $2)
    RETURNING id, long_url, short_key, created_at
"#;

/// PostgreSQL repository for mapping storage and retrieval.
///
/// `short_key` carries a `UNIQUE` constraint, so a colliding insert fails with
/// [`AppError::Conflict`]. [`MappingRepository::claim`] serializes writers of
/// the same long URL with a transaction-scoped advisory lock.
pub struct PgMappingRepository {
    pool: Arc<PgPool>,
}

impl PgMappingRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MappingRepository for PgMappingRepository {
    async fn find_by_long(&self, long: &str) -> Result<Option<Mapping>, AppError> {
        let row = sqlx::query_as::<_, MappingRow>(SELECT_BY_LONG)
            .bind(long)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.map(Mapping::from))
    }

    async fn find_by_short(&self, short: &str) -> Result<Option<Mapping>, AppError> {
        let row = sqlx::query_as::<_, MappingRow>(
            r#"
            SELECT id, long_url, short_key, created_at
            FROM mappings
            WHERE short_key = $1
            "#,
        )
        .bind(short)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Mapping::from))
    }

    async fn insert(&self, new_mapping: NewMapping) -> Result<Mapping, AppError> {
        let row = sqlx::query_as::<_, MappingRow>(INSERT)
            .bind(&new_mapping.long)
            .bind(new_mapping.short.as_str())
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(row.into())
    }

    async fn claim(&self, new_mapping: NewMapping) -> Result<Claim, AppError> {
        let mut tx = self.pool.begin().await?;

        // Held until commit or rollback; other claims for the same long URL wait here.
        sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1, 0))")
            .bind(&new_mapping.long)
            .execute(&mut *tx)
            .await?;

        if let Some(existing) = sqlx::query_as::<_, MappingRow>(SELECT_BY_LONG)
            .bind(&new_mapping.long)
            .fetch_optional(&mut *tx)
            .await?
        {
            tx.commit().await?;
            return Ok(Claim::Existing(existing.into()));
        }

        // A unique violation here aborts the transaction; dropping `tx` rolls it back.
        let row = sqlx::query_as::<_, MappingRow>(INSERT)
            .bind(&new_mapping.long)
            .bind(new_mapping.short.as_str())
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(Claim::Created(row.into()))
    }

    async fn count(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM mappings")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Mapping>, AppError> {
        let rows = sqlx::query_as::<_, MappingRow>(
            r#"
            SELECT id, long_url, short_key, created_at
            FROM mappings
            ORDER BY id DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit.max(0))
        .bind(offset.max(0))
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Mapping::from).collect())
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await?;

        Ok(())
    }
}
