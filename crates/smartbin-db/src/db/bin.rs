use async_trait::async_trait;
use smartbin_core::{models::Bin, AppError};
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

use super::traits::BinStore;

/// Repository for registered bins
#[derive(Clone)]
pub struct BinRepository {
    pool: PgPool,
}

impl BinRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BinStore for BinRepository {
    #[tracing::instrument(skip(self), fields(db.table = "bins", db.operation = "insert"))]
    async fn create_bin(&self, name: &str) -> Result<Bin, AppError> {
        let bin = sqlx::query_as::<Postgres, Bin>(
            r#"
            INSERT INTO bins (name)
            VALUES ($1)
            ON CONFLICT (name) DO NOTHING
            RETURNING id, name, created_at
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        bin.ok_or_else(|| AppError::InvalidInput(format!("Bin name '{}' is already taken", name)))
    }

    #[tracing::instrument(skip(self), fields(db.table = "bins", db.operation = "select", db.record_id = %id))]
    async fn get_bin(&self, id: Uuid) -> Result<Option<Bin>, AppError> {
        let bin = sqlx::query_as::<Postgres, Bin>(
            "SELECT id, name, created_at FROM bins WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(bin)
    }

    #[tracing::instrument(skip(self), fields(db.table = "bins", db.operation = "select"))]
    async fn list_bins(&self) -> Result<Vec<Bin>, AppError> {
        let bins = sqlx::query_as::<Postgres, Bin>(
            "SELECT id, name, created_at FROM bins ORDER BY created_at ASC, name ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(bins)
    }
}
