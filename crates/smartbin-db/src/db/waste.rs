use async_trait::async_trait;
use smartbin_core::{
    models::{NewWasteEntry, WasteCategory, WasteEntry},
    AppError,
};
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

use super::traits::WasteStore;

const WASTE_COLUMNS: &str =
    "id, waste_type, edited_type, bin_location, image_url, storage_id, category, disposed_at";

/// Repository for waste classification entries
#[derive(Clone)]
pub struct WasteRepository {
    pool: PgPool,
}

impl WasteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl WasteStore for WasteRepository {
    #[tracing::instrument(skip(self, entry), fields(db.table = "waste_entries", db.operation = "insert"))]
    async fn create_waste(&self, entry: NewWasteEntry) -> Result<WasteEntry, AppError> {
        let edited_type = entry.edited_type();
        let waste = sqlx::query_as::<Postgres, WasteEntry>(&format!(
            r#"
            INSERT INTO waste_entries (waste_type, edited_type, bin_location, image_url, storage_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            WASTE_COLUMNS
        ))
        .bind(&entry.waste_type)
        .bind(&edited_type)
        .bind(&entry.bin_location)
        .bind(&entry.image_url)
        .bind(&entry.storage_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(waste)
    }

    #[tracing::instrument(skip(self), fields(db.table = "waste_entries", db.operation = "select", db.record_id = %id))]
    async fn get_waste(&self, id: Uuid) -> Result<Option<WasteEntry>, AppError> {
        let waste = sqlx::query_as::<Postgres, WasteEntry>(&format!(
            "SELECT {} FROM waste_entries WHERE id = $1",
            WASTE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(waste)
    }

    #[tracing::instrument(skip(self), fields(db.table = "waste_entries", db.operation = "select"))]
    async fn list_waste(&self) -> Result<Vec<WasteEntry>, AppError> {
        let entries = sqlx::query_as::<Postgres, WasteEntry>(&format!(
            "SELECT {} FROM waste_entries ORDER BY disposed_at DESC, id ASC",
            WASTE_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    #[tracing::instrument(skip(self), fields(db.table = "waste_entries", db.operation = "update", db.record_id = %id))]
    async fn set_category(
        &self,
        id: Uuid,
        category: WasteCategory,
    ) -> Result<Option<WasteEntry>, AppError> {
        let waste = sqlx::query_as::<Postgres, WasteEntry>(&format!(
            "UPDATE waste_entries SET category = $2 WHERE id = $1 RETURNING {}",
            WASTE_COLUMNS
        ))
        .bind(id)
        .bind(category)
        .fetch_optional(&self.pool)
        .await?;

        Ok(waste)
    }

    #[tracing::instrument(skip(self), fields(db.table = "waste_entries", db.operation = "delete", db.record_id = %id))]
    async fn delete_waste(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM waste_entries WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    #[tracing::instrument(skip(self), fields(db.table = "waste_entries", db.operation = "select"))]
    async fn count_by_storage_id(&self, storage_id: &str) -> Result<i64, AppError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM waste_entries WHERE storage_id = $1")
                .bind(storage_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }
}
