use async_trait::async_trait;
use smartbin_core::{
    models::{Asset, RegisteredAsset},
    AppError,
};
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

use super::traits::AssetStore;

const ASSET_COLUMNS: &str = "id, bin_id, url, storage_id, created_at";

/// Repository for video asset references
#[derive(Clone)]
pub struct AssetRepository {
    pool: PgPool,
}

impl AssetRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find_by_storage_id(
        &self,
        bin_id: Uuid,
        storage_id: &str,
    ) -> Result<Option<Asset>, AppError> {
        let asset = sqlx::query_as::<Postgres, Asset>(&format!(
            "SELECT {} FROM assets WHERE bin_id = $1 AND storage_id = $2",
            ASSET_COLUMNS
        ))
        .bind(bin_id)
        .bind(storage_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(asset)
    }
}

#[async_trait]
impl AssetStore for AssetRepository {
    #[tracing::instrument(skip(self, url), fields(db.table = "assets", db.operation = "insert"))]
    async fn register_asset(
        &self,
        bin_id: Uuid,
        url: &str,
        storage_id: &str,
    ) -> Result<RegisteredAsset, AppError> {
        if let Some(existing) = self.find_by_storage_id(bin_id, storage_id).await? {
            return Ok(RegisteredAsset {
                asset: existing,
                duplicate: true,
            });
        }

        let inserted = sqlx::query_as::<Postgres, Asset>(&format!(
            r#"
            INSERT INTO assets (bin_id, url, storage_id)
            VALUES ($1, $2, $3)
            ON CONFLICT (bin_id, storage_id) DO NOTHING
            RETURNING {}
            "#,
            ASSET_COLUMNS
        ))
        .bind(bin_id)
        .bind(url)
        .bind(storage_id)
        .fetch_optional(&self.pool)
        .await?;

        match inserted {
            Some(asset) => Ok(RegisteredAsset {
                asset,
                duplicate: false,
            }),
            None => {
                // Lost the race against a concurrent identical upload
                tracing::debug!(%bin_id, storage_id, "Concurrent asset insert collapsed");
                let existing = self
                    .find_by_storage_id(bin_id, storage_id)
                    .await?
                    .ok_or_else(|| {
                        AppError::Internal(format!(
                            "Asset {} for bin {} vanished after conflict",
                            storage_id, bin_id
                        ))
                    })?;
                Ok(RegisteredAsset {
                    asset: existing,
                    duplicate: true,
                })
            }
        }
    }

    #[tracing::instrument(skip(self), fields(db.table = "assets", db.operation = "select", db.record_id = %id))]
    async fn get_asset(&self, id: Uuid) -> Result<Option<Asset>, AppError> {
        let asset = sqlx::query_as::<Postgres, Asset>(&format!(
            "SELECT {} FROM assets WHERE id = $1",
            ASSET_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(asset)
    }

    #[tracing::instrument(skip(self), fields(db.table = "assets", db.operation = "select"))]
    async fn list_assets_by_bin(&self, bin_id: Uuid) -> Result<Vec<Asset>, AppError> {
        let assets = sqlx::query_as::<Postgres, Asset>(&format!(
            "SELECT {} FROM assets WHERE bin_id = $1 ORDER BY created_at ASC, id ASC",
            ASSET_COLUMNS
        ))
        .bind(bin_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(assets)
    }

    #[tracing::instrument(skip(self), fields(db.table = "assets", db.operation = "delete", db.record_id = %id))]
    async fn delete_asset(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM assets WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    #[tracing::instrument(skip(self), fields(db.table = "assets", db.operation = "select"))]
    async fn count_by_storage_id(&self, storage_id: &str) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM assets WHERE storage_id = $1")
            .bind(storage_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
