//! Asset Reference Layer: uploads videos to the media host and keeps one
//! record per (bin, storage id).

use smartbin_core::models::{Asset, RegisteredAsset};
use smartbin_core::{AppError, RemoteDeletePolicy};
use smartbin_db::AssetStore;
use smartbin_storage::{MediaFolder, Storage};
use uuid::Uuid;

use super::bins::BinService;
use super::remote_delete::delete_remote;
use crate::error::storage_error_to_app_error;
use crate::state::{AppState, MediaLimits};
use crate::utils::upload::{validate_video, UploadedFile};

pub struct AssetService<'a> {
    bins: BinService<'a>,
    assets: &'a dyn AssetStore,
    storage: &'a dyn Storage,
    limits: &'a MediaLimits,
    delete_policy: RemoteDeletePolicy,
}

impl<'a> AssetService<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self {
            bins: BinService::new(state),
            assets: state.stores.assets.as_ref(),
            storage: state.media.storage.as_ref(),
            limits: &state.media.video,
            delete_policy: state.media.asset_delete_policy,
        }
    }

    /// Validate, push to the media host, then register the reference.
    #[tracing::instrument(skip(self, file), fields(size = file.data.len()))]
    pub async fn upload_asset(
        &self,
        bin_id: Uuid,
        file: UploadedFile,
    ) -> Result<RegisteredAsset, AppError> {
        self.bins.require_bin(bin_id).await?;
        let filename = validate_video(&file, self.limits)?;

        let stored = self
            .storage
            .upload(MediaFolder::Videos, &filename, &file.content_type, file.data)
            .await
            .map_err(storage_error_to_app_error)?;

        self.register_asset(bin_id, &stored.url, &stored.storage_id)
            .await
    }

    /// Record an asset already on the media host. Re-registering the same
    /// storage id in the same bin returns the existing record as a duplicate.
    pub async fn register_asset(
        &self,
        bin_id: Uuid,
        url: &str,
        storage_id: &str,
    ) -> Result<RegisteredAsset, AppError> {
        let registered = self.assets.register_asset(bin_id, url, storage_id).await?;
        if registered.duplicate {
            tracing::info!(
                asset_id = %registered.asset.id,
                storage_id = %storage_id,
                "Asset already registered for bin"
            );
        } else {
            tracing::info!(
                asset_id = %registered.asset.id,
                storage_id = %storage_id,
                "Asset registered"
            );
        }
        Ok(registered)
    }

    /// Every asset of an existing bin, oldest first.
    pub async fn list_assets(&self, bin_id: Uuid) -> Result<Vec<Asset>, AppError> {
        self.bins.require_bin(bin_id).await?;
        self.assets.list_assets_by_bin(bin_id).await
    }

    /// Remove the blob (per policy) and then the record. A blob still used by
    /// another bin is left alone.
    #[tracing::instrument(skip(self))]
    pub async fn delete_asset(&self, asset_id: Uuid) -> Result<(), AppError> {
        let asset = self
            .assets
            .get_asset(asset_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Video not found".to_string()))?;

        // Identical uploads share one content-addressed blob
        if self.assets.count_by_storage_id(&asset.storage_id).await? > 1 {
            tracing::debug!(storage_id = %asset.storage_id, "Blob still referenced; keeping it");
        } else {
            delete_remote(self.storage, &asset.storage_id, self.delete_policy, "asset").await?;
        }

        if !self.assets.delete_asset(asset_id).await? {
            return Err(AppError::NotFound("Video not found".to_string()));
        }

        tracing::info!(storage_id = %asset.storage_id, "Asset deleted");
        Ok(())
    }
}
