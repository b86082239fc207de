//! Waste records: image upload, listing, classification and delete.

use smartbin_core::models::{NewWasteEntry, WasteCategory, WasteEntry};
use smartbin_core::{AppError, RemoteDeletePolicy};
use smartbin_db::WasteStore;
use smartbin_storage::{MediaFolder, Storage};
use uuid::Uuid;

use super::remote_delete::delete_remote;
use crate::error::storage_error_to_app_error;
use crate::state::{AppState, MediaLimits};
use crate::utils::upload::{validate_waste_image, UploadedFile};

/// Fields of a waste upload besides the image.
#[derive(Debug, Clone)]
pub struct WasteUpload {
    pub waste_type: String,
    pub bin_location: String,
    pub image: UploadedFile,
}

pub struct WasteService<'a> {
    waste: &'a dyn WasteStore,
    storage: &'a dyn Storage,
    limits: &'a MediaLimits,
    delete_policy: RemoteDeletePolicy,
}

impl<'a> WasteService<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self {
            waste: state.stores.waste.as_ref(),
            storage: state.media.storage.as_ref(),
            limits: &state.media.waste_image,
            delete_policy: state.media.waste_delete_policy,
        }
    }

    #[tracing::instrument(skip(self, upload), fields(waste_type = %upload.waste_type))]
    pub async fn record_waste(&self, upload: WasteUpload) -> Result<WasteEntry, AppError> {
        let filename = validate_waste_image(&upload.image, self.limits)?;

        let stored = self
            .storage
            .upload(
                MediaFolder::Waste,
                &filename,
                &upload.image.content_type,
                upload.image.data,
            )
            .await
            .map_err(storage_error_to_app_error)?;

        let entry = self
            .waste
            .create_waste(NewWasteEntry {
                waste_type: upload.waste_type,
                bin_location: upload.bin_location,
                image_url: stored.url,
                storage_id: stored.storage_id,
            })
            .await?;

        tracing::info!(waste_id = %entry.id, "Waste entry recorded");
        Ok(entry)
    }

    /// All entries, newest disposal first.
    pub async fn list_waste(&self) -> Result<Vec<WasteEntry>, AppError> {
        self.waste.list_waste().await
    }

    /// Set or overwrite the category. `None` and unknown strings are rejected
    /// before the store is touched.
    pub async fn categorize(
        &self,
        id: Uuid,
        category: Option<&str>,
    ) -> Result<WasteEntry, AppError> {
        let category: WasteCategory = category
            .ok_or_else(|| AppError::InvalidInput("Invalid category".to_string()))?
            .parse()?;

        let entry = self
            .waste
            .set_category(id, category)
            .await?
            .ok_or_else(|| AppError::NotFound("Waste entry not found".to_string()))?;

        tracing::info!(waste_id = %id, category = %category, "Waste entry categorized");
        Ok(entry)
    }

    /// Remove the image (per policy) and then the record. When the caller
    /// supplies a storage id it must match the stored one.
    #[tracing::instrument(skip(self))]
    pub async fn delete_waste(
        &self,
        id: Uuid,
        expected_storage_id: Option<&str>,
    ) -> Result<(), AppError> {
        let entry = self
            .waste
            .get_waste(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Waste entry not found".to_string()))?;

        if let Some(expected) = expected_storage_id {
            if expected != entry.storage_id {
                return Err(AppError::BadRequest(
                    "storageId does not match the waste entry".to_string(),
                ));
            }
        }

        if self.waste.count_by_storage_id(&entry.storage_id).await? > 1 {
            tracing::debug!(storage_id = %entry.storage_id, "Image still referenced; keeping it");
        } else {
            delete_remote(self.storage, &entry.storage_id, self.delete_policy, "waste").await?;
        }

        if !self.waste.delete_waste(id).await? {
            return Err(AppError::NotFound("Waste entry not found".to_string()));
        }

        tracing::info!(storage_id = %entry.storage_id, "Waste entry deleted");
        Ok(())
    }
}
