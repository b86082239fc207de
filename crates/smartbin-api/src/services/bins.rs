use smartbin_core::models::{normalize_bin_name, Bin};
use smartbin_core::AppError;
use smartbin_db::BinStore;
use uuid::Uuid;

use crate::state::AppState;

pub struct BinService<'a> {
    bins: &'a dyn BinStore,
}

impl<'a> BinService<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self {
            bins: state.stores.bins.as_ref(),
        }
    }

    pub async fn create_bin(&self, name: &str) -> Result<Bin, AppError> {
        let name = normalize_bin_name(name)?;
        let bin = self.bins.create_bin(&name).await?;
        tracing::info!(bin_id = %bin.id, name = %bin.name, "Bin created");
        Ok(bin)
    }

    pub async fn list_bins(&self) -> Result<Vec<Bin>, AppError> {
        self.bins.list_bins().await
    }

    /// Fetch a bin or fail with NotFound.
    pub async fn require_bin(&self, bin_id: Uuid) -> Result<Bin, AppError> {
        self.bins
            .get_bin(bin_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Bin not found".to_string()))
    }
}
