//! Media host deletes governed by a `RemoteDeletePolicy`.

use smartbin_core::{AppError, RemoteDeletePolicy};
use smartbin_storage::Storage;

use crate::error::storage_error_to_app_error;

/// Delete `storage_id` from the media host.
///
/// `BestEffort` logs a failure and returns `Ok(false)` so the caller still
/// removes its record. `Required` turns the failure into an error and the
/// caller must leave its record in place. `Ok(true)` means the blob is gone.
pub async fn delete_remote(
    storage: &dyn Storage,
    storage_id: &str,
    policy: RemoteDeletePolicy,
    entity: &'static str,
) -> Result<bool, AppError> {
    match storage.delete(storage_id).await {
        Ok(()) => Ok(true),
        Err(e) if policy.is_required() => {
            tracing::error!(
                error = %e,
                storage_id = %storage_id,
                entity = entity,
                "Media host delete failed; keeping record"
            );
            Err(storage_error_to_app_error(e))
        }
        Err(e) => {
            tracing::warn!(
                error = %e,
                storage_id = %storage_id,
                entity = entity,
                "Media host delete failed; removing record anyway"
            );
            Ok(false)
        }
    }
}
