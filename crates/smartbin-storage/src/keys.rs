//! Shared key generation for storage backends.
//!
//! Key format: `{folder}/{hash}.{ext}` where `hash` is the first 32 hex characters
//! of the SHA-256 digest of the blob.

use sha2::{Digest, Sha256};

const HASH_PREFIX_LEN: usize = 32;
const MAX_EXTENSION_LEN: usize = 8;

/// Top-level folder a blob is stored under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaFolder {
    Videos,
    Waste,
}

impl MediaFolder {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaFolder::Videos => "videos",
            MediaFolder::Waste => "waste",
        }
    }
}

fn extension_of(filename: &str) -> String {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .filter(|ext| {
            !ext.is_empty()
                && ext.len() <= MAX_EXTENSION_LEN
                && ext.chars().all(|c| c.is_ascii_alphanumeric())
        })
        .unwrap_or_else(|| "bin".to_string())
}

/// Generate the content-addressed storage key for a blob.
///
/// All backends must use this format so re-uploads map to the same id.
pub fn generate_storage_key(folder: MediaFolder, filename: &str, data: &[u8]) -> String {
    let digest = hex::encode(Sha256::digest(data));
    format!(
        "{}/{}.{}",
        folder.as_str(),
        &digest[..HASH_PREFIX_LEN],
        extension_of(filename)
    )
}
