//! Smartbin Storage Library
//!
//! This crate provides the media host abstraction for smartbin: the `Storage`
//! trait and its S3 and local filesystem implementations.
//!
//! # Storage key format
//!
//! Keys are content-addressed: `{folder}/{sha256 prefix}.{ext}`, where `folder` is
//! `videos` or `waste`. Uploading the same bytes twice yields the same key, which
//! is what lets the asset layer detect duplicate uploads. Key generation lives in
//! the `keys` module so all backends stay consistent.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
pub use keys::MediaFolder;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use smartbin_core::StorageBackend;
pub use traits::{Storage, StorageError, StorageResult, StoredObject};
