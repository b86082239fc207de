//! Smartbin Core Library
//!
//! This crate provides the domain models, error types, configuration and the
//! download-link composer shared across all smartbin components.

pub mod config;
pub mod download;
pub mod error;
pub mod models;
pub mod policy;
pub mod storage_types;

// Re-export commonly used types
pub use config::{BaseConfig, Config, SmartbinConfig};
pub use download::{
    build_staggered_download_sequence, completion_offset, to_download_url, ScheduledDownload,
};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use policy::RemoteDeletePolicy;
pub use storage_types::{StorageBackend, StoreBackend};
