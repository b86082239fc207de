//! Smartbin document store
//!
//! Repository traits for bins, assets and waste entries, with a PostgreSQL
//! implementation (sqlx) and an in-memory implementation used by tests and
//! `STORE_BACKEND=memory`.

pub mod db;

pub use db::memory::{MemoryAssetStore, MemoryBinStore, MemoryWasteStore};
pub use db::traits::{AssetStore, BinStore, WasteStore};
pub use db::{AssetRepository, BinRepository, WasteRepository};
