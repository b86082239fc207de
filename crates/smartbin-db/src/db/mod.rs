//! Database repositories for the data access layer
//!
//! Each repository owns one collection. Handlers and services depend on the
//! traits in `traits` so the backing store can be swapped.

pub mod asset;
pub mod bin;
pub mod memory;
pub mod traits;
pub mod waste;

pub use asset::AssetRepository;
pub use bin::BinRepository;
pub use waste::WasteRepository;
