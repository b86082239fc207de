//! Domain services. Handlers stay thin and call into these.

pub mod assets;
pub mod bins;
pub mod remote_delete;
pub mod waste;

pub use assets::AssetService;
pub use bins::BinService;
pub use waste::WasteService;
