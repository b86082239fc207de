pub mod asset;
pub mod bin;
pub mod waste;

pub use asset::{Asset, AssetResponse, RegisteredAsset};
pub use bin::{normalize_bin_name, Bin, CreateBinRequest, BIN_NAME_MAX_LEN};
pub use waste::{NewWasteEntry, WasteCategory, WasteEntry, WASTE_CATEGORIES};
