pub mod assets;
pub mod bins;
pub mod download_page;
pub mod media;
pub mod waste;
