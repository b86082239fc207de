//! Smartbin API Library
//!
//! HTTP handlers, services and application setup for the smartbin server.

mod api_doc;
mod handlers;
mod telemetry;

pub mod error;
pub mod services;
pub mod setup;
pub mod state;
pub mod utils;

pub use error::{ErrorResponse, HttpAppError};
pub use state::{AppState, MediaConfig, MediaLimits, StoreState};
