//! Assetgate API Library
//!
//! HTTP handlers, request extraction and application setup for the upload gateway.

mod api_doc;
mod handlers;
mod telemetry;
mod utils;

pub mod error;
pub mod setup;
pub mod state;

pub use error::{ErrorResponse, HttpAppError};
