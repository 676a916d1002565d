//! Assetgate Core Library
//!
//! This crate provides the configuration, error types and category model
//! shared by every assetgate component.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod storage_types;

// Re-export commonly used types
pub use config::{Config, PrefixPolicy};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{CategoryConfig, CategoryTable, Device, SizeSlot, SizeSpec, ThumbnailSet};
pub use storage_types::StorageBackend;
