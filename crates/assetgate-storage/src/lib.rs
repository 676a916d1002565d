//! Assetgate Storage Library
//!
//! Blob store abstraction used to persist originals and derived variants.
//! Backends: S3 (and S3-compatible providers), local filesystem, and an
//! in-memory store for tests and development.
//!
//! # Storage key format
//!
//! Keys are produced by the naming service upstream
//! (`[prefix/][timestamp-]base[_suffix].ext`); backends store them verbatim.
//! Keys must not be empty, contain `..` or start with `/`.

pub mod factory;
pub(crate) mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
pub mod memory;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use assetgate_core::StorageBackend;
pub use factory::create_storage;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
pub use memory::{MemoryStorage, PutRecord};
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{Storage, StorageError, StorageResult, StoredObject};
