//! Key checks shared by every backend.

use crate::traits::{StorageError, StorageResult};

/// Object stores address keys as opaque strings; only an empty key is refused.
pub fn validate_object_key(storage_key: &str) -> StorageResult<()> {
    if storage_key.is_empty() {
        return Err(StorageError::InvalidKey("Storage key is empty".to_string()));
    }
    Ok(())
}

/// Filesystem keys must stay relative and never step out of their root.
pub fn validate_path_key(storage_key: &str) -> StorageResult<()> {
    validate_object_key(storage_key)?;
    if storage_key.starts_with('/') || storage_key.split('/').any(|segment| segment == "..") {
        return Err(StorageError::InvalidKey(
            "Storage key escapes the storage root".to_string(),
        ));
    }
    Ok(())
}

/// Join a base URL and a key with exactly one slash.
pub fn join_url(base: &str, key: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), key)
}
