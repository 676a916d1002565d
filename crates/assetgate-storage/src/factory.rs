#[cfg(feature = "storage-local")]
use crate::LocalStorage;
#[cfg(feature = "storage-s3")]
use crate::S3Storage;
use crate::{MemoryStorage, Storage, StorageBackend, StorageError, StorageResult};
use assetgate_core::Config;
use std::sync::Arc;

/// Create a storage backend based on configuration
pub async fn create_storage(config: &Config) -> StorageResult<Arc<dyn Storage>> {
    match config.storage_backend() {
        #[cfg(feature = "storage-s3")]
        StorageBackend::S3 => {
            let bucket = config
                .s3_bucket
                .clone()
                .ok_or_else(|| StorageError::ConfigError("S3_BUCKET not configured".to_string()))?;
            // S3-compatible providers often ignore the region; object_store still wants one.
            let region = config
                .s3_region
                .clone()
                .or_else(|| config.s3_endpoint.as_ref().map(|_| "us-east-1".to_string()))
                .ok_or_else(|| {
                    StorageError::ConfigError("S3_REGION not configured".to_string())
                })?;

            let storage = S3Storage::new(
                bucket,
                region,
                config.s3_endpoint.clone(),
                config.cdn_base_url.clone(),
                config.s3_public_read,
            )
            .await?;
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-s3"))]
        StorageBackend::S3 => Err(StorageError::ConfigError(
            "S3 storage backend not available (storage-s3 feature not enabled)".to_string(),
        )),

        #[cfg(feature = "storage-local")]
        StorageBackend::Local => {
            let base_path = config.local_storage_path.clone().ok_or_else(|| {
                StorageError::ConfigError("LOCAL_STORAGE_PATH not configured".to_string())
            })?;
            let base_url = config.local_storage_base_url.clone().ok_or_else(|| {
                StorageError::ConfigError("LOCAL_STORAGE_BASE_URL not configured".to_string())
            })?;

            let storage = LocalStorage::new(base_path, base_url).await?;
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-local"))]
        StorageBackend::Local => Err(StorageError::ConfigError(
            "Local storage backend not available (storage-local feature not enabled)".to_string(),
        )),

        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; uploads are lost on restart");
            Ok(Arc::new(MemoryStorage::new()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_creates_memory_backend() {
        let config = Config {
            storage_backend: StorageBackend::Memory,
            ..Config::default()
        };
        let storage = create_storage(&config).await.unwrap();
        assert_eq!(storage.backend_type(), StorageBackend::Memory);
    }

    #[cfg(feature = "storage-s3")]
    #[tokio::test]
    async fn test_s3_backend_follows_public_read_flag() {
        let config = Config {
            s3_bucket: Some("assets".to_string()),
            s3_endpoint: Some("http://localhost:9000".to_string()),
            s3_public_read: false,
            ..Config::default()
        };
        let storage = create_storage(&config).await.unwrap();
        assert_eq!(storage.backend_type(), StorageBackend::S3);
        assert_eq!(
            storage.public_url("a.png"),
            "http://localhost:9000/assets/a.png"
        );
    }

    #[cfg(feature = "storage-local")]
    #[tokio::test]
    async fn test_local_backend_requires_path() {
        let config = Config {
            storage_backend: StorageBackend::Local,
            ..Config::default()
        };
        assert!(matches!(
            create_storage(&config).await,
            Err(StorageError::ConfigError(_))
        ));
    }

    #[cfg(feature = "storage-local")]
    #[tokio::test]
    async fn test_creates_local_backend() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            storage_backend: StorageBackend::Local,
            local_storage_path: Some(dir.path().display().to_string()),
            local_storage_base_url: Some("http://localhost:5000/assets".to_string()),
            ..Config::default()
        };
        let storage = create_storage(&config).await.unwrap();
        assert_eq!(storage.backend_type(), StorageBackend::Local);
        assert_eq!(
            storage.public_url("a.png"),
            "http://localhost:5000/assets/a.png"
        );
    }
}
