use crate::keys::{join_url, validate_object_key};
use crate::traits::{Storage, StorageError, StorageResult, StoredObject};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use http::header::{HeaderMap, HeaderName, HeaderValue};
use object_store::aws::{AmazonS3, AmazonS3Builder};
use object_store::path::Path;
use object_store::{
    Attribute, AttributeValue, Attributes, ClientOptions, ObjectStore, ObjectStoreExt, PutOptions,
    PutPayload, Result as ObjectResult,
};

const ACL_HEADER: &str = "x-amz-acl";
const PUBLIC_READ_ACL: &str = "public-read";

/// S3 storage implementation
#[derive(Clone)]
pub struct S3Storage {
    store: AmazonS3,
    bucket: String,
    region: String,
    endpoint_url: Option<String>, // Custom endpoint for S3-compatible providers
    cdn_base_url: Option<String>,
    public_read: bool,
}

impl S3Storage {
    /// Create a new S3Storage instance
    ///
    /// # Arguments
    /// * `bucket` - S3 bucket name
    /// * `region` - AWS region (or region identifier for S3-compatible providers)
    /// * `endpoint_url` - Optional custom endpoint URL for S3-compatible providers
    ///   (e.g., "http://localhost:9000" for MinIO)
    /// * `cdn_base_url` - Optional public base placed in front of `{bucket}/{key}`
    /// * `public_read` - Write every object with the `public-read` canned ACL
    pub async fn new(
        bucket: String,
        region: String,
        endpoint_url: Option<String>,
        cdn_base_url: Option<String>,
        public_read: bool,
    ) -> StorageResult<Self> {
        // Credentials come from the standard AWS environment variables.
        let mut builder = AmazonS3Builder::from_env()
            .with_region(region.clone())
            .with_bucket_name(bucket.clone())
            .with_client_options(
                ClientOptions::new().with_default_headers(Self::default_headers(public_read)),
            );

        if let Some(ref endpoint) = endpoint_url {
            let allow_http = endpoint.starts_with("http://");
            builder = builder
                .with_endpoint(endpoint.clone())
                .with_allow_http(allow_http);
        }

        let store = builder
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;

        Ok(S3Storage {
            store,
            bucket,
            region,
            endpoint_url,
            cdn_base_url,
            public_read,
        })
    }

    pub fn is_public_read(&self) -> bool {
        self.public_read
    }

    /// Headers attached to every request the client sends.
    fn default_headers(public_read: bool) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if public_read {
            headers.insert(
                HeaderName::from_static(ACL_HEADER),
                HeaderValue::from_static(PUBLIC_READ_ACL),
            );
        }
        headers
    }

    /// Map a put failure, recognising the provider's size rejection.
    fn map_put_error(err: object_store::Error) -> StorageError {
        let message = err.to_string();
        if message.contains("EntityTooLarge") {
            StorageError::TooLarge(message)
        } else {
            StorageError::UploadFailed(message)
        }
    }
}

#[async_trait]
impl Storage for S3Storage {
    async fn put(
        &self,
        storage_key: &str,
        data: Bytes,
        content_type: &str,
    ) -> StorageResult<StoredObject> {
        validate_object_key(storage_key)?;

        let size = data.len() as u64;
        let location = Path::from(storage_key.to_string());
        let mut attributes = Attributes::new();
        attributes.insert(
            Attribute::ContentType,
            AttributeValue::from(content_type.to_string()),
        );
        let opts = PutOptions {
            attributes,
            ..Default::default()
        };

        let start = std::time::Instant::now();

        let result: ObjectResult<_> =
            ObjectStore::put_opts(&self.store, &location, PutPayload::from(data), opts).await;

        result.map_err(|e| {
            tracing::error!(
                error = %e,
                bucket = %self.bucket,
                key = %storage_key,
                size_bytes = size,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "S3 put failed"
            );
            Self::map_put_error(e)
        })?;

        tracing::info!(
            bucket = %self.bucket,
            key = %storage_key,
            content_type = %content_type,
            public_read = self.public_read,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 put successful"
        );

        Ok(StoredObject {
            key: storage_key.to_string(),
            url: self.public_url(storage_key),
        })
    }

    async fn delete(&self, storage_key: &str) -> StorageResult<()> {
        validate_object_key(storage_key)?;

        let start = std::time::Instant::now();
        let location = Path::from(storage_key.to_string());

        let result: ObjectResult<_> = self.store.delete(&location).await;

        result.map_err(|e| {
            tracing::error!(
                error = %e,
                bucket = %self.bucket,
                key = %storage_key,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "S3 delete failed"
            );
            StorageError::DeleteFailed(e.to_string())
        })?;

        tracing::info!(
            bucket = %self.bucket,
            key = %storage_key,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 delete successful"
        );

        Ok(())
    }

    /// CDN base when configured, then the custom endpoint (path-style),
    /// then the virtual-hosted AWS URL.
    fn public_url(&self, storage_key: &str) -> String {
        if let Some(ref cdn) = self.cdn_base_url {
            join_url(&join_url(cdn, &self.bucket), storage_key)
        } else if let Some(ref endpoint) = self.endpoint_url {
            join_url(&join_url(endpoint, &self.bucket), storage_key)
        } else {
            format!(
                "https://{}.s3.{}.amazonaws.com/{}",
                self.bucket, self.region, storage_key
            )
        }
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn storage(endpoint: Option<&str>, cdn: Option<&str>) -> S3Storage {
        S3Storage::new(
            "assets".to_string(),
            "ap-southeast-1".to_string(),
            endpoint.map(String::from),
            cdn.map(String::from),
            true,
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_public_url_variants() {
        let aws = storage(None, None).await;
        assert_eq!(
            aws.public_url("images/1-a.jpg"),
            "https://assets.s3.ap-southeast-1.amazonaws.com/images/1-a.jpg"
        );

        let minio = storage(Some("http://localhost:9000/"), None).await;
        assert_eq!(
            minio.public_url("images/1-a.jpg"),
            "http://localhost:9000/assets/images/1-a.jpg"
        );

        let cdn = storage(Some("http://localhost:9000"), Some("https://cdn.test")).await;
        assert_eq!(
            cdn.public_url("1-a.jpg"),
            "https://cdn.test/assets/1-a.jpg"
        );
        assert_eq!(cdn.backend_type(), StorageBackend::S3);
    }

    #[test]
    fn test_public_read_sends_canned_acl() {
        let headers = S3Storage::default_headers(true);
        assert_eq!(
            headers.get("x-amz-acl").map(|v| v.to_str().unwrap()),
            Some("public-read")
        );
        assert!(S3Storage::default_headers(false).is_empty());
    }

    #[tokio::test]
    async fn test_public_read_is_kept_on_storage() {
        assert!(storage(None, None).await.is_public_read());

        let private = S3Storage::new(
            "assets".to_string(),
            "ap-southeast-1".to_string(),
            None,
            None,
            false,
        )
        .await
        .unwrap();
        assert!(!private.is_public_read());
    }

    #[test]
    fn test_entity_too_large_maps_to_too_large() {
        let err = object_store::Error::Generic {
            store: "S3",
            source: "EntityTooLarge: Your proposed upload exceeds the maximum allowed size".into(),
        };
        assert!(matches!(
            S3Storage::map_put_error(err),
            StorageError::TooLarge(_)
        ));
    }
}
