//! Raw file endpoints and remote URL transfer.

use assetgate_core::models::{ResponseKey, StoredFile, UploadResponse};
use std::sync::Arc;

use super::orchestrator::UploadOrchestrator;
use super::types::UploadOptions;
use crate::error::ProcessingError;
use crate::naming::{build_storage_key, split_name};
use crate::source::{SourceImage, SourceReader, FALLBACK_CONTENT_TYPE};

pub struct FileTransfer {
    orchestrator: Arc<UploadOrchestrator>,
    reader: SourceReader,
}

impl FileTransfer {
    pub fn new(orchestrator: Arc<UploadOrchestrator>, reader: SourceReader) -> Self {
        Self {
            orchestrator,
            reader,
        }
    }

    /// Store one file verbatim under `<timestamp>-<name>` with no prefix.
    #[tracing::instrument(skip(self, source), fields(filename = %source.filename))]
    pub async fn upload(&self, source: SourceImage) -> Result<StoredFile, ProcessingError> {
        let names = split_name(&source.filename);
        let ts = self.orchestrator.clock().now_millis();
        let key = build_storage_key("", Some(ts), &names.base_name, None, &names.extension);

        let content_type = if source.content_type.is_empty() {
            FALLBACK_CONTENT_TYPE
        } else {
            source.content_type.as_str()
        };

        let stored = self
            .orchestrator
            .storage()
            .put(&key, source.data.clone(), content_type)
            .await?;

        Ok(StoredFile {
            filename: stored.key,
            url: stored.url,
        })
    }

    /// Store several files verbatim under `prefix`, used as given.
    pub async fn upload_multiple(
        &self,
        sources: Vec<SourceImage>,
        prefix: Option<&str>,
    ) -> Result<Vec<ResponseKey>, ProcessingError> {
        let response = self
            .orchestrator
            .upload(sources, None, prefix, UploadOptions::default())
            .await?;
        Ok(response.into_flat())
    }

    /// Fetch each URL and store it verbatim, in order.
    pub async fn transfer_urls(&self, urls: &[String]) -> Result<Vec<StoredFile>, ProcessingError> {
        let mut stored = Vec::with_capacity(urls.len());
        for url in urls {
            let source =
                SourceImage::from_url(&self.reader, url, self.orchestrator.clock()).await?;
            stored.push(self.upload(source).await?);
        }
        Ok(stored)
    }

    /// Fetch every URL, then upload them together as if they were sent as files.
    pub async fn transfer_image_urls(
        &self,
        urls: &[String],
        category: Option<&str>,
        prefix: Option<&str>,
    ) -> Result<UploadResponse, ProcessingError> {
        let mut sources = Vec::with_capacity(urls.len());
        for url in urls {
            sources.push(SourceImage::from_url(&self.reader, url, self.orchestrator.clock()).await?);
        }
        self.orchestrator
            .upload(sources, category, prefix, UploadOptions::validated())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::scratch::ScratchDir;
    use assetgate_core::{CategoryTable, PrefixPolicy};
    use assetgate_storage::MemoryStorage;
    use axum::http::header;
    use axum::routing::get;
    use axum::Router;
    use bytes::Bytes;
    use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;
    use std::time::Duration;

    const TS: i64 = 1_700_000_000_000;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let mut buffer = Vec::new();
        DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([1, 2, 3])))
            .write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
            .unwrap();
        buffer
    }

    fn transfer(storage: &MemoryStorage, scratch: &tempfile::TempDir) -> FileTransfer {
        let orchestrator = UploadOrchestrator::new(
            Arc::new(CategoryTable::builtin().unwrap()),
            PrefixPolicy::default(),
            Arc::new(storage.clone()),
            ScratchDir::new(scratch.path()),
            Arc::new(FixedClock(TS)),
        );
        FileTransfer::new(
            Arc::new(orchestrator),
            SourceReader::new(Duration::from_secs(5)).unwrap(),
        )
    }

    async fn serve_png() -> String {
        let body = png_bytes(300, 300);
        let router = Router::new().route(
            "/pics/cat.png",
            get(move || {
                let body = body.clone();
                async move { ([(header::CONTENT_TYPE, "image/png")], body) }
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_upload_stores_without_prefix() {
        let dir = tempfile::tempdir().unwrap();
        let storage = MemoryStorage::new();
        let service = transfer(&storage, &dir);

        let stored = service
            .upload(SourceImage::from_upload("notes.txt", "text/plain", &b"hi"[..]))
            .await
            .unwrap();

        assert_eq!(stored.filename, format!("{}-notes.txt", TS));
        assert_eq!(stored.url, format!("memory://assets/{}-notes.txt", TS));
        assert_eq!(storage.puts()[0].content_type, "text/plain");
    }

    #[tokio::test]
    async fn test_upload_multiple_uses_prefix_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let storage = MemoryStorage::new();
        let service = transfer(&storage, &dir);

        let keys = service
            .upload_multiple(
                vec![
                    SourceImage::from_upload("a.txt", "text/plain", &b"a"[..]),
                    SourceImage::from_upload("b.txt", "text/plain", &b"b"[..]),
                ],
                Some("anything"),
            )
            .await
            .unwrap();

        assert_eq!(keys.len(), 2);
        assert_eq!(keys[0].k, format!("anything/{}-a", TS));
        assert_eq!(keys[1].e, ".txt");
        assert!(keys.iter().all(|k| k.c.is_none()));
    }

    #[tokio::test]
    async fn test_transfer_urls_stores_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let storage = MemoryStorage::new();
        let service = transfer(&storage, &dir);
        let base = serve_png().await;

        let stored = service
            .transfer_urls(&[format!("{}/pics/cat.png", base)])
            .await
            .unwrap();

        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].filename, format!("{}-cat.png", TS));
        assert_eq!(
            storage.get(&stored[0].filename).unwrap(),
            Bytes::from(png_bytes(300, 300))
        );
    }

    #[tokio::test]
    async fn test_transfer_image_urls_runs_category() {
        let dir = tempfile::tempdir().unwrap();
        let storage = MemoryStorage::new();
        let service = transfer(&storage, &dir);
        let base = serve_png().await;

        let response = service
            .transfer_image_urls(&[format!("{}/pics/cat.png", base)], Some("avatar"), Some("avatars"))
            .await
            .unwrap();

        let keys = response.keys().unwrap();
        assert_eq!(keys.len(), 3);
        assert_eq!(keys[0].k, format!("avatars/{}-cat_xs", TS));
        assert_eq!(storage.puts()[2].key, format!("avatars/{}-cat_lg.png", TS));
        assert_eq!(storage.puts()[2].content_type, "image/png");
    }

    #[tokio::test]
    async fn test_transfer_stops_at_first_bad_url() {
        let dir = tempfile::tempdir().unwrap();
        let storage = MemoryStorage::new();
        let service = transfer(&storage, &dir);

        let result = service
            .transfer_urls(&["ftp://example.test/a.png".to_string()])
            .await;
        assert!(matches!(result, Err(ProcessingError::Fetch { .. })));
        assert!(storage.puts().is_empty());
    }
}
