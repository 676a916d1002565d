//! Variant processor: one derived image, one blob store write.

use assetgate_core::SizeSpec;
use assetgate_storage::{Storage, StoredObject};
use std::sync::Arc;

use crate::error::ProcessingError;
use crate::image::ImageTransformer;
use crate::scratch::ScratchDir;
use crate::source::SourceImage;

#[derive(Clone)]
pub struct VariantProcessor {
    storage: Arc<dyn Storage>,
    scratch: ScratchDir,
}

impl VariantProcessor {
    pub fn new(storage: Arc<dyn Storage>, scratch: ScratchDir) -> Self {
        Self { storage, scratch }
    }

    pub fn scratch(&self) -> &ScratchDir {
        &self.scratch
    }

    /// Crop/resize `source` to `spec`, stage the encoded bytes and write them
    /// under `storage_key`. The staged file is removed on every exit path.
    pub async fn produce_variant(
        &self,
        source: &SourceImage,
        spec: SizeSpec,
        storage_key: &str,
    ) -> Result<StoredObject, ProcessingError> {
        let (target_width, target_height) = spec.target();

        let start = std::time::Instant::now();
        let data = source.data.clone();
        let scratch = self.scratch.clone();

        let (staged, content_type) = tokio::task::spawn_blocking(move || {
            let encoded = ImageTransformer::crop_and_resize(&data, target_width, target_height)?;
            let staged = scratch.stage(&encoded.data)?;
            Ok::<_, ProcessingError>((staged, encoded.content_type))
        })
        .await??;

        let result = match staged.read().await {
            Ok(bytes) => self
                .storage
                .put(storage_key, bytes, &content_type)
                .await
                .map_err(ProcessingError::from),
            Err(e) => Err(ProcessingError::Scratch(e)),
        };
        staged.release();

        match &result {
            Ok(_) => tracing::info!(
                key = %storage_key,
                filename = %source.filename,
                target_width,
                target_height,
                content_type = %content_type,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "Variant stored"
            ),
            Err(e) => tracing::error!(
                error = %e,
                key = %storage_key,
                filename = %source.filename,
                "Variant failed"
            ),
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assetgate_storage::MemoryStorage;
    use image::{DynamicImage, GenericImageView, ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;

    fn jpeg(width: u32, height: u32) -> SourceImage {
        let mut buffer = Vec::new();
        DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([200, 100, 50])))
            .write_to(&mut Cursor::new(&mut buffer), ImageFormat::Jpeg)
            .unwrap();
        SourceImage::from_upload("photo.jpg", "image/jpeg", buffer)
    }

    fn scratch_entries(scratch: &ScratchDir) -> usize {
        std::fs::read_dir(scratch.root())
            .map(|entries| entries.count())
            .unwrap_or(0)
    }

    #[tokio::test]
    async fn test_produces_exact_size_and_cleans_scratch() {
        let dir = tempfile::tempdir().unwrap();
        let storage = MemoryStorage::new();
        let processor = VariantProcessor::new(
            Arc::new(storage.clone()),
            ScratchDir::new(dir.path().join("tmp")),
        );

        let stored = processor
            .produce_variant(
                &jpeg(300, 200),
                SizeSpec::Exact {
                    width: 90,
                    height: 90,
                },
                "avatars/1-photo_xs.jpg",
            )
            .await
            .unwrap();

        assert_eq!(stored.key, "avatars/1-photo_xs.jpg");
        let puts = storage.puts();
        assert_eq!(puts.len(), 1);
        assert_eq!(puts[0].content_type, "image/jpeg");
        let written = image::load_from_memory(&storage.get("avatars/1-photo_xs.jpg").unwrap())
            .unwrap();
        assert_eq!(written.dimensions(), (90, 90));
        assert_eq!(scratch_entries(processor.scratch()), 0);
    }

    #[tokio::test]
    async fn test_bound_spec_resizes_to_bound() {
        let dir = tempfile::tempdir().unwrap();
        let storage = MemoryStorage::new();
        let processor = VariantProcessor::new(Arc::new(storage.clone()), ScratchDir::new(dir.path()));

        processor
            .produce_variant(
                &jpeg(1200, 800),
                SizeSpec::Bound {
                    max_width: 600,
                    max_height: 315,
                },
                "news/1-photo.jpg",
            )
            .await
            .unwrap();

        let written = image::load_from_memory(&storage.get("news/1-photo.jpg").unwrap()).unwrap();
        assert_eq!(written.dimensions(), (600, 315));
    }

    #[tokio::test]
    async fn test_storage_failure_still_cleans_scratch() {
        let dir = tempfile::tempdir().unwrap();
        let scratch = ScratchDir::new(dir.path().join("tmp"));
        let processor = VariantProcessor::new(Arc::new(MemoryStorage::failing()), scratch.clone());

        let result = processor
            .produce_variant(
                &jpeg(64, 64),
                SizeSpec::Exact {
                    width: 32,
                    height: 32,
                },
                "a.jpg",
            )
            .await;

        assert!(matches!(result, Err(ProcessingError::Storage(_))));
        assert_eq!(scratch_entries(&scratch), 0);
    }

    #[tokio::test]
    async fn test_decode_failure_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let storage = MemoryStorage::new();
        let scratch = ScratchDir::new(dir.path().join("tmp"));
        let processor = VariantProcessor::new(Arc::new(storage.clone()), scratch.clone());

        let source = SourceImage::from_upload("bad.jpg", "image/jpeg", &b"not an image"[..]);
        let result = processor
            .produce_variant(
                &source,
                SizeSpec::Exact {
                    width: 10,
                    height: 10,
                },
                "bad.jpg",
            )
            .await;

        assert!(matches!(result, Err(ProcessingError::Decode(_))));
        assert!(storage.puts().is_empty());
        assert_eq!(scratch_entries(&scratch), 0);
    }
}
