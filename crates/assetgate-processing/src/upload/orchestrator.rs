//! Category dispatcher
//!
//! Decides, per request, which variants each source file produces and how
//! the response is shaped:
//!
//! - no category config: files are stored verbatim (passthrough)
//! - several files, `school-thumbnail`: file `i` pairs with list entry `i`
//!   of every device slot, response grouped by device
//! - several files, any other category: every variant of every file, one
//!   response entry per file carrying the category
//! - a single file: one response entry per stored variant, device variants
//!   keeping their suffix in `k`

use assetgate_core::constants::SCHOOL_THUMBNAIL_CATEGORY;
use assetgate_core::models::{GroupedResponse, ResponseKey, UploadResponse};
use assetgate_core::{CategoryConfig, CategoryTable, Device, PrefixPolicy, SizeSpec, ThumbnailSet};
use assetgate_storage::Storage;
use bytes::Bytes;
use std::sync::Arc;

use super::types::UploadOptions;
use crate::clock::Clock;
use crate::error::ProcessingError;
use crate::naming::{
    build_response_key, build_storage_key, build_variant_response_key, split_name, NameParts,
};
use crate::scratch::ScratchDir;
use crate::source::{SourceImage, FALLBACK_CONTENT_TYPE};
use crate::variant::VariantProcessor;

pub struct UploadOrchestrator {
    categories: Arc<CategoryTable>,
    prefixes: PrefixPolicy,
    storage: Arc<dyn Storage>,
    variants: VariantProcessor,
    clock: Arc<dyn Clock>,
}

impl UploadOrchestrator {
    pub fn new(
        categories: Arc<CategoryTable>,
        prefixes: PrefixPolicy,
        storage: Arc<dyn Storage>,
        scratch: ScratchDir,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let variants = VariantProcessor::new(storage.clone(), scratch);
        Self {
            categories,
            prefixes,
            storage,
            variants,
            clock,
        }
    }

    pub fn categories(&self) -> &CategoryTable {
        &self.categories
    }

    pub fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    fn timestamp(&self, options: UploadOptions) -> Option<i64> {
        options.add_timestamp.then(|| self.clock.now_millis())
    }

    #[tracing::instrument(skip(self, files), fields(file_count = files.len()))]
    pub async fn upload(
        &self,
        files: Vec<SourceImage>,
        category: Option<&str>,
        prefix: Option<&str>,
        options: UploadOptions,
    ) -> Result<UploadResponse, ProcessingError> {
        let folder = self.prefixes.resolve(prefix, options.validate_prefix);
        let config = self.categories.get(category);
        if config.map_or(true, CategoryConfig::is_passthrough) {
            let keys = self.passthrough(files, &folder, options).await?;
            return Ok(UploadResponse::Keys(keys));
        }

        let thumbnails = config.and_then(|c| c.thumbnails.as_ref());
        let original = config.and_then(|c| c.original);

        if files.len() > 1 {
            match (category, thumbnails) {
                (Some(name), Some(thumbnails)) if name == SCHOOL_THUMBNAIL_CATEGORY => {
                    let grouped = self
                        .school_thumbnails(files, name, thumbnails, &folder, options)
                        .await?;
                    Ok(UploadResponse::Grouped(grouped))
                }
                _ => {
                    let keys = self
                        .collapsed(files, category, thumbnails, original, &folder, options)
                        .await?;
                    Ok(UploadResponse::Keys(keys))
                }
            }
        } else {
            let keys = self
                .per_variant(files, thumbnails, original, &folder, options)
                .await?;
            Ok(UploadResponse::Keys(keys))
        }
    }

    /// Store every file as received.
    async fn passthrough(
        &self,
        files: Vec<SourceImage>,
        folder: &str,
        options: UploadOptions,
    ) -> Result<Vec<ResponseKey>, ProcessingError> {
        let mut keys = Vec::with_capacity(files.len());
        for source in files {
            let NameParts {
                base_name,
                extension,
            } = split_name(&source.filename);
            let ts = self.timestamp(options);
            let key = build_storage_key(folder, ts, &base_name, None, &extension);
            let content_type = if source.content_type.is_empty() {
                FALLBACK_CONTENT_TYPE
            } else {
                source.content_type.as_str()
            };

            let size = source.len();
            self.storage
                .put(&key, Bytes::clone(&source.data), content_type)
                .await?;
            tracing::info!(key = %key, size_bytes = size, "Stored file as received");

            keys.push(build_response_key(folder, ts, &base_name, &extension, None));
        }
        Ok(keys)
    }

    /// One entry per file; all of a file's variants share its timestamp.
    async fn collapsed(
        &self,
        files: Vec<SourceImage>,
        category: Option<&str>,
        thumbnails: Option<&ThumbnailSet>,
        original: Option<SizeSpec>,
        folder: &str,
        options: UploadOptions,
    ) -> Result<Vec<ResponseKey>, ProcessingError> {
        let mut keys = Vec::with_capacity(files.len());
        for source in files {
            let names = split_name(&source.filename);
            let ts = self.timestamp(options);
            self.process_file(&source, &names, folder, ts, thumbnails, original)
                .await?;
            keys.push(build_response_key(
                folder,
                ts,
                &names.base_name,
                &names.extension,
                category,
            ));
        }
        Ok(keys)
    }

    /// One entry per stored variant of the single source.
    async fn per_variant(
        &self,
        files: Vec<SourceImage>,
        thumbnails: Option<&ThumbnailSet>,
        original: Option<SizeSpec>,
        folder: &str,
        options: UploadOptions,
    ) -> Result<Vec<ResponseKey>, ProcessingError> {
        let mut keys = Vec::new();
        for source in files {
            let names = split_name(&source.filename);
            let ts = self.timestamp(options);
            let produced = self
                .process_file(&source, &names, folder, ts, thumbnails, original)
                .await?;
            keys.extend(produced.into_iter().map(|device| match device {
                None => build_response_key(folder, ts, &names.base_name, &names.extension, None),
                Some(device) => build_variant_response_key(
                    folder,
                    ts,
                    &names.base_name,
                    device.suffix(),
                    &names.extension,
                ),
            }));
        }
        Ok(keys)
    }

    /// Produce the constrained original and one variant per device slot.
    ///
    /// List slots contribute their first entry; empty lists are skipped.
    /// Returns the produced variants in order, `None` standing for the original.
    async fn process_file(
        &self,
        source: &SourceImage,
        names: &NameParts,
        folder: &str,
        ts: Option<i64>,
        thumbnails: Option<&ThumbnailSet>,
        original: Option<SizeSpec>,
    ) -> Result<Vec<Option<Device>>, ProcessingError> {
        let mut produced = Vec::new();

        if let Some(spec) = original {
            let key = build_storage_key(folder, ts, &names.base_name, None, &names.extension);
            self.variants.produce_variant(source, spec, &key).await?;
            produced.push(None);
        }

        for (device, slot) in thumbnails.into_iter().flat_map(|t| t.slots()) {
            let Some(spec) = slot.primary() else {
                tracing::debug!(device = %device, "Skipping empty size list");
                continue;
            };
            let key = build_storage_key(
                folder,
                ts,
                &names.base_name,
                Some(device.suffix()),
                &names.extension,
            );
            self.variants.produce_variant(source, spec, &key).await?;
            produced.push(Some(device));
        }

        Ok(produced)
    }

    /// Pair file `i` with list entry `i` of each device slot, up to the
    /// shorter of the two. Every pair gets a fresh timestamp.
    async fn school_thumbnails(
        &self,
        files: Vec<SourceImage>,
        category: &str,
        thumbnails: &ThumbnailSet,
        folder: &str,
        options: UploadOptions,
    ) -> Result<GroupedResponse, ProcessingError> {
        let names: Vec<NameParts> = files.iter().map(|f| split_name(&f.filename)).collect();
        let mut grouped = GroupedResponse::default();

        for (device, slot) in thumbnails.slots() {
            let Some(specs) = slot.as_list() else {
                tracing::debug!(device = %device, "Skipping non-list slot");
                continue;
            };
            if specs.len() != files.len() {
                tracing::debug!(
                    device = %device,
                    files = files.len(),
                    specs = specs.len(),
                    "File and size counts differ; extras ignored"
                );
            }

            for ((source, names), spec) in files.iter().zip(&names).zip(specs) {
                let ts = self.timestamp(options);
                let key = build_storage_key(
                    folder,
                    ts,
                    &names.base_name,
                    Some(device.suffix()),
                    &names.extension,
                );
                self.variants.produce_variant(source, *spec, &key).await?;
                grouped.device_mut(device).push(build_response_key(
                    folder,
                    ts,
                    &names.base_name,
                    &names.extension,
                    Some(category),
                ));
            }
        }

        Ok(grouped)
    }
}
