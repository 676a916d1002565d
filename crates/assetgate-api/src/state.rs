//! Shared application state

use assetgate_core::{CategoryTable, Config};
use assetgate_processing::{
    Clock, FileTransfer, MediaValidator, ScratchDir, SourceReader, UploadOrchestrator,
};
use assetgate_storage::Storage;
use std::sync::Arc;
use std::time::Duration;

pub struct AppState {
    pub config: Config,
    pub storage: Arc<dyn Storage>,
    pub orchestrator: Arc<UploadOrchestrator>,
    pub files: FileTransfer,
    pub validator: MediaValidator,
}

impl AppState {
    /// Wire the upload pipeline around an already constructed blob store.
    pub fn new(
        config: Config,
        storage: Arc<dyn Storage>,
        categories: CategoryTable,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, anyhow::Error> {
        let scratch = ScratchDir::new(&config.scratch_dir);
        scratch.ensure().map_err(|e| {
            anyhow::anyhow!(
                "Failed to create scratch directory {}: {}",
                config.scratch_dir.display(),
                e
            )
        })?;

        let orchestrator = Arc::new(UploadOrchestrator::new(
            Arc::new(categories),
            config.prefix_policy().clone(),
            storage.clone(),
            scratch,
            clock,
        ));
        let reader = SourceReader::new(Duration::from_secs(config.fetch_timeout_secs))?;
        let files = FileTransfer::new(orchestrator.clone(), reader);
        let validator = MediaValidator::new(config.max_file_size_bytes(), config.max_files());

        Ok(Self {
            config,
            storage,
            orchestrator,
            files,
            validator,
        })
    }
}
