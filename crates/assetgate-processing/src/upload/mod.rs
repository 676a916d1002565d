//! Upload orchestration: category dispatch and raw file transfer.

pub mod files;
pub mod orchestrator;
pub mod types;

pub use files::FileTransfer;
pub use orchestrator::UploadOrchestrator;
pub use types::UploadOptions;
