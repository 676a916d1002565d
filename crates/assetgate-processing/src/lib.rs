//! Assetgate Processing Library
//!
//! The upload pipeline: crop geometry, key naming, variant production and
//! the category-driven orchestrator, plus the raw file transfer service.

pub mod clock;
pub mod error;
pub mod geometry;
pub mod image;
pub mod naming;
pub mod scratch;
pub mod source;
pub mod upload;
pub mod validator;
pub mod variant;

pub use clock::{Clock, FixedClock, SteppingClock, SystemClock};
pub use error::{GeometryError, ProcessingError};
pub use geometry::{compute_crop_rect, CropRect};
pub use image::{EncodedImage, ImageTransformer};
pub use naming::NameParts;
pub use scratch::{ScratchDir, ScratchFile};
pub use source::{SourceImage, SourceReader};
pub use upload::{FileTransfer, UploadOptions, UploadOrchestrator};
pub use validator::{MediaValidator, ValidationError};
pub use variant::VariantProcessor;
