pub mod category;
pub mod upload;

pub use category::{CategoryConfig, CategoryTable, Device, SizeSlot, SizeSpec, ThumbnailSet};
pub use upload::{GroupedResponse, ResponseKey, StoredFile, UploadResponse};
