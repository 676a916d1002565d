//! Image codec work: decode, crop, resize and encode.

pub mod transformer;

pub use transformer::{EncodedImage, ImageTransformer};
