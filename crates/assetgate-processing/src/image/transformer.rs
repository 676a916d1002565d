//! Image transformer - crop to ratio, resize, re-encode.

use crate::error::ProcessingError;
use crate::geometry::compute_crop_rect;
use bytes::Bytes;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageFormat};
use std::io::Cursor;

/// Encoded output of a transform.
#[derive(Debug, Clone)]
pub struct EncodedImage {
    pub data: Bytes,
    pub content_type: String,
    pub width: u32,
    pub height: u32,
}

pub struct ImageTransformer;

impl ImageTransformer {
    /// Detect the container format from the bytes themselves.
    pub fn detect_format(data: &[u8]) -> Result<ImageFormat, ProcessingError> {
        image::guess_format(data).map_err(|e| ProcessingError::Decode(e.to_string()))
    }

    /// Center-crop `data` to the target ratio and resize to exactly
    /// `target_width` x `target_height`, keeping the source format.
    ///
    /// CPU bound; call from a blocking context.
    pub fn crop_and_resize(
        data: &[u8],
        target_width: u32,
        target_height: u32,
    ) -> Result<EncodedImage, ProcessingError> {
        let format = Self::detect_format(data)?;
        let img = image::load_from_memory_with_format(data, format)
            .map_err(|e| ProcessingError::Decode(e.to_string()))?;

        let (width, height) = img.dimensions();
        let rect = compute_crop_rect(
            width as i64,
            height as i64,
            target_width as i64,
            target_height as i64,
        )?;

        tracing::debug!(
            source_width = width,
            source_height = height,
            crop_x = rect.x,
            crop_y = rect.y,
            crop_width = rect.width,
            crop_height = rect.height,
            target_width,
            target_height,
            "Cropping and resizing image"
        );

        let resized = img
            .crop_imm(rect.x, rect.y, rect.width, rect.height)
            .resize_exact(target_width, target_height, FilterType::Triangle);

        Self::encode(resized, format)
    }

    fn encode(img: DynamicImage, format: ImageFormat) -> Result<EncodedImage, ProcessingError> {
        // JPEG has no alpha channel.
        let img = match format {
            ImageFormat::Jpeg => DynamicImage::ImageRgb8(img.to_rgb8()),
            _ => img,
        };

        let (width, height) = img.dimensions();
        let mut buffer = Vec::with_capacity(encode_capacity(width, height));
        img.write_to(&mut Cursor::new(&mut buffer), format)
            .map_err(|e| ProcessingError::Encode(e.to_string()))?;

        Ok(EncodedImage {
            data: Bytes::from(buffer),
            content_type: format.to_mime_type().to_string(),
            width,
            height,
        })
    }
}

/// Upper bound for the output buffer reserved up front.
const MAX_ENCODE_CAPACITY: usize = 16 * 1024 * 1024;

/// Raw RGB size of the frame, capped; encoders grow the buffer past it if needed.
fn encode_capacity(width: u32, height: u32) -> usize {
    (width as usize)
        .saturating_mul(height as usize)
        .saturating_mul(3)
        .min(MAX_ENCODE_CAPACITY)
}
