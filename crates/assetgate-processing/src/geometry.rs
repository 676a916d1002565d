//! Centered crop rectangle matching a target aspect ratio.

use crate::error::GeometryError;

/// Region of the source image kept before resizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Largest centered rectangle of the source with the target's aspect ratio.
///
/// A source wider than the target keeps its full height; otherwise the full
/// width is kept. Sizes and offsets are floored. Ratios are compared with
/// integer cross-multiplication so equal ratios never lose a pixel.
pub fn compute_crop_rect(
    source_width: i64,
    source_height: i64,
    target_width: i64,
    target_height: i64,
) -> Result<CropRect, GeometryError> {
    if source_width <= 0 || source_height <= 0 || target_width <= 0 || target_height <= 0 {
        return Err(GeometryError::InvalidDimensions {
            source_width,
            source_height,
            target_width,
            target_height,
        });
    }

    let (sw, sh) = (source_width as i128, source_height as i128);
    let (tw, th) = (target_width as i128, target_height as i128);

    // sw/sh > tw/th
    let (width, height) = if sw * th > tw * sh {
        (sh * tw / th, sh)
    } else {
        (sw, sw * th / tw)
    };
    let x = (sw - width) / 2;
    let y = (sh - height) / 2;

    if width == 0 || height == 0 {
        return Err(GeometryError::Degenerate(format!(
            "{}x{} source collapses to {}x{} for target {}x{}",
            source_width, source_height, width, height, target_width, target_height
        )));
    }

    let to_u32 = |value: i128| {
        u32::try_from(value).map_err(|_| {
            GeometryError::Degenerate(format!("crop value {} out of range", value))
        })
    };

    Ok(CropRect {
        x: to_u32(x)?,
        y: to_u32(y)?,
        width: to_u32(width)?,
        height: to_u32(height)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_crop_for_bound_and_square_targets() {
        let rect = compute_crop_rect(1200, 800, 600, 315).unwrap();
        // 800 * 600 / 315 = 1523.8 > 1200, so the width is kept instead
        assert_eq!(
            rect,
            CropRect {
                x: 0,
                y: 85,
                width: 1200,
                height: 630
            }
        );

        let rect = compute_crop_rect(1600, 900, 100, 100).unwrap();
        assert_eq!(
            rect,
            CropRect {
                x: 350,
                y: 0,
                width: 900,
                height: 900
            }
        );
    }

    #[test]
    fn test_tall_source_keeps_width() {
        let rect = compute_crop_rect(400, 1000, 90, 90).unwrap();
        assert_eq!(
            rect,
            CropRect {
                x: 0,
                y: 300,
                width: 400,
                height: 400
            }
        );
    }

    #[test]
    fn test_same_ratio_is_identity() {
        let rect = compute_crop_rect(300, 900, 1, 3).unwrap();
        assert_eq!(
            rect,
            CropRect {
                x: 0,
                y: 0,
                width: 300,
                height: 900
            }
        );
    }

    #[test]
    fn test_zero_source_width_is_invalid() {
        assert!(matches!(
            compute_crop_rect(0, 100, 50, 50),
            Err(GeometryError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_negative_target_is_invalid() {
        assert!(matches!(
            compute_crop_rect(100, 100, -50, 50),
            Err(GeometryError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_collapsed_crop_is_degenerate() {
        // 10x1 is far too narrow for a 1000:1 strip.
        assert!(matches!(
            compute_crop_rect(10, 1, 1000, 1),
            Err(GeometryError::Degenerate(_))
        ));
    }

    #[test]
    fn test_oversized_source_is_degenerate() {
        assert!(matches!(
            compute_crop_rect(i64::MAX, 10, 1, 1),
            Err(GeometryError::Degenerate(_))
        ));
    }

    proptest! {
        #[test]
        fn prop_crop_contained_and_ratio_matches(
            sw in 1i64..5000,
            sh in 1i64..5000,
            tw in 1i64..5000,
            th in 1i64..5000,
        ) {
            match compute_crop_rect(sw, sh, tw, th) {
                Ok(rect) => {
                    let (x, y) = (rect.x as i64, rect.y as i64);
                    let (w, h) = (rect.width as i64, rect.height as i64);
                    prop_assert!(w > 0 && h > 0);
                    prop_assert!(x + w <= sw);
                    prop_assert!(y + h <= sh);
                    prop_assert!(w == sw || h == sh);
                    // Floor rounding leaves less than one pixel of ratio error.
                    prop_assert!((w * th - h * tw).abs() < tw.max(th));
                }
                Err(GeometryError::Degenerate(_)) => {
                    prop_assert!(sh * tw < th || sw * th < tw);
                }
                Err(other) => prop_assert!(false, "unexpected error {:?}", other),
            }
        }
    }
}
