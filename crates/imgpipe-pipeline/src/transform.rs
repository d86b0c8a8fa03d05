//! Operation folding over a decoded image.

use std::io::Cursor;

use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};

use imgpipe_models::{FilterKind, Operation};

use crate::error::{PipelineError, PipelineResult};

/// Gaussian sigma for the blur filter.
const BLUR_SIGMA: f32 = 2.0;

/// Center-weighted 3x3 sharpen kernel, normalized.
const SHARPEN_KERNEL: [f32; 9] = [
    -0.125, -0.125, -0.125, //
    -0.125, 2.0, -0.125, //
    -0.125, -0.125, -0.125,
];

/// 3x3 edge-enhance kernel, normalized.
const EDGE_ENHANCE_KERNEL: [f32; 9] = [
    -0.5, -0.5, -0.5, //
    -0.5, 5.0, -0.5, //
    -0.5, -0.5, -0.5,
];

/// Apply an operation chain to encoded source bytes.
///
/// Decodes the source, folds the operations in submission order, and
/// re-encodes the result as JPEG. Deterministic: the same inputs produce
/// byte-identical output on every run.
pub fn apply(source: &[u8], operations: &[Operation]) -> PipelineResult<Vec<u8>> {
    let mut img =
        image::load_from_memory(source).map_err(|e| PipelineError::Decode(e.to_string()))?;

    for op in operations {
        img = apply_operation(&img, op);
    }

    encode_jpeg(&img)
}

fn apply_operation(image: &DynamicImage, op: &Operation) -> DynamicImage {
    match op {
        Operation::Resize { size: [w, h] } => image.resize_exact(*w, *h, FilterType::CatmullRom),
        Operation::Filter { filter_type } => apply_filter(image, *filter_type),
        Operation::Brightness { factor } => adjust_brightness(image, *factor),
    }
}

fn apply_filter(image: &DynamicImage, kind: FilterKind) -> DynamicImage {
    match kind {
        FilterKind::Blur => image.blur(BLUR_SIGMA),
        FilterKind::Sharpen => image.filter3x3(&SHARPEN_KERNEL),
        FilterKind::EdgeEnhance => image.filter3x3(&EDGE_ENHANCE_KERNEL),
        // Unrecognized kinds pass the image through unchanged.
        FilterKind::Other => image.clone(),
    }
}

/// Rescale luminance by multiplying each channel, saturating at the
/// channel bounds. The factor is not bounds-checked.
fn adjust_brightness(image: &DynamicImage, factor: f32) -> DynamicImage {
    let mut rgb = image.to_rgb8();
    for pixel in rgb.pixels_mut() {
        for channel in pixel.0.iter_mut() {
            *channel = (f32::from(*channel) * factor).round().clamp(0.0, 255.0) as u8;
        }
    }
    DynamicImage::ImageRgb8(rgb)
}

/// Encode to the fixed output format.
///
/// JPEG cannot carry an alpha channel; the image is normalized to RGB
/// before encoding.
fn encode_jpeg(image: &DynamicImage) -> PipelineResult<Vec<u8>> {
    let mut buf = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(image.to_rgb8())
        .write_to(&mut buf, ImageFormat::Jpeg)
        .map_err(|e| PipelineError::Encode(e.to_string()))?;
    Ok(buf.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    /// Encode a gradient test image as PNG bytes.
    fn test_image_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_fn(width, height, |x, y| {
            Rgb([
                (x * 7 % 256) as u8,
                (y * 13 % 256) as u8,
                ((x + y) * 5 % 256) as u8,
            ])
        });
        let mut buf = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(img)
            .write_to(&mut buf, ImageFormat::Png)
            .expect("encode test image");
        buf.into_inner()
    }

    /// Flat mid-gray image, useful for brightness assertions.
    fn gray_image_bytes(width: u32, height: u32, level: u8) -> Vec<u8> {
        let img = RgbImage::from_pixel(width, height, Rgb([level, level, level]));
        let mut buf = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(img)
            .write_to(&mut buf, ImageFormat::Png)
            .expect("encode test image");
        buf.into_inner()
    }

    fn mean_luminance(bytes: &[u8]) -> f64 {
        let img = image::load_from_memory(bytes).expect("decode").to_rgb8();
        let sum: u64 = img
            .pixels()
            .map(|p| u64::from(p.0[0]) + u64::from(p.0[1]) + u64::from(p.0[2]))
            .sum();
        sum as f64 / (img.width() as f64 * img.height() as f64 * 3.0)
    }

    #[test]
    fn resize_produces_exact_dimensions() {
        let source = test_image_bytes(32, 24);
        let out = apply(&source, &[Operation::Resize { size: [100, 100] }]).unwrap();

        let decoded = image::load_from_memory(&out).expect("decode result");
        assert_eq!(decoded.width(), 100);
        assert_eq!(decoded.height(), 100);
    }

    #[test]
    fn apply_is_deterministic() {
        let source = test_image_bytes(32, 32);
        let ops = vec![
            Operation::Resize { size: [48, 48] },
            Operation::Filter {
                filter_type: FilterKind::Sharpen,
            },
            Operation::Brightness { factor: 1.2 },
        ];

        let first = apply(&source, &ops).unwrap();
        let second = apply(&source, &ops).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn unknown_filter_kind_is_passthrough() {
        let source = test_image_bytes(32, 32);

        let with_unknown = apply(
            &source,
            &[Operation::Filter {
                filter_type: FilterKind::Other,
            }],
        )
        .unwrap();
        let without = apply(&source, &[]).unwrap();

        assert_eq!(with_unknown, without);
    }

    #[test]
    fn brightness_scales_mean_luminance() {
        let source = gray_image_bytes(64, 64, 100);
        let out = apply(&source, &[Operation::Brightness { factor: 1.5 }]).unwrap();

        let mean = mean_luminance(&out);
        // JPEG quantization introduces a small error; 150 is the exact target.
        assert!((mean - 150.0).abs() < 5.0, "mean luminance was {mean}");
    }

    #[test]
    fn brightness_zero_blacks_out() {
        let source = gray_image_bytes(16, 16, 200);
        let out = apply(&source, &[Operation::Brightness { factor: 0.0 }]).unwrap();
        assert!(mean_luminance(&out) < 5.0);
    }

    #[test]
    fn operations_apply_in_submission_order() {
        let source = test_image_bytes(64, 64);
        let out = apply(
            &source,
            &[
                Operation::Filter {
                    filter_type: FilterKind::Blur,
                },
                Operation::Resize { size: [20, 30] },
            ],
        )
        .unwrap();

        let decoded = image::load_from_memory(&out).expect("decode result");
        assert_eq!((decoded.width(), decoded.height()), (20, 30));
    }

    #[test]
    fn undecodable_bytes_fail_with_decode_error() {
        let result = apply(b"definitely not an image", &[]);
        assert!(matches!(result, Err(PipelineError::Decode(_))));
    }

    #[test]
    fn filters_decode_cleanly() {
        let source = test_image_bytes(32, 32);
        for kind in [FilterKind::Blur, FilterKind::Sharpen, FilterKind::EdgeEnhance] {
            let out = apply(&source, &[Operation::Filter { filter_type: kind }]).unwrap();
            let decoded = image::load_from_memory(&out).expect("decode result");
            assert_eq!((decoded.width(), decoded.height()), (32, 32));
        }
    }
}
