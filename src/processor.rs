//! White background masking processor
//!
//! Holds the pixel classification and alpha mutation that turn near-white
//! pixels transparent. Every image is first normalized to RGBA8, then viewed
//! as an `(height, width, 4)` array so the per-pixel predicate runs as one
//! batch operation over the buffer.

use crate::{
    config::MaskConfig,
    error::{MaskError, Result},
    services::ImageIOService,
    types::{MaskResult, MaskStats, ProcessingTimings},
};
use image::{DynamicImage, Rgba, RgbaImage};
use instant::Instant;
use ndarray::{Array2, ArrayView3, ArrayViewMut3, Axis, Zip};
use std::path::Path;
use tracing::{debug, info, instrument};

/// Channels per pixel after normalization
pub const RGBA_CHANNELS: usize = 4;

const ALPHA: usize = 3;

/// Convert any decoded image to 8-bit RGBA
///
/// Grayscale and RGB sources gain a fully opaque alpha channel. Sources that
/// already carry alpha keep it; higher bit depths are scaled down to 8 bits.
#[must_use]
pub fn normalize(image: DynamicImage) -> RgbaImage {
    match image {
        DynamicImage::ImageRgba8(rgba) => rgba,
        other => other.into_rgba8(),
    }
}

/// Background predicate: R, G and B all strictly above `threshold`
#[inline]
#[must_use]
pub fn is_background(pixel: &Rgba<u8>, threshold: i32) -> bool {
    let [r, g, b, _] = pixel.0;
    i32::from(r) > threshold && i32::from(g) > threshold && i32::from(b) > threshold
}

fn shape_error(width: u32, height: u32, err: impl std::fmt::Display) -> MaskError {
    MaskError::processing_stage_error(
        "pixel view",
        &err.to_string(),
        Some(&format!("{}x{} RGBA8", width, height)),
    )
}

fn pixel_view(image: &RgbaImage) -> Result<ArrayView3<'_, u8>> {
    let (width, height) = image.dimensions();
    ArrayView3::from_shape(
        (height as usize, width as usize, RGBA_CHANNELS),
        image.as_raw().as_slice(),
    )
    .map_err(|e| shape_error(width, height, e))
}

/// Classify every pixel, returning a `(height, width)` grid that is `true` for background
pub fn compute_mask(image: &RgbaImage, threshold: i32) -> Result<Array2<bool>> {
    let view = pixel_view(image)?;

    Ok(Zip::from(view.lanes(Axis(2)))
        .map_collect(|px| is_background(&Rgba([px[0], px[1], px[2], px[ALPHA]]), threshold)))
}

/// Zero the alpha of every pixel marked in `mask`, returning how many were marked
///
/// Color channels are never touched.
///
/// # Errors
/// `MaskError::Processing` when the mask does not match the image dimensions.
pub fn apply_mask(image: &mut RgbaImage, mask: &Array2<bool>) -> Result<u64> {
    let (width, height) = image.dimensions();
    let expected = (height as usize, width as usize);

    if mask.dim() != expected {
        return Err(MaskError::processing_stage_error(
            "alpha masking",
            &format!(
                "mask is {}x{} but image is {}x{}",
                mask.ncols(),
                mask.nrows(),
                width,
                height
            ),
            None,
        ));
    }

    let mut view = ArrayViewMut3::from_shape(
        (height as usize, width as usize, RGBA_CHANNELS),
        &mut **image,
    )
    .map_err(|e| shape_error(width, height, e))?;

    let mut cleared = 0u64;
    Zip::from(view.lanes_mut(Axis(2)))
        .and(mask)
        .for_each(|mut px, &background| {
            if background {
                px[ALPHA] = 0;
                cleared += 1;
            }
        });

    Ok(cleared)
}

/// Processor applying the white background mask to images and files
#[derive(Debug, Clone)]
pub struct BackgroundMasker {
    config: MaskConfig,
}

impl Default for BackgroundMasker {
    fn default() -> Self {
        Self {
            config: MaskConfig::default(),
        }
    }
}

impl BackgroundMasker {
    /// Create a masker, validating the configuration
    pub fn new(config: MaskConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Shorthand for a masker with the given threshold
    pub fn with_threshold(threshold: i32) -> Result<Self> {
        Self::new(MaskConfig::new(threshold))
    }

    #[must_use]
    pub fn config(&self) -> &MaskConfig {
        &self.config
    }

    /// Normalize and mask an in-memory image
    pub fn mask_image(&self, image: DynamicImage) -> Result<MaskResult> {
        let start = Instant::now();
        let mut rgba = normalize(image);

        let mask = compute_mask(&rgba, self.config.threshold)?;
        let background_pixels = apply_mask(&mut rgba, &mask)?;

        let (width, height) = rgba.dimensions();
        let stats = MaskStats {
            width,
            height,
            background_pixels,
        };
        let elapsed = start.elapsed().as_millis() as u64;
        let timings = ProcessingTimings {
            mask_ms: elapsed,
            total_ms: elapsed,
            ..ProcessingTimings::default()
        };

        debug!(
            width,
            height,
            background_pixels,
            threshold = self.config.threshold,
            "Applied white background mask"
        );

        Ok(MaskResult::new(rgba, stats, timings))
    }

    /// Decode image bytes and mask them
    pub fn process_bytes(&self, bytes: &[u8]) -> Result<MaskResult> {
        let decode_start = Instant::now();
        let image = ImageIOService::load_from_bytes(bytes)?;
        let decode_ms = decode_start.elapsed().as_millis() as u64;

        let mut result = self.mask_image(image)?;
        result.timings.decode_ms = decode_ms;
        result.timings.total_ms += decode_ms;
        Ok(result)
    }

    /// Read `input_path`, mask it and write the result as PNG to `output_path`
    ///
    /// Nothing is written when decoding or masking fails, and the output is
    /// never left half written.
    ///
    /// # Errors
    /// - `MaskError::Decode` if the input is missing or not a readable image
    /// - `MaskError::Encode` if the PNG cannot be encoded or written
    /// - `MaskError::Processing` for any other failure while masking
    #[instrument(
        skip(self, input_path, output_path),
        fields(
            input = %input_path.as_ref().display(),
            output = %output_path.as_ref().display(),
            threshold = self.config.threshold
        )
    )]
    pub fn process_file<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input_path: P,
        output_path: Q,
    ) -> Result<MaskResult> {
        let total_start = Instant::now();
        let output_path = output_path.as_ref();

        let decode_start = Instant::now();
        let image = ImageIOService::load_image(input_path.as_ref())?;
        let decode_ms = decode_start.elapsed().as_millis() as u64;
        debug!(
            width = image.width(),
            height = image.height(),
            color = ?image.color(),
            "Decoded input image"
        );

        let mut result = self.mask_image(image)?;

        let encode_start = Instant::now();
        result.save_png(output_path)?;

        result.timings.decode_ms = decode_ms;
        result.timings.encode_ms = Some(encode_start.elapsed().as_millis() as u64);
        result.timings.total_ms = total_start.elapsed().as_millis() as u64;

        info!(
            background_pixels = result.stats.background_pixels,
            total_pixels = result.stats.total_pixels(),
            timings = %result.timings.summary(),
            "Saved transparent image to: {}",
            output_path.display()
        );

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma, Rgb, RgbImage};

    fn rgba(pixels: &[[u8; 4]], width: u32, height: u32) -> RgbaImage {
        let raw: Vec<u8> = pixels.iter().flatten().copied().collect();
        RgbaImage::from_raw(width, height, raw).unwrap()
    }

    #[test]
    fn test_is_background_is_strict() {
        assert!(is_background(&Rgba([241, 241, 241, 255]), 240));
        assert!(!is_background(&Rgba([240, 240, 240, 255]), 240));
        assert!(!is_background(&Rgba([255, 255, 240, 255]), 240));
        assert!(!is_background(&Rgba([255, 0, 255, 255]), 240));
    }

    #[test]
    fn test_is_background_ignores_alpha() {
        assert!(is_background(&Rgba([250, 250, 250, 0]), 240));
        assert!(!is_background(&Rgba([10, 10, 10, 255]), 240));
    }

    #[test]
    fn test_degenerate_thresholds() {
        let white = Rgba([255, 255, 255, 255]);
        let black = Rgba([0, 0, 0, 255]);
        assert!(!is_background(&white, 255));
        assert!(!is_background(&white, 1000));
        assert!(is_background(&black, -1));
        assert!(is_background(&white, -1));
    }

    #[test]
    fn test_normalize_gray_gets_opaque_alpha() {
        let gray = GrayImage::from_pixel(3, 2, Luma([200]));
        let normalized = normalize(DynamicImage::ImageLuma8(gray));
        assert_eq!(normalized.dimensions(), (3, 2));
        assert!(normalized.pixels().all(|p| *p == Rgba([200, 200, 200, 255])));
    }

    #[test]
    fn test_normalize_rgb_gets_opaque_alpha() {
        let rgb = RgbImage::from_pixel(2, 2, Rgb([1, 2, 3]));
        let normalized = normalize(DynamicImage::ImageRgb8(rgb));
        assert!(normalized.pixels().all(|p| *p == Rgba([1, 2, 3, 255])));
    }

    #[test]
    fn test_normalize_keeps_existing_alpha() {
        let image = rgba(&[[10, 20, 30, 128]], 1, 1);
        let normalized = normalize(DynamicImage::ImageRgba8(image));
        assert_eq!(normalized.get_pixel(0, 0), &Rgba([10, 20, 30, 128]));
    }

    #[test]
    fn test_compute_mask_layout_is_row_major() {
        // 3 wide, 2 high: only (x=2, y=0) and (x=0, y=1) are white
        let image = rgba(
            &[
                [0, 0, 0, 255],
                [0, 0, 0, 255],
                [255, 255, 255, 255],
                [250, 250, 250, 255],
                [0, 0, 0, 255],
                [0, 0, 0, 255],
            ],
            3,
            2,
        );
        let mask = compute_mask(&image, 240).unwrap();
        assert_eq!(mask.dim(), (2, 3));
        assert!(mask[[0, 2]]);
        assert!(mask[[1, 0]]);
        assert_eq!(mask.iter().filter(|&&m| m).count(), 2);
    }

    #[test]
    fn test_apply_mask_only_touches_alpha() {
        let mut image = rgba(&[[255, 255, 255, 255], [12, 34, 56, 255]], 2, 1);
        let mask = compute_mask(&image, 240).unwrap();
        let cleared = apply_mask(&mut image, &mask).unwrap();

        assert_eq!(cleared, 1);
        assert_eq!(image.get_pixel(0, 0), &Rgba([255, 255, 255, 0]));
        assert_eq!(image.get_pixel(1, 0), &Rgba([12, 34, 56, 255]));
    }

    #[test]
    fn test_apply_mask_rejects_mismatched_mask() {
        let mut image = RgbaImage::new(4, 4);
        let mask = Array2::from_elem((2, 2), true);
        let err = apply_mask(&mut image, &mask).unwrap_err();
        assert!(matches!(err, MaskError::Processing(_)));
        assert!(err.to_string().contains("alpha masking"));
    }

    #[test]
    fn test_mask_image_scenario_two_pixels() {
        let image = rgba(&[[255, 255, 255, 255], [0, 0, 0, 255]], 2, 1);
        let masker = BackgroundMasker::default();
        let result = masker.mask_image(DynamicImage::ImageRgba8(image)).unwrap();

        assert_eq!(result.image.get_pixel(0, 0), &Rgba([255, 255, 255, 0]));
        assert_eq!(result.image.get_pixel(1, 0), &Rgba([0, 0, 0, 255]));
        assert_eq!(result.stats.background_pixels, 1);
        assert_eq!(result.stats.total_pixels(), 2);
    }

    #[test]
    fn test_mask_image_preserves_foreground_alpha() {
        let image = rgba(&[[100, 100, 100, 77], [250, 250, 250, 77]], 2, 1);
        let result = BackgroundMasker::default()
            .mask_image(DynamicImage::ImageRgba8(image))
            .unwrap();

        assert_eq!(result.image.get_pixel(0, 0)[3], 77);
        assert_eq!(result.image.get_pixel(1, 0)[3], 0);
    }

    #[test]
    fn test_mask_image_empty_image() {
        let result = BackgroundMasker::default()
            .mask_image(DynamicImage::new_rgba8(0, 0))
            .unwrap();
        assert_eq!(result.stats.background_pixels, 0);
        assert_eq!(result.dimensions(), (0, 0));
    }

    #[test]
    fn test_process_bytes_rejects_garbage() {
        let err = BackgroundMasker::default()
            .process_bytes(b"not an image")
            .unwrap_err();
        assert!(err.is_decode());
    }
}
