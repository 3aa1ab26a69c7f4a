#![allow(clippy::missing_errors_doc)]
#![allow(clippy::uninlined_format_args)]

//! # IMG.LY White Background Masking Library
//!
//! Turns near-white pixels of a raster image transparent and writes the
//! result as an RGBA PNG.
//!
//! A pixel is background when its red, green and blue channels are all
//! strictly greater than a threshold (240 by default). Background pixels get
//! alpha 0; color channels are never modified. Inputs without an alpha
//! channel (grayscale, RGB) are normalized to RGBA with full opacity first.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use imgly_whitemask::mask_background;
//!
//! mask_background("cannon.png", "cannon_transparent.png", 240)?;
//! # Ok::<(), imgly_whitemask::MaskError>(())
//! ```
//!
//! ## In-memory usage
//!
//! ```rust
//! use image::{DynamicImage, Rgb, RgbImage};
//! use imgly_whitemask::{BackgroundMasker, MaskConfig};
//!
//! let image = RgbImage::from_pixel(4, 4, Rgb([255, 255, 255]));
//! let masker = BackgroundMasker::new(MaskConfig::default())?;
//! let result = masker.mask_image(DynamicImage::ImageRgb8(image))?;
//!
//! assert_eq!(result.stats.background_pixels, 16);
//! let png_bytes = result.to_png_bytes()?;
//! # let _ = png_bytes;
//! # Ok::<(), imgly_whitemask::MaskError>(())
//! ```
//!
//! ### Feature Flags
//!
//! - `cli` (default): command-line binary and tracing subscriber setup
//! - `webp-support` (default): WebP input decoding
//! - `tracing-json`: JSON log output for the CLI

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod processor;
pub mod services;
#[cfg(feature = "cli")]
pub mod tracing_config;
pub mod types;

use std::path::Path;

pub use config::{MaskConfig, MaskConfigBuilder, DEFAULT_THRESHOLD};
pub use error::{MaskError, Result};
pub use processor::{apply_mask, compute_mask, is_background, normalize, BackgroundMasker};
pub use services::ImageIOService;
pub use types::{MaskResult, MaskStats, ProcessingTimings};

#[cfg(feature = "cli")]
pub use tracing_config::{init_cli_tracing, TracingConfig, TracingFormat};

/// Make near-white pixels of `input_path` transparent and write a PNG to `output_path`
///
/// Pixels whose red, green and blue channels all exceed `threshold` get alpha 0.
/// Thresholds outside 0-255 are accepted: 255 and above leave the image fully
/// opaque, negative values make every pixel transparent.
///
/// # Errors
/// - [`MaskError::Decode`] when the input is missing, unreadable or not an image;
///   no output file is created
/// - [`MaskError::Encode`] when the output cannot be written
/// - [`MaskError::Processing`] for any other failure
pub fn mask_background<P: AsRef<Path>, Q: AsRef<Path>>(
    input_path: P,
    output_path: Q,
    threshold: i32,
) -> Result<()> {
    BackgroundMasker::with_threshold(threshold)?.process_file(input_path, output_path)?;
    Ok(())
}

/// Mask an image provided as encoded bytes
///
/// Suitable when the image does not live on disk. The returned
/// [`MaskResult`] can be encoded with [`MaskResult::to_png_bytes`] or written
/// with [`MaskResult::save_png`].
pub fn mask_background_from_bytes(image_bytes: &[u8], config: &MaskConfig) -> Result<MaskResult> {
    BackgroundMasker::new(*config)?.process_bytes(image_bytes)
}
