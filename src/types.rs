//! Result types returned by masking operations

use crate::{error::Result, services::ImageIOService};
use image::RgbaImage;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Result of masking an in-memory image
#[derive(Debug, Clone)]
pub struct MaskResult {
    /// The masked image (RGB untouched, alpha cleared for background)
    pub image: RgbaImage,

    /// Pixel classification counts
    pub stats: MaskStats,

    /// Per-stage timings
    pub timings: ProcessingTimings,
}

impl MaskResult {
    #[must_use]
    pub fn new(image: RgbaImage, stats: MaskStats, timings: ProcessingTimings) -> Self {
        Self {
            image,
            stats,
            timings,
        }
    }

    /// Encode the image as PNG bytes using the fixed encoder profile
    pub fn to_png_bytes(&self) -> Result<Vec<u8>> {
        ImageIOService::encode_png(&self.image)
    }

    /// Encode and write the image as PNG
    ///
    /// The file is staged next to its destination and renamed into place, so a
    /// failed save never leaves a truncated file behind.
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let bytes = self.to_png_bytes()?;
        ImageIOService::write_atomic(path, &bytes)
    }

    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }
}

/// Counts gathered while classifying pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MaskStats {
    pub width: u32,
    pub height: u32,
    /// Pixels whose alpha was cleared
    pub background_pixels: u64,
}

impl MaskStats {
    #[must_use]
    pub fn total_pixels(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    /// Fraction of pixels classified as background, 0.0 for empty images
    #[must_use]
    pub fn background_ratio(&self) -> f64 {
        let total = self.total_pixels();
        if total == 0 {
            0.0
        } else {
            self.background_pixels as f64 / total as f64
        }
    }
}

/// Per-stage timing breakdown in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProcessingTimings {
    /// Reading and decoding the input
    pub decode_ms: u64,

    /// Normalization, classification and alpha mutation
    pub mask_ms: u64,

    /// PNG encoding and writing, when the result was saved
    pub encode_ms: Option<u64>,

    /// Total end-to-end processing time
    pub total_ms: u64,
}

impl ProcessingTimings {
    /// One-line human readable summary
    #[must_use]
    pub fn summary(&self) -> String {
        match self.encode_ms {
            Some(encode_ms) => format!(
                "decode {}ms, mask {}ms, encode {}ms, total {}ms",
                self.decode_ms, self.mask_ms, encode_ms, self.total_ms
            ),
            None => format!(
                "decode {}ms, mask {}ms, total {}ms",
                self.decode_ms, self.mask_ms, self.total_ms
            ),
        }
    }
}
