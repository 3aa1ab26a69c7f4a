//! Image I/O operations service
//!
//! This module separates file I/O from the masking logic, so the pixel
//! transformation can be tested on in-memory images.

use crate::error::{MaskError, Result};
use image::{
    codecs::png::{CompressionType, FilterType, PngEncoder},
    DynamicImage, ExtendedColorType, ImageEncoder, RgbaImage,
};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Suffix appended to the input file stem when no output path is given
pub const DEFAULT_OUTPUT_SUFFIX: &str = "_transparent";

/// Service for handling image file input/output operations
pub struct ImageIOService;

impl ImageIOService {
    /// Load an image from a file path
    ///
    /// The format is detected from the extension first and from the file
    /// signature if that fails.
    ///
    /// # Errors
    /// Returns `MaskError::Decode` when the file is missing, unreadable or
    /// not a decodable image.
    ///
    /// # Examples
    /// ```rust,no_run
    /// use imgly_whitemask::services::ImageIOService;
    ///
    /// let image = ImageIOService::load_image("sprite.png")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn load_image<P: AsRef<Path>>(path: P) -> Result<DynamicImage> {
        let path_ref = path.as_ref();

        if !path_ref.is_file() {
            return Err(MaskError::decode_error(path_ref, "file does not exist"));
        }

        match image::open(path_ref) {
            Ok(img) => Ok(img),
            Err(e) => {
                tracing::debug!(
                    "Extension-based loading failed for {}: {}. Attempting content-based detection.",
                    path_ref.display(),
                    e
                );

                let data =
                    std::fs::read(path_ref).map_err(|io_err| MaskError::decode_error(path_ref, io_err))?;

                image::load_from_memory(&data).map_err(|content_err| {
                    MaskError::decode_error(
                        path_ref,
                        format!(
                            "extension error: {}; content error: {} ({} bytes)",
                            e,
                            content_err,
                            data.len()
                        ),
                    )
                })
            },
        }
    }

    /// Decode an image from raw bytes, detecting the format from its signature
    pub fn load_from_bytes(bytes: &[u8]) -> Result<DynamicImage> {
        image::load_from_memory(bytes)
            .map_err(|e| MaskError::decode(format!("Failed to decode image from bytes: {}", e)))
    }

    /// Encode an RGBA image as PNG
    ///
    /// Compression and filter settings are fixed so identical pixels always
    /// produce identical bytes.
    pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>> {
        let (width, height) = image.dimensions();
        let mut buffer = Vec::new();

        let encoder =
            PngEncoder::new_with_quality(&mut buffer, CompressionType::Default, FilterType::Adaptive);
        encoder
            .write_image(image.as_raw(), width, height, ExtendedColorType::Rgba8)
            .map_err(|e| MaskError::encode(format!("Failed to encode PNG: {}", e)))?;

        Ok(buffer)
    }

    /// Write bytes to `path` without ever exposing a partially written file
    ///
    /// Data is written to a temporary file in the destination directory and
    /// renamed over `path` once complete. The staging file is removed if any
    /// step fails. The destination directory must already exist.
    pub fn write_atomic<P: AsRef<Path>>(path: P, bytes: &[u8]) -> Result<()> {
        let path_ref = path.as_ref();
        let parent = match path_ref.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        if path_ref.is_dir() {
            return Err(MaskError::encode_error(
                "write output",
                path_ref,
                "destination is a directory",
            ));
        }

        let mut builder = tempfile::Builder::new();
        builder.prefix(".whitemask-").suffix(".tmp");
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            builder.permissions(std::fs::Permissions::from_mode(0o644));
        }

        let mut staged = builder
            .tempfile_in(parent)
            .map_err(|e| MaskError::encode_error("create staging file in", parent, e))?;

        staged
            .write_all(bytes)
            .map_err(|e| MaskError::encode_error("write output", path_ref, e))?;
        staged
            .as_file()
            .sync_all()
            .map_err(|e| MaskError::encode_error("flush output", path_ref, e))?;

        staged
            .persist(path_ref)
            .map_err(|e| MaskError::encode_error("move output into place at", path_ref, e.error))?;

        Ok(())
    }

    /// Check if a file path has an extension the decoder understands
    pub fn is_supported_format<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase)
            .is_some_and(|ext| {
                matches!(
                    ext.as_str(),
                    "jpg" | "jpeg" | "png" | "webp" | "tiff" | "tif" | "bmp" | "gif"
                )
            })
    }

    /// Output path used when the caller names none: `<dir>/<stem>_transparent.png`
    pub fn default_output_path<P: AsRef<Path>>(input: P) -> PathBuf {
        let input = input.as_ref();
        let stem = input
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("output");

        input.with_file_name(format!("{stem}{DEFAULT_OUTPUT_SUFFIX}.png"))
    }
}
