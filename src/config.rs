//! Configuration types for white background masking

use serde::{Deserialize, Serialize};

/// Default cutoff above which all three color channels mark a pixel as background
pub const DEFAULT_THRESHOLD: i32 = 240;

/// Configuration for a masking operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaskConfig {
    /// Per-channel cutoff; R, G and B must all be strictly greater to count as background.
    ///
    /// Values outside 0-255 are accepted. At 255 or above nothing is background,
    /// below 0 everything is.
    pub threshold: i32,
}

impl Default for MaskConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

impl MaskConfig {
    /// Create a configuration with the given threshold
    #[must_use]
    pub fn new(threshold: i32) -> Self {
        Self { threshold }
    }

    /// Create a new configuration builder
    ///
    /// ```rust
    /// use imgly_whitemask::MaskConfig;
    ///
    /// let config = MaskConfig::builder().threshold(250).build().unwrap();
    /// assert_eq!(config.threshold, 250);
    /// ```
    #[must_use]
    pub fn builder() -> MaskConfigBuilder {
        MaskConfigBuilder::default()
    }

    /// Whether the threshold lies outside the 8-bit channel range
    ///
    /// Such thresholds classify either every pixel or no pixel as background.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        !(0..=255).contains(&self.threshold)
    }

    /// Validate the configuration
    ///
    /// Out-of-range thresholds are accepted and only reported through a warning.
    pub fn validate(&self) -> crate::Result<()> {
        if self.is_degenerate() {
            tracing::warn!(
                threshold = self.threshold,
                "Threshold outside 0-255, result will be fully opaque or fully transparent"
            );
        }
        Ok(())
    }

    /// Validate the configuration, rejecting thresholds outside 0-255
    ///
    /// # Errors
    /// - Threshold below 0 or above 255
    pub fn validate_strict(&self) -> crate::Result<()> {
        if self.is_degenerate() {
            return Err(crate::error::MaskError::config_value_error(
                "threshold",
                self.threshold,
                "0-255",
                Some(DEFAULT_THRESHOLD),
            ));
        }
        Ok(())
    }
}

/// Builder for `MaskConfig`
#[derive(Debug, Default)]
pub struct MaskConfigBuilder {
    config: MaskConfig,
    strict: bool,
}

impl MaskConfigBuilder {
    /// Set the background threshold
    #[must_use]
    pub fn threshold(mut self, threshold: i32) -> Self {
        self.config.threshold = threshold;
        self
    }

    /// Reject thresholds outside 0-255 at build time
    #[must_use]
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Build the configuration
    pub fn build(self) -> crate::Result<MaskConfig> {
        if self.strict {
            self.config.validate_strict()?;
        } else {
            self.config.validate()?;
        }
        Ok(self.config)
    }
}
