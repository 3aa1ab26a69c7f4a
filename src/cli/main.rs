//! White background masking CLI tool
//!
//! Thin entry point around [`BackgroundMasker`]: parses arguments, runs one
//! file-to-file transform and reports the outcome without panicking.

use crate::{
    config::{MaskConfig, DEFAULT_THRESHOLD},
    processor::BackgroundMasker,
    services::ImageIOService,
    types::MaskResult,
};
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, warn};

/// Make near-white pixels of an image transparent and save the result as PNG
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(name = "imgly-whitemask")]
pub struct Cli {
    /// Input image (PNG, JPEG, BMP, TIFF, GIF, WebP)
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Output PNG path [default: <INPUT stem>_transparent.png next to the input]
    #[arg(value_name = "OUTPUT")]
    pub output: Option<PathBuf>,

    /// Pixels with red, green and blue all above this value become transparent
    #[arg(short, long, default_value_t = DEFAULT_THRESHOLD, allow_negative_numbers = true)]
    pub threshold: i32,

    /// Enable verbose logging (-v: INFO, -vv: DEBUG, -vvv: TRACE)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Output path, falling back to `<stem>_transparent.png` beside the input
    pub fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| ImageIOService::default_output_path(&self.input))
    }
}

pub fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = crate::tracing_config::init_cli_tracing(cli.verbose) {
        eprintln!("Warning: failed to initialize logging: {e:#}");
    }

    match run(&cli) {
        Ok(output) => {
            println!("Saved transparent image to: {}", output.display());
            ExitCode::SUCCESS
        },
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        },
    }
}

/// Run one masking pass for the parsed arguments, returning the written path
pub fn run(cli: &Cli) -> Result<PathBuf> {
    let output = cli.output_path();

    if !ImageIOService::is_supported_format(&cli.input) {
        warn!(
            input = %cli.input.display(),
            "Unrecognized input extension, relying on content detection"
        );
    }

    let config = MaskConfig::builder()
        .threshold(cli.threshold)
        .build()
        .context("Invalid configuration")?;
    let masker = BackgroundMasker::new(config).context("Failed to create masker")?;

    let result = masker
        .process_file(&cli.input, &output)
        .with_context(|| format!("Failed to process {}", cli.input.display()))?;

    report(&result);
    Ok(output)
}

fn report(result: &MaskResult) {
    let (width, height) = result.dimensions();
    debug!(
        width,
        height,
        background_pixels = result.stats.background_pixels,
        background_percent = %format!("{:.1}", result.stats.background_ratio() * 100.0),
        timings = %result.timings.summary(),
        "Masking complete"
    );
}
