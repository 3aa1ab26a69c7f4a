//! IMG.LY white background masking CLI tool
//!
//! Command-line interface that turns near-white pixels of an image transparent
//! using the imgly-whitemask library.

use std::process::ExitCode;

fn main() -> ExitCode {
    imgly_whitemask::cli::main()
}
