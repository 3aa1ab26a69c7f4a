//! Service layer separating file handling from pixel processing

pub mod io;

pub use io::{ImageIOService, DEFAULT_OUTPUT_SUFFIX};
