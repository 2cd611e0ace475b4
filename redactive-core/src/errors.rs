//! errors.rs - Custom error types for the redactive-core library.
//!
//! Errors here cover catalog loading and compilation only: the redaction
//! path itself never fails for well-formed string input, it reports through
//! its return value instead.
//!
//! License: MIT OR Apache-2.0

use thiserror::Error;

/// This enum represents all possible error types in the `redactive-core`
/// library.
///
/// `#[non_exhaustive]` signals to consumers that new variants may be added
/// in future versions, so exhaustive matching would be a breaking change.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum RedactiveError {
    #[error("Failed to compile detector '{0}': {1}")]
    DetectorCompilationError(String, regex::Error),

    #[error("Detector '{0}': pattern length ({1}) exceeds maximum allowed ({2})")]
    PatternLengthExceeded(String, usize, usize),

    #[error("Failed to parse catalog configuration: {0}")]
    ConfigParseError(String),

    #[error("An unexpected I/O error occurred: {0}")]
    IoError(#[from] std::io::Error),

    #[error("A critical system error occurred: {0}")]
    AnyhowWrapper(#[from] anyhow::Error),

    #[error("A fatal error occurred: {0}")]
    Fatal(String),
}
