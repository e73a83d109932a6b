//! Error types for G-code emission.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while configuring or exporting motion.
#[derive(Error, Debug)]
pub enum GcodeError {
    /// Invalid G-code settings.
    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    /// Failed to write the output file.
    #[error("failed to write {path}: {source}")]
    Io {
        /// Destination path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Result type for G-code operations.
pub type Result<T> = std::result::Result<T, GcodeError>;
