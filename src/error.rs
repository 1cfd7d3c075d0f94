//! # Error Types Module
//!
//! Error categories for the minification pipeline, one variant per failure
//! kind the pipeline distinguishes:
//!
//! - `SourceOpen`: input path unreadable (fatal for that job)
//! - `DestinationCreate`: output path cannot be created (fatal for that job)
//! - `Transform`: a registered transform failed on recognized content
//! - `DirectoryRead`: enumeration root unreadable (only surfaced when
//!   `skip_unreadable` is disabled)
//! - `Validation`: bad configuration or arguments
//! - `Io`: everything else from std I/O
//!
//! "No transform registered for this media type" is deliberately NOT an
//! error: the runner falls back to a verbatim copy instead.

use std::path::PathBuf;

/// Custom error types for the minification pipeline
#[derive(thiserror::Error, Debug)]
pub enum MinifyError {
    #[error("cannot open source {path}: {source}")]
    SourceOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot create destination {path}: {source}")]
    DestinationCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("transform failed for {media_type}: {source}")]
    Transform {
        media_type: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("cannot read directory {path}: {source}")]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("validation error: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
