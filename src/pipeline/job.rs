//! # Job Descriptors Module
//!
//! Plain data describing one unit of work. An [`Endpoint`] is either a file
//! path or the process's anonymous stream (stdin for sources, stdout for
//! destinations). Jobs are immutable once built and consumed exactly once
//! by the runner.

use std::path::{Path, PathBuf};

/// One side of a job: a file path, or the anonymous byte stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    path: Option<PathBuf>,
}

impl Endpoint {
    /// Endpoint backed by a file path.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// Endpoint backed by the process stream (stdin/stdout).
    pub fn stream() -> Self {
        Self { path: None }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn is_stream(&self) -> bool {
        self.path.is_none()
    }
}

/// One unit of work: input, output, and an optional media type override
#[derive(Debug, Clone)]
pub struct Job {
    pub source: Endpoint,
    pub destination: Endpoint,
    /// Overrides classification when set (the `-x` flag).
    pub media_type: Option<String>,
}

impl Job {
    pub fn new(source: Endpoint, destination: Endpoint, media_type: Option<String>) -> Self {
        Self {
            source,
            destination,
            media_type,
        }
    }

    /// Batch-mode constructor: both endpoints are files, no override.
    pub fn for_paths(input: &Path, output: &Path) -> Self {
        Self::new(Endpoint::file(input), Endpoint::file(output), None)
    }

    /// True when source and destination name the same file, which requires
    /// the input to be fully buffered before any write happens.
    pub fn is_in_place(&self) -> bool {
        match (self.source.path(), self.destination.path()) {
            (Some(src), Some(dst)) => src == dst,
            _ => false,
        }
    }
}
