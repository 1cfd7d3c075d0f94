//! # Source Discovery Module
//!
//! Turns a filesystem location into the set of (input, output) path pairs
//! the batch driver will process.
//!
//! ## Eligibility filter (applied to every candidate, in order):
//! 1. reject directories
//! 2. reject hidden entries (name starts with `.`)
//! 3. reject already-minified entries (name contains `.min.`)
//! 4. reject extensions outside the supported table
//!
//! ## Modes:
//! - single file root: one pair, if eligible
//! - directory, non-recursive: immediate children only
//! - directory, recursive: full subtree via `walkdir`
//!
//! Traversal order is filesystem-dependent; callers must not rely on it.
//! Unreadable roots or entries are skipped with a warning when
//! `skip_unreadable` is set (the historical behavior), otherwise they
//! propagate as `MinifyError::DirectoryRead`.

use crate::error::MinifyError;
use crate::media_type;
use crate::naming;
use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::WalkDir;

/// Enumerates minifiable sources beneath a root path
pub struct SourceEnumerator;

impl SourceEnumerator {
    /// Produce (input, output) pairs for every eligible file under `root`.
    pub fn enumerate(
        root: &Path,
        recursive: bool,
        skip_unreadable: bool,
    ) -> Result<Vec<(PathBuf, PathBuf)>, MinifyError> {
        if root.is_file() {
            if Self::is_eligible(root) {
                let output = naming::derive_output_path(root);
                return Ok(vec![(root.to_path_buf(), output)]);
            }
            return Ok(Vec::new());
        }

        if recursive {
            Self::enumerate_recursive(root, skip_unreadable)
        } else {
            Self::enumerate_flat(root, skip_unreadable)
        }
    }

    /// Check a candidate file against the eligibility filter.
    pub fn is_eligible(path: &Path) -> bool {
        let name = match path.file_name() {
            Some(name) => name.to_string_lossy(),
            None => return false,
        };
        if name.starts_with('.') {
            return false;
        }
        // don't reminify files we already produced
        if naming::is_minified_name(&name) {
            return false;
        }
        media_type::classify(path).is_some()
    }

    fn enumerate_flat(
        root: &Path,
        skip_unreadable: bool,
    ) -> Result<Vec<(PathBuf, PathBuf)>, MinifyError> {
        let entries = match std::fs::read_dir(root) {
            Ok(entries) => entries,
            Err(e) if skip_unreadable => {
                warn!("Skipping unreadable directory {}: {}", root.display(), e);
                return Ok(Vec::new());
            }
            Err(e) => {
                return Err(MinifyError::DirectoryRead {
                    path: root.to_path_buf(),
                    source: e,
                })
            }
        };

        let mut pairs = Vec::new();
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if skip_unreadable => {
                    warn!("Skipping unreadable entry in {}: {}", root.display(), e);
                    continue;
                }
                Err(e) => {
                    return Err(MinifyError::DirectoryRead {
                        path: root.to_path_buf(),
                        source: e,
                    })
                }
            };
            let path = entry.path();
            if path.is_dir() {
                continue;
            }
            if Self::is_eligible(&path) {
                let output = naming::derive_output_path(&path);
                pairs.push((path, output));
            }
        }
        Ok(pairs)
    }

    fn enumerate_recursive(
        root: &Path,
        skip_unreadable: bool,
    ) -> Result<Vec<(PathBuf, PathBuf)>, MinifyError> {
        let mut pairs = Vec::new();
        for entry in WalkDir::new(root) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if skip_unreadable => {
                    warn!("Skipping unreadable entry under {}: {}", root.display(), e);
                    continue;
                }
                Err(e) => {
                    let path = e.path().unwrap_or(root).to_path_buf();
                    let source = e
                        .into_io_error()
                        .unwrap_or_else(|| std::io::Error::other("walk error"));
                    return Err(MinifyError::DirectoryRead { path, source });
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            if Self::is_eligible(path) {
                let output = naming::derive_output_path(path);
                pairs.push((path.to_path_buf(), output));
            }
        }
        Ok(pairs)
    }
}
