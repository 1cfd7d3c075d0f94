//! # Job Runner Module
//!
//! The stream transformer: takes one [`Job`], resolves its media type,
//! looks up the registry and either applies the transform or copies the
//! input verbatim.
//!
//! ## Per-job protocol:
//! 1. acquire the input (file or stdin); an in-place rewrite fully buffers
//!    the input before the destination is touched, so the file being read
//!    is never truncated underneath the reader
//! 2. determine the media type: job override, then classification of the
//!    source path, then of the destination path
//! 3. resolve the transform; no match means verbatim copy, not an error
//! 4. write the result
//!
//! File destinations are written through a temp file in the destination
//! directory and persisted on success, so a failed transform leaves no
//! partial output and an in-place rewrite that fails leaves the original
//! untouched. Stream destinations (stdout) write directly.

use crate::error::MinifyError;
use crate::media_type;
use crate::pipeline::job::Job;
use crate::registry::TransformRegistry;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Cursor, Read, Write};
use std::path::Path;
use std::sync::Arc;
use tempfile::NamedTempFile;
use tracing::debug;

/// How a job finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobOutcome {
    /// A registered transform produced the output.
    Minified,
    /// No transform was registered; input bytes were copied verbatim.
    Copied,
}

/// Executes single jobs against a shared, read-only registry
pub struct JobRunner {
    registry: Arc<TransformRegistry>,
}

impl JobRunner {
    pub fn new(registry: Arc<TransformRegistry>) -> Self {
        Self { registry }
    }

    /// Run one job to completion. Fatal errors (unreadable source,
    /// uncreatable destination, transform failure) are returned; a missing
    /// transform is not fatal and falls back to a verbatim copy.
    pub fn run(&self, job: &Job) -> Result<JobOutcome, MinifyError> {
        let mut reader: Box<dyn BufRead> = match job.source.path() {
            Some(path) if job.is_in_place() => {
                // buffer everything before the destination is opened
                let mut buf = Vec::new();
                File::open(path)
                    .map_err(|e| MinifyError::SourceOpen {
                        path: path.to_path_buf(),
                        source: e,
                    })?
                    .read_to_end(&mut buf)?;
                Box::new(Cursor::new(buf))
            }
            Some(path) => {
                let file = File::open(path).map_err(|e| MinifyError::SourceOpen {
                    path: path.to_path_buf(),
                    source: e,
                })?;
                Box::new(BufReader::new(file))
            }
            None => Box::new(io::stdin().lock()),
        };

        let media_type = job
            .media_type
            .clone()
            .or_else(|| {
                job.source
                    .path()
                    .and_then(media_type::classify)
                    .map(String::from)
            })
            .or_else(|| {
                job.destination
                    .path()
                    .and_then(media_type::classify)
                    .map(String::from)
            });

        match job.destination.path() {
            Some(path) => self.run_to_file(path, media_type.as_deref(), &mut reader),
            None => {
                let stdout = io::stdout();
                let mut writer = BufWriter::new(stdout.lock());
                let outcome =
                    self.transform_or_copy(media_type.as_deref(), &mut writer, &mut reader)?;
                writer.flush()?;
                Ok(outcome)
            }
        }
    }

    fn run_to_file(
        &self,
        path: &Path,
        media_type: Option<&str>,
        reader: &mut dyn BufRead,
    ) -> Result<JobOutcome, MinifyError> {
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let temp = NamedTempFile::new_in(dir).map_err(|e| MinifyError::DestinationCreate {
            path: path.to_path_buf(),
            source: e,
        })?;

        let mut writer = BufWriter::new(temp);
        let outcome = self.transform_or_copy(media_type, &mut writer, reader)?;
        let temp = writer
            .into_inner()
            .map_err(|e| MinifyError::Io(e.into_error()))?;
        temp.persist(path).map_err(|e| MinifyError::DestinationCreate {
            path: path.to_path_buf(),
            source: e.error,
        })?;
        Ok(outcome)
    }

    fn transform_or_copy(
        &self,
        media_type: Option<&str>,
        writer: &mut dyn Write,
        reader: &mut dyn BufRead,
    ) -> Result<JobOutcome, MinifyError> {
        let resolved = media_type.and_then(|mt| self.registry.resolve(mt).map(|t| (mt, t)));
        match resolved {
            Some((mt, transform)) => {
                debug!("Applying {} transform", mt);
                transform(mt, writer, reader).map_err(|e| MinifyError::Transform {
                    media_type: mt.to_string(),
                    source: e,
                })?;
                Ok(JobOutcome::Minified)
            }
            None => {
                debug!(
                    "No transform registered for {:?}, copying verbatim",
                    media_type
                );
                io::copy(reader, writer)?;
                Ok(JobOutcome::Copied)
            }
        }
    }
}
