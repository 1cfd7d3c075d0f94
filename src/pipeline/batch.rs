//! # Batch Driver Module
//!
//! Directory mode: enumerate eligible sources, run one job per file with a
//! bounded number of workers, and aggregate the results.
//!
//! Jobs are independent (the registry is read-only and every destination is
//! a distinct file), so they run concurrently behind a semaphore. The
//! default policy is report-and-continue: a failed job is logged and
//! counted, the run completes, and the caller decides the exit code from
//! `RunStats::errors`. `fail_fast` switches to sequential
//! abort-on-first-error.

use crate::config::Config;
use crate::discovery::SourceEnumerator;
use crate::media_type;
use crate::pipeline::job::{Endpoint, Job};
use crate::pipeline::runner::{JobOutcome, JobRunner};
use crate::progress::{calculate_reduction, ProgressManager, RunStats};
use crate::registry::TransformRegistry;
use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{error, info};

/// Runs every eligible file under a root directory through the pipeline
pub struct BatchRunner {
    config: Config,
    registry: Arc<TransformRegistry>,
}

impl BatchRunner {
    pub fn new(config: Config, registry: Arc<TransformRegistry>) -> Self {
        Self { config, registry }
    }

    /// Minify everything eligible under `root`.
    pub async fn run(&self, root: &Path) -> Result<RunStats> {
        let pairs =
            SourceEnumerator::enumerate(root, self.config.recursive, self.config.skip_unreadable)?;

        if pairs.is_empty() {
            info!("No eligible files found in {}", root.display());
            return Ok(RunStats::new());
        }
        info!("Found {} files to minify", pairs.len());

        if self.config.fail_fast {
            return self.run_sequential(pairs).await;
        }
        self.run_concurrent(pairs).await
    }

    /// The `-x` override applies to every file of a batch; an unrecognized
    /// token degrades every job to a verbatim copy, as in stream mode.
    fn override_media_type(&self) -> Option<String> {
        self.config.ext_override.as_deref().map(|token| {
            media_type::from_token(token)
                .map(String::from)
                .unwrap_or_else(|| token.to_string())
        })
    }

    async fn run_concurrent(&self, pairs: Vec<(PathBuf, PathBuf)>) -> Result<RunStats> {
        let progress = ProgressManager::new(pairs.len() as u64);
        let semaphore = Arc::new(Semaphore::new(self.config.workers));
        let override_mt = self.override_media_type();
        let mut tasks: Vec<tokio::task::JoinHandle<Result<(JobOutcome, u64, u64)>>> = Vec::new();

        for (input, output) in pairs {
            let permit = semaphore.clone().acquire_owned().await?;
            let runner = JobRunner::new(self.registry.clone());
            let progress = progress.clone();
            let media_type = override_mt.clone();

            let task = tokio::spawn(async move {
                let _permit = permit;

                let bytes_in = tokio::fs::metadata(&input)
                    .await
                    .map(|m| m.len())
                    .unwrap_or(0);
                let job = Job::new(Endpoint::file(&input), Endpoint::file(&output), media_type);
                let result = tokio::task::spawn_blocking(move || runner.run(&job)).await?;
                let name = input
                    .file_name()
                    .unwrap_or_default()
                    .to_string_lossy()
                    .into_owned();

                match result {
                    Ok(outcome) => {
                        let bytes_out = tokio::fs::metadata(&output)
                            .await
                            .map(|m| m.len())
                            .unwrap_or(bytes_in);
                        match outcome {
                            JobOutcome::Minified => progress.update(&format!(
                                "[OK] {}: {:.1}% saved",
                                name,
                                calculate_reduction(bytes_in, bytes_out)
                            )),
                            JobOutcome::Copied => {
                                progress.update(&format!("[COPY] {}: no transform registered", name))
                            }
                        }
                        Ok((outcome, bytes_in, bytes_out))
                    }
                    Err(e) => {
                        error!("Failed to minify {}: {}", input.display(), e);
                        progress.update(&format!("[ERROR] {}", name));
                        Err(e.into())
                    }
                }
            });

            tasks.push(task);
        }

        let mut stats = RunStats::new();
        for task in tasks {
            match task.await? {
                Ok((JobOutcome::Minified, bytes_in, bytes_out)) => {
                    stats.add_minified(bytes_in, bytes_out)
                }
                Ok((JobOutcome::Copied, bytes_in, _)) => stats.add_copied(bytes_in),
                // already logged by the task
                Err(_) => stats.add_error(),
            }
        }

        progress.finish(&stats.format_summary());
        Ok(stats)
    }

    async fn run_sequential(&self, pairs: Vec<(PathBuf, PathBuf)>) -> Result<RunStats> {
        let override_mt = self.override_media_type();
        let mut stats = RunStats::new();

        for (input, output) in pairs {
            let runner = JobRunner::new(self.registry.clone());
            let bytes_in = tokio::fs::metadata(&input)
                .await
                .map(|m| m.len())
                .unwrap_or(0);
            let job = Job::new(
                Endpoint::file(&input),
                Endpoint::file(&output),
                override_mt.clone(),
            );
            let outcome = tokio::task::spawn_blocking(move || runner.run(&job))
                .await?
                .map_err(|e| anyhow::anyhow!("failed to minify {}: {}", input.display(), e))?;
            let bytes_out = tokio::fs::metadata(&output)
                .await
                .map(|m| m.len())
                .unwrap_or(bytes_in);

            match outcome {
                JobOutcome::Minified => stats.add_minified(bytes_in, bytes_out),
                JobOutcome::Copied => stats.add_copied(bytes_in),
            }
        }

        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transforms;
    use std::fs;
    use tempfile::TempDir;

    fn batch_runner(recursive: bool, fail_fast: bool) -> BatchRunner {
        let config = Config {
            recursive,
            fail_fast,
            ..Default::default()
        };
        BatchRunner::new(config, Arc::new(transforms::default_registry()))
    }

    #[tokio::test]
    async fn test_batch_minifies_directory_tree() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("a.css"), "body {\n  color: red;\n}\n").unwrap();
        fs::write(temp_dir.path().join("data.json"), "{\n  \"a\": 1\n}\n").unwrap();
        fs::create_dir(temp_dir.path().join("sub")).unwrap();
        fs::write(temp_dir.path().join("sub").join("c.js"), "// c\nvar c = 1;\n").unwrap();

        let stats = batch_runner(true, false).run(temp_dir.path()).await.unwrap();

        assert_eq!(stats.files_minified, 3);
        assert_eq!(stats.errors, 0);
        assert_eq!(
            fs::read_to_string(temp_dir.path().join("a.min.css")).unwrap(),
            "body{color: red;}"
        );
        assert_eq!(
            fs::read_to_string(temp_dir.path().join("data.min.json")).unwrap(),
            "{\"a\":1}"
        );
        assert!(temp_dir.path().join("sub").join("c.min.js").exists());
    }

    #[tokio::test]
    async fn test_batch_continues_after_job_failure() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("bad.json"), "{ nope").unwrap();
        fs::write(temp_dir.path().join("good.css"), "a { top: 0; }").unwrap();

        let stats = batch_runner(false, false).run(temp_dir.path()).await.unwrap();

        assert_eq!(stats.errors, 1);
        assert_eq!(stats.files_minified, 1);
        assert!(temp_dir.path().join("good.min.css").exists());
        assert!(!temp_dir.path().join("bad.min.json").exists());
    }

    #[tokio::test]
    async fn test_fail_fast_aborts_on_error() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("bad.json"), "{ nope").unwrap();

        let result = batch_runner(false, true).run(temp_dir.path()).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_rerun_never_produces_double_markers() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("a.css"), "a { top: 0; }").unwrap();

        batch_runner(true, false).run(temp_dir.path()).await.unwrap();
        batch_runner(true, false).run(temp_dir.path()).await.unwrap();

        for entry in fs::read_dir(temp_dir.path()).unwrap() {
            let name = entry.unwrap().file_name().to_string_lossy().into_owned();
            assert!(!name.contains(".min.min."), "reprocessed output: {}", name);
        }
    }

    #[tokio::test]
    async fn test_extension_override_applies_to_whole_batch() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("data.js"), "{ \"a\": 1 }").unwrap();

        let config = Config {
            ext_override: Some("json".to_string()),
            ..Default::default()
        };
        let runner = BatchRunner::new(config, Arc::new(transforms::default_registry()));
        runner.run(temp_dir.path()).await.unwrap();

        assert_eq!(
            fs::read_to_string(temp_dir.path().join("data.min.js")).unwrap(),
            "{\"a\":1}"
        );
    }

    #[tokio::test]
    async fn test_empty_directory_yields_empty_stats() {
        let temp_dir = TempDir::new().unwrap();
        let stats = batch_runner(false, false).run(temp_dir.path()).await.unwrap();
        assert_eq!(stats.files_processed, 0);
    }
}
