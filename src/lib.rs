//! # Web Asset Minifier Library
//!
//! Batch content-transformation pipeline: classify each input by media
//! type, route it through the matching transform, write the result — with
//! safe in-place rewrites and a verbatim-copy fallback when no transform is
//! registered.
//!
//! ## Module architecture:
//! - `config`: run configuration and validation
//! - `error`: error types per failure kind
//! - `media_type`: extension to media type classification
//! - `naming`: `.min` output naming and the already-minified marker
//! - `discovery`: single-file and directory enumeration with eligibility
//!   filtering
//! - `registry`: media type to transform function mapping (exact + family)
//! - `transforms`: the bundled conservative minifiers
//! - `pipeline`: the job runner and batch driver
//! - `progress`: progress bar and run statistics
//!
//! ## Usage:
//! ```rust,no_run
//! use std::sync::Arc;
//! use web_asset_minifier::{transforms, BatchRunner, Config};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let registry = Arc::new(transforms::default_registry());
//! let runner = BatchRunner::new(Config::default(), registry);
//! let stats = runner.run(std::path::Path::new("assets")).await?;
//! println!("{}", stats.format_summary());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod discovery;
pub mod error;
pub mod media_type;
pub mod naming;
pub mod pipeline;
pub mod progress;
pub mod registry;
pub mod transforms;

pub use config::Config;
pub use error::MinifyError;
pub use pipeline::{BatchRunner, Endpoint, Job, JobOutcome, JobRunner};
pub use progress::RunStats;
pub use registry::{TransformFn, TransformRegistry};
