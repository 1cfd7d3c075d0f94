//! # Asset Minifier - Main Entry Point
//!
//! Thin CLI glue around the library:
//! 1. parse arguments with `clap`
//! 2. initialize `tracing` (logs go to stderr, since stdout may carry
//!    minified output in stream mode)
//! 3. build the default transform registry
//! 4. dispatch: directory mode runs the batch driver, otherwise a single
//!    job runs against a file or the stdin/stdout streams
//!
//! ## Example usage:
//! ```bash
//! asset-minifier style.css -o style.min.css
//! asset-minifier -d assets -r --workers 8
//! cat data.json | asset-minifier -x json > data.min.json
//! ```

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use web_asset_minifier::pipeline::{Endpoint, Job};
use web_asset_minifier::{media_type, transforms, BatchRunner, Config, JobRunner};

#[derive(Parser)]
#[command(name = "asset-minifier")]
#[command(about = "Minify CSS, HTML, JS, JSON, SVG and XML files")]
struct Args {
    /// Input file (stdin when omitted)
    input: Option<PathBuf>,

    /// Output file (stdout when omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// File extension override (css, html, js, json, svg or xml), optional
    /// for input files
    #[arg(short = 'x', long = "ext")]
    ext: Option<String>,

    /// Directory to search for files
    #[arg(short, long)]
    directory: Option<PathBuf>,

    /// Recursively minify everything
    #[arg(short, long)]
    recursive: bool,

    /// Number of parallel workers in directory mode
    #[arg(short, long, default_value = "4")]
    workers: usize,

    /// Abort directory mode on the first failed file
    #[arg(long)]
    fail_fast: bool,

    /// Treat unreadable directories as errors instead of skipping them
    #[arg(long)]
    fail_unreadable: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(if args.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let config = Config {
        ext_override: args.ext.clone(),
        recursive: args.recursive,
        workers: args.workers,
        skip_unreadable: !args.fail_unreadable,
        fail_fast: args.fail_fast,
    };
    config.validate()?;

    let registry = Arc::new(transforms::default_registry());

    if let Some(ref directory) = args.directory {
        if !directory.exists() {
            return Err(anyhow::anyhow!(
                "Directory does not exist: {}",
                directory.display()
            ));
        }
        if args.input.is_some() {
            warn!("Positional input is ignored when --directory is given");
        }

        let runner = BatchRunner::new(config, registry);
        let stats = runner.run(directory).await?;
        info!("{}", stats.format_summary());
        if stats.errors > 0 {
            anyhow::bail!("{} of {} files failed", stats.errors, stats.files_processed);
        }
        return Ok(());
    }

    // Single-file/stream mode. An explicit extension wins over
    // classification; an unrecognized token degrades to a verbatim copy.
    let media_type = match args.ext.as_deref() {
        Some(token) => match media_type::from_token(token) {
            Some(mt) => Some(mt.to_string()),
            None => {
                warn!("Unrecognized extension '{}', copying verbatim", token);
                Some(token.to_string())
            }
        },
        None => None,
    };

    let source = args.input.map(Endpoint::file).unwrap_or_else(Endpoint::stream);
    let destination = args.output.map(Endpoint::file).unwrap_or_else(Endpoint::stream);
    let job = Job::new(source, destination, media_type);

    let runner = JobRunner::new(registry);
    tokio::task::spawn_blocking(move || runner.run(&job)).await??;

    Ok(())
}
