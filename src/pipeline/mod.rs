//! # Pipeline Module
//!
//! Orchestration split into submodules:
//! - `job`: source/destination descriptors and the Job unit of work
//! - `runner`: per-job stream transformer
//! - `batch`: directory driver with bounded concurrency

pub mod batch;
pub mod job;
pub mod runner;

pub use batch::BatchRunner;
pub use job::{Endpoint, Job};
pub use runner::{JobOutcome, JobRunner};
