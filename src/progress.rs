//! # Progress Tracking and Statistics Module
//!
//! Visual progress bar (batch mode) and the aggregate counters a run
//! reports at the end.
//!
//! ## Statistics tracked:
//! - **files_processed**: total files handled
//! - **files_minified**: files a registered transform produced output for
//! - **files_copied**: files passed through verbatim (no transform)
//! - **errors**: jobs that failed
//! - **bytes_in / bytes_out**: aggregate sizes, for the reduction figure

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Manages the batch-mode progress bar
#[derive(Clone)]
pub struct ProgressManager {
    bar: ProgressBar,
}

impl ProgressManager {
    /// Create a new progress manager
    pub fn new(total_files: u64) -> Self {
        let bar = ProgressBar::new(total_files);

        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
                .unwrap()
                .progress_chars("=>-"),
        );

        bar.enable_steady_tick(Duration::from_millis(100));

        Self { bar }
    }

    /// Update progress with a message
    pub fn update(&self, message: &str) {
        self.bar.inc(1);
        self.bar.set_message(message.to_string());
    }

    /// Finish with a final message
    pub fn finish(&self, message: &str) {
        self.bar.finish_with_message(message.to_string());
    }
}

/// Aggregate counters for one batch run
#[derive(Debug, Default)]
pub struct RunStats {
    pub files_processed: usize,
    pub files_minified: usize,
    pub files_copied: usize,
    pub errors: usize,
    pub bytes_in: u64,
    pub bytes_out: u64,
}

impl RunStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_minified(&mut self, bytes_in: u64, bytes_out: u64) {
        self.files_processed += 1;
        self.files_minified += 1;
        self.bytes_in += bytes_in;
        self.bytes_out += bytes_out;
    }

    pub fn add_copied(&mut self, bytes: u64) {
        self.files_processed += 1;
        self.files_copied += 1;
        self.bytes_in += bytes;
        self.bytes_out += bytes;
    }

    pub fn add_error(&mut self) {
        self.files_processed += 1;
        self.errors += 1;
    }

    pub fn reduction_percent(&self) -> f64 {
        calculate_reduction(self.bytes_in, self.bytes_out)
    }

    pub fn format_summary(&self) -> String {
        format!(
            "Processed: {} files | Minified: {} | Copied: {} | Errors: {} | {} -> {} ({:.2}% smaller)",
            self.files_processed,
            self.files_minified,
            self.files_copied,
            self.errors,
            format_size(self.bytes_in),
            format_size(self.bytes_out),
            self.reduction_percent()
        )
    }
}

/// Get human-readable file size
pub fn format_size(size: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    let mut size = size as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", size as u64, UNITS[unit_index])
    } else {
        format!("{:.2} {}", size, UNITS[unit_index])
    }
}

/// Calculate percentage reduction
pub fn calculate_reduction(original_size: u64, new_size: u64) -> f64 {
    if original_size == 0 {
        0.0
    } else {
        ((original_size as f64 - new_size as f64) / original_size as f64) * 100.0
    }
}
