//! # Configuration Management Module
//!
//! Run configuration for the pipeline.
//!
//! ## Parameters:
//! - `ext_override`: extension token forcing a media type (`-x`, default: None)
//! - `recursive`: traverse subdirectories in directory mode (default: false)
//! - `workers`: parallel workers in directory mode (default: 4)
//! - `skip_unreadable`: unreadable directories yield an empty enumeration
//!   instead of an error (default: true, the historical behavior)
//! - `fail_fast`: abort directory mode on the first failed file instead of
//!   reporting and continuing (default: false)
//!
//! Supports JSON load/save for programmatic callers.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for a minification run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Extension token overriding media type detection (css, html, js,
    /// json, svg or xml)
    pub ext_override: Option<String>,
    /// Traverse subdirectories in directory mode
    pub recursive: bool,
    /// Number of parallel workers in directory mode
    pub workers: usize,
    /// Skip unreadable directories instead of failing the run
    pub skip_unreadable: bool,
    /// Abort directory mode on the first failed file
    pub fail_fast: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ext_override: None,
            recursive: false,
            workers: 4,
            skip_unreadable: true,
            fail_fast: false,
        }
    }
}

impl Config {
    /// Validate configuration parameters
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(anyhow::anyhow!("Number of workers must be greater than 0"));
        }
        Ok(())
    }

    /// Load configuration from file
    pub async fn from_file(path: &PathBuf) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = tokio::fs::read_to_string(path).await?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub async fn save_to_file(&self, path: &PathBuf) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, content).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.workers = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.ext_override, None);
        assert!(!config.recursive);
        assert_eq!(config.workers, 4);
        assert!(config.skip_unreadable);
        assert!(!config.fail_fast);
    }

    #[tokio::test]
    async fn test_config_save_load() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");

        let original_config = Config {
            ext_override: Some("css".to_string()),
            recursive: true,
            workers: 8,
            skip_unreadable: false,
            fail_fast: true,
        };

        // Save config
        original_config.save_to_file(&config_path).await.unwrap();

        // Load config
        let loaded_config = Config::from_file(&config_path).await.unwrap();

        assert_eq!(loaded_config.ext_override, Some("css".to_string()));
        assert!(loaded_config.recursive);
        assert_eq!(loaded_config.workers, 8);
        assert!(!loaded_config.skip_unreadable);
        assert!(loaded_config.fail_fast);
    }

    #[tokio::test]
    async fn test_config_missing_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("absent.json");

        let config = Config::from_file(&config_path).await.unwrap();
        assert_eq!(config.workers, 4);
    }
}
