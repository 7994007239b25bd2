//! Configuration for the Aegis scanner.
//!
//! Defaults are hard-coded; an optional `aegis.toml` in the working
//! directory and `AEGIS_*` environment variables override them, and CLI
//! flags override both.

use crate::error::ConfigResult;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "aegis.toml";

/// Main application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Scan behavior settings
    pub scan: ScanConfig,
    /// LLM classifier settings
    pub classifier: ClassifierConfig,
    /// Whitelist and finding-store paths
    pub storage: StorageConfig,
}

impl AppConfig {
    /// Load configuration from `aegis.toml`, falling back to defaults if
    /// the file does not exist.
    ///
    /// # Errors
    /// Returns error if the file exists but cannot be read or parsed.
    pub fn load() -> ConfigResult<Self> {
        Self::load_from(Path::new(CONFIG_FILE))
    }

    /// Load configuration from a specific path, falling back to defaults.
    ///
    /// # Errors
    /// Returns error if the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        if path.exists() {
            tracing::debug!("Loading config from {}", path.display());
            let contents = fs::read_to_string(path)?;
            let config = toml::from_str(&contents)?;
            Ok(config)
        } else {
            tracing::debug!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration with environment variable overrides.
    ///
    /// Supports the following environment variables:
    /// - `AEGIS_CLASSIFIER_URL`: Override the classifier endpoint
    /// - `AEGIS_CLASSIFIER_MODEL`: Override the classifier model name
    /// - `AEGIS_CLASSIFIER_ENABLED`: Override classifier enablement (true/false)
    pub fn load_with_env() -> ConfigResult<Self> {
        let mut config = Self::load()?;
        config.apply_env();
        Ok(config)
    }

    /// Apply `AEGIS_*` environment overrides to an already-loaded config.
    pub fn apply_env(&mut self) {
        if let Ok(val) = std::env::var("AEGIS_CLASSIFIER_URL") {
            if !val.is_empty() {
                tracing::debug!("Override classifier.url from env: {}", val);
                self.classifier.url = val;
            }
        }

        if let Ok(val) = std::env::var("AEGIS_CLASSIFIER_MODEL") {
            if !val.is_empty() {
                tracing::debug!("Override classifier.model from env: {}", val);
                self.classifier.model = val;
            }
        }

        if let Ok(val) = std::env::var("AEGIS_CLASSIFIER_ENABLED") {
            if let Ok(enabled) = val.parse() {
                tracing::debug!("Override classifier.enabled from env: {}", enabled);
                self.classifier.enabled = enabled;
            }
        }
    }

    /// Effective worker count: the configured value, or `2 × logical CPUs`
    /// when set to 0 (auto).
    #[must_use]
    pub fn worker_count(&self) -> usize {
        if self.scan.workers > 0 {
            self.scan.workers
        } else {
            num_cpus::get().saturating_mul(2).max(1)
        }
    }
}

/// Scan behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Root directory to scan
    pub root_path: PathBuf,
    /// Number of concurrent workers (0 = auto: 2 × logical CPUs)
    pub workers: usize,
    /// Skip files larger than 1 MiB
    pub fast_mode: bool,
    /// Warn when a PDF must be buffered past this size
    pub pdf_buffer_warn_bytes: u64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            root_path: PathBuf::from("."),
            workers: 0,
            fast_mode: false,
            pdf_buffer_warn_bytes: 32 * 1024 * 1024,
        }
    }
}

/// LLM classifier settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Whether the second-stage classifier is consulted at all
    pub enabled: bool,
    /// Generate endpoint of the Ollama-compatible server
    pub url: String,
    /// Model name sent with every request
    pub model: String,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            url: "http://localhost:11434/api/generate".to_string(),
            model: "llama3.2".to_string(),
        }
    }
}

/// Whitelist and finding-store paths.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Line-delimited file of suppressed exact values
    pub whitelist_path: PathBuf,
    /// SQLite database for persisted scans and findings
    pub db_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            whitelist_path: PathBuf::from("whitelist.txt"),
            db_path: PathBuf::from("gdpr-scan-results.db"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.scan.root_path, PathBuf::from("."));
        assert_eq!(config.scan.workers, 0);
        assert!(!config.scan.fast_mode);
        assert!(config.classifier.enabled);
        assert_eq!(config.classifier.url, "http://localhost:11434/api/generate");
        assert_eq!(config.classifier.model, "llama3.2");
        assert_eq!(config.storage.whitelist_path, PathBuf::from("whitelist.txt"));
        assert_eq!(config.storage.db_path, PathBuf::from("gdpr-scan-results.db"));
    }

    #[test]
    fn test_worker_count_auto() {
        let config = AppConfig::default();
        assert_eq!(config.worker_count(), num_cpus::get() * 2);

        let mut config = AppConfig::default();
        config.scan.workers = 3;
        assert_eq!(config.worker_count(), 3);
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r#"
[scan]
workers = 8
fast_mode = true

[classifier]
model = "llama3.1:8b"
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse partial config");
        assert_eq!(config.scan.workers, 8);
        assert!(config.scan.fast_mode);
        assert_eq!(config.classifier.model, "llama3.1:8b");
        // These should be defaults
        assert!(config.classifier.enabled);
        assert_eq!(config.storage.db_path, PathBuf::from("gdpr-scan-results.db"));
    }

    #[test]
    fn test_load_from_missing_file_uses_defaults() {
        let tmp = tempfile::TempDir::new().expect("create temp dir");
        let config =
            AppConfig::load_from(&tmp.path().join("does-not-exist.toml")).expect("load config");
        assert_eq!(config.classifier.model, "llama3.2");
    }

    #[test]
    fn test_load_from_file() {
        let tmp = tempfile::TempDir::new().expect("create temp dir");
        let path = tmp.path().join("aegis.toml");
        fs::write(&path, "[storage]\nwhitelist_path = \"allow.txt\"\n").expect("write config");

        let config = AppConfig::load_from(&path).expect("load config");
        assert_eq!(config.storage.whitelist_path, PathBuf::from("allow.txt"));
    }

    #[test]
    fn test_env_overrides() {
        std::env::set_var("AEGIS_CLASSIFIER_URL", "http://10.0.0.5:11434/api/generate");
        std::env::set_var("AEGIS_CLASSIFIER_ENABLED", "false");

        let mut config = AppConfig::default();
        config.apply_env();

        assert_eq!(config.classifier.url, "http://10.0.0.5:11434/api/generate");
        assert!(!config.classifier.enabled);

        std::env::remove_var("AEGIS_CLASSIFIER_URL");
        std::env::remove_var("AEGIS_CLASSIFIER_ENABLED");
    }

    #[test]
    fn test_config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("[scan]"));
        assert!(toml_str.contains("[classifier]"));
        assert!(toml_str.contains("[storage]"));

        let parsed: AppConfig = toml::from_str(&toml_str).expect("parse serialized config");
        assert_eq!(parsed.classifier.model, config.classifier.model);
    }
}
