//! Core types for the Aegis GDPR scanner.
//!
//! This crate holds the data model shared by every stage of the scanning
//! pipeline (detector matches, classified findings, per-file results and
//! run summaries), the application configuration, and the central error
//! types.

pub mod config;
pub mod error;
pub mod types;

pub use config::{AppConfig, ClassifierConfig, ScanConfig, StorageConfig};
pub use error::{ConfigError, ConfigResult};
pub use types::{Finding, Job, PiiKind, PiiMatch, ScanResult, Summary};
