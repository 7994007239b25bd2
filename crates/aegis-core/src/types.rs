//! Shared types used across the Aegis scanning pipeline.
//!
//! The pipeline distinguishes between a [`PiiMatch`] (a raw detector hit,
//! alive only for the duration of a single file scan) and a [`Finding`]
//! (a validated, confidence-scored occurrence that ends up in the report).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// The closed set of PII categories the detector battery can emit.
///
/// Classifier responses are not restricted to this set; free-form labels
/// are carried through [`Finding::kind`] as plain strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PiiKind {
    /// International bank account number (MOD-97 validated)
    #[serde(rename = "IBAN")]
    Iban,
    /// Payment card number (Luhn validated)
    CreditCard,
    /// Email address
    Email,
    /// Phone number in international or 00-prefixed form
    Phone,
    /// Capitalized person-name heuristic
    Name,
    /// Identity/contact keyword context (name, address, birthdate labels)
    Identity,
    /// Financial keyword context (account, tax id, card labels)
    Financial,
    /// Official document keyword context (passport, SSN, insurance labels)
    #[serde(rename = "OfficialID")]
    OfficialId,
    /// GDPR Article 9 special-category keyword context
    Sensitive,
}

impl PiiKind {
    /// Canonical label used in reports, prompts and the finding store.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Iban => "IBAN",
            Self::CreditCard => "CreditCard",
            Self::Email => "Email",
            Self::Phone => "Phone",
            Self::Name => "Name",
            Self::Identity => "Identity",
            Self::Financial => "Financial",
            Self::OfficialId => "OfficialID",
            Self::Sensitive => "Sensitive",
        }
    }
}

impl fmt::Display for PiiKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A raw detector hit inside a single text segment.
///
/// `offset` is a file-relative byte position for plain-text scans, a
/// 1-based row index for spreadsheets and a 1-based page index for PDFs.
#[derive(Debug, Clone, PartialEq)]
pub struct PiiMatch {
    /// Detector that produced the match
    pub kind: PiiKind,
    /// The exact matched text
    pub value: String,
    /// The match framed by up to 20 bytes of surrounding context
    pub snippet: String,
    /// Position of the match (byte offset, row index or page index)
    pub offset: i64,
}

/// A validated PII occurrence reported to the user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding {
    /// Canonical [`PiiKind`] label or a free-form classifier label
    #[serde(rename = "type")]
    pub kind: String,
    /// Snippet or exact value for verification
    pub snippet: String,
    /// Confidence in `[0, 1]`
    pub confidence: f64,
    /// Position of the match (byte offset, row index or page index)
    pub offset: i64,
    /// Classifier reason, empty when the finding came from the raw fallback
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub context: String,
}

impl Finding {
    /// Build a 0.5-confidence finding from a raw detector match.
    ///
    /// Used when the classifier is disabled or unreachable.
    #[must_use]
    pub fn from_match(m: &PiiMatch) -> Self {
        Self {
            kind: m.kind.as_str().to_string(),
            snippet: m.snippet.clone(),
            confidence: 0.5,
            offset: m.offset,
            context: String::new(),
        }
    }
}

/// The outcome of scanning a single file.
///
/// Emitted for every opened file, including empty-finding and error
/// results, so the summary counts all attempted files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanResult {
    /// Path of the scanned file
    pub file_path: PathBuf,
    /// Lowercased file extension the factory dispatched on
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub file_type: String,
    /// File size in bytes from the initial stat
    pub size: i64,
    /// Validated findings, empty when nothing was found
    pub findings: Vec<Finding>,
    /// File-level failure (open, extraction), if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Wall-clock time spent scanning this file
    pub scan_duration_ms: u64,
    /// When the scan of this file started
    pub timestamp: DateTime<Utc>,
}

impl ScanResult {
    /// Create an empty result for the given path, stamped with the current time.
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self {
            file_path: path,
            file_type: String::new(),
            size: 0,
            findings: Vec::new(),
            error: None,
            scan_duration_ms: 0,
            timestamp: Utc::now(),
        }
    }

    /// Whether this result carries at least one finding.
    #[must_use]
    pub fn has_findings(&self) -> bool {
        !self.findings.is_empty()
    }
}

/// Running totals for a scan, finalized exactly once when the results
/// channel closes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Summary {
    /// Root directory the scan started from
    pub root_path: PathBuf,
    /// Number of files a result was emitted for
    pub total_files_scanned: i64,
    /// Number of files with at least one finding
    pub total_files_with_pii: i64,
    /// Total findings across all files
    pub total_pii_found: i64,
    /// When the scan started
    pub start_time: DateTime<Utc>,
    /// When the scan finished
    pub end_time: DateTime<Utc>,
    /// Total wall-clock duration
    pub scan_duration_ms: u64,
}

impl Summary {
    /// Create a summary for a scan that starts now.
    #[must_use]
    pub fn new(root_path: PathBuf) -> Self {
        let now = Utc::now();
        Self {
            root_path,
            total_files_scanned: 0,
            total_files_with_pii: 0,
            total_pii_found: 0,
            start_time: now,
            end_time: now,
            scan_duration_ms: 0,
        }
    }
}

/// A file queued for scanning by a worker.
#[derive(Debug, Clone)]
pub struct Job {
    /// Absolute or root-relative path of the file to scan
    pub path: PathBuf,
}
