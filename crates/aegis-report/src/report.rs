//! The in-memory report: running summary plus per-file results.

use aegis_core::{ScanResult, Summary};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors while writing a report to disk.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Serialization failed
    #[error("failed to encode report: {0}")]
    Json(#[from] serde_json::Error),

    /// Write failed
    #[error("failed to write report: {0}")]
    Io(#[from] std::io::Error),
}

/// Aggregated outcome of one scan run.
///
/// Every attempted file increments `total_files_scanned`; only results
/// with findings are kept in `findings`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Running totals
    pub summary: Summary,
    /// Results with at least one finding
    pub findings: Vec<ScanResult>,
}

impl Report {
    /// Create an empty report for a scan starting now.
    #[must_use]
    pub fn new(root_path: PathBuf) -> Self {
        Self {
            summary: Summary::new(root_path),
            findings: Vec::new(),
        }
    }

    /// Record one per-file result.
    ///
    /// Counts every result toward `total_files_scanned`; results with
    /// findings also bump the PII counters and are retained.
    pub fn add_result(&mut self, result: ScanResult) {
        self.summary.total_files_scanned += 1;

        if result.has_findings() {
            self.summary.total_files_with_pii += 1;
            self.summary.total_pii_found += result.findings.len() as i64;
            self.findings.push(result);
        }
    }

    /// Stamp the end time and total duration. Called exactly once, when
    /// the results channel closes.
    pub fn finalize(&mut self) {
        self.summary.end_time = Utc::now();
        self.summary.scan_duration_ms = (self.summary.end_time - self.summary.start_time)
            .num_milliseconds()
            .max(0) as u64;
    }

    /// Render the report as indented JSON.
    ///
    /// # Errors
    /// Returns error if serialization fails.
    pub fn to_json(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the indented JSON report to a file.
    ///
    /// # Errors
    /// Returns error if serialization or the write fails.
    pub fn save_json(&self, path: &Path) -> Result<(), ReportError> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Write the self-contained HTML report to a file.
    ///
    /// # Errors
    /// Returns error if the write fails.
    pub fn save_html(&self, path: &Path) -> Result<(), ReportError> {
        fs::write(path, crate::render_html(self))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aegis_core::Finding;

    fn result_with_findings(path: &str, count: usize) -> ScanResult {
        let mut res = ScanResult::new(PathBuf::from(path));
        for i in 0..count {
            res.findings.push(Finding {
                kind: "Email".to_string(),
                snippet: format!("user{i}@example.org"),
                confidence: 0.5,
                offset: i as i64,
                context: String::new(),
            });
        }
        res
    }

    #[test]
    fn test_counting_invariants() {
        let mut report = Report::new(PathBuf::from("/data"));

        report.add_result(result_with_findings("/data/a.txt", 2));
        report.add_result(result_with_findings("/data/b.txt", 0));
        report.add_result(result_with_findings("/data/c.txt", 3));

        let mut error_result = ScanResult::new(PathBuf::from("/data/d.txt"));
        error_result.error = Some("failed to open file".to_string());
        report.add_result(error_result);

        assert_eq!(report.summary.total_files_scanned, 4);
        assert_eq!(report.summary.total_files_with_pii, 2);
        assert_eq!(report.summary.total_pii_found, 5);
        // Only results with findings are retained.
        assert_eq!(report.findings.len(), 2);
        assert!(report.summary.total_files_with_pii <= report.summary.total_files_scanned);
    }

    #[test]
    fn test_finalize_stamps_duration() {
        let mut report = Report::new(PathBuf::from("/data"));
        report.finalize();
        assert!(report.summary.end_time >= report.summary.start_time);
    }

    #[test]
    fn test_json_structure() {
        let mut report = Report::new(PathBuf::from("/data"));
        report.add_result(result_with_findings("/data/a.txt", 1));
        report.finalize();

        let json = report.to_json().expect("encode report");
        let parsed: serde_json::Value = serde_json::from_str(&json).expect("valid JSON");

        assert!(parsed.get("summary").is_some());
        assert_eq!(parsed["summary"]["total_files_scanned"], 1);
        assert_eq!(parsed["findings"][0]["findings"][0]["type"], "Email");
    }

    #[test]
    fn test_save_json_writes_file() {
        let tmp = tempfile::TempDir::new().expect("create temp dir");
        let path = tmp.path().join("report.json");

        let report = Report::new(PathBuf::from("/data"));
        report.save_json(&path).expect("save report");

        let contents = fs::read_to_string(&path).expect("read report");
        assert!(contents.contains("total_files_scanned"));
    }
}
