//! Scan-row operations.

use crate::error::{DatabaseError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Row, SqlitePool};

/// A persisted scan run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanRecord {
    /// Unique identifier for this scan
    pub id: String,
    /// Root directory the scan covered
    pub root_path: String,
    /// Current status
    pub status: ScanStatus,
    /// When the scan started
    pub start_time: DateTime<Utc>,
    /// When the scan completed, if finished
    pub end_time: Option<DateTime<Utc>>,
    /// Total wall-clock duration in milliseconds
    pub duration_ms: i64,
    /// Number of files scanned
    pub total_files: i64,
    /// Number of files with at least one finding
    pub pii_files: i64,
    /// Total findings persisted for this scan
    pub total_findings: i64,
}

/// Status of a persisted scan.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ScanStatus {
    /// Scan is currently in progress
    Running,
    /// Scan completed successfully
    Completed,
    /// Scan failed with an error
    Failed,
}

impl std::fmt::Display for ScanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Running => write!(f, "Running"),
            Self::Completed => write!(f, "Completed"),
            Self::Failed => write!(f, "Failed"),
        }
    }
}

impl ScanStatus {
    /// Parse from the stored string representation.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "Completed" => Self::Completed,
            "Failed" => Self::Failed,
            _ => Self::Running,
        }
    }
}

/// Create a new scan row in `Running` state.
///
/// # Errors
/// Returns `DatabaseError` if the insert fails.
pub async fn create_scan(pool: &SqlitePool, root_path: &str) -> Result<ScanRecord> {
    let id = uuid::Uuid::new_v4().to_string();
    let start_time = Utc::now();
    let status = ScanStatus::Running;

    sqlx::query(
        "INSERT INTO scans (id, root_path, status, start_time)
         VALUES (?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(root_path)
    .bind(status.to_string())
    .bind(start_time.to_rfc3339())
    .execute(pool)
    .await?;

    Ok(ScanRecord {
        id,
        root_path: root_path.to_string(),
        status,
        start_time,
        end_time: None,
        duration_ms: 0,
        total_files: 0,
        pii_files: 0,
        total_findings: 0,
    })
}

/// Mark a scan as completed and record its totals.
///
/// # Errors
/// Returns `DatabaseError::NotFound` if the scan does not exist.
pub async fn complete_scan(
    pool: &SqlitePool,
    scan_id: &str,
    total_files: i64,
    pii_files: i64,
    total_findings: i64,
) -> Result<()> {
    let scan = get_scan_by_id(pool, scan_id)
        .await?
        .ok_or(DatabaseError::NotFound)?;

    let end_time = Utc::now();
    let duration_ms = (end_time - scan.start_time).num_milliseconds();

    sqlx::query(
        "UPDATE scans
         SET status = ?, end_time = ?, duration_ms = ?, total_files = ?, pii_files = ?, total_findings = ?
         WHERE id = ?",
    )
    .bind(ScanStatus::Completed.to_string())
    .bind(end_time.to_rfc3339())
    .bind(duration_ms)
    .bind(total_files)
    .bind(pii_files)
    .bind(total_findings)
    .bind(scan_id)
    .execute(pool)
    .await?;

    Ok(())
}

/// All scans, newest first.
///
/// # Errors
/// Returns `DatabaseError` if the query fails.
pub async fn get_all_scans(pool: &SqlitePool) -> Result<Vec<ScanRecord>> {
    let rows = sqlx::query(
        "SELECT id, root_path, status, start_time, end_time, duration_ms,
                total_files, pii_files, total_findings
         FROM scans
         ORDER BY start_time DESC",
    )
    .fetch_all(pool)
    .await?;

    rows.iter().map(parse_scan_row).collect()
}

/// A single scan by id, or `None`.
///
/// # Errors
/// Returns `DatabaseError` if the query fails.
pub async fn get_scan_by_id(pool: &SqlitePool, scan_id: &str) -> Result<Option<ScanRecord>> {
    let row = sqlx::query(
        "SELECT id, root_path, status, start_time, end_time, duration_ms,
                total_files, pii_files, total_findings
         FROM scans
         WHERE id = ?",
    )
    .bind(scan_id)
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(parse_scan_row).transpose()
}

fn parse_scan_row(row: &sqlx::sqlite::SqliteRow) -> Result<ScanRecord> {
    let status_str: String = row.try_get("status")?;

    let start_time_str: String = row.try_get("start_time")?;
    let start_time = DateTime::parse_from_rfc3339(&start_time_str)
        .map_or_else(|_| Utc::now(), |dt| dt.with_timezone(&Utc));

    let end_time: Option<String> = row.try_get("end_time")?;
    let end_time = end_time.and_then(|s| {
        DateTime::parse_from_rfc3339(&s)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    });

    Ok(ScanRecord {
        id: row.try_get("id")?,
        root_path: row.try_get("root_path")?,
        status: ScanStatus::parse(&status_str),
        start_time,
        end_time,
        duration_ms: row.try_get("duration_ms")?,
        total_files: row.try_get("total_files")?,
        pii_files: row.try_get("pii_files")?,
        total_findings: row.try_get("total_findings")?,
    })
}
