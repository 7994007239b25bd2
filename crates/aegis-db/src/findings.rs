//! Finding-row operations.

use crate::error::{DatabaseError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Row, SqlitePool};

/// Accepted reviewer feedback values.
const FEEDBACK_VALUES: &[&str] = &["Correct", "Incorrect"];

/// A persisted finding, one row per `save_finding` call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FindingRecord {
    /// Unique identifier for this finding
    pub id: String,
    /// Scan this finding belongs to
    pub scan_id: String,
    /// File the finding was made in
    pub file_path: String,
    /// Canonical kind or free-form classifier label
    pub kind: String,
    /// Snippet or exact value
    pub value: String,
    /// Confidence in `[0, 1]`
    pub confidence: f64,
    /// Classifier reason, empty for raw-fallback findings
    pub reason: String,
    /// Reviewer feedback: empty, "Correct" or "Incorrect"
    pub feedback: String,
    /// When this row was written
    pub created_at: DateTime<Utc>,
}

/// Persist a single finding.
///
/// # Errors
/// Returns `DatabaseError` if the insert fails.
pub async fn save_finding(
    pool: &SqlitePool,
    scan_id: &str,
    file_path: &str,
    kind: &str,
    value: &str,
    reason: &str,
    confidence: f64,
) -> Result<FindingRecord> {
    let id = uuid::Uuid::new_v4().to_string();
    let created_at = Utc::now();

    sqlx::query(
        "INSERT INTO findings (id, scan_id, file_path, kind, value, confidence, reason, feedback, created_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, '', ?)",
    )
    .bind(&id)
    .bind(scan_id)
    .bind(file_path)
    .bind(kind)
    .bind(value)
    .bind(confidence)
    .bind(reason)
    .bind(created_at.to_rfc3339())
    .execute(pool)
    .await?;

    Ok(FindingRecord {
        id,
        scan_id: scan_id.to_string(),
        file_path: file_path.to_string(),
        kind: kind.to_string(),
        value: value.to_string(),
        confidence,
        reason: reason.to_string(),
        feedback: String::new(),
        created_at,
    })
}

/// All findings for a scan, in insertion order.
///
/// # Errors
/// Returns `DatabaseError` if the query fails.
pub async fn get_by_scan(pool: &SqlitePool, scan_id: &str) -> Result<Vec<FindingRecord>> {
    let rows = sqlx::query(
        "SELECT id, scan_id, file_path, kind, value, confidence, reason, feedback, created_at
         FROM findings
         WHERE scan_id = ?
         ORDER BY created_at",
    )
    .bind(scan_id)
    .fetch_all(pool)
    .await?;

    rows.iter()
        .map(|row| {
            let created_at_str: String = row.try_get("created_at")?;
            let created_at = DateTime::parse_from_rfc3339(&created_at_str)
                .map_or_else(|_| Utc::now(), |dt| dt.with_timezone(&Utc));

            Ok(FindingRecord {
                id: row.try_get("id")?,
                scan_id: row.try_get("scan_id")?,
                file_path: row.try_get("file_path")?,
                kind: row.try_get("kind")?,
                value: row.try_get("value")?,
                confidence: row.try_get("confidence")?,
                reason: row.try_get("reason")?,
                feedback: row.try_get("feedback")?,
                created_at,
            })
        })
        .collect()
}

/// Record reviewer feedback on a finding.
///
/// # Errors
/// Returns `DatabaseError::InvalidFeedback` for values outside
/// `{"Correct", "Incorrect"}` and `DatabaseError::NotFound` for an
/// unknown finding id.
pub async fn update_feedback(pool: &SqlitePool, finding_id: &str, feedback: &str) -> Result<()> {
    if !FEEDBACK_VALUES.contains(&feedback) {
        return Err(DatabaseError::InvalidFeedback(feedback.to_string()));
    }

    let result = sqlx::query("UPDATE findings SET feedback = ? WHERE id = ?")
        .bind(feedback)
        .bind(finding_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{scans, ScanStore};

    async fn store_with_scan() -> (ScanStore, String) {
        let store = ScanStore::open_in_memory().await.expect("open store");
        let scan = scans::create_scan(store.pool(), "/data")
            .await
            .expect("create scan");
        (store, scan.id)
    }

    #[tokio::test]
    async fn test_save_and_load_finding() {
        let (store, scan_id) = store_with_scan().await;

        let finding = save_finding(
            store.pool(),
            &scan_id,
            "/data/konto.txt",
            "IBAN",
            "DE89370400440532013000",
            "Valid German IBAN",
            0.95,
        )
        .await
        .expect("save finding");

        assert_eq!(finding.kind, "IBAN");
        assert!(finding.feedback.is_empty());

        let loaded = get_by_scan(store.pool(), &scan_id)
            .await
            .expect("get findings");
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].value, "DE89370400440532013000");
        assert_eq!(loaded[0].confidence, 0.95);
    }

    #[tokio::test]
    async fn test_update_feedback() {
        let (store, scan_id) = store_with_scan().await;

        let finding = save_finding(store.pool(), &scan_id, "/f.txt", "Email", "a@b.de", "", 0.5)
            .await
            .expect("save finding");

        update_feedback(store.pool(), &finding.id, "Correct")
            .await
            .expect("update feedback");

        let loaded = get_by_scan(store.pool(), &scan_id)
            .await
            .expect("get findings");
        assert_eq!(loaded[0].feedback, "Correct");
    }

    #[tokio::test]
    async fn test_update_feedback_rejects_unknown_values() {
        let (store, scan_id) = store_with_scan().await;

        let finding = save_finding(store.pool(), &scan_id, "/f.txt", "Email", "a@b.de", "", 0.5)
            .await
            .expect("save finding");

        let result = update_feedback(store.pool(), &finding.id, "Maybe").await;
        assert!(matches!(result, Err(DatabaseError::InvalidFeedback(_))));
    }

    #[tokio::test]
    async fn test_update_feedback_missing_finding() {
        let (store, _) = store_with_scan().await;

        let result = update_feedback(store.pool(), "no-such-id", "Incorrect").await;
        assert!(matches!(result, Err(DatabaseError::NotFound)));
    }

    #[tokio::test]
    async fn test_free_form_kind_accepted() {
        // Classifier labels are not restricted to the canonical kinds.
        let (store, scan_id) = store_with_scan().await;

        save_finding(store.pool(), &scan_id, "/f.txt", "Unknown", "raw text", "", 0.8)
            .await
            .expect("save finding");

        let loaded = get_by_scan(store.pool(), &scan_id)
            .await
            .expect("get findings");
        assert_eq!(loaded[0].kind, "Unknown");
    }
}
