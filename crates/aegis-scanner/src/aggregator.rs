//! Single-consumer result aggregation.

use aegis_core::ScanResult;
use aegis_db::{findings, scans, ScanStore};
use aegis_report::Report;
use std::sync::{Arc, Mutex};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

/// Consume results until the channel closes, updating the report and
/// persisting findings. Store errors are logged and never block the
/// pipeline. Signals `done_tx` after the summary is finalized.
pub(crate) async fn process_results(
    mut results_rx: mpsc::Receiver<ScanResult>,
    report: Arc<Mutex<Report>>,
    store: Option<ScanStore>,
    scan_id: Option<String>,
    done_tx: oneshot::Sender<()>,
) {
    while let Some(result) = results_rx.recv().await {
        if let Some(error) = &result.error {
            debug!("{}: {}", result.file_path.display(), error);
        } else if result.has_findings() {
            info!(
                "[FOUND] {}: {} potential PII matches",
                result.file_path.display(),
                result.findings.len()
            );
        }

        if let (Some(store), Some(scan_id)) = (&store, &scan_id) {
            let file_path = result.file_path.to_string_lossy();
            for finding in &result.findings {
                if let Err(e) = findings::save_finding(
                    store.pool(),
                    scan_id,
                    &file_path,
                    &finding.kind,
                    &finding.snippet,
                    &finding.context,
                    finding.confidence,
                )
                .await
                {
                    warn!("failed to persist finding: {e}");
                }
            }
        }

        let mut report = report.lock().unwrap_or_else(|e| e.into_inner());
        report.add_result(result);
    }

    let (total_files, pii_files, total_findings) = {
        let mut report = report.lock().unwrap_or_else(|e| e.into_inner());
        report.finalize();
        (
            report.summary.total_files_scanned,
            report.summary.total_files_with_pii,
            report.summary.total_pii_found,
        )
    };

    if let (Some(store), Some(scan_id)) = (&store, &scan_id) {
        if let Err(e) =
            scans::complete_scan(store.pool(), scan_id, total_files, pii_files, total_findings)
                .await
        {
            warn!("failed to mark scan completed: {e}");
        }
    }

    let _ = done_tx.send(());
}
