//! Worker pool: tiered per-file scanning with classifier validation.

use crate::cancel::CancelToken;
use crate::whitelist::Whitelist;
use aegis_core::{Finding, Job, PiiKind, PiiMatch, ScanResult};
use aegis_extract::ExtractorFactory;
use aegis_llm::OllamaClient;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokio::fs::File;
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, warn};

/// At most this many candidate snippets are forwarded to the classifier
/// per file, to bound the prompt size.
const MAX_CONTEXT_SNIPPETS: usize = 50;

/// Shared state every worker needs to scan a file.
pub(crate) struct WorkerContext {
    pub factory: Arc<ExtractorFactory>,
    /// `None` when the classifier is disabled; raw matches are then
    /// emitted with 0.5 confidence.
    pub classifier: Option<Arc<OllamaClient>>,
    pub whitelist: Arc<Whitelist>,
}

/// One worker: receive jobs until the channel closes or the scan is
/// cancelled, scanning each file and pushing its result.
pub(crate) async fn worker_loop(
    id: usize,
    ctx: Arc<WorkerContext>,
    jobs: Arc<Mutex<mpsc::Receiver<Job>>>,
    results_tx: mpsc::Sender<ScanResult>,
    cancel: CancelToken,
) {
    loop {
        if cancel.is_cancelled() {
            debug!(worker = id, "worker stopping on cancellation");
            return;
        }

        let job = {
            let mut rx = jobs.lock().await;
            rx.recv().await
        };
        let Some(job) = job else {
            debug!(worker = id, "jobs channel closed, worker exiting");
            return;
        };

        // Run the scan in its own task so a panic is contained to this
        // file and the worker can pick up the next job.
        let path = job.path.clone();
        let result = match tokio::spawn(scan_file(ctx.clone(), job.path)).await {
            Ok(result) => result,
            Err(e) => {
                warn!(worker = id, "scan task failed for {}: {}", path.display(), e);
                let mut result = ScanResult::new(path);
                result.error = Some(format!("scan aborted: {e}"));
                result
            }
        };

        if results_tx.send(result).await.is_err() {
            return;
        }
    }
}

/// Tiered scan of a single file: stat, extension gate, extraction,
/// detector battery, then classifier validation (or the 0.5-confidence
/// fallback).
pub(crate) async fn scan_file(ctx: Arc<WorkerContext>, path: PathBuf) -> ScanResult {
    let started = Instant::now();
    let mut result = ScanResult::new(path.clone());

    let metadata = match tokio::fs::metadata(&path).await {
        Ok(m) => m,
        Err(e) => {
            result.error = Some(format!("failed to stat file: {e}"));
            return result;
        }
    };
    result.size = metadata.len() as i64;

    // The walker already filters rejected extensions; a rejection here
    // still produces a clean empty result, not an error.
    let (extractor, ext) = match ctx.factory.extractor_for(&path) {
        Ok(pair) => pair,
        Err(_) => return result,
    };
    result.file_type = ext;

    debug!("scanning {} ({})", path.display(), result.file_type);

    let mut file = match File::open(&path).await {
        Ok(f) => f,
        Err(e) => {
            result.error = Some(format!("failed to open file: {e}"));
            result.scan_duration_ms = started.elapsed().as_millis() as u64;
            return result;
        }
    };

    let matches = match extractor.scan(&mut file).await {
        Ok(matches) => matches,
        Err(e) => {
            result.error = Some(format!("scan failed: {e}"));
            result.scan_duration_ms = started.elapsed().as_millis() as u64;
            return result;
        }
    };

    if !matches.is_empty() {
        debug!("{}: {} candidate matches", path.display(), matches.len());

        match &ctx.classifier {
            Some(client) => classify_matches(&ctx, client, &path, &matches, &mut result).await,
            None => {
                result.findings = matches.iter().map(Finding::from_match).collect();
            }
        }
    }

    result.scan_duration_ms = started.elapsed().as_millis() as u64;
    result
}

/// Send the aggregated candidate context through the classifier.
///
/// On any classifier error the raw matches are kept as 0.5-confidence
/// findings so nothing is lost.
async fn classify_matches(
    ctx: &WorkerContext,
    client: &OllamaClient,
    path: &Path,
    matches: &[PiiMatch],
    result: &mut ScanResult,
) {
    let context = build_context(path, matches);
    let kinds = distinct_kinds(matches);

    match client.analyze_file(&context, &kinds).await {
        Ok(findings) => {
            for f in findings {
                if ctx.whitelist.contains(&f.value) {
                    debug!("whitelist: skipping known value {}", f.value);
                    continue;
                }

                result.findings.push(Finding {
                    kind: f.kind,
                    snippet: f.value,
                    confidence: f.confidence,
                    offset: 0,
                    context: f.reason,
                });
            }
        }
        Err(e) => {
            debug!(
                "classifier unavailable for {} ({}), keeping raw matches",
                path.display(),
                e
            );
            result.findings = matches.iter().map(Finding::from_match).collect();
        }
    }
}

/// The aggregated context sent to the classifier: filename header plus
/// up to [`MAX_CONTEXT_SNIPPETS`] candidate lines.
pub(crate) fn build_context(path: &Path, matches: &[PiiMatch]) -> String {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned());

    let mut context = format!("File: {file_name}\nPotential PII Context:\n");
    for m in matches.iter().take(MAX_CONTEXT_SNIPPETS) {
        context.push_str(&format!("- [{}] {}\n", m.kind, m.snippet));
    }
    context
}

/// Distinct candidate kinds in first-seen order, for per-kind prompt
/// blocks.
pub(crate) fn distinct_kinds(matches: &[PiiMatch]) -> Vec<PiiKind> {
    let mut kinds = Vec::new();
    for m in matches {
        if !kinds.contains(&m.kind) {
            kinds.push(m.kind);
        }
    }
    kinds
}

#[cfg(test)]
mod tests {
    use super::*;

    fn match_of(kind: PiiKind, snippet: &str) -> PiiMatch {
        PiiMatch {
            kind,
            value: snippet.to_string(),
            snippet: snippet.to_string(),
            offset: 0,
        }
    }

    #[test]
    fn test_build_context_header_and_lines() {
        let matches = vec![
            match_of(PiiKind::Iban, "DE89370400440532013000"),
            match_of(PiiKind::Email, "max@example.de"),
        ];

        let context = build_context(Path::new("/data/konto.txt"), &matches);
        assert!(context.starts_with("File: konto.txt\nPotential PII Context:\n"));
        assert!(context.contains("- [IBAN] DE89370400440532013000\n"));
        assert!(context.contains("- [Email] max@example.de\n"));
    }

    #[test]
    fn test_build_context_caps_snippets() {
        let matches: Vec<PiiMatch> = (0..80)
            .map(|i| match_of(PiiKind::Email, &format!("user{i}@example.org")))
            .collect();

        let context = build_context(Path::new("big.txt"), &matches);
        assert_eq!(context.matches("- [Email]").count(), MAX_CONTEXT_SNIPPETS);
    }

    #[test]
    fn test_distinct_kinds_preserves_order() {
        let matches = vec![
            match_of(PiiKind::Email, "a@b.de"),
            match_of(PiiKind::Iban, "DE89370400440532013000"),
            match_of(PiiKind::Email, "c@d.de"),
        ];

        assert_eq!(
            distinct_kinds(&matches),
            vec![PiiKind::Email, PiiKind::Iban]
        );
    }
}
