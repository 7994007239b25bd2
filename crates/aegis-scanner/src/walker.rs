//! Recursive directory traversal feeding the jobs channel.

use crate::cancel::CancelToken;
use aegis_core::Job;
use aegis_extract::ExtractorFactory;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::Arc;
use tokio::fs;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Files larger than this are skipped in fast mode.
const FAST_MODE_MAX_SIZE: u64 = 1024 * 1024;

/// Walk the tree under `root`, emitting a job for every scannable file.
///
/// Rejected extensions are skipped silently, unreadable directories are
/// logged and traversal continues. The jobs channel closes when this
/// task returns and drops the sender.
pub(crate) async fn walk_files(
    root: PathBuf,
    factory: Arc<ExtractorFactory>,
    fast_mode: bool,
    jobs_tx: mpsc::Sender<Job>,
    cancel: CancelToken,
) {
    debug!(root = %root.display(), "walker started");
    walk_dir(&root, &factory, fast_mode, &jobs_tx, &cancel).await;
    debug!("walker finished");
}

/// Recurse into one directory. Returns `false` when traversal should
/// stop entirely (cancellation, or all workers gone).
fn walk_dir<'a>(
    dir: &'a Path,
    factory: &'a ExtractorFactory,
    fast_mode: bool,
    jobs_tx: &'a mpsc::Sender<Job>,
    cancel: &'a CancelToken,
) -> Pin<Box<dyn Future<Output = bool> + Send + 'a>> {
    Box::pin(async move {
        if cancel.is_cancelled() {
            return false;
        }

        let mut entries = match fs::read_dir(dir).await {
            Ok(entries) => entries,
            Err(e) => {
                warn!("failed to read directory {}: {}", dir.display(), e);
                return true;
            }
        };

        while let Ok(Some(entry)) = entries.next_entry().await {
            if cancel.is_cancelled() {
                return false;
            }

            let path = entry.path();

            let metadata = match entry.metadata().await {
                Ok(m) => m,
                Err(e) => {
                    debug!("failed to read metadata for {}: {}", path.display(), e);
                    continue;
                }
            };

            // Symlinks would allow loops and escapes from the root.
            if metadata.is_symlink() {
                debug!("skipping symlink: {}", path.display());
                continue;
            }

            if metadata.is_dir() {
                if !walk_dir(&path, factory, fast_mode, jobs_tx, cancel).await {
                    return false;
                }
            } else if metadata.is_file() {
                let ext = ExtractorFactory::extension_of(&path);
                if !factory.is_supported(&ext) {
                    continue;
                }

                if fast_mode && metadata.len() > FAST_MODE_MAX_SIZE {
                    debug!("fast mode: skipping large file {}", path.display());
                    continue;
                }

                // A send error means every worker is gone; stop walking.
                if jobs_tx.send(Job { path }).await.is_err() {
                    return false;
                }
            }
        }

        true
    })
}
