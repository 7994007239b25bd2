//! The coordinator: owns channels, tasks and cancellation.

use crate::aggregator::process_results;
use crate::cancel::CancelToken;
use crate::error::Result;
use crate::walker::walk_files;
use crate::whitelist::Whitelist;
use crate::worker::{worker_loop, WorkerContext};
use aegis_core::AppConfig;
use aegis_db::{scans, ScanStore};
use aegis_extract::ExtractorFactory;
use aegis_llm::OllamaClient;
use aegis_report::Report;
use std::sync::{Arc, Mutex};
use tokio::sync::{mpsc, oneshot, Mutex as AsyncMutex};
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Orchestrates one scan: walker, N workers and the aggregator over two
/// bounded channels sized `4 × workers`.
pub struct Scanner {
    config: AppConfig,
    whitelist: Arc<Whitelist>,
    report: Arc<Mutex<Report>>,
    classifier: Option<Arc<OllamaClient>>,
    store: Option<ScanStore>,
    scan_id: Option<String>,
    cancel: CancelToken,
    walker: Option<JoinHandle<()>>,
    workers: Vec<JoinHandle<()>>,
    done_rx: Option<oneshot::Receiver<()>>,
}

impl Scanner {
    /// Build a scanner from the configuration.
    ///
    /// The whitelist is loaded from the configured path; a load failure
    /// is logged and an empty whitelist is used instead.
    ///
    /// # Errors
    /// Returns error if the classifier client cannot be constructed.
    pub fn new(config: AppConfig) -> Result<Self> {
        let whitelist = match Whitelist::load(&config.storage.whitelist_path) {
            Ok(wl) => wl,
            Err(e) => {
                warn!(
                    "could not load whitelist from {}: {}, continuing with empty set",
                    config.storage.whitelist_path.display(),
                    e
                );
                Whitelist::default()
            }
        };

        let classifier = if config.classifier.enabled {
            Some(Arc::new(OllamaClient::new(
                &config.classifier.url,
                &config.classifier.model,
            )?))
        } else {
            None
        };

        let report = Report::new(config.scan.root_path.clone());

        Ok(Self {
            config,
            whitelist: Arc::new(whitelist),
            report: Arc::new(Mutex::new(report)),
            classifier,
            store: None,
            scan_id: None,
            cancel: CancelToken::new(),
            walker: None,
            workers: Vec::new(),
            done_rx: None,
        })
    }

    /// Attach a durable finding store. Without one, results live only in
    /// the in-memory report.
    #[must_use]
    pub fn with_store(mut self, store: ScanStore) -> Self {
        self.store = Some(store);
        self
    }

    /// The shared report. The aggregator is its only writer while the
    /// scan runs.
    #[must_use]
    pub fn report(&self) -> Arc<Mutex<Report>> {
        Arc::clone(&self.report)
    }

    /// The shared whitelist.
    #[must_use]
    pub fn whitelist(&self) -> Arc<Whitelist> {
        Arc::clone(&self.whitelist)
    }

    /// The id of the persisted scan row, once `start()` created it.
    #[must_use]
    pub fn scan_id(&self) -> Option<&str> {
        self.scan_id.as_deref()
    }

    /// Request cancellation. The walker stops emitting jobs and workers
    /// exit after their current file.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Spawn the walker, the worker pool and the aggregator. Returns
    /// immediately; call [`Scanner::wait`] to join.
    pub async fn start(&mut self) {
        let worker_count = self.config.worker_count();
        let capacity = worker_count * 4;

        info!(
            root = %self.config.scan.root_path.display(),
            workers = worker_count,
            classifier = self.classifier.is_some(),
            "starting scan"
        );

        if let Some(store) = &self.store {
            let root = self.config.scan.root_path.to_string_lossy();
            match scans::create_scan(store.pool(), &root).await {
                Ok(scan) => self.scan_id = Some(scan.id),
                Err(e) => warn!("failed to create scan record: {e}"),
            }
        }

        let (jobs_tx, jobs_rx) = mpsc::channel(capacity);
        let (results_tx, results_rx) = mpsc::channel(capacity);
        let jobs_rx = Arc::new(AsyncMutex::new(jobs_rx));

        let (done_tx, done_rx) = oneshot::channel();
        self.done_rx = Some(done_rx);

        tokio::spawn(process_results(
            results_rx,
            Arc::clone(&self.report),
            self.store.clone(),
            self.scan_id.clone(),
            done_tx,
        ));

        let factory = Arc::new(ExtractorFactory::new(
            self.config.scan.pdf_buffer_warn_bytes,
        ));
        let ctx = Arc::new(WorkerContext {
            factory: Arc::clone(&factory),
            classifier: self.classifier.clone(),
            whitelist: Arc::clone(&self.whitelist),
        });

        for id in 0..worker_count {
            self.workers.push(tokio::spawn(worker_loop(
                id,
                Arc::clone(&ctx),
                Arc::clone(&jobs_rx),
                results_tx.clone(),
                self.cancel.clone(),
            )));
        }
        // Workers hold the only result senders; the channel closes when
        // the last worker exits.
        drop(results_tx);

        self.walker = Some(tokio::spawn(walk_files(
            self.config.scan.root_path.clone(),
            factory,
            self.config.scan.fast_mode,
            jobs_tx,
            self.cancel.clone(),
        )));
    }

    /// Join the walker and all workers, then wait for the aggregator to
    /// finalize the summary.
    pub async fn wait(&mut self) {
        if let Some(walker) = self.walker.take() {
            let _ = walker.await;
        }

        for worker in self.workers.drain(..) {
            let _ = worker.await;
        }

        if let Some(done_rx) = self.done_rx.take() {
            let _ = done_rx.await;
        }
    }
}
