use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use aegis_core::AppConfig;
use aegis_db::ScanStore;
use aegis_llm::OllamaClient;
use aegis_scanner::{Scanner, Whitelist};

mod serve;

/// Scan a directory tree for GDPR-relevant PII.
#[derive(Parser, Debug)]
#[command(name = "aegis", version, about)]
struct Cli {
    /// Root directory to scan
    #[arg(long, default_value = ".")]
    path: PathBuf,

    /// Execute a scan immediately (CLI mode)
    #[arg(long)]
    scan: bool,

    /// Number of concurrent workers (0 = auto: 2 x logical CPUs)
    #[arg(long, default_value_t = 0)]
    workers: usize,

    /// Enable verbose logging
    #[arg(long)]
    verbose: bool,

    /// Start the review API server after the scan
    #[arg(long)]
    serve: bool,

    /// Port for the review API server
    #[arg(long, default_value = "8080")]
    port: String,

    /// Skip files larger than 1 MiB
    #[arg(long)]
    fast: bool,

    /// Disable the LLM classifier and bypass the startup ping gate
    #[arg(long = "no-ai")]
    no_ai: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let mut config = AppConfig::load_with_env().context("failed to load configuration")?;
    config.scan.root_path = cli.path;
    if cli.workers > 0 {
        config.scan.workers = cli.workers;
    }
    if cli.fast {
        config.scan.fast_mode = true;
    }
    if cli.no_ai {
        config.classifier.enabled = false;
    }

    tracing::info!("Initializing database at {}", config.storage.db_path.display());
    let store = ScanStore::open(&config.storage.db_path)
        .await
        .context("failed to initialize database")?;

    // Startup gate: a dead classifier aborts the run unless --no-ai was
    // passed, so nobody mistakes an unvalidated scan for a full one.
    if config.classifier.enabled {
        let client = OllamaClient::new(&config.classifier.url, &config.classifier.model)
            .context("failed to build classifier client")?;
        tracing::info!(
            url = %config.classifier.url,
            model = %config.classifier.model,
            "checking classifier connection"
        );
        client.ping().await.context(
            "could not reach the classifier; ensure it is running or pass --no-ai to scan without it",
        )?;
        tracing::info!("classifier reachable");
    }

    let whitelist;

    if cli.scan {
        let started = Instant::now();

        let mut scanner = Scanner::new(config.clone())
            .context("failed to build scanner")?
            .with_store(store.clone());
        scanner.start().await;
        scanner.wait().await;
        whitelist = scanner.whitelist();

        tracing::info!("scan complete in {:?}", started.elapsed());

        let report = scanner.report();
        let report = report.lock().unwrap_or_else(|e| e.into_inner());
        save_report(&report, Path::new("scan_report.json"), Path::new("scan_report.html"));
        print_summary(&report);
    } else {
        whitelist = Arc::new(
            Whitelist::load(&config.storage.whitelist_path).unwrap_or_default(),
        );
    }

    if cli.serve {
        let addr = format!("0.0.0.0:{}", cli.port);
        tracing::info!("starting review server on {addr}");
        serve::run(&addr, store, whitelist).await?;
    } else if !cli.scan {
        println!("No action specified.");
        println!("Use --scan to run a scan immediately.");
        println!("Use --serve to start the review API server.");
    }

    Ok(())
}

fn setup_logging(verbose: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            tracing_subscriber::EnvFilter::new("debug,sqlx=warn,hyper=warn,reqwest=warn")
        } else {
            tracing_subscriber::EnvFilter::new("info,sqlx=warn")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn save_report(report: &aegis_report::Report, json_path: &Path, html_path: &Path) {
    match report.save_json(json_path) {
        Ok(()) => tracing::info!("JSON report saved to {}", json_path.display()),
        Err(e) => tracing::error!("failed to save JSON report: {e}"),
    }

    match report.save_html(html_path) {
        Ok(()) => tracing::info!("HTML report saved to {}", html_path.display()),
        Err(e) => tracing::error!("failed to save HTML report: {e}"),
    }
}

fn print_summary(report: &aegis_report::Report) {
    let summary = &report.summary;
    println!();
    println!("Files scanned:   {}", summary.total_files_scanned);
    println!("Files with PII:  {}", summary.total_files_with_pii);
    println!("Total findings:  {}", summary.total_pii_found);
    println!("Duration:        {} ms", summary.scan_duration_ms);
}
