//! Durable record of completed scans and their findings.
//!
//! SQLite via `SQLx` with embedded migrations. The aggregator treats the
//! store as a sink: write errors are logged by the caller and never block
//! the pipeline.

mod connection;
mod error;
pub mod findings;
pub mod migrations;
pub mod scans;

pub use connection::ScanStore;
pub use error::{DatabaseError, Result};
pub use findings::FindingRecord;
pub use scans::{ScanRecord, ScanStatus};
