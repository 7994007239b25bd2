//! Format-aware content extraction.
//!
//! An extractor turns an opened file into text segments and runs the
//! detector battery over each of them. Three extractors ship: plain text
//! (chunked with a boundary-preserving overlap window), spreadsheets
//! (per cell) and PDFs (per page).

mod error;
mod factory;
mod pdf;
mod spreadsheet;
mod text;

pub use error::{ExtractError, Result};
pub use factory::ExtractorFactory;
pub use pdf::PdfExtractor;
pub use spreadsheet::SpreadsheetExtractor;
pub use text::{sanitize, TextExtractor};

use aegis_core::PiiMatch;
use async_trait::async_trait;
use tokio::fs::File;

/// Converts an opened file into text segments and reports the detector
/// battery's matches over them.
#[async_trait]
pub trait ContentExtractor: Send + Sync {
    /// Scan the file and return all detector matches.
    ///
    /// # Errors
    /// Returns an error when the format library rejects the file or the
    /// underlying reads fail; the caller records it on the scan result.
    async fn scan(&self, file: &mut File) -> Result<Vec<PiiMatch>>;
}
