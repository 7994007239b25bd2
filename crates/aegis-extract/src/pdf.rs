//! PDF extraction: per-page text with page-index offsets.

use crate::{ContentExtractor, ExtractError, Result};
use aegis_core::PiiMatch;
use aegis_detect::run_battery;
use async_trait::async_trait;
use tokio::fs::File;
use tokio::io::AsyncReadExt;

/// Scans PDF documents page by page.
///
/// The PDF library needs random access, so the file is buffered fully
/// into memory. A streaming path for very large documents is open work;
/// documents above the configured threshold are only logged.
pub struct PdfExtractor {
    buffer_warn_bytes: u64,
}

impl PdfExtractor {
    /// Create an extractor that warns when buffering more than
    /// `buffer_warn_bytes`.
    #[must_use]
    pub fn new(buffer_warn_bytes: u64) -> Self {
        Self { buffer_warn_bytes }
    }
}

#[async_trait]
impl ContentExtractor for PdfExtractor {
    async fn scan(&self, file: &mut File) -> Result<Vec<PiiMatch>> {
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes).await?;

        if bytes.len() as u64 > self.buffer_warn_bytes {
            tracing::warn!(
                size = bytes.len(),
                "buffering oversized PDF fully into memory"
            );
        }

        let pages = pdf_extract::extract_text_from_mem_by_pages(&bytes)
            .map_err(|e| ExtractError::Pdf(e.to_string()))?;

        let mut matches = Vec::new();
        for (idx, page) in pages.iter().enumerate() {
            // Offset carries the 1-based page index for paginated formats.
            matches.extend(run_battery(page.as_bytes(), (idx + 1) as i64));
        }

        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_rejects_non_pdf_bytes() {
        let mut tmp = tempfile::NamedTempFile::new().expect("create temp file");
        tmp.write_all(b"plain text, not a PDF").expect("write temp file");

        let mut file = File::open(tmp.path()).await.expect("open temp file");
        let result = PdfExtractor::new(32 * 1024 * 1024).scan(&mut file).await;

        assert!(matches!(result, Err(ExtractError::Pdf(_))));
    }
}
