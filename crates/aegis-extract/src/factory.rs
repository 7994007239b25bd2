//! Maps file extensions to extractors, rejecting binary formats outright.

use crate::{ContentExtractor, ExtractError, PdfExtractor, Result, SpreadsheetExtractor, TextExtractor};
use std::path::Path;

/// Extensions that never produce a job: executables, raster images,
/// audio/video and archives.
const REJECTED_EXTENSIONS: &[&str] = &[
    ".exe", ".dll", ".so", ".dylib", ".bin", // executables
    ".jpg", ".jpeg", ".png", ".gif", ".bmp", ".tiff", ".webp", // raster images
    ".mp3", ".mp4", ".wav", ".avi", ".mov", ".mkv", // audio/video
    ".zip", ".tar", ".gz", ".rar", ".7z", ".iso", // archives
];

/// Picks the right [`ContentExtractor`] for a file, or rejects it.
#[derive(Debug, Clone)]
pub struct ExtractorFactory {
    pdf_buffer_warn_bytes: u64,
}

impl ExtractorFactory {
    /// Create a factory with the given PDF buffering warn threshold.
    #[must_use]
    pub fn new(pdf_buffer_warn_bytes: u64) -> Self {
        Self {
            pdf_buffer_warn_bytes,
        }
    }

    /// Lowercased extension of a path, with the leading dot; empty for
    /// extension-less files.
    #[must_use]
    pub fn extension_of(path: &Path) -> String {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{}", e.to_lowercase()))
            .unwrap_or_default()
    }

    /// Whether files with this extension are scanned at all.
    #[must_use]
    pub fn is_supported(&self, ext: &str) -> bool {
        !REJECTED_EXTENSIONS.contains(&ext)
    }

    /// Resolve the extractor for a file.
    ///
    /// `.pdf` and `.xlsx` get their format-aware extractors; every other
    /// supported extension (including none) falls back to plain text.
    ///
    /// # Errors
    /// Returns `ExtractError::UnsupportedExtension` for rejected
    /// extensions; the caller skips the file silently.
    pub fn extractor_for(&self, path: &Path) -> Result<(Box<dyn ContentExtractor>, String)> {
        let ext = Self::extension_of(path);

        if !self.is_supported(&ext) {
            return Err(ExtractError::UnsupportedExtension(ext));
        }

        let extractor: Box<dyn ContentExtractor> = match ext.as_str() {
            ".pdf" => Box::new(PdfExtractor::new(self.pdf_buffer_warn_bytes)),
            ".xlsx" => Box::new(SpreadsheetExtractor),
            _ => Box::new(TextExtractor),
        };

        Ok((extractor, ext))
    }
}

impl Default for ExtractorFactory {
    fn default() -> Self {
        Self::new(32 * 1024 * 1024)
    }
}
