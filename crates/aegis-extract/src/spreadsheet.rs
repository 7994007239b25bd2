//! Spreadsheet extraction: every cell is scanned as a tiny segment.

use crate::{ContentExtractor, ExtractError, Result};
use aegis_core::PiiMatch;
use aegis_detect::run_battery;
use async_trait::async_trait;
use calamine::{Data, Reader, Xlsx};
use std::io::Cursor;
use tokio::fs::File;
use tokio::io::AsyncReadExt;

/// Columns beyond this index are skipped to bound memory on extremely
/// wide sheets.
const MAX_COLUMNS: usize = 1000;

/// Scans `.xlsx` workbooks cell by cell.
///
/// The offset of a match is the 1-based row index; the snippet is the
/// full cell text.
pub struct SpreadsheetExtractor;

#[async_trait]
impl ContentExtractor for SpreadsheetExtractor {
    async fn scan(&self, file: &mut File) -> Result<Vec<PiiMatch>> {
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes).await?;

        let mut workbook = Xlsx::new(Cursor::new(bytes))
            .map_err(|e| ExtractError::Spreadsheet(e.to_string()))?;

        let mut matches = Vec::new();

        let sheet_names = workbook.sheet_names().to_vec();
        for sheet in sheet_names {
            let Ok(range) = workbook.worksheet_range(&sheet) else {
                continue;
            };

            for (row_idx, row) in range.rows().enumerate() {
                for (col_idx, cell) in row.iter().enumerate() {
                    if col_idx > MAX_COLUMNS {
                        break;
                    }
                    if matches!(cell, Data::Empty) {
                        continue;
                    }

                    let text = cell.to_string();
                    if text.is_empty() {
                        continue;
                    }

                    for mut m in run_battery(text.as_bytes(), (row_idx + 1) as i64) {
                        m.snippet = text.clone();
                        matches.push(m);
                    }
                }
            }
        }

        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_rejects_non_spreadsheet_bytes() {
        let mut tmp = tempfile::NamedTempFile::new().expect("create temp file");
        tmp.write_all(b"this is definitely not a zip archive")
            .expect("write temp file");

        let mut file = File::open(tmp.path()).await.expect("open temp file");
        let result = SpreadsheetExtractor.scan(&mut file).await;

        assert!(matches!(result, Err(ExtractError::Spreadsheet(_))));
    }
}
