//! Plain-text extraction with chunked reading and a boundary-preserving
//! overlap window.

use crate::{ContentExtractor, Result};
use aegis_core::{PiiKind, PiiMatch};
use aegis_detect::run_battery;
use async_trait::async_trait;
use std::collections::HashSet;
use tokio::fs::File;
use tokio::io::AsyncReadExt;

/// Read buffer size for chunked scanning.
const CHUNK_SIZE: usize = 64 * 1024;

/// Trailing bytes of each chunk carried into the next read so a pattern
/// straddling a chunk boundary is still seen whole.
const OVERLAP_SIZE: usize = 256;

/// Scans arbitrary byte streams as text, 64 KiB at a time.
///
/// Each combined chunk (overlap + fresh bytes) is sanitized and handed to
/// the detector battery with a base offset of
/// `bytes_consumed_before_this_read - overlap_len`. Because overlapped
/// regions are re-scanned, matches are deduplicated by
/// `(kind, absolute offset, value)`.
pub struct TextExtractor;

#[async_trait]
impl ContentExtractor for TextExtractor {
    async fn scan(&self, file: &mut File) -> Result<Vec<PiiMatch>> {
        let mut buf = vec![0u8; CHUNK_SIZE];
        let mut overlap: Vec<u8> = Vec::new();
        let mut consumed: i64 = 0;

        let mut matches = Vec::new();
        let mut seen: HashSet<(PiiKind, i64, String)> = HashSet::new();

        loop {
            let n = file.read(&mut buf).await?;
            if n == 0 {
                break;
            }

            let mut chunk = Vec::with_capacity(overlap.len() + n);
            chunk.extend_from_slice(&overlap);
            chunk.extend_from_slice(&buf[..n]);
            sanitize(&mut chunk);

            let base_offset = (consumed - overlap.len() as i64).max(0);
            for m in run_battery(&chunk, base_offset) {
                if seen.insert((m.kind, m.offset, m.value.clone())) {
                    matches.push(m);
                }
            }

            let keep = n.min(OVERLAP_SIZE);
            overlap.clear();
            overlap.extend_from_slice(&buf[n - keep..n]);
            consumed += n as i64;
        }

        Ok(matches)
    }
}

/// Replace bytes that would confuse the regex battery with spaces.
///
/// Kept: printable ASCII `[32..=126]`, tab, newline, carriage return, and
/// everything above 127 (UTF-8 continuation bytes and ISO-8859-1 text,
/// which covers German umlauts). Length is preserved, so offsets survive.
pub fn sanitize(data: &mut [u8]) {
    for b in data.iter_mut() {
        let keep = (32..=126).contains(b) || *b == b'\t' || *b == b'\n' || *b == b'\r' || *b > 127;
        if !keep {
            *b = b' ';
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_preserves_length() {
        let original: Vec<u8> = (0u8..=255).collect();
        let mut data = original.clone();
        sanitize(&mut data);
        assert_eq!(data.len(), original.len());
    }

    #[test]
    fn test_sanitize_replaces_control_bytes() {
        let mut data = b"a\x00b\x01c\x1fd".to_vec();
        sanitize(&mut data);
        assert_eq!(&data, b"a b c d");
    }

    #[test]
    fn test_sanitize_keeps_text_and_high_bytes() {
        let mut data = "Straße\tMüller\r\n".as_bytes().to_vec();
        let expected = data.clone();
        sanitize(&mut data);
        assert_eq!(data, expected);
    }
}
