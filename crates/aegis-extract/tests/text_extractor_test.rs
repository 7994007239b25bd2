//! Chunk-boundary and offset behavior of the plain-text extractor.

use aegis_core::PiiKind;
use aegis_extract::{ContentExtractor, TextExtractor};
use std::io::Write;
use tempfile::NamedTempFile;
use tokio::fs::File;

const CHUNK_SIZE: usize = 64 * 1024;

/// Build a file of `total` space bytes with `patterns` spliced in at the
/// given byte offsets.
fn write_fixture(total: usize, patterns: &[(usize, &str)]) -> NamedTempFile {
    let mut data = vec![b' '; total];
    for (offset, pattern) in patterns {
        data[*offset..*offset + pattern.len()].copy_from_slice(pattern.as_bytes());
    }

    let mut tmp = NamedTempFile::new().expect("create temp file");
    tmp.write_all(&data).expect("write fixture");
    tmp.flush().expect("flush fixture");
    tmp
}

#[tokio::test]
async fn test_match_straddling_chunk_boundary() {
    // The email spans bytes 65530..65546, crossing the 64 KiB boundary.
    let email = "user@example.org";
    let tmp = write_fixture(CHUNK_SIZE + 100, &[(65530, email)]);

    let mut file = File::open(tmp.path()).await.expect("open fixture");
    let matches = TextExtractor.scan(&mut file).await.expect("scan fixture");

    let emails: Vec<_> = matches.iter().filter(|m| m.kind == PiiKind::Email).collect();
    assert_eq!(emails.len(), 1);
    assert_eq!(emails[0].value, email);
    assert_eq!(emails[0].offset, 65530);
}

#[tokio::test]
async fn test_match_inside_overlap_reported_once() {
    // Fully contained in the 256-byte overlap window (bytes 65280..65536),
    // so both the first and the second combined chunk see it.
    let email = "dupe@example.org";
    let tmp = write_fixture(CHUNK_SIZE + 100, &[(65400, email)]);

    let mut file = File::open(tmp.path()).await.expect("open fixture");
    let matches = TextExtractor.scan(&mut file).await.expect("scan fixture");

    let emails: Vec<_> = matches.iter().filter(|m| m.kind == PiiKind::Email).collect();
    assert_eq!(emails.len(), 1);
    assert_eq!(emails[0].offset, 65400);
}

#[tokio::test]
async fn test_scan_is_idempotent() {
    let tmp = write_fixture(
        CHUNK_SIZE + 512,
        &[(100, "first@example.org"), (65400, "second@example.org")],
    );

    let mut file = File::open(tmp.path()).await.expect("open fixture");
    let first = TextExtractor.scan(&mut file).await.expect("first scan");

    let mut file = File::open(tmp.path()).await.expect("reopen fixture");
    let second = TextExtractor.scan(&mut file).await.expect("second scan");

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_offsets_monotonic_across_chunks() {
    let tmp = write_fixture(
        2 * CHUNK_SIZE + 100,
        &[
            (10, "a@example.org"),
            (70_000, "b@example.org"),
            (130_000, "c@example.org"),
        ],
    );

    let mut file = File::open(tmp.path()).await.expect("open fixture");
    let matches = TextExtractor.scan(&mut file).await.expect("scan fixture");

    let offsets: Vec<i64> = matches
        .iter()
        .filter(|m| m.kind == PiiKind::Email)
        .map(|m| m.offset)
        .collect();
    assert_eq!(offsets, vec![10, 70_000, 130_000]);
}

#[tokio::test]
async fn test_binary_noise_does_not_hide_matches() {
    // Control bytes around the value are sanitized to spaces, keeping
    // byte offsets intact.
    let mut data = vec![0u8; 4096];
    let email = b"hidden@example.org";
    data[1000..1000 + email.len()].copy_from_slice(email);

    let mut tmp = NamedTempFile::new().expect("create temp file");
    tmp.write_all(&data).expect("write fixture");

    let mut file = File::open(tmp.path()).await.expect("open fixture");
    let matches = TextExtractor.scan(&mut file).await.expect("scan fixture");

    let emails: Vec<_> = matches.iter().filter(|m| m.kind == PiiKind::Email).collect();
    assert_eq!(emails.len(), 1);
    assert_eq!(emails[0].offset, 1000);
    assert_eq!(emails[0].value, "hidden@example.org");
}

#[tokio::test]
async fn test_empty_file_yields_no_matches() {
    let tmp = NamedTempFile::new().expect("create temp file");

    let mut file = File::open(tmp.path()).await.expect("open fixture");
    let matches = TextExtractor.scan(&mut file).await.expect("scan fixture");
    assert!(matches.is_empty());
}
