//! The `Detector` capability set and the shared regex detector.

use crate::creditcard::CreditCardDetector;
use crate::iban::IbanDetector;
use crate::keywords::KeywordDetector;
use crate::patterns;
use aegis_core::{PiiKind, PiiMatch};
use once_cell::sync::Lazy;
use regex::bytes::Regex;

/// Bytes of surrounding context added on each side of a match snippet.
const SNIPPET_CONTEXT: usize = 20;

/// A PII detection strategy over a single text segment.
pub trait Detector: Send + Sync {
    /// Find all matches in the segment. Offsets are relative to the
    /// segment start.
    fn detect(&self, content: &[u8]) -> Vec<PiiMatch>;

    /// The kind of PII this detector reports.
    fn kind(&self) -> PiiKind;
}

/// Common find-all regex scanning with snippet framing.
///
/// The validating detectors (IBAN, credit card) wrap this and filter its
/// candidates.
pub struct RegexDetector {
    pattern: &'static Lazy<Regex>,
    kind: PiiKind,
}

impl RegexDetector {
    /// Create a detector for a compiled pattern and kind.
    #[must_use]
    pub fn new(pattern: &'static Lazy<Regex>, kind: PiiKind) -> Self {
        Self { pattern, kind }
    }

    /// Run the pattern over the segment, framing each match with up to
    /// [`SNIPPET_CONTEXT`] bytes of context on each side.
    pub(crate) fn find_matches(&self, content: &[u8]) -> Vec<PiiMatch> {
        let mut found = Vec::new();

        for m in self.pattern.find_iter(content) {
            let (start, end) = (m.start(), m.end());
            let snippet_start = start.saturating_sub(SNIPPET_CONTEXT);
            let snippet_end = (end + SNIPPET_CONTEXT).min(content.len());

            found.push(PiiMatch {
                kind: self.kind,
                value: String::from_utf8_lossy(&content[start..end]).into_owned(),
                snippet: String::from_utf8_lossy(&content[snippet_start..snippet_end])
                    .into_owned(),
                offset: start as i64,
            });
        }

        found
    }
}

impl Detector for RegexDetector {
    fn detect(&self, content: &[u8]) -> Vec<PiiMatch> {
        self.find_matches(content)
    }

    fn kind(&self) -> PiiKind {
        self.kind
    }
}

/// The fixed, ordered battery of detectors run against each segment.
#[must_use]
pub fn battery() -> Vec<Box<dyn Detector>> {
    vec![
        Box::new(IbanDetector::new()),
        Box::new(CreditCardDetector::new()),
        Box::new(RegexDetector::new(&patterns::EMAIL_PATTERN, PiiKind::Email)),
        Box::new(RegexDetector::new(&patterns::PHONE_PATTERN, PiiKind::Phone)),
        Box::new(RegexDetector::new(&patterns::NAME_PATTERN, PiiKind::Name)),
        Box::new(KeywordDetector::identity()),
        Box::new(KeywordDetector::financial()),
        Box::new(KeywordDetector::official_id()),
        Box::new(KeywordDetector::sensitive()),
    ]
}

/// Run the full battery over a segment, shifting every match by the
/// segment's base offset. Overlapping matches from different detectors
/// are all retained; the downstream classifier resolves duplicates.
#[must_use]
pub fn run_battery(content: &[u8], base_offset: i64) -> Vec<PiiMatch> {
    let mut matches = Vec::new();

    for detector in battery() {
        for mut m in detector.detect(content) {
            m.offset += base_offset;
            matches.push(m);
        }
    }

    matches
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_detection_with_offset() {
        let content = b"Contact: info@example.com for details";
        let detector = RegexDetector::new(&patterns::EMAIL_PATTERN, PiiKind::Email);

        let matches = detector.detect(content);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].value, "info@example.com");
        assert_eq!(matches[0].offset, 9);
        assert_eq!(matches[0].kind, PiiKind::Email);
    }

    #[test]
    fn test_snippet_framing_clipped_to_bounds() {
        let content = b"info@example.com";
        let detector = RegexDetector::new(&patterns::EMAIL_PATTERN, PiiKind::Email);

        let matches = detector.detect(content);
        assert_eq!(matches.len(), 1);
        // Match spans the whole segment, so the snippet is the segment.
        assert_eq!(matches[0].snippet, "info@example.com");
    }

    #[test]
    fn test_snippet_contains_context() {
        let content = b"xxxxxxxxxxxxxxxxxxxxxxxxxxxx info@example.com yyyyyyyyyyyyyyyyyyyyyyyyyy";
        let detector = RegexDetector::new(&patterns::EMAIL_PATTERN, PiiKind::Email);

        let matches = detector.detect(content);
        assert_eq!(matches.len(), 1);
        let snippet = &matches[0].snippet;
        assert!(snippet.contains("info@example.com"));
        // 20 bytes of context on each side plus the value itself.
        assert_eq!(snippet.len(), "info@example.com".len() + 40);
    }

    #[test]
    fn test_offsets_non_decreasing_within_detector() {
        let content = b"a@b.de then c@d.de then e@f.de";
        let detector = RegexDetector::new(&patterns::EMAIL_PATTERN, PiiKind::Email);

        let matches = detector.detect(content);
        assert_eq!(matches.len(), 3);
        for pair in matches.windows(2) {
            assert!(pair[0].offset <= pair[1].offset);
        }
    }

    #[test]
    fn test_battery_order_is_fixed() {
        let kinds: Vec<PiiKind> = battery().iter().map(|d| d.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                PiiKind::Iban,
                PiiKind::CreditCard,
                PiiKind::Email,
                PiiKind::Phone,
                PiiKind::Name,
                PiiKind::Identity,
                PiiKind::Financial,
                PiiKind::OfficialId,
                PiiKind::Sensitive,
            ]
        );
    }

    #[test]
    fn test_run_battery_applies_base_offset() {
        let content = b"mail: someone@example.org";
        let matches = run_battery(content, 1000);

        let email = matches
            .iter()
            .find(|m| m.kind == PiiKind::Email)
            .expect("email match");
        assert_eq!(email.offset, 1000 + 6);
    }

    #[test]
    fn test_overlapping_detectors_all_retained() {
        // "Kontonummer" triggers the Financial keyword detector while the
        // IBAN detector fires on the account number itself.
        let content = b"Kontonummer: DE89370400440532013000";
        let matches = run_battery(content, 0);

        assert!(matches.iter().any(|m| m.kind == PiiKind::Iban));
        assert!(matches.iter().any(|m| m.kind == PiiKind::Financial));
    }
}
