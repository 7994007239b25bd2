//! Keyword-triggered detectors for contextual PII categories.

use crate::detector::{Detector, RegexDetector};
use crate::patterns;
use aegis_core::{PiiKind, PiiMatch};

/// Case-insensitive keyword matching for one of the four contextual
/// categories (Identity, Financial, OfficialID, Sensitive).
pub struct KeywordDetector {
    inner: RegexDetector,
}

impl KeywordDetector {
    /// Identity and contact keywords.
    #[must_use]
    pub fn identity() -> Self {
        Self {
            inner: RegexDetector::new(&patterns::IDENTITY_KEYWORDS, PiiKind::Identity),
        }
    }

    /// Financial data keywords.
    #[must_use]
    pub fn financial() -> Self {
        Self {
            inner: RegexDetector::new(&patterns::FINANCIAL_KEYWORDS, PiiKind::Financial),
        }
    }

    /// Official document and ID keywords.
    #[must_use]
    pub fn official_id() -> Self {
        Self {
            inner: RegexDetector::new(&patterns::OFFICIAL_ID_KEYWORDS, PiiKind::OfficialId),
        }
    }

    /// GDPR Article 9 special-category keywords.
    #[must_use]
    pub fn sensitive() -> Self {
        Self {
            inner: RegexDetector::new(&patterns::SENSITIVE_KEYWORDS, PiiKind::Sensitive),
        }
    }
}

impl Detector for KeywordDetector {
    fn detect(&self, content: &[u8]) -> Vec<PiiMatch> {
        self.inner.find_matches(content)
    }

    fn kind(&self) -> PiiKind {
        self.inner.kind()
    }
}
