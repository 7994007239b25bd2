//! IBAN detection with ISO 13616 MOD-97 validation.

use crate::detector::{Detector, RegexDetector};
use crate::patterns;
use aegis_core::{PiiKind, PiiMatch};

/// Detects IBANs: regex candidates verified by the MOD-97 integrity check.
pub struct IbanDetector {
    inner: RegexDetector,
}

impl IbanDetector {
    /// Create the detector with the compact-form candidate pattern.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: RegexDetector::new(&patterns::IBAN_PATTERN, PiiKind::Iban),
        }
    }
}

impl Default for IbanDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl Detector for IbanDetector {
    fn detect(&self, content: &[u8]) -> Vec<PiiMatch> {
        self.inner
            .find_matches(content)
            .into_iter()
            .filter(|m| validate_iban(&m.value))
            .collect()
    }

    fn kind(&self) -> PiiKind {
        PiiKind::Iban
    }
}

/// MOD-97 check per ISO 13616: rotate the first four characters to the
/// end, expand letters to `10..=35`, and require the resulting decimal
/// number to be `1 (mod 97)`.
///
/// The remainder is folded digit by digit, which is equivalent to the
/// arbitrary-precision computation.
#[must_use]
pub fn validate_iban(iban: &str) -> bool {
    if !iban.is_ascii() || iban.len() < 15 || iban.len() > 34 {
        return false;
    }

    let (head, tail) = iban.split_at(4);
    let rotated = tail.chars().chain(head.chars());

    let mut remainder: u32 = 0;
    for c in rotated {
        match c {
            '0'..='9' => {
                remainder = (remainder * 10 + (c as u32 - '0' as u32)) % 97;
            }
            'A'..='Z' => {
                // A=10 .. Z=35, two decimal digits at once
                remainder = (remainder * 100 + (c as u32 - 'A' as u32 + 10)) % 97;
            }
            _ => return false,
        }
    }

    remainder == 1
}
