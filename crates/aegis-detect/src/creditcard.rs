//! Credit card detection with Luhn validation.

use crate::detector::{Detector, RegexDetector};
use crate::patterns;
use aegis_core::{PiiKind, PiiMatch};

/// Detects payment card numbers: broad digit-run candidates verified by
/// the Luhn checksum.
pub struct CreditCardDetector {
    inner: RegexDetector,
}

impl CreditCardDetector {
    /// Create the detector with the broad candidate pattern.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: RegexDetector::new(&patterns::CREDIT_CARD_PATTERN, PiiKind::CreditCard),
        }
    }
}

impl Default for CreditCardDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl Detector for CreditCardDetector {
    fn detect(&self, content: &[u8]) -> Vec<PiiMatch> {
        self.inner
            .find_matches(content)
            .into_iter()
            .filter(|m| {
                let digits: String = m.value.chars().filter(char::is_ascii_digit).collect();
                (13..=19).contains(&digits.len()) && luhn_check(&digits)
            })
            .collect()
    }

    fn kind(&self) -> PiiKind {
        PiiKind::CreditCard
    }
}

/// Luhn checksum (ISO/IEC 7812): right to left, double every second
/// digit, subtract 9 when the doubled value exceeds 9, and require the
/// sum to be divisible by 10.
#[must_use]
pub fn luhn_check(digits: &str) -> bool {
    let mut sum = 0u32;
    let mut alternate = false;

    for c in digits.chars().rev() {
        let Some(d) = c.to_digit(10) else {
            return false;
        };
        let mut n = d;
        if alternate {
            n *= 2;
            if n > 9 {
                n -= 9;
            }
        }
        sum += n;
        alternate = !alternate;
    }

    sum % 10 == 0
}
