//! The detector battery: per-kind pattern matching with algorithmic
//! validation over sanitized text segments.
//!
//! Detection runs over raw bytes (`regex::bytes`) because sanitized
//! segments may carry high-bit ISO-8859-1 bytes that are not valid UTF-8;
//! offsets must stay byte-accurate either way.

mod creditcard;
mod detector;
mod iban;
mod keywords;
pub mod patterns;

pub use creditcard::{luhn_check, CreditCardDetector};
pub use detector::{battery, run_battery, Detector, RegexDetector};
pub use iban::{validate_iban, IbanDetector};
pub use keywords::KeywordDetector;
