//! Compiled regex patterns for the detector battery.
//!
//! Keyword alternations cover English and German terms; they signal
//! contextual suspicion rather than a PII value per se.

use once_cell::sync::Lazy;
use regex::bytes::Regex;

/// IBAN candidate: compact form, 2 letters, 2 digits, 4-30 alphanumerics.
/// Candidates are verified by the MOD-97 check before being reported.
pub static IBAN_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[A-Z]{2}\d{2}[A-Z0-9]{4,30}").expect("IBAN regex is hardcoded and valid")
});

/// Credit card candidate: 13-19 digits with optional space/hyphen
/// separators. Intentionally broad; Luhn does the real validation.
pub static CREDIT_CARD_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:\d[ -]*?){13,19}\b").expect("credit card regex is hardcoded and valid")
});

/// Standard email pattern.
pub static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}")
        .expect("email regex is hardcoded and valid")
});

/// Phone numbers in international (+49) or 00-prefixed form, at least
/// 7 digits to avoid false positives like years.
pub static PHONE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\+|00)[0-9][0-9 \-\./]{6,}").expect("phone regex is hardcoded and valid")
});

/// Person-name heuristic: 2-4 capitalized words, umlauts included.
pub static NAME_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[A-ZÄÖÜ][a-zäöüß]+(?:[- ]?[A-ZÄÖÜ][a-zäöüß]+){1,3}\b")
        .expect("name regex is hardcoded and valid")
});

/// Identity and contact keywords.
pub static IDENTITY_KEYWORDS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(Name|Firstname|Lastname|Fullname|Surname|Vorname|Nachname|Familienname|Address|Street|ZIP|City|Residence|P\.O\.\s*Box|Straße|PLZ|Wohnort|Anschrift|Postfach|Email|Phone|Mobile|Fax|E-Mail|Telefon|Handy|Rufnummer|Birthdate|Place\s+of\s+birth|Gender|Age|Geburtsdatum|Geburtsort|Geschlecht|Alter)")
        .expect("identity keyword regex is hardcoded and valid")
});

/// Financial data keywords.
pub static FINANCIAL_KEYWORDS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(Account|Sort\s+Code|Kontonummer|BLZ|Bankverbindung|Credit\s+card|Visa|Mastercard|CVV|Kreditkarte|Karteninhaber|Ablaufdatum|Tax\s+ID|Tax\s+Number|VAT\s+ID|Steuer-ID|Steuernummer|USt-IdNr)")
        .expect("financial keyword regex is hardcoded and valid")
});

/// Official document and ID keywords.
pub static OFFICIAL_ID_KEYWORDS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(Passport|Driver's\s+License|SSN|Reisepassnummer|Führerschein|Ausweis|National\s+Insurance|Health\s+Insurance|Sozialversicherung|Krankenkasse|Vers-Nr)")
        .expect("official ID keyword regex is hardcoded and valid")
});

/// GDPR Article 9 special-category keywords (health, religion, political,
/// criminal).
pub static SENSITIVE_KEYWORDS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(Medical|Diagnosis|Patient|Therapy|Arzt|Befund|Diagnose|Krankmeldung|Religion|Political|Church|Union|Konfession|Partei|Gewerkschaft|Criminal|Offense|Court|Lawyer|Vorstrafe|Urteil|Aktenzeichen|Anwalt)")
        .expect("sensitive keyword regex is hardcoded and valid")
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patterns_compile() {
        // Touching each Lazy forces compilation of the hardcoded patterns.
        assert!(IBAN_PATTERN.is_match(b"DE89370400440532013000"));
        assert!(CREDIT_CARD_PATTERN.is_match(b"4111 1111 1111 1111"));
        assert!(EMAIL_PATTERN.is_match(b"info@example.com"));
        assert!(PHONE_PATTERN.is_match(b"+49 170 1234567"));
        assert!(NAME_PATTERN.is_match("Max Mustermann".as_bytes()));
        assert!(IDENTITY_KEYWORDS.is_match(b"Geburtsdatum"));
        assert!(FINANCIAL_KEYWORDS.is_match(b"Kontonummer"));
        assert!(OFFICIAL_ID_KEYWORDS.is_match(b"Reisepassnummer"));
        assert!(SENSITIVE_KEYWORDS.is_match(b"Diagnose"));
    }

    #[test]
    fn test_keyword_case_insensitivity() {
        assert!(IDENTITY_KEYWORDS.is_match(b"VORNAME"));
        assert!(FINANCIAL_KEYWORDS.is_match(b"kreditkarte"));
        assert!(SENSITIVE_KEYWORDS.is_match(b"PATIENT"));
    }

    #[test]
    fn test_name_pattern_umlauts() {
        assert!(NAME_PATTERN.is_match("Thomas Müller".as_bytes()));
        assert!(NAME_PATTERN.is_match("Jörg Österreich".as_bytes()));
        assert!(!NAME_PATTERN.is_match(b"lowercase only"));
    }

    #[test]
    fn test_phone_requires_prefix() {
        assert!(PHONE_PATTERN.is_match(b"0049 170 1234567"));
        assert!(!PHONE_PATTERN.is_match(b"170 1234567"));
    }
}
