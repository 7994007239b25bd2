//! Prompt templates for the classifier.
//!
//! Each PII kind gets its own instruction block; only the blocks for
//! kinds actually present among a file's candidates are included in the
//! prompt.

use aegis_core::PiiKind;

/// Fixed preamble of every analysis prompt.
pub const PROMPT_PREAMBLE: &str = "You are a GDPR Data Privacy Officer. Analyze the following document snippet for specific Personally Identifiable Information (PII) types.\nFor each finding, provide a JSON object in the list.\n\nSpecific Instructions per Type found in this document:\n";

/// Separator between the instruction blocks and the document content.
pub const PROMPT_CONTENT_HEADER: &str =
    "\nIf nothing is found, return an empty list [].\n\nDocument Content:\n\"\"\"\n";

/// Output-format contract appended after the document content.
pub const PROMPT_FOOTER: &str = "\n\"\"\"\nReturn valid JSON only. Format: [{\"type\":\"...\", \"value\":\"...\", \"reason\":\"...\", \"confidence\": 0.0-1.0}]. No markdown.\nIMPORTANT: You MUST include a \"confidence\" field (0.0 to 1.0) for every finding.\n- 0.9-1.0: Certain (e.g. valid IBAN, explicit label \"Name: John Doe\")\n- 0.7-0.8: Likely (e.g. \"John Doe\" in a list of attendees)\n- 0.4-0.6: Unsure (e.g. single word \"Smith\", could be a company or street)\n- < 0.4: False Positive (Ignore)\nIn the \"reason\" field, explain WHY you chose this confidence level. Mention context clues.";

/// Fallback instruction when no kind-specific block applies.
pub const DEFAULT_INSTRUCTION: &str =
    "Analyze the text for any Personally Identifiable Information (PII) according to GDPR.";

/// The instruction block for a specific PII kind.
#[must_use]
pub fn instruction_for(kind: PiiKind) -> &'static str {
    match kind {
        PiiKind::Iban => {
            "- Check if the IBAN is a real bank account number.\n- Verify if it looks like a test/example IBAN (e.g. 123456).\n- Flag it especially if it appears in a context of real transaction data."
        }
        PiiKind::CreditCard => {
            "- Verify if this number looks like a credit card (13-19 digits).\n- Context Check: Is it near words like \"CVV\", \"Expires\", \"Visa\", \"Mastercard\"?\n- STRICTLY FLAGGING: Storing full Credit Card numbers is a critical violation."
        }
        PiiKind::Email => {
            "- Check if this is a personal email address (e.g. gmail.com, private domain).\n- Ignore generic company support emails (e.g. info@, support@, contact@).\n- Flag it if it relates to a specific individual."
        }
        PiiKind::Phone => {
            "- Verify if this is a valid phone number format.\n- Distinguish between personal mobile numbers and general company hotlines.\n- Flag personal mobile numbers as high risk."
        }
        PiiKind::Name => {
            "- STRICTLY IDENTIFY REAL HUMAN NAMES.\n- The regex matches capitalized words, but you must filter false positives.\n- REJECT: Company names (GmbH, Inc, Ltd), products, cities, software terms (User, Admin, ID).\n- ACCEPT: Full names like \"John Smith\", \"Maria Garcia\", \"Thomas Mueller\".\n- If the text is just a single word that could be a common noun, REJECT it.\n- Return the name ONLY if you are confident it refers to a specific human being."
        }
        PiiKind::Identity => {
            "- Analyze the context for identity markers (e.g. \"Birthdate\", \"Place of Birth\", \"Passport\").\n- Determine if this data helps identify a natural person."
        }
        PiiKind::Financial => {
            "- Analyze financial context (e.g. \"Account\", \"Tax ID\", \"Salary\").\n- Determine if this data relates to a person's finances."
        }
        PiiKind::OfficialId => {
            "- Check for official ID numbers (Passport, SSN, Driver's License).\n- Verify if the format resembles a valid ID number."
        }
        PiiKind::Sensitive => {
            "- CRITICAL: Check for Article 9 GDPR special categories (Health, Religion, Political, Criminal).\n- Flag immediately if this contains medical diagnoses, political affiliation, or religious beliefs."
        }
    }
}
