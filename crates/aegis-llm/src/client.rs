//! HTTP client for the Ollama-compatible generate endpoint.

use crate::error::{LlmError, Result};
use crate::prompts;
use aegis_core::PiiKind;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Timeout for the startup reachability check.
const PING_TIMEOUT: Duration = Duration::from_secs(5);

/// Timeout for a full-file analysis call.
const ANALYZE_TIMEOUT: Duration = Duration::from_secs(60);

/// Aggregated context larger than this is truncated before prompting.
const MAX_CONTEXT_BYTES: usize = 12_000;

/// Marker appended when the context had to be truncated.
const TRUNCATION_SUFFIX: &str = "...(truncated)";

/// A finding as returned by the classifier.
///
/// `kind` is whatever label the model chose; it is not restricted to the
/// canonical detector kinds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifiedFinding {
    /// Classifier label (canonical kind or free-form)
    #[serde(rename = "type")]
    pub kind: String,
    /// The exact PII text the classifier confirmed
    pub value: String,
    /// The classifier's explanation
    pub reason: String,
    /// Confidence in `[0, 1]`
    pub confidence: f64,
}

/// Client for a single remote text-generation endpoint.
pub struct OllamaClient {
    base_url: String,
    model: String,
    client: Client,
}

impl OllamaClient {
    /// Create a new client for the given generate endpoint and model.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(ANALYZE_TIMEOUT)
            .build()
            .map_err(|e| LlmError::Internal(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.into(),
            model: model.into(),
            client,
        })
    }

    /// The configured endpoint URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The configured model name.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Check that the endpoint is reachable and the model responds.
    ///
    /// # Errors
    /// Any transport error or non-2xx status is a ping failure.
    pub async fn ping(&self) -> Result<()> {
        let request = GenerateRequest {
            model: self.model.clone(),
            prompt: "ping".to_string(),
            stream: false,
            format: None,
        };

        let response = self
            .client
            .post(&self.base_url)
            .timeout(PING_TIMEOUT)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(LlmError::ApiError {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        Ok(())
    }

    /// Submit a file's aggregated candidate context for classification.
    ///
    /// `kinds` are the distinct detector kinds among the candidates; each
    /// gets its own instruction block in the prompt.
    ///
    /// # Errors
    /// Returns error on transport failures, non-2xx statuses, or a
    /// bracketed response that is not valid JSON. The caller falls back
    /// to 0.5-confidence raw matches in every error case.
    pub async fn analyze_file(
        &self,
        context: &str,
        kinds: &[PiiKind],
    ) -> Result<Vec<ClassifiedFinding>> {
        let prompt = build_prompt(context, kinds);
        let response = self.generate(&prompt, true).await?;
        parse_findings(&response)
    }

    async fn generate(&self, prompt: &str, json_format: bool) -> Result<String> {
        let request = GenerateRequest {
            model: self.model.clone(),
            prompt: prompt.to_string(),
            stream: false,
            format: json_format.then(|| "json".to_string()),
        };

        tracing::debug!(chars = prompt.len(), "sending classifier prompt");

        let response = self
            .client
            .post(&self.base_url)
            .timeout(ANALYZE_TIMEOUT)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(LlmError::ApiError {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        let body: GenerateResponse = response.json().await.map_err(|e| LlmError::ParseError {
            message: format!("invalid response envelope: {e}"),
        })?;

        tracing::debug!(chars = body.response.len(), "classifier responded");

        Ok(body.response.trim().to_string())
    }
}

/// Build the analysis prompt: preamble, per-kind instruction blocks and
/// the (possibly truncated) aggregated context.
#[must_use]
pub fn build_prompt(context: &str, kinds: &[PiiKind]) -> String {
    let mut instructions = String::new();
    for kind in kinds {
        instructions.push_str(&format!(
            "\nTarget: {kind}\n{}\n",
            prompts::instruction_for(*kind)
        ));
    }
    if instructions.is_empty() {
        instructions = format!("\nTarget: General\n{}", prompts::DEFAULT_INSTRUCTION);
    }

    let mut prompt = String::with_capacity(
        prompts::PROMPT_PREAMBLE.len() + instructions.len() + context.len() + 512,
    );
    prompt.push_str(prompts::PROMPT_PREAMBLE);
    prompt.push_str(&instructions);
    prompt.push_str(prompts::PROMPT_CONTENT_HEADER);
    prompt.push_str(&truncate_context(context));
    prompt.push_str(prompts::PROMPT_FOOTER);
    prompt
}

/// Cap the context at [`MAX_CONTEXT_BYTES`], cutting on a char boundary
/// and appending the truncation marker.
fn truncate_context(context: &str) -> String {
    if context.len() <= MAX_CONTEXT_BYTES {
        return context.to_string();
    }

    let mut cut = MAX_CONTEXT_BYTES;
    while !context.is_char_boundary(cut) {
        cut -= 1;
    }

    format!("{}{}", &context[..cut], TRUNCATION_SUFFIX)
}

/// Parse the classifier's response text into findings.
///
/// Markdown fences are stripped and the substring from the first `[` to
/// the last `]` is parsed as a JSON list. A response without brackets
/// yields one synthetic `Unknown` finding carrying the raw text; missing
/// or zero confidence is substituted with 0.8.
pub fn parse_findings(response: &str) -> Result<Vec<ClassifiedFinding>> {
    let clean = strip_markdown_fences(response);

    let (start, end) = match (clean.find('['), clean.rfind(']')) {
        (Some(start), Some(end)) if start < end => (start, end),
        _ => {
            return Ok(vec![ClassifiedFinding {
                kind: "Unknown".to_string(),
                value: response.to_string(),
                reason: "AI returned non-JSON response".to_string(),
                confidence: 0.8,
            }]);
        }
    };

    #[derive(Deserialize)]
    struct RawFinding {
        #[serde(rename = "type", default)]
        kind: String,
        #[serde(default)]
        value: String,
        #[serde(default)]
        reason: String,
        #[serde(default)]
        confidence: f64,
    }

    let raw: Vec<RawFinding> =
        serde_json::from_str(&clean[start..=end]).map_err(|e| LlmError::ParseError {
            message: format!("failed to parse classifier response: {e}"),
        })?;

    Ok(raw
        .into_iter()
        .map(|f| ClassifiedFinding {
            kind: f.kind,
            value: f.value,
            reason: f.reason,
            confidence: if f.confidence == 0.0 {
                0.8
            } else {
                // Findings must stay within [0, 1] no matter what the
                // model hands back.
                f.confidence.clamp(0.0, 1.0)
            },
        })
        .collect())
}

fn strip_markdown_fences(text: &str) -> &str {
    let mut text = text.trim();
    if let Some(rest) = text.strip_prefix("```json") {
        text = rest;
    } else if let Some(rest) = text.strip_prefix("```") {
        text = rest;
    }
    if let Some(rest) = text.strip_suffix("```") {
        text = rest;
    }
    text.trim()
}

// Generate endpoint API types

#[derive(Debug, Serialize)]
struct GenerateRequest {
    model: String,
    prompt: String,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
    #[serde(default)]
    #[allow(dead_code)]
    done: bool,
}
