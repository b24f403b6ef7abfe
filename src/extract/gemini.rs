//! Gemini request adapter
//!
//! Issues exactly one `generateContent` call per extraction attempt. The
//! request carries the inline image, a fixed extraction instruction, and a
//! `responseSchema` constraint so the model returns JSON matching
//! [`ExtractionResponse`] instead of free-form prose.

use super::{ExtractError, ExtractionResponse};
use crate::capture::data_url;
use crate::config::Config;
use serde::Deserialize;
use std::time::Duration;

/// Default endpoint for the Gemini REST API
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Fixed instruction sent with every image
const EXTRACTION_PROMPT: &str = "Extract every phone number visible in this image. \
For each number, infer the country it belongs to from its formatting, country code, \
or surrounding context. Return the numbers exactly as they appear in the image, \
in reading order. If no phone numbers are present, return an empty list.";

/// Request adapter for the Gemini `generateContent` endpoint
pub struct GeminiExtractor {
    client: reqwest::Client,
    api_base: String,
    api_key: Option<String>,
    model: String,
}

impl GeminiExtractor {
    /// Build an adapter from the app configuration
    ///
    /// A missing credential is not an error here; it surfaces as
    /// [`ExtractError::SetupRequired`] when an extraction is attempted.
    pub fn from_config(config: &Config) -> Result<Self, ExtractError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ExtractError::Failed(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        })
    }

    /// Run one extraction attempt against the provider
    ///
    /// The credential is validated first: a missing or whitespace-only key
    /// fails with `SetupRequired` before any network activity.
    pub async fn extract(&self, image_data_url: &str) -> Result<ExtractionResponse, ExtractError> {
        let key = match self.api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => key,
            _ => return Err(ExtractError::SetupRequired),
        };

        let mime = data_url::mime_type(image_data_url);
        let payload = data_url::payload(image_data_url);
        tracing::debug!(
            "Sending extraction request (model: {}, mime: {}, payload: {} chars)",
            self.model,
            mime,
            payload.len()
        );

        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.api_base, self.model, key
        );

        let response = self
            .client
            .post(&url)
            .json(&request_body(mime, payload))
            .send()
            .await
            .map_err(|e| ExtractError::Failed(format!("request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ExtractError::Failed(format!("failed to read response body: {}", e)))?;

        if !status.is_success() {
            let message = provider_error_message(&body)
                .map(|msg| format!("{} {}", status.as_u16(), msg))
                .unwrap_or_else(|| format!("{} {}", status.as_u16(), body));
            tracing::warn!("Provider returned error: {}", message);
            return Err(ExtractError::classify(&message));
        }

        parse_response_text(&body)
    }
}

/// Build the `generateContent` request body
///
/// `responseSchema` constrains the model to the `{numbers, summary}` shape;
/// `responseMimeType` makes it emit bare JSON instead of fenced markdown.
fn request_body(mime: &str, payload: &str) -> serde_json::Value {
    serde_json::json!({
        "contents": [{
            "parts": [
                { "inlineData": { "mimeType": mime, "data": payload } },
                { "text": EXTRACTION_PROMPT }
            ]
        }],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": {
                "type": "OBJECT",
                "properties": {
                    "numbers": {
                        "type": "ARRAY",
                        "items": {
                            "type": "OBJECT",
                            "properties": {
                                "number": { "type": "STRING" },
                                "country": { "type": "STRING" }
                            },
                            "required": ["number", "country"]
                        }
                    },
                    "summary": { "type": "STRING" }
                },
                "required": ["numbers"]
            }
        }
    })
}

/// Parse a successful `generateContent` body into a domain response
///
/// The structured result is the concatenated text of the first candidate's
/// parts. No usable text is treated as zero detections, not a failure.
fn parse_response_text(body: &str) -> Result<ExtractionResponse, ExtractError> {
    let response: GenerateContentResponse = serde_json::from_str(body)
        .map_err(|e| ExtractError::Failed(format!("unexpected response shape: {}", e)))?;

    let text: String = response
        .candidates
        .first()
        .and_then(|c| c.content.as_ref())
        .map(|content| {
            content
                .parts
                .iter()
                .filter_map(|p| p.text.as_deref())
                .collect()
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        tracing::debug!("Provider returned no text; treating as zero detections");
        return Ok(ExtractionResponse::default());
    }

    serde_json::from_str(text.trim())
        .map_err(|e| ExtractError::Failed(format!("failed to parse structured output: {}", e)))
}

/// Pull the human-readable message out of a provider error body
///
/// Error bodies look like `{"error": {"code": 429, "message": "...",
/// "status": "RESOURCE_EXHAUSTED"}}`. Both the message and the status are
/// kept for classification.
fn provider_error_message(body: &str) -> Option<String> {
    let parsed: ProviderErrorBody = serde_json::from_str(body).ok()?;
    let error = parsed.error?;
    match (error.message, error.status) {
        (Some(message), Some(status)) => Some(format!("{} {}", status, message)),
        (Some(message), None) => Some(message),
        (None, Some(status)) => Some(status),
        (None, None) => None,
    }
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    error: Option<ProviderError>,
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    message: Option<String>,
    status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor_with_key(api_key: Option<&str>) -> GeminiExtractor {
        let config = Config {
            api_key: api_key.map(String::from),
            // Unroutable base: a SetupRequired result proves no call was made
            api_base: "http://127.0.0.1:9".to_string(),
            ..Config::default()
        };
        GeminiExtractor::from_config(&config).unwrap()
    }

    #[tokio::test]
    async fn test_missing_key_fails_without_network() {
        let extractor = extractor_with_key(None);
        let result = extractor.extract("data:image/png;base64,AAAA").await;
        assert_eq!(result.unwrap_err(), ExtractError::SetupRequired);
    }

    #[tokio::test]
    async fn test_blank_key_fails_without_network() {
        let extractor = extractor_with_key(Some("   "));
        let result = extractor.extract("data:image/png;base64,AAAA").await;
        assert_eq!(result.unwrap_err(), ExtractError::SetupRequired);
    }

    #[test]
    fn test_request_body_shape() {
        let body = request_body("image/jpeg", "abcd");

        assert_eq!(
            body["contents"][0]["parts"][0]["inlineData"]["mimeType"],
            "image/jpeg"
        );
        assert_eq!(body["contents"][0]["parts"][0]["inlineData"]["data"], "abcd");
        assert!(body["contents"][0]["parts"][1]["text"]
            .as_str()
            .unwrap()
            .contains("phone number"));
        assert_eq!(
            body["generationConfig"]["responseMimeType"],
            "application/json"
        );
        assert_eq!(
            body["generationConfig"]["responseSchema"]["required"][0],
            "numbers"
        );
    }

    #[test]
    fn test_parse_response_with_numbers() {
        let body = r#"{
            "candidates": [{
                "content": {
                    "parts": [{
                        "text": "{\"numbers\":[{\"number\":\"+1 555-0100\",\"country\":\"USA\"},{\"number\":\"+81 3-1234-5678\",\"country\":\"Japan\"}],\"summary\":\"two numbers\"}"
                    }]
                }
            }]
        }"#;

        let parsed = parse_response_text(body).unwrap();
        assert_eq!(parsed.numbers.len(), 2);
        assert_eq!(parsed.numbers[0].number, "+1 555-0100");
        assert_eq!(parsed.numbers[0].country, "USA");
        assert_eq!(parsed.numbers[1].country, "Japan");
        assert_eq!(parsed.summary, "two numbers");
    }

    #[test]
    fn test_parse_response_empty_text_is_zero_detections() {
        let cases = [
            r#"{"candidates": []}"#,
            r#"{"candidates": [{"content": {"parts": []}}]}"#,
            r#"{"candidates": [{"content": {"parts": [{"text": "  "}]}}]}"#,
            r#"{"candidates": [{}]}"#,
        ];
        for body in cases {
            let parsed = parse_response_text(body).unwrap();
            assert!(parsed.numbers.is_empty(), "case: {}", body);
            assert_eq!(parsed.summary, "");
        }
    }

    #[test]
    fn test_parse_response_concatenates_parts() {
        let body = r#"{
            "candidates": [{
                "content": {
                    "parts": [
                        {"text": "{\"numbers\":["},
                        {"text": "{\"number\":\"+49 30 901820\",\"country\":\"Germany\"}]}"}
                    ]
                }
            }]
        }"#;

        let parsed = parse_response_text(body).unwrap();
        assert_eq!(parsed.numbers.len(), 1);
        assert_eq!(parsed.numbers[0].country, "Germany");
    }

    #[test]
    fn test_parse_response_malformed_json_fails() {
        assert!(parse_response_text("not json").is_err());

        let body = r#"{"candidates": [{"content": {"parts": [{"text": "not json"}]}}]}"#;
        assert!(matches!(
            parse_response_text(body).unwrap_err(),
            ExtractError::Failed(_)
        ));
    }

    #[test]
    fn test_provider_error_message() {
        let body = r#"{"error": {"code": 429, "message": "Quota exceeded", "status": "RESOURCE_EXHAUSTED"}}"#;
        assert_eq!(
            provider_error_message(body).unwrap(),
            "RESOURCE_EXHAUSTED Quota exceeded"
        );
        assert!(provider_error_message("not json").is_none());
    }
}
