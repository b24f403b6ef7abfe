// Extraction module - the request adapter and its domain types
//
// One extraction attempt is one request to the provider: the image payload,
// a fixed instruction, and a response-schema constraint so the model
// returns parseable JSON. The adapter normalizes provider responses and
// errors into `ExtractionResponse` / `ExtractError`; it has no state
// beyond the HTTP client, no retries, and no caching.

pub mod error;
pub mod gemini;

pub use error::ExtractError;
pub use gemini::GeminiExtractor;

use serde::{Deserialize, Serialize};

/// One detected phone number, as reported by the model
///
/// The number is displayed and copied verbatim; there is no local
/// validation of phone-number format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedNumber {
    pub number: String,
    /// Country inferred by the model from formatting and context
    pub country: String,
}

/// The full result of one extraction call
///
/// `numbers` preserves the model's output order. `summary` is requested
/// from the model but not required; it is often empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResponse {
    pub numbers: Vec<ExtractedNumber>,
    #[serde(default)]
    pub summary: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_round_trip_preserves_order() {
        let response = ExtractionResponse {
            numbers: (0..5)
                .map(|i| ExtractedNumber {
                    number: format!("+1 555-010{}", i),
                    country: "USA".to_string(),
                })
                .collect(),
            summary: String::new(),
        };

        let json = serde_json::to_string(&response).unwrap();
        let parsed: ExtractionResponse = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.numbers.len(), 5);
        assert_eq!(parsed, response);
        for (i, entry) in parsed.numbers.iter().enumerate() {
            assert_eq!(entry.number, format!("+1 555-010{}", i));
        }
    }

    #[test]
    fn test_summary_defaults_when_absent() {
        let parsed: ExtractionResponse =
            serde_json::from_str(r#"{"numbers":[{"number":"+44 20 7946 0958","country":"UK"}]}"#)
                .unwrap();
        assert_eq!(parsed.numbers.len(), 1);
        assert_eq!(parsed.summary, "");
    }
}
