//! Extraction error taxonomy
//!
//! Provider failures are classified by matching opaque substrings of the
//! error message. The mapping is not a stable contract with the provider;
//! everything lives in [`ExtractError::classify`] so a format change is a
//! one-place fix. Callers must only branch on the category, never on the
//! message text.

use std::fmt;

/// Rate-limit indicators are checked before every other category so a
/// mixed message ("quota exceeded for this key") still reads as throttling.
const RATE_LIMIT_MARKERS: &[&str] = &[
    "429",
    "rate limit",
    "quota",
    "resource_exhausted",
    "too many requests",
];

const INVALID_KEY_MARKERS: &[&str] = &[
    "api key not valid",
    "api_key_invalid",
    "invalid api key",
    "api key expired",
    "unauthenticated",
    "401",
];

const PERMISSION_MARKERS: &[&str] = &["permission", "forbidden", "403"];

const UNAVAILABLE_MARKERS: &[&str] = &["not found", "404", "unavailable", "overloaded", "503"];

/// Errors a single extraction attempt can end with
///
/// All variants are terminal for the attempt; there is no retry logic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    /// No API credential configured; checked before any network call
    SetupRequired,
    /// The provider rejected the configured credential
    InvalidCredential,
    /// The credential lacks access to the requested model
    PermissionDenied,
    /// The provider is throttling requests
    RateLimited,
    /// The model or endpoint is unavailable
    ModelUnavailable,
    /// Parse, network, or otherwise unclassified failure
    Failed(String),
}

impl ExtractError {
    /// Map a provider error message onto a category
    pub fn classify(message: &str) -> Self {
        let lowered = message.to_lowercase();
        let contains_any = |markers: &[&str]| markers.iter().any(|m| lowered.contains(m));

        if contains_any(RATE_LIMIT_MARKERS) {
            Self::RateLimited
        } else if contains_any(INVALID_KEY_MARKERS) {
            Self::InvalidCredential
        } else if contains_any(PERMISSION_MARKERS) {
            Self::PermissionDenied
        } else if contains_any(UNAVAILABLE_MARKERS) {
            Self::ModelUnavailable
        } else {
            Self::Failed(message.to_string())
        }
    }
}

impl fmt::Display for ExtractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SetupRequired => {
                write!(f, "API key not configured. Set GEMINI_API_KEY and try again")
            }
            Self::InvalidCredential => {
                write!(f, "The provider rejected the configured API key")
            }
            Self::PermissionDenied => {
                write!(f, "The API key does not have access to this model")
            }
            Self::RateLimited => write!(f, "Rate limit reached. Wait a moment and try again"),
            Self::ModelUnavailable => {
                write!(f, "The model is unavailable right now. Try again later")
            }
            Self::Failed(msg) => write!(f, "Image analysis failed: {}", msg),
        }
    }
}

impl std::error::Error for ExtractError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_rate_limit() {
        assert_eq!(
            ExtractError::classify("Resource has been exhausted (e.g. check quota)."),
            ExtractError::RateLimited
        );
        assert_eq!(
            ExtractError::classify("429 Too Many Requests"),
            ExtractError::RateLimited
        );
    }

    #[test]
    fn test_classify_rate_limit_wins_over_other_markers() {
        // Mixed message mentioning both the key and the quota
        assert_eq!(
            ExtractError::classify("API key over quota, permission denied"),
            ExtractError::RateLimited
        );
    }

    #[test]
    fn test_classify_invalid_key() {
        assert_eq!(
            ExtractError::classify("API key not valid. Please pass a valid API key."),
            ExtractError::InvalidCredential
        );
        assert_eq!(
            ExtractError::classify("401 UNAUTHENTICATED"),
            ExtractError::InvalidCredential
        );
    }

    #[test]
    fn test_classify_permission() {
        assert_eq!(
            ExtractError::classify("403 PERMISSION_DENIED"),
            ExtractError::PermissionDenied
        );
    }

    #[test]
    fn test_classify_unavailable() {
        assert_eq!(
            ExtractError::classify("models/nope is not found for API version v1beta"),
            ExtractError::ModelUnavailable
        );
        assert_eq!(
            ExtractError::classify("The model is overloaded. Please try again later."),
            ExtractError::ModelUnavailable
        );
    }

    #[test]
    fn test_classify_generic() {
        let err = ExtractError::classify("connection reset by peer");
        assert_eq!(
            err,
            ExtractError::Failed("connection reset by peer".to_string())
        );
    }

    #[test]
    fn test_messages_are_distinct_per_category() {
        let messages = [
            ExtractError::SetupRequired.to_string(),
            ExtractError::InvalidCredential.to_string(),
            ExtractError::PermissionDenied.to_string(),
            ExtractError::RateLimited.to_string(),
            ExtractError::ModelUnavailable.to_string(),
            ExtractError::Failed("x".to_string()).to_string(),
        ];
        for (i, a) in messages.iter().enumerate() {
            for b in messages.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }
}
