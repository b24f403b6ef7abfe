//! Data URL handling for image payloads
//!
//! Captured images travel through the app as data URLs
//! (`data:<mime>;base64,<payload>`), the same shape the provider's inline
//! image API expects. Parsing is deliberately lenient: a malformed header
//! falls back to a generic image type instead of failing the attempt.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::path::Path;

/// MIME type assumed when the data URL carries no usable header
pub const DEFAULT_MIME: &str = "image/png";

/// Build a data URL from raw image bytes
pub fn encode(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

/// Extract the MIME type from a data URL prefix
///
/// Returns the content between `data:` and the first `;` when both are
/// present and non-empty, otherwise [`DEFAULT_MIME`].
pub fn mime_type(data_url: &str) -> &str {
    data_url
        .strip_prefix("data:")
        .and_then(|rest| rest.split_once(';'))
        .map(|(mime, _)| mime)
        .filter(|mime| !mime.is_empty())
        .unwrap_or(DEFAULT_MIME)
}

/// Strip the encoding header and return the base64 payload
///
/// Everything after the first `,` is the payload. A string without a header
/// is returned unchanged so a bare base64 blob still works.
pub fn payload(data_url: &str) -> &str {
    data_url
        .split_once(',')
        .map(|(_, payload)| payload)
        .unwrap_or(data_url)
}

/// Approximate decoded size of the payload in bytes
///
/// Base64 encodes 3 bytes into 4 characters; good enough for a preview
/// label, so padding is ignored.
pub fn payload_size(data_url: &str) -> usize {
    payload(data_url).len() / 4 * 3
}

/// Guess a MIME type from a file extension
pub fn mime_for_path(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .as_deref()
    {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",
        _ => DEFAULT_MIME,
    }
}
