// Capture module - turning user input into an image payload
//
// Three triggers can produce an image: a file path, the system clipboard,
// and a terminal paste gesture. All of them converge on `CapturedImage` so
// the rest of the app has a single "image acquired" entry point regardless
// of where the bytes came from.

pub mod data_url;

use anyhow::{anyhow, Context, Result};
use std::fmt;
use std::io::Cursor;
use std::path::Path;

/// Where a captured image came from, for the preview label
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureSource {
    /// Image read from a local file (display name of the file)
    File(String),
    /// Image read from the system clipboard
    Clipboard,
    /// Image carried by a terminal paste gesture
    Paste,
}

impl fmt::Display for CaptureSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(name) => write!(f, "file {}", name),
            Self::Clipboard => write!(f, "clipboard"),
            Self::Paste => write!(f, "paste"),
        }
    }
}

/// An image ready to be sent to the extraction adapter
#[derive(Debug, Clone)]
pub struct CapturedImage {
    /// The image as a `data:<mime>;base64,` URL
    pub data_url: String,
    /// Which trigger produced the image
    pub source: CaptureSource,
}

impl CapturedImage {
    /// Read an image file fully into memory and encode it
    ///
    /// The MIME type is guessed from the file extension; the bytes are not
    /// inspected. The provider tolerates a wrong guess for common formats.
    pub fn from_file(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read image file {}", path.display()))?;
        if bytes.is_empty() {
            return Err(anyhow!("Image file {} is empty", path.display()));
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Ok(Self {
            data_url: data_url::encode(data_url::mime_for_path(path), &bytes),
            source: CaptureSource::File(name),
        })
    }

    /// Encode raw RGBA pixels (as returned by the clipboard) into a PNG data URL
    pub fn from_rgba(width: usize, height: usize, rgba: &[u8]) -> Result<Self> {
        let buffer = image::RgbaImage::from_raw(width as u32, height as u32, rgba.to_vec())
            .ok_or_else(|| anyhow!("Clipboard image has inconsistent dimensions"))?;

        let mut png = Vec::new();
        image::DynamicImage::ImageRgba8(buffer)
            .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
            .context("Failed to encode clipboard image as PNG")?;

        Ok(Self {
            data_url: data_url::encode("image/png", &png),
            source: CaptureSource::Clipboard,
        })
    }

    /// Interpret pasted text as an image
    ///
    /// A pasted data URL is taken as-is; anything else is treated as a file
    /// path. This is how terminals deliver both drag-and-drop and copied
    /// paths.
    pub fn from_pasted(text: &str) -> Result<Self> {
        let text = text.trim();
        if text.is_empty() {
            return Err(anyhow!("Pasted text is empty"));
        }

        if text.starts_with("data:") {
            return Ok(Self {
                data_url: text.to_string(),
                source: CaptureSource::Paste,
            });
        }

        // Terminals often wrap dragged paths in quotes
        let path = text.trim_matches('\'').trim_matches('"');
        let mut captured = Self::from_file(Path::new(path))?;
        captured.source = CaptureSource::Paste;
        Ok(captured)
    }

    /// One-line summary shown where a browser would show a thumbnail
    pub fn preview_label(&self) -> String {
        format!(
            "{} · {} · {}",
            self.source,
            data_url::mime_type(&self.data_url),
            format_size(data_url::payload_size(&self.data_url)),
        )
    }
}

/// Human-readable byte size for the preview label
fn format_size(bytes: usize) -> String {
    if bytes >= 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else if bytes >= 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{} B", bytes)
    }
}
