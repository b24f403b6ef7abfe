//! Clipboard access - copy numbers out, read images in
//!
//! Uses `arboard` for cross-platform support (Windows, macOS, Linux).
//! The clipboard is opened fresh for each operation to avoid holding
//! resources between events.

use crate::capture::CapturedImage;
use anyhow::{Context, Result};
use arboard::Clipboard;

/// Place a single number string onto the system clipboard
///
/// Common failure cases: no display server (headless Linux), permission
/// denied.
pub fn copy_text(text: &str) -> Result<()> {
    let mut clipboard = Clipboard::new().context("Failed to access clipboard")?;
    clipboard
        .set_text(text)
        .context("Failed to set clipboard text")?;
    Ok(())
}

/// Read image content from the system clipboard
///
/// arboard hands back raw RGBA pixels; they are re-encoded as PNG before
/// transmission since the provider needs a real image format.
pub fn read_image() -> Result<CapturedImage> {
    let mut clipboard = Clipboard::new().context("Failed to access clipboard")?;
    let img = clipboard
        .get_image()
        .context("No image on the clipboard")?;
    CapturedImage::from_rgba(img.width, img.height, &img.bytes)
}
