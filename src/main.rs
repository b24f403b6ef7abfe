// numlens - extract phone numbers from images with Gemini
//
// Architecture:
// - Capture: file path, clipboard image, or terminal paste converge on one
//   "image acquired" entry point that produces a data URL
// - Extract: one generateContent request per attempt with a fixed prompt
//   and a response-schema constraint; errors classified into a small taxonomy
// - TUI (ratatui): a four-state attempt lifecycle (idle, loading, success,
//   error) with per-result copy-to-clipboard
// - Headless mode: `numlens extract <image>` prints results without the TUI

mod capture;
mod cli;
mod config;
mod extract;
mod logging;
mod tui;

use anyhow::{bail, Result};
use capture::CapturedImage;
use clap::Parser;
use cli::{Cli, Commands};
use config::Config;
use extract::GeminiExtractor;
use logging::{LogBuffer, TuiLogLayer};
use std::path::Path;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Config { show, reset, path }) => {
            cli::handle_config(show, reset, path);
            Ok(())
        }
        Some(Commands::Extract { image, json }) => {
            let config = Config::load();
            init_headless_logging(&config);
            run_extract_once(&config, &image, json).await
        }
        None => {
            // Ensure the config template exists (helps users discover options)
            Config::ensure_config_exists();
            let config = Config::load();

            // In TUI mode logs go to an in-memory buffer; writing them to
            // stdout would garble the alternate screen
            let log_buffer = LogBuffer::new();
            tracing_subscriber::registry()
                .with(env_filter(&config))
                .with(TuiLogLayer::new(log_buffer.clone()))
                .init();

            tracing::info!("Starting TUI (model: {})", config.model);
            tui::run_tui(config, log_buffer).await
        }
    }
}

/// Precedence: RUST_LOG env var > config file > default "info"
fn env_filter(config: &Config) -> EnvFilter {
    let default_filter = format!("numlens={}", config.log_level);
    EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into())
}

fn init_headless_logging(config: &Config) {
    tracing_subscriber::registry()
        .with(env_filter(config))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// One-shot extraction without the TUI
async fn run_extract_once(config: &Config, image: &Path, json: bool) -> Result<()> {
    let captured = CapturedImage::from_file(image)?;
    tracing::debug!("Captured {}", captured.preview_label());

    let extractor = GeminiExtractor::from_config(config)?;
    let response = match extractor.extract(&captured.data_url).await {
        Ok(response) => response,
        Err(e) => bail!("{}", e),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    if response.numbers.is_empty() {
        println!("No phone numbers detected in this image");
        return Ok(());
    }

    for (i, entry) in response.numbers.iter().enumerate() {
        println!("{:>2}. {}  ({})", i + 1, entry.number, entry.country);
    }
    if !response.summary.is_empty() {
        println!();
        println!("{}", response.summary);
    }
    Ok(())
}
