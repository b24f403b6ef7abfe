// CLI module - command-line argument parsing and handlers
//
// With no subcommand, numlens starts the TUI. Subcommands:
// - extract <IMAGE> [--json]: one-shot extraction without the TUI
// - config --show/--reset/--path: configuration management

use crate::config::{Config, VERSION};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// numlens - extract phone numbers from images with Gemini
#[derive(Parser)]
#[command(name = "numlens")]
#[command(version = VERSION)]
#[command(about = "Extract phone numbers from images with Gemini", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run one extraction without the TUI and print the results
    Extract {
        /// Path to the image file
        image: PathBuf,

        /// Print the result as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Manage configuration
    Config {
        /// Show effective configuration
        #[arg(long)]
        show: bool,

        /// Reset config file to defaults
        #[arg(long)]
        reset: bool,

        /// Show config file path
        #[arg(long)]
        path: bool,
    },
}

/// Handle the `config` subcommand
pub fn handle_config(show: bool, reset: bool, path: bool) {
    if path {
        handle_config_path();
    } else if show {
        handle_config_show();
    } else if reset {
        handle_config_reset();
    } else {
        // No flag provided, show usage
        println!("Usage: numlens config [--show|--reset|--path]");
        println!();
        println!("Options:");
        println!("  --show    Display effective configuration");
        println!("  --reset   Reset config file to defaults");
        println!("  --path    Show config file path");
    }
}

fn handle_config_path() {
    match Config::config_path() {
        Some(path) => println!("{}", path.display()),
        None => {
            eprintln!("Error: Could not determine config path");
            std::process::exit(1);
        }
    }
}

fn handle_config_show() {
    let config = Config::load();

    println!("# Effective configuration (env > file > defaults)");
    println!();
    println!(
        "api_key = {}",
        if config.api_key.as_deref().is_some_and(|k| !k.trim().is_empty()) {
            "<set>"
        } else {
            "<not set>"
        }
    );
    println!("model = {:?}", config.model);
    println!("api_base = {:?}", config.api_base);
    println!("timeout_secs = {}", config.timeout_secs);
    println!("log_level = {:?}", config.log_level);
}

fn handle_config_reset() {
    let Some(path) = Config::config_path() else {
        eprintln!("Error: Could not determine config path");
        std::process::exit(1);
    };

    if let Some(parent) = path.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            eprintln!("Error: Could not create config directory: {}", e);
            std::process::exit(1);
        }
    }

    match std::fs::write(&path, Config::default().to_toml()) {
        Ok(()) => println!("Config reset to defaults: {}", path.display()),
        Err(e) => {
            eprintln!("Error: Could not write config file: {}", e);
            std::process::exit(1);
        }
    }
}
