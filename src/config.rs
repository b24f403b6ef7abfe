// Configuration module
//
// Configuration is loaded in order of precedence:
// 1. Environment variables (highest priority)
// 2. Config file (~/.config/numlens/config.toml)
// 3. Built-in defaults
//
// The config file is created as a commented template on first run so users
// can discover the options. The API credential is read from process
// configuration only (GEMINI_API_KEY or the config file), never from
// interactive input.

use serde::Deserialize;
use std::path::PathBuf;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default model for phone-number extraction
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Effective application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// API credential; validated at call time by the adapter
    pub api_key: Option<String>,
    /// Model identifier passed to the provider
    pub model: String,
    /// Base URL of the provider REST API
    pub api_base: String,
    /// HTTP client timeout in seconds
    pub timeout_secs: u64,
    /// Default log level when RUST_LOG is unset
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            api_base: crate::extract::gemini::DEFAULT_API_BASE.to_string(),
            timeout_secs: 60,
            log_level: "info".to_string(),
        }
    }
}

/// On-disk config shape; every field optional so partial files work
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub api_base: Option<String>,
    pub timeout_secs: Option<u64>,
    pub log_level: Option<String>,
}

impl Config {
    /// Load configuration: defaults, then file, then environment
    pub fn load() -> Self {
        let mut config = Self::default();

        if let Some(path) = Self::config_path() {
            if let Ok(raw) = std::fs::read_to_string(&path) {
                match toml::from_str::<FileConfig>(&raw) {
                    Ok(file) => config.apply_file(file),
                    Err(e) => {
                        // Logging is not initialized yet; stderr is all we have
                        eprintln!("Warning: ignoring malformed config {}: {}", path.display(), e);
                    }
                }
            }
        }

        config.apply_env();
        config
    }

    /// Overlay values from the config file
    pub fn apply_file(&mut self, file: FileConfig) {
        if let Some(key) = file.api_key {
            self.api_key = Some(key);
        }
        if let Some(model) = file.model {
            self.model = model;
        }
        if let Some(base) = file.api_base {
            self.api_base = base;
        }
        if let Some(secs) = file.timeout_secs {
            self.timeout_secs = secs;
        }
        if let Some(level) = file.log_level {
            self.log_level = level;
        }
    }

    /// Overlay values from environment variables
    fn apply_env(&mut self) {
        if let Ok(key) = std::env::var("GEMINI_API_KEY") {
            self.api_key = Some(key);
        }
        if let Ok(model) = std::env::var("NUMLENS_MODEL") {
            self.model = model;
        }
        if let Ok(base) = std::env::var("NUMLENS_API_BASE") {
            self.api_base = base;
        }
        if let Ok(secs) = std::env::var("NUMLENS_TIMEOUT_SECS") {
            if let Ok(secs) = secs.parse() {
                self.timeout_secs = secs;
            }
        }
        if let Ok(level) = std::env::var("NUMLENS_LOG") {
            self.log_level = level;
        }
    }

    /// Path to the config file, if a config directory can be determined
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("numlens").join("config.toml"))
    }

    /// Render the commented config template
    ///
    /// The credential line stays commented even when a key is set, so a
    /// `config --reset` never writes a secret to disk by accident.
    pub fn to_toml(&self) -> String {
        format!(
            "# numlens configuration\n\
             # Values here are overridden by GEMINI_API_KEY / NUMLENS_* env vars.\n\
             \n\
             # api_key = \"...\"\n\
             model = {:?}\n\
             api_base = {:?}\n\
             timeout_secs = {}\n\
             log_level = {:?}\n",
            self.model, self.api_base, self.timeout_secs, self.log_level
        )
    }

    /// Write the config template if no config file exists yet
    pub fn ensure_config_exists() {
        let Some(path) = Self::config_path() else {
            return;
        };
        if path.exists() {
            return;
        }
        if let Some(parent) = path.parent() {
            if std::fs::create_dir_all(parent).is_err() {
                return;
            }
        }
        if let Err(e) = std::fs::write(&path, Self::default().to_toml()) {
            eprintln!("Warning: could not write config template: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(config.api_key.is_none());
        assert_eq!(config.model, DEFAULT_MODEL);
        assert!(config.api_base.starts_with("https://"));
    }

    #[test]
    fn test_template_round_trips() {
        let toml_str = Config::default().to_toml();
        let parsed: Result<FileConfig, _> = toml::from_str(&toml_str);
        assert!(parsed.is_ok(), "template should parse: {:?}", parsed.err());

        let file = parsed.unwrap();
        // Commented out in the template
        assert!(file.api_key.is_none());
        assert_eq!(file.model.as_deref(), Some(DEFAULT_MODEL));
    }

    #[test]
    fn test_apply_file_overlays_only_present_fields() {
        let mut config = Config::default();
        config.apply_file(FileConfig {
            api_key: Some("file-key".to_string()),
            timeout_secs: Some(10),
            ..Default::default()
        });

        assert_eq!(config.api_key.as_deref(), Some("file-key"));
        assert_eq!(config.timeout_secs, 10);
        // Untouched fields keep their defaults
        assert_eq!(config.model, DEFAULT_MODEL);
    }

    #[test]
    fn test_partial_file_parses() {
        let file: FileConfig = toml::from_str("model = \"gemini-2.5-pro\"").unwrap();
        assert_eq!(file.model.as_deref(), Some("gemini-2.5-pro"));
        assert!(file.api_key.is_none());
    }
}
