//! Global settings loaded from TOML.
//!
//! - `init_custom(toml_content)` sets a custom TOML before first `settings()` call
//! - `settings()` returns `&'static Settings` (lazy-init singleton)
//! - `Settings::open(path)` loads a standalone settings file
//! - Default values are embedded via `include_str!("default_settings.toml")`

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::segmenter::Mode;

pub const DEFAULT_SETTINGS_TOML: &str = include_str!("default_settings.toml");

static CUSTOM_TOML: OnceLock<String> = OnceLock::new();

/// Set custom TOML before first `settings()` call.
pub fn init_custom(toml_content: String) -> Result<(), SettingsError> {
    parse_settings_toml(&toml_content)?;
    CUSTOM_TOML
        .set(toml_content)
        .map_err(|_| SettingsError::AlreadyInitialized)
}

/// Get or initialize the global settings singleton.
pub fn settings() -> &'static Settings {
    static INSTANCE: OnceLock<Settings> = OnceLock::new();
    INSTANCE.get_or_init(|| {
        let toml_str = CUSTOM_TOML
            .get()
            .map(|s| s.as_str())
            .unwrap_or(DEFAULT_SETTINGS_TOML);
        parse_settings_toml(toml_str).expect("settings TOML must be valid")
    })
}

/// Returns the embedded default settings TOML content.
pub fn default_toml() -> &'static str {
    DEFAULT_SETTINGS_TOML
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("TOML parse error: {0}")]
    Parse(String),
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
    #[error("cannot read settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("settings already initialized")]
    AlreadyInitialized,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub tokenizer: TokenizerSettings,
    pub search: SearchSettings,
}

impl Settings {
    pub fn open(path: &Path) -> Result<Self, SettingsError> {
        let content = fs::read_to_string(path)?;
        parse_settings_toml(&content)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TokenizerSettings {
    #[serde(default)]
    pub mode: Mode,
    #[serde(default = "default_discard_punctuation")]
    pub discard_punctuation: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dictionary_path: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_dictionary_path: Option<PathBuf>,
}

fn default_discard_punctuation() -> bool {
    true
}

impl TokenizerSettings {
    /// Command-line arguments for the analysis engine.
    ///
    /// Nodes are requested in full-feature format; dictionary paths are
    /// passed through untouched.
    pub fn analyzer_args(&self) -> Vec<String> {
        let mut args = vec!["--node-format=%H".to_string()];
        if let Some(dir) = &self.dictionary_path {
            args.push(format!("--dicdir={}", dir.display()));
        }
        if let Some(user) = &self.user_dictionary_path {
            args.push(format!("--userdic={}", user.display()));
        }
        args
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchSettings {
    pub kanji_length: usize,
    pub other_length: usize,
    #[serde(default)]
    pub max_expansions: usize,
}

pub fn parse_settings_toml(toml_str: &str) -> Result<Settings, SettingsError> {
    let s: Settings = toml::from_str(toml_str).map_err(|e| SettingsError::Parse(e.to_string()))?;
    validate(&s)?;
    Ok(s)
}

fn validate(s: &Settings) -> Result<(), SettingsError> {
    macro_rules! check_positive_usize {
        ($section:ident . $field:ident) => {
            if s.$section.$field == 0 {
                return Err(SettingsError::InvalidValue {
                    field: concat!(stringify!($section), ".", stringify!($field)).to_string(),
                    reason: "must be positive".to_string(),
                });
            }
        };
    }
    macro_rules! check_non_empty_path {
        ($section:ident . $field:ident) => {
            if s.$section
                .$field
                .as_ref()
                .is_some_and(|p| p.as_os_str().is_empty())
            {
                return Err(SettingsError::InvalidValue {
                    field: concat!(stringify!($section), ".", stringify!($field)).to_string(),
                    reason: "must not be empty".to_string(),
                });
            }
        };
    }

    check_positive_usize!(search.kanji_length);
    check_positive_usize!(search.other_length);
    check_non_empty_path!(tokenizer.dictionary_path);
    check_non_empty_path!(tokenizer.user_dictionary_path);

    // max_expansions = 0 means unbounded, so any value is valid

    Ok(())
}
