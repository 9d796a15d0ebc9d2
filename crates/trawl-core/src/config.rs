//! Configuration types for trawl.
//!
//! [`Config::load`] reads `~/.config/trawl/config.toml`, creating it with
//! hardcoded defaults if it does not yet exist. [`Config::defaults`] returns
//! the same defaults without touching the filesystem (useful in tests).

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::rank::MatchRank;
use crate::session::SearchSettings;
use crate::types::FieldTypes;

// ---------------------------------------------------------------------------
// Embedded defaults
// ---------------------------------------------------------------------------

const DEFAULT_CONFIG: &str = r#"
[search]
field_types     = ["flag", "rfmo", "vessel"]
async_types     = ["vessel"]
match_threshold = "fuzzy"
untyped_queries = false

[remote]
base_url    = "http://127.0.0.1:8080"
dataset     = "indonesia"
source_type = "vessel"
debounce_ms = 150

[ui]
result_rows = 12
theme       = "default"
"#;

// ---------------------------------------------------------------------------
// Public config types
// ---------------------------------------------------------------------------

/// Top-level application configuration, loaded from `~/.config/trawl/config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub remote: RemoteConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

/// `[search]` section of `config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_field_types")]
    pub field_types: Vec<String>,
    /// Types whose candidates only come from the remote lookup.
    #[serde(default = "default_async_types")]
    pub async_types: Vec<String>,
    /// Weakest match tier still shown.
    #[serde(default = "default_match_threshold")]
    pub match_threshold: MatchRank,
    /// Query the remote service when no token names a field type.
    #[serde(default)]
    pub untyped_queries: bool,
}

fn default_field_types() -> Vec<String> { vec!["flag".into(), "rfmo".into(), "vessel".into()] }
fn default_async_types() -> Vec<String> { vec!["vessel".into()] }
fn default_match_threshold() -> MatchRank { MatchRank::Fuzzy }

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            field_types: default_field_types(),
            async_types: default_async_types(),
            match_threshold: default_match_threshold(),
            untyped_queries: false,
        }
    }
}

/// `[remote]` section of `config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_dataset")]
    pub dataset: String,
    /// Field type given to remote candidates.
    #[serde(default = "default_source_type")]
    pub source_type: String,
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

fn default_base_url() -> String { "http://127.0.0.1:8080".to_string() }
fn default_dataset() -> String { "indonesia".to_string() }
fn default_source_type() -> String { "vessel".to_string() }
fn default_debounce_ms() -> u64 { 150 }

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            dataset: default_dataset(),
            source_type: default_source_type(),
            debounce_ms: default_debounce_ms(),
        }
    }
}

/// `[ui]` section of `config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_result_rows")]
    pub result_rows: u16,
    /// Embedded theme name: `default` or `gruvbox_dark`.
    #[serde(default = "default_theme")]
    pub theme: String,
}

fn default_result_rows() -> u16 { 12 }
fn default_theme() -> String { "default".to_string() }

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            result_rows: default_result_rows(),
            theme: default_theme(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::defaults()
    }
}

impl Config {
    /// Load from `~/.config/trawl/config.toml`, layered on top of the built-in
    /// defaults. Creates the file with defaults if it does not exist.
    pub fn load() -> anyhow::Result<Self> {
        let path = config_path();

        if !path.exists() {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, DEFAULT_CONFIG.trim_start())?;
        }

        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(config::File::from(path.as_path()).required(false))
            .build()?
            .try_deserialize()
            .map_err(Into::into)
    }

    /// Return the built-in defaults without touching the filesystem.
    pub fn defaults() -> Self {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .build()
            .expect("built-in default config must be valid TOML")
            .try_deserialize()
            .expect("built-in default config must deserialize correctly")
    }

    /// Engine settings derived from the `[search]` and `[remote]` sections.
    pub fn settings(&self) -> SearchSettings {
        SearchSettings {
            field_types: FieldTypes::new(
                self.search.field_types.iter().cloned(),
                self.search.async_types.iter().cloned(),
            ),
            source_type: self.remote.source_type.clone(),
            match_threshold: self.search.match_threshold,
            untyped_queries: self.search.untyped_queries,
            remote_enabled: true,
            debounce: Duration::from_millis(self.remote.debounce_ms),
        }
    }
}

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

fn config_path() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".to_string()))
                .join(".config")
        })
        .join("trawl")
        .join("config.toml")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
