//! Configuration types for kist.
//!
//! [`Config::load`] reads `~/.config/kist/config.toml`, creating it with
//! hardcoded defaults if it does not yet exist. [`Config::defaults`] returns
//! the same defaults without touching the filesystem (useful in tests).

use crate::catalog::CatalogRules;
use crate::types::FieldNames;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

// ---------------------------------------------------------------------------
// Embedded defaults
// ---------------------------------------------------------------------------

const DEFAULT_CONFIG: &str = r#"
[engine]
base_url    = "http://localhost:9200"
title_field = "Başlık"
year_field  = "Yayin Yili"
timeout_ms  = 0

[catalog]
system_prefix    = "."
excluded_keyword = "alerts"

[ui]
page_step            = 10
truncate_len         = 300
index_pane_width_pct = 25
theme                = "default"

[keybindings]
query_focus  = "/"
load_more    = "m"
toggle_order = "o"
toggle_field = " "
"#;

// ---------------------------------------------------------------------------
// Public config types
// ---------------------------------------------------------------------------

/// Top-level application configuration, loaded from `~/.config/kist/config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub keybindings: KeybindingsConfig,
}

/// `[engine]` section of `config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_title_field")]
    pub title_field: String,
    #[serde(default = "default_year_field")]
    pub year_field: String,
    /// Per-request timeout in milliseconds. 0 (the default) waits as long
    /// as the engine takes.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_base_url() -> String { "http://localhost:9200".to_string() }
fn default_title_field() -> String { "Başlık".to_string() }
fn default_year_field() -> String { "Yayin Yili".to_string() }
fn default_timeout_ms() -> u64 { 0 }

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            title_field: default_title_field(),
            year_field: default_year_field(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl EngineConfig {
    pub fn fields(&self) -> FieldNames {
        FieldNames {
            title: self.title_field.clone(),
            year: self.year_field.clone(),
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_ms > 0).then(|| Duration::from_millis(self.timeout_ms))
    }
}

/// `[catalog]` section of `config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    #[serde(default = "default_system_prefix")]
    pub system_prefix: String,
    #[serde(default = "default_excluded_keyword")]
    pub excluded_keyword: String,
}

fn default_system_prefix() -> String { ".".to_string() }
fn default_excluded_keyword() -> String { "alerts".to_string() }

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            system_prefix: default_system_prefix(),
            excluded_keyword: default_excluded_keyword(),
        }
    }
}

impl CatalogConfig {
    pub fn rules(&self) -> CatalogRules {
        CatalogRules {
            system_prefix: self.system_prefix.clone(),
            excluded_keyword: self.excluded_keyword.clone(),
        }
    }
}

/// `[ui]` section of `config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_page_step")]
    pub page_step: usize,
    #[serde(default = "default_truncate_len")]
    pub truncate_len: usize,
    #[serde(default = "default_index_pane_width_pct")]
    pub index_pane_width_pct: u16,
    #[serde(default = "default_theme")]
    pub theme: String,
}

fn default_page_step() -> usize { 10 }
fn default_truncate_len() -> usize { 300 }
fn default_index_pane_width_pct() -> u16 { 25 }
fn default_theme() -> String { "default".to_string() }

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            page_step: default_page_step(),
            truncate_len: default_truncate_len(),
            index_pane_width_pct: default_index_pane_width_pct(),
            theme: default_theme(),
        }
    }
}

/// `[keybindings]` section of `config.toml`. Each binding is a single character.
#[derive(Debug, Clone, Deserialize)]
pub struct KeybindingsConfig {
    #[serde(default = "default_query_focus")]
    pub query_focus: String,
    #[serde(default = "default_load_more")]
    pub load_more: String,
    #[serde(default = "default_toggle_order")]
    pub toggle_order: String,
    #[serde(default = "default_toggle_field")]
    pub toggle_field: String,
}

fn default_query_focus() -> String { "/".to_string() }
fn default_load_more() -> String { "m".to_string() }
fn default_toggle_order() -> String { "o".to_string() }
fn default_toggle_field() -> String { " ".to_string() }

impl Default for KeybindingsConfig {
    fn default() -> Self {
        Self {
            query_focus: default_query_focus(),
            load_more: default_load_more(),
            toggle_order: default_toggle_order(),
            toggle_field: default_toggle_field(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::defaults()
    }
}

impl Config {
    /// Load from `~/.config/kist/config.toml`, layered on top of the built-in
    /// defaults. Creates the file with defaults if it does not exist.
    pub fn load() -> anyhow::Result<Self> {
        let path = config_path();

        if !path.exists() {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, DEFAULT_CONFIG.trim_start())?;
        }

        Self::load_from(&path)
    }

    /// Load an explicit file on top of the built-in defaults. The file must exist.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let cfg: Config = config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(config::File::from(path).required(true))
            .build()?
            .try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
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

    fn validate(&self) -> anyhow::Result<()> {
        if self.ui.page_step == 0 {
            anyhow::bail!("ui.page_step must be at least 1");
        }
        if self.engine.title_field.is_empty() || self.engine.year_field.is_empty() {
            anyhow::bail!("engine.title_field and engine.year_field must not be empty");
        }
        Ok(())
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
        .join("kist")
        .join("config.toml")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
