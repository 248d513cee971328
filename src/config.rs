use crate::theme::ThemeMode;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

/// Environment variable that overrides `data_path`
pub const DATA_PATH_ENV: &str = "FACILITIES_TUI_DATA";

/// Which edges of the table get a border
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bordered {
    None,
    Right,
    #[default]
    Full,
}

/// Presentation options for the issue table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    pub bordered: Bordered,
    pub hide_header: bool,
    pub force_light: bool,
    /// Show the selection dock below the table
    pub show_dock: bool,
    /// Include a labelled "Deselect" in the dock
    pub show_deselect: bool,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            bordered: Bordered::Full,
            hide_header: false,
            force_light: false,
            show_dock: true,
            show_deselect: true,
        }
    }
}

/// Credentials accepted by the local identity provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path to the JSON document store; empty means the default location
    pub data_path: String,
    /// Store collection that holds issues
    pub collection: String,
    pub theme: ThemeMode,
    /// Tracing filter used when RUST_LOG is unset
    pub log_level: String,
    /// With no accounts, any well-formed email may sign in
    pub accounts: Vec<Account>,
    pub table: TableConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_path: String::new(),
            collection: "issues".to_string(),
            theme: ThemeMode::Dark,
            log_level: "info,facilities_tui=debug".to_string(),
            accounts: Vec::new(),
            table: TableConfig::default(),
        }
    }
}

impl Config {
    pub fn config_dir() -> Option<PathBuf> {
        let home = env::var("HOME").ok()?;
        Some(PathBuf::from(home).join(".facilities-tui"))
    }

    fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("config.json"))
    }

    pub fn load() -> Option<Config> {
        let config_path = Self::config_path()?;
        if !config_path.exists() {
            return None;
        }

        let contents = fs::read_to_string(&config_path).ok()?;
        serde_json::from_str(&contents).ok()
    }

    /// First run has no config file; fall back to defaults
    pub fn load_or_default() -> Config {
        Self::load().unwrap_or_default()
    }

    /// Save the config to disk
    pub fn save(&self) -> anyhow::Result<()> {
        let config_dir = Self::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)?;
        }

        let config_path = Self::config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config path"))?;

        let contents = serde_json::to_string_pretty(self)?;
        fs::write(&config_path, contents)?;

        Ok(())
    }

    /// Resolve the store file: env override, then `data_path`, then the config dir
    pub fn store_path(&self) -> anyhow::Result<PathBuf> {
        if let Ok(path) = env::var(DATA_PATH_ENV) {
            if !path.is_empty() {
                return Ok(PathBuf::from(path));
            }
        }
        if !self.data_path.is_empty() {
            return Ok(PathBuf::from(&self.data_path));
        }
        Self::config_dir()
            .map(|dir| dir.join("issues.json"))
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))
    }

    pub fn session_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("session.json"))
    }

    pub fn log_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("facilities-tui.log"))
    }
}
