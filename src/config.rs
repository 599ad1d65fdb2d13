use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::ui::DEFAULT_PAGE_SIZE;

/// Settings read from `<config dir>/fleetconsole/config.toml`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    pub page_size: usize,

    /// `parentPath` for new users when no organization is selected
    pub default_parent_path: String,

    pub timeout_secs: u64,

    pub vim: bool,

    /// Send the selected organization with searches and page changes
    pub keep_org_filter_on_search: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: None,
            token: None,
            page_size: DEFAULT_PAGE_SIZE,
            default_parent_path: "/3/".to_string(),
            timeout_secs: 30,
            vim: false,
            keep_org_filter_on_search: false,
            log_file: None,
        }
    }
}

/// Values given on the command line; each one wins over the file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub base_url: Option<String>,
    pub token: Option<String>,
    pub page_size: Option<usize>,
    pub vim: bool,
    pub log_file: Option<PathBuf>,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        Ok(config)
    }

    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let mut path = dirs::config_dir().context("Could not find config directory")?;
        path.push("fleetconsole");
        path.push("config.toml");
        Ok(path)
    }

    pub fn apply(&mut self, overrides: Overrides) {
        if let Some(url) = overrides.base_url {
            self.base_url = Some(url);
        }
        if let Some(token) = overrides.token {
            self.token = Some(token);
        }
        if let Some(size) = overrides.page_size {
            self.page_size = size;
        }
        if overrides.vim {
            self.vim = true;
        }
        if let Some(path) = overrides.log_file {
            self.log_file = Some(path);
        }
        self.page_size = self.page_size.max(1);
    }

    /// Base URL to connect to, required from one source or the other
    pub fn require_base_url(&self) -> Result<&str> {
        self.base_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .context("No API URL configured. Pass --url, set FLEET_API_URL, or add base_url to the config file")
    }
}
