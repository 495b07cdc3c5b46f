//! Configuration management for tempus.
//!
//! Configuration is loaded from multiple sources and merged:
//! 1. Global config: `~/.config/tempus/config.json`
//! 2. Project config: `tempus.json` in the project root
//!
//! Later sources override earlier ones.

use crate::error::{ConfigError, CoreResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Author label recorded when initializing a project.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    /// Log level.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<LogLevel>,
}

/// Log levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Directive fragment for building a tracing filter.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// Loading order (later sources override earlier):
    /// 1. Global config from `~/.config/tempus/`
    /// 2. Project config from the project root
    ///
    /// Returns the merged config together with the paths that contributed
    /// to it.
    pub async fn load(project_dir: Option<&Path>) -> CoreResult<(Self, Vec<PathBuf>)> {
        let mut config = Config::default();
        let mut sources = Vec::new();

        // 1. Load global config
        if let Some(global_dir) = Self::global_config_dir() {
            let path = global_dir.join("config.json");
            if path.exists() {
                let loaded = Self::load_file(&path).await?;
                config = config.merge(loaded);
                sources.push(path);
            }
        }

        // 2. Load project config
        if let Some(dir) = project_dir {
            let path = dir.join("tempus.json");
            if path.exists() {
                let loaded = Self::load_file(&path).await?;
                config = config.merge(loaded);
                sources.push(path);
            }
        }

        Ok((config, sources))
    }

    /// Get the global config directory.
    ///
    /// On Unix systems, prefers `~/.config/tempus` (XDG standard) over the
    /// platform-specific directory for better compatibility with other CLI
    /// tools.
    pub fn global_config_dir() -> Option<PathBuf> {
        #[cfg(unix)]
        {
            if let Some(home) = dirs::home_dir() {
                let xdg_config = home.join(".config").join("tempus");
                if xdg_config.exists() {
                    return Some(xdg_config);
                }
            }
        }

        dirs::config_dir().map(|d| d.join("tempus"))
    }

    /// Load configuration from a file.
    pub async fn load_file(path: &Path) -> CoreResult<Self> {
        let content = tokio::fs::read_to_string(path).await?;
        serde_json::from_str(&content).map_err(|e| {
            ConfigError::InvalidJson {
                path: path.display().to_string(),
                message: e.to_string(),
            }
            .into()
        })
    }

    /// Merge with another config, preferring values from `other` if present.
    pub fn merge(mut self, other: Self) -> Self {
        if other.author.is_some() {
            self.author = other.author;
        }
        if other.log_level.is_some() {
            self.log_level = other.log_level;
        }
        self
    }
}
