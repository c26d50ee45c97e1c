// src/config.rs
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

pub const CONFIG_PATH_ENV: &str = "RESUME_TAILOR_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config.yaml";

/// Remote AI settings. Stored under `aiConfig` with camelCase keys; the
/// YAML file may use snake_case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AiConfig {
    #[serde(alias = "api_key")]
    pub api_key: Option<String>,
    pub model: String,
    #[serde(alias = "max_tokens")]
    pub max_tokens: u32,
    pub temperature: f32,
    #[serde(alias = "base_url")]
    pub base_url: String,
    #[serde(alias = "timeout_seconds")]
    pub timeout_seconds: u64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gpt-4".to_string(),
            max_tokens: 2000,
            temperature: 0.7,
            base_url: "https://api.openai.com/v1".to_string(),
            timeout_seconds: 60,
        }
    }
}

impl AiConfig {
    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|key| !key.trim().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub database_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("data/resume_tailor.db"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub address: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub ai: AiConfig,
    pub storage: StorageConfig,
    pub server: ServerConfig,
    pub log_file: Option<PathBuf>,
}

/// Where the loaded configuration came from. Loading happens before the
/// subscriber is installed, so the caller logs this afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    Defaults(PathBuf),
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::File(path) => write!(f, "Loaded configuration from {}", path.display()),
            ConfigSource::Defaults(path) => {
                write!(f, "No configuration file at {}, using defaults", path.display())
            }
        }
    }
}

impl AppConfig {
    /// Defaults, then the YAML file, then environment overrides.
    pub fn load() -> Result<(Self, ConfigSource)> {
        let path = std::env::var(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));

        let (mut config, source) = Self::load_from(&path)?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok((config, source))
    }

    /// A missing file yields defaults; a malformed one is an error.
    pub fn load_from(path: &Path) -> Result<(Self, ConfigSource)> {
        if !path.exists() {
            return Ok((Self::default(), ConfigSource::Defaults(path.to_path_buf())));
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: Self = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        Ok((config, ConfigSource::File(path.to_path_buf())))
    }

    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("OPENAI_API_KEY") {
            self.ai.api_key = Some(key);
        }
        if let Some(model) = lookup("AI_MODEL") {
            self.ai.model = model;
        }
        if let Some(base_url) = lookup("AI_BASE_URL") {
            self.ai.base_url = base_url;
        }
        if let Some(path) = lookup("DATABASE_PATH") {
            self.storage.database_path = PathBuf::from(path);
        }
        if let Some(port) = lookup("PORT") {
            self.server.port = port
                .parse()
                .with_context(|| format!("Invalid PORT value: {}", port))?;
        }
        Ok(())
    }

    /// Database path made absolute against the working directory.
    pub fn database_path(&self) -> Result<PathBuf> {
        resolve_path(&self.storage.database_path)
    }
}

fn resolve_path(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        let current_dir = std::env::current_dir().context("Failed to get current directory")?;
        Ok(current_dir.join(path))
    }
}
