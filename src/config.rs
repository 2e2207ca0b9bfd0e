use crate::constants::{
    API_KEY_PLACEHOLDER, CONFIG_DIR_NAME, GEMINI_API_KEY_ENV, GEMINI_BASE_URL,
    GEMINI_DEFAULT_MODEL, NOTES_DIR_NAME, OLLAMA_BASE_URL, OLLAMA_DEFAULT_MODEL,
    OPENAI_API_KEY_ENV, OPENAI_BASE_URL, OPENAI_DEFAULT_MODEL,
};
use crate::save::SaveMode;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ProviderConfig {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Environment variable consulted before `api_key`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,
    pub base_url: String,
    pub active_model: String,
}

impl ProviderConfig {
    /// Key from the configured environment variable, else the inline key.
    /// Empty values and the sample placeholder count as missing.
    pub fn resolve_api_key(&self) -> Option<String> {
        let from_env = self
            .api_key_env
            .as_deref()
            .and_then(|var| std::env::var(var).ok());

        from_env
            .into_iter()
            .chain(self.api_key.clone())
            .map(|k| k.trim().to_string())
            .find(|k| !k.is_empty() && k != API_KEY_PLACEHOLDER)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub save_mode: SaveMode,
    #[serde(default = "default_notes_dir")]
    pub notes_dir: PathBuf,
    pub active_provider: String,
    pub providers: Vec<ProviderConfig>,
}

fn default_notes_dir() -> PathBuf {
    dirs::document_dir()
        .or_else(dirs::home_dir)
        .map(|d| d.join(NOTES_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from(NOTES_DIR_NAME))
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            save_mode: SaveMode::default(),
            notes_dir: default_notes_dir(),
            active_provider: "Gemini".to_string(),
            providers: vec![
                ProviderConfig {
                    name: "Gemini".to_string(),
                    api_key: None,
                    api_key_env: Some(GEMINI_API_KEY_ENV.to_string()),
                    base_url: GEMINI_BASE_URL.to_string(),
                    active_model: GEMINI_DEFAULT_MODEL.to_string(),
                },
                ProviderConfig {
                    name: "Ollama".to_string(),
                    api_key: None,
                    api_key_env: None,
                    base_url: OLLAMA_BASE_URL.to_string(),
                    active_model: OLLAMA_DEFAULT_MODEL.to_string(),
                },
                ProviderConfig {
                    name: "OpenAI".to_string(),
                    api_key: None,
                    api_key_env: Some(OPENAI_API_KEY_ENV.to_string()),
                    base_url: OPENAI_BASE_URL.to_string(),
                    active_model: OPENAI_DEFAULT_MODEL.to_string(),
                },
            ],
        }
    }
}

impl AppConfig {
    pub fn config_dir() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(CONFIG_DIR_NAME);
        path
    }

    pub fn config_file() -> PathBuf {
        let mut path = Self::config_dir();
        path.push("config.toml");
        path
    }

    pub fn load() -> Self {
        let path = Self::config_file();
        if let Some(config) = Self::load_from(&path) {
            return config;
        }
        let default = Self::default();
        if let Err(e) = default.save_to(&path) {
            tracing::warn!("Could not write default config to {:?}: {}", path, e);
        }
        default
    }

    /// Parses the config at `path`; `None` when missing or malformed.
    pub fn load_from(path: &Path) -> Option<Self> {
        let content = fs::read_to_string(path).ok()?;
        match toml::from_str(&content) {
            Ok(config) => Some(config),
            Err(e) => {
                tracing::warn!("Ignoring malformed config {:?}: {}", path, e);
                None
            }
        }
    }

    pub fn save(&self) -> anyhow::Result<()> {
        self.save_to(&Self::config_file())
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(dir) = path.parent() {
            if !dir.exists() {
                fs::create_dir_all(dir)?;
            }
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content).with_context(|| format!("Failed to write config {:?}", path))?;
        Ok(())
    }

    pub fn get_active_provider(&self) -> Option<&ProviderConfig> {
        self.providers
            .iter()
            .find(|p| p.name == self.active_provider)
    }
}
