use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::{AppError, AppResult};

const CONFIG_NAMESPACE: &str = "journey-card";
const STORAGE_KEY_SETTINGS: &str = "elder_journey_settings";

pub const DEFAULT_BASE_URL: &str = "http://localhost:11434/v1";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_CHAT_MODEL: &str = "llama3";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ProviderKind {
    /// Gemini with the key supplied by the process environment.
    #[default]
    #[serde(rename = "GEMINI_ENV")]
    GeminiBuiltin,
    /// Gemini with a key the user entered.
    #[serde(rename = "GEMINI_CUSTOM")]
    GeminiCustomKey,
    /// Any endpoint speaking the OpenAI chat-completions protocol (Ollama, DeepSeek, ...).
    #[serde(rename = "OPENAI")]
    OpenAiCompatible,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderCapability {
    StructuredOutput,
    ChatCompletion,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::GeminiBuiltin => "GEMINI_ENV",
            ProviderKind::GeminiCustomKey => "GEMINI_CUSTOM",
            ProviderKind::OpenAiCompatible => "OPENAI",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "gemini_env" | "gemini" | "builtin" => Some(ProviderKind::GeminiBuiltin),
            "gemini_custom" | "custom" => Some(ProviderKind::GeminiCustomKey),
            "openai" | "ollama" => Some(ProviderKind::OpenAiCompatible),
            _ => None,
        }
    }

    pub fn capability(&self) -> ProviderCapability {
        match self {
            ProviderKind::GeminiBuiltin | ProviderKind::GeminiCustomKey => {
                ProviderCapability::StructuredOutput
            }
            ProviderKind::OpenAiCompatible => ProviderCapability::ChatCompletion,
        }
    }
}

/// Provider settings for a single extraction call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProviderConfig {
    pub provider: ProviderKind,
    pub api_key: String,
    pub base_url: String,
    pub model: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::GeminiBuiltin,
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_GEMINI_MODEL.to_string(),
        }
    }
}

impl ProviderConfig {
    /// Selects another provider and resets the model to that provider's usual
    /// value. A user-edited chat endpoint keeps its model.
    pub fn switch_provider(&mut self, provider: ProviderKind) {
        match provider.capability() {
            ProviderCapability::ChatCompletion => {
                if self.base_url == DEFAULT_BASE_URL {
                    self.model = DEFAULT_CHAT_MODEL.to_string();
                }
            }
            ProviderCapability::StructuredOutput => {
                self.model = DEFAULT_GEMINI_MODEL.to_string();
            }
        }
        self.provider = provider;
    }
}

/// Persisted provider settings: one JSON entry under the app's config namespace.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn default_location() -> AppResult<Self> {
        Ok(Self::at(
            config_directory()?.join(format!("{STORAGE_KEY_SETTINGS}.json")),
        ))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the stored settings, merged field by field over the defaults.
    /// Never fails: a missing or unreadable entry yields
    /// `ProviderConfig::default()`, and an invalid field keeps its default.
    pub fn resolve(&self) -> ProviderConfig {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no stored settings, using defaults");
                return ProviderConfig::default();
            }
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "failed to read settings");
                return ProviderConfig::default();
            }
        };

        let stored = match serde_json::from_str::<Value>(&contents) {
            Ok(Value::Object(stored)) => stored,
            Ok(_) => {
                warn!(path = %self.path.display(), "stored settings are not a JSON object");
                return ProviderConfig::default();
            }
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "failed to parse settings");
                return ProviderConfig::default();
            }
        };

        let mut config = ProviderConfig::default();
        overlay(&stored, "provider", &mut config.provider);
        overlay(&stored, "apiKey", &mut config.api_key);
        overlay(&stored, "baseUrl", &mut config.base_url);
        overlay(&stored, "model", &mut config.model);
        config
    }

    pub fn save(&self, config: &ProviderConfig) -> AppResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(config)
            .map_err(|err| AppError::Configuration(format!("failed to encode settings: {err}")))?;
        fs::write(&self.path, data)?;
        Ok(())
    }
}

/// Replaces `target` with the stored value for `key` when it decodes; a
/// missing or ill-typed value keeps the default.
fn overlay<T: DeserializeOwned>(stored: &Map<String, Value>, key: &str, target: &mut T) {
    let Some(value) = stored.get(key) else {
        return;
    };
    match T::deserialize(value) {
        Ok(decoded) => *target = decoded,
        Err(err) => warn!(key, error = %err, "ignoring invalid stored setting"),
    }
}

pub fn config_directory() -> AppResult<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join(CONFIG_NAMESPACE))
        .ok_or_else(|| {
            AppError::Configuration("unable to determine the configuration directory".to_string())
        })
}
