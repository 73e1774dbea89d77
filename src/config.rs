//! Configuration for Telegram API credentials and the session files
//!
//! Loads configuration from config.yml, with environment variables
//! (and a local `.env`) taking precedence.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// Default constants (fallback if config.yml not found)
pub const CONFIG_FILE: &str = "config.yml";
pub const SESSION_NAME: &str = "clone_chat";
pub const LOCK_SUFFIX: &str = ".lock";

/// Chat entity types
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum ChatEntity {
    /// Channel or supergroup by bare ID
    Channel(i64),
    /// Basic group chat by bare ID
    Chat(i64),
    /// User or public chat by username (without @)
    Username(String),
    /// User by ID
    UserId(i64),
}

impl ChatEntity {
    pub fn channel(id: i64) -> Self {
        ChatEntity::Channel(id)
    }

    pub fn chat(id: i64) -> Self {
        ChatEntity::Chat(id)
    }

    pub fn username(name: &str) -> Self {
        let name = name.strip_prefix('@').unwrap_or(name);
        ChatEntity::Username(name.to_string())
    }

    pub fn user_id(id: i64) -> Self {
        ChatEntity::UserId(id)
    }
}

impl fmt::Display for ChatEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatEntity::Channel(id) => write!(f, "channel {}", id),
            ChatEntity::Chat(id) => write!(f, "group {}", id),
            ChatEntity::Username(name) => write!(f, "@{}", name),
            ChatEntity::UserId(id) => write!(f, "user {}", id),
        }
    }
}

/// YAML config structures
#[derive(Debug, Default, Deserialize)]
struct YamlConfig {
    telegram: Option<TelegramConfig>,
}

#[derive(Debug, Default, Deserialize)]
struct TelegramConfig {
    #[serde(default, deserialize_with = "deserialize_string_or_number")]
    api_id: Option<String>,
    api_hash: Option<String>,
    phone: Option<String>,
    session_name: Option<String>,
}

/// Deserialize a value that can be either a string or a number
fn deserialize_string_or_number<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;
    let value: Option<serde_yaml::Value> = Option::deserialize(deserializer)?;
    match value {
        None => Ok(None),
        Some(serde_yaml::Value::String(s)) => Ok(Some(s)),
        Some(serde_yaml::Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(D::Error::custom(format!(
            "expected string or number, got {:?}",
            other
        ))),
    }
}

/// Load .env file into environment variables using dotenvy, falling back to
/// the parent directory. Variables already set in the process win.
pub fn load_dotenv() {
    if dotenvy::dotenv().is_err() {
        let _ = dotenvy::from_filename("../.env");
    }
}

/// Main configuration struct
#[derive(Debug, Clone)]
pub struct Config {
    pub phone: String,
    pub api_id: i32,
    pub api_hash: String,
    pub session_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Self::defaults()
    }
}

impl Config {
    /// Load configuration from `path`, falling back to defaults when the
    /// file does not exist. A file that exists but fails to parse is an error.
    ///
    /// Reads the process environment as it is; call [`load_dotenv`] first to
    /// pick up a `.env` file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::from_yaml(YamlConfig::default()));
        }

        Self::load_from_file(path)
    }

    /// Load configuration from a specific file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            Error::Config(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        // An empty file deserializes to unit, not to a mapping
        let yaml: YamlConfig = if content.trim().is_empty() {
            YamlConfig::default()
        } else {
            serde_yaml::from_str(&content)?
        };

        Ok(Self::from_yaml(yaml))
    }

    fn from_yaml(yaml: YamlConfig) -> Self {
        let telegram = yaml.telegram.unwrap_or_default();

        Self {
            api_id: Self::resolve_env_i32(telegram.api_id, "TELEGRAM_API_ID"),
            api_hash: Self::resolve_env_string(telegram.api_hash, "TELEGRAM_API_HASH"),
            phone: Self::resolve_env_string(telegram.phone, "TELEGRAM_PHONE"),
            session_name: telegram
                .session_name
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| SESSION_NAME.to_string()),
        }
    }

    /// Resolve a value: prefer env var if config value looks like ${VAR}
    fn resolve_env_string(value: Option<String>, env_key: &str) -> String {
        if let Some(var_name) = value.as_deref().and_then(placeholder) {
            if let Ok(env_val) = std::env::var(var_name) {
                return env_val;
            }
        }
        if let Ok(env_val) = std::env::var(env_key) {
            return env_val;
        }
        match value {
            Some(v) if placeholder(&v).is_some() => String::new(),
            Some(v) => v,
            None => String::new(),
        }
    }

    /// Resolve an integer value; a literal number in YAML wins over the env var
    fn resolve_env_i32(value: Option<String>, env_key: &str) -> i32 {
        if let Some(ref v) = value {
            if let Some(var_name) = placeholder(v) {
                if let Some(parsed) = std::env::var(var_name)
                    .ok()
                    .and_then(|s| s.parse::<i32>().ok())
                {
                    return parsed;
                }
            }
            if let Ok(parsed) = v.parse::<i32>() {
                return parsed;
            }
        }
        std::env::var(env_key)
            .ok()
            .and_then(|s| s.parse::<i32>().ok())
            .unwrap_or(0)
    }

    /// Create config with empty defaults
    fn defaults() -> Self {
        Self {
            phone: String::new(),
            api_id: 0,
            api_hash: String::new(),
            session_name: SESSION_NAME.to_string(),
        }
    }

    /// Path of the Telegram session file
    pub fn session_file(&self) -> String {
        format!("{}.session", self.session_name)
    }

    /// Path of the lock file guarding the session
    pub fn lock_file(&self) -> String {
        format!("{}{}", self.session_name, LOCK_SUFFIX)
    }

    /// Whether API credentials are present
    pub fn has_credentials(&self) -> bool {
        self.api_id != 0 && !self.api_hash.is_empty()
    }
}

/// Extract `VAR` from a `${VAR}` placeholder
fn placeholder(value: &str) -> Option<&str> {
    value
        .strip_prefix("${")
        .and_then(|rest| rest.strip_suffix('}'))
        .filter(|name| !name.is_empty())
}
