use crate::error::ConfigError;
use regex::{Captures, Regex};
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

fn default_db_path() -> String {
    "sqlite://DATA/intelligence_platform.db".into()
}

fn default_model() -> String {
    "gemini-2.5-flash".into()
}

fn default_endpoint() -> String {
    "https://generativelanguage.googleapis.com/v1beta".into()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    2
}

fn default_retry_delay_ms() -> u64 {
    1000
}

/// Replace every match of `re` using `lookup`, stopping at the first failure.
fn replace_all<F>(re: &Regex, text: &str, mut lookup: F) -> Result<String, ConfigError>
where
    F: FnMut(&Captures<'_>) -> Result<String, ConfigError>,
{
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for caps in re.captures_iter(text) {
        let Some(m) = caps.get(0) else { continue };
        out.push_str(&text[last..m.start()]);
        out.push_str(&lookup(&caps)?);
        last = m.end();
    }
    out.push_str(&text[last..]);
    Ok(out)
}

/// Expand `$ENV{NAME}` and `$FILE{path}` placeholders.
fn expand_placeholders(text: &str) -> Result<String, ConfigError> {
    let env_re = Regex::new(r"\$ENV\{([^}]+)\}").map_err(|e| ConfigError::Invalid(e.to_string()))?;
    let file_re =
        Regex::new(r"\$FILE\{([^}]+)\}").map_err(|e| ConfigError::Invalid(e.to_string()))?;

    let text = replace_all(&env_re, text, |caps| {
        std::env::var(&caps[1])
            .map_err(|_| ConfigError::Invalid(format!("environment variable {} is not set", &caps[1])))
    })?;
    replace_all(&file_re, &text, |caps| {
        std::fs::read_to_string(&caps[1])
            .map(|s| s.trim_end().to_string())
            .map_err(|_| ConfigError::FileNotFound(caps[1].to_string()))
    })
}

#[derive(Deserialize, Clone, Debug)]
pub struct Config {
    #[serde(default = "default_db_path")]
    pub db_path: String,
    /// Account database; shares `db_path` when unset.
    #[serde(default)]
    pub auth_db_path: Option<String>,
    #[serde(default)]
    pub assistant: Option<AssistantConfig>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct AssistantConfig {
    pub api_key: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

impl AssistantConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: default_model(),
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            auth_db_path: None,
            assistant: None,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, a placeholder cannot be
    /// resolved, or the TOML is malformed.
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound(path.to_string()))?;
        Self::from_toml(&text)
    }

    /// Parse configuration text, expanding placeholders first.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let text = expand_placeholders(text)?;
        let cfg: Config =
            toml::from_str(&text).map_err(|e| ConfigError::Invalid(e.message().to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.db_path.trim().is_empty() {
            return Err(ConfigError::MissingField("db_path"));
        }
        if let Some(assistant) = &self.assistant {
            if assistant.api_key.trim().is_empty() {
                return Err(ConfigError::MissingField("assistant.api_key"));
            }
            if assistant.timeout_secs == 0 {
                return Err(ConfigError::Invalid(
                    "assistant.timeout_secs must be greater than zero".into(),
                ));
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn auth_db_path(&self) -> &str {
        self.auth_db_path.as_deref().unwrap_or(&self.db_path)
    }
}
