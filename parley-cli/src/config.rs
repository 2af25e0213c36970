//! CLI configuration
//!
//! Values come from an optional TOML file and are then overridden by
//! `PARLEY_*` environment variables.

use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use parley::context::DEFAULT_TOP_N;
use parley::llm::LlmConfig;
use parley::orchestrator::DEFAULT_RATE_PER_1K;
use serde::{Deserialize, Serialize};

/// Error type for configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid environment variable '{key}': {message}")]
    InvalidEnvVar { key: String, message: String },

    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Json,
    Text,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "text" => Ok(LogFormat::Text),
            other => Err(format!("unknown log format '{other}', expected json/text")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParleyConfig {
    /// SQLite database the data engineering team queries
    pub database_path: PathBuf,
    /// Parent of every session directory
    pub base_dir: PathBuf,
    pub log_format: LogFormat,
    /// Price per 1000 tokens
    pub token_rate: f64,
    /// Tables kept by embedding ranking
    pub context_top_n: usize,
    /// Rank tables with embeddings before word matching
    pub use_embeddings: bool,
    /// HuggingFace `tokenizer.json` for exact token counts
    pub tokenizer_path: Option<PathBuf>,
    pub llm: LlmConfig,
}

impl Default for ParleyConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("parley.db"),
            base_dir: PathBuf::from("agent_results"),
            log_format: LogFormat::default(),
            token_rate: DEFAULT_RATE_PER_1K,
            context_top_n: DEFAULT_TOP_N,
            use_embeddings: true,
            tokenizer_path: None,
            llm: LlmConfig::default(),
        }
    }
}

impl ParleyConfig {
    /// Load `path` if given, then apply the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let base = match path {
            Some(path) => Self::from_toml_file(path)?,
            None => Self::default(),
        };
        base.with_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Ok(toml::from_str(&raw)?)
    }

    /// Apply overrides read through `lookup`.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidEnvVar`] when a variable is set to a value that
    /// does not parse.
    pub fn with_lookup<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup("PARLEY_DATABASE_PATH") {
            self.database_path = PathBuf::from(path);
        }
        if let Some(dir) = lookup("PARLEY_BASE_DIR") {
            self.base_dir = PathBuf::from(dir);
        }
        if let Some(key) = lookup("PARLEY_API_KEY").or_else(|| lookup("OPENAI_API_KEY")) {
            self.llm.api_key = Some(key);
        }
        if let Some(base) = lookup("PARLEY_API_BASE") {
            self.llm.api_base = base;
        }
        if let Some(model) = lookup("PARLEY_MODEL") {
            self.llm.model = model;
        }
        if let Some(path) = lookup("PARLEY_TOKENIZER_PATH") {
            self.tokenizer_path = Some(PathBuf::from(path));
        }
        if let Some(format) = parse_var(&lookup, "PARLEY_LOG_FORMAT")? {
            self.log_format = format;
        }
        if let Some(timeout) = parse_var(&lookup, "PARLEY_REQUEST_TIMEOUT_SECS")? {
            self.llm.timeout_secs = timeout;
        }
        if let Some(rate) = parse_var(&lookup, "PARLEY_TOKEN_RATE")? {
            self.token_rate = rate;
        }
        if let Some(enabled) = parse_bool(&lookup, "PARLEY_USE_EMBEDDINGS")? {
            self.use_embeddings = enabled;
        }
        Ok(self)
    }
}

fn parse_var<F, T>(lookup: &F, key: &str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    match lookup(key) {
        Some(val) => val
            .parse::<T>()
            .map(Some)
            .map_err(|e| ConfigError::InvalidEnvVar {
                key: key.to_string(),
                message: format!("invalid value '{val}': {e}"),
            }),
        None => Ok(None),
    }
}

fn parse_bool<F>(lookup: &F, key: &str) -> Result<Option<bool>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(val) => match val.to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(Some(true)),
            "false" | "0" | "no" | "off" => Ok(Some(false)),
            _ => Err(ConfigError::InvalidEnvVar {
                key: key.to_string(),
                message: format!(
                    "invalid boolean value '{val}', expected true/false/1/0/yes/no/on/off"
                ),
            }),
        },
        None => Ok(None),
    }
}
