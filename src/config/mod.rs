//! Application configuration

pub mod prompts;

use std::env;

use thiserror::Error;

pub use prompts::builtin as prompts_builtin;

pub const DEFAULT_BASE_URL: &str = "http://10.161.141.2:1234/v1";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("MODEL_NAME is not set; export it or add it to .env")]
    MissingModel,
}

/// Connection settings for the completion service, read once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub base_url: String,
    pub api_key: Option<String>,
    pub model: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary variable source. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let base_url = get("OPENAI_BASE_URL")
            .unwrap_or_else(|| DEFAULT_BASE_URL.into())
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            base_url,
            api_key: get("OPENAI_API_KEY"),
            model: get("MODEL_NAME").ok_or(ConfigError::MissingModel)?,
        })
    }
}
