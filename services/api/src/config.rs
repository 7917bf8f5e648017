use secrecy::SecretString;
use std::net::SocketAddr;
use std::str::FromStr;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingVar(String),
    #[error("Invalid value for environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Defines the supported hosted model providers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Provider {
    OpenAI,
    Google,
}

impl Provider {
    /// Base URL of the provider's OpenAI-compatible chat completions API.
    pub fn default_api_base(&self) -> &'static str {
        match self {
            Provider::OpenAI => "https://api.openai.com/v1",
            Provider::Google => "https://generativelanguage.googleapis.com/v1beta/openai",
        }
    }
}

impl FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(Provider::OpenAI),
            "google" | "google-gla" | "gemini" => Ok(Provider::Google),
            other => Err(format!("'{}' is not a supported provider", other)),
        }
    }
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub provider: Provider,
    pub api_key: SecretString,
    pub api_base: String,
    pub chat_model: String,
    pub log_level: Level,
}

/// Reads a variable, treating unset and whitespace-only values alike.
fn non_blank_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn first_non_blank_var(names: &[&str]) -> Option<String> {
    names.iter().find_map(|name| non_blank_var(name))
}

/// Splits a `provider:model` spec.
fn parse_provider_spec(spec: &str) -> Result<(Provider, String), ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidValue("LLM_PROVIDER_SPEC".to_string(), reason);

    let (provider, model) = spec
        .split_once(':')
        .ok_or_else(|| invalid(format!("'{}' is not of the form provider:model", spec)))?;
    let model = model.trim();
    if model.is_empty() {
        return Err(invalid(format!("'{}' has an empty model name", spec)));
    }
    let provider = provider.trim().parse::<Provider>().map_err(invalid)?;
    Ok((provider, model.to_string()))
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        let bind_address_str =
            non_blank_var("BIND_ADDRESS").unwrap_or_else(|| "0.0.0.0:8000".to_string());
        let bind_address = bind_address_str
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string()))?;

        let api_key = first_non_blank_var(&["LLM_API_KEY", "OPENAI_API_KEY", "GOOGLE_API_KEY"])
            .ok_or_else(|| {
                ConfigError::MissingVar(
                    "LLM_API_KEY (or OPENAI_API_KEY / GOOGLE_API_KEY) must be set".to_string(),
                )
            })?;

        let model = first_non_blank_var(&["LLM_MODEL", "OPENAI_MODEL"]).ok_or_else(|| {
            ConfigError::MissingVar("LLM_MODEL (or OPENAI_MODEL) must be set".to_string())
        })?;

        let (provider, chat_model) = match non_blank_var("LLM_PROVIDER_SPEC") {
            Some(spec) => parse_provider_spec(&spec)?,
            None => {
                let provider_str =
                    non_blank_var("LLM_PROVIDER").unwrap_or_else(|| "openai".to_string());
                let provider = provider_str
                    .parse::<Provider>()
                    .map_err(|e| ConfigError::InvalidValue("LLM_PROVIDER".to_string(), e))?;
                (provider, model)
            }
        };

        let api_base = non_blank_var("LLM_API_BASE")
            .unwrap_or_else(|| provider.default_api_base().to_string());

        let log_level_str = non_blank_var("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        Ok(Self {
            bind_address,
            provider,
            api_key: SecretString::from(api_key),
            api_base,
            chat_model,
            log_level,
        })
    }
}
