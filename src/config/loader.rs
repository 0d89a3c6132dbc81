//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::schema::{ApiKey, ProxyConfig};
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

pub(crate) fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
///
/// The credential is resolved from the process environment here, once, so the
/// handler only ever sees the injected value.
pub fn load_config(path: &Path) -> Result<ProxyConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    load_config_str(&content, |name| std::env::var(name).ok())
}

/// Default configuration with the credential taken from the environment.
pub fn default_config() -> Result<ProxyConfig, ConfigError> {
    finish(ProxyConfig::default(), |name| std::env::var(name).ok())
}

/// Parse, resolve and validate configuration text with an explicit env lookup.
pub fn load_config_str<F>(content: &str, env: F) -> Result<ProxyConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let config: ProxyConfig = toml::from_str(content)?;
    finish(config, env)
}

fn finish<F>(mut config: ProxyConfig, env: F) -> Result<ProxyConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    resolve_api_key(&mut config, env);
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Fill `upstream.api_key` from the configured environment variable when the
/// file did not set one.
pub fn resolve_api_key<F>(config: &mut ProxyConfig, env: F)
where
    F: Fn(&str) -> Option<String>,
{
    if config.upstream.api_key.is_some() {
        return;
    }
    config.upstream.api_key = env(&config.upstream.api_key_env).map(ApiKey::new);
}
