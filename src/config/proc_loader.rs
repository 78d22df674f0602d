use std::path::Path;

use regex::{Captures, Regex};
use tracing::{debug, error};

use crate::config::errors::ConfigError;
use crate::config::proc_validator;
use crate::config::settings::LoggingConfig;
use crate::config::types::ServiceConfig;

/// Load and validate config from YAML file
pub async fn file_to_config(path: &Path) -> Result<ServiceConfig, ConfigError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    parse_config(&expand_env_vars(&content)).await
}

pub async fn parse_config(content: &str) -> Result<ServiceConfig, ConfigError> {
    let mut service_config: ServiceConfig = serde_yaml::from_str(content).inspect_err(|e| {
        error!("parse config error: {}", e);
    })?;

    // Apply defaults
    if service_config.settings.logging.is_none() {
        service_config.settings.logging = Some(LoggingConfig::default());
    }

    debug!("validating config ...");
    proc_validator::validate_service_config(&service_config)
        .await
        .map_err(ConfigError::Invalid)?;

    Ok(service_config)
}

/// Replaces `${VAR}` and `${VAR:default}`; unset variables without a default become empty.
pub fn expand_env_vars(input: &str) -> String {
    let re = Regex::new(r"\$\{(\w+)(?::([^\}]+))?\}").expect("env placeholder regex is valid");
    re.replace_all(input, |caps: &Captures| {
        let var = &caps[1];
        let default = caps.get(2).map(|m| m.as_str()).unwrap_or("");
        std::env::var(var).unwrap_or_else(|_| default.to_string())
    })
    .to_string()
}
