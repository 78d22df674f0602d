//! Configuration validation with aggregated errors.
//! - Collects every issue into Vec<String> instead of stopping at the first
//! - Identity-provider connection fields have no defaults and must be set
//! - Cache TTLs: the token TTL must be positive so the token is reused at all

use tracing::{error, info};

use crate::config::identity::{CacheConfig, IdentityProviderConfig};
use crate::config::settings::SettingsConfig;
use crate::config::types::ServiceConfig;
use crate::observability::metrics::get_metrics;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Public entrypoint: returns Ok(()) or Err(Vec<String>) containing all issues.
pub async fn validate_service_config(cfg: &ServiceConfig) -> Result<(), Vec<String>> {
    let mut errors: Vec<String> = Vec::new();

    validate_settings(&cfg.settings, &mut errors);
    validate_identity_provider(&cfg.identity_provider, &mut errors);
    validate_cache(&cfg.cache, &mut errors);

    if errors.is_empty() {
        info!("config valid");
        return Ok(());
    }

    error!("configuration validation errors ({}):", errors.len());
    for e in &errors {
        error!(" - {}", e);
    }
    get_metrics()
        .await
        .config_validation_errors
        .inc_by(errors.len() as u64);
    Err(errors)
}

/// SETTINGS VALIDATION
fn validate_settings(settings: &SettingsConfig, errors: &mut Vec<String>) {
    if settings.server.host.trim().is_empty() {
        errors.push("settings.server.host must not be empty".to_string());
    }
    if settings.server.port.parse::<u16>().is_err() {
        errors.push(format!(
            "settings.server.port '{}' must be an integer in range 0-65535",
            settings.server.port
        ));
    }

    // metrics endpoint start with '/'
    let metrics = &settings.metrics;
    if !metrics.path.starts_with('/') {
        errors.push(format!(
            "settings.metrics.path '{}' must start with '/'",
            metrics.path
        ));
    }

    if let Some(logging) = &settings.logging {
        if !LOG_LEVELS.contains(&logging.level.to_lowercase().as_str()) {
            errors.push(format!(
                "settings.logging.level '{}' invalid; allowed: {:?}",
                logging.level, LOG_LEVELS
            ));
        }
    }

    if settings.response_ttl_seconds == 0 {
        errors.push("settings.response_ttl_seconds must be > 0".to_string());
    }
    if settings.deadline_ms == Some(0) {
        errors.push("settings.deadline_ms must be > 0 when set".to_string());
    }
}

/// IDENTITY PROVIDER VALIDATION
fn validate_identity_provider(idp: &IdentityProviderConfig, errors: &mut Vec<String>) {
    let required = [
        ("url", &idp.url),
        ("realm", &idp.realm),
        ("client_id", &idp.client_id),
        ("client_secret", &idp.client_secret),
    ];
    for (field, value) in required {
        if value.trim().is_empty() {
            errors.push(format!("identity_provider.{} must be set", field));
        }
    }

    if !idp.url.trim().is_empty()
        && !(idp.url.starts_with("http://") || idp.url.starts_with("https://"))
    {
        errors.push(format!(
            "identity_provider.url '{}' must start with http:// or https://",
            idp.url
        ));
    }
    if idp.request_timeout_ms == 0 {
        errors.push("identity_provider.request_timeout_ms must be > 0".to_string());
    }
    if idp.page_size == 0 {
        errors.push("identity_provider.page_size must be > 0".to_string());
    }
}

/// CACHE VALIDATION
fn validate_cache(cache: &CacheConfig, errors: &mut Vec<String>) {
    if cache.token_ttl_seconds == 0 {
        errors.push("cache.token_ttl_seconds must be > 0".to_string());
    }
}
