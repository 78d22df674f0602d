use serde::Deserialize;

use crate::config::identity::{CacheConfig, IdentityProviderConfig};
use crate::config::settings::SettingsConfig;

/// ================================
/// Full service configuration
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct ServiceConfig {
    pub settings: SettingsConfig,
    pub identity_provider: IdentityProviderConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}
