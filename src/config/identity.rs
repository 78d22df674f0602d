use std::fmt;
use std::time::Duration;

use serde::Deserialize;

use crate::utils::constants::{
    DEFAULT_GROUPS_TTL_SECS, DEFAULT_HTTP_TIMEOUT_MS, DEFAULT_MEMBERS_TTL_SECS, DEFAULT_PAGE_SIZE,
    DEFAULT_TOKEN_TTL_SECS,
};

/// ================================
/// Identity provider (Keycloak)
/// ================================
///
/// None of the connection fields have defaults; an empty value is rejected
/// at startup.
#[derive(Deserialize, Clone)]
pub struct IdentityProviderConfig {
    pub url: String,
    pub realm: String,
    pub client_id: String,
    pub client_secret: String,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

impl fmt::Debug for IdentityProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentityProviderConfig")
            .field("url", &self.url)
            .field("realm", &self.realm)
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .field("request_timeout_ms", &self.request_timeout_ms)
            .field("page_size", &self.page_size)
            .finish()
    }
}

/// ================================
/// Cache TTLs
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct CacheConfig {
    /// must stay below the token lifetime issued by the provider
    #[serde(default = "default_token_ttl_seconds")]
    pub token_ttl_seconds: u64,
    #[serde(default = "default_groups_ttl_seconds")]
    pub groups_ttl_seconds: u64,
    #[serde(default = "default_members_ttl_seconds")]
    pub members_ttl_seconds: u64,
}

impl CacheConfig {
    pub fn token_ttl(&self) -> Duration {
        Duration::from_secs(self.token_ttl_seconds)
    }

    pub fn groups_ttl(&self) -> Duration {
        Duration::from_secs(self.groups_ttl_seconds)
    }

    pub fn members_ttl(&self) -> Duration {
        Duration::from_secs(self.members_ttl_seconds)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            token_ttl_seconds: DEFAULT_TOKEN_TTL_SECS,
            groups_ttl_seconds: DEFAULT_GROUPS_TTL_SECS,
            members_ttl_seconds: DEFAULT_MEMBERS_TTL_SECS,
        }
    }
}

fn default_request_timeout_ms() -> u64 {
    DEFAULT_HTTP_TIMEOUT_MS
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn default_token_ttl_seconds() -> u64 {
    DEFAULT_TOKEN_TTL_SECS
}

fn default_groups_ttl_seconds() -> u64 {
    DEFAULT_GROUPS_TTL_SECS
}

fn default_members_ttl_seconds() -> u64 {
    DEFAULT_MEMBERS_TTL_SECS
}
