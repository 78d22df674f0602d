//! Shared constants and invariants

pub const DEFAULT_HTTP_TIMEOUT_MS: u64 = 5000;
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// Token TTL stays well below the lifetime Keycloak issues by default.
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 5 * 60;
pub const DEFAULT_GROUPS_TTL_SECS: u64 = 30;
pub const DEFAULT_MEMBERS_TTL_SECS: u64 = 30;

pub const DEFAULT_RESPONSE_TTL_SECS: u64 = 60;
pub const DEFAULT_METRICS_PATH: &str = "/metrics";

/// Identifier recorded for a member without an email.
pub const MISSING_IDENTIFIER: &str = "None";
