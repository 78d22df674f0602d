//! Errors raised while talking to the identity provider.
//!
//! [`ProviderError`] describes a single failed remote call. [`DirectoryError`]
//! is what the caching client hands to its callers: the provider error
//! wrapped with the operation that failed.

use http::StatusCode;
use thiserror::Error;

/// A single identity-provider round trip that did not succeed.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Connection, TLS or body decoding problem.
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The provider answered with a non-2xx status.
    #[error("{url} responded with {status}: {body}")]
    Status {
        url: String,
        status: StatusCode,
        body: String,
    },

    /// The listing body did not match the expected records.
    #[error("cannot decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// Paging did not terminate.
    #[error("{url} still returned full pages after {pages} pages")]
    TooManyPages { url: String, pages: usize },

    /// The request did not complete within the configured timeout.
    #[error("request to {url} timed out")]
    Timeout { url: String },
}

impl ProviderError {
    pub fn from_reqwest(url: &str, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            ProviderError::Timeout {
                url: url.to_owned(),
            }
        } else {
            ProviderError::Transport {
                url: url.to_owned(),
                source,
            }
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, ProviderError::Timeout { .. })
    }
}

/// Errors returned by [`KeycloakClient`](crate::keycloak::KeycloakClient).
///
/// Every variant is fatal for the resolution it occurred in.
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("client-credentials exchange failed: {0}")]
    AuthenticationFailed(#[source] ProviderError),

    #[error("cannot list groups: {0}")]
    DirectoryUnavailable(#[source] ProviderError),

    #[error("group {0} not exists")]
    GroupNotFound(String),

    #[error("cannot fetch members of group {group}: {source}")]
    MembershipFetchFailed {
        group: String,
        #[source]
        source: ProviderError,
    },

    #[error("{operation} timed out")]
    Timeout { operation: String },
}

impl DirectoryError {
    /// Timeouts are surfaced as their own class regardless of which call hit them.
    pub(crate) fn classify(
        operation: &str,
        error: ProviderError,
        wrap: impl FnOnce(ProviderError) -> DirectoryError,
    ) -> Self {
        if error.is_timeout() {
            DirectoryError::Timeout {
                operation: operation.to_owned(),
            }
        } else {
            wrap(error)
        }
    }
}
