use serde::Deserialize;

use crate::keycloak::errors::ProviderError;
use crate::utils::constants::MISSING_IDENTIFIER;

/// Access token issued by a client-credentials exchange.
#[derive(Debug, Clone, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    /// Lifetime in seconds as reported by the provider.
    #[serde(default)]
    pub expires_in: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Group {
    pub id: String,
    pub name: String,
}

impl Group {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Member record as listed by the provider. Only the email is used.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct Member {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl Member {
    pub fn with_email(email: impl Into<String>) -> Self {
        Self {
            username: None,
            email: Some(email.into()),
        }
    }

    /// Canonical identifier: the email, or `"None"` when the provider has none.
    pub fn identifier(&self) -> String {
        self.email
            .clone()
            .unwrap_or_else(|| MISSING_IDENTIFIER.to_owned())
    }
}

/// Remote operations consumed from the identity provider.
///
/// Implementations carry their own realm and client credentials.
pub trait IdentityProvider: Send + Sync {
    fn authenticate(
        &self,
    ) -> impl std::future::Future<Output = Result<AccessToken, ProviderError>> + Send;

    fn list_groups(
        &self,
        token: &str,
    ) -> impl std::future::Future<Output = Result<Vec<Group>, ProviderError>> + Send;

    fn list_group_members(
        &self,
        token: &str,
        group_id: &str,
    ) -> impl std::future::Future<Output = Result<Vec<Member>, ProviderError>> + Send;
}
