use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::identity::IdentityProviderConfig;
use crate::keycloak::errors::ProviderError;
use crate::keycloak::provider::{AccessToken, Group, IdentityProvider, Member};

const CLIENT_CREDENTIALS: &str = "client_credentials";
/// Upper bound on pages fetched for one listing.
const MAX_PAGES: usize = 1_000;

/// Keycloak admin REST API, authenticated with the client-credentials grant.
#[derive(Debug, Clone)]
pub struct KeycloakRest {
    config: Arc<IdentityProviderConfig>,
    client: Client,
}

impl KeycloakRest {
    pub fn new(config: &IdentityProviderConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self::with_client(config, client))
    }

    pub fn with_client(config: &IdentityProviderConfig, client: Client) -> Self {
        Self {
            config: Arc::new(config.clone()),
            client,
        }
    }

    fn base_url(&self) -> &str {
        self.config.url.trim_end_matches('/')
    }

    pub fn token_url(&self) -> String {
        format!(
            "{}/realms/{}/protocol/openid-connect/token",
            self.base_url(),
            self.config.realm
        )
    }

    pub fn groups_url(&self) -> String {
        format!("{}/admin/realms/{}/groups", self.base_url(), self.config.realm)
    }

    pub fn members_url(&self, group_id: &str) -> String {
        format!("{}/{}/members", self.groups_url(), group_id)
    }

    /// Walks `first`/`max` pages until a short page comes back.
    ///
    /// A page identical to the previous one means the server ignored `first`;
    /// the listing is complete at that point.
    async fn get_paged<T: DeserializeOwned>(
        &self,
        url: &str,
        token: &str,
        extra: &[(&str, &str)],
    ) -> Result<Vec<T>, ProviderError> {
        let page_size = self.config.page_size.max(1);
        let mut raw: Vec<Value> = Vec::new();
        let mut previous: Option<Vec<Value>> = None;
        let mut first = 0usize;
        for _ in 0..MAX_PAGES {
            let mut query: Vec<(&str, String)> = vec![
                ("first", first.to_string()),
                ("max", page_size.to_string()),
            ];
            query.extend(extra.iter().map(|(k, v)| (*k, v.to_string())));

            let response = self
                .client
                .get(url)
                .bearer_auth(token)
                .query(&query)
                .send()
                .await
                .map_err(|e| ProviderError::from_reqwest(url, e))?;
            let page: Vec<Value> = decode(url, response).await?;
            let received = page.len();
            debug!(url, first, received, "fetched page");

            if previous.as_ref() == Some(&page) {
                warn!(url, first, "server repeated the previous page, stopping");
                return into_items(url, raw);
            }
            let short = received < page_size;
            raw.extend(page.iter().cloned());
            if short {
                return into_items(url, raw);
            }
            previous = Some(page);
            first += received;
        }
        Err(ProviderError::TooManyPages {
            url: url.to_owned(),
            pages: MAX_PAGES,
        })
    }
}

fn into_items<T: DeserializeOwned>(url: &str, raw: Vec<Value>) -> Result<Vec<T>, ProviderError> {
    serde_json::from_value(Value::Array(raw)).map_err(|source| ProviderError::Decode {
        url: url.to_owned(),
        source,
    })
}

async fn decode<T: DeserializeOwned>(url: &str, response: Response) -> Result<T, ProviderError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ProviderError::Status {
            url: url.to_owned(),
            status,
            body,
        });
    }
    response
        .json::<T>()
        .await
        .map_err(|e| ProviderError::from_reqwest(url, e))
}

impl IdentityProvider for KeycloakRest {
    async fn authenticate(&self) -> Result<AccessToken, ProviderError> {
        let url = self.token_url();
        let form = [
            ("grant_type", CLIENT_CREDENTIALS),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
        ];
        let response = self
            .client
            .post(&url)
            .form(&form)
            .send()
            .await
            .map_err(|e| ProviderError::from_reqwest(&url, e))?;
        decode(&url, response).await
    }

    async fn list_groups(&self, token: &str) -> Result<Vec<Group>, ProviderError> {
        self.get_paged(&self.groups_url(), token, &[]).await
    }

    async fn list_group_members(
        &self,
        token: &str,
        group_id: &str,
    ) -> Result<Vec<Member>, ProviderError> {
        self.get_paged(
            &self.members_url(group_id),
            token,
            &[("briefRepresentation", "true")],
        )
        .await
    }
}
