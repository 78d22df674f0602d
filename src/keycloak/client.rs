use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use tokio::time::{timeout_at, Duration, Instant};
use tracing::{debug, info, warn};

use crate::cache::TtlCache;
use crate::config::identity::CacheConfig;
use crate::helpers::time::get_instant;
use crate::keycloak::errors::{DirectoryError, ProviderError};
use crate::keycloak::provider::{Group, IdentityProvider};
use crate::observability::metrics::get_metrics;

pub const TOKEN_KEY: &str = "token";
pub const GROUPS_KEY: &str = "groups";

const AUTHENTICATE: &str = "authenticate";
const LIST_GROUPS: &str = "list_groups";
const LIST_GROUP_MEMBERS: &str = "list_group_members";
const RESOLVE: &str = "resolve group members";

pub type GroupDirectory = Arc<HashMap<String, Group>>;

/// Caching front for an [`IdentityProvider`].
///
/// Holds three independent caches: the bearer token, the group directory
/// (name to group) and the member list of every group. Concurrent misses on
/// the same key may each reach the provider; the last writer wins and all of
/// them store equivalent values.
#[derive(Debug)]
pub struct KeycloakClient<P> {
    provider: Arc<P>,
    ttl: CacheConfig,
    tokens: TtlCache<String>,
    groups: TtlCache<GroupDirectory>,
    members: TtlCache<Vec<String>>,
}

impl<P> Clone for KeycloakClient<P> {
    fn clone(&self) -> Self {
        Self {
            provider: self.provider.clone(),
            ttl: self.ttl.clone(),
            tokens: self.tokens.clone(),
            groups: self.groups.clone(),
            members: self.members.clone(),
        }
    }
}

/// Cache key of a group's member list, namespaced away from the other caches.
pub fn group_key(group_name: &str) -> String {
    format!("group-{}", group_name)
}

/// The cached token must die before the provider invalidates it.
pub fn token_ttl(configured: Duration, expires_in: Option<u64>) -> Duration {
    match expires_in {
        Some(lifetime) => configured.min(Duration::from_secs(lifetime.saturating_sub(1))),
        None => configured,
    }
}

impl<P: IdentityProvider> KeycloakClient<P> {
    pub fn new(provider: Arc<P>, ttl: &CacheConfig) -> Self {
        Self {
            provider,
            ttl: ttl.clone(),
            tokens: TtlCache::new("token"),
            groups: TtlCache::new("groups"),
            members: TtlCache::new("group_members"),
        }
    }

    /// Bearer token, from cache or a fresh client-credentials exchange.
    pub async fn get_token(&self) -> Result<String, DirectoryError> {
        if let Some(token) = self.tokens.get(TOKEN_KEY).await {
            return Ok(token);
        }

        debug!("token cache miss, authenticating");
        match observe(AUTHENTICATE, self.provider.authenticate()).await {
            Ok(token) => {
                let ttl = token_ttl(self.ttl.token_ttl(), token.expires_in);
                self.tokens
                    .set(TOKEN_KEY, token.access_token.clone(), ttl)
                    .await;
                info!(ttl_seconds = ttl.as_secs(), "access token refreshed");
                Ok(token.access_token)
            }
            Err(err) => {
                self.tokens.delete(TOKEN_KEY).await;
                warn!(error = %err, "client-credentials exchange failed");
                Err(DirectoryError::classify(
                    AUTHENTICATE,
                    err,
                    DirectoryError::AuthenticationFailed,
                ))
            }
        }
    }

    /// Group name to group mapping, listed at most once per TTL window.
    pub async fn get_groups(&self, token: &str) -> Result<GroupDirectory, DirectoryError> {
        if let Some(groups) = self.groups.get(GROUPS_KEY).await {
            return Ok(groups);
        }

        debug!("group directory cache miss, listing groups");
        match observe(LIST_GROUPS, self.provider.list_groups(token)).await {
            Ok(listed) => {
                let directory: GroupDirectory = Arc::new(
                    listed
                        .into_iter()
                        .map(|group| (group.name.clone(), group))
                        .collect(),
                );
                self.groups
                    .set(GROUPS_KEY, directory.clone(), self.ttl.groups_ttl())
                    .await;
                info!(groups = directory.len(), "group directory refreshed");
                Ok(directory)
            }
            Err(err) => {
                self.groups.delete(GROUPS_KEY).await;
                warn!(error = %err, "listing groups failed");
                Err(DirectoryError::classify(
                    LIST_GROUPS,
                    err,
                    DirectoryError::DirectoryUnavailable,
                ))
            }
        }
    }

    /// Member identifiers of one group, in the order the provider lists them.
    pub async fn get_members(&self, token: &str, group: &Group) -> Result<Vec<String>, DirectoryError> {
        let key = group_key(&group.name);
        if let Some(members) = self.members.get(&key).await {
            return Ok(members);
        }

        debug!(group = %group.name, "group members cache miss");
        match observe(
            LIST_GROUP_MEMBERS,
            self.provider.list_group_members(token, &group.id),
        )
        .await
        {
            Ok(listed) => {
                let members: Vec<String> = listed.iter().map(|member| member.identifier()).collect();
                self.members
                    .set(&key, members.clone(), self.ttl.members_ttl())
                    .await;
                Ok(members)
            }
            Err(err) => {
                self.members.delete(&key).await;
                warn!(group = %group.name, error = %err, "listing group members failed");
                Err(DirectoryError::classify(LIST_GROUP_MEMBERS, err, |source| {
                    DirectoryError::MembershipFetchFailed {
                        group: group.name.clone(),
                        source,
                    }
                }))
            }
        }
    }

    /// Concatenated members of `group_names`, in input order.
    ///
    /// Duplicates across groups are kept. The first unknown group or failed
    /// call aborts the whole batch.
    pub async fn get_group_members(&self, group_names: &[String]) -> Result<Vec<String>, DirectoryError> {
        let token = self.get_token().await?;
        let directory = self.get_groups(&token).await?;

        let mut group_members = Vec::new();
        for name in group_names {
            let group = directory
                .get(name)
                .ok_or_else(|| DirectoryError::GroupNotFound(name.to_owned()))?;
            let members = self.get_members(&token, group).await?;
            group_members.extend(members);
        }

        debug!(
            groups = group_names.len(),
            members = group_members.len(),
            "resolved group members"
        );
        Ok(group_members)
    }

    /// [`get_group_members`](Self::get_group_members) bounded by an upstream deadline.
    pub async fn get_group_members_until(
        &self,
        group_names: &[String],
        deadline: Instant,
    ) -> Result<Vec<String>, DirectoryError> {
        timeout_at(deadline, self.get_group_members(group_names))
            .await
            .map_err(|_| DirectoryError::Timeout {
                operation: RESOLVE.to_owned(),
            })?
    }
}

async fn observe<T>(
    operation: &str,
    call: impl Future<Output = Result<T, ProviderError>>,
) -> Result<T, ProviderError> {
    let metrics = get_metrics().await;
    metrics
        .provider_requests
        .with_label_values(&[operation])
        .inc();
    let start = get_instant();
    let result = call.await;
    metrics
        .provider_duration
        .with_label_values(&[operation])
        .observe(start.elapsed().as_secs_f64());
    if result.is_err() {
        metrics
            .provider_failures
            .with_label_values(&[operation])
            .inc();
    }
    result
}
