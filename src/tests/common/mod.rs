// tests/common/mod.rs
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub use axum::Router;
pub use serde_json::json;
pub use tokio::task::JoinHandle;

use http::StatusCode;

use crate::config::identity::CacheConfig;
use crate::keycloak::{AccessToken, Group, IdentityProvider, KeycloakClient, Member, ProviderError};

/// Spawn an Axum router on an ephemeral port and return (JoinHandle, SocketAddr)
pub async fn spawn_axum(router: Router) -> (JoinHandle<()>, SocketAddr) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind failed");
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, router).await.expect("server failed");
    });
    (handle, addr)
}

/// In-memory identity provider counting every remote call.
#[derive(Debug, Default)]
pub struct FakeProvider {
    groups: Mutex<Vec<Group>>,
    members: Mutex<HashMap<String, Vec<Member>>>,
    pub token_lifetime: Option<u64>,
    pub delay: Option<Duration>,

    pub fail_auth: AtomicBool,
    pub fail_groups: AtomicBool,
    pub fail_members: AtomicBool,
    pub time_out_auth: AtomicBool,

    pub auth_calls: AtomicUsize,
    pub group_calls: AtomicUsize,
    pub member_calls: AtomicUsize,
}

impl FakeProvider {
    /// `groups` as (name, member emails); group ids are `id-<name>`.
    pub fn with_groups(groups: &[(&str, &[&str])]) -> Self {
        let provider = Self::default();
        for (name, emails) in groups {
            provider.add_group(name, emails.iter().map(|e| Member::with_email(*e)).collect());
        }
        provider
    }

    pub fn add_group(&self, name: &str, members: Vec<Member>) {
        let id = format!("id-{}", name);
        self.groups.lock().unwrap().push(Group::new(id.clone(), name));
        self.members.lock().unwrap().insert(id, members);
    }

    pub fn set_members(&self, name: &str, emails: &[&str]) {
        self.members.lock().unwrap().insert(
            format!("id-{}", name),
            emails.iter().map(|e| Member::with_email(*e)).collect(),
        );
    }

    pub fn auth_calls(&self) -> usize {
        self.auth_calls.load(Ordering::SeqCst)
    }

    pub fn group_calls(&self) -> usize {
        self.group_calls.load(Ordering::SeqCst)
    }

    pub fn member_calls(&self) -> usize {
        self.member_calls.load(Ordering::SeqCst)
    }

    async fn pause(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

fn unavailable() -> ProviderError {
    ProviderError::Status {
        url: "http://keycloak.test".to_owned(),
        status: StatusCode::SERVICE_UNAVAILABLE,
        body: "unavailable".to_owned(),
    }
}

impl IdentityProvider for FakeProvider {
    async fn authenticate(&self) -> Result<AccessToken, ProviderError> {
        let n = self.auth_calls.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        if self.time_out_auth.load(Ordering::SeqCst) {
            return Err(ProviderError::Timeout {
                url: "http://keycloak.test/token".to_owned(),
            });
        }
        if self.fail_auth.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        Ok(AccessToken {
            access_token: format!("token-{}", n + 1),
            expires_in: self.token_lifetime,
        })
    }

    async fn list_groups(&self, _token: &str) -> Result<Vec<Group>, ProviderError> {
        self.group_calls.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        if self.fail_groups.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        Ok(self.groups.lock().unwrap().clone())
    }

    async fn list_group_members(&self, _token: &str, group_id: &str) -> Result<Vec<Member>, ProviderError> {
        self.member_calls.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        if self.fail_members.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        Ok(self
            .members
            .lock()
            .unwrap()
            .get(group_id)
            .cloned()
            .unwrap_or_default())
    }
}

pub fn default_client(provider: &Arc<FakeProvider>) -> KeycloakClient<FakeProvider> {
    KeycloakClient::new(provider.clone(), &CacheConfig::default())
}

pub fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
