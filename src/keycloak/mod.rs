//! Keycloak access: the raw REST provider and the caching client on top of it.

pub mod client;
pub mod errors;
pub mod provider;
pub mod rest;

pub use client::KeycloakClient;
pub use errors::{DirectoryError, ProviderError};
pub use provider::{AccessToken, Group, IdentityProvider, Member};
pub use rest::KeycloakRest;
