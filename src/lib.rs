//! # Group Resolver Library
//!
//! Resolves identity-provider group names into member identifiers through a
//! set of TTL caches, and merges identifier lists across document paths by
//! priority so that every identifier ends up in exactly one destination.
//!
//! Modules:
//! - `keycloak`: identity provider REST client and the caching client
//! - `cache`: lazily expiring TTL cache
//! - `merge`: priority merge engine
//! - `document`: field-path access to JSON documents
//! - `function`: composition-function request handling
//! - `config`: service configuration

pub mod cache;
pub mod config;
pub mod document;
pub mod function;
pub mod helpers;
pub mod keycloak;
pub mod merge;
pub mod observability;
pub mod server;
pub mod utils;

#[cfg(test)]
pub mod tests;

pub use crate::config::types::ServiceConfig;
pub use crate::keycloak::{DirectoryError, KeycloakClient};
pub use crate::merge::{MergeError, TransformRule};
