#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![warn(warnings)]

//! Async client for the Rancher `v2-beta` orchestration API
//!
//! This crate maps container, stack, service, host and port operations onto
//! HTTP calls against a single Rancher environment (project):
//! - Typed configuration validated once at construction
//! - Basic authentication with the environment's API key pair
//! - Table-driven operation routing (`/v2-beta/projects/{env}/...`)
//! - Synchronous identifier validation, asynchronous request errors
//! - JSON responses passed through verbatim as [`serde_json::Value`]
//!
//! # Error split
//!
//! Every resource method returns `Result<ResponseFuture, ValidationError>`.
//! The outer `Result` fails immediately when an identifier is missing, before
//! any network activity. The future resolves to `Result<Value, RequestError>`
//! for transport, status and decoding failures.
//!
//! # Example
//!
//! ```ignore
//! use rancher_client::{RancherClient, RancherClientConfig};
//!
//! let config = RancherClientConfig::new("rancher.local", 8080, "ACCESS", "SECRET")
//!     .with_environment("1a7");
//! let client = RancherClient::new(config)?;
//!
//! let container = client.get_container("1i42")?.await?;
//! client
//!     .stop_container("1i42", &serde_json::json!({ "timeout": 5 }))?
//!     .await?;
//! ```

mod auth;
mod client;
mod config;
mod error;
mod operation;
mod response;
mod transport;

pub use client::{RancherClient, ResponseFuture};
pub use config::{DEFAULT_ENVIRONMENT, ENV_PREFIX, RancherClientConfig, SecretKey};
pub use error::{ConfigError, RancherError, RequestError, ValidationError};
pub use operation::{Action, BodyRule, Collection, IdRule, Operation, Route, API_ROOT};
pub use transport::{BoxError, DEFAULT_USER_AGENT, HyperTransport, Transport};
