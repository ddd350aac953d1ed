//! rancher-e2e library crate
//!
//! Helpers for end-to-end tests against a Rancher server and the clusters it
//! manages: watch-based condition waiting, a per-test cleanup registry, and
//! provisioning helpers for charts, hosted clusters and external nodes.
//!
//! ## Modules
//!
//! - `wait`: consume a watch stream until a predicate resolves
//! - `session`: deferred cleanup, run in reverse registration order
//! - `client`: Rancher, catalog, downstream and management clients
//! - `charts`: chart install payloads and the rancher-monitoring helpers
//! - `clusters`: hosted GKE cluster creation
//! - `nodes`: external node provider selection
//! - `config`: YAML test configuration
//! - `telemetry`: tracing setup for test binaries

pub mod charts;
pub mod client;
pub mod clusters;
pub mod config;
pub mod error;
pub mod nodes;
pub mod session;
pub mod telemetry;
pub mod wait;

pub use client::{RancherApi, RancherClient};
pub use config::{RancherConfig, TestConfig};
pub use error::{Error, Result, ignore_not_found};
pub use session::{CleanupError, Session};
pub use wait::{EventStream, WaitError, watch_wait};
