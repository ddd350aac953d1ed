// Test code is allowed to panic on failure
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic,
    clippy::string_slice
)]

//! Integration tests for rancher-e2e
//!
//! These tests require a running Rancher server described by the file named in
//! `CATTLE_TEST_CONFIG`. Tests are marked with #[ignore] and must be run
//! explicitly:
//!
//! ```bash
//! # Run all integration tests
//! CATTLE_TEST_CONFIG=/path/to/cattle-config.yaml cargo test --test integration -- --ignored
//!
//! # Run specific test
//! cargo test --test integration test_namespace_deletion_is_observed -- --ignored
//! ```
//!
//! Tests that need optional settings (a chart version, a cloud credential)
//! log and return early when the `integration` config section lacks them.

#[path = "../common/mod.rs"]
mod common;


mod monitoring_tests;
mod provisioning_tests;

pub use fixtures::*;
