//! Shared fixtures for the functional, integration and proptest suites.

#![allow(dead_code)]

pub mod fixtures;
