//! yocto-bake - Bake Yocto images and publish them to Artifactory
//!
//! This library drives a BitBake build for one target, uploads the
//! resulting images and records them, together with the packages listed in
//! the image manifests, as a build in Artifactory.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`cli`] - Command-line interface parsing and output formatting
//! - [`core`] - Pipeline and business logic
//! - [`infra`] - Infrastructure layer (network, filesystem, processes)
//! - [`config`] - Configuration and constants
//! - [`error`] - Error types and handling

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod infra;

#[cfg(test)]
pub mod test_utils;
