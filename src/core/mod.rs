//! Core business logic module
//!
//! This module contains the bake pipeline and the pure pieces it is built
//! from. Filesystem, network and subprocess work is reached through
//! [`crate::infra`] or the capability traits in [`gateway`] and [`executor`].
//!
//! # Submodules
//!
//! - [`bake_config`] - Per-invocation configuration and validation
//! - [`layout`] - Locations inside a Yocto build tree
//! - [`clean`] - Clean stage: tmp output and lock files
//! - [`executor`] - Build tool invocation capability
//! - [`manifest`] - Image manifest discovery and dependency parsing
//! - [`build_info`] - Build-info model and assembly
//! - [`connection`] - Stored Artifactory connections
//! - [`gateway`] - Artifact repository capability
//! - [`collector`] - Artifact upload and read-back
//! - [`pipeline`] - Stage orchestration

pub mod bake_config;
pub mod build_info;
pub mod clean;
pub mod collector;
pub mod connection;
pub mod executor;
pub mod gateway;
pub mod layout;
pub mod manifest;
pub mod pipeline;
