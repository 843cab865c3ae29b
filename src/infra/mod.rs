//! Infrastructure layer
//!
//! Handles all I/O operations: network, filesystem, and external processes.
//! This module is the only place where side effects occur.

pub mod artifactory;
pub mod build_info_store;
pub mod dirs;
pub mod filesystem;
pub mod gateway;
pub mod shell;
