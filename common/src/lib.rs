//! # snmpscan-common
//!
//! Shared vocabulary of the workspace: scan configuration, the target model,
//! value normalization and the traits the scan engine consumes.

pub mod config;
pub mod error;
pub mod macros;
pub mod network;
pub mod scanning;
pub mod value;
