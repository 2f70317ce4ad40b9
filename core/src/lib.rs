//! # snmpscan-core
//!
//! The scan engine: builds per-target security parameters, runs one
//! executor task per address under a hard concurrency ceiling, and streams
//! the results to the caller's channels.

pub mod output;
pub mod scanner;
pub mod session;

pub use output::{ScanChannels, ScanReceivers};
pub use scanner::{ScanSummary, Scanner, scan};
