//! Logging macros used across the workspace.
//!
//! These forward to `tracing` so the subscriber installed by the binary
//! decides how (and whether) they are rendered.

/// Target used for plain user-facing output lines.
pub const PRINT_TARGET: &str = "snmpscan::print";

/// Target used for success notes, rendered with their own symbol.
pub const SUCCESS_TARGET: &str = "snmpscan::success";

#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        ::tracing::info!($($arg)*)
    };
}

#[macro_export]
macro_rules! success {
    ($($arg:tt)*) => {
        ::tracing::info!(target: "snmpscan::success", $($arg)*)
    };
}

#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        ::tracing::warn!($($arg)*)
    };
}

#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        ::tracing::error!($($arg)*)
    };
}
