//! Logging infrastructure for dictfilter.
//!
//! All events go through `tracing` with target "dictfilter" and carry an
//! `event` field for filtering.
//!
//! ## Library Integration
//!
//! dictfilter never initializes a global subscriber. Applications configure
//! tracing via `tracing_subscriber` or similar.
//!
//! ## Conventions
//!
//! - `event`: snake_case event name (required)
//! - `component`: module/subsystem (e.g., "resolve", "context")
//! - Use `%` for Display, `?` for Debug formatting
//! - Never log literal values; IN lists can be arbitrarily large

/// Target for all dictfilter log events.
pub(crate) const DICTFILTER_TARGET: &str = "dictfilter";

/// Macro for debug-level log events.
///
/// # Example
/// ```ignore
/// log_debug!(
///     component = "resolve",
///     event = "sorted_in_values_computed",
///     handle = %handle,
///     num_values = values.len(),
/// );
/// ```
macro_rules! log_debug {
    ($($field:tt)*) => {
        ::tracing::debug!(target: $crate::observability::DICTFILTER_TARGET, $($field)*)
    };
}

/// Macro for warn-level log events.
macro_rules! log_warn {
    ($($field:tt)*) => {
        ::tracing::warn!(target: $crate::observability::DICTFILTER_TARGET, $($field)*)
    };
}

pub(crate) use log_debug;
pub(crate) use log_warn;
