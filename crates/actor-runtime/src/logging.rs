/// Centralized logging macros for the actor system
///
/// These macros give every actor the same log shape:
/// - Routed through `tracing` under the `actor` target
/// - Subscriber, filtering and formatting are chosen by the host binary
/// - Callers do not need their own `tracing` dependency
///
/// Log debug-level message
///
/// # Example
/// ```
/// use actor_runtime::actor_debug;
/// actor_debug!("Consumer: cursor {} → {}", 5, 7);
/// ```
#[macro_export]
macro_rules! actor_debug {
    ($($arg:tt)*) => {
        $crate::__tracing::debug!(target: "actor", $($arg)*)
    };
}

/// Log info-level message
///
/// Use for lifecycle changes and protocol milestones
#[macro_export]
macro_rules! actor_info {
    ($($arg:tt)*) => {
        $crate::__tracing::info!(target: "actor", $($arg)*)
    };
}

/// Log warning-level message
///
/// Use for recoverable errors and unexpected conditions
#[macro_export]
macro_rules! actor_warn {
    ($($arg:tt)*) => {
        $crate::__tracing::warn!(target: "actor", $($arg)*)
    };
}

/// Log error-level message
///
/// Use for failures that should always be visible
#[macro_export]
macro_rules! actor_error {
    ($($arg:tt)*) => {
        $crate::__tracing::error!(target: "actor", $($arg)*)
    };
}
