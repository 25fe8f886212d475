//! Logging macros for the rollout scheduler with verbosity level control.
//!
//! Provides zero-cost logging when disabled (verbosity=0).
//! Verbosity levels:
//! - 0: SILENT (only errors)
//! - 1: CHANGES (schedules handed out to the worker)
//! - 2: CHECKS (window resolution and boundary decisions)
//! - 3: DEBUG (estimate walk internals)

/// Verbosity level constants.
pub const VERBOSITY_SILENT: u8 = 0;
pub const VERBOSITY_CHANGES: u8 = 1;
pub const VERBOSITY_CHECKS: u8 = 2;
pub const VERBOSITY_DEBUG: u8 = 3;

/// Log an internal invariant violation. Always emitted.
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        eprintln!($($arg)*);
    };
}

/// Log at CHANGES level (verbosity >= 1).
///
/// Used for: schedules returned to the worker loop.
#[macro_export]
macro_rules! log_changes {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_CHANGES {
            eprintln!($($arg)*);
        }
    };
}

/// Log at CHECKS level (verbosity >= 2).
///
/// Used for: active window selection, next-open and closing boundaries.
#[macro_export]
macro_rules! log_checks {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_CHECKS {
            eprintln!($($arg)*);
        }
    };
}

/// Log at DEBUG level (verbosity >= 3).
///
/// Used for: each step of the estimate forward simulation.
#[macro_export]
macro_rules! log_debug {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_DEBUG {
            eprintln!($($arg)*);
        }
    };
}
