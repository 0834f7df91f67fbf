//! Logging macros for the stride search with verbosity level control.
//!
//! Provides zero-cost logging when disabled (verbosity=0).
//! Verbosity levels:
//! - 0: SILENT (only errors)
//! - 1: TRIALS (trial completions, best-candidate updates)
//! - 2: PATHS (per-path resolutions, bound updates)
//! - 3: SAMPLING (attempt-level sampling internals)

/// Verbosity level constants.
pub const VERBOSITY_SILENT: u8 = 0;
pub const VERBOSITY_TRIALS: u8 = 1;
pub const VERBOSITY_PATHS: u8 = 2;
pub const VERBOSITY_SAMPLING: u8 = 3;

/// Log at TRIALS level (verbosity >= 1).
///
/// Used for: trial completions, failures, best-candidate updates.
#[macro_export]
macro_rules! log_trials {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_TRIALS {
            eprintln!($($arg)*);
        }
    };
}

/// Log at PATHS level (verbosity >= 2).
///
/// Used for: longest-path extraction, path commits, bound tightening.
#[macro_export]
macro_rules! log_paths {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_PATHS {
            eprintln!($($arg)*);
        }
    };
}

/// Log at SAMPLING level (verbosity >= 3).
///
/// Used for: individual sampling attempts and rejections.
#[macro_export]
macro_rules! log_sampling {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_SAMPLING {
            eprintln!($($arg)*);
        }
    };
}
