//! Utilities: logging setup.
//!
//! Key items:
//!   init_logging / log_filter
//!
//! Diagnostics go to stderr so stdout carries only command output
//! (tables, verbose blocks, completion scripts).

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter directive (e.g. `debug`, `onos=trace`).
pub const LOG_ENV: &str = "ONOS_LOG";

/// Filter used when `ONOS_LOG` is unset or unparsable.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Logging helpers.
pub mod logging {
    use super::*;

    /// Build the filter from `ONOS_LOG`, falling back to [`DEFAULT_LOG_FILTER`].
    pub fn log_filter() -> EnvFilter {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
    }

    /// Install the global subscriber. Safe to call once per process; later calls are ignored.
    pub fn init_logging() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(log_filter())
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }
}

pub use logging::init_logging;

#[cfg(test)]
pub(crate) use capture::capture_logs;
