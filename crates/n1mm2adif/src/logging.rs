//! Logging configuration for n1mm2adif.
//!
//! Datagrams that cannot be logged are reported under [`DROPPED_TARGET`].
//! That target stays visible at `warn` even with `--quiet`, since it is the
//! only place an operator learns a contact did not reach its ADIF file.

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Target for datagrams that were received but not logged.
pub const DROPPED_TARGET: &str = "n1mm2adif::dropped";

const CRATE_TARGET: &str = "n1mm2adif";

/// Verbosity level for logging output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Errors and dropped contacts only.
    Quiet,
    /// Logged contacts and listener state.
    #[default]
    Normal,
    /// Discarded non-contact payloads and file appends.
    Verbose,
    /// Every datagram and receive timeout.
    Trace,
}

impl Verbosity {
    /// Level applied to the crate's own events.
    #[must_use]
    pub fn level(self) -> LevelFilter {
        match self {
            Self::Quiet => LevelFilter::ERROR,
            Self::Normal => LevelFilter::INFO,
            Self::Verbose => LevelFilter::DEBUG,
            Self::Trace => LevelFilter::TRACE,
        }
    }

    /// Filter directives used when `RUST_LOG` is not set.
    #[must_use]
    pub fn directives(self) -> String {
        match self {
            Self::Quiet => format!("{CRATE_TARGET}=error,{DROPPED_TARGET}=warn"),
            Self::Normal => format!("{CRATE_TARGET}=info"),
            Self::Verbose => format!("{CRATE_TARGET}=debug"),
            Self::Trace => format!("{CRATE_TARGET}=trace"),
        }
    }
}

/// Install the global subscriber. `RUST_LOG` replaces the default directives.
///
/// Later calls are no-ops.
///
/// ```no_run
/// use n1mm2adif::{init_logging, logging::Verbosity};
///
/// init_logging(Verbosity::Quiet);
/// ```
pub fn init_logging(verbosity: Verbosity) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.directives()));

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().compact().with_target(true))
        .try_init();
}

#[cfg(test)]
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(format!("{DROPPED_TARGET}=warn"))
        .with_test_writer()
        .try_init();
}
