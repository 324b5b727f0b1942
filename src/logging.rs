//! Diagnostic logging.
//!
//! Log records go to stderr; stdout is reserved for the event stream.

use std::io;

use serde::Deserialize;
use tracing_subscriber::{fmt, prelude::*, util::TryInitError, EnvFilter};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LogConfig {
    /// Log level filter (trace, debug, info, warn, error).
    #[serde(default = "default_level")]
    pub level: String,

    /// Emit JSON records instead of plain lines.
    #[serde(default)]
    pub json: bool,
}

fn default_level() -> String {
    "info".into()
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            level: default_level(),
            json: false,
        }
    }
}

impl LogConfig {
    /// Filter directive, with `verbose` forcing debug.
    fn directive(&self, verbose: bool) -> &str {
        if verbose {
            "debug"
        } else {
            &self.level
        }
    }
}

/// Initialize the global subscriber. `RUST_LOG` takes precedence over the
/// configured level.
pub fn init_logging(config: &LogConfig, verbose: bool) -> Result<(), TryInitError> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.directive(verbose)));

    let registry = tracing_subscriber::registry().with(env_filter);

    if config.json {
        registry
            .with(fmt::layer().json().with_writer(io::stderr))
            .try_init()
    } else {
        registry
            .with(fmt::layer().with_ansi(false).with_writer(io::stderr))
            .try_init()
    }
}
