//! Structured logging.
//!
//! # Responsibilities
//! - Initialize logging subsystem
//! - Map command line verbosity flags to a level
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - `RUST_LOG` overrides the level chosen on the command line

use std::fmt;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Minimum level of events to print.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Error,
}

impl LogLevel {
    /// Resolve verbosity flags. `quiet` beats `verbose`, which beats `debug`.
    pub fn from_flags(quiet: bool, verbose: bool, debug: bool) -> Self {
        if quiet {
            LogLevel::Error
        } else if verbose {
            LogLevel::Info
        } else if debug {
            LogLevel::Debug
        } else {
            LogLevel::default()
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Error => "error",
        }
    }

    /// Default filter directives for this level.
    pub fn directives(&self) -> String {
        format!("patroniglue={level},tower_http={level}", level = self.as_str())
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Install the global tracing subscriber.
pub fn init(level: LogLevel) {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| level.directives().into()))
        .with(tracing_subscriber::fmt::layer())
        .init();
}
