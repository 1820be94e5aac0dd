//! Subscriber installation for binaries.
//!
//! Libraries only emit through the `tracing` facade. Binaries call [`init`]
//! once at startup; `RUST_LOG` wins over the configured level when set.

use skillgain_core::config::GeneralConfig;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Filter from `RUST_LOG`, falling back to `log_level`.
#[must_use]
pub fn filter(log_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level))
}

/// Install the global subscriber: plain text, or JSON lines when
/// `general.json_logs` is set.
pub fn init(general: &GeneralConfig) -> Result<(), TryInitError> {
    let filter = filter(&general.log_level);
    if general.json_logs {
        tracing_subscriber::registry()
            .with(fmt::layer().json().with_current_span(true))
            .with(filter)
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer().with_target(false))
            .with(filter)
            .try_init()
    }
}
