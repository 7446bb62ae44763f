//! Tracing initialization and configuration.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Initialize the bioaudit tracing/logging system.
///
/// Reads `BIOAUDIT_LOG` for per-component log levels.
/// Format: `BIOAUDIT_LOG=bioaudit_analysis::hypothesis=debug,bioaudit_core=warn`
///
/// Falls back to `bioaudit=info` if `BIOAUDIT_LOG` is not set or is invalid.
///
/// Idempotent: only the first call installs a subscriber.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env("BIOAUDIT_LOG")
            .unwrap_or_else(|_| EnvFilter::new("bioaudit=info"));

        let installed = tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .with(filter)
            .try_init();

        if installed.is_err() {
            tracing::debug!("global subscriber already set, keeping it");
        }
    });
}
