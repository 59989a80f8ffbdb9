//! Tracing initialization and configuration.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Initialize the sqlhost tracing/logging system.
///
/// Reads the `SQLHOST_LOG` environment variable for per-module log levels.
/// Format: `SQLHOST_LOG=sqlhost_engine::pool=debug,sqlhost_engine=info`
///
/// Falls back to `sqlhost=info` if `SQLHOST_LOG` is not set or is invalid.
/// Safe to call more than once; only the first call installs a subscriber,
/// and an already-installed global subscriber is left in place.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env("SQLHOST_LOG")
            .unwrap_or_else(|_| EnvFilter::new("sqlhost=info"));

        let _ = tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .with(filter)
            .try_init();
    });
}
