//! Log setup: a daily rolling file under the configured directory plus stderr.

#[cfg(feature = "file-log")]
use std::sync::Mutex;

#[cfg(feature = "file-log")]
use tracing_appender::non_blocking::WorkerGuard;
#[cfg(feature = "file-log")]
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LogConfig;

pub const LOG_FILE: &str = "keyboard_checker.log";

#[cfg(feature = "file-log")]
static TRACING_GUARD: Mutex<Option<WorkerGuard>> = Mutex::new(None);

/// Installs the global subscriber. `RUST_LOG` overrides the configured filter.
///
/// A second call is a no-op, the first subscriber stays in place.
#[cfg(feature = "file-log")]
pub fn init_tracing(cfg: &LogConfig) {
    let file_appender = tracing_appender::rolling::daily(&cfg.directory, LOG_FILE);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cfg.filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_level(true)
        .with_target(true);

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_level(true)
        .with_target(true);

    let installed = tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .is_ok();

    if installed {
        store_tracing_guard(guard);
        tracing::info!(directory = %cfg.directory, file = LOG_FILE, "tracing initialized");
    }
}

#[cfg(feature = "file-log")]
fn store_tracing_guard(guard: WorkerGuard) {
    // The guard flushes the file writer on drop, so it lives until exit.
    if let Ok(mut slot) = TRACING_GUARD.lock() {
        *slot = Some(guard);
    }
}

#[cfg(not(feature = "file-log"))]
pub fn init_tracing(_cfg: &LogConfig) {}
