// Tracing initialization with a log level reloadable once configuration is
// available.
use std::sync::OnceLock;

use tracing_subscriber::{EnvFilter, fmt, prelude::*, reload};

static LOG_RELOAD_HANDLE: OnceLock<reload::Handle<EnvFilter, tracing_subscriber::Registry>> =
    OnceLock::new();

/// Directive used between process start and configuration load.
const STARTUP_LEVEL: &str = "info";

pub fn init_tracing() {
    // Prefer RUST_LOG from env, otherwise the startup level.
    let base_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(STARTUP_LEVEL));

    let (reload_layer, handle) = reload::Layer::new(base_filter);
    let _ = LOG_RELOAD_HANDLE.set(handle);

    let _ = tracing_subscriber::registry()
        .with(reload_layer)
        .with(fmt::layer())
        .try_init();
}

/// Applies the configured debug flag: verbose diagnostics when set, only
/// fatal paths otherwise. An explicit RUST_LOG keeps precedence.
pub fn apply_debug_flag(debug: bool) {
    if std::env::var_os("RUST_LOG").is_some() {
        return;
    }
    let directive = if debug { "debug" } else { "error" };
    if let Some(handle) = LOG_RELOAD_HANDLE.get() {
        let _ = handle.modify(|f| {
            *f = EnvFilter::new(directive);
        });
    }
}
