//! Logging setup.
//!
//! The engine logs through `tracing`. The CLI installs a subscriber once at
//! startup; library consumers embedding the engine elsewhere are free to
//! install their own subscriber instead, since nothing below calls
//! `tracing_subscriber::fmt().init()` implicitly.

use tracing_subscriber::EnvFilter;

/// Installs a formatted, level-filtered subscriber on stderr.
///
/// `debug` raises the default filter from `info` to `debug`; either can be
/// overridden by setting `RUST_LOG`.
pub fn init(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
