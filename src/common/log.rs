//! Logging utilities
//!
//! This module provides helpers for initializing the logging system.

/// Initialize the logging system
///
/// # Parameters
///
/// * `level` - default log level, overridden by `RUST_LOG` when set
pub fn init_logger(level: &str) {
    let env = env_logger::Env::default().filter_or("RUST_LOG", level);

    // Ignore the error when a logger is already installed, so that library
    // consumers and tests can both call this.
    let _ = env_logger::Builder::from_env(env).try_init();
}
