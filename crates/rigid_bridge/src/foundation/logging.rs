//! Logging utilities

pub use log::{debug, error, info, trace, warn};

/// Initialize the logging system from `RUST_LOG`
pub fn init() {
    env_logger::init();
}

/// Initialize logging, ignoring the error when a logger is already installed.
///
/// Convenient for tests, where every test may race to install the logger.
pub fn try_init() {
    let _ = env_logger::builder().is_test(true).try_init();
}
