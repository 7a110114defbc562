//! Logger setup for the command-line driver

use flexi_logger::{Logger, LoggerHandle};

use crate::io::error::Result;

/// Start logging to stderr with a `log`-style specification such as `"info"`
/// or `"preemptive_grid=debug"`
///
/// The returned handle must be kept alive for as long as logging is needed.
///
/// # Errors
///
/// Returns an error if the specification cannot be parsed or a logger is
/// already installed
pub fn setup_logging(log_spec: &str) -> Result<LoggerHandle> {
    let handle = Logger::try_with_str(log_spec)?.log_to_stderr().start()?;
    Ok(handle)
}
