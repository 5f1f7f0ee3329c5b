//! User interface module - operator output and diagnostic logging.
//!
//! - `formatter` - Styled progress and summary output
//! - This module - tracing subscriber setup

use tracing_subscriber::EnvFilter;

pub mod formatter;

// Re-export formatter functions for convenience
pub use formatter::{
    display_component, display_components, display_error, display_stage, display_status,
    display_success, display_summary, format_components,
};

/// Installs the stderr tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise `debug` when verbose, `warn` when not.
pub fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
