//! Test log output.
//!
//! The fakes emit `tracing` events at `trace`/`debug` level for every graph
//! mutation. Call [`init_test_tracing`] at the top of a test to see them;
//! `RUST_LOG=dom_fakes=trace` shows everything.

use std::sync::OnceLock;
use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is unset
pub const DEFAULT_FILTER: &str = "warn";

/// Install a fmt subscriber writing to the test output capture
///
/// Safe to call from every test; only the first call installs anything, and
/// an already installed global subscriber is left in place.
pub fn init_test_tracing() {
    static INIT: OnceLock<()> = OnceLock::new();
    INIT.get_or_init(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        init_test_tracing();
        init_test_tracing();
        tracing::debug!("still fine");
    }
}
