//! Log output for combat runs.
//!
//! Rolls, hits, damage breakdowns, and skipped actions are emitted as
//! `tracing` events at `info` and `warn`; round resets and retargeting at
//! `debug`. Nothing is printed until a subscriber is installed.

use tracing_subscriber::EnvFilter;

/// Install a formatted subscriber writing to stderr.
///
/// `RUST_LOG` takes precedence over `default_directive` (for example
/// `"info"` or `"sk_mechanics=debug"`). Returns `false` when a global
/// subscriber was already installed, which is harmless in tests.
pub fn init(default_directive: &str) -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_init_is_refused() {
        init("warn");
        assert!(!init("warn"));
    }
}
