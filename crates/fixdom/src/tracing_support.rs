//! Log subscriber setup.
//!
//! fixdom logs through `tracing`: cache misses at `debug`, hits at `trace`,
//! suppressed fetch failures at `warn`. Nothing is printed until a
//! subscriber is installed; these helpers install one driven by `RUST_LOG`.

use tracing_subscriber::{fmt, EnvFilter};

/// Output format of [`init_tracing`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// One JSON object per event
    Json,
}

fn filter(default_directive: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive))
}

/// Install a stderr subscriber. `RUST_LOG` wins over `default_directive`.
///
/// Returns `false` when a global subscriber was already installed.
pub fn init_tracing(default_directive: &str, format: LogFormat) -> bool {
    let builder = fmt()
        .with_env_filter(filter(default_directive))
        .with_writer(std::io::stderr)
        .with_target(false);
    match format {
        LogFormat::Text => builder.try_init().is_ok(),
        LogFormat::Json => builder.json().try_init().is_ok(),
    }
}

/// Install a subscriber that writes through the test harness capture.
///
/// Safe to call from every test; only the first call installs.
pub fn init_test_tracing() {
    let _ = fmt()
        .with_env_filter(filter("fixdom=debug"))
        .with_test_writer()
        .try_init();
}
