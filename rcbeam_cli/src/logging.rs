//! Tracing subscriber setup.
//!
//! Logs go to stderr so JSON written to stdout stays machine-readable.
//! `RUST_LOG` overrides the default filter.

use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is unset
const DEFAULT_FILTER: &str = "rcbeam_core=info,rcbeam=info";

pub fn init(verbose: bool) {
    let fallback = if verbose {
        "rcbeam_core=debug,rcbeam=debug"
    } else {
        DEFAULT_FILTER
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
