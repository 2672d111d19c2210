#![forbid(unsafe_code)]

//! Logging setup for applications embedding fademodal.
//!
//! Filtering follows `RUST_LOG`; without it, fademodal crates log at
//! `debug` and everything else at `warn`.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};

/// Default directive when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "warn,fmodal_core=debug,fmodal_runtime=debug,fmodal_widgets=debug";

/// Install a global formatting subscriber.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init() -> Result<(), TryInitError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()
}
