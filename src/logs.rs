//! Log targets and subscriber setup.
//!
//! Aborted operations are logged at `warn`, state transitions at `debug` and
//! admin changes at `info`. Verbosity is controlled through `RUST_LOG`, e.g.
//! `RUST_LOG=clamm_core::swap=debug`.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

pub const POOL: &str = "clamm_core::pool";
pub const SWAP: &str = "clamm_core::swap";
pub const PLUGIN: &str = "clamm_core::plugin";
pub const ADMIN: &str = "clamm_core::admin";

/// Installs a formatting subscriber filtered by `RUST_LOG`, falling back to
/// `default_filter`. Does nothing if a global subscriber is already set.
pub fn init_logging(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .try_init();
}
