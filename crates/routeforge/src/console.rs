//! Log output for applications embedding the filters.
//!
//! Filters emit structured `tracing` events (commits at `debug`, rejections
//! and chain rebuilds at `trace`). [`init`] installs a formatting subscriber
//! honoring `RUST_LOG`, defaulting to [`DEFAULT_DIRECTIVES`].

use std::sync::OnceLock;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_DIRECTIVES: &str = "routeforge_filter=info";

static INIT: OnceLock<bool> = OnceLock::new();

/// Installs the global subscriber.
///
/// Safe to call multiple times - only the first call has effect. Returns
/// false if another subscriber was already installed.
pub fn init() -> bool {
    *INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES));
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .try_init()
            .is_ok()
    })
}
