//! Shared test fixtures for RouteForge crates.
//!
//! This crate provides data generators and reference computations for
//! testing. It does NOT depend on `routeforge-filter` so the filter crate
//! can use it as a dev-dependency.
//!
//! - [`routes`] - random path topologies and committed routes
//! - [`moves`] - random valid moves expressed as deltas
//! - [`reference`] - from-scratch feasibility walks to compare against
//!
//! # Usage
//!
//! Add as a dev-dependency in your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! routeforge-test = { workspace = true }
//! ```
//!
//! Then import the fixtures you need:
//!
//! ```ignore
//! use routeforge_test::{seeded_rng, MoveGenerator, RandomRoutes};
//! ```

pub mod moves;
pub mod reference;
pub mod routes;

use std::sync::OnceLock;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

// Re-export commonly used types at crate root for convenience
pub use moves::{MoveGenerator, MoveKind, RouteMove};
pub use reference::{route_cumul, route_is_feasible};
pub use routes::RandomRoutes;

static INIT: OnceLock<()> = OnceLock::new();

/// Installs a test-writer subscriber filtered by `RUST_LOG`.
///
/// Safe to call from every test - only the first call has effect.
pub fn init_tracing() {
    INIT.get_or_init(|| {
        let _ = tracing_subscriber::registry()
            .with(EnvFilter::from_default_env())
            .with(tracing_subscriber::fmt::layer().with_test_writer())
            .try_init();
    });
}

/// Reproducible RNG for randomized tests.
pub fn seeded_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}
