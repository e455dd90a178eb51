//! Incremental feasibility and cost filters for path-based local search.
//!
//! This crate evaluates candidate moves against a committed baseline:
//! - [`PathState`]: committed paths plus a chain view of the candidate
//! - [`DimensionChecker`]: cumulative capacity checks with a range-query cache
//! - [`LocalSearchFilter`]: the Relax/Accept/Synchronize contract
//! - [`BasePathFilter`]: rank bookkeeping shared by path filters
//!
//! # Architecture
//!
//! Every structure keeps a committed state and a candidate state. A move is
//! relaxed into the candidate, judged, then either committed as the new
//! baseline or reverted. Nodes and paths are plain integer ids; no structure
//! borrows another across calls.

pub mod dimension;
pub mod filter;
pub mod path_state;

// ============================================================================
// Path State
// ============================================================================

pub use path_state::{Chain, ChainBounds, Chains, PathState};

// ============================================================================
// Dimension Checking
// ============================================================================

pub use dimension::{DemandEvaluator, DimensionChecker};

// ============================================================================
// Filters
// ============================================================================

pub use filter::{
    AmortizedCost, BasePathFilter, DimensionFilter, LocalSearchFilter, PathFilterHooks,
    PathFilterState, PathStateFilter, VehicleAmortizedCostFilter,
};
