//! RouteForge Core - building blocks for incremental route filtering
//!
//! This crate provides the types every RouteForge filter shares:
//! - Committable containers with candidate/committed semantics
//! - Intervals with exact infinity bookkeeping
//! - Saturating arithmetic for costs and demands
//! - Routing domain types: topology, moves (deltas), assignments

pub mod arithmetic;
pub mod committable;
pub mod domain;
pub mod error;
pub mod interval;
pub mod sparse_bitset;

pub use committable::{CommittableArray, CommittableValue};
pub use domain::{Assignment, Delta, DeltaElement, PathTopology};
pub use error::{Result, RouteForgeError};
pub use interval::{ExtendedInterval, ExtendedValue, Interval};
pub use sparse_bitset::SparseBitset;
