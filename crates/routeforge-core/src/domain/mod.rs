//! Routing domain types shared by every filter.
//!
//! - [`PathTopology`]: fixed start/end nodes of every path
//! - [`Delta`]: one candidate move as sparse next-node reassignments
//! - [`Assignment`]: a full next-node solution

mod assignment;
mod delta;
mod topology;

pub use assignment::Assignment;
pub use delta::{Delta, DeltaElement};
pub use topology::PathTopology;

#[cfg(test)]
mod tests;
