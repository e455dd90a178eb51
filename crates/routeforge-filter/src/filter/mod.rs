//! Local search filters.
//!
//! A filter sees every candidate move as a [`Delta`] and either rejects it
//! or lets it through, possibly with an objective contribution. The search
//! loop drives all filters through the same cycle:
//!
//! 1. [`relax`](LocalSearchFilter::relax) with the candidate delta
//! 2. [`accept`](LocalSearchFilter::accept), stopping at the first `false`
//! 3. [`synchronize`](LocalSearchFilter::synchronize) with the new solution
//!    once the move is applied, or [`revert`](LocalSearchFilter::revert)
//!    when it is discarded
//!
//! Filters sharing a [`PathState`](crate::PathState) must be driven after
//! the [`PathStateFilter`] that owns it.

mod amortized_cost;
mod base_path;
mod dimension_filter;
mod path_state_filter;

pub use amortized_cost::{AmortizedCost, VehicleAmortizedCostFilter};
pub use base_path::{BasePathFilter, PathFilterHooks, PathFilterState};
pub use dimension_filter::DimensionFilter;
pub use path_state_filter::PathStateFilter;

use routeforge_core::{Assignment, Delta};

/// The contract between a filter and the search loop.
///
/// # Implementation Notes
/// - Infeasibility is always a `false` from `accept`, never an error
/// - A delta with an unbound element must never be rejected by a filter
///   that cannot evaluate it
/// - Objective values are saturated `i64`s
pub trait LocalSearchFilter {
    /// Returns the filter name used in logs.
    fn name(&self) -> &str;

    /// Lets the filter build its view of the candidate before `accept`.
    fn relax(&mut self, _delta: &Delta, _deltadelta: Option<&Delta>) {}

    /// Returns false if the candidate is infeasible or its objective cannot
    /// stay within `[objective_min, objective_max]`.
    ///
    /// `deltadelta` holds the part of `delta` that changed since the
    /// previous call, for filters able to exploit it.
    fn accept(&mut self, delta: &Delta, deltadelta: Option<&Delta>, objective_min: i64, objective_max: i64) -> bool;

    /// Makes `assignment` the new baseline. `delta` is the move that led to
    /// it; `None` or an empty delta means the whole assignment is new.
    fn synchronize(&mut self, assignment: &Assignment, delta: Option<&Delta>);

    /// Drops whatever `relax` prepared.
    fn revert(&mut self) {}

    /// Forgets the baseline; the next `synchronize` rebuilds from scratch.
    fn reset(&mut self) {}

    /// Objective of the last accepted candidate.
    fn accepted_objective_value(&self) -> i64 {
        0
    }

    /// Objective of the synchronized baseline.
    fn synchronized_objective_value(&self) -> i64 {
        0
    }
}
