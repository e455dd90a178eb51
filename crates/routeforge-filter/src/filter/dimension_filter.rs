//! Capacity filter over a shared [`PathState`].

use std::cell::RefCell;
use std::rc::Rc;

use routeforge_core::{Assignment, Delta};
use tracing::trace;

use super::LocalSearchFilter;
use crate::dimension::DimensionChecker;
use crate::path_state::PathState;

/// Rejects candidates that break a cumulative capacity.
///
/// Reads the candidate prepared by the [`PathStateFilter`](super::PathStateFilter)
/// owning `path_state`, so it must be driven after that filter.
#[derive(Debug)]
pub struct DimensionFilter {
    name: String,
    path_state: Rc<RefCell<PathState>>,
    checker: DimensionChecker,
}

impl DimensionFilter {
    pub fn new(name: impl Into<String>, path_state: Rc<RefCell<PathState>>, checker: DimensionChecker) -> Self {
        Self {
            name: name.into(),
            path_state,
            checker,
        }
    }

    pub fn checker(&self) -> &DimensionChecker {
        &self.checker
    }
}

impl LocalSearchFilter for DimensionFilter {
    fn name(&self) -> &str {
        &self.name
    }

    fn accept(&mut self, _delta: &Delta, _deltadelta: Option<&Delta>, _objective_min: i64, _objective_max: i64) -> bool {
        let accepted = self.checker.check(&self.path_state.borrow());
        if !accepted {
            trace!(event = "filter_reject", filter = %self.name);
        }
        accepted
    }

    fn synchronize(&mut self, _assignment: &Assignment, _delta: Option<&Delta>) {
        self.checker.commit(&self.path_state.borrow());
    }
}
