//! Filter owning the shared [`PathState`].

use std::cell::RefCell;
use std::rc::Rc;

use routeforge_core::{Assignment, Delta};
use tracing::{debug, warn};

use super::LocalSearchFilter;
use crate::path_state::PathState;

/// Keeps a shared [`PathState`] in step with the search.
///
/// It rejects nothing. Filters reading the same path state, such as
/// [`DimensionFilter`](super::DimensionFilter), must be driven after it.
///
/// # Example
///
/// ```
/// use std::cell::RefCell;
/// use std::rc::Rc;
///
/// use routeforge_core::{Assignment, Delta, PathTopology};
/// use routeforge_filter::{LocalSearchFilter, PathState, PathStateFilter};
///
/// let topology = PathTopology::new(4, vec![0], vec![1]).unwrap();
/// let path_state = Rc::new(RefCell::new(PathState::new(topology.clone())));
/// let mut filter = PathStateFilter::new(Rc::clone(&path_state));
///
/// let insert: Delta = [(0, 2), (2, 1)].into_iter().collect();
/// filter.relax(&insert, None);
/// assert!(filter.accept(&insert, None, i64::MIN, i64::MAX));
/// filter.synchronize(&Assignment::from_routes(&topology, &[vec![0, 2, 1]]), Some(&insert));
/// assert_eq!(path_state.borrow().path(2), Some(0));
/// ```
#[derive(Debug)]
pub struct PathStateFilter {
    path_state: Rc<RefCell<PathState>>,
}

impl PathStateFilter {
    pub fn new(path_state: Rc<RefCell<PathState>>) -> Self {
        Self { path_state }
    }

    /// The path state shared with dependent filters.
    pub fn path_state(&self) -> &Rc<RefCell<PathState>> {
        &self.path_state
    }
}

impl LocalSearchFilter for PathStateFilter {
    fn name(&self) -> &str {
        "PathStateFilter"
    }

    fn relax(&mut self, delta: &Delta, _deltadelta: Option<&Delta>) {
        self.path_state.borrow_mut().relax(delta);
    }

    fn accept(&mut self, _delta: &Delta, _deltadelta: Option<&Delta>, _objective_min: i64, _objective_max: i64) -> bool {
        true
    }

    fn synchronize(&mut self, assignment: &Assignment, delta: Option<&Delta>) {
        let mut path_state = self.path_state.borrow_mut();
        match delta.filter(|d| !d.is_empty() && !d.has_unbound()) {
            Some(delta) => path_state.relax(delta),
            None => {
                debug!(event = "path_state_rebuild", num_nodes = path_state.num_nodes());
                path_state.reset();
                path_state.relax(&assignment.to_delta());
            }
        }
        if path_state.is_invalid() {
            warn!(event = "path_state_sync_failed");
            path_state.revert();
            return;
        }
        path_state.commit();
    }

    fn revert(&mut self) {
        self.path_state.borrow_mut().revert();
    }

    fn reset(&mut self) {
        self.path_state.borrow_mut().reset();
    }
}
