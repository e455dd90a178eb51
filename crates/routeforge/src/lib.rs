//! RouteForge - Incremental Route Filters in Rust
//!
//! Judge local search moves on vehicle routes without re-walking whole
//! routes: relax the move, ask every filter, then synchronize or revert.
//!
//! # Example
//!
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! use routeforge::prelude::*;
//!
//! // One vehicle 0 -> 1 carrying at most 5; customers 2, 3, 4 load 2, 2, 3.
//! let topology = PathTopology::new(5, vec![0], vec![1]).unwrap();
//! let path_state = Rc::new(RefCell::new(PathState::new(topology.clone())));
//! let load = [0, 0, 2, 2, 3];
//! let checker = DimensionChecker::new(
//!     &path_state.borrow(),
//!     vec![Interval::new(0, 5)],
//!     vec![0],
//!     vec![Box::new(move |_from: usize, to: usize| Interval::point(load[to])) as DemandEvaluator],
//!     vec![Interval::unbounded(); 5],
//!     &FilterConfig::default(),
//! )
//! .unwrap();
//! let mut filters: Vec<Box<dyn LocalSearchFilter>> = vec![
//!     Box::new(PathStateFilter::new(Rc::clone(&path_state))),
//!     Box::new(DimensionFilter::new("Load", Rc::clone(&path_state), checker)),
//! ];
//!
//! // Relax into every filter, then accept in order.
//! let three: Delta = [(0, 2), (2, 3), (3, 4), (4, 1)].into_iter().collect();
//! filters.iter_mut().for_each(|f| f.relax(&three, None));
//! assert!(!filters.iter_mut().all(|f| f.accept(&three, None, i64::MIN, i64::MAX)));
//! filters.iter_mut().for_each(|f| f.revert());
//!
//! let two: Delta = [(0, 2), (2, 3), (3, 1)].into_iter().collect();
//! filters.iter_mut().for_each(|f| f.relax(&two, None));
//! assert!(filters.iter_mut().all(|f| f.accept(&two, None, i64::MIN, i64::MAX)));
//! let solution = Assignment::from_routes(&topology, &[vec![0, 2, 3, 1]]);
//! filters.iter_mut().for_each(|f| f.synchronize(&solution, Some(&two)));
//! assert_eq!(path_state.borrow().path(3), Some(0));
//! ```

pub mod console;

// Core types
pub use routeforge_core::{
    Assignment, CommittableArray, CommittableValue, Delta, DeltaElement, ExtendedInterval, ExtendedValue,
    Interval, PathTopology, Result, RouteForgeError,
};

// Configuration
pub use routeforge_config::{ChainAlgorithm, ConfigError, EnvironmentMode, FilterConfig};

// Path state and dimension checking
pub use routeforge_filter::{Chain, ChainBounds, DemandEvaluator, DimensionChecker, PathState};

// Filters
pub use routeforge_filter::{
    AmortizedCost, BasePathFilter, DimensionFilter, LocalSearchFilter, PathFilterHooks, PathFilterState,
    PathStateFilter, VehicleAmortizedCostFilter,
};

pub mod prelude {
    pub use super::{
        Assignment, BasePathFilter, Delta, DemandEvaluator, DimensionChecker, DimensionFilter, FilterConfig,
        Interval, LocalSearchFilter, PathFilterHooks, PathFilterState, PathState, PathStateFilter, PathTopology,
        VehicleAmortizedCostFilter,
    };
}
