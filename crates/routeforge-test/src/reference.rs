//! From-scratch cumul computations used as test oracles.
//!
//! # Example
//!
//! ```
//! use routeforge_core::Interval;
//! use routeforge_test::route_is_feasible;
//!
//! // Start 0, visits 2, 3, 4 with demands 4, 3, 5, end 1.
//! let demands = [0, 0, 4, 3, 5];
//! let node_capacity = vec![Interval::new(0, 10); 5];
//! let demand = |from: usize, _to: usize| Interval::point(demands[from]);
//! let route = [0, 2, 3, 4, 1];
//! assert!(!route_is_feasible(&route, Interval::new(0, 10), &node_capacity, demand));
//! assert!(route_is_feasible(&route[..3], Interval::new(0, 10), &node_capacity, demand));
//! ```

use routeforge_core::{ExtendedInterval, Interval};

/// Cumul interval at the last node of `route`, or `None` if it empties.
///
/// The cumul starts at the first node's capacity intersected with the path
/// capacity; every transition adds its demand and intersects with the next
/// node's capacity and the path capacity.
pub fn route_cumul<D>(
    route: &[usize],
    path_capacity: Interval,
    node_capacity: &[Interval],
    demand: D,
) -> Option<ExtendedInterval>
where
    D: Fn(usize, usize) -> Interval,
{
    let first = *route.first()?;
    let path_capacity = ExtendedInterval::from(path_capacity);
    let mut cumul = ExtendedInterval::from(node_capacity[first]).intersection(&path_capacity);
    if cumul.is_empty() {
        return None;
    }
    for pair in route.windows(2) {
        let transit = demand(pair[0], pair[1]);
        if transit.is_empty() {
            return None;
        }
        cumul = (cumul + ExtendedInterval::from(transit))
            .intersection(&ExtendedInterval::from(node_capacity[pair[1]]))
            .intersection(&path_capacity);
        if cumul.is_empty() {
            return None;
        }
    }
    Some(cumul)
}

/// Whether the cumul stays nonempty along `route`.
pub fn route_is_feasible<D>(route: &[usize], path_capacity: Interval, node_capacity: &[Interval], demand: D) -> bool
where
    D: Fn(usize, usize) -> Interval,
{
    route_cumul(route, path_capacity, node_capacity, demand).is_some()
}
