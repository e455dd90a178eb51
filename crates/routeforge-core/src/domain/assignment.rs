//! Full next-node solution.

use super::{Delta, PathTopology};

/// Next node of every node; `None` for path ends and unassigned nodes.
///
/// A node whose next is itself is a loop (unperformed).
///
/// # Example
///
/// ```
/// use routeforge_core::{Assignment, PathTopology};
///
/// let topology = PathTopology::new(5, vec![0], vec![1]).unwrap();
/// let assignment = Assignment::from_routes(&topology, &[vec![0, 3, 2, 1]]);
/// assert_eq!(assignment.next(0), Some(3));
/// assert_eq!(assignment.next(1), None);
/// assert!(assignment.is_loop(4));
/// assert_eq!(assignment.route(&topology, 0), vec![0, 3, 2, 1]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Assignment {
    nexts: Vec<Option<usize>>,
}

impl Assignment {
    /// An assignment with every next unassigned.
    pub fn new(num_nodes: usize) -> Self {
        Self {
            nexts: vec![None; num_nodes],
        }
    }

    /// Builds an assignment from complete routes, one per path in path
    /// order. Nodes on no route become loops; path ends keep `None`.
    pub fn from_routes(topology: &PathTopology, routes: &[Vec<usize>]) -> Self {
        debug_assert_eq!(routes.len(), topology.num_paths());
        let num_nodes = topology.num_nodes();
        let mut nexts: Vec<Option<usize>> = (0..num_nodes).map(Some).collect();
        for &end in topology.ends() {
            nexts[end] = None;
        }
        for route in routes {
            for pair in route.windows(2) {
                nexts[pair[0]] = Some(pair[1]);
            }
        }
        Self { nexts }
    }

    #[inline]
    pub fn num_nodes(&self) -> usize {
        self.nexts.len()
    }

    #[inline]
    pub fn next(&self, node: usize) -> Option<usize> {
        self.nexts[node]
    }

    #[inline]
    pub fn set_next(&mut self, node: usize, next: usize) {
        self.nexts[node] = Some(next);
    }

    #[inline]
    pub fn is_loop(&self, node: usize) -> bool {
        self.nexts[node] == Some(node)
    }

    /// Applies the bound next-node elements of `delta`.
    pub fn apply(&mut self, delta: &Delta) {
        for element in delta.elements() {
            if element.bound && element.index < self.nexts.len() {
                self.nexts[element.index] = Some(element.value);
            }
        }
    }

    /// Follows nexts from the start of `path` to its end.
    pub fn route(&self, topology: &PathTopology, path: usize) -> Vec<usize> {
        let end = topology.end(path);
        let mut route = vec![topology.start(path)];
        let mut node = topology.start(path);
        while node != end {
            match self.nexts[node] {
                Some(next) if route.len() <= self.nexts.len() => {
                    route.push(next);
                    node = next;
                }
                _ => break,
            }
        }
        route
    }

    /// Returns a delta that turns the all-loops solution into this one.
    pub fn to_delta(&self) -> Delta {
        self.nexts
            .iter()
            .enumerate()
            .filter_map(|(node, next)| next.map(|next| (node, next)))
            .collect()
    }
}
