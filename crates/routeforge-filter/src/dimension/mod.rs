//! Cumulative-constraint checking over [`PathState`] candidates.
//!
//! Every path carries a cumul that starts inside its start node's capacity
//! and the path capacity, grows by the demand of every transition and must
//! stay inside each visited node's capacity and the path capacity. Demands
//! are intervals given per path class.
//!
//! [`DimensionChecker::check`] walks the chains of the changed paths only.
//! Long chains that keep their committed capacity class are propagated in
//! O(1) by the RIQ table, unless the path's prefix demands left the `i64`
//! range at the last commit; other chains are walked node by node, reusing the
//! transit demands cached at the last commit when the path class allows.
//!
//! # Example
//!
//! ```
//! use routeforge_config::FilterConfig;
//! use routeforge_core::{Delta, Interval, PathTopology};
//! use routeforge_filter::{DemandEvaluator, DimensionChecker, PathState};
//!
//! // One path 0 -> 1; nodes 2, 3, 4 demand 4, 3 and 5 when visited.
//! let topology = PathTopology::new(5, vec![0], vec![1]).unwrap();
//! let mut path_state = PathState::new(topology);
//! let load = [0, 0, 4, 3, 5];
//! let checker = DimensionChecker::new(
//!     &path_state,
//!     vec![Interval::new(0, 10)],
//!     vec![0],
//!     vec![Box::new(move |_from: usize, to: usize| Interval::point(load[to])) as DemandEvaluator],
//!     vec![Interval::unbounded(); 5],
//!     &FilterConfig::default(),
//! )
//! .unwrap();
//!
//! let two: Delta = [(0, 2), (2, 3), (3, 1)].into_iter().collect();
//! path_state.relax(&two);
//! assert!(checker.check(&path_state));
//!
//! let three: Delta = [(0, 2), (2, 3), (3, 4), (4, 1)].into_iter().collect();
//! path_state.relax(&three);
//! assert!(!checker.check(&path_state));
//! ```

mod riq;

use std::collections::HashMap;
use std::fmt;

use routeforge_config::{EnvironmentMode, FilterConfig};
use routeforge_core::{ExtendedInterval, Interval, Result, RouteForgeError};
use routeforge_core::error::check_len;
use tracing::{debug, trace};

use crate::path_state::{Chain, PathState};
use riq::{RiqNode, RiqTable};

/// Demand of the transition `from -> to`.
pub type DemandEvaluator = Box<dyn Fn(usize, usize) -> Interval>;

/// Checks cumul feasibility of candidate paths.
pub struct DimensionChecker {
    path_capacity: Vec<Interval>,
    path_class: Vec<usize>,
    demand_per_path_class: Vec<DemandEvaluator>,
    node_capacity: Vec<Interval>,
    // Paths share a capacity class iff they share path class and capacity.
    capacity_class: Vec<usize>,
    min_range_size_for_riq: usize,
    max_committed_size: usize,
    environment_mode: EnvironmentMode,

    // Committed layout: every path contiguous, in path order of its last
    // commit. Loops are not stored.
    nodes: Vec<usize>,
    index: Vec<usize>,
    prefix: Vec<ExtendedInterval>,
    riq: RiqTable,
    // Demand from a node to its committed next.
    cached_demand: Vec<Interval>,
    path_ranges: Vec<(usize, usize)>,
    // Prefix sums and RIQ leaves of the path were computed without overflow.
    riq_exact: Vec<bool>,
}

/// Per-path constants used while checking one candidate path.
struct PathContext<'a> {
    path_capacity: ExtendedInterval,
    path_class: usize,
    capacity_class: usize,
    demand: &'a DemandEvaluator,
}

impl DimensionChecker {
    /// Creates a checker and builds its cache from the paths of `path_state`.
    ///
    /// # Errors
    ///
    /// Returns [`RouteForgeError::DimensionMismatch`] when a vector does not
    /// match the node or path count, or a path class has no evaluator.
    pub fn new(
        path_state: &PathState,
        path_capacity: Vec<Interval>,
        path_class: Vec<usize>,
        demand_per_path_class: Vec<DemandEvaluator>,
        node_capacity: Vec<Interval>,
        config: &FilterConfig,
    ) -> Result<Self> {
        let num_nodes = path_state.num_nodes();
        let num_paths = path_state.num_paths();
        check_len("path capacities", num_paths, path_capacity.len())?;
        check_len("path classes", num_paths, path_class.len())?;
        check_len("node capacities", num_nodes, node_capacity.len())?;
        if let Some(&max_class) = path_class.iter().max() {
            if max_class >= demand_per_path_class.len() {
                return Err(RouteForgeError::DimensionMismatch {
                    what: "demand evaluators",
                    expected: max_class + 1,
                    actual: demand_per_path_class.len(),
                });
            }
        }

        let mut classes: HashMap<(usize, Interval), usize> = HashMap::new();
        let capacity_class = path_class
            .iter()
            .zip(&path_capacity)
            .map(|(&class, &capacity)| {
                let next_id = classes.len();
                *classes.entry((class, capacity)).or_insert(next_id)
            })
            .collect();

        let mut checker = Self {
            path_capacity,
            path_class,
            demand_per_path_class,
            node_capacity,
            capacity_class,
            min_range_size_for_riq: config.dimension.min_range_size_for_riq,
            max_committed_size: config.path_state.max_committed_size(num_nodes),
            environment_mode: config.environment_mode,
            nodes: Vec::with_capacity(num_nodes),
            index: vec![0; num_nodes],
            prefix: Vec::with_capacity(num_nodes),
            riq: RiqTable::default(),
            cached_demand: vec![Interval::point(0); num_nodes],
            path_ranges: vec![(0, 0); num_paths],
            riq_exact: vec![true; num_paths],
        };
        checker.full_commit(path_state);
        Ok(checker)
    }

    /// Returns false if some changed path of the candidate violates a
    /// capacity. An invalid candidate is accepted.
    pub fn check(&self, path_state: &PathState) -> bool {
        if path_state.is_invalid() {
            return true;
        }
        for &path in path_state.changed_paths() {
            if !self.check_path(path_state, path) {
                trace!(event = "dimension_reject", path);
                return false;
            }
        }
        true
    }

    fn check_path(&self, path_state: &PathState, path: usize) -> bool {
        let context = PathContext {
            path_capacity: ExtendedInterval::from(self.path_capacity[path]),
            path_class: self.path_class[path],
            capacity_class: self.capacity_class[path],
            demand: &self.demand_per_path_class[self.path_class[path]],
        };
        let mut chains = path_state.chains(path);
        let Some(first_chain) = chains.next() else {
            return true;
        };
        let cumul = self.capacity(first_chain.first()).intersection(&context.path_capacity);
        if cumul.is_empty() {
            return false;
        }
        let Some(mut cumul) = self.propagate_chain(path_state, &context, first_chain, cumul) else {
            return false;
        };
        let mut prev = first_chain.last();
        for chain in chains {
            let transit = (context.demand)(prev, chain.first());
            let Some(bridged) = self.step(&context, cumul, transit, chain.first()) else {
                return false;
            };
            match self.propagate_chain(path_state, &context, chain, bridged) {
                Some(next) => cumul = next,
                None => return false,
            }
            prev = chain.last();
        }
        true
    }

    /// Moves `cumul` from the first to the last node of `chain`.
    fn propagate_chain(
        &self,
        path_state: &PathState,
        context: &PathContext<'_>,
        chain: Chain<'_>,
        cumul: ExtendedInterval,
    ) -> Option<ExtendedInterval> {
        let span = chain.num_nodes() - 1;
        if span == 0 {
            return Some(cumul);
        }
        let committed_path = path_state.path(chain.first());
        if let Some(committed) = committed_path {
            if span > self.min_range_size_for_riq
                && self.riq_exact[committed]
                && self.capacity_class[committed] == context.capacity_class
            {
                let i = self.index[chain.first()];
                let j = i + span;
                debug_assert_eq!(self.index[chain.last()], j);
                trace!(event = "riq_query", first = chain.first(), last = chain.last(), span);
                if let Some(result) = self.riq.window(i, j).propagate(cumul, self.prefix[i], self.prefix[j]) {
                    return result;
                }
                trace!(event = "riq_out_of_range", first = chain.first(), last = chain.last());
            }
        }

        let use_cache = committed_path.is_some_and(|q| self.path_class[q] == context.path_class);
        let mut cumul = cumul;
        let mut prev = chain.first();
        for node in chain.without_first_node() {
            let transit = if use_cache {
                self.cached_demand[prev]
            } else {
                (context.demand)(prev, node)
            };
            cumul = self.step(context, cumul, transit, node)?;
            prev = node;
        }
        Some(cumul)
    }

    /// Adds `transit` to `cumul` and clamps it at `node`.
    #[inline]
    fn step(
        &self,
        context: &PathContext<'_>,
        cumul: ExtendedInterval,
        transit: Interval,
        node: usize,
    ) -> Option<ExtendedInterval> {
        if transit.is_empty() {
            return None;
        }
        let cumul = (cumul + ExtendedInterval::from(transit))
            .intersection(&self.capacity(node))
            .intersection(&context.path_capacity);
        (!cumul.is_empty()).then_some(cumul)
    }

    #[inline]
    fn capacity(&self, node: usize) -> ExtendedInterval {
        ExtendedInterval::from(self.node_capacity[node])
    }

    /// Brings the cache in line with the paths of `path_state`.
    ///
    /// May run before or after [`PathState::commit`] in the same cycle: it
    /// reads the changed paths of the pending candidate, or the paths
    /// rewritten by the last commit.
    pub fn commit(&mut self, path_state: &PathState) {
        let paths = if path_state.changed_paths().is_empty() {
            path_state.last_committed_paths()
        } else {
            path_state.changed_paths()
        };
        if paths.is_empty() {
            return;
        }
        let change_size: usize = paths
            .iter()
            .flat_map(|&path| path_state.chains(path))
            .map(|chain| chain.num_nodes())
            .sum();
        let incremental = self.nodes.len() + change_size < self.max_committed_size;
        if incremental {
            for &path in paths {
                self.append_path(path_state, path);
            }
        } else {
            self.full_commit(path_state);
        }
        debug!(
            event = "dimension_commit",
            incremental,
            changed_paths = paths.len(),
            committed_size = self.nodes.len(),
            riq_layers = self.riq.num_layers()
        );
        if self.environment_mode.is_fully_asserted() {
            self.riq.assert_consistent(&self.path_ranges);
        }
    }

    fn full_commit(&mut self, path_state: &PathState) {
        self.nodes.clear();
        self.prefix.clear();
        self.riq.clear();
        for path in 0..path_state.num_paths() {
            self.append_path(path_state, path);
        }
    }

    /// Appends the candidate nodes of `path` and their RIQ windows.
    fn append_path(&mut self, path_state: &PathState, path: usize) {
        let begin = self.nodes.len();
        self.nodes.extend(path_state.nodes(path));
        let end = self.nodes.len();
        self.path_ranges[path] = (begin, end);

        let path_capacity = ExtendedInterval::from(self.path_capacity[path]);
        let demand = &self.demand_per_path_class[self.path_class[path]];
        let mut leaves = Vec::with_capacity(end - begin);
        let mut prefix = ExtendedInterval::ZERO;
        let mut exact = true;
        for index in begin..end {
            let node = self.nodes[index];
            self.index[node] = index;
            if index > begin {
                let prev = self.nodes[index - 1];
                let transit = demand(prev, node);
                self.cached_demand[prev] = transit;
                let transit_sum = ExtendedInterval::from(transit);
                prefix = prefix.checked_add(&transit_sum).unwrap_or_else(|| {
                    exact = false;
                    prefix + transit_sum
                });
                let capacity = ExtendedInterval::from(self.node_capacity[node]).intersection(&path_capacity);
                let leaf = RiqNode::leaf(capacity, prefix, !transit.is_empty()).unwrap_or_else(|| {
                    exact = false;
                    RiqNode::PLACEHOLDER
                });
                leaves.push(leaf);
            }
            self.prefix.push(prefix);
        }
        leaves.push(RiqNode::PLACEHOLDER);
        self.riq.push_path(&leaves);
        if !exact {
            debug!(event = "riq_disabled", path, reason = "prefix demands out of range");
        }
        self.riq_exact[path] = exact;
    }
}

impl fmt::Debug for DimensionChecker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DimensionChecker")
            .field("num_paths", &self.path_capacity.len())
            .field("num_path_classes", &self.demand_per_path_class.len())
            .field("committed_size", &self.nodes.len())
            .field("riq_layers", &self.riq.num_layers())
            .finish()
    }
}
