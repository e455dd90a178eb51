//! Shared Accept/Synchronize skeleton for path-based filters.
//!
//! [`BasePathFilter`] keeps, for the synchronized solution, the path start
//! and the rank (position from the start) of every performed node. On
//! `accept` it finds the paths touched by the delta and, per path, the
//! touched nodes of lowest and highest rank; a concrete filter only has to
//! judge those paths through [`PathFilterHooks`].
//!
//! # Zero-Erasure Design
//!
//! - Hooks are a generic parameter, so every call is statically dispatched
//! - Hooks receive the shared [`PathFilterState`] by reference; filters own
//!   only their own data

use routeforge_core::{Assignment, Delta, PathTopology, SparseBitset};
use tracing::{debug, trace, warn};

use super::LocalSearchFilter;

/// Capabilities a concrete path filter implements.
///
/// Only [`accept_path`](Self::accept_path) and [`name`](Self::name) are
/// required.
pub trait PathFilterHooks {
    fn name(&self) -> &str;

    /// Called for every path start whose ranks were recomputed.
    fn on_synchronize_path_from_start(&mut self, _state: &PathFilterState, _start: usize) {}

    /// Called once before synchronized paths are walked.
    fn on_before_synchronize_paths(&mut self, _state: &PathFilterState) {}

    /// Called once after every touched path was synchronized.
    fn on_after_synchronize_paths(&mut self, _state: &PathFilterState) {}

    /// Called before the touched paths are accepted; false rejects.
    fn initialize_accept_path(&mut self, _state: &PathFilterState) -> bool {
        true
    }

    /// Judges one touched path. `chain_start` and `chain_end` are the
    /// touched nodes of lowest and highest synchronized rank on it.
    fn accept_path(&mut self, state: &PathFilterState, path_start: usize, chain_start: usize, chain_end: usize) -> bool;

    /// Called after every touched path was accepted; false rejects.
    fn finalize_accept_path(&mut self, _state: &PathFilterState, _objective_min: i64, _objective_max: i64) -> bool {
        true
    }

    /// A disabled filter accepts everything and skips synchronization.
    fn disable_filtering(&self) -> bool {
        false
    }

    fn accepted_objective_value(&self, _state: &PathFilterState) -> i64 {
        0
    }

    fn synchronized_objective_value(&self) -> i64 {
        0
    }
}

/// Synchronized paths and the candidate view of the last `accept`.
#[derive(Debug, Clone)]
pub struct PathFilterState {
    topology: PathTopology,

    // Synchronized solution.
    values: Vec<Option<usize>>,
    values_synced: bool,
    node_path_starts: Vec<Option<usize>>,
    ranks: Vec<Option<usize>>,
    new_synchronized_unperformed_nodes: SparseBitset,

    // Candidate.
    new_nexts: Vec<usize>,
    delta_touched: SparseBitset,
    touched_paths: SparseBitset,
    touched_path_starts: Vec<usize>,
    touched_path_chain_start_ends: Vec<(usize, usize)>,
    lns_detected: bool,

    // Synchronization scratch.
    synced_starts: SparseBitset,
}

impl PathFilterState {
    pub fn new(topology: PathTopology) -> Self {
        let num_nodes = topology.num_nodes();
        let num_paths = topology.num_paths();
        Self {
            topology,
            values: vec![None; num_nodes],
            values_synced: false,
            node_path_starts: vec![None; num_nodes],
            ranks: vec![None; num_nodes],
            new_synchronized_unperformed_nodes: SparseBitset::new(num_nodes),
            new_nexts: vec![0; num_nodes],
            delta_touched: SparseBitset::new(num_nodes),
            touched_paths: SparseBitset::new(num_paths),
            touched_path_starts: Vec::with_capacity(num_paths),
            touched_path_chain_start_ends: vec![(0, 0); num_paths],
            lns_detected: false,
            synced_starts: SparseBitset::new(num_nodes),
        }
    }

    #[inline]
    pub fn topology(&self) -> &PathTopology {
        &self.topology
    }

    #[inline]
    pub fn num_nodes(&self) -> usize {
        self.topology.num_nodes()
    }

    #[inline]
    pub fn num_paths(&self) -> usize {
        self.topology.num_paths()
    }

    #[inline]
    pub fn start(&self, path: usize) -> usize {
        self.topology.start(path)
    }

    #[inline]
    pub fn end(&self, path: usize) -> usize {
        self.topology.end(path)
    }

    /// Synchronized next of `node`.
    #[inline]
    pub fn value(&self, node: usize) -> Option<usize> {
        self.values[node]
    }

    #[inline]
    pub fn is_var_synced(&self, node: usize) -> bool {
        self.values[node].is_some()
    }

    /// Next of `node` in the candidate of the last `accept`.
    #[inline]
    pub fn get_next(&self, node: usize) -> Option<usize> {
        if self.delta_touched.get(node) {
            Some(self.new_nexts[node])
        } else {
            self.values[node]
        }
    }

    /// Synchronized position of `node` on its path, `0` at the start.
    #[inline]
    pub fn rank(&self, node: usize) -> Option<usize> {
        self.ranks[node]
    }

    /// Synchronized start of the path holding `node`.
    #[inline]
    pub fn get_path_start(&self, node: usize) -> Option<usize> {
        self.node_path_starts[node]
    }

    /// True when the last `accept` saw an unbound element.
    #[inline]
    pub fn lns_detected(&self) -> bool {
        self.lns_detected
    }

    #[inline]
    pub fn path_start_touched(&self, start: usize) -> bool {
        self.topology
            .path_of_start(start)
            .is_some_and(|path| self.touched_paths.get(path))
    }

    /// Starts of the paths touched by the last `accept`.
    #[inline]
    pub fn touched_path_starts(&self) -> &[usize] {
        &self.touched_path_starts
    }

    /// Nodes that left every path in the last synchronization.
    #[inline]
    pub fn new_synchronized_unperformed_nodes(&self) -> &[usize] {
        self.new_synchronized_unperformed_nodes.positions_set()
    }

    /// True when at least one path has synchronized ranks.
    pub fn has_any_synced_path(&self) -> bool {
        self.topology.starts().iter().any(|&start| self.ranks[start].is_some())
    }

    fn clear_candidate(&mut self) {
        self.delta_touched.clear();
        self.touched_paths.clear();
        self.touched_path_starts.clear();
        self.lns_detected = false;
    }

    /// Records `delta` as the candidate. Returns false on an unbound
    /// element, leaving `lns_detected` set.
    fn load_candidate(&mut self, delta: &Delta) -> bool {
        self.clear_candidate();
        let num_nodes = self.num_nodes();
        if delta.elements().iter().any(|e| e.index < num_nodes && !e.bound) {
            self.lns_detected = true;
            return false;
        }
        for element in delta.elements() {
            let node = element.index;
            if node >= num_nodes {
                continue;
            }
            self.new_nexts[node] = element.value;
            self.delta_touched.set(node);
            let (Some(start), Some(rank)) = (self.node_path_starts[node], self.ranks[node]) else {
                continue;
            };
            let Some(path) = self.topology.path_of_start(start) else {
                continue;
            };
            if self.touched_paths.set(path) {
                self.touched_path_starts.push(start);
                self.touched_path_chain_start_ends[path] = (node, node);
                continue;
            }
            let (chain_start, chain_end) = &mut self.touched_path_chain_start_ends[path];
            if self.ranks[*chain_start].is_some_and(|r| rank < r) {
                *chain_start = node;
            }
            if self.ranks[*chain_end].is_some_and(|r| rank > r) {
                *chain_end = node;
            }
        }
        true
    }

    /// Numbers the nodes of the path starting at `start`.
    fn update_path_ranks_from_start(&mut self, start: usize) {
        let mut node = start;
        let mut rank = 0;
        // A path never holds more than every node.
        for _ in 0..self.num_nodes() {
            self.node_path_starts[node] = Some(start);
            self.ranks[node] = Some(rank);
            match self.values[node] {
                Some(next) if next != node => {
                    node = next;
                    rank += 1;
                }
                _ => return,
            }
        }
        warn!(event = "path_not_terminated", start);
    }
}

/// Filter skeleton driving [`PathFilterHooks`].
///
/// # Example
///
/// ```
/// use routeforge_core::{Assignment, Delta, PathTopology};
/// use routeforge_filter::{BasePathFilter, LocalSearchFilter, PathFilterHooks, PathFilterState};
///
/// /// Rejects routes longer than `max_visits` customers.
/// struct MaxVisits {
///     max_visits: usize,
/// }
///
/// impl PathFilterHooks for MaxVisits {
///     fn name(&self) -> &str {
///         "MaxVisits"
///     }
///
///     fn accept_path(&mut self, state: &PathFilterState, start: usize, _: usize, _: usize) -> bool {
///         let end = state.end(state.topology().path_of_start(start).unwrap());
///         let mut node = start;
///         let mut visits = 0;
///         while let Some(next) = state.get_next(node).filter(|&n| n != end) {
///             visits += 1;
///             node = next;
///         }
///         visits <= self.max_visits
///     }
/// }
///
/// let topology = PathTopology::new(5, vec![0], vec![1]).unwrap();
/// let mut filter = BasePathFilter::new(topology.clone(), MaxVisits { max_visits: 2 });
/// filter.synchronize(&Assignment::from_routes(&topology, &[vec![0, 2, 1]]), None);
///
/// let two: Delta = [(2, 3), (3, 1)].into_iter().collect();
/// assert!(filter.accept(&two, None, 0, 0));
/// let three: Delta = [(2, 3), (3, 4), (4, 1)].into_iter().collect();
/// assert!(!filter.accept(&three, None, 0, 0));
/// ```
#[derive(Debug, Clone)]
pub struct BasePathFilter<H> {
    state: PathFilterState,
    hooks: H,
}

impl<H: PathFilterHooks> BasePathFilter<H> {
    pub fn new(topology: PathTopology, hooks: H) -> Self {
        Self {
            state: PathFilterState::new(topology),
            hooks,
        }
    }

    #[inline]
    pub fn state(&self) -> &PathFilterState {
        &self.state
    }

    #[inline]
    pub fn hooks(&self) -> &H {
        &self.hooks
    }

    #[inline]
    pub fn hooks_mut(&mut self) -> &mut H {
        &mut self.hooks
    }

    fn synchronize_full_assignment(&mut self) {
        let num_nodes = self.state.num_nodes();
        self.state.node_path_starts.fill(None);
        self.state.ranks.fill(None);
        for node in 0..num_nodes {
            if self.state.values[node] == Some(node) {
                self.state.new_synchronized_unperformed_nodes.set(node);
            }
        }
        self.hooks.on_before_synchronize_paths(&self.state);
        for path in 0..self.state.num_paths() {
            let start = self.state.start(path);
            self.state.update_path_ranks_from_start(start);
        }
        for path in 0..self.state.num_paths() {
            let start = self.state.start(path);
            self.hooks.on_synchronize_path_from_start(&self.state, start);
        }
        self.hooks.on_after_synchronize_paths(&self.state);
        debug!(event = "path_filter_sync", filter = self.hooks.name(), mode = "full");
    }

    fn synchronize_touched_paths(&mut self, delta: &Delta) {
        let num_nodes = self.state.num_nodes();
        self.state.synced_starts.clear();
        for element in delta.elements() {
            let node = element.index;
            if node >= num_nodes {
                continue;
            }
            if let Some(start) = self.state.node_path_starts[node] {
                self.state.synced_starts.set(start);
            }
            if self.state.values[node] == Some(node) {
                self.state.new_synchronized_unperformed_nodes.set(node);
                self.state.node_path_starts[node] = None;
                self.state.ranks[node] = None;
            }
        }
        self.hooks.on_before_synchronize_paths(&self.state);
        for k in 0..self.state.synced_starts.positions_set().len() {
            let start = self.state.synced_starts.positions_set()[k];
            self.state.update_path_ranks_from_start(start);
        }
        for &start in self.state.synced_starts.positions_set() {
            self.hooks.on_synchronize_path_from_start(&self.state, start);
        }
        self.hooks.on_after_synchronize_paths(&self.state);
        debug!(
            event = "path_filter_sync",
            filter = self.hooks.name(),
            mode = "incremental",
            touched_paths = self.state.synced_starts.positions_set().len()
        );
    }
}

impl<H: PathFilterHooks> LocalSearchFilter for BasePathFilter<H> {
    fn name(&self) -> &str {
        self.hooks.name()
    }

    fn accept(&mut self, delta: &Delta, _deltadelta: Option<&Delta>, objective_min: i64, objective_max: i64) -> bool {
        if self.hooks.disable_filtering() {
            return true;
        }
        if !self.state.load_candidate(delta) {
            trace!(event = "lns_detected", filter = self.hooks.name());
            return true;
        }
        if !self.hooks.initialize_accept_path(&self.state) {
            return false;
        }
        for k in 0..self.state.touched_path_starts.len() {
            let start = self.state.touched_path_starts[k];
            let Some(path) = self.state.topology.path_of_start(start) else {
                continue;
            };
            let (chain_start, chain_end) = self.state.touched_path_chain_start_ends[path];
            if !self.hooks.accept_path(&self.state, start, chain_start, chain_end) {
                trace!(event = "path_rejected", filter = self.hooks.name(), path);
                return false;
            }
        }
        self.hooks.finalize_accept_path(&self.state, objective_min, objective_max)
    }

    fn synchronize(&mut self, assignment: &Assignment, delta: Option<&Delta>) {
        let num_nodes = self.state.num_nodes();
        self.state.new_synchronized_unperformed_nodes.clear();
        // A sparse update needs a complete baseline to patch.
        let delta = delta.filter(|d| !d.is_empty() && self.state.values_synced);
        match delta {
            Some(delta) => {
                for element in delta.elements() {
                    if element.index < num_nodes {
                        self.state.values[element.index] = assignment.next(element.index);
                    }
                }
            }
            None => {
                for node in 0..num_nodes {
                    self.state.values[node] = assignment.next(node);
                }
            }
        }
        self.state.values_synced = true;
        if self.hooks.disable_filtering() {
            return;
        }
        match delta {
            Some(delta) if self.state.has_any_synced_path() => self.synchronize_touched_paths(delta),
            _ => self.synchronize_full_assignment(),
        }
    }

    fn revert(&mut self) {
        self.state.clear_candidate();
    }

    fn reset(&mut self) {
        self.state.clear_candidate();
        self.state.values.fill(None);
        self.state.values_synced = false;
        self.state.node_path_starts.fill(None);
        self.state.ranks.fill(None);
        self.state.new_synchronized_unperformed_nodes.clear();
    }

    fn accepted_objective_value(&self) -> i64 {
        self.hooks.accepted_objective_value(&self.state)
    }

    fn synchronized_objective_value(&self) -> i64 {
        self.hooks.synchronized_objective_value()
    }
}

#[cfg(test)]
#[path = "base_path_tests.rs"]
mod tests;
