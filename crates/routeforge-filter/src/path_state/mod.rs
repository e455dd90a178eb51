//! Incremental representation of a set of paths.
//!
//! # Committed and candidate states
//!
//! The committed state stores every path as a contiguous range of a flat
//! `committed_nodes` array, followed by the loops (unperformed nodes). A
//! candidate is described relative to it: each changed path becomes a list
//! of chains, and each chain is a range of committed indices. Paths the
//! candidate does not touch keep a single chain equal to their committed
//! range.
//!
//! Relaxing a move costs O(k log k) in the number of changed arcs. Commit
//! appends the changed paths to `committed_nodes` and reindexes only the
//! appended region; when the array grows past a threshold it is rebuilt
//! from scratch.
//!
//! # Example
//!
//! ```
//! use routeforge_core::{Delta, PathTopology};
//! use routeforge_filter::PathState;
//!
//! // One path 0 -> 1, nodes 2 and 3 unperformed.
//! let topology = PathTopology::new(4, vec![0], vec![1]).unwrap();
//! let mut state = PathState::new(topology);
//!
//! let delta: Delta = [(0, 2), (2, 3), (3, 1)].into_iter().collect();
//! state.relax(&delta);
//! assert_eq!(state.nodes(0).collect::<Vec<_>>(), vec![0, 2, 3, 1]);
//!
//! state.commit();
//! assert_eq!(state.path(3), Some(0));
//! assert_eq!(state.chains(0).len(), 1);
//! ```

mod chain;
mod decompose;

pub use chain::{Chain, ChainBounds, Chains};

use routeforge_config::{EnvironmentMode, FilterConfig, PathStateConfig};
use routeforge_core::{Delta, PathTopology, SparseBitset};
use tracing::{debug, trace};

use chain::PathBounds;
use decompose::{ArcLinker, TailHead};

/// Candidate/committed view of all paths.
#[derive(Debug)]
pub struct PathState {
    topology: PathTopology,
    config: PathStateConfig,
    environment_mode: EnvironmentMode,

    // Committed state.
    committed_nodes: Vec<usize>,
    committed_index: Vec<usize>,
    committed_path: Vec<Option<usize>>,
    committed_paths: Vec<ChainBounds>,

    // Candidate state. The first `num_paths` chains mirror
    // `committed_paths`, followed by one sentinel.
    chains: Vec<ChainBounds>,
    paths: Vec<PathBounds>,
    changed_paths: SparseBitset,
    changed_loops: SparseBitset,
    is_invalid: bool,

    last_committed_paths: Vec<usize>,

    // Relax scratch.
    changed_arcs: Vec<(usize, usize)>,
    arc_nodes: SparseBitset,
    arcs: Vec<TailHead>,
    linker: ArcLinker,
}

impl PathState {
    /// Creates a state where every path is `start -> end` and every other
    /// node is a loop.
    pub fn new(topology: PathTopology) -> Self {
        Self::with_config(topology, &FilterConfig::default())
    }

    pub fn with_config(topology: PathTopology, config: &FilterConfig) -> Self {
        let num_nodes = topology.num_nodes();
        let num_paths = topology.num_paths();
        let mut state = Self {
            topology,
            config: config.path_state.clone(),
            environment_mode: config.environment_mode,
            committed_nodes: Vec::with_capacity(config.path_state.max_committed_size(num_nodes)),
            committed_index: vec![0; num_nodes],
            committed_path: vec![None; num_nodes],
            committed_paths: vec![ChainBounds::default(); num_paths],
            chains: Vec::with_capacity(num_paths + 1),
            paths: vec![PathBounds::default(); num_paths],
            changed_paths: SparseBitset::new(num_paths),
            changed_loops: SparseBitset::new(num_nodes),
            is_invalid: false,
            last_committed_paths: Vec::new(),
            changed_arcs: Vec::new(),
            arc_nodes: SparseBitset::new(num_nodes),
            arcs: Vec::new(),
            linker: ArcLinker::default(),
        };
        state.reset();
        state
    }

    // ========================================================================
    // Topology
    // ========================================================================

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

    #[inline]
    pub fn topology(&self) -> &PathTopology {
        &self.topology
    }

    // ========================================================================
    // Committed state
    // ========================================================================

    /// Committed path of `node`; `None` for loops.
    #[inline]
    pub fn path(&self, node: usize) -> Option<usize> {
        self.committed_path[node]
    }

    /// Position of `node` in the committed layout.
    #[inline]
    pub fn committed_index(&self, node: usize) -> usize {
        self.committed_index[node]
    }

    /// Length of the committed node array, stale regions included.
    #[inline]
    pub fn committed_size(&self) -> usize {
        self.committed_nodes.len()
    }

    /// Paths changed by the latest commit.
    #[inline]
    pub fn last_committed_paths(&self) -> &[usize] {
        &self.last_committed_paths
    }

    // ========================================================================
    // Candidate state
    // ========================================================================

    /// Chains of the candidate `path`, in path order.
    pub fn chains(&self, path: usize) -> Chains<'_> {
        let bounds = self.paths[path];
        Chains::new(
            &self.committed_nodes,
            &self.chains[bounds.begin_chain..bounds.end_chain],
        )
    }

    /// Nodes of the candidate `path`, start to end.
    pub fn nodes(&self, path: usize) -> impl Iterator<Item = usize> + '_ {
        self.chains(path).flat_map(|chain| chain.iter())
    }

    /// Paths changed by the current candidate, in first-touched order.
    #[inline]
    pub fn changed_paths(&self) -> &[usize] {
        self.changed_paths.positions_set()
    }

    /// Nodes on a committed path that the candidate makes loops.
    #[inline]
    pub fn changed_loops(&self) -> &[usize] {
        self.changed_loops.positions_set()
    }

    #[inline]
    pub fn is_invalid(&self) -> bool {
        self.is_invalid
    }

    /// Marks the candidate as not representable; dependent checks accept it.
    pub fn set_invalid(&mut self) {
        self.is_invalid = true;
    }

    // ========================================================================
    // Relax / Commit / Revert
    // ========================================================================

    /// Replaces the candidate with the committed state modified by `delta`.
    ///
    /// Elements beyond the node range are ignored. An unbound element makes
    /// the candidate invalid. Each node should appear at most once; when it
    /// appears more than once the last element wins.
    pub fn relax(&mut self, delta: &Delta) {
        self.revert();
        self.last_committed_paths.clear();
        self.changed_arcs.clear();
        self.arc_nodes.clear();
        let num_nodes = self.num_nodes();
        for element in delta.elements() {
            if element.index >= num_nodes {
                continue;
            }
            if !element.bound {
                trace!(event = "path_state_invalid", node = element.index);
                self.set_invalid();
                return;
            }
            debug_assert!(element.value < num_nodes);
            if self.arc_nodes.set(element.index) {
                self.changed_arcs.push((element.index, element.value));
            } else if let Some(arc) = self.changed_arcs.iter_mut().find(|a| a.0 == element.index) {
                arc.1 = element.value;
            }
        }
        if self.changed_arcs.is_empty() {
            return;
        }
        self.make_chains_from_changed_arcs();
    }

    fn make_chains_from_changed_arcs(&mut self) {
        self.arcs.clear();
        let mut new_loops = Vec::new();
        for &(node, next) in &self.changed_arcs {
            let node_path = self.committed_path[node];
            if let Some(path) = node_path {
                self.changed_paths.set(path);
            }
            if next == node {
                if node_path.is_some() {
                    new_loops.push(node);
                }
                continue;
            }
            let node_index = self.committed_index[node];
            let next_index = self.committed_index[next];
            if node_path.is_none() || next_index != node_index + 1 {
                self.arcs.push(TailHead {
                    tail: node_index,
                    head: next_index,
                });
            }
        }
        let first_closing_arc = self.arcs.len();
        for &path in self.changed_paths.positions_set() {
            self.arcs.push(TailHead {
                tail: self.committed_index[self.topology.end(path)],
                head: self.committed_index[self.topology.start(path)],
            });
        }

        self.linker.link(
            &self.arcs,
            self.config.chain_algorithm,
            self.config.max_arcs_for_selection,
        );

        for (k, &path) in self.changed_paths.positions_set().iter().enumerate() {
            let begin_chain = self.chains.len();
            if !self.linker.walk(&self.arcs, first_closing_arc + k, &mut self.chains) {
                debug!(event = "path_state_invalid", path, reason = "unclosed chains");
                self.is_invalid = true;
                return;
            }
            self.paths[path] = PathBounds {
                begin_chain,
                end_chain: self.chains.len(),
            };
        }
        for node in new_loops {
            self.changed_loops.set(node);
        }

        trace!(
            event = "relax",
            changed_paths = self.changed_paths.positions_set().len(),
            arcs = self.arcs.len()
        );
        if self.environment_mode.is_asserted() {
            self.assert_candidate();
        }
    }

    /// Sets the chains of `path` to `chains`, given as committed index
    /// ranges, and marks the path changed.
    pub fn change_path(&mut self, path: usize, chains: &[ChainBounds]) {
        debug_assert!(!self.is_invalid);
        self.changed_paths.set(path);
        let begin_chain = self.chains.len();
        self.chains.extend_from_slice(chains);
        self.paths[path] = PathBounds {
            begin_chain,
            end_chain: self.chains.len(),
        };
        if self.environment_mode.is_asserted() {
            self.assert_candidate();
        }
    }

    /// Marks `nodes` as becoming loops. Nodes already committed as loops are
    /// skipped.
    pub fn change_loops(&mut self, nodes: &[usize]) {
        for &node in nodes {
            if self.committed_path[node].is_some() {
                self.changed_loops.set(node);
            }
        }
    }

    /// Makes the candidate the new committed state.
    pub fn commit(&mut self) {
        debug_assert!(!self.is_invalid, "cannot commit an invalid candidate");
        if self.is_invalid {
            self.revert();
            return;
        }
        let change_size: usize = self
            .changed_paths
            .positions_set()
            .iter()
            .flat_map(|&path| self.chains(path))
            .map(|chain| chain.num_nodes())
            .sum();
        let incremental =
            self.committed_nodes.len() + change_size < self.config.max_committed_size(self.num_nodes());
        if incremental {
            self.incremental_commit();
        } else {
            self.full_commit();
        }
        debug!(
            event = "path_state_commit",
            incremental,
            changed_paths = self.changed_paths.positions_set().len(),
            changed_loops = self.changed_loops.positions_set().len(),
            committed_size = self.committed_nodes.len()
        );

        let mut last = std::mem::take(&mut self.last_committed_paths);
        last.clear();
        last.extend_from_slice(self.changed_paths.positions_set());
        self.revert();
        self.last_committed_paths = last;

        if self.environment_mode.is_fully_asserted() {
            self.assert_committed();
        }
    }

    fn incremental_commit(&mut self) {
        for k in 0..self.changed_paths.positions_set().len() {
            let path = self.changed_paths.positions_set()[k];
            let new_begin = self.committed_nodes.len();
            let bounds = self.paths[path];
            for c in bounds.begin_chain..bounds.end_chain {
                let chain = self.chains[c];
                for index in chain.begin..chain.end {
                    let node = self.committed_nodes[index];
                    self.committed_nodes.push(node);
                }
            }
            let new_end = self.committed_nodes.len();
            for index in new_begin..new_end {
                let node = self.committed_nodes[index];
                self.committed_index[node] = index;
                self.committed_path[node] = Some(path);
            }
            self.committed_paths[path] = ChainBounds::new(new_begin, new_end);
        }
        for &node in self.changed_loops.positions_set() {
            self.committed_path[node] = None;
        }
    }

    fn full_commit(&mut self) {
        let num_nodes = self.num_nodes();
        let mut new_nodes = Vec::with_capacity(self.config.max_committed_size(num_nodes));
        let mut new_paths = Vec::with_capacity(self.num_paths());
        for path in 0..self.num_paths() {
            let begin = new_nodes.len();
            new_nodes.extend(self.nodes(path));
            new_paths.push(ChainBounds::new(begin, new_nodes.len()));
        }
        self.committed_nodes = new_nodes;
        self.committed_paths = new_paths;
        self.committed_path.fill(None);
        for path in 0..self.num_paths() {
            let bounds = self.committed_paths[path];
            for index in bounds.begin..bounds.end {
                let node = self.committed_nodes[index];
                self.committed_index[node] = index;
                self.committed_path[node] = Some(path);
            }
        }
        for node in 0..num_nodes {
            if self.committed_path[node].is_none() {
                self.committed_index[node] = self.committed_nodes.len();
                self.committed_nodes.push(node);
            }
        }
        // Every path moved, not only the changed ones.
        let num_paths = self.num_paths();
        self.chains[..num_paths].copy_from_slice(&self.committed_paths);
    }

    /// Drops the candidate; the committed state is untouched.
    pub fn revert(&mut self) {
        let num_paths = self.num_paths();
        self.chains.truncate(num_paths);
        for &path in self.changed_paths.positions_set() {
            self.chains[path] = self.committed_paths[path];
            self.paths[path] = PathBounds {
                begin_chain: path,
                end_chain: path + 1,
            };
        }
        self.chains.push(ChainBounds::default());
        self.changed_paths.clear();
        self.changed_loops.clear();
        self.is_invalid = false;
    }

    /// Restores the initial layout: every path `start -> end`, every other
    /// node a loop.
    pub fn reset(&mut self) {
        let num_nodes = self.num_nodes();
        let num_paths = self.num_paths();
        self.committed_nodes.clear();
        self.committed_path.fill(None);
        for path in 0..num_paths {
            let begin = self.committed_nodes.len();
            for node in [self.topology.start(path), self.topology.end(path)] {
                self.committed_index[node] = self.committed_nodes.len();
                self.committed_path[node] = Some(path);
                self.committed_nodes.push(node);
            }
            self.committed_paths[path] = ChainBounds::new(begin, begin + 2);
        }
        for node in 0..num_nodes {
            if self.committed_path[node].is_none() {
                self.committed_index[node] = self.committed_nodes.len();
                self.committed_nodes.push(node);
            }
        }
        self.chains.clear();
        self.chains.extend_from_slice(&self.committed_paths);
        self.chains.push(ChainBounds::default());
        for (path, bounds) in self.paths.iter_mut().enumerate() {
            *bounds = PathBounds {
                begin_chain: path,
                end_chain: path + 1,
            };
        }
        self.changed_paths.clear();
        self.changed_loops.clear();
        self.last_committed_paths.clear();
        self.is_invalid = false;
        debug!(event = "path_state_reset", num_nodes, num_paths);
    }

    // ========================================================================
    // Invariant checks
    // ========================================================================

    fn assert_candidate(&self) {
        let committed_size = self.committed_nodes.len();
        for &path in self.changed_paths.positions_set() {
            let bounds = self.paths[path];
            assert!(bounds.begin_chain < bounds.end_chain, "path {path} has no chains");
            for chain in &self.chains[bounds.begin_chain..bounds.end_chain] {
                assert!(
                    chain.begin < chain.end && chain.end <= committed_size,
                    "path {path} has malformed chain {chain:?}"
                );
            }
            let mut nodes = self.nodes(path);
            assert_eq!(nodes.next(), Some(self.start(path)), "path {path} does not begin at its start");
            assert_eq!(nodes.last(), Some(self.end(path)), "path {path} does not finish at its end");
        }
    }

    fn assert_committed(&self) {
        let mut seen = vec![false; self.num_nodes()];
        for path in 0..self.num_paths() {
            let bounds = self.committed_paths[path];
            assert_eq!(self.committed_nodes[bounds.begin], self.start(path));
            assert_eq!(self.committed_nodes[bounds.end - 1], self.end(path));
            for index in bounds.begin..bounds.end {
                let node = self.committed_nodes[index];
                assert!(!seen[node], "node {node} appears twice in committed paths");
                seen[node] = true;
                assert_eq!(self.committed_index[node], index);
                assert_eq!(self.committed_path[node], Some(path));
            }
        }
        for (node, &on_path) in seen.iter().enumerate() {
            if !on_path {
                assert_eq!(self.committed_path[node], None, "node {node} lost its path");
                assert_eq!(self.committed_nodes[self.committed_index[node]], node);
            }
        }
    }
}
