//! Chain decomposition of a changed-arc set.
//!
//! Every arc `(tail, head)` is expressed in committed indices. The chain
//! entered by an arc starts at its head and runs forward through committed
//! indices until the first arc tail at or after that head; the arc leaving
//! that tail is the successor. Walking successors from a path's closing
//! arc (end back to start) yields the path's new chains in order.

use routeforge_config::ChainAlgorithm;
use smallvec::SmallVec;

use super::chain::ChainBounds;

/// A changed arc, both ends as committed indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TailHead {
    pub tail: usize,
    pub head: usize,
}

/// Marks an arc whose chain could not be closed.
const NO_SUCCESSOR: usize = usize::MAX;

/// Scratch buffers reused across decompositions.
#[derive(Debug, Default)]
pub(crate) struct ArcLinker {
    successor: Vec<usize>,
    by_head: Vec<usize>,
    by_tail: Vec<usize>,
}

impl ArcLinker {
    /// Fills `successor[i]` with the arc following arc `i`.
    pub fn link(&mut self, arcs: &[TailHead], algorithm: ChainAlgorithm, max_arcs_for_selection: usize) {
        let use_selection = match algorithm {
            ChainAlgorithm::Selection => true,
            ChainAlgorithm::Sorting => false,
            ChainAlgorithm::Auto => arcs.len() <= max_arcs_for_selection,
        };
        if use_selection {
            self.link_by_selection(arcs);
        } else {
            self.link_by_sorting(arcs);
        }
    }

    /// Quadratic scan; the successor of arc `i` is the arc with the smallest
    /// tail not before `arcs[i].head`.
    fn link_by_selection(&mut self, arcs: &[TailHead]) {
        // Small moves dominate; keep the tails on the stack.
        let tails: SmallVec<[usize; 16]> = arcs.iter().map(|a| a.tail).collect();
        self.successor.clear();
        for arc in arcs {
            let mut best = NO_SUCCESSOR;
            for (j, &tail) in tails.iter().enumerate() {
                if tail >= arc.head && (best == NO_SUCCESSOR || tail < tails[best]) {
                    best = j;
                }
            }
            self.successor.push(best);
        }
    }

    /// The arc with the r-th smallest head links to the arc with the r-th
    /// smallest tail.
    fn link_by_sorting(&mut self, arcs: &[TailHead]) {
        self.by_head.clear();
        self.by_head.extend(0..arcs.len());
        self.by_head.sort_unstable_by_key(|&i| arcs[i].head);
        self.by_tail.clear();
        self.by_tail.extend(0..arcs.len());
        self.by_tail.sort_unstable_by_key(|&i| arcs[i].tail);
        self.successor.clear();
        self.successor.resize(arcs.len(), NO_SUCCESSOR);
        for (&h, &t) in self.by_head.iter().zip(&self.by_tail) {
            self.successor[h] = t;
        }
    }

    /// Appends the chains of the cycle that starts after `closing_arc`.
    ///
    /// Returns false when the arcs do not close into a cycle.
    pub fn walk(&self, arcs: &[TailHead], closing_arc: usize, chains: &mut Vec<ChainBounds>) -> bool {
        let mut arc = closing_arc;
        for _ in 0..arcs.len() {
            let next = self.successor[arc];
            if next == NO_SUCCESSOR || arcs[next].tail < arcs[arc].head {
                return false;
            }
            chains.push(ChainBounds::new(arcs[arc].head, arcs[next].tail + 1));
            if next == closing_arc {
                return true;
            }
            arc = next;
        }
        false
    }
}

#[cfg(test)]
#[path = "decompose_tests.rs"]
mod tests;
