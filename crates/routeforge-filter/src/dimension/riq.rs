//! Range-intersection-query table over committed cumul constraints.
//!
//! For every committed index `t` the table knows the capacity `C_t` (node
//! capacity intersected with path capacity) and the prefix demand sum `S_t`
//! since the start of the path. Propagating a cumul `X` from index `i` to
//! index `j` node by node is equivalent to
//!
//! ```text
//! lower_j = S_j.lower + max(X.lower - S_i.lower, max α(i, j])
//! upper_j = S_j.upper + min(X.upper - S_i.upper, min β(i, j])
//! ```
//!
//! with `α_t = C_t.lower - S_t.lower` and `β_t = C_t.upper - S_t.upper`.
//! Whether every intermediate cumul is nonempty reduces to comparisons
//! against `γ_t = C_t.upper - S_t.lower` and `ε_t = C_t.lower - S_t.upper`.
//! All four aggregates are idempotent (`max`/`min`), so any window is
//! answered by two overlapping power-of-two windows; only the internal
//! feasibility flag needs the extra cross-range check in [`RiqTable::window`].
//!
//! The identities only hold for exact prefix sums. Leaves and queries use
//! checked arithmetic and report when a value leaves the `i64` range; the
//! caller then walks the chain node by node instead.

use routeforge_core::{ExtendedInterval, ExtendedValue};

/// Aggregates over one window `(s, s + 2^k]` of committed indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RiqNode {
    pub max_alpha: ExtendedValue,
    pub min_beta: ExtendedValue,
    pub min_gamma: ExtendedValue,
    pub max_epsilon: ExtendedValue,
    /// Every cumul inside the window stays nonempty whatever enters it.
    pub feasible: bool,
}

impl RiqNode {
    /// Filler for positions where no window fits inside a path.
    pub const PLACEHOLDER: Self = Self {
        max_alpha: ExtendedValue::ZERO,
        min_beta: ExtendedValue::ZERO,
        min_gamma: ExtendedValue::ZERO,
        max_epsilon: ExtendedValue::ZERO,
        feasible: false,
    };

    /// Window holding one node with capacity `capacity` and prefix demand
    /// `prefix`, reached through a transit that is nonempty iff
    /// `transit_nonempty`. `None` when an aggregate overflows.
    pub fn leaf(capacity: ExtendedInterval, prefix: ExtendedInterval, transit_nonempty: bool) -> Option<Self> {
        let (cl, cu) = (capacity.lower(), capacity.upper());
        let (sl, su) = (prefix.lower(), prefix.upper());
        Some(Self {
            max_alpha: cl.checked_sub(sl)?,
            min_beta: cu.checked_sub(su)?,
            min_gamma: cu.checked_sub(sl)?,
            max_epsilon: cl.checked_sub(su)?,
            feasible: transit_nonempty && !capacity.is_empty(),
        })
    }

    /// Aggregates of two windows, without touching the flag.
    #[inline]
    fn merge_values(&self, other: &Self) -> Self {
        Self {
            max_alpha: self.max_alpha.max(other.max_alpha),
            min_beta: self.min_beta.min(other.min_beta),
            min_gamma: self.min_gamma.min(other.min_gamma),
            max_epsilon: self.max_epsilon.max(other.max_epsilon),
            feasible: self.feasible && other.feasible,
        }
    }

    /// `before` precedes `after`: a lower bound raised in `before` must fit
    /// under every upper bound in `after`, and symmetrically.
    #[inline]
    fn compatible(before: &Self, after: &Self) -> bool {
        before.max_alpha <= after.min_gamma && before.min_beta >= after.max_epsilon
    }

    /// Two adjacent, disjoint windows.
    #[inline]
    pub fn concat(&self, after: &Self) -> Self {
        let mut merged = self.merge_values(after);
        merged.feasible = merged.feasible && Self::compatible(self, after);
        merged
    }

    /// Propagates `cumul`, valid at the window's left boundary, to its
    /// right boundary. `from_prefix` and `to_prefix` are the prefix sums
    /// at both boundaries.
    ///
    /// The inner option is the propagated cumul, `None` if it empties on
    /// the way. The outer one is `None` when the answer cannot be computed
    /// exactly.
    pub fn propagate(
        &self,
        cumul: ExtendedInterval,
        from_prefix: ExtendedInterval,
        to_prefix: ExtendedInterval,
    ) -> Option<Option<ExtendedInterval>> {
        if !self.feasible {
            return Some(None);
        }
        let lambda = cumul.lower().checked_sub(from_prefix.lower())?;
        let mu = cumul.upper().checked_sub(from_prefix.upper())?;
        if lambda > self.min_gamma || mu < self.max_epsilon {
            return Some(None);
        }
        Some(Some(ExtendedInterval::from_bounds(
            lambda.max(self.max_alpha).checked_add(to_prefix.lower())?,
            mu.min(self.min_beta).checked_add(to_prefix.upper())?,
        )))
    }
}

/// Sparse table of [`RiqNode`]s: `rows[k][s]` covers `(s, s + 2^k]`.
#[derive(Debug, Default)]
pub(crate) struct RiqTable {
    rows: Vec<Vec<RiqNode>>,
}

impl RiqTable {
    #[inline]
    pub fn len(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    #[inline]
    pub fn num_layers(&self) -> usize {
        self.rows.len()
    }

    pub fn clear(&mut self) {
        self.rows.clear();
    }

    /// Appends the leaves of one path; `leaves[s]` covers `(s, s + 1]`, so
    /// the last leaf of a path is a placeholder.
    ///
    /// Then fills every layer for windows inside the appended range.
    pub fn push_path(&mut self, leaves: &[RiqNode]) {
        if self.rows.is_empty() {
            self.rows.push(Vec::new());
        }
        let begin = self.len();
        self.rows[0].extend_from_slice(leaves);
        let end = self.len();
        let new_len = end;
        for row in &mut self.rows[1..] {
            row.resize(new_len, RiqNode::PLACEHOLDER);
        }
        // Largest window: from the first to the last index of the path.
        let span = leaves.len().saturating_sub(1);
        let mut layer = 1;
        while span >= 1 << layer {
            if self.rows.len() <= layer {
                self.rows.push(vec![RiqNode::PLACEHOLDER; new_len]);
            }
            let half = 1 << (layer - 1);
            let width = 1 << layer;
            let (lower, upper) = self.rows.split_at_mut(layer);
            let previous = &lower[layer - 1];
            let current = &mut upper[0];
            for s in begin..end - width {
                current[s] = previous[s].concat(&previous[s + half]);
            }
            layer += 1;
        }
    }

    /// Aggregates over `(i, j]`, `i < j`, both inside one path.
    pub fn window(&self, i: usize, j: usize) -> RiqNode {
        debug_assert!(i < j);
        let length = j - i;
        let layer = length.ilog2() as usize;
        let width = 1 << layer;
        let first = &self.rows[layer][i];
        let last = &self.rows[layer][j - width];
        let mut merged = first.merge_values(last);
        let rest = length - width;
        if merged.feasible && rest > 0 {
            // Pairs split between (i, j - width] and (i + width, j] are the
            // only ones neither window has checked.
            let before = self.values(i, j - width);
            let after = self.values(i + width, j);
            merged.feasible = RiqNode::compatible(&before, &after);
        }
        merged
    }

    /// Aggregate values over `(i, j]`; the flag is meaningless.
    fn values(&self, i: usize, j: usize) -> RiqNode {
        let layer = (j - i).ilog2() as usize;
        let width = 1 << layer;
        self.rows[layer][i].merge_values(&self.rows[layer][j - width])
    }

    /// Checks every stored window against its two halves.
    pub fn assert_consistent(&self, path_ranges: &[(usize, usize)]) {
        for &(begin, end) in path_ranges {
            for layer in 1..self.rows.len() {
                let half = 1 << (layer - 1);
                let width = 1 << layer;
                for s in begin..end.saturating_sub(width) {
                    let expected = self.rows[layer - 1][s].concat(&self.rows[layer - 1][s + half]);
                    assert_eq!(self.rows[layer][s], expected, "stale RIQ window ({s}, {}]", s + width);
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "riq_tests.rs"]
mod tests;
