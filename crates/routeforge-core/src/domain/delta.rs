//! Sparse candidate move.

/// One reassigned variable of a move.
///
/// For `index < num_nodes` the variable is the next-node of `index`. A
/// `bound == false` element carries no single value: the move is a large
/// neighborhood change that path filters cannot evaluate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeltaElement {
    pub index: usize,
    pub value: usize,
    pub bound: bool,
}

/// A candidate move: the variables it changes, in insertion order.
///
/// Elements with `index >= num_nodes` stand for non-next variables
/// (vehicle or path variables) and are skipped by path-based consumers.
///
/// # Example
///
/// ```
/// use routeforge_core::Delta;
///
/// // Relocate node 4 between nodes 2 and 3.
/// let mut delta = Delta::new();
/// delta.set_next(2, 4);
/// delta.set_next(4, 3);
/// delta.set_next(5, 6);
/// assert_eq!(delta.len(), 3);
/// assert!(!delta.has_unbound());
///
/// delta.set_unbound(7);
/// assert!(delta.has_unbound());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Delta {
    elements: Vec<DeltaElement>,
}

impl Delta {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            elements: Vec::with_capacity(capacity),
        }
    }

    /// Records `node -> next`. Setting `next == node` makes `node` a loop.
    #[inline]
    pub fn set_next(&mut self, node: usize, next: usize) {
        self.elements.push(DeltaElement {
            index: node,
            value: next,
            bound: true,
        });
    }

    /// Records an element whose value is not fixed.
    #[inline]
    pub fn set_unbound(&mut self, index: usize) {
        self.elements.push(DeltaElement {
            index,
            value: index,
            bound: false,
        });
    }

    #[inline]
    pub fn elements(&self) -> &[DeltaElement] {
        &self.elements
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// True if any element is unbound.
    pub fn has_unbound(&self) -> bool {
        self.elements.iter().any(|e| !e.bound)
    }

    #[inline]
    pub fn clear(&mut self) {
        self.elements.clear();
    }
}

impl FromIterator<(usize, usize)> for Delta {
    fn from_iter<I: IntoIterator<Item = (usize, usize)>>(iter: I) -> Self {
        let mut delta = Delta::new();
        for (node, next) in iter {
            delta.set_next(node, next);
        }
        delta
    }
}
