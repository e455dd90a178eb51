//! Chains: unchanged runs of committed nodes.

use std::iter::Copied;
use std::slice::Iter;

/// Half-open range `[begin, end)` of committed indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChainBounds {
    pub begin: usize,
    pub end: usize,
}

impl ChainBounds {
    #[inline]
    pub const fn new(begin: usize, end: usize) -> Self {
        Self { begin, end }
    }

    #[inline]
    pub const fn len(&self) -> usize {
        self.end - self.begin
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.begin >= self.end
    }
}

/// Half-open range of chain ids making up one path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct PathBounds {
    pub begin_chain: usize,
    pub end_chain: usize,
}

/// A view of one chain: consecutive committed nodes, in path order.
///
/// Never empty: a chain holds at least one node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chain<'a> {
    nodes: &'a [usize],
    begin_index: usize,
}

impl<'a> Chain<'a> {
    #[inline]
    pub(crate) fn new(nodes: &'a [usize], begin_index: usize) -> Self {
        debug_assert!(!nodes.is_empty());
        Self { nodes, begin_index }
    }

    #[inline]
    pub fn first(&self) -> usize {
        self.nodes[0]
    }

    #[inline]
    pub fn last(&self) -> usize {
        self.nodes[self.nodes.len() - 1]
    }

    #[inline]
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Committed index of the first node.
    #[inline]
    pub fn begin_index(&self) -> usize {
        self.begin_index
    }

    /// Committed index one past the last node.
    #[inline]
    pub fn end_index(&self) -> usize {
        self.begin_index + self.nodes.len()
    }

    #[inline]
    pub fn bounds(&self) -> ChainBounds {
        ChainBounds::new(self.begin_index, self.end_index())
    }

    #[inline]
    pub fn nodes(&self) -> &'a [usize] {
        self.nodes
    }

    #[inline]
    pub fn iter(&self) -> Copied<Iter<'a, usize>> {
        self.nodes.iter().copied()
    }

    /// Every node but the first.
    #[inline]
    pub fn without_first_node(&self) -> Copied<Iter<'a, usize>> {
        self.nodes[1..].iter().copied()
    }
}

impl<'a> IntoIterator for Chain<'a> {
    type Item = usize;
    type IntoIter = Copied<Iter<'a, usize>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the chains of one path.
#[derive(Debug, Clone)]
pub struct Chains<'a> {
    committed_nodes: &'a [usize],
    bounds: Iter<'a, ChainBounds>,
}

impl<'a> Chains<'a> {
    pub(crate) fn new(committed_nodes: &'a [usize], bounds: &'a [ChainBounds]) -> Self {
        Self {
            committed_nodes,
            bounds: bounds.iter(),
        }
    }
}

impl<'a> Iterator for Chains<'a> {
    type Item = Chain<'a>;

    #[inline]
    fn next(&mut self) -> Option<Chain<'a>> {
        self.bounds
            .next()
            .map(|b| Chain::new(&self.committed_nodes[b.begin..b.end], b.begin))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.bounds.size_hint()
    }
}

impl ExactSizeIterator for Chains<'_> {}

impl DoubleEndedIterator for Chains<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.bounds
            .next_back()
            .map(|b| Chain::new(&self.committed_nodes[b.begin..b.end], b.begin))
    }
}
