//! Fixed path topology.

use crate::error::{Result, RouteForgeError};

/// Node count plus the start and end node of every path.
///
/// Path `p` runs from `starts[p]` to `ends[p]`. Start and end nodes are
/// never loops and never move between paths.
///
/// # Example
///
/// ```
/// use routeforge_core::PathTopology;
///
/// // Nodes 0..6, two paths: 0 -> ... -> 1 and 2 -> ... -> 3.
/// let topology = PathTopology::new(6, vec![0, 2], vec![1, 3]).unwrap();
/// assert_eq!(topology.num_paths(), 2);
/// assert_eq!(topology.end(1), 3);
/// assert_eq!(topology.path_of_start(2), Some(1));
/// assert!(PathTopology::new(6, vec![0, 0], vec![1, 3]).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTopology {
    num_nodes: usize,
    starts: Vec<usize>,
    ends: Vec<usize>,
    path_of_start: Vec<Option<usize>>,
    path_of_end: Vec<Option<usize>>,
}

impl PathTopology {
    /// Validates and builds a topology.
    ///
    /// # Errors
    ///
    /// Fails if `starts` and `ends` differ in length, a node is out of
    /// range, or a node is used twice as a start or an end.
    pub fn new(num_nodes: usize, starts: Vec<usize>, ends: Vec<usize>) -> Result<Self> {
        if starts.len() != ends.len() {
            return Err(RouteForgeError::DimensionMismatch {
                what: "path ends",
                expected: starts.len(),
                actual: ends.len(),
            });
        }
        let mut path_of_start = vec![None; num_nodes];
        let mut path_of_end = vec![None; num_nodes];
        for (path, (&start, &end)) in starts.iter().zip(&ends).enumerate() {
            for node in [start, end] {
                if node >= num_nodes {
                    return Err(RouteForgeError::NodeOutOfRange { node, num_nodes });
                }
                if path_of_start[node].is_some() || path_of_end[node].is_some() {
                    return Err(RouteForgeError::InvalidTopology(format!(
                        "node {node} is the start or end of more than one path"
                    )));
                }
            }
            if start == end {
                return Err(RouteForgeError::InvalidTopology(format!(
                    "path {path} starts and ends at node {start}"
                )));
            }
            path_of_start[start] = Some(path);
            path_of_end[end] = Some(path);
        }
        Ok(Self {
            num_nodes,
            starts,
            ends,
            path_of_start,
            path_of_end,
        })
    }

    #[inline]
    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    #[inline]
    pub fn num_paths(&self) -> usize {
        self.starts.len()
    }

    #[inline]
    pub fn start(&self, path: usize) -> usize {
        self.starts[path]
    }

    #[inline]
    pub fn end(&self, path: usize) -> usize {
        self.ends[path]
    }

    #[inline]
    pub fn starts(&self) -> &[usize] {
        &self.starts
    }

    #[inline]
    pub fn ends(&self) -> &[usize] {
        &self.ends
    }

    /// The path starting at `node`, if any.
    #[inline]
    pub fn path_of_start(&self, node: usize) -> Option<usize> {
        self.path_of_start[node]
    }

    /// The path ending at `node`, if any.
    #[inline]
    pub fn path_of_end(&self, node: usize) -> Option<usize> {
        self.path_of_end[node]
    }

    /// True if `node` is the end of a path, i.e. has no next variable.
    #[inline]
    pub fn is_end(&self, node: usize) -> bool {
        self.path_of_end[node].is_some()
    }
}
