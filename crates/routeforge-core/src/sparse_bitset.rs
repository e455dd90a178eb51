//! Bitset that remembers which positions were set, for O(touched) clearing.

/// A fixed-size bitset listing the positions set since the last clear.
///
/// # Example
///
/// ```
/// use routeforge_core::SparseBitset;
///
/// let mut touched = SparseBitset::new(8);
/// touched.set(5);
/// touched.set(2);
/// touched.set(5);
/// assert_eq!(touched.positions_set(), &[5, 2]);
/// touched.clear();
/// assert!(!touched.get(5));
/// ```
#[derive(Debug, Clone, Default)]
pub struct SparseBitset {
    bits: Vec<bool>,
    positions: Vec<usize>,
}

impl SparseBitset {
    pub fn new(size: usize) -> Self {
        Self {
            bits: vec![false; size],
            positions: Vec::new(),
        }
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.bits.len()
    }

    #[inline]
    pub fn get(&self, position: usize) -> bool {
        self.bits[position]
    }

    /// Sets `position`; returns true if it was not already set.
    #[inline]
    pub fn set(&mut self, position: usize) -> bool {
        if self.bits[position] {
            return false;
        }
        self.bits[position] = true;
        self.positions.push(position);
        true
    }

    /// Positions set since the last clear, in insertion order.
    #[inline]
    pub fn positions_set(&self) -> &[usize] {
        &self.positions
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Clears every set position in O(number set).
    pub fn clear(&mut self) {
        for &position in &self.positions {
            self.bits[position] = false;
        }
        self.positions.clear();
    }
}
