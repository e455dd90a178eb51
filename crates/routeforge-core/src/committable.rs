//! Two-phase (candidate/committed) containers.
//!
//! Filters keep their incremental state in these containers: evaluating a
//! move writes candidate values with `set`, and the search loop later either
//! accepts the move (`commit`) or discards it (`revert`). Both operations
//! touch only the slots changed since the last cycle.
//!
//! # Zero-Erasure Design
//!
//! - **Index-based**: slots are plain `usize` indices, no handles
//! - **Owned**: each container belongs to exactly one filter, mutated via `&mut self`
//! - **Sparse**: commit and revert cost O(changed slots), not O(len)

/// One slot: the committed value and the candidate value visible during evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct VersionedValue<T> {
    committed: T,
    current: T,
}

/// A fixed-size array whose slots can be tentatively changed and then
/// committed or reverted as a group.
///
/// # Example
///
/// ```
/// use routeforge_core::CommittableArray;
///
/// let mut loads = CommittableArray::new(3, 0i64);
/// loads.set(1, 7);
/// assert_eq!(loads.get(1), 7);
/// assert_eq!(loads.get_committed(1), 0);
/// assert_eq!(loads.changed_indices(), &[1]);
///
/// loads.revert();
/// assert_eq!(loads.get(1), 0);
/// assert!(loads.changed_indices().is_empty());
///
/// loads.set(2, 5);
/// loads.commit();
/// assert_eq!(loads.get_committed(2), 5);
/// ```
#[derive(Debug, Clone)]
pub struct CommittableArray<T> {
    elements: Vec<VersionedValue<T>>,
    changed: Vec<bool>,
    changed_indices: Vec<usize>,
}

impl<T: Copy> CommittableArray<T> {
    /// Creates an array of `num_elements` slots, all committed to `value`.
    pub fn new(num_elements: usize, value: T) -> Self {
        Self {
            elements: vec![
                VersionedValue {
                    committed: value,
                    current: value,
                };
                num_elements
            ],
            changed: vec![false; num_elements],
            changed_indices: Vec::new(),
        }
    }

    /// Returns the number of slots.
    #[inline]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns true if the array has no slots.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Returns the candidate value of slot `index`.
    #[inline]
    pub fn get(&self, index: usize) -> T {
        debug_assert!(index < self.elements.len());
        self.elements[index].current
    }

    /// Returns the last committed value of slot `index`.
    #[inline]
    pub fn get_committed(&self, index: usize) -> T {
        debug_assert!(index < self.elements.len());
        self.elements[index].committed
    }

    /// Overwrites the candidate value of slot `index`.
    ///
    /// The index is recorded in [`changed_indices`](Self::changed_indices)
    /// once per cycle, however many times it is set.
    #[inline]
    pub fn set(&mut self, index: usize, value: T) {
        debug_assert!(index < self.elements.len());
        if !self.changed[index] {
            self.changed[index] = true;
            self.changed_indices.push(index);
        }
        self.elements[index].current = value;
    }

    /// Indices set since the last `commit`/`revert`, in first-set order.
    #[inline]
    pub fn changed_indices(&self) -> &[usize] {
        &self.changed_indices
    }

    /// Makes every candidate value committed.
    pub fn commit(&mut self) {
        for &index in &self.changed_indices {
            self.changed[index] = false;
            let element = &mut self.elements[index];
            element.committed = element.current;
        }
        self.changed_indices.clear();
    }

    /// Drops every candidate value, restoring the committed ones.
    pub fn revert(&mut self) {
        for &index in &self.changed_indices {
            self.changed[index] = false;
            let element = &mut self.elements[index];
            element.current = element.committed;
        }
        self.changed_indices.clear();
    }

    /// Resets every slot to `value` and commits it.
    pub fn set_all_and_commit(&mut self, value: T) {
        self.changed.fill(false);
        self.changed_indices.clear();
        self.elements.fill(VersionedValue {
            committed: value,
            current: value,
        });
    }

    /// Iterates over committed values in index order.
    pub fn committed_values(&self) -> impl Iterator<Item = T> + '_ {
        self.elements.iter().map(|e| e.committed)
    }
}

/// A single committable value; a one-slot [`CommittableArray`].
///
/// # Example
///
/// ```
/// use routeforge_core::CommittableValue;
///
/// let mut cost = CommittableValue::new(100i64);
/// cost.set(90);
/// assert!(cost.has_changed());
/// cost.commit();
/// assert_eq!(cost.get_committed(), 90);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct CommittableValue<T> {
    committed: T,
    current: T,
    changed: bool,
}

impl<T: Copy> CommittableValue<T> {
    pub fn new(value: T) -> Self {
        Self {
            committed: value,
            current: value,
            changed: false,
        }
    }

    #[inline]
    pub fn get(&self) -> T {
        self.current
    }

    #[inline]
    pub fn get_committed(&self) -> T {
        self.committed
    }

    #[inline]
    pub fn set(&mut self, value: T) {
        self.current = value;
        self.changed = true;
    }

    /// Returns true if `set` was called since the last `commit`/`revert`.
    #[inline]
    pub fn has_changed(&self) -> bool {
        self.changed
    }

    pub fn commit(&mut self) {
        self.committed = self.current;
        self.changed = false;
    }

    pub fn revert(&mut self) {
        self.current = self.committed;
        self.changed = false;
    }

    pub fn set_and_commit(&mut self, value: T) {
        self.committed = value;
        self.current = value;
        self.changed = false;
    }
}

#[cfg(test)]
#[path = "committable_tests.rs"]
mod tests;
