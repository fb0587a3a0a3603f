use log::debug;

use super::RBTreeSet;
use crate::Error;
use crate::raw::RawRBTree;

impl<T> RBTreeSet<T> {
    /// Creates an empty set with room for at least `capacity` elements.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_set::RBTreeSet;
    ///
    /// let set: RBTreeSet<i32> = RBTreeSet::with_capacity(16);
    /// assert!(set.is_empty());
    /// assert!(set.capacity() >= 16);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(capacity) for memory allocation.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        RBTreeSet {
            raw: RawRBTree::with_capacity(capacity),
        }
    }

    /// Creates an empty set with room for at least `capacity` elements,
    /// reporting allocation failure instead of aborting.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapacityExceeded`] if `capacity` is beyond what a set
    /// can address, or [`Error::AllocationFailed`] if the allocator refuses the
    /// request.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_set::{Error, RBTreeSet};
    ///
    /// let set: RBTreeSet<u8> = RBTreeSet::try_with_capacity(8).unwrap();
    /// assert!(set.capacity() >= 8);
    ///
    /// let too_big = RBTreeSet::<u8>::try_with_capacity(usize::MAX);
    /// assert!(matches!(too_big, Err(Error::CapacityExceeded { .. })));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(capacity) for memory allocation.
    pub fn try_with_capacity(capacity: usize) -> Result<Self, Error> {
        let raw = RawRBTree::try_with_capacity(capacity)
            .inspect_err(|err| debug!("reserving room for {capacity} elements failed: {err}"))?;
        Ok(RBTreeSet { raw })
    }

    /// Returns the number of elements the set can hold without allocating.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_set::RBTreeSet;
    ///
    /// let set: RBTreeSet<i32> = RBTreeSet::with_capacity(32);
    /// assert!(set.capacity() >= 32);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }
}
