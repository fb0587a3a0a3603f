use alloc::collections::TryReserveError;

/// The ways a fallible set operation can fail.
///
/// Only node allocation can fail. Inserting a value that is already present,
/// removing a value that is absent, and looking up a missing value are not
/// errors.
///
/// # Examples
///
/// ```
/// use rbtree_set::RBTreeSet;
///
/// let mut set = RBTreeSet::new();
/// assert_eq!(set.try_insert(1), Ok(true));
/// assert_eq!(set.try_insert(1), Ok(false));
/// ```
#[derive(thiserror::Error, Clone, Debug, Eq, PartialEq)]
pub enum Error {
    /// The allocator could not provide storage for another node.
    #[error("node allocation failed: {0}")]
    AllocationFailed(TryReserveError),

    /// The set already holds as many nodes as a handle can address.
    #[error("set is at maximum capacity ({max} elements)")]
    CapacityExceeded {
        /// The largest number of elements a set can hold.
        max: usize,
    },
}

impl From<TryReserveError> for Error {
    fn from(err: TryReserveError) -> Self {
        Error::AllocationFailed(err)
    }
}
