use core::fmt;

use crate::raw::{Handle, RawRBTree};

/// A bidirectional position in an [`RBTreeSet`].
///
/// A cursor either rests on an element or on the *end* position, which sits
/// one past the maximum and one before the minimum. Moving forward from the
/// maximum reaches end, and moving forward again wraps to the minimum; moving
/// backward is symmetric.
///
/// The cursor borrows the set, so the set cannot be modified while the cursor
/// is alive and a cursor can never observe a removed element. Elements are
/// only reachable by shared reference: changing one in place could break the
/// ordering of the set.
///
/// Cursors compare equal when they rest on the same position of the same set.
///
/// # Examples
///
/// ```
/// use rbtree_set::RBTreeSet;
///
/// let set = RBTreeSet::from([1, 3, 5]);
/// let mut cursor = set.find(&3);
/// assert_eq!(cursor.get(), Some(&3));
///
/// cursor.move_next();
/// assert_eq!(cursor.get(), Some(&5));
/// cursor.move_next();
/// assert!(cursor.is_end());
/// assert_eq!(cursor, set.end());
///
/// cursor.move_prev();
/// assert_eq!(cursor.get(), Some(&5));
/// ```
///
/// [`RBTreeSet`]: crate::RBTreeSet
pub struct Cursor<'a, T> {
    tree: &'a RawRBTree<T>,
    node: Option<Handle>,
}

impl<'a, T> Cursor<'a, T> {
    pub(crate) const fn new(tree: &'a RawRBTree<T>, node: Option<Handle>) -> Self {
        Cursor { tree, node }
    }

    /// Returns the element under the cursor, or `None` at the end position.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn get(&self) -> Option<&'a T> {
        let tree = self.tree;
        self.node.map(|node| tree.value(node))
    }

    /// Returns `true` if the cursor rests on the end position.
    #[must_use]
    pub const fn is_end(&self) -> bool {
        self.node.is_none()
    }

    /// Advances to the next element in ascending order.
    ///
    /// # Complexity
    ///
    /// O(log n) worst case, amortized O(1) over a full traversal.
    pub fn move_next(&mut self) {
        self.node = self.tree.successor(self.node);
    }

    /// Steps back to the previous element in ascending order. From the end
    /// position this reaches the maximum.
    ///
    /// # Complexity
    ///
    /// O(log n) worst case, amortized O(1) over a full traversal.
    pub fn move_prev(&mut self) {
        self.node = self.tree.predecessor(self.node);
    }

    /// Returns the element [`move_next`](Cursor::move_next) would land on.
    #[must_use]
    pub fn peek_next(&self) -> Option<&'a T> {
        let tree = self.tree;
        tree.successor(self.node).map(|node| tree.value(node))
    }

    /// Returns the element [`move_prev`](Cursor::move_prev) would land on.
    #[must_use]
    pub fn peek_prev(&self) -> Option<&'a T> {
        let tree = self.tree;
        tree.predecessor(self.node).map(|node| tree.value(node))
    }
}

impl<T> Clone for Cursor<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Cursor<'_, T> {}

impl<T> PartialEq for Cursor<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        core::ptr::eq(self.tree, other.tree) && self.node == other.node
    }
}

impl<T> Eq for Cursor<'_, T> {}

impl<T: fmt::Debug> fmt::Debug for Cursor<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Cursor").field(&self.get()).finish()
    }
}
