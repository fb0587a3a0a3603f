use core::borrow::Borrow;
use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::iter::FusedIterator;
use core::ops::{Bound, RangeBounds};

use log::debug;

use crate::Error;
use crate::raw::{Handle, RawRBTree};

mod capacity;
mod cursor;

pub use cursor::Cursor;

/// An ordered set based on a red-black tree.
///
/// Every operation that locates an element (`find`, `lower_bound`, `insert`,
/// `remove`, ...) takes O(log n) time: the red-black coloring keeps the height
/// of the tree below `2 * log2(n + 1)`.
///
/// Elements are compared with their [`Ord`] implementation. Two elements are
/// considered the same when neither is less than the other, and the set keeps
/// only the first one inserted.
///
/// It is a logic error for an item to be modified in such a way that the item's ordering relative
/// to any other item, as determined by the [`Ord`] trait, changes while it is in the set. This is
/// normally only possible through [`Cell`], [`RefCell`], global state, I/O, or unsafe code.
/// The behavior resulting from such a logic error is not specified, but will be encapsulated to the
/// `RBTreeSet` that observed the logic error and not result in undefined behavior.
///
/// The set is meant for single-threaded use; share it across threads only
/// behind your own lock.
///
/// [`Cell`]: core::cell::Cell
/// [`RefCell`]: core::cell::RefCell
///
/// # Examples
///
/// ```
/// use rbtree_set::RBTreeSet;
///
/// let mut set = RBTreeSet::new();
/// for value in [5, 3, 8, 1, 4, 7, 9] {
///     set.insert(value);
/// }
/// assert_eq!(set.iter().copied().collect::<Vec<_>>(), [1, 3, 4, 5, 7, 8, 9]);
///
/// set.remove(&5);
/// assert_eq!(set.lower_bound(&6).get(), Some(&7));
/// assert!(set.find(&10).is_end());
/// ```
///
/// A `RBTreeSet` with a known list of items can be initialized from an array:
///
/// ```
/// use rbtree_set::RBTreeSet;
///
/// let set = RBTreeSet::from([1, 2, 3]);
/// ```
pub struct RBTreeSet<T> {
    raw: RawRBTree<T>,
}

/// An iterator over the items of a `RBTreeSet`.
///
/// This `struct` is created by the [`iter`] method on [`RBTreeSet`].
/// See its documentation for more.
///
/// # Examples
///
/// ```
/// use rbtree_set::RBTreeSet;
///
/// let set = RBTreeSet::from([3, 1, 2]);
/// let mut iter = set.iter();
/// assert_eq!(iter.next(), Some(&1));
/// assert_eq!(iter.next_back(), Some(&3));
/// assert_eq!(iter.next(), Some(&2));
/// assert_eq!(iter.next(), None);
/// ```
///
/// [`iter`]: RBTreeSet::iter
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, T: 'a> {
    tree: &'a RawRBTree<T>,
    head: Option<Handle>,
    tail: Option<Handle>,
    remaining: usize,
}

/// An owning iterator over the items of a `RBTreeSet` in ascending order.
///
/// This `struct` is created by the [`into_iter`] method on [`RBTreeSet`]
/// (provided by the [`IntoIterator`] trait). See its documentation for more.
///
/// [`into_iter`]: RBTreeSet#method.into_iter
pub struct IntoIter<T> {
    raw: RawRBTree<T>,
}

/// An iterator over a sub-range of items in a `RBTreeSet`.
///
/// This `struct` is created by the [`range`] method on [`RBTreeSet`].
/// See its documentation for more.
///
/// # Examples
///
/// ```
/// use rbtree_set::RBTreeSet;
///
/// let set = RBTreeSet::from([1, 2, 3, 4]);
/// let mut range = set.range(2..=3);
/// assert_eq!(range.next(), Some(&2));
/// assert_eq!(range.next_back(), Some(&3));
/// assert_eq!(range.next(), None);
/// ```
///
/// [`range`]: RBTreeSet::range
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Range<'a, T: 'a> {
    tree: &'a RawRBTree<T>,
    head: Option<Handle>,
    tail: Option<Handle>,
}

impl<T> RBTreeSet<T> {
    /// Makes a new, empty `RBTreeSet`.
    ///
    /// Does not allocate anything on its own.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_set::RBTreeSet;
    ///
    /// let mut set: RBTreeSet<i32> = RBTreeSet::new();
    /// assert!(set.is_empty());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub const fn new() -> RBTreeSet<T> {
        RBTreeSet { raw: RawRBTree::new() }
    }

    /// Returns the number of elements in the set.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_set::RBTreeSet;
    ///
    /// let mut a = RBTreeSet::new();
    /// assert_eq!(a.len(), 0);
    /// a.insert(1);
    /// assert_eq!(a.len(), 1);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub const fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the set contains no elements.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_set::RBTreeSet;
    ///
    /// let mut a = RBTreeSet::new();
    /// assert!(a.is_empty());
    /// a.insert(1);
    /// assert!(!a.is_empty());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Clears the set, removing all elements.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_set::RBTreeSet;
    ///
    /// let mut v = RBTreeSet::new();
    /// v.insert(1);
    /// v.clear();
    /// assert!(v.is_empty());
    /// assert_eq!(v.begin(), v.end());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(n)
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Exchanges the contents of two sets without moving any element.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_set::RBTreeSet;
    ///
    /// let mut a = RBTreeSet::from([1, 2]);
    /// let mut b = RBTreeSet::from([3]);
    /// a.swap(&mut b);
    /// assert_eq!(a.len(), 1);
    /// assert_eq!(b.len(), 2);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1)
    pub fn swap(&mut self, other: &mut RBTreeSet<T>) {
        self.raw.swap(&mut other.raw);
    }

    /// Returns a cursor on the smallest element, or the end cursor if the set
    /// is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_set::RBTreeSet;
    ///
    /// let set = RBTreeSet::from([2, 1]);
    /// assert_eq!(set.begin().get(), Some(&1));
    ///
    /// let empty: RBTreeSet<i32> = RBTreeSet::new();
    /// assert_eq!(empty.begin(), empty.end());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn begin(&self) -> Cursor<'_, T> {
        Cursor::new(&self.raw, self.raw.first())
    }

    /// Returns the end cursor, one past the largest element.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_set::RBTreeSet;
    ///
    /// let set = RBTreeSet::from([1, 2]);
    /// let mut cursor = set.end();
    /// assert!(cursor.is_end());
    /// cursor.move_prev();
    /// assert_eq!(cursor.get(), Some(&2));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn end(&self) -> Cursor<'_, T> {
        Cursor::new(&self.raw, None)
    }

    /// Returns a reference to the first element in the set, if any.
    /// This element is always the minimum of all elements in the set.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_set::RBTreeSet;
    ///
    /// let mut set = RBTreeSet::new();
    /// assert_eq!(set.first(), None);
    /// set.insert(1);
    /// assert_eq!(set.first(), Some(&1));
    /// set.insert(0);
    /// assert_eq!(set.first(), Some(&0));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn first(&self) -> Option<&T> {
        self.raw.first().map(|handle| self.raw.value(handle))
    }

    /// Returns a reference to the last element in the set, if any.
    /// This element is always the maximum of all elements in the set.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_set::RBTreeSet;
    ///
    /// let set = RBTreeSet::from([1, 2]);
    /// assert_eq!(set.last(), Some(&2));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.raw.last().map(|handle| self.raw.value(handle))
    }

    /// Gets an iterator that visits the elements in the `RBTreeSet` in ascending
    /// order.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_set::RBTreeSet;
    ///
    /// let set = RBTreeSet::from([3, 1, 2]);
    /// let mut set_iter = set.iter();
    /// assert_eq!(set_iter.next(), Some(&1));
    /// assert_eq!(set_iter.next(), Some(&2));
    /// assert_eq!(set_iter.next(), Some(&3));
    /// assert_eq!(set_iter.next(), None);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n) to create the iterator; each step is amortized O(1).
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(&self.raw)
    }
}

impl<T: Clone> RBTreeSet<T> {
    /// Makes an independent deep copy of the set, reporting allocation failure
    /// instead of aborting.
    ///
    /// The copy has the same shape and coloring as the original. On failure
    /// nothing allocated for the copy survives and `self` is untouched.
    /// Assigning a fresh copy (`a = b.try_clone()?`) replaces `a` only once the
    /// copy is complete.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] if the node storage for the copy cannot be
    /// allocated.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_set::RBTreeSet;
    ///
    /// let original = RBTreeSet::from([1, 2, 3]);
    /// let mut copy = original.try_clone().unwrap();
    /// copy.insert(4);
    /// assert_eq!(original.len(), 3);
    /// assert_eq!(copy.len(), 4);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(n)
    pub fn try_clone(&self) -> Result<RBTreeSet<T>, Error> {
        let raw = self
            .raw
            .try_clone()
            .inspect_err(|err| debug!("cloning a set of {} elements failed: {err}", self.len()))?;
        Ok(RBTreeSet { raw })
    }
}

impl<T: Ord> RBTreeSet<T> {
    /// Returns a cursor on the element equal to `value`, or the end cursor if
    /// there is none.
    ///
    /// The value may be any borrowed form of the set's element type, but the
    /// ordering on the borrowed form *must* match the ordering on the
    /// element type.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_set::RBTreeSet;
    ///
    /// let set = RBTreeSet::from([1, 2, 3]);
    /// assert_eq!(set.find(&2).get(), Some(&2));
    /// assert_eq!(set.find(&4), set.end());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[must_use]
    pub fn find<Q>(&self, value: &Q) -> Cursor<'_, T>
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        Cursor::new(&self.raw, self.raw.search(value))
    }

    /// Returns a cursor on the first element that is not less than `value`,
    /// or the end cursor if every element is less.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_set::RBTreeSet;
    ///
    /// let set = RBTreeSet::from([10, 20, 30]);
    /// assert_eq!(set.lower_bound(&20).get(), Some(&20));
    /// assert_eq!(set.lower_bound(&21).get(), Some(&30));
    /// assert!(set.lower_bound(&31).is_end());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[must_use]
    pub fn lower_bound<Q>(&self, value: &Q) -> Cursor<'_, T>
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        Cursor::new(&self.raw, self.raw.lower_bound(value))
    }

    /// Returns a cursor on the first element that is greater than `value`,
    /// or the end cursor if there is none.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_set::RBTreeSet;
    ///
    /// let set = RBTreeSet::from([10, 20, 30]);
    /// assert_eq!(set.upper_bound(&20).get(), Some(&30));
    /// assert!(set.upper_bound(&30).is_end());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[must_use]
    pub fn upper_bound<Q>(&self, value: &Q) -> Cursor<'_, T>
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        Cursor::new(&self.raw, self.raw.upper_bound(value))
    }

    /// Returns `true` if the set contains a value.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_set::RBTreeSet;
    ///
    /// let set = RBTreeSet::from([1, 2, 3]);
    /// assert_eq!(set.contains(&1), true);
    /// assert_eq!(set.contains(&4), false);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[must_use]
    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.search(value).is_some()
    }

    /// Returns a reference to the value in the set, if any, that is equal to the given value.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_set::RBTreeSet;
    ///
    /// let set = RBTreeSet::from([1, 2, 3]);
    /// assert_eq!(set.get(&2), Some(&2));
    /// assert_eq!(set.get(&4), None);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[must_use]
    pub fn get<Q>(&self, value: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.search(value).map(|handle| self.raw.value(handle))
    }

    /// Adds a value to the set.
    ///
    /// Returns whether the value was newly inserted. That is:
    ///
    /// - If the set did not previously contain an equal value, `true` is
    ///   returned.
    /// - If the set already contained an equal value, `false` is returned, and
    ///   the entry is not updated.
    ///
    /// # Panics
    ///
    /// Panics if the node for the new value cannot be allocated. Use
    /// [`try_insert`](RBTreeSet::try_insert) to handle that case.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_set::RBTreeSet;
    ///
    /// let mut set = RBTreeSet::new();
    ///
    /// assert_eq!(set.insert(2), true);
    /// assert_eq!(set.insert(2), false);
    /// assert_eq!(set.len(), 1);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn insert(&mut self, value: T) -> bool {
        match self.try_insert(value) {
            Ok(inserted) => inserted,
            Err(err) => panic!("`RBTreeSet::insert()` - {err}"),
        }
    }

    /// Adds a value to the set, reporting allocation failure instead of
    /// panicking.
    ///
    /// Returns `Ok(false)` without touching the set if an equal value is
    /// already present.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] if no node can be allocated for the value. The set
    /// is left exactly as it was before the call and `value` is dropped.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_set::RBTreeSet;
    ///
    /// let mut set = RBTreeSet::new();
    /// assert_eq!(set.try_insert("a"), Ok(true));
    /// assert_eq!(set.try_insert("a"), Ok(false));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn try_insert(&mut self, value: T) -> Result<bool, Error> {
        let len = self.raw.len();
        self.raw
            .try_insert(value)
            .inspect_err(|err| debug!("insert into a set of {len} elements failed: {err}"))
    }

    /// If the set contains an element equal to the value, removes it from the
    /// set and drops it. Returns whether such an element was present.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_set::RBTreeSet;
    ///
    /// let mut set = RBTreeSet::new();
    ///
    /// set.insert(2);
    /// assert_eq!(set.remove(&2), true);
    /// assert_eq!(set.remove(&2), false);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn remove<Q>(&mut self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.take(value).is_some()
    }

    /// Removes and returns the element in the set, if any, that is equal to
    /// the value.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_set::RBTreeSet;
    ///
    /// let mut set = RBTreeSet::from([1, 2, 3]);
    /// assert_eq!(set.take(&2), Some(2));
    /// assert_eq!(set.take(&2), None);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn take<Q>(&mut self, value: &Q) -> Option<T>
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.take(value)
    }

    /// Removes the first element from the set and returns it, if any.
    /// The first element is always the minimum element in the set.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_set::RBTreeSet;
    ///
    /// let mut set = RBTreeSet::from([1, 2]);
    /// assert_eq!(set.pop_first(), Some(1));
    /// assert_eq!(set.pop_first(), Some(2));
    /// assert_eq!(set.pop_first(), None);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn pop_first(&mut self) -> Option<T> {
        let handle = self.raw.first()?;
        Some(self.raw.remove_node(handle))
    }

    /// Removes the last element from the set and returns it, if any.
    /// The last element is always the maximum element in the set.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_set::RBTreeSet;
    ///
    /// let mut set = RBTreeSet::from([1, 2]);
    /// assert_eq!(set.pop_last(), Some(2));
    /// assert_eq!(set.pop_last(), Some(1));
    /// assert_eq!(set.pop_last(), None);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn pop_last(&mut self) -> Option<T> {
        let handle = self.raw.last()?;
        Some(self.raw.remove_node(handle))
    }

    /// Constructs a double-ended iterator over a sub-range of elements in the set.
    /// The simplest way is to use the range syntax `min..max`, thus `range(min..max)` will
    /// yield elements from min (inclusive) to max (exclusive).
    /// The range may also be entered as `(Bound<T>, Bound<T>)`, so for example
    /// `range((Excluded(4), Included(10)))` will yield a left-exclusive, right-inclusive
    /// range from 4 to 10.
    ///
    /// # Panics
    ///
    /// Panics if range `start > end`.
    /// Panics if range `start == end` and both bounds are `Excluded`.
    ///
    /// # Examples
    ///
    /// ```
    /// use core::ops::Bound::{Excluded, Included};
    /// use rbtree_set::RBTreeSet;
    ///
    /// let set = RBTreeSet::from([3, 5, 8]);
    /// let inside: Vec<_> = set.range((Excluded(&3), Included(&8))).copied().collect();
    /// assert_eq!(inside, [5, 8]);
    /// assert_eq!(Some(&5), set.range(4..).next());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n) to create the iterator; each step is amortized O(1).
    pub fn range<K, R>(&self, range: R) -> Range<'_, T>
    where
        K: ?Sized + Ord,
        T: Borrow<K>,
        R: RangeBounds<K>,
    {
        match (range.start_bound(), range.end_bound()) {
            (Bound::Excluded(start), Bound::Excluded(end)) if start == end => {
                panic!("range start and end are equal and excluded in RBTreeSet")
            }
            (Bound::Included(start) | Bound::Excluded(start), Bound::Included(end) | Bound::Excluded(end))
                if start > end =>
            {
                panic!("range start is greater than range end in RBTreeSet")
            }
            _ => {}
        }

        let head = match range.start_bound() {
            Bound::Included(start) => self.raw.lower_bound(start),
            Bound::Excluded(start) => self.raw.upper_bound(start),
            Bound::Unbounded => self.raw.first(),
        };
        let tail = match range.end_bound() {
            Bound::Included(end) => self.raw.last_at_or_below(end),
            Bound::Excluded(end) => self.raw.last_below(end),
            Bound::Unbounded => self.raw.last(),
        };

        let (head, tail) = match (head, tail) {
            (Some(head), Some(tail)) if self.raw.value(head) <= self.raw.value(tail) => (Some(head), Some(tail)),
            _ => (None, None),
        };
        Range {
            tree: &self.raw,
            head,
            tail,
        }
    }
}

impl<T: Hash> Hash for RBTreeSet<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.len());
        for elt in self {
            elt.hash(state);
        }
    }
}

impl<T: PartialEq> PartialEq for RBTreeSet<T> {
    fn eq(&self, other: &RBTreeSet<T>) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for RBTreeSet<T> {}

impl<T: PartialOrd> PartialOrd for RBTreeSet<T> {
    fn partial_cmp(&self, other: &RBTreeSet<T>) -> Option<Ordering> {
        self.iter().partial_cmp(other.iter())
    }
}

impl<T: Ord> Ord for RBTreeSet<T> {
    fn cmp(&self, other: &RBTreeSet<T>) -> Ordering {
        self.iter().cmp(other.iter())
    }
}

impl<T: Clone> Clone for RBTreeSet<T> {
    /// Deep-copies the set.
    ///
    /// # Panics
    ///
    /// Panics if the copy cannot be allocated. See
    /// [`try_clone`](RBTreeSet::try_clone).
    fn clone(&self) -> Self {
        match self.try_clone() {
            Ok(set) => set,
            Err(err) => panic!("`RBTreeSet::clone()` - {err}"),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for RBTreeSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T> Default for RBTreeSet<T> {
    fn default() -> Self {
        RBTreeSet::new()
    }
}

impl<T: Ord> FromIterator<T> for RBTreeSet<T> {
    /// Inserts every item in sequence order; later duplicates are ignored.
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = RBTreeSet::new();
        set.extend(iter);
        set
    }
}

impl<T: Ord> Extend<T> for RBTreeSet<T> {
    fn extend<Iter: IntoIterator<Item = T>>(&mut self, iter: Iter) {
        for elem in iter {
            self.insert(elem);
        }
    }
}

impl<'a, T: 'a + Ord + Copy> Extend<&'a T> for RBTreeSet<T> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied());
    }
}

impl<T: Ord, const N: usize> From<[T; N]> for RBTreeSet<T> {
    /// Converts a `[T; N]` into a `RBTreeSet<T>`.
    ///
    /// ```
    /// use rbtree_set::RBTreeSet;
    ///
    /// let set1 = RBTreeSet::from([1, 2, 3, 4]);
    /// let set2: RBTreeSet<_> = [1, 2, 3, 4].into();
    /// assert_eq!(set1, set2);
    /// ```
    fn from(arr: [T; N]) -> Self {
        arr.into_iter().collect()
    }
}

impl<T> IntoIterator for RBTreeSet<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    /// Gets an iterator for moving out the `RBTreeSet`'s contents in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_set::RBTreeSet;
    ///
    /// let set = RBTreeSet::from([1, 2, 3, 4]);
    ///
    /// let v: Vec<_> = set.into_iter().collect();
    /// assert_eq!(v, [1, 2, 3, 4]);
    /// ```
    fn into_iter(self) -> IntoIter<T> {
        IntoIter { raw: self.raw }
    }
}

impl<'a, T> IntoIterator for &'a RBTreeSet<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<'a, T> Iter<'a, T> {
    fn new(tree: &'a RawRBTree<T>) -> Self {
        Iter {
            tree,
            head: tree.first(),
            tail: tree.last(),
            remaining: tree.len(),
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        let handle = self.head?;
        self.remaining -= 1;
        self.head = self.tree.successor(Some(handle));
        Some(self.tree.value(handle))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }

    fn last(mut self) -> Option<&'a T> {
        self.next_back()
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        let handle = self.tail?;
        self.remaining -= 1;
        self.tail = self.tree.predecessor(Some(handle));
        Some(self.tree.value(handle))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Iter {
            tree: self.tree,
            head: self.head,
            tail: self.tail,
            remaining: self.remaining,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Iter<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

// Each step unlinks the current extreme, so no buffer is needed and the
// elements not yet yielded are dropped with the tree.
impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let handle = self.raw.first()?;
        Some(self.raw.remove_node(handle))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.raw.len(), Some(self.raw.len()))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        let handle = self.raw.last()?;
        Some(self.raw.remove_node(handle))
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {
    fn len(&self) -> usize {
        self.raw.len()
    }
}

impl<T> FusedIterator for IntoIter<T> {}

impl<T: fmt::Debug> fmt::Debug for IntoIter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&Iter::new(&self.raw)).finish()
    }
}

impl<'a, T> Iterator for Range<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let handle = self.head?;
        if self.head == self.tail {
            self.head = None;
            self.tail = None;
        } else {
            self.head = self.tree.successor(Some(handle));
        }
        Some(self.tree.value(handle))
    }

    fn last(mut self) -> Option<&'a T> {
        self.next_back()
    }
}

impl<'a, T> DoubleEndedIterator for Range<'a, T> {
    fn next_back(&mut self) -> Option<&'a T> {
        let handle = self.tail?;
        if self.head == self.tail {
            self.head = None;
            self.tail = None;
        } else {
            self.tail = self.tree.predecessor(Some(handle));
        }
        Some(self.tree.value(handle))
    }
}

impl<T> FusedIterator for Range<'_, T> {}

impl<T> Clone for Range<'_, T> {
    fn clone(&self) -> Self {
        Range {
            tree: self.tree,
            head: self.head,
            tail: self.tail,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Range<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}
