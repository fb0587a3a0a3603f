use alloc::vec::Vec;
use core::num::NonZero;

use crate::Error;

#[cfg(test)]
type RawHandle = u16;
#[cfg(not(test))]
type RawHandle = u32;

/// The identity of a node: an index into the tree's arena.
///
/// A handle stays valid from the moment its node is allocated until the node
/// is freed, no matter how the tree is restructured around it.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(transparent)]
pub(crate) struct Handle(NonZero<RawHandle>);

impl Handle {
    pub(crate) const MAX: usize = (RawHandle::MAX - 1) as usize;

    #[inline]
    const fn from_index(index: usize) -> Self {
        assert!(index < Self::MAX, "`Handle::from_index()` - `index` >= `Handle::MAX`!");
        #[allow(clippy::cast_possible_truncation)]
        let raw = (index + 1) as RawHandle;
        match NonZero::new(raw) {
            Some(raw) => Self(raw),
            None => unreachable!(),
        }
    }

    #[inline]
    const fn index(self) -> usize {
        (self.0.get() - 1) as usize
    }
}

/// Slot storage for tree nodes with a free list for reuse.
///
/// Elements never move between slots, so a [`Handle`] keeps addressing the
/// same element until it is taken.
pub(crate) struct Arena<T> {
    slots: Vec<Option<T>>,
    free: Vec<Handle>,
}

impl<T> Arena<T> {
    pub(crate) const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
        }
    }

    pub(crate) fn try_with_capacity(capacity: usize) -> Result<Self, Error> {
        let mut arena = Self::new();
        arena.try_reserve(capacity)?;
        Ok(arena)
    }

    pub(crate) fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    #[cfg(test)]
    pub(crate) const fn len(&self) -> usize {
        self.slots.len().saturating_sub(self.free.len())
    }

    /// Makes sure the next `additional` calls to [`Arena::alloc`] cannot fail.
    ///
    /// Leaves the arena untouched on error.
    pub(crate) fn try_reserve(&mut self, additional: usize) -> Result<(), Error> {
        let fresh = additional.saturating_sub(self.free.len());
        if fresh == 0 {
            return Ok(());
        }
        if self.slots.len().saturating_add(fresh) > Handle::MAX {
            return Err(Error::CapacityExceeded { max: Handle::MAX });
        }
        self.slots.try_reserve(fresh)?;
        Ok(())
    }

    pub(crate) fn alloc(&mut self, element: T) -> Handle {
        if let Some(handle) = self.free.pop() {
            self.slots[handle.index()] = Some(element);
            handle
        } else {
            assert!(
                self.slots.len() < Handle::MAX,
                "`Arena::alloc()` - arena is at maximum capacity ({})",
                Handle::MAX
            );
            self.slots.push(Some(element));
            Handle::from_index(self.slots.len() - 1)
        }
    }

    #[inline]
    pub(crate) fn get(&self, handle: Handle) -> &T {
        self.slots[handle.index()].as_ref().expect("`Arena::get()` - `handle` is invalid!")
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, handle: Handle) -> &mut T {
        self.slots[handle.index()].as_mut().expect("`Arena::get_mut()` - `handle` is invalid!")
    }

    /// Borrows two distinct elements mutably at once.
    pub(crate) fn get_pair_mut(&mut self, a: Handle, b: Handle) -> (&mut T, &mut T) {
        let (a, b) = (a.index(), b.index());
        assert_ne!(a, b, "`Arena::get_pair_mut()` - handles alias!");
        let (low, high) = (a.min(b), a.max(b));
        let (head, tail) = self.slots.split_at_mut(high);
        let first = head[low].as_mut().expect("`Arena::get_pair_mut()` - `handle` is invalid!");
        let second = tail[0].as_mut().expect("`Arena::get_pair_mut()` - `handle` is invalid!");
        if a < b { (first, second) } else { (second, first) }
    }

    pub(crate) fn take(&mut self, handle: Handle) -> T {
        let element = self.slots[handle.index()].take().expect("`Arena::take()` - `handle` is invalid!");
        self.free.push(handle);
        element
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
    }
}
