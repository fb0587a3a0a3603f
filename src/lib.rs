//! An ordered set for Rust built on a red-black tree.
//!
//! This crate provides [`RBTreeSet`], a collection of unique, ordered elements
//! with O(log n) lookup, insertion and removal, and a bidirectional [`Cursor`]
//! for walking the set in order from any position:
//!
//! - [`find`](RBTreeSet::find), [`lower_bound`](RBTreeSet::lower_bound) and
//!   [`upper_bound`](RBTreeSet::upper_bound) return cursors
//! - [`begin`](RBTreeSet::begin) and [`end`](RBTreeSet::end) mark the two ends
//!   of the ordering; stepping past either wraps through `end`
//! - [`try_insert`](RBTreeSet::try_insert) and
//!   [`try_clone`](RBTreeSet::try_clone) surface allocation failure as an
//!   [`Error`] and leave the set untouched
//!
//! # Example
//!
//! ```
//! use rbtree_set::RBTreeSet;
//!
//! let mut set = RBTreeSet::new();
//! for value in [5, 3, 8, 1, 4, 7, 9] {
//!     set.insert(value);
//! }
//!
//! // Ordered traversal
//! assert_eq!(set.iter().copied().collect::<Vec<_>>(), [1, 3, 4, 5, 7, 8, 9]);
//!
//! // Cursor navigation
//! let mut cursor = set.lower_bound(&6);
//! assert_eq!(cursor.get(), Some(&7));
//! cursor.move_prev();
//! assert_eq!(cursor.get(), Some(&5));
//!
//! // Walking backwards from the end
//! let mut cursor = set.end();
//! cursor.move_prev();
//! assert_eq!(cursor.get(), Some(&9));
//! ```
//!
//! # Features
//!
//! - **`no_std` compatible** - Only requires `alloc`, no standard library dependency
//! - **Balanced** - Tree height stays below `2 * log2(n + 1)`
//! - **Stable positions** - Nodes live in an arena and are never moved by rebalancing
//! - **O(1) `begin`** - The minimum is cached and kept current across insertions and removals
//!
//! # Implementation
//!
//! Nodes are stored in a slot arena and linked by small integer handles
//! instead of pointers. Each node keeps a back-link to its parent so that
//! cursors can step to the in-order neighbour without an auxiliary stack.

#![no_std]
// These forbid rules and lint groups are meant to be very restrictive.
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;

mod error;
mod raw;

pub mod rbtree_set;

pub use error::Error;
pub use rbtree_set::{Cursor, RBTreeSet};
