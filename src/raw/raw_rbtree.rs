use core::borrow::Borrow;
use core::cmp::Ordering;

use log::trace;
use smallvec::SmallVec;

use super::arena::{Arena, Handle};
use super::node::{Color, Node, Side};
use crate::Error;

mod rebalance;

/// The red-black tree backing `RBTreeSet`.
pub(crate) struct RawRBTree<T> {
    /// Arena owning every node of the tree.
    nodes: Arena<Node<T>>,
    /// Handle to the root node, if the tree is non-empty.
    root: Option<Handle>,
    /// Handle to the node holding the minimum value.
    begin: Option<Handle>,
    /// Number of values in the tree.
    len: usize,
}

/// Explicit stack for depth-first walks. Red-black height stays below 64 for
/// anything a handle can address, so this never spills in practice.
type WalkStack<E> = SmallVec<[E; 64]>;

impl<T> RawRBTree<T> {
    /// Creates a new, empty tree.
    pub(crate) const fn new() -> Self {
        Self {
            nodes: Arena::new(),
            root: None,
            begin: None,
            len: 0,
        }
    }

    /// Creates a new, empty tree with room for `capacity` nodes.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Arena::with_capacity(capacity),
            root: None,
            begin: None,
            len: 0,
        }
    }

    /// Creates a new, empty tree with room for `capacity` nodes, reporting
    /// allocation failure instead of aborting.
    pub(crate) fn try_with_capacity(capacity: usize) -> Result<Self, Error> {
        Ok(Self {
            nodes: Arena::try_with_capacity(capacity)?,
            root: None,
            begin: None,
            len: 0,
        })
    }

    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    pub(crate) const fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub(crate) fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    /// Releases every node.
    pub(crate) fn clear(&mut self) {
        trace!("clearing red-black tree of {} nodes", self.len);
        self.nodes.clear();
        self.root = None;
        self.begin = None;
        self.len = 0;
    }

    /// Exchanges the entire state of two trees.
    pub(crate) fn swap(&mut self, other: &mut Self) {
        trace!("swapping red-black trees of {} and {} nodes", self.len, other.len);
        core::mem::swap(self, other);
    }

    /// Returns the value stored at `handle`.
    #[inline]
    pub(crate) fn value(&self, handle: Handle) -> &T {
        self.nodes.get(handle).value()
    }

    /// Returns the node holding the minimum value.
    #[inline]
    pub(crate) const fn first(&self) -> Option<Handle> {
        self.begin
    }

    /// Returns the node holding the maximum value.
    pub(crate) fn last(&self) -> Option<Handle> {
        self.root.map(|root| self.extreme(root, Side::Right))
    }

    /// Walks from `from` to the last node on the `side` spine of its subtree.
    fn extreme(&self, from: Handle, side: Side) -> Handle {
        let mut current = from;
        while let Some(child) = self.nodes.get(current).child(side) {
            current = child;
        }
        current
    }

    /// Returns the in-order successor of `node`. `None` stands for the end
    /// position: its successor is the minimum.
    pub(crate) fn successor(&self, node: Option<Handle>) -> Option<Handle> {
        self.step(node, Side::Right)
    }

    /// Returns the in-order predecessor of `node`. `None` stands for the end
    /// position: its predecessor is the maximum.
    pub(crate) fn predecessor(&self, node: Option<Handle>) -> Option<Handle> {
        self.step(node, Side::Left)
    }

    fn step(&self, node: Option<Handle>, towards: Side) -> Option<Handle> {
        let back = towards.opposite();
        let Some(node) = node else {
            return self.root.map(|root| self.extreme(root, back));
        };

        if let Some(child) = self.nodes.get(node).child(towards) {
            return Some(self.extreme(child, back));
        }

        let mut child = node;
        let mut parent = self.nodes.get(node).parent();
        while let Some(ancestor) = parent {
            if self.nodes.get(ancestor).child(towards) != Some(child) {
                break;
            }
            child = ancestor;
            parent = self.nodes.get(ancestor).parent();
        }
        parent
    }

    /// Removes the value held by `handle` and returns it.
    pub(crate) fn remove_node(&mut self, handle: Handle) -> T {
        let node = self.nodes.get(handle);
        // A node with two children trades values with its in-order predecessor,
        // which has at most one child, and that node is removed instead.
        let spliced = match (node.left(), node.right()) {
            (Some(left), Some(_)) => {
                let predecessor = self.extreme(left, Side::Right);
                let (target, source) = self.nodes.get_pair_mut(handle, predecessor);
                core::mem::swap(target.value_mut(), source.value_mut());
                predecessor
            }
            _ => handle,
        };

        self.unlink(spliced);
        let removed = self.nodes.take(spliced).into_value();
        self.len -= 1;

        if self.begin == Some(spliced) {
            self.begin = self.root.map(|root| self.extreme(root, Side::Left));
        }
        removed
    }

    /// Detaches a node with at most one child, restoring the red-black
    /// invariants. The node stays allocated.
    fn unlink(&mut self, handle: Handle) {
        let node = self.nodes.get(handle);
        let child = node.sole_child();
        let parent = node.parent();

        if self.color(Some(handle)) == Color::Red {
            self.replace_child(parent, handle, child);
            if let Some(child) = child {
                self.nodes.get_mut(child).set_parent(parent);
            }
            return;
        }

        match child {
            Some(child) => {
                self.replace_child(parent, handle, Some(child));
                self.nodes.get_mut(child).set_parent(parent);
                self.erase_rebalance(child);
            }
            None => {
                // Rebalance around the node while it still occupies its slot.
                self.erase_rebalance(handle);
                let parent = self.nodes.get(handle).parent();
                self.replace_child(parent, handle, None);
            }
        }
    }

    /// Produces a structurally and color-identical copy.
    ///
    /// Every node slot is reserved before the first value is cloned, so an
    /// allocation failure leaves nothing behind. If cloning a value panics,
    /// the partial copy is dropped during unwinding.
    pub(crate) fn try_clone(&self) -> Result<Self, Error>
    where
        T: Clone,
    {
        // The only fallible step. Every `alloc` below lands in a reserved
        // slot, so a failure here is reported before any value is cloned.
        let mut copy = Self::try_with_capacity(self.len)?;
        let Some(root) = self.root else {
            return Ok(copy);
        };
        trace!("cloning red-black tree of {} nodes", self.len);

        let mut pending: WalkStack<(Handle, Option<(Handle, Side)>)> = SmallVec::new();
        pending.push((root, None));

        while let Some((source, link)) = pending.pop() {
            let node = self.nodes.get(source);
            let parent = link.map(|(parent, _)| parent);
            let handle = copy.nodes.alloc(Node::with_color(node.value().clone(), parent, node.color()));

            match link {
                None => copy.root = Some(handle),
                Some((parent, side)) => copy.nodes.get_mut(parent).set_child(side, Some(handle)),
            }
            if self.begin == Some(source) {
                copy.begin = Some(handle);
            }

            if let Some(right) = node.right() {
                pending.push((right, Some((handle, Side::Right))));
            }
            if let Some(left) = node.left() {
                pending.push((left, Some((handle, Side::Left))));
            }
        }

        copy.len = self.len;
        Ok(copy)
    }
}

impl<T: Ord> RawRBTree<T> {
    /// Finds the node holding a value equivalent to `key`.
    pub(crate) fn search<Q>(&self, key: &Q) -> Option<Handle>
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut current = self.root;
        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            current = match key.cmp(node.value().borrow()) {
                Ordering::Less => node.left(),
                Ordering::Greater => node.right(),
                Ordering::Equal => return Some(handle),
            };
        }
        None
    }

    /// Returns the smallest node for which `is_candidate` holds. The predicate
    /// must be monotone: false for a prefix of the order, true afterwards.
    fn first_where(&self, is_candidate: impl Fn(&T) -> bool) -> Option<Handle> {
        let mut best = None;
        let mut current = self.root;
        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            if is_candidate(node.value()) {
                best = Some(handle);
                current = node.left();
            } else {
                current = node.right();
            }
        }
        best
    }

    /// Returns the largest node for which `is_candidate` holds. The predicate
    /// must be true for a prefix of the order and false afterwards.
    fn last_where(&self, is_candidate: impl Fn(&T) -> bool) -> Option<Handle> {
        let mut best = None;
        let mut current = self.root;
        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            if is_candidate(node.value()) {
                best = Some(handle);
                current = node.right();
            } else {
                current = node.left();
            }
        }
        best
    }

    /// First node whose value is not less than `key`.
    pub(crate) fn lower_bound<Q>(&self, key: &Q) -> Option<Handle>
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.first_where(|value| key.cmp(value.borrow()).is_le())
    }

    /// First node whose value is greater than `key`.
    pub(crate) fn upper_bound<Q>(&self, key: &Q) -> Option<Handle>
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.first_where(|value| key.cmp(value.borrow()).is_lt())
    }

    /// Last node whose value is not greater than `key`.
    pub(crate) fn last_at_or_below<Q>(&self, key: &Q) -> Option<Handle>
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.last_where(|value| key.cmp(value.borrow()).is_ge())
    }

    /// Last node whose value is less than `key`.
    pub(crate) fn last_below<Q>(&self, key: &Q) -> Option<Handle>
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.last_where(|value| key.cmp(value.borrow()).is_gt())
    }

    /// Inserts `value` unless an equivalent value is present.
    ///
    /// Returns `Ok(false)` for a duplicate. On error the tree is unchanged.
    pub(crate) fn try_insert(&mut self, value: T) -> Result<bool, Error> {
        let mut link: Option<(Handle, Side)> = None;
        let mut leftmost = true;
        let mut current = self.root;

        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            let side = match value.cmp(node.value()) {
                Ordering::Less => Side::Left,
                Ordering::Greater => Side::Right,
                Ordering::Equal => return Ok(false),
            };
            leftmost &= side == Side::Left;
            link = Some((handle, side));
            current = node.child(side);
        }

        self.nodes.try_reserve(1)?;

        let parent = link.map(|(parent, _)| parent);
        let handle = self.nodes.alloc(Node::new(value, parent));
        match link {
            None => self.root = Some(handle),
            Some((parent, side)) => self.nodes.get_mut(parent).set_child(side, Some(handle)),
        }
        self.len += 1;
        self.insert_rebalance(handle);

        if leftmost {
            self.begin = Some(handle);
        }
        Ok(true)
    }

    /// Removes and returns the value equivalent to `key`, if present.
    pub(crate) fn take<Q>(&mut self, key: &Q) -> Option<T>
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let handle = self.search(key)?;
        Some(self.remove_node(handle))
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
#[allow(clippy::uninlined_format_args)]
mod tests {
    use super::*;
    use alloc::string::String;
    use alloc::vec;
    use alloc::vec::Vec;
    use proptest::prelude::*;

    impl<T: Ord + core::fmt::Debug> RawRBTree<T> {
        /// Validates every structural invariant. Panics with a descriptive
        /// message listing all violations.
        pub(crate) fn validate_invariants(&self) {
            let mut errors: Vec<String> = Vec::new();

            match self.root {
                None => {
                    if self.len != 0 {
                        errors.push(alloc::format!("empty tree has len {}", self.len));
                    }
                    if self.begin.is_some() {
                        errors.push("empty tree has a begin node".into());
                    }
                }
                Some(root) => {
                    if self.color(Some(root)) != Color::Black {
                        errors.push("root is red".into());
                    }
                    if self.nodes.get(root).parent().is_some() {
                        errors.push("root has a parent".into());
                    }
                    let mut count = 0;
                    self.validate_node(root, &mut count, &mut errors);
                    if count != self.len {
                        errors.push(alloc::format!("len mismatch: self.len={}, reachable={}", self.len, count));
                    }
                    if self.begin != Some(self.extreme(root, Side::Left)) {
                        errors.push(alloc::format!("begin cache {:?} is not the minimum", self.begin));
                    }
                }
            }

            if self.nodes.len() != self.len {
                errors.push(alloc::format!("arena holds {} nodes, len is {}", self.nodes.len(), self.len));
            }
            if self.color(None) != Color::Black {
                errors.push("absent node is not black".into());
            }

            assert!(errors.is_empty(), "Tree invariant violations:\n{}", errors.join("\n"));
        }

        /// Returns the black-height of the subtree at `handle`.
        fn validate_node(&self, handle: Handle, count: &mut usize, errors: &mut Vec<String>) -> usize {
            *count += 1;
            let node = self.nodes.get(handle);
            let mut heights = [0usize; 2];

            for (slot, side) in [Side::Left, Side::Right].into_iter().enumerate() {
                let Some(child) = node.child(side) else {
                    continue;
                };
                let child_node = self.nodes.get(child);
                if child_node.parent() != Some(handle) {
                    errors.push(alloc::format!("child {:?} of {:?} has parent {:?}", child, handle, child_node.parent()));
                }
                let ordered = match side {
                    Side::Left => child_node.value() < node.value(),
                    Side::Right => child_node.value() > node.value(),
                };
                if !ordered {
                    errors.push(alloc::format!("{:?} is on the wrong side of {:?}", child_node.value(), node.value()));
                }
                if node.color() == Color::Red && child_node.color() == Color::Red {
                    errors.push(alloc::format!("red {:?} has red child {:?}", node.value(), child_node.value()));
                }
                heights[slot] = self.validate_node(child, count, errors);
            }

            if heights[0] != heights[1] {
                errors.push(alloc::format!(
                    "black-height mismatch under {:?}: left={}, right={}",
                    node.value(),
                    heights[0],
                    heights[1]
                ));
            }
            heights[0] + usize::from(node.color() == Color::Black)
        }

        /// Number of nodes on the longest root-to-leaf path.
        pub(crate) fn height(&self) -> usize {
            let mut deepest = 0;
            let mut pending: WalkStack<(Handle, usize)> = SmallVec::new();
            pending.extend(self.root.map(|root| (root, 1)));
            while let Some((handle, depth)) = pending.pop() {
                deepest = deepest.max(depth);
                let node = self.nodes.get(handle);
                pending.extend(node.left().map(|left| (left, depth + 1)));
                pending.extend(node.right().map(|right| (right, depth + 1)));
            }
            deepest
        }

        fn in_order(&self) -> Vec<&T> {
            let mut values = Vec::new();
            let mut current = self.successor(None);
            while let Some(handle) = current {
                values.push(self.value(handle));
                current = self.successor(Some(handle));
            }
            values
        }

        fn shape(&self, handle: Option<Handle>) -> String {
            match handle {
                None => ".".into(),
                Some(handle) => {
                    let node = self.nodes.get(handle);
                    alloc::format!(
                        "({:?}{} {} {})",
                        node.value(),
                        if node.color() == Color::Red { "r" } else { "b" },
                        self.shape(node.left()),
                        self.shape(node.right())
                    )
                }
            }
        }
    }

    fn tree_of(values: &[i32]) -> RawRBTree<i32> {
        let mut tree = RawRBTree::new();
        for &value in values {
            tree.try_insert(value).unwrap();
            tree.validate_invariants();
        }
        tree
    }

    // height <= 2 * log2(n + 1), i.e. 2^height <= (n + 1)^2.
    fn within_height_bound<T: Ord + core::fmt::Debug>(tree: &RawRBTree<T>) -> bool {
        let n = tree.len() as u128 + 1;
        1u128 << tree.height() <= n * n
    }

    #[test]
    fn successor_of_end_is_minimum_and_predecessor_is_maximum() {
        let tree = tree_of(&[5, 3, 8]);
        assert_eq!(tree.successor(None).map(|h| *tree.value(h)), Some(3));
        assert_eq!(tree.predecessor(None).map(|h| *tree.value(h)), Some(8));

        let empty: RawRBTree<i32> = RawRBTree::new();
        assert_eq!(empty.successor(None), None);
        assert_eq!(empty.predecessor(None), None);
    }

    #[test]
    fn stepping_past_either_end_reaches_end() {
        let tree = tree_of(&[5, 3, 8]);
        assert_eq!(tree.successor(tree.last()), None);
        assert_eq!(tree.predecessor(tree.first()), None);
    }

    #[test]
    fn backward_walk_mirrors_forward_walk() {
        let tree = tree_of(&[50, 20, 70, 10, 30, 60, 80, 25, 35, 65]);
        let forward = tree.in_order();

        let mut backward = Vec::new();
        let mut current = tree.predecessor(None);
        while let Some(handle) = current {
            backward.push(tree.value(handle));
            current = tree.predecessor(Some(handle));
        }
        backward.reverse();
        assert_eq!(forward, backward);
    }

    #[test]
    fn rotations_preserve_order_and_links() {
        let mut tree = tree_of(&[2, 1, 3]);
        let root = tree.root.unwrap();

        tree.rotate(root, Side::Left);
        assert_eq!(*tree.value(tree.root.unwrap()), 3);
        assert_eq!(tree.in_order(), vec![&1, &2, &3]);
        assert_eq!(tree.nodes.get(root).parent(), tree.root);

        tree.rotate(tree.root.unwrap(), Side::Right);
        assert_eq!(tree.root, Some(root));
        assert_eq!(tree.in_order(), vec![&1, &2, &3]);
        assert_eq!(tree.nodes.get(root).parent(), None);
    }

    #[test]
    fn ascending_insertions_rotate_into_balance() {
        let tree = tree_of(&[1, 2, 3]);
        assert_eq!(tree.shape(tree.root), "(2b (1r . .) (3r . .))");
    }

    #[test]
    fn triangle_insertion_is_straightened() {
        let tree = tree_of(&[3, 1, 2]);
        assert_eq!(tree.shape(tree.root), "(2b (1r . .) (3r . .))");
    }

    #[test]
    fn red_uncle_recolors_upwards() {
        let tree = tree_of(&[2, 1, 3, 4]);
        assert_eq!(tree.shape(tree.root), "(2b (1b . .) (3b . (4r . .)))");
    }

    #[test]
    fn seven_values_iterate_in_order() {
        let tree = tree_of(&[5, 3, 8, 1, 4, 7, 9]);
        assert_eq!(tree.in_order(), vec![&1, &3, &4, &5, &7, &8, &9]);
    }

    #[test]
    fn erasing_an_inner_node_splices_its_predecessor() {
        let mut tree = tree_of(&[5, 3, 8, 1, 4, 7, 9]);
        let root = tree.root.unwrap();

        assert_eq!(tree.take(&5), Some(5));
        tree.validate_invariants();
        // The root node survives and now holds the predecessor's value.
        assert_eq!(tree.root, Some(root));
        assert_eq!(*tree.value(root), 4);
        assert_eq!(tree.in_order(), vec![&1, &3, &4, &7, &8, &9]);

        assert_eq!(tree.lower_bound(&6).map(|h| *tree.value(h)), Some(7));
        assert_eq!(tree.search(&10), None);
    }

    #[test]
    fn erasing_the_minimum_moves_begin() {
        let mut tree = tree_of(&[2, 1, 3]);
        tree.take(&1);
        tree.validate_invariants();
        assert_eq!(tree.first().map(|h| *tree.value(h)), Some(2));

        // Predecessor of the root is the minimum; the cache must follow the
        // surviving node, not the freed one.
        let mut tree = tree_of(&[2, 1, 3]);
        tree.take(&2);
        tree.validate_invariants();
        assert_eq!(tree.first().map(|h| *tree.value(h)), Some(1));
    }

    #[test]
    fn erasing_black_leaf_with_red_sibling() {
        let mut tree = tree_of(&[10, 5, 20, 15, 25, 30]);
        // 20 is red with black children, 5 is a black leaf.
        assert_eq!(tree.take(&5), Some(5));
        tree.validate_invariants();
        assert_eq!(tree.in_order(), vec![&10, &15, &20, &25, &30]);
    }

    #[test]
    fn erase_absent_is_noop() {
        let mut tree = tree_of(&[1, 2, 3]);
        assert_eq!(tree.take(&4), None);
        assert_eq!(tree.len(), 3);

        let mut empty: RawRBTree<i32> = RawRBTree::new();
        assert_eq!(empty.take(&1), None);
        empty.validate_invariants();
    }

    #[test]
    fn erase_everything_leaves_empty_tree() {
        let values: Vec<i32> = (0..64).map(|i| (i * 37) % 64).collect();
        let mut tree = tree_of(&values);
        for value in &values {
            assert_eq!(tree.take(value), Some(*value));
            tree.validate_invariants();
        }
        assert!(tree.is_empty());
        assert_eq!(tree.root, None);
    }

    #[test]
    fn bounds_on_empty_tree_are_end() {
        let tree: RawRBTree<i32> = RawRBTree::new();
        assert_eq!(tree.lower_bound(&0), None);
        assert_eq!(tree.upper_bound(&0), None);
        assert_eq!(tree.last_below(&0), None);
        assert_eq!(tree.last_at_or_below(&0), None);
    }

    #[test]
    fn bounds_pick_neighbours() {
        let tree = tree_of(&[10, 20, 30]);
        let at = |handle: Option<Handle>| handle.map(|h| *tree.value(h));
        assert_eq!(at(tree.lower_bound(&20)), Some(20));
        assert_eq!(at(tree.upper_bound(&20)), Some(30));
        assert_eq!(at(tree.last_at_or_below(&20)), Some(20));
        assert_eq!(at(tree.last_below(&20)), Some(10));
        assert_eq!(at(tree.lower_bound(&31)), None);
        assert_eq!(at(tree.last_below(&10)), None);
    }

    #[test]
    fn height_stays_within_red_black_bound() {
        let mut tree = RawRBTree::new();
        for value in (0..10).rev() {
            tree.try_insert(value).unwrap();
        }
        for value in 100..110 {
            tree.try_insert(value).unwrap();
        }
        tree.validate_invariants();

        assert_eq!(tree.len(), 20);
        assert!(within_height_bound(&tree), "height {} of {} nodes", tree.height(), tree.len());
    }

    #[test]
    fn clone_is_structurally_identical() {
        let mut tree = tree_of(&[50, 20, 70, 10, 30, 60, 80, 25, 35, 65]);
        tree.take(&70);
        let copy = tree.try_clone().unwrap();
        copy.validate_invariants();
        assert_eq!(copy.shape(copy.root), tree.shape(tree.root));
        assert_eq!(copy.first().map(|h| *copy.value(h)), Some(10));
        // Freed slots are not carried over.
        assert_eq!(copy.nodes.len(), copy.len());
    }

    #[test]
    fn clone_of_empty_tree_is_empty() {
        let tree: RawRBTree<i32> = RawRBTree::new();
        let copy = tree.try_clone().unwrap();
        copy.validate_invariants();
        assert!(copy.is_empty());
    }

    #[test]
    fn insert_past_capacity_leaves_tree_untouched() {
        let mut tree = RawRBTree::new();
        for value in 0..Handle::MAX {
            tree.try_insert(value).unwrap();
        }
        let height_before = tree.height();

        assert_eq!(tree.try_insert(usize::MAX), Err(Error::CapacityExceeded { max: Handle::MAX }));
        assert_eq!(tree.try_insert(0), Ok(false));
        assert_eq!(tree.len(), Handle::MAX);
        assert_eq!(tree.height(), height_before);
        assert_eq!(tree.search(&usize::MAX), None);
        tree.validate_invariants();
    }

    #[test]
    fn removing_extremes_empties_in_order() {
        let mut tree = tree_of(&[5, 3, 8, 1, 4, 7, 9]);
        let mut front = vec![];
        let mut back = vec![];
        while let Some(first) = tree.first() {
            front.push(tree.remove_node(first));
            tree.validate_invariants();
            if let Some(last) = tree.last() {
                back.push(tree.remove_node(last));
                tree.validate_invariants();
            }
        }
        assert_eq!(front, vec![1, 3, 4, 5]);
        assert_eq!(back, vec![9, 8, 7]);
        assert_eq!(tree.root, None);
        assert_eq!(tree.nodes.len(), 0);
    }

    #[test]
    fn clone_allocates_nothing_after_reserving() {
        let tree = tree_of(&(0..100).collect::<Vec<_>>());
        let reserved = RawRBTree::<i32>::try_with_capacity(tree.len()).unwrap().capacity();
        let copy = tree.try_clone().unwrap();
        copy.validate_invariants();
        assert_eq!(copy.capacity(), reserved);
    }

    #[test]
    fn clone_reservation_refuses_past_handle_space() {
        assert_eq!(
            RawRBTree::<u8>::try_with_capacity(Handle::MAX + 1).err(),
            Some(Error::CapacityExceeded { max: Handle::MAX })
        );
    }

    #[derive(Clone, Debug)]
    enum Op {
        Insert(i32),
        Remove(i32),
        PopFirst,
        PopLast,
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            6 => (0i32..500).prop_map(Op::Insert),
            3 => (0i32..500).prop_map(Op::Remove),
            1 => Just(Op::PopFirst),
            1 => Just(Op::PopLast),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn invariants_hold_after_every_operation(ops in prop::collection::vec(op_strategy(), 0..400)) {
            let mut tree: RawRBTree<i32> = RawRBTree::new();

            for op in ops {
                match op {
                    Op::Insert(value) => {
                        tree.try_insert(value).unwrap();
                    }
                    Op::Remove(value) => {
                        tree.take(&value);
                    }
                    Op::PopFirst => {
                        if let Some(handle) = tree.first() {
                            tree.remove_node(handle);
                        }
                    }
                    Op::PopLast => {
                        if let Some(handle) = tree.last() {
                            tree.remove_node(handle);
                        }
                    }
                }
                tree.validate_invariants();
            }

            let copy = tree.try_clone().unwrap();
            copy.validate_invariants();
            prop_assert_eq!(copy.shape(copy.root), tree.shape(tree.root));
        }

        #[test]
        fn height_is_logarithmic(values in prop::collection::vec(any::<i32>(), 1..2000)) {
            let mut tree = RawRBTree::new();
            for value in values {
                tree.try_insert(value).unwrap();
            }
            prop_assert!(within_height_bound(&tree));
        }
    }
}
