//! Rotations and the red-black fixups run after insertion and around removal.
//!
//! Every procedure is written once for a parameterised [`Side`]; the mirrored
//! case is the same code with the sides swapped.

use super::RawRBTree;
use crate::raw::arena::Handle;
use crate::raw::node::{Color, Side};

impl<T> RawRBTree<T> {
    /// Color of a possibly absent node. Absent nodes are black.
    #[inline]
    pub(super) fn color(&self, node: Option<Handle>) -> Color {
        node.map_or(Color::Black, |handle| self.nodes.get(handle).color())
    }

    #[inline]
    fn paint(&mut self, node: Handle, color: Color) {
        self.nodes.get_mut(node).set_color(color);
    }

    /// Which child of `parent` the node `child` is.
    #[inline]
    pub(super) fn side_of(&self, child: Handle, parent: Handle) -> Side {
        if self.nodes.get(parent).left() == Some(child) {
            Side::Left
        } else {
            Side::Right
        }
    }

    /// Points whatever referenced `old` (its parent's child slot, or the root)
    /// at `new` instead. Does not touch `new`'s parent link.
    pub(super) fn replace_child(&mut self, parent: Option<Handle>, old: Handle, new: Option<Handle>) {
        match parent {
            None => self.root = new,
            Some(parent) => {
                let side = self.side_of(old, parent);
                self.nodes.get_mut(parent).set_child(side, new);
            }
        }
    }

    /// Rotates the subtree rooted at `pivot` towards `direction`.
    ///
    /// `rotate(v, Side::Left)` is the classic rotate-left: `v`'s right child
    /// takes `v`'s place, `v` becomes its left child and inherits its old left
    /// subtree. In-order sequence is preserved.
    pub(super) fn rotate(&mut self, pivot: Handle, direction: Side) {
        let rising = direction.opposite();
        let promoted = self
            .nodes
            .get(pivot)
            .child(rising)
            .expect("`RawRBTree::rotate()` - pivot has no child to promote!");
        let parent = self.nodes.get(pivot).parent();
        let inner = self.nodes.get(promoted).child(direction);

        self.nodes.get_mut(pivot).set_child(rising, inner);
        if let Some(inner) = inner {
            self.nodes.get_mut(inner).set_parent(Some(pivot));
        }

        self.replace_child(parent, pivot, Some(promoted));
        self.nodes.get_mut(promoted).set_parent(parent);

        self.nodes.get_mut(promoted).set_child(direction, Some(pivot));
        self.nodes.get_mut(pivot).set_parent(Some(promoted));
    }

    /// Restores the red-black invariants after `node` was linked in red.
    pub(super) fn insert_rebalance(&mut self, mut node: Handle) {
        loop {
            let Some(parent) = self.nodes.get(node).parent() else {
                self.paint(node, Color::Black);
                return;
            };
            if self.color(Some(parent)) == Color::Black {
                return;
            }

            // A red node is never the root, so a red parent has a parent.
            let grandparent = self
                .nodes
                .get(parent)
                .parent()
                .expect("`RawRBTree::insert_rebalance()` - red parent is the root!");
            let parent_side = self.side_of(parent, grandparent);
            let uncle = self.nodes.get(grandparent).child(parent_side.opposite());

            if let Some(uncle) = uncle.filter(|&uncle| self.color(Some(uncle)) == Color::Red) {
                self.paint(parent, Color::Black);
                self.paint(uncle, Color::Black);
                self.paint(grandparent, Color::Red);
                node = grandparent;
                continue;
            }

            let mut parent = parent;
            if self.side_of(node, parent) != parent_side {
                // Triangle: straighten it into a line first.
                self.rotate(parent, parent_side);
                parent = node;
            }

            self.paint(grandparent, Color::Red);
            self.paint(parent, Color::Black);
            self.rotate(grandparent, parent_side.opposite());
            return;
        }
    }

    /// Resolves the black-height deficit left at `node` by removing a black
    /// node at its position.
    ///
    /// `node` is either the removed node's promoted child or, for a childless
    /// node, the node itself while it is still linked in.
    pub(super) fn erase_rebalance(&mut self, mut node: Handle) {
        loop {
            let parent = match self.nodes.get(node).parent() {
                Some(parent) if self.color(Some(node)) == Color::Black => parent,
                _ => {
                    self.paint(node, Color::Black);
                    return;
                }
            };

            let side = self.side_of(node, parent);
            let far = side.opposite();
            let mut sibling = self.sibling(parent, far);

            if self.color(Some(sibling)) == Color::Red {
                self.paint(sibling, Color::Black);
                self.paint(parent, Color::Red);
                self.rotate(parent, side);
                sibling = self.sibling(parent, far);
            }

            let near_nephew = self.nodes.get(sibling).child(side);
            let far_nephew = self.nodes.get(sibling).child(far);

            if self.color(near_nephew) == Color::Black && self.color(far_nephew) == Color::Black {
                self.paint(sibling, Color::Red);
                if self.color(Some(parent)) == Color::Black {
                    node = parent;
                    continue;
                }
                self.paint(parent, Color::Black);
                return;
            }

            if self.color(far_nephew) == Color::Black {
                // Only the near nephew is red: turn it into the far one.
                if let Some(near_nephew) = near_nephew {
                    self.paint(near_nephew, Color::Black);
                }
                self.paint(sibling, Color::Red);
                self.rotate(sibling, far);
                sibling = self.sibling(parent, far);
            }

            let parent_color = self.color(Some(parent));
            self.paint(sibling, parent_color);
            self.paint(parent, Color::Black);
            if let Some(far_nephew) = self.nodes.get(sibling).child(far) {
                self.paint(far_nephew, Color::Black);
            }
            self.rotate(parent, side);
            return;
        }
    }

    // A black non-root node always has a sibling: the other side needs the
    // same black-height, which is at least one.
    fn sibling(&self, parent: Handle, side: Side) -> Handle {
        self.nodes
            .get(parent)
            .child(side)
            .expect("`RawRBTree::erase_rebalance()` - black node has no sibling!")
    }
}
