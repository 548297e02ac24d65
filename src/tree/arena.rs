//! Transient in-memory subtree used by rotations
//!
//! Nodes live in a `Vec` and refer to each other by integer handle, so a
//! detached subtree can be restructured freely before being written back
//! under new virtual indices.

use crate::error::Result;
use crate::payload::Payload;

use super::store::TreeStore;
use super::{left_child, right_child};

/// Handle of a node inside a [`Subtree`]
pub(crate) type NodeId = usize;

struct Node<P> {
    payload: P,
    left: Option<NodeId>,
    right: Option<NodeId>,
}

/// AVL rotation applied at the pivot of a subtree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Rotation {
    /// Promote the left child (left-left case)
    Right,
    /// Promote the right child (right-right case)
    Left,
    /// Rotate the left child left, then the pivot right (left-right case)
    LeftRight,
    /// Rotate the right child right, then the pivot left (right-left case)
    RightLeft,
}

/// A subtree detached from disk
pub(crate) struct Subtree<P> {
    nodes: Vec<Node<P>>,
    root: Option<NodeId>,
}

impl<P: Payload> Subtree<P> {
    /// Load every occupied descendant of `v` (inclusive), wiping each slot
    /// as it is read
    pub(crate) fn detach(store: &mut TreeStore<P>, v: u64) -> Result<Self> {
        let mut subtree = Self {
            nodes: Vec::new(),
            root: None,
        };
        subtree.root = subtree.detach_node(store, v)?;
        Ok(subtree)
    }

    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Restructure around the root; a rotation whose promoted child is
    /// missing leaves that step unchanged
    pub(crate) fn rotate(&mut self, rotation: Rotation) {
        let root = match self.root {
            Some(root) => root,
            None => return,
        };

        let new_root = match rotation {
            Rotation::Right => self.promote_left(root),
            Rotation::Left => self.promote_right(root),
            Rotation::LeftRight => {
                if let Some(left) = self.nodes[root].left {
                    self.nodes[root].left = Some(self.promote_right(left));
                }
                self.promote_left(root)
            }
            Rotation::RightLeft => {
                if let Some(right) = self.nodes[root].right {
                    self.nodes[root].right = Some(self.promote_left(right));
                }
                self.promote_right(root)
            }
        };

        self.root = Some(new_root);
    }

    /// Recompute every height bottom-up
    pub(crate) fn update_heights(&mut self) {
        if let Some(root) = self.root {
            self.fix_height(root);
        }
    }

    /// Write the subtree back pre-order, rooted at virtual index `v`
    pub(crate) fn attach(mut self, store: &mut TreeStore<P>, v: u64) -> Result<()> {
        if let Some(root) = self.root {
            self.attach_node(store, root, v)?;
        }
        Ok(())
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    fn detach_node(&mut self, store: &mut TreeStore<P>, v: u64) -> Result<Option<NodeId>> {
        let payload = match store.load(v)? {
            Some(payload) => payload,
            None => return Ok(None),
        };
        store.wipe(v)?;

        let id = self.push(payload);
        let left = self.detach_node(store, left_child(v))?;
        let right = self.detach_node(store, right_child(v))?;
        self.nodes[id].left = left;
        self.nodes[id].right = right;

        Ok(Some(id))
    }

    fn attach_node(&mut self, store: &mut TreeStore<P>, id: NodeId, v: u64) -> Result<()> {
        let left = self.nodes[id].left;
        let right = self.nodes[id].right;

        store.write(&mut self.nodes[id].payload, v)?;

        if let Some(left) = left {
            self.attach_node(store, left, left_child(v))?;
        }
        if let Some(right) = right {
            self.attach_node(store, right, right_child(v))?;
        }
        Ok(())
    }

    fn push(&mut self, payload: P) -> NodeId {
        self.nodes.push(Node {
            payload,
            left: None,
            right: None,
        });
        self.nodes.len() - 1
    }

    /// k2 with left child k1 → k1 with right child k2
    fn promote_left(&mut self, k2: NodeId) -> NodeId {
        match self.nodes[k2].left {
            Some(k1) => {
                self.nodes[k2].left = self.nodes[k1].right;
                self.nodes[k1].right = Some(k2);
                k1
            }
            None => k2,
        }
    }

    /// k2 with right child k1 → k1 with left child k2
    fn promote_right(&mut self, k2: NodeId) -> NodeId {
        match self.nodes[k2].right {
            Some(k1) => {
                self.nodes[k2].right = self.nodes[k1].left;
                self.nodes[k1].left = Some(k2);
                k1
            }
            None => k2,
        }
    }

    fn fix_height(&mut self, id: NodeId) -> i32 {
        let left = self.nodes[id].left;
        let right = self.nodes[id].right;

        let left_height = match left {
            Some(child) => self.fix_height(child),
            None => -1,
        };
        let right_height = match right {
            Some(child) => self.fix_height(child),
            None => -1,
        };

        let height = left_height.max(right_height) + 1;
        self.nodes[id].payload.set_height(height);
        height
    }
}
