//! Insert, remove and AVL rebalancing over virtual indices.

use std::cmp::Ordering;

use crate::error::Result;
use crate::payload::Payload;

use super::arena::{Rotation, Subtree};
use super::store::TreeStore;
use super::{left_child, right_child};

impl<P: Payload> TreeStore<P> {
    /// Insert below `v`; false if the key is already present
    pub(crate) fn insert_at(&mut self, payload: &mut P, v: u64) -> Result<bool> {
        let node = match self.load(v)? {
            Some(node) => node,
            None => {
                payload.set_height(0);
                self.write(payload, v)?;
                return Ok(true);
            }
        };

        let (left, right) = (left_child(v), right_child(v));
        let added = match node.compare(payload.key()) {
            Ordering::Equal => return Ok(false),
            Ordering::Greater => {
                let added = self.insert_at(payload, left)?;
                if added && self.balance(v)? == 2 {
                    // left-left if the new key went left of the left child
                    let rotation = match self.load(left)? {
                        Some(child) if child.compare(payload.key()) == Ordering::Greater => {
                            Rotation::Right
                        }
                        _ => Rotation::LeftRight,
                    };
                    self.rotate(v, rotation)?;
                }
                added
            }
            Ordering::Less => {
                let added = self.insert_at(payload, right)?;
                if added && self.balance(v)? == -2 {
                    let rotation = match self.load(right)? {
                        Some(child) if child.compare(payload.key()) == Ordering::Less => {
                            Rotation::Left
                        }
                        _ => Rotation::RightLeft,
                    };
                    self.rotate(v, rotation)?;
                }
                added
            }
        };

        if added {
            self.update_height(v)?;
        }
        Ok(added)
    }

    /// Remove `key` from below `v`; false if it is not present
    pub(crate) fn remove_at(&mut self, key: &P::Key, v: u64) -> Result<bool> {
        let node = match self.load(v)? {
            Some(node) => node,
            None => return Ok(false),
        };

        let removed = match node.compare(key) {
            Ordering::Greater => self.remove_at(key, left_child(v))?,
            Ordering::Less => self.remove_at(key, right_child(v))?,
            Ordering::Equal => {
                self.unlink(node, v)?;
                true
            }
        };

        if removed {
            self.rebalance(v)?;
            self.update_height(v)?;
        }
        Ok(removed)
    }

    /// Apply the rotation that restores balance at `v`, if one is needed
    pub(crate) fn rebalance(&mut self, v: u64) -> Result<()> {
        let (left, right) = (left_child(v), right_child(v));
        let rotation = match self.balance(v)? {
            2 if self.balance(left)? >= 0 => Rotation::Right,
            2 => Rotation::LeftRight,
            -2 if self.balance(right)? <= 0 => Rotation::Left,
            -2 => Rotation::RightLeft,
            _ => return Ok(()),
        };
        self.rotate(v, rotation)
    }

    /// Detach the subtree at `pivot`, rotate it in memory and write it back
    pub(crate) fn rotate(&mut self, pivot: u64, rotation: Rotation) -> Result<()> {
        let mut subtree = Subtree::detach(self, pivot)?;
        tracing::debug!(pivot, ?rotation, nodes = subtree.len(), "rotating subtree");

        match rotation {
            Rotation::Right | Rotation::Left => self.single_rotations += 1,
            Rotation::LeftRight | Rotation::RightLeft => self.double_rotations += 1,
        }

        subtree.rotate(rotation);
        subtree.update_heights();
        subtree.attach(self, pivot)
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    /// Take the record at `v` out of the tree, keeping `v` occupied when it
    /// has children
    fn unlink(&mut self, node: P, v: u64) -> Result<()> {
        let (left, right) = (left_child(v), right_child(v));
        let has_left = self.index.get_physical(left)?.is_some();
        let has_right = self.index.get_physical(right)?.is_some();

        match (has_left, has_right) {
            (false, false) => self.wipe(v),
            (true, true) => {
                // in-order successor replaces the node, then leaves the right subtree
                let mut successor_index = right;
                while self.index.get_physical(left_child(successor_index))?.is_some() {
                    successor_index = left_child(successor_index);
                }
                let mut successor = match self.load(successor_index)? {
                    Some(successor) => successor,
                    None => return self.wipe(v),
                };

                successor.set_height(node.height());
                self.overwrite(&mut successor, v)?;
                self.remove_at(successor.key(), right)?;
                Ok(())
            }
            (true, false) | (false, true) => {
                let child = if has_left { left } else { right };
                let subtree = Subtree::detach(self, child)?;
                self.wipe(v)?;
                subtree.attach(self, v)
            }
        }
    }
}
