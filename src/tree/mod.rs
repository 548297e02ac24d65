//! Tree Module
//!
//! AVL tree laid out as an implicit complete binary tree over the storage
//! layer.
//!
//! ## Addressing
//! ```text
//!                 v=0
//!             ┌────┴────┐
//!            v=1       v=2
//!          ┌──┴──┐   ┌──┴──┐
//!         3     4   5     6        left(v) = 2v + 1
//!                                  right(v) = 2v + 2
//! ```
//! Parent/child relations are pure arithmetic; nothing on disk stores a
//! pointer. Each occupied virtual index resolves through the index map to a
//! physical slot in the data file.
//!
//! ## Rebalancing
//! A rotation moves every node of the rotated subtree to a new virtual
//! index. The subtree is detached into an in-memory arena (wiping its slots),
//! restructured, and written back from the pivot's virtual index. Rotation
//! cost is therefore proportional to the subtree size.

mod arena;
mod balance;
mod check;
mod file;
mod store;

pub use check::TreeStats;
pub use file::{FileStats, TreeFile};

/// Virtual index of the root
pub const ROOT: u64 = 0;

/// Virtual index of the left child of `v`
#[inline]
pub fn left_child(v: u64) -> u64 {
    2 * v + 1
}

/// Virtual index of the right child of `v`
#[inline]
pub fn right_child(v: u64) -> u64 {
    2 * v + 2
}
