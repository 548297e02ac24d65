//! Payload trait
//!
//! Capability set every record type stored in a tree file must provide.

use std::cmp::Ordering;

use crate::error::Result;

/// A fixed-length record stored in one data file slot
///
/// The engine is generic over this trait. Height and virtual index are
/// engine metadata persisted inside the record; implementors only store
/// and return them.
pub trait Payload: Sized {
    /// Ordering key
    type Key: Ord + ?Sized;

    /// Byte length of one encoded record (one slot)
    const LENGTH: usize;

    /// The empty sentinel written into wiped slots
    fn empty() -> Self;

    /// True for the empty sentinel
    fn is_empty(&self) -> bool;

    /// Borrow the ordering key
    fn key(&self) -> &Self::Key;

    /// Compare this record against a key
    ///
    /// `Greater` means this record sorts after `key`.
    fn compare(&self, key: &Self::Key) -> Ordering {
        self.key().cmp(key)
    }

    /// Decode a record from a slot buffer of exactly `LENGTH` bytes
    fn decode(buf: &[u8]) -> Result<Self>;

    /// Encode this record into a slot buffer of exactly `LENGTH` bytes
    fn encode(&self, buf: &mut [u8]) -> Result<()>;

    /// AVL height of the subtree rooted at this record (leaf = 0)
    fn height(&self) -> i32;

    fn set_height(&mut self, height: i32);

    /// Logical position of this record in the implicit binary tree
    fn virtual_index(&self) -> u64;

    fn set_virtual_index(&mut self, index: u64);

    /// Domain flag consulted by `available`; records are unused unless
    /// the type says otherwise
    fn is_used(&self) -> bool {
        false
    }
}
