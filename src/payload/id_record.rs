//! IdRecord
//!
//! A pre-allocated numeric identifier with a consumption flag. A tree file
//! of these acts as a sorted identifier pool: `available` reports whether
//! an id exists and has not been handed out yet.

use serde::{Deserialize, Serialize};

use super::codec::{clear_slot, decode_slot, encode_slot, CRC_SIZE};
use super::Payload;
use crate::error::Result;

/// Bincode body: present (1) + id (8) + used (1) + height (4) + virtual_index (8)
const BODY_SIZE: usize = 22;

/// Identifier record keyed by `id`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdRecord {
    present: bool,
    id: u64,
    used: bool,
    height: i32,
    virtual_index: u64,
}

impl IdRecord {
    /// Create an unused record for `id`
    pub fn new(id: u64) -> Self {
        Self {
            present: true,
            id,
            used: false,
            height: 0,
            virtual_index: 0,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn used(&self) -> bool {
        self.used
    }

    /// Mark the identifier as handed out (or return it to the pool)
    pub fn set_used(&mut self, used: bool) {
        self.used = used;
    }
}

impl Payload for IdRecord {
    type Key = u64;

    const LENGTH: usize = BODY_SIZE + CRC_SIZE;

    fn empty() -> Self {
        Self {
            present: false,
            id: 0,
            used: false,
            height: 0,
            virtual_index: 0,
        }
    }

    fn is_empty(&self) -> bool {
        !self.present
    }

    fn key(&self) -> &u64 {
        &self.id
    }

    fn decode(buf: &[u8]) -> Result<Self> {
        Ok(decode_slot(buf)?.unwrap_or_else(Self::empty))
    }

    fn encode(&self, buf: &mut [u8]) -> Result<()> {
        if self.present {
            encode_slot(self, buf)
        } else {
            clear_slot(buf);
            Ok(())
        }
    }

    fn height(&self) -> i32 {
        self.height
    }

    fn set_height(&mut self, height: i32) {
        self.height = height;
    }

    fn virtual_index(&self) -> u64 {
        self.virtual_index
    }

    fn set_virtual_index(&mut self, index: u64) {
        self.virtual_index = index;
    }

    fn is_used(&self) -> bool {
        self.used
    }
}
