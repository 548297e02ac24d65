//! Free-slot list
//!
//! Physical slots released by wipes during the current session.

use std::collections::VecDeque;

/// FIFO of reclaimed physical slot numbers
///
/// Lives only as long as the open handle; nothing here is persisted.
#[derive(Debug, Default)]
pub(crate) struct FreeList {
    slots: VecDeque<u64>,
}

impl FreeList {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Release a slot for reuse
    pub(crate) fn push(&mut self, physical: u64) {
        self.slots.push_back(physical);
    }

    /// Take the oldest released slot
    pub(crate) fn pop(&mut self) -> Option<u64> {
        self.slots.pop_front()
    }

    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }

}
