//! Structural verification
//!
//! Walks the whole tree and confirms the on-disk invariants: every mapped
//! position holds a record, no slot is mapped twice, stored heights are
//! exact, the AVL balance holds, and keys are strictly ordered.

use std::cmp::Ordering;
use std::collections::HashSet;

use crate::error::Result;
use crate::payload::Payload;
use crate::AvlError;

use super::store::TreeStore;
use super::{left_child, right_child, ROOT};

/// Summary of a successful structural check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TreeStats {
    /// Occupied positions
    pub nodes: u64,
    /// Height of the root; −1 for an empty tree
    pub height: i32,
}

impl<P: Payload> TreeStore<P> {
    pub(crate) fn check(&self) -> Result<TreeStats> {
        let mut seen = HashSet::new();
        let mut stats = TreeStats::default();
        let height = self.check_node(ROOT, None, None, &mut seen, &mut stats)?;
        stats.height = height;
        Ok(stats)
    }

    fn check_node(
        &self,
        v: u64,
        lower: Option<&P::Key>,
        upper: Option<&P::Key>,
        seen: &mut HashSet<u64>,
        stats: &mut TreeStats,
    ) -> Result<i32> {
        let physical = match self.index.get_physical(v)? {
            Some(physical) => physical,
            None => return Ok(-1),
        };

        if !seen.insert(physical) {
            return Err(AvlError::Corruption(format!(
                "physical slot {} mapped more than once (again at virtual index {})",
                physical, v
            )));
        }

        let payload = self.data.read_at(physical)?.ok_or_else(|| {
            AvlError::Corruption(format!(
                "virtual index {} maps to empty slot {}",
                v, physical
            ))
        })?;

        if payload.virtual_index() != v {
            return Err(AvlError::Corruption(format!(
                "record at virtual index {} claims virtual index {}",
                v,
                payload.virtual_index()
            )));
        }

        let above_lower = lower.map_or(true, |key| payload.compare(key) == Ordering::Greater);
        let below_upper = upper.map_or(true, |key| payload.compare(key) == Ordering::Less);
        if !above_lower || !below_upper {
            return Err(AvlError::Corruption(format!(
                "key order violated at virtual index {}",
                v
            )));
        }

        let left = self.check_node(left_child(v), lower, Some(payload.key()), seen, stats)?;
        let right = self.check_node(right_child(v), Some(payload.key()), upper, seen, stats)?;

        if (left - right).abs() > 1 {
            return Err(AvlError::Corruption(format!(
                "unbalanced at virtual index {}: left height {}, right height {}",
                v, left, right
            )));
        }

        let height = left.max(right) + 1;
        if payload.height() != height {
            return Err(AvlError::Corruption(format!(
                "virtual index {} stores height {} but subtree height is {}",
                v,
                payload.height(),
                height
            )));
        }

        stats.nodes += 1;
        Ok(height)
    }
}
