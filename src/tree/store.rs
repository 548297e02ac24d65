//! Slot-level tree access
//!
//! Resolves virtual indices through the index map and moves payloads in and
//! out of data file slots. Everything above this works in virtual indices
//! only.

use std::cmp::Ordering;
use std::path::Path;

use crate::error::Result;
use crate::payload::Payload;
use crate::storage::{DataFile, IndexMap};

use super::{left_child, right_child};

/// Index map and data file of one open tree file
pub(crate) struct TreeStore<P: Payload> {
    pub(super) index: IndexMap,
    pub(super) data: DataFile<P>,
    /// Rotations performed this session
    pub(super) single_rotations: u64,
    pub(super) double_rotations: u64,
}

impl<P: Payload> TreeStore<P> {
    pub(crate) fn open(data_path: &Path, index_path: &Path, writable: bool) -> Result<Self> {
        Ok(Self {
            index: IndexMap::open(index_path, writable)?,
            data: DataFile::open(data_path, writable)?,
            single_rotations: 0,
            double_rotations: 0,
        })
    }

    /// Payload at `v`, or `None` if the position is unoccupied
    pub(crate) fn load(&self, v: u64) -> Result<Option<P>> {
        match self.index.get_physical(v)? {
            Some(physical) => self.data.read_at(physical),
            None => Ok(None),
        }
    }

    /// Write `payload` to a freshly allocated slot and map `v` to it
    pub(crate) fn write(&mut self, payload: &mut P, v: u64) -> Result<()> {
        let physical = self.data.allocate_slot();
        payload.set_virtual_index(v);
        self.data.write_at(physical, payload)?;
        self.index.set_mapping(v, physical)
    }

    /// Rewrite the slot already mapped at `v`; false if `v` is unmapped
    pub(crate) fn overwrite(&mut self, payload: &mut P, v: u64) -> Result<bool> {
        match self.index.get_physical(v)? {
            Some(physical) => {
                payload.set_virtual_index(v);
                self.data.write_at(physical, payload)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Blank the slot at `v`, unmap `v` and release the slot for reuse
    pub(crate) fn wipe(&mut self, v: u64) -> Result<()> {
        if let Some(physical) = self.index.get_physical(v)? {
            self.data.wipe(physical)?;
            self.index.clear_mapping(v)?;
        }
        Ok(())
    }

    /// Stored height at `v`; −1 for an unoccupied position
    pub(crate) fn height(&self, v: u64) -> Result<i32> {
        Ok(self.load(v)?.map_or(-1, |payload| payload.height()))
    }

    /// height(left) − height(right)
    pub(crate) fn balance(&self, v: u64) -> Result<i32> {
        Ok(self.height(left_child(v))? - self.height(right_child(v))?)
    }

    /// Recompute the height at `v` from its children and persist it
    pub(crate) fn update_height(&mut self, v: u64) -> Result<()> {
        if let Some(mut payload) = self.load(v)? {
            let height = self.height(left_child(v))?.max(self.height(right_child(v))?) + 1;
            if payload.height() != height {
                payload.set_height(height);
                self.overwrite(&mut payload, v)?;
            }
        }
        Ok(())
    }

    pub(crate) fn find(&self, key: &P::Key) -> Result<Option<P>> {
        let mut v = super::ROOT;
        while let Some(payload) = self.load(v)? {
            v = match payload.compare(key) {
                Ordering::Greater => left_child(v),
                Ordering::Less => right_child(v),
                Ordering::Equal => return Ok(Some(payload)),
            };
        }
        Ok(None)
    }

    /// Overwrite the stored record at `payload.virtual_index()` if it still
    /// carries the same key; the stored height is kept
    pub(crate) fn update(&mut self, mut payload: P) -> Result<bool> {
        let v = payload.virtual_index();
        let stored = match self.load(v)? {
            Some(stored) if stored.compare(payload.key()) == Ordering::Equal => stored,
            _ => return Ok(false),
        };

        payload.set_height(stored.height());
        self.overwrite(&mut payload, v)
    }

    /// In-order walk from `v`; returns true once `visit` asks to abort
    pub(crate) fn traverse<F>(&self, v: u64, visit: &mut F) -> Result<bool>
    where
        F: FnMut(&P) -> bool,
    {
        let payload = match self.load(v)? {
            Some(payload) => payload,
            None => return Ok(false),
        };

        if self.traverse(left_child(v), visit)? {
            return Ok(true);
        }
        if visit(&payload) {
            return Ok(true);
        }
        self.traverse(right_child(v), visit)
    }

    pub(crate) fn truncate(&mut self) -> Result<u64> {
        self.index.truncate()
    }

    pub(crate) fn sync(&self) -> Result<()> {
        self.index.sync()?;
        self.data.sync()
    }
}
