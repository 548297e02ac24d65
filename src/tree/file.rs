//! TreeFile
//!
//! The public handle: open/close lifecycle and capability gating in front
//! of the slot-level tree.

use std::fs;

use crate::config::Config;
use crate::error::Result;
use crate::payload::Payload;
use crate::AvlError;

use super::check::TreeStats;
use super::store::TreeStore;
use super::ROOT;

/// Sizes of the underlying files and session counters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileStats {
    /// Entries in the index file, mapped or not
    pub index_entries: u64,
    /// Slots spanned by the data file, wiped ones included
    pub data_slots: u64,
    /// Slots freed this session and not yet reused
    pub free_slots: usize,
    /// Single rotations performed this session
    pub single_rotations: u64,
    /// Double rotations performed this session
    pub double_rotations: u64,
}

/// A persistent AVL tree of `P` records
///
/// ## Capabilities
/// - read (any open handle): `find`, `available`, `exist_and_available`,
///   `traverse`, `len`, `check`
/// - writable: `insert`, `remove`, `truncate`
/// - updatable: `update`
///
/// An operation attempted without its capability, or on a closed handle, is
/// a no-op returning `false`/`None`; only I/O and data corruption surface as
/// errors.
///
/// ## Concurrency
/// None. One handle owns both files; sharing them between handles or
/// processes can leave the index map and data file disagreeing.
pub struct TreeFile<P: Payload> {
    config: Config,
    /// `None` while closed
    store: Option<TreeStore<P>>,
}

impl<P: Payload> TreeFile<P> {
    /// Open (creating if needed) the tree file described by `config`
    pub fn open(config: Config) -> Result<Self> {
        let mut tree = Self {
            config,
            store: None,
        };
        tree.reopen()?;
        Ok(tree)
    }

    /// Reopen a closed handle with the config it was opened with; no-op when open
    pub fn reopen(&mut self) -> Result<()> {
        if self.store.is_some() {
            return Ok(());
        }

        let (data_path, index_path) = match (self.config.data_path(), self.config.index_path()) {
            (Some(data), Some(index)) => (data, index),
            _ => {
                return Err(AvlError::Config(
                    "filename must be set to open a tree file".to_string(),
                ))
            }
        };

        fs::create_dir_all(&self.config.directory)?;
        let store = TreeStore::open(&data_path, &index_path, self.config.needs_write_access())?;

        tracing::debug!(
            path = %data_path.display(),
            writable = self.config.writable,
            updatable = self.config.updatable,
            "opened tree file"
        );

        self.store = Some(store);
        Ok(())
    }

    /// Release both files and the session free list
    pub fn close(&mut self) -> Result<()> {
        if let Some(store) = self.store.take() {
            if self.config.sync_on_close && self.config.needs_write_access() {
                store.sync()?;
            }
            tracing::debug!(path = %store.data.path().display(), "closed tree file");
        }
        Ok(())
    }

    pub fn is_open(&self) -> bool {
        self.store.is_some()
    }

    pub fn can_read(&self) -> bool {
        self.is_open()
    }

    pub fn can_write(&self) -> bool {
        self.is_open() && self.config.writable
    }

    pub fn can_update(&self) -> bool {
        self.is_open() && self.config.updatable
    }

    /// Insert a record
    ///
    /// Returns `Ok(false)` if a record with the same key exists, the
    /// payload is the empty sentinel, or the handle is not writable.
    pub fn insert(&mut self, mut payload: P) -> Result<bool> {
        if payload.is_empty() {
            tracing::warn!("insert ignored: payload is the empty sentinel");
            return Ok(false);
        }
        match self.writable_store("insert") {
            Some(store) => store.insert_at(&mut payload, ROOT),
            None => Ok(false),
        }
    }

    /// Overwrite a previously found record in place
    ///
    /// `payload` must carry the virtual index it was read with. If that
    /// position no longer holds the same key (the tree was restructured
    /// since), nothing is written. The stored height is preserved. The
    /// empty sentinel is never written.
    pub fn update(&mut self, payload: P) -> Result<()> {
        if payload.is_empty() {
            tracing::warn!("update ignored: payload is the empty sentinel");
            return Ok(());
        }
        if !self.can_update() {
            tracing::warn!("update ignored: tree file is not open for update");
            return Ok(());
        }
        if let Some(store) = self.store.as_mut() {
            if !store.update(payload)? {
                tracing::debug!("update skipped: stale virtual index");
            }
        }
        Ok(())
    }

    /// Remove the record with `key`; false if absent or not writable
    pub fn remove(&mut self, key: &P::Key) -> Result<bool> {
        match self.writable_store("remove") {
            Some(store) => store.remove_at(key, ROOT),
            None => Ok(false),
        }
    }

    /// Look up the record with `key`
    pub fn find(&self, key: &P::Key) -> Result<Option<P>> {
        match self.store.as_ref() {
            Some(store) => store.find(key),
            None => Ok(None),
        }
    }

    /// True if `key` exists and its record is not marked used
    pub fn available(&self, key: &P::Key) -> Result<bool> {
        Ok(self.exist_and_available(key)?.1)
    }

    /// (exists, exists and not marked used)
    pub fn exist_and_available(&self, key: &P::Key) -> Result<(bool, bool)> {
        Ok(match self.find(key)? {
            Some(payload) => (true, !payload.is_used()),
            None => (false, false),
        })
    }

    /// In-order walk over the whole tree
    ///
    /// `visit` returns true to stop the walk. Returns whether the walk was
    /// aborted; a closed handle reports an abort.
    pub fn traverse<F>(&self, visit: F) -> Result<bool>
    where
        F: FnMut(&P) -> bool,
    {
        self.traverse_from(ROOT, visit)
    }

    /// In-order walk over the subtree rooted at virtual index `start`
    pub fn traverse_from<F>(&self, start: u64, mut visit: F) -> Result<bool>
    where
        F: FnMut(&P) -> bool,
    {
        match self.store.as_ref() {
            Some(store) => store.traverse(start, &mut visit),
            None => Ok(true),
        }
    }

    /// Drop trailing unmapped entries from the index file
    pub fn truncate(&mut self) -> Result<()> {
        if let Some(store) = self.writable_store("truncate") {
            store.truncate()?;
        }
        Ok(())
    }

    /// Number of records; 0 when closed
    pub fn len(&self) -> Result<u64> {
        let mut count = 0;
        self.traverse(|_| {
            count += 1;
            false
        })?;
        Ok(count)
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.load_at(ROOT)?.is_none())
    }

    /// Verify the structural invariants of the whole tree
    pub fn check(&self) -> Result<TreeStats> {
        match self.store.as_ref() {
            Some(store) => store.check(),
            None => Ok(TreeStats {
                nodes: 0,
                height: -1,
            }),
        }
    }

    /// Sizes of the underlying files; `None` when closed
    pub fn stats(&self) -> Option<FileStats> {
        self.store.as_ref().map(|store| FileStats {
            index_entries: store.index.len(),
            data_slots: store.data.slot_count(),
            free_slots: store.data.free_slots(),
            single_rotations: store.single_rotations,
            double_rotations: store.double_rotations,
        })
    }

    /// Height stored at virtual index `v`; −1 when unoccupied or closed
    pub fn height_at(&self, v: u64) -> Result<i32> {
        match self.store.as_ref() {
            Some(store) => store.height(v),
            None => Ok(-1),
        }
    }

    /// Record stored at virtual index `v`
    pub fn load_at(&self, v: u64) -> Result<Option<P>> {
        match self.store.as_ref() {
            Some(store) => store.load(v),
            None => Ok(None),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    fn writable_store(&mut self, operation: &str) -> Option<&mut TreeStore<P>> {
        if !self.config.writable {
            tracing::warn!(operation, "ignored: tree file is not writable");
            return None;
        }
        if self.store.is_none() {
            tracing::warn!(operation, "ignored: tree file is closed");
        }
        self.store.as_mut()
    }
}
