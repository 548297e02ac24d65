//! Index Map
//!
//! Virtual index → physical slot mapping, one little-endian u32 per virtual
//! position starting at virtual index 0.

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::AvlError;

use super::ensure_file;

/// Bytes per mapping entry
pub const ENTRY_SIZE: u64 = 4;

/// Entries examined per read during the backward truncate scan
const TRUNCATE_CHUNK_ENTRIES: u64 = 1024;

/// The index file of a tree file
pub struct IndexMap {
    path: PathBuf,
    file: File,
    /// Number of whole entries currently in the file
    entries: u64,
}

impl IndexMap {
    /// Open the index file, creating it empty if absent
    pub fn open(path: &Path, writable: bool) -> Result<Self> {
        ensure_file(path)?;

        let file = OpenOptions::new().read(true).write(writable).open(path)?;
        let entries = file.metadata()?.len() / ENTRY_SIZE;

        tracing::trace!(path = %path.display(), entries, "opened index map");

        Ok(Self {
            path: path.to_path_buf(),
            file,
            entries,
        })
    }

    /// Physical slot mapped at `virtual_index`, or `None` when the position
    /// is past the end of the file or unmapped
    pub fn get_physical(&self, virtual_index: u64) -> Result<Option<u64>> {
        if virtual_index >= self.entries {
            return Ok(None);
        }

        let mut buf = [0u8; ENTRY_SIZE as usize];
        let mut file = &self.file;
        file.seek(SeekFrom::Start(virtual_index * ENTRY_SIZE))?;
        file.read_exact(&mut buf)?;

        match u32::from_le_bytes(buf) {
            0 => Ok(None),
            stored => Ok(Some(stored as u64 - 1)),
        }
    }

    /// Map `virtual_index` to `physical` (stored as `physical + 1`)
    pub fn set_mapping(&mut self, virtual_index: u64, physical: u64) -> Result<()> {
        let stored = physical
            .checked_add(1)
            .and_then(|v| u32::try_from(v).ok())
            .ok_or_else(|| {
                AvlError::Corruption(format!(
                    "physical slot {} does not fit a 4-byte index entry",
                    physical
                ))
            })?;
        self.write_entry(virtual_index, stored)
    }

    /// Mark `virtual_index` as unoccupied
    pub fn clear_mapping(&mut self, virtual_index: u64) -> Result<()> {
        self.write_entry(virtual_index, 0)
    }

    /// Drop the trailing run of unmapped entries
    ///
    /// Scans backward from the end; the last non-zero entry defines the new
    /// length. A file with no mapped entry at all is left untouched.
    /// Returns the entry count after truncation.
    pub fn truncate(&mut self) -> Result<u64> {
        if self.is_empty() {
            return Ok(0);
        }

        let chunk_bytes = (TRUNCATE_CHUNK_ENTRIES * ENTRY_SIZE) as usize;
        let mut buf = vec![0u8; chunk_bytes];
        let mut end = self.entries;

        while end > 0 {
            let start = end.saturating_sub(TRUNCATE_CHUNK_ENTRIES);
            let chunk = &mut buf[..((end - start) * ENTRY_SIZE) as usize];

            self.file.seek(SeekFrom::Start(start * ENTRY_SIZE))?;
            self.file.read_exact(chunk)?;

            let last_mapped = chunk
                .chunks_exact(ENTRY_SIZE as usize)
                .rposition(|entry| entry.iter().any(|&b| b != 0));

            if let Some(pos) = last_mapped {
                let new_entries = start + pos as u64 + 1;
                if new_entries < self.entries {
                    self.file.set_len(new_entries * ENTRY_SIZE)?;
                    tracing::debug!(
                        path = %self.path.display(),
                        from = self.entries,
                        to = new_entries,
                        "truncated index map"
                    );
                    self.entries = new_entries;
                }
                return Ok(self.entries);
            }

            end = start;
        }

        Ok(self.entries)
    }

    /// Number of entries (mapped or not) in the file
    pub fn len(&self) -> u64 {
        self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries == 0
    }

    /// Flush file contents to disk
    pub fn sync(&self) -> Result<()> {
        self.file.sync_all()?;
        Ok(())
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    fn write_entry(&mut self, virtual_index: u64, stored: u32) -> Result<()> {
        self.file.seek(SeekFrom::Start(virtual_index * ENTRY_SIZE))?;
        self.file.write_all(&stored.to_le_bytes())?;
        self.entries = self.entries.max(virtual_index + 1);
        Ok(())
    }
}
