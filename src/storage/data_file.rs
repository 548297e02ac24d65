//! Data File
//!
//! Fixed-size payload slots with session-scoped slot reuse.

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::payload::Payload;

use super::{ensure_file, FreeList};

/// The data file of a tree file, holding `P::LENGTH`-byte slots
pub struct DataFile<P: Payload> {
    path: PathBuf,
    file: File,
    /// Tracked file size in bytes
    size: u64,
    /// Slots wiped during this session, reused before appending
    free_list: FreeList,
    _payload: PhantomData<fn() -> P>,
}

impl<P: Payload> DataFile<P> {
    /// Open the data file, creating it empty if absent
    pub fn open(path: &Path, writable: bool) -> Result<Self> {
        ensure_file(path)?;

        let file = OpenOptions::new().read(true).write(writable).open(path)?;
        let size = file.metadata()?.len();

        tracing::trace!(path = %path.display(), size, "opened data file");

        Ok(Self {
            path: path.to_path_buf(),
            file,
            size,
            free_list: FreeList::new(),
            _payload: PhantomData,
        })
    }

    /// Pick the slot for the next write: oldest freed slot, else append
    pub fn allocate_slot(&mut self) -> u64 {
        self.free_list
            .pop()
            .unwrap_or(self.size / Self::record_len())
    }

    /// Read the payload in `physical`; wiped slots and slots past the end
    /// of the file read as `None`
    pub fn read_at(&self, physical: u64) -> Result<Option<P>> {
        let offset = physical * Self::record_len();
        if offset + Self::record_len() > self.size {
            return Ok(None);
        }

        let mut buf = vec![0u8; P::LENGTH];
        let mut file = &self.file;
        file.seek(SeekFrom::Start(offset))?;
        file.read_exact(&mut buf)?;

        let payload = P::decode(&buf)?;
        if payload.is_empty() {
            Ok(None)
        } else {
            Ok(Some(payload))
        }
    }

    /// Persist `payload` into `physical`, growing the file if needed
    pub fn write_at(&mut self, physical: u64, payload: &P) -> Result<()> {
        let mut buf = vec![0u8; P::LENGTH];
        payload.encode(&mut buf)?;

        let offset = physical * Self::record_len();
        self.file.seek(SeekFrom::Start(offset))?;
        self.file.write_all(&buf)?;
        self.size = self.size.max(offset + Self::record_len());

        tracing::trace!(physical, "wrote slot");
        Ok(())
    }

    /// Overwrite `physical` with the empty sentinel and release it
    pub fn wipe(&mut self, physical: u64) -> Result<()> {
        self.write_at(physical, &P::empty())?;
        self.free_list.push(physical);
        Ok(())
    }

    /// Slots the file currently spans, wiped ones included
    pub fn slot_count(&self) -> u64 {
        self.size / Self::record_len()
    }

    /// Slots waiting for reuse in this session
    pub fn free_slots(&self) -> usize {
        self.free_list.len()
    }

    /// Flush file contents to disk
    pub fn sync(&self) -> Result<()> {
        self.file.sync_all()?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn record_len() -> u64 {
        P::LENGTH as u64
    }
}
