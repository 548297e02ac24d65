//! Storage Module
//!
//! The two files behind a tree file, and the session free list.
//!
//! ## Responsibilities
//! - Map virtual indices to physical slots (index file)
//! - Read and write fixed-size payload slots (data file)
//! - Reuse slots freed during the session before growing the data file
//! - Drop trailing unmapped index entries on request
//!
//! ## File Format
//! ```text
//! {filename}.index                     {filename}
//! ┌──────────────────────┐             ┌──────────────────────┐
//! │ v=0: u32 LE          │ ──────────▶ │ slot 0 (LENGTH bytes)│
//! │ v=1: u32 LE          │     ┌─────▶ │ slot 1               │
//! │ v=2: u32 LE (0)      │     │       │ slot 2 (wiped)       │
//! │ ...                  │ ────┘       │ ...                  │
//! └──────────────────────┘             └──────────────────────┘
//!   0 = unmapped, n = physical slot n-1
//! ```

mod data_file;
mod free_list;
mod index_map;

pub use data_file::DataFile;
pub(crate) use free_list::FreeList;
pub use index_map::{IndexMap, ENTRY_SIZE};

use std::fs::OpenOptions;
use std::path::Path;

use crate::error::Result;

/// Create `path` as an empty file if it does not exist yet
///
/// Read-only handles still get both files so lookups on a fresh tree see
/// an empty tree rather than an error.
pub(crate) fn ensure_file(path: &Path) -> Result<()> {
    if !path.exists() {
        OpenOptions::new().create(true).append(true).open(path)?;
    }
    Ok(())
}
