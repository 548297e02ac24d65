//! Tests for the Index Map
//!
//! These tests verify:
//! - File creation on open
//! - Mapping encoding (physical + 1, little-endian u32)
//! - Unmapped and out-of-range lookups
//! - Trailing truncation

use std::fs;
use std::path::PathBuf;

use avlfile::storage::{IndexMap, ENTRY_SIZE};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_temp_index() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("test.avl.index");
    (temp_dir, path)
}

fn file_len(path: &PathBuf) -> u64 {
    fs::metadata(path).unwrap().len()
}

// =============================================================================
// Open Tests
// =============================================================================

#[test]
fn test_open_creates_empty_file() {
    let (_temp, path) = setup_temp_index();

    let index = IndexMap::open(&path, true).unwrap();

    assert!(path.exists());
    assert!(index.is_empty());
    assert_eq!(file_len(&path), 0);
}

#[test]
fn test_read_only_open_creates_file() {
    let (_temp, path) = setup_temp_index();

    let index = IndexMap::open(&path, false).unwrap();

    assert!(path.exists());
    assert_eq!(index.get_physical(0).unwrap(), None);
}

#[test]
fn test_reopen_preserves_mappings() {
    let (_temp, path) = setup_temp_index();

    {
        let mut index = IndexMap::open(&path, true).unwrap();
        index.set_mapping(0, 5).unwrap();
        index.set_mapping(2, 0).unwrap();
    }

    let index = IndexMap::open(&path, false).unwrap();
    assert_eq!(index.len(), 3);
    assert_eq!(index.get_physical(0).unwrap(), Some(5));
    assert_eq!(index.get_physical(1).unwrap(), None);
    assert_eq!(index.get_physical(2).unwrap(), Some(0));
}

// =============================================================================
// Mapping Tests
// =============================================================================

#[test]
fn test_mapping_is_stored_plus_one_little_endian() {
    let (_temp, path) = setup_temp_index();

    let mut index = IndexMap::open(&path, true).unwrap();
    index.set_mapping(1, 0x0102).unwrap();
    drop(index);

    let bytes = fs::read(&path).unwrap();
    assert_eq!(bytes.len() as u64, 2 * ENTRY_SIZE);
    assert_eq!(&bytes[0..4], &[0, 0, 0, 0]);
    assert_eq!(&bytes[4..8], &[0x03, 0x01, 0, 0]);
}

#[test]
fn test_physical_zero_is_distinct_from_unmapped() {
    let (_temp, path) = setup_temp_index();

    let mut index = IndexMap::open(&path, true).unwrap();
    index.set_mapping(0, 0).unwrap();

    assert_eq!(index.get_physical(0).unwrap(), Some(0));
}

#[test]
fn test_out_of_range_is_unmapped() {
    let (_temp, path) = setup_temp_index();

    let mut index = IndexMap::open(&path, true).unwrap();
    index.set_mapping(3, 1).unwrap();

    assert_eq!(index.get_physical(4).unwrap(), None);
    assert_eq!(index.get_physical(1_000_000).unwrap(), None);
}

#[test]
fn test_clear_mapping() {
    let (_temp, path) = setup_temp_index();

    let mut index = IndexMap::open(&path, true).unwrap();
    index.set_mapping(2, 9).unwrap();
    index.clear_mapping(2).unwrap();

    assert_eq!(index.get_physical(2).unwrap(), None);
    assert_eq!(index.len(), 3);
}

// =============================================================================
// Truncate Tests
// =============================================================================

#[test]
fn test_truncate_drops_trailing_unmapped_entries() {
    let (_temp, path) = setup_temp_index();

    let mut index = IndexMap::open(&path, true).unwrap();
    index.set_mapping(0, 0).unwrap();
    index.set_mapping(2, 1).unwrap();
    index.set_mapping(9, 2).unwrap();
    index.clear_mapping(9).unwrap();

    assert_eq!(index.truncate().unwrap(), 3);
    assert_eq!(index.len(), 3);
    assert_eq!(file_len(&path), 3 * ENTRY_SIZE);
    assert_eq!(index.get_physical(0).unwrap(), Some(0));
    assert_eq!(index.get_physical(2).unwrap(), Some(1));
}

#[test]
fn test_truncate_keeps_interior_gaps() {
    let (_temp, path) = setup_temp_index();

    let mut index = IndexMap::open(&path, true).unwrap();
    index.set_mapping(6, 0).unwrap();

    assert_eq!(index.truncate().unwrap(), 7);
    assert_eq!(file_len(&path), 7 * ENTRY_SIZE);
}

#[test]
fn test_truncate_scans_across_chunks() {
    let (_temp, path) = setup_temp_index();

    let mut index = IndexMap::open(&path, true).unwrap();
    index.set_mapping(10, 4).unwrap();
    index.set_mapping(5_000, 7).unwrap();
    index.clear_mapping(5_000).unwrap();

    assert_eq!(index.truncate().unwrap(), 11);
    assert_eq!(index.get_physical(10).unwrap(), Some(4));
}

#[test]
fn test_truncate_leaves_fully_unmapped_file() {
    let (_temp, path) = setup_temp_index();

    let mut index = IndexMap::open(&path, true).unwrap();
    index.set_mapping(4, 0).unwrap();
    index.clear_mapping(4).unwrap();

    assert_eq!(index.truncate().unwrap(), 5);
    assert_eq!(file_len(&path), 5 * ENTRY_SIZE);
}

#[test]
fn test_truncate_empty_file() {
    let (_temp, path) = setup_temp_index();

    let mut index = IndexMap::open(&path, true).unwrap();

    assert_eq!(index.truncate().unwrap(), 0);
}
