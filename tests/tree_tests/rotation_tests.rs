//! Tests for AVL rotations on disk
//!
//! These tests verify:
//! - Single and double rotations produce the expected shape
//! - Virtual indices and heights are rewritten for moved nodes
//! - Rotations reuse the slots they free
//! - Truncate after a rotation shrinks the index map

use avlfile::{Config, IdRecord, Payload, TreeFile};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_temp_tree() -> (TempDir, TreeFile<IdRecord>) {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::builder()
        .directory(temp_dir.path())
        .filename("rotations.avl")
        .writable(true)
        .build();
    let tree = TreeFile::open(config).unwrap();
    (temp_dir, tree)
}

fn tree_with(ids: &[u64]) -> (TempDir, TreeFile<IdRecord>) {
    let (temp, mut tree) = setup_temp_tree();
    for &id in ids {
        assert!(tree.insert(IdRecord::new(id)).unwrap());
    }
    (temp, tree)
}

/// Ids stored at virtual indices `0..count`, `None` for empty positions
fn level_order(tree: &TreeFile<IdRecord>, count: u64) -> Vec<Option<u64>> {
    (0..count)
        .map(|v| tree.load_at(v).unwrap().map(|record| record.id()))
        .collect()
}

fn assert_rotations(tree: &TreeFile<IdRecord>, single: u64, double: u64) {
    let stats = tree.stats().unwrap();
    assert_eq!(stats.single_rotations, single, "single rotations");
    assert_eq!(stats.double_rotations, double, "double rotations");
}

fn assert_shape_2_1_3(tree: &TreeFile<IdRecord>) {
    assert_eq!(level_order(tree, 3), vec![Some(2), Some(1), Some(3)]);
    assert_eq!(tree.height_at(0).unwrap(), 1);
    assert_eq!(tree.height_at(1).unwrap(), 0);
    assert_eq!(tree.height_at(2).unwrap(), 0);
    tree.check().unwrap();
}

// =============================================================================
// Shape Tests
// =============================================================================

#[test]
fn test_single_rotation_left_heavy() {
    let (_temp, tree) = tree_with(&[3, 2, 1]);
    assert_shape_2_1_3(&tree);
    assert_rotations(&tree, 1, 0);
}

#[test]
fn test_double_rotation_left_right() {
    let (_temp, tree) = tree_with(&[3, 1, 2]);
    assert_shape_2_1_3(&tree);
    assert_rotations(&tree, 0, 1);
}

#[test]
fn test_single_rotation_right_heavy() {
    let (_temp, tree) = tree_with(&[1, 2, 3]);
    assert_shape_2_1_3(&tree);
    assert_rotations(&tree, 1, 0);
}

#[test]
fn test_double_rotation_right_left() {
    let (_temp, tree) = tree_with(&[1, 3, 2]);
    assert_shape_2_1_3(&tree);
    assert_rotations(&tree, 0, 1);
}

#[test]
fn test_ascending_inserts_build_perfect_tree() {
    let (_temp, tree) = tree_with(&[1, 2, 3, 4, 5, 6, 7]);

    assert_eq!(
        level_order(&tree, 7),
        vec![Some(4), Some(2), Some(6), Some(1), Some(3), Some(5), Some(7)]
    );
    assert_eq!(tree.check().unwrap().height, 2);
}

#[test]
fn test_rotation_deep_in_tree() {
    // rotation happens at virtual index 2 (node 8), not at the root
    let (_temp, tree) = tree_with(&[5, 3, 8, 9, 10]);

    assert_eq!(
        level_order(&tree, 7),
        vec![Some(5), Some(3), Some(9), None, None, Some(8), Some(10)]
    );
    tree.check().unwrap();
}

// =============================================================================
// Metadata Tests
// =============================================================================

#[test]
fn test_moved_nodes_record_new_virtual_index() {
    let (_temp, tree) = tree_with(&[3, 2, 1]);

    for (id, v) in [(2, 0), (1, 1), (3, 2)] {
        let record = tree.find(&id).unwrap().unwrap();
        assert_eq!(record.virtual_index(), v, "id {}", id);
    }
}

// =============================================================================
// Slot Reuse Tests
// =============================================================================

#[test]
fn test_rotation_reuses_freed_slots() {
    let (_temp, tree) = tree_with(&[3, 2, 1]);

    let stats = tree.stats().unwrap();
    assert_eq!(stats.data_slots, 3);
    assert_eq!(stats.free_slots, 0);
}

#[test]
fn test_double_rotation_writes_below_child() {
    // the new node lands one level below the heavy child before the rotation
    let (_temp, single) = tree_with(&[3, 2, 1]);
    let (_temp2, double) = tree_with(&[3, 1, 2]);

    assert_eq!(single.stats().unwrap().index_entries, 4);
    assert_eq!(double.stats().unwrap().index_entries, 5);
}

#[test]
fn test_rotation_counts_reset_on_reopen() {
    let (_temp, mut tree) = tree_with(&[3, 2, 1]);
    assert_rotations(&tree, 1, 0);

    tree.close().unwrap();
    tree.reopen().unwrap();

    assert_rotations(&tree, 0, 0);
    assert_shape_2_1_3(&tree);
}

#[test]
fn test_truncate_after_rotation() {
    let (_temp, mut tree) = tree_with(&[3, 2, 1]);

    // node 1 was written at virtual index 3 before the rotation moved it
    assert_eq!(tree.stats().unwrap().index_entries, 4);

    tree.truncate().unwrap();

    assert_eq!(tree.stats().unwrap().index_entries, 3);
    for id in 1..=3 {
        assert!(tree.find(&id).unwrap().is_some());
    }
    tree.check().unwrap();
}
