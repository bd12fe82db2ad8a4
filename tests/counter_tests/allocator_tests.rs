//! Tests for SequenceAllocator
//!
//! These tests verify:
//! - Ids start at 00001 with no counter file
//! - Ids continue from the persisted value
//! - The counter file always holds the last allocated id
//! - Corrupt / unreadable counters follow the recovery policy
//! - Concurrent allocation never hands out duplicates

use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

use cruddy::config::CounterRecovery;
use cruddy::counter::{CounterState, SequenceAllocator};
use cruddy::TodoError;
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_counter_path() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("counter.txt");
    (temp_dir, path)
}

// =============================================================================
// Allocation Tests
// =============================================================================

#[test]
fn test_first_id_without_counter_file() {
    let (_temp, path) = setup_counter_path();
    let allocator = SequenceAllocator::new(&path, CounterRecovery::ResetToZero);

    assert_eq!(allocator.load(), CounterState::Missing);
    assert_eq!(allocator.allocate_next().unwrap(), "00001");
    assert_eq!(fs::read_to_string(&path).unwrap(), "00001");
}

#[test]
fn test_next_id_follows_counter_contents() {
    let (_temp, path) = setup_counter_path();
    fs::write(&path, "00025").unwrap();
    let allocator = SequenceAllocator::new(&path, CounterRecovery::ResetToZero);

    assert_eq!(allocator.allocate_next().unwrap(), "00026");
    assert_eq!(fs::read_to_string(&path).unwrap(), "00026");
}

#[test]
fn test_sequential_allocations() {
    let (_temp, path) = setup_counter_path();
    let allocator = SequenceAllocator::new(&path, CounterRecovery::ResetToZero);

    let ids: Vec<String> = (0..3).map(|_| allocator.allocate_next().unwrap()).collect();

    assert_eq!(ids, vec!["00001", "00002", "00003"]);
    assert_eq!(allocator.current().unwrap(), 3);
}

#[test]
fn test_counter_survives_new_allocator() {
    let (_temp, path) = setup_counter_path();

    {
        let allocator = SequenceAllocator::new(&path, CounterRecovery::ResetToZero);
        allocator.allocate_next().unwrap();
        allocator.allocate_next().unwrap();
    }

    let allocator = SequenceAllocator::new(&path, CounterRecovery::ResetToZero);
    assert_eq!(allocator.allocate_next().unwrap(), "00003");
}

#[test]
fn test_empty_counter_file_counts_as_zero() {
    let (_temp, path) = setup_counter_path();
    fs::write(&path, "").unwrap();
    let allocator = SequenceAllocator::new(&path, CounterRecovery::Fail);

    assert_eq!(allocator.load(), CounterState::Empty);
    assert_eq!(allocator.allocate_next().unwrap(), "00001");
}

#[test]
fn test_id_beyond_padding_width() {
    let (_temp, path) = setup_counter_path();
    fs::write(&path, "99999").unwrap();
    let allocator = SequenceAllocator::new(&path, CounterRecovery::ResetToZero);

    assert_eq!(allocator.allocate_next().unwrap(), "100000");
    assert_eq!(fs::read_to_string(&path).unwrap(), "100000");
}

#[test]
fn test_current_does_not_write() {
    let (_temp, path) = setup_counter_path();
    let allocator = SequenceAllocator::new(&path, CounterRecovery::ResetToZero);

    assert_eq!(allocator.current().unwrap(), 0);
    assert!(!path.exists());
}

// =============================================================================
// Recovery Policy Tests
// =============================================================================

#[test]
fn test_corrupt_counter_resets_to_zero() {
    let (_temp, path) = setup_counter_path();
    fs::write(&path, "not a number").unwrap();
    let allocator = SequenceAllocator::new(&path, CounterRecovery::ResetToZero);

    assert!(matches!(allocator.load(), CounterState::Corrupt { .. }));
    assert_eq!(allocator.allocate_next().unwrap(), "00001");
}

#[test]
fn test_corrupt_counter_fails_under_strict_policy() {
    let (_temp, path) = setup_counter_path();
    fs::write(&path, "garbage").unwrap();
    let allocator = SequenceAllocator::new(&path, CounterRecovery::Fail);

    let err = allocator.allocate_next().unwrap_err();
    assert!(matches!(err, TodoError::CounterCorrupt { .. }));
    assert!(err.is_storage());

    // Counter untouched
    assert_eq!(fs::read_to_string(&path).unwrap(), "garbage");
}

#[test]
fn test_unreadable_counter_is_distinguished_from_missing() {
    let temp_dir = TempDir::new().unwrap();
    // A directory cannot be read as a file
    let path = temp_dir.path().join("counter_dir");
    fs::create_dir(&path).unwrap();
    let allocator = SequenceAllocator::new(&path, CounterRecovery::Fail);

    assert!(matches!(allocator.load(), CounterState::Unreadable { .. }));
    assert!(matches!(
        allocator.current(),
        Err(TodoError::CounterCorrupt { .. })
    ));
}

#[test]
fn test_write_failure_is_storage_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("counter_dir");
    fs::create_dir(&path).unwrap();
    let allocator = SequenceAllocator::new(&path, CounterRecovery::ResetToZero);

    let err = allocator.allocate_next().unwrap_err();
    assert!(matches!(err, TodoError::Storage(_)));
}

#[test]
fn test_write_failure_when_parent_missing() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("missing").join("counter.txt");
    let allocator = SequenceAllocator::new(&path, CounterRecovery::ResetToZero);

    assert!(allocator.allocate_next().is_err());
}

// =============================================================================
// Concurrency Tests
// =============================================================================

#[test]
fn test_concurrent_allocations_are_unique() {
    let (_temp, path) = setup_counter_path();
    let allocator = Arc::new(SequenceAllocator::new(&path, CounterRecovery::ResetToZero));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let allocator = Arc::clone(&allocator);
            thread::spawn(move || {
                (0..25)
                    .map(|_| allocator.allocate_next().unwrap())
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let mut seen = HashSet::new();
    for handle in handles {
        for id in handle.join().unwrap() {
            assert!(seen.insert(id), "duplicate id allocated");
        }
    }

    assert_eq!(seen.len(), 200);
    assert_eq!(fs::read_to_string(&path).unwrap(), "00200");
}
