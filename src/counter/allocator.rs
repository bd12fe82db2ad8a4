//! Sequence Allocator
//!
//! Reads, increments and rewrites the counter file.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use crate::config::CounterRecovery;
use crate::error::{Result, TodoError};

use super::{zero_padded, CounterState};

/// Allocates ids from a counter file
///
/// ## Concurrency:
/// - `alloc_lock` serializes the read → increment → write cycle, so two
///   threads sharing one allocator never receive the same id
/// - Separate processes pointed at the same file are not coordinated
pub struct SequenceAllocator {
    /// Location of the counter file
    path: PathBuf,

    /// How to treat a corrupt or unreadable counter
    recovery: CounterRecovery,

    /// Serializes allocations
    alloc_lock: Mutex<()>,
}

impl SequenceAllocator {
    /// Create an allocator for the given counter file
    ///
    /// The file is not touched until the first allocation.
    pub fn new(path: impl Into<PathBuf>, recovery: CounterRecovery) -> Self {
        Self {
            path: path.into(),
            recovery,
            alloc_lock: Mutex::new(()),
        }
    }

    /// Inspect the counter file without modifying it
    pub fn load(&self) -> CounterState {
        match fs::read_to_string(&self.path) {
            Ok(contents) => CounterState::parse(&contents),
            Err(e) if e.kind() == ErrorKind::NotFound => CounterState::Missing,
            Err(e) => CounterState::Unreadable {
                reason: e.to_string(),
            },
        }
    }

    /// Current counter value (the most recently allocated id, or 0)
    pub fn current(&self) -> Result<u64> {
        let state = self.load();
        self.resolve(&state)
    }

    /// Allocate the next id
    ///
    /// Steps:
    /// 1. Read the counter (policy decides what a bad file means)
    /// 2. Increment
    /// 3. Rewrite the whole file with the padded value
    /// 4. Return the padded value
    ///
    /// A failed write is returned as `Storage`; the id is never handed
    /// out unless it was persisted.
    pub fn allocate_next(&self) -> Result<String> {
        let _guard = self.alloc_lock.lock();

        let current = self.current()?;
        let next = current.checked_add(1).ok_or_else(|| {
            TodoError::Storage(format!("counter overflow in {}", self.path.display()))
        })?;
        let id = zero_padded(next);

        fs::write(&self.path, &id).map_err(|e| {
            TodoError::Storage(format!(
                "failed to write counter {}: {}",
                self.path.display(),
                e
            ))
        })?;

        tracing::debug!(id = %id, counter = %self.path.display(), "Allocated id");
        Ok(id)
    }

    /// Get the counter file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the recovery policy
    pub fn recovery(&self) -> CounterRecovery {
        self.recovery
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    /// Turn a counter state into a number according to the recovery policy
    fn resolve(&self, state: &CounterState) -> Result<u64> {
        match state {
            CounterState::Missing | CounterState::Empty => Ok(0),
            CounterState::Value(v) => Ok(*v),
            CounterState::Corrupt { contents } => {
                self.recover(format!("not a number: {:?}", contents))
            }
            CounterState::Unreadable { reason } => self.recover(reason.clone()),
        }
    }

    /// Apply the recovery policy to an unusable counter
    fn recover(&self, reason: String) -> Result<u64> {
        match self.recovery {
            CounterRecovery::ResetToZero => {
                tracing::warn!(
                    counter = %self.path.display(),
                    reason = %reason,
                    "Counter unusable, restarting from 0"
                );
                Ok(0)
            }
            CounterRecovery::Fail => Err(TodoError::CounterCorrupt {
                path: self.path.clone(),
                reason,
            }),
        }
    }
}
