//! Datastore Module
//!
//! Ties the sequence allocator and the record store together.
//!
//! ## Responsibilities
//! - Build both components from a `Config`
//! - Initialize the on-disk layout
//! - Route protocol commands to CRUD operations

use std::fs;
use std::path::Path;
use std::sync::Arc;

use crate::config::Config;
use crate::counter::SequenceAllocator;
use crate::error::Result;
use crate::protocol::Command;
use crate::store::{Record, RecordStore};

/// Outcome of a successfully executed command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// A single record (create, read one, update)
    Record(Record),

    /// Every record (read all)
    Records(Vec<Record>),

    /// A record was removed
    Deleted,

    /// Answer to ping
    Pong,
}

/// The todo datastore
///
/// ## Ordering:
/// - `create` allocates (and persists) the id before writing the record
/// - `update` and `delete` never touch the counter
pub struct Datastore {
    /// Datastore configuration
    config: Config,

    /// Records, with the allocator they draw ids from
    store: RecordStore,
}

impl Datastore {
    /// Open a datastore with the given config
    ///
    /// On startup:
    /// 1. Create the counter file's parent directory
    /// 2. Create the record directory
    /// 3. Ready to serve requests
    pub fn open(config: Config) -> Result<Self> {
        if let Some(parent) = config.counter_file.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let allocator = Arc::new(SequenceAllocator::new(
            &config.counter_file,
            config.counter_recovery,
        ));
        let store = RecordStore::new(&config.data_dir, allocator);
        store.initialize()?;

        tracing::debug!(
            data_dir = %config.data_dir.display(),
            counter = %config.counter_file.display(),
            "Datastore opened"
        );

        Ok(Self { config, store })
    }

    /// Open with a root directory (convenience method)
    ///
    /// Uses `{root}/counter.txt` and `{root}/data`
    pub fn open_path(root: &Path) -> Result<Self> {
        let config = Config::builder()
            .counter_file(root.join("counter.txt"))
            .data_dir(root.join("data"))
            .build();
        Self::open(config)
    }

    /// Execute a command
    ///
    /// Routes commands to appropriate handlers
    pub fn execute(&self, command: Command) -> Result<Reply> {
        match command {
            Command::Create { text } => self.create(&text).map(Reply::Record),
            Command::ReadAll => self.read_all().map(Reply::Records),
            Command::ReadOne { id } => self.read_one(&id).map(Reply::Record),
            Command::Update { id, text } => self.update(&id, &text).map(Reply::Record),
            Command::Delete { id } => {
                self.delete(&id)?;
                Ok(Reply::Deleted)
            }
            Command::Ping => Ok(Reply::Pong),
        }
    }

    /// Create a record under a new id
    pub fn create(&self, text: &str) -> Result<Record> {
        self.store.create(text)
    }

    /// Read every record
    pub fn read_all(&self) -> Result<Vec<Record>> {
        self.store.read_all()
    }

    /// Read one record
    pub fn read_one(&self, id: &str) -> Result<Record> {
        self.store.read_one(id)
    }

    /// Replace a record's text
    pub fn update(&self, id: &str, text: &str) -> Result<Record> {
        self.store.update(id, text)
    }

    /// Remove a record
    pub fn delete(&self, id: &str) -> Result<()> {
        self.store.delete(id)
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// Get the record directory path
    pub fn data_dir(&self) -> &Path {
        &self.config.data_dir
    }

    /// Get the counter file path
    pub fn counter_file(&self) -> &Path {
        &self.config.counter_file
    }

    /// Current counter value
    pub fn counter_value(&self) -> Result<u64> {
        self.store.allocator().current()
    }

    /// Number of stored records
    pub fn record_count(&self) -> Result<usize> {
        self.store.len()
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}
