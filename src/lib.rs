//! # Cruddy
//!
//! A small todo datastore with:
//! - One text file per record, named after its id
//! - Zero-padded sequential ids from a single counter file
//! - Serialized in-process mutations
//!
//! The core is [`Datastore`] and the components beneath it, called
//! directly. The `protocol` and `network` modules are an optional TCP
//! facade over the same operations, used by the bundled binaries.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │        Caller (local calls, or optional TCP facade)          │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                      Datastore                               │
//! │                  (Command Router)                            │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!                       ▼
//!               ┌───────────────┐        ┌─────────────────────┐
//!               │  RecordStore  │───────▶│  SequenceAllocator  │
//!               │ {data_dir}/   │ create │  counter.txt        │
//!               │   <id>.txt    │        │  "00042"            │
//!               └───────────────┘        └─────────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod counter;
pub mod store;
pub mod network;
pub mod protocol;
pub mod datastore;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{TodoError, Result};
pub use config::{Config, CounterRecovery};
pub use counter::{CounterState, SequenceAllocator};
pub use store::{Record, RecordStore};
pub use datastore::{Datastore, Reply};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of Cruddy
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
