//! Store Module
//!
//! File-per-record persistence for todo items.
//!
//! ## Responsibilities
//! - Own the record directory
//! - Create records under ids handed out by the sequence allocator
//! - Read, overwrite and remove record files
//!
//! ## Layout
//! ```text
//! {data_dir}/
//!   ├── 00001.txt   (record text, verbatim, no trailing newline)
//!   ├── 00002.txt
//!   └── ...
//! ```
//! The filename is the id. The file contents are the text.

mod record_store;

use serde::{Deserialize, Serialize};

pub use record_store::RecordStore;

/// Extension used for record files
pub const RECORD_EXTENSION: &str = "txt";

/// A stored todo item
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    pub text: String,
}

impl Record {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}
