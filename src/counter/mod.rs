//! Counter Module
//!
//! Sequence allocator backed by a single counter file.
//!
//! ## Responsibilities
//! - Hand out monotonically increasing ids as zero-padded strings
//! - Persist the most recently allocated id after every allocation
//! - Distinguish "no counter yet" from "counter unusable"
//!
//! ## File Format
//! ```text
//! ┌───────────────────────────┐
//! │ "00042"  (no newline)     │
//! └───────────────────────────┘
//! ```
//! Five digits, zero padded. Values past 99999 are written at natural width.

mod allocator;

pub use allocator::SequenceAllocator;

/// Width of a formatted id
pub const ID_WIDTH: usize = 5;

/// What was found in the counter file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CounterState {
    /// No counter file yet
    Missing,

    /// Counter file exists but holds only whitespace
    Empty,

    /// A valid counter value
    Value(u64),

    /// Counter file holds something that is not a decimal number
    Corrupt { contents: String },

    /// Counter file exists but could not be read
    Unreadable { reason: String },
}

impl CounterState {
    /// Value of the counter if it can be trusted
    ///
    /// `Missing` and `Empty` both count as 0. Corrupt or unreadable
    /// files return `None` and are left to the recovery policy.
    pub fn value(&self) -> Option<u64> {
        match self {
            CounterState::Missing | CounterState::Empty => Some(0),
            CounterState::Value(v) => Some(*v),
            CounterState::Corrupt { .. } | CounterState::Unreadable { .. } => None,
        }
    }

    /// Parse raw counter file contents
    pub fn parse(contents: &str) -> Self {
        let trimmed = contents.trim();
        if trimmed.is_empty() {
            return CounterState::Empty;
        }
        match trimmed.parse::<u64>() {
            Ok(v) => CounterState::Value(v),
            Err(_) => CounterState::Corrupt {
                contents: trimmed.to_string(),
            },
        }
    }
}

/// Format a counter value as a zero-padded id
/// 7 → "00007", 123456 → "123456"
pub fn zero_padded(value: u64) -> String {
    format!("{:0width$}", value, width = ID_WIDTH)
}
