//! Response definitions
//!
//! Represents responses to clients.

use crate::error::{Result, TodoError};
use crate::store::Record;

use super::MAX_PAYLOAD_SIZE;

/// Response status codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Status {
    Ok = 0x00,
    NotFound = 0x01,
    Error = 0x02,
}

/// A response to send to client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Status code
    pub status: Status,

    /// Optional payload (bincode records for OK, message for NOT_FOUND/ERROR)
    pub payload: Option<Vec<u8>>,
}

impl Response {
    /// Create an OK response with optional payload
    pub fn ok(payload: Option<Vec<u8>>) -> Self {
        Self {
            status: Status::Ok,
            payload,
        }
    }

    /// Create an OK response carrying one record
    pub fn record(record: &Record) -> Result<Self> {
        let payload = bincode::serialize(record)?;
        Ok(Self::ok(Some(Self::within_frame(payload, "record")?)))
    }

    /// Create an OK response carrying a list of records
    ///
    /// Fails when the encoded list does not fit in one frame.
    pub fn records(records: &[Record]) -> Result<Self> {
        let payload = bincode::serialize(records)?;
        Ok(Self::ok(Some(Self::within_frame(payload, "record list")?)))
    }

    /// Create a NOT_FOUND response
    pub fn not_found(message: &str) -> Self {
        Self {
            status: Status::NotFound,
            payload: Some(message.as_bytes().to_vec()),
        }
    }

    /// Create an ERROR response
    pub fn error(message: &str) -> Self {
        Self {
            status: Status::Error,
            payload: Some(message.as_bytes().to_vec()),
        }
    }

    /// Reject payloads the peer would refuse to read
    fn within_frame(payload: Vec<u8>, what: &str) -> Result<Vec<u8>> {
        if payload.len() > MAX_PAYLOAD_SIZE as usize {
            return Err(TodoError::Protocol(format!(
                "{} too large for one frame: {} bytes (max {}); read records individually",
                what,
                payload.len(),
                MAX_PAYLOAD_SIZE
            )));
        }
        Ok(payload)
    }

    /// Payload as text (messages, PONG)
    pub fn message(&self) -> String {
        self.payload
            .as_deref()
            .map(|p| String::from_utf8_lossy(p).into_owned())
            .unwrap_or_default()
    }
}
