//! Command definitions
//!
//! Represents commands from clients.

/// Command types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CommandType {
    Create = 0x01,
    ReadAll = 0x02,
    ReadOne = 0x03,
    Update = 0x04,
    Delete = 0x05,
    Ping = 0x06,
}

/// A parsed command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Create a record with a new id
    Create { text: String },

    /// List every record
    ReadAll,

    /// Read one record by id
    ReadOne { id: String },

    /// Replace the text of a record
    Update { id: String, text: String },

    /// Remove a record
    Delete { id: String },

    /// Ping (health check)
    Ping,
}

impl Command {
    /// Get the command type
    pub fn command_type(&self) -> CommandType {
        match self {
            Command::Create { .. } => CommandType::Create,
            Command::ReadAll => CommandType::ReadAll,
            Command::ReadOne { .. } => CommandType::ReadOne,
            Command::Update { .. } => CommandType::Update,
            Command::Delete { .. } => CommandType::Delete,
            Command::Ping => CommandType::Ping,
        }
    }
}
