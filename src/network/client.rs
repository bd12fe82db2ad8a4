//! TCP Client
//!
//! Blocking client for the Cruddy wire protocol.

use std::io::{BufReader, BufWriter};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use crate::error::{Result, TodoError};
use crate::protocol::{read_response, write_command, Command, Response, Status};
use crate::store::Record;

/// A connection to a Cruddy server
pub struct Client {
    reader: BufReader<TcpStream>,
    writer: BufWriter<TcpStream>,
}

impl Client {
    /// Connect to a server
    pub fn connect(addr: impl ToSocketAddrs) -> Result<Self> {
        let stream = TcpStream::connect(addr)?;
        stream.set_nodelay(true)?;

        let read_stream = stream.try_clone()?;
        Ok(Self {
            reader: BufReader::new(read_stream),
            writer: BufWriter::new(stream),
        })
    }

    /// Set a read timeout for responses
    pub fn set_timeout(&mut self, timeout: Option<Duration>) -> Result<()> {
        self.reader.get_ref().set_read_timeout(timeout)?;
        Ok(())
    }

    /// Send one command and wait for its response
    pub fn request(&mut self, command: &Command) -> Result<Response> {
        write_command(&mut self.writer, command)?;
        read_response(&mut self.reader)
    }

    pub fn create(&mut self, text: &str) -> Result<Record> {
        let response = self.request(&Command::Create {
            text: text.to_string(),
        })?;
        Self::decode_record(Self::expect_ok(response, None)?)
    }

    pub fn read_all(&mut self) -> Result<Vec<Record>> {
        let response = self.request(&Command::ReadAll)?;
        let payload = Self::expect_ok(response, None)?;
        match payload {
            Some(bytes) => Ok(bincode::deserialize(&bytes)?),
            None => Ok(Vec::new()),
        }
    }

    pub fn read_one(&mut self, id: &str) -> Result<Record> {
        let response = self.request(&Command::ReadOne { id: id.to_string() })?;
        Self::decode_record(Self::expect_ok(response, Some(id))?)
    }

    pub fn update(&mut self, id: &str, text: &str) -> Result<Record> {
        let response = self.request(&Command::Update {
            id: id.to_string(),
            text: text.to_string(),
        })?;
        Self::decode_record(Self::expect_ok(response, Some(id))?)
    }

    pub fn delete(&mut self, id: &str) -> Result<()> {
        let response = self.request(&Command::Delete { id: id.to_string() })?;
        Self::expect_ok(response, Some(id))?;
        Ok(())
    }

    /// Health check
    pub fn ping(&mut self) -> Result<()> {
        let response = self.request(&Command::Ping)?;
        let message = response.message();
        Self::expect_ok(response, None)?;
        if message != "PONG" {
            return Err(TodoError::Protocol(format!(
                "unexpected ping reply: {:?}",
                message
            )));
        }
        Ok(())
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    /// Map a non-OK status onto an error
    fn expect_ok(response: Response, id: Option<&str>) -> Result<Option<Vec<u8>>> {
        match (response.status, id) {
            (Status::Ok, _) => Ok(response.payload),
            (Status::NotFound, Some(id)) => Err(TodoError::NotFound(id.to_string())),
            (Status::NotFound, None) | (Status::Error, _) => {
                Err(TodoError::Remote(response.message()))
            }
        }
    }

    fn decode_record(payload: Option<Vec<u8>>) -> Result<Record> {
        let bytes = payload.ok_or_else(|| {
            TodoError::Protocol("expected a record payload, got none".to_string())
        })?;
        Ok(bincode::deserialize(&bytes)?)
    }
}
