//! Configuration for Cruddy
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

use crate::error::{Result, TodoError};

/// Main configuration for a Cruddy instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// File holding the last allocated id as a zero-padded decimal string
    pub counter_file: PathBuf,

    /// Directory holding one `<id>.txt` file per record
    pub data_dir: PathBuf,

    /// What to do when the counter file exists but cannot be used
    pub counter_recovery: CounterRecovery,

    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// TCP listen address
    pub listen_addr: String,

    /// Number of worker threads serving connections
    pub worker_threads: usize,

    /// Accepted connections allowed to wait for a free worker
    pub max_pending_connections: usize,

    /// Connection read timeout (milliseconds, 0 = none)
    pub read_timeout_ms: u64,

    /// Connection write timeout (milliseconds, 0 = none)
    pub write_timeout_ms: u64,
}

/// Policy for a counter file that is present but unusable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CounterRecovery {
    /// Treat corrupt or unreadable contents as 0 and log a warning
    #[default]
    ResetToZero,

    /// Refuse to allocate until the counter file is repaired
    Fail,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            counter_file: PathBuf::from("./cruddy_data/counter.txt"),
            data_dir: PathBuf::from("./cruddy_data/data"),
            counter_recovery: CounterRecovery::ResetToZero,
            listen_addr: "127.0.0.1:8080".to_string(),
            worker_threads: 4,
            max_pending_connections: 128,
            read_timeout_ms: 5000,
            write_timeout_ms: 5000,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Check values that would make the server unusable
    pub fn validate(&self) -> Result<()> {
        if self.worker_threads == 0 {
            return Err(TodoError::Config("worker_threads must be at least 1".to_string()));
        }
        if self.max_pending_connections == 0 {
            return Err(TodoError::Config(
                "max_pending_connections must be at least 1".to_string(),
            ));
        }
        if self.counter_file.as_os_str().is_empty() || self.data_dir.as_os_str().is_empty() {
            return Err(TodoError::Config("storage paths must not be empty".to_string()));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the counter file location
    pub fn counter_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.counter_file = path.into();
        self
    }

    /// Set the record directory
    pub fn data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.data_dir = path.into();
        self
    }

    /// Set the counter recovery policy
    pub fn counter_recovery(mut self, policy: CounterRecovery) -> Self {
        self.config.counter_recovery = policy;
        self
    }

    /// Set the TCP listen address
    pub fn listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.listen_addr = addr.into();
        self
    }

    /// Set the number of worker threads
    pub fn worker_threads(mut self, count: usize) -> Self {
        self.config.worker_threads = count;
        self
    }

    /// Set the pending connection queue size
    pub fn max_pending_connections(mut self, count: usize) -> Self {
        self.config.max_pending_connections = count;
        self
    }

    /// Set the read timeout (in milliseconds)
    pub fn read_timeout_ms(mut self, ms: u64) -> Self {
        self.config.read_timeout_ms = ms;
        self
    }

    /// Set the write timeout (in milliseconds)
    pub fn write_timeout_ms(mut self, ms: u64) -> Self {
        self.config.write_timeout_ms = ms;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
