//! TCP Server
//!
//! Accepts connections and dispatches to worker threads.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::net::{Shutdown, SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam::channel::{self, Receiver, TrySendError};
use parking_lot::Mutex;

use crate::config::Config;
use crate::datastore::Datastore;
use crate::error::Result;
use crate::protocol::{write_response, Response};

use super::Connection;

/// How long the acceptor sleeps when no connection is pending
const ACCEPT_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// TCP server for Cruddy
///
/// One acceptor (the thread calling `run`) hands sockets to a fixed pool
/// of workers through a bounded channel. When the queue is full the
/// connection is answered with an ERROR response and closed.
///
/// On shutdown the read side of every open connection is closed, so
/// workers blocked on an idle client return even without a read timeout.
pub struct Server {
    config: Config,
    datastore: Arc<Datastore>,
    listener: TcpListener,
    shutdown: Arc<AtomicBool>,
    live: Arc<LiveConnections>,
}

/// Handles to every queued or active connection, keyed by accept order
#[derive(Default)]
struct LiveConnections {
    next_id: AtomicU64,
    streams: Mutex<HashMap<u64, TcpStream>>,
}

impl LiveConnections {
    /// Remember a clone of `stream`, returning its key
    fn register(&self, stream: &TcpStream) -> Result<u64> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.streams.lock().insert(id, stream.try_clone()?);
        Ok(id)
    }

    fn remove(&self, id: u64) {
        self.streams.lock().remove(&id);
    }

    /// Wake every reader with end-of-stream
    fn close_reads(&self) {
        for stream in self.streams.lock().values() {
            let _ = stream.shutdown(Shutdown::Read);
        }
    }
}

/// Cloneable handle that stops a running server
#[derive(Debug, Clone)]
pub struct ShutdownHandle {
    flag: Arc<AtomicBool>,
}

impl ShutdownHandle {
    /// Ask the server to stop accepting and wind down
    pub fn shutdown(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_shutdown(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

impl Server {
    /// Bind the listen address from `config`
    pub fn bind(config: Config, datastore: Arc<Datastore>) -> Result<Self> {
        config.validate()?;

        let listener = TcpListener::bind(&config.listen_addr)?;
        listener.set_nonblocking(true)?;

        Ok(Self {
            config,
            datastore,
            listener,
            shutdown: Arc::new(AtomicBool::new(false)),
            live: Arc::new(LiveConnections::default()),
        })
    }

    /// Address actually bound (useful with port 0)
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Handle for stopping the server from another thread
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            flag: Arc::clone(&self.shutdown),
        }
    }

    /// Signal the server to shutdown gracefully
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
    }

    /// Start the server (blocking)
    ///
    /// Returns after `shutdown` is signalled and every worker has finished
    /// its current connection.
    pub fn run(&self) -> Result<()> {
        tracing::info!(
            "Listening on {} with {} workers",
            self.local_addr()?,
            self.config.worker_threads
        );

        let (tx, rx) = channel::bounded::<(u64, TcpStream)>(self.config.max_pending_connections);

        let mut workers = Vec::with_capacity(self.config.worker_threads);
        for i in 0..self.config.worker_threads {
            workers.push(self.spawn_worker(i, rx.clone())?);
        }
        drop(rx);

        while !self.shutdown.load(Ordering::SeqCst) {
            match self.listener.accept() {
                Ok((stream, addr)) => {
                    // Accepted sockets may inherit non-blocking mode
                    if let Err(e) = stream.set_nonblocking(false) {
                        tracing::warn!("Dropping connection from {}: {}", addr, e);
                        continue;
                    }
                    tracing::trace!("Accepted connection from {}", addr);

                    let conn_id = match self.live.register(&stream) {
                        Ok(id) => id,
                        Err(e) => {
                            tracing::warn!("Dropping connection from {}: {}", addr, e);
                            continue;
                        }
                    };

                    match tx.try_send((conn_id, stream)) {
                        Ok(()) => {}
                        Err(TrySendError::Full((conn_id, mut stream))) => {
                            tracing::warn!("Connection queue full, rejecting {}", addr);
                            self.live.remove(conn_id);
                            let _ = write_response(&mut stream, &Response::error("server busy"));
                        }
                        Err(TrySendError::Disconnected(_)) => {
                            tracing::error!("All workers exited, stopping acceptor");
                            break;
                        }
                    }
                }
                Err(e) if e.kind() == ErrorKind::WouldBlock => {
                    thread::sleep(ACCEPT_POLL_INTERVAL);
                }
                Err(e) => {
                    tracing::warn!("Accept failed: {}", e);
                }
            }
        }

        tracing::info!("Shutting down, waiting for workers");
        drop(tx);
        self.live.close_reads();
        for worker in workers {
            if worker.join().is_err() {
                tracing::error!("Worker thread panicked");
            }
        }

        Ok(())
    }

    /// Spawn one worker draining the connection queue
    fn spawn_worker(
        &self,
        index: usize,
        rx: Receiver<(u64, TcpStream)>,
    ) -> Result<JoinHandle<()>> {
        let datastore = Arc::clone(&self.datastore);
        let live = Arc::clone(&self.live);
        let read_ms = self.config.read_timeout_ms;
        let write_ms = self.config.write_timeout_ms;

        let handle = thread::Builder::new()
            .name(format!("cruddy-worker-{}", index))
            .spawn(move || {
                for (conn_id, stream) in rx.iter() {
                    let result = Connection::new(stream, Arc::clone(&datastore)).and_then(|mut conn| {
                        conn.set_timeouts(read_ms, write_ms)?;
                        conn.handle()
                    });
                    live.remove(conn_id);
                    if let Err(e) = result {
                        tracing::warn!("Connection ended with error: {}", e);
                    }
                }
            })?;

        Ok(handle)
    }
}
