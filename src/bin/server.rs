//! Cruddy Server Binary
//!
//! Starts the TCP server for Cruddy.

use std::sync::Arc;

use clap::Parser;
use cruddy::network::Server;
use cruddy::{Config, CounterRecovery, Datastore};
use tracing_subscriber::{fmt, EnvFilter};

/// Cruddy Server
#[derive(Parser, Debug)]
#[command(name = "cruddy-server")]
#[command(about = "File-per-record todo datastore")]
#[command(version)]
struct Args {
    /// Record directory
    #[arg(short, long, default_value = "./cruddy_data/data")]
    data_dir: String,

    /// Counter file
    #[arg(short, long, default_value = "./cruddy_data/counter.txt")]
    counter_file: String,

    /// Listen address (host:port)
    #[arg(short, long, default_value = "127.0.0.1:8080")]
    listen: String,

    /// Worker threads serving connections
    #[arg(short, long, default_value = "4")]
    workers: usize,

    /// Refuse to allocate ids when the counter file is corrupt
    #[arg(long)]
    strict_counter: bool,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,cruddy=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    tracing::info!("Cruddy Server v{}", cruddy::VERSION);
    tracing::info!("Record directory: {}", args.data_dir);
    tracing::info!("Counter file: {}", args.counter_file);

    let recovery = if args.strict_counter {
        CounterRecovery::Fail
    } else {
        CounterRecovery::ResetToZero
    };

    // Build config from args
    let config = Config::builder()
        .data_dir(&args.data_dir)
        .counter_file(&args.counter_file)
        .counter_recovery(recovery)
        .listen_addr(&args.listen)
        .worker_threads(args.workers)
        .build();

    let datastore = match Datastore::open(config.clone()) {
        Ok(ds) => Arc::new(ds),
        Err(e) => {
            tracing::error!("Failed to open datastore: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("Datastore initialized successfully");

    let server = match Server::bind(config, datastore) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("Failed to bind {}: {}", args.listen, e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server.run() {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }

    tracing::info!("Server stopped");
}
