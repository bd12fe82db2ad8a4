//! Cruddy CLI Client
//!
//! Command-line interface for managing todos, either through a server
//! or directly against the local files.

use clap::{Parser, Subcommand};
use cruddy::network::Client;
use cruddy::{Config, Datastore, Record, Result};
use tracing_subscriber::{fmt, EnvFilter};

/// Cruddy CLI
#[derive(Parser, Debug)]
#[command(name = "cruddy-cli")]
#[command(about = "CLI for the Cruddy todo datastore")]
#[command(version)]
struct Args {
    /// Server address
    #[arg(short, long, default_value = "127.0.0.1:8080")]
    server: String,

    /// Operate on local files instead of a server
    #[arg(long)]
    local: bool,

    /// Record directory (with --local)
    #[arg(long, default_value = "./cruddy_data/data")]
    data_dir: String,

    /// Counter file (with --local)
    #[arg(long, default_value = "./cruddy_data/counter.txt")]
    counter_file: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Add a todo
    Create {
        /// Todo text
        text: String,
    },

    /// List all todos
    List,

    /// Show one todo
    Get {
        /// Todo id
        id: String,
    },

    /// Change a todo's text
    Update {
        /// Todo id
        id: String,

        /// New text
        text: String,
    },

    /// Remove a todo
    Delete {
        /// Todo id
        id: String,
    },

    /// Ping the server
    Ping,
}

/// Where commands are sent
enum Backend {
    Remote(Client),
    Local(Datastore),
}

impl Backend {
    fn create(&mut self, text: &str) -> Result<Record> {
        match self {
            Backend::Remote(client) => client.create(text),
            Backend::Local(ds) => ds.create(text),
        }
    }

    fn read_all(&mut self) -> Result<Vec<Record>> {
        match self {
            Backend::Remote(client) => client.read_all(),
            Backend::Local(ds) => ds.read_all(),
        }
    }

    fn read_one(&mut self, id: &str) -> Result<Record> {
        match self {
            Backend::Remote(client) => client.read_one(id),
            Backend::Local(ds) => ds.read_one(id),
        }
    }

    fn update(&mut self, id: &str, text: &str) -> Result<Record> {
        match self {
            Backend::Remote(client) => client.update(id, text),
            Backend::Local(ds) => ds.update(id, text),
        }
    }

    fn delete(&mut self, id: &str) -> Result<()> {
        match self {
            Backend::Remote(client) => client.delete(id),
            Backend::Local(ds) => ds.delete(id),
        }
    }

    fn ping(&mut self) -> Result<()> {
        match self {
            Backend::Remote(client) => client.ping(),
            Backend::Local(_) => Ok(()),
        }
    }
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let mut backend = if args.local {
        let config = Config::builder()
            .data_dir(&args.data_dir)
            .counter_file(&args.counter_file)
            .build();
        Backend::Local(Datastore::open(config)?)
    } else {
        Backend::Remote(Client::connect(&args.server)?)
    };

    match args.command {
        Commands::Create { text } => {
            let text = text.trim();
            if text.is_empty() {
                tracing::warn!("Ignoring empty todo");
                return Ok(());
            }
            print_record(&backend.create(text)?);
        }
        Commands::List => {
            for record in backend.read_all()? {
                print_record(&record);
            }
        }
        Commands::Get { id } => print_record(&backend.read_one(&id)?),
        Commands::Update { id, text } => print_record(&backend.update(&id, &text)?),
        Commands::Delete { id } => {
            backend.delete(&id)?;
            println!("deleted {}", id);
        }
        Commands::Ping => {
            backend.ping()?;
            println!("PONG");
        }
    }

    Ok(())
}

fn print_record(record: &Record) {
    println!("{}  {}", record.id, record.text);
}
