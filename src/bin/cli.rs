//! avlfile CLI
//!
//! Command-line interface for inspecting and editing tree files of
//! identifier records.

use std::process::ExitCode;

use avlfile::{Config, IdRecord, Payload, Result, TreeFile};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

/// avlfile CLI
#[derive(Parser, Debug)]
#[command(name = "avlfile-cli")]
#[command(about = "Inspect and edit persistent AVL tree files of identifier records")]
#[command(version)]
struct Args {
    /// Directory holding the tree files
    #[arg(short, long, default_value = ".")]
    dir: String,

    /// Data file name (the index file is <file>.index)
    #[arg(short, long)]
    file: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Insert identifiers
    Insert {
        /// Identifiers to insert
        #[arg(required = true)]
        ids: Vec<u64>,
    },

    /// Look up an identifier
    Find {
        /// The identifier to look up
        id: u64,
    },

    /// Mark an identifier as used
    Use {
        /// The identifier to mark
        id: u64,
    },

    /// Remove an identifier
    Remove {
        /// The identifier to remove
        id: u64,
    },

    /// Print all identifiers in order
    List {
        /// Stop after this many records
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Drop trailing unmapped index entries
    Truncate,

    /// Verify tree structure
    Check,

    /// Show file sizes
    Stats,
}

impl Commands {
    fn writable(&self) -> bool {
        matches!(
            self,
            Commands::Insert { .. } | Commands::Remove { .. } | Commands::Truncate
        )
    }

    fn updatable(&self) -> bool {
        matches!(self, Commands::Use { .. })
    }
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,avlfile=debug"));

    fmt().with_env_filter(filter).with_target(true).init();

    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    let config = Config::builder()
        .directory(&args.dir)
        .filename(&args.file)
        .writable(args.command.writable())
        .updatable(args.command.updatable())
        .build();

    let mut tree: TreeFile<IdRecord> = TreeFile::open(config)?;

    match args.command {
        Commands::Insert { ids } => {
            for id in ids {
                if tree.insert(IdRecord::new(id))? {
                    println!("inserted {}", id);
                } else {
                    println!("{} already exists", id);
                }
            }
        }
        Commands::Find { id } => match tree.find(&id)? {
            Some(record) => print_record(&record),
            None => println!("{} not found", id),
        },
        Commands::Use { id } => match tree.find(&id)? {
            Some(mut record) if !record.used() => {
                record.set_used(true);
                tree.update(record)?;
                println!("{} marked used", id);
            }
            Some(_) => println!("{} already used", id),
            None => println!("{} not found", id),
        },
        Commands::Remove { id } => {
            if tree.remove(&id)? {
                println!("removed {}", id);
            } else {
                println!("{} not found", id);
            }
        }
        Commands::List { limit } => {
            let limit = limit.unwrap_or(usize::MAX);
            let mut printed = 0;
            tree.traverse(|record| {
                if printed >= limit {
                    return true;
                }
                print_record(record);
                printed += 1;
                false
            })?;
        }
        Commands::Truncate => {
            tree.truncate()?;
            if let Some(stats) = tree.stats() {
                println!("index entries: {}", stats.index_entries);
            }
        }
        Commands::Check => {
            let stats = tree.check()?;
            println!("ok: {} records, height {}", stats.nodes, stats.height);
        }
        Commands::Stats => {
            if let Some(stats) = tree.stats() {
                println!("index entries: {}", stats.index_entries);
                println!("data slots:    {}", stats.data_slots);
                println!("records:       {}", tree.len()?);
            }
        }
    }

    tree.close()
}

fn print_record(record: &IdRecord) {
    println!(
        "{}\tused={}\theight={}\tvirtual={}",
        record.id(),
        record.used(),
        record.height(),
        record.virtual_index()
    );
}
