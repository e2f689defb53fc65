use clap::{Parser, Subcommand};

/// Workers API server and database management.
#[derive(Debug, Parser)]
#[command(name = "workers-api")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Block until the database answers a trivial query.
    Ready(ReadyArgs),
    /// Drop and recreate every table.
    #[command(name = "create_db")]
    CreateDb,
    /// Insert the default admin worker.
    #[command(name = "seed_db")]
    SeedDb,
    /// Run the HTTP server.
    Serve,
}

#[derive(Debug, Clone, Default, clap::Args)]
pub struct ReadyArgs {
    /// Milliseconds to wait between attempts (overrides READY_INTERVAL_MS).
    #[arg(long)]
    pub interval_ms: Option<u64>,

    /// Give up after this many seconds (overrides READY_TIMEOUT_SECS).
    #[arg(long)]
    pub timeout_secs: Option<u64>,
}
