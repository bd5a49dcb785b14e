use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod config;
mod scenario;

#[derive(Parser)]
#[command(name = "teamswitch", about = "Replay team switch scenarios")]
#[command(version, propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a scenario against the in-memory world
    Simulate(commands::simulate::SimulateArgs),
    /// Manage configuration
    Config(commands::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Simulate(args) => commands::simulate::run(args).await,
        Commands::Config(args) => commands::config::run(args),
    }
}
