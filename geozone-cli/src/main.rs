//! GeoZone CLI - Command-line interface
//!
//! This binary provides a command-line interface to the GeoZone library.

mod commands;
mod error;
mod runner;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::batch::BatchArgs;
use commands::check::CheckArgs;
use commands::config::ConfigCommands;

#[derive(Parser)]
#[command(name = "geozone")]
#[command(version = geozone::VERSION)]
#[command(about = "Check whether coordinates fall inside service zones", long_about = None)]
struct Cli {
    /// Enable debug logging (also mirrors logs to stdout)
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a single coordinate
    Check(CheckArgs),

    /// Validate a zone file and report accepted and skipped records
    Validate {
        /// Zone file (JSON)
        file: PathBuf,
    },

    /// Check `lat,lon` lines read from stdin
    Batch(BatchArgs),

    /// Manage the configuration file
    #[command(subcommand)]
    Config(ConfigCommands),
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Check(args) => commands::check::run(args, cli.debug),
        Commands::Validate { file } => commands::validate::run(&file),
        Commands::Batch(args) => commands::batch::run(args, cli.debug),
        Commands::Config(command) => commands::config::run(command),
    };

    if let Err(e) = result {
        e.exit();
    }
}
