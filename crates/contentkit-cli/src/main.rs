//! contentkit CLI
//!
//! Sync, compare and validate site content across local files, the content
//! API and the CDN; preview A/B variant assignment.

use clap::{Parser, Subcommand};
use contentkit_core::logging_facility;
use contentkit_engine::ContentConfig;
use std::path::PathBuf;

mod commands;

#[derive(Debug, Parser)]
#[command(name = "contentkit")]
#[command(about = "contentkit - versioned site content tooling", long_about = None)]
struct Cli {
    /// Config file to use instead of ./contentkit.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Copy content from one source to another
    Sync(commands::sync::SyncArgs),
    /// Show differences for one content id between two sources
    Diff(commands::diff::DiffArgs),
    /// Check that documents load and carry valid version metadata
    Validate(commands::validate::ValidateArgs),
    /// Show which A/B variant a user gets
    Assign(commands::assign::AssignArgs),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match ContentConfig::load_from(cli.config.as_deref()) {
        Ok(config) => {
            logging_facility::init(config.log_profile);
            match cli.command {
                Commands::Sync(args) => commands::sync::execute(args, &config).await,
                Commands::Diff(args) => commands::diff::execute(args, &config).await,
                Commands::Validate(args) => commands::validate::execute(args, &config).await,
                Commands::Assign(args) => commands::assign::execute(args, &config),
            }
        }
        Err(e) => Err(e.into()),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
