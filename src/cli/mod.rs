//! CLI for the Court Vision gateway

pub mod serve;

use clap::{Parser, Subcommand};

/// Court Vision gateway - authenticated proxy to the lineup data service
#[derive(Parser)]
#[command(name = "court-vision-gateway")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the gateway HTTP server
    Serve(serve::ServeArgs),
}
