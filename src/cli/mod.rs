//! Command-line interface wiring for entity-lens.

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::config::Settings;

pub mod extract;
pub mod serve;

/// Top-level CLI definition.
#[derive(Debug, Parser)]
#[command(author, version, about = "Named entity highlighting and visualisation", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Parse CLI arguments from the environment.
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Dispatch the selected sub-command.
    pub async fn dispatch(self, settings: Settings) -> Result<()> {
        match self.command {
            Commands::Serve(args) => serve::run(args, settings).await,
            Commands::Extract(args) => extract::run(args, settings).await,
        }
    }
}

/// Supported sub-commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Serve the upload form and result pages.
    Serve(serve::Args),
    /// Analyse one text file and print a JSON report.
    Extract(extract::Args),
}
