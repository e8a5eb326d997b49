use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "javscraper")]
#[command(author, version, about = "Video metadata aggregation across multiple providers")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search every enabled provider for a title
    Search {
        /// File name, folder name or identifier to search for
        #[arg(required = true)]
        name: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Fetch the full normalized record for a title
    Fetch {
        /// File name, folder name or identifier
        #[arg(required_unless_present = "token")]
        name: Option<String>,

        /// Reference token from an earlier search
        #[arg(long)]
        token: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List discovered providers
    Providers {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}
