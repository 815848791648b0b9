//! CLI argument definitions using clap
//!
//! Commands:
//! - doctor-droid serve --config <path> [--port <u16>]
//! - doctor-droid consult --config <path>
//! - doctor-droid check --rules <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Doctor Droid - rule-based diagnosis service
#[derive(Parser, Debug)]
#[command(name = "doctor-droid")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Load the rule base and serve the HTTP API
    Serve {
        /// Path to configuration file
        #[arg(long, default_value = "./doctor_droid.json")]
        config: PathBuf,

        /// Overrides the configured HTTP port
        #[arg(long)]
        port: Option<u16>,
    },

    /// Run one consultation read from stdin and exit
    Consult {
        /// Path to configuration file
        #[arg(long, default_value = "./doctor_droid.json")]
        config: PathBuf,
    },

    /// Load a rule file and report its metadata
    Check {
        /// Path to the rule source
        #[arg(long)]
        rules: PathBuf,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
