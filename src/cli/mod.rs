//! CLI module
//!
//! - serve: load config and rule base, serve HTTP
//! - consult: one consultation from stdin
//! - check: validate a rule file

mod args;
mod commands;
mod config;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{check, check_with, consult, consult_with, run, run_command, serve};
pub use config::Config;
pub use errors::{CliError, CliErrorCode, CliResult};
