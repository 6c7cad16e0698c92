//! # fault-owners CLI Module
//!
//! ## Available Commands
//!
//! - `lookup` - Print the pet of one owner
//! - `list` - List every owner and pet
//! - `join` - Look up several owners and join the misses
//! - `panic` - Capture a panic as a fault
//! - `demo` - Show a wrap / join / cause composition and search it

mod commands;

use crate::AppError;
use crate::owners::OwnerDirectory;
use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// fault-owners - owner to pet lookup
///
/// Every failure is reported as a rendered fault.
#[derive(Parser, Debug)]
#[command(name = "fault-owners")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress informational log output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Path to a TOML owners file (defaults to the built-in owners)
    #[arg(short, long, global = true)]
    pub owners: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the pet of an owner
    Lookup {
        /// Owner name
        name: String,
    },

    /// List every owner and pet
    List,

    /// Look up several owners; misses are joined into one fault
    Join {
        /// Owner names
        #[arg(required = true)]
        names: Vec<String>,
    },

    /// Raise a panic and print the captured fault
    Panic {
        /// Panic message
        message: String,

        /// Unwind with a fault payload instead of a string
        #[arg(long)]
        as_fault: bool,
    },

    /// Show a composed fault and the results of searching it
    Demo,
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments, writing to standard output.
pub fn execute(cli: Cli) -> Result<(), AppError> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    execute_to(cli, &mut out)
}

/// Execute the CLI with parsed arguments, writing to `out`.
pub fn execute_to<W: Write>(cli: Cli, out: &mut W) -> Result<(), AppError> {
    let directory = match &cli.owners {
        Some(path) => OwnerDirectory::load(path)?,
        None => OwnerDirectory::builtin(),
    };
    tracing::debug!(owners = directory.len(), "Owners directory ready");

    let json_mode = cli.json_mode;

    match cli.command {
        Some(Commands::Lookup { name }) => cmd_lookup(&directory, out, json_mode, &name),
        Some(Commands::Join { names }) => cmd_join(&directory, out, json_mode, &names),
        Some(Commands::Panic { message, as_fault }) => {
            cmd_panic(out, json_mode, &message, as_fault)
        }
        Some(Commands::Demo) => cmd_demo(&directory, out, json_mode),
        Some(Commands::List) | None => cmd_list(&directory, out, json_mode),
    }
}
