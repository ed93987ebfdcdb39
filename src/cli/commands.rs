//! CLI command definitions using clap.
//!
//! Defines the main CLI structure and subcommands:
//! - run: execute a plan file through the sleep executor
//! - lanes: preview how a plan's conflicting tasks spread across lanes

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Dispatchr - a bounded-concurrency conflict-aware task dispatcher
#[derive(Parser, Debug)]
#[command(name = "dispatchr")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// Main subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Execute every task in a plan file
    Run {
        /// Path to the JSON plan file
        plan: PathBuf,

        /// Maximum concurrent tasks (0 = no explicit limit)
        #[arg(short, long, default_value_t = 0)]
        max_threads: usize,
    },

    /// Show the immediate wave and lane assignment for a plan file
    Lanes {
        /// Path to the JSON plan file
        plan: PathBuf,
    },
}
