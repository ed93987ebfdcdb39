//! CLI module for dispatchr - command-line interface and subcommands.
//!
//! Provides the main entry point with subcommands for running a plan file
//! and previewing its lane assignment.

pub mod commands;

pub use commands::Cli;
