//! CLI module for scenegen - command-line interface and subcommands.
//!
//! Provides the main entry point with subcommands for generation, the
//! standalone filter pass, and template listing.

pub mod commands;

pub use commands::{Cli, Commands};
