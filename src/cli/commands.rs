//! CLI command definitions using clap.
//!
//! Defines the main CLI structure and subcommands:
//! - generate: produce animation code for a request and persist it
//! - filter: run only the request-rewriting pass
//! - templates: list available prompt templates

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Scenegen - prompt-driven Manim scene generation
#[derive(Parser, Debug)]
#[command(name = "scenegen")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

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
    /// Generate animation code for a request and write it to a file
    Generate {
        /// Natural-language description of the animation
        request: String,

        /// Destination file (defaults to the configured output path)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Persist the model reply verbatim, skipping code extraction
        #[arg(long)]
        raw: bool,

        /// Skip the request-filter pass
        #[arg(long)]
        no_filter: bool,

        /// Feed the filter output into the main call instead of the raw request
        #[arg(long)]
        chain: bool,
    },

    /// Run only the request-filter pass and print its output
    Filter {
        /// Natural-language description of the animation
        request: String,
    },

    /// List available prompt templates
    Templates,
}
