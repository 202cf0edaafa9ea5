//! Command-line argument definitions for the Ligature CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control input/output paths, configuration file
//! selection, shape move replay and logging verbosity.

use clap::Parser;

/// Command-line arguments for the Ligature connector router
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input scene document (TOML)
    #[arg(help = "Path to the input scene document")]
    pub input: String,

    /// Path to the output SVG file
    #[arg(short, long, default_value = "out.svg")]
    pub output: String,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Render the scene as built, without replaying its shape moves
    #[arg(long)]
    pub no_moves: bool,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
