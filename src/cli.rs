//! Command-line interface definitions for dirwatcher.
//!
//! The CLI definitions are shared between the main binary and build tools (like xtask)
//! for man page generation.
//!
//! Note: Field-level documentation is provided via clap attributes,
//! so we allow missing_docs for this module to avoid redundant documentation.

#![allow(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

use clap::Parser;
use std::path::PathBuf;

/// Main CLI structure for dirwatcher.
#[derive(Parser, Debug)]
#[command(
    name = "dirwatcher",
    version = crate::VERSION,
    about = "Watch a directory for text files and report new lines containing a magic text",
    long_about = "Polls a directory, tracks every file with the given extension and reports \
                  each newly appended line that contains the magic text exactly once"
)]
pub struct Cli {
    /// Directory to watch
    pub path: PathBuf,

    /// Text to watch for (case-sensitive)
    pub magic: String,

    /// Text file extension to watch [default: .txt]
    #[arg(short, long)]
    pub ext: Option<String>,

    /// How often to poll the directory, in seconds [default: 1.0]
    #[arg(short, long, allow_negative_numbers = true)]
    pub interval: Option<f64>,

    /// How long to wait after a failed cycle, in seconds [default: 5.0]
    #[arg(long, allow_negative_numbers = true)]
    pub backoff: Option<f64>,

    /// Also report lines that already existed when a file was first noticed
    #[arg(long)]
    pub from_start: bool,

    /// Path to a TOML configuration file
    #[arg(short, long, env = "DIRWATCHER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Show debug output
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only show warnings and errors
    #[arg(short, long)]
    pub quiet: bool,
}
