//! Command-line interface: thin glue around the library.
//!
//! The CLI only parses arguments, loads optional configuration, invokes the
//! validator or checksum engine, prints the result, and maps pass/fail to an
//! exit code. All decision logic lives in the library modules.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod checksum;
mod config;
mod validate;

pub use checksum::run as run_checksum;
pub use config::Config;
pub use validate::run as run_validate;

/// midi-presets - Preset repository validation and checksums
#[derive(Parser)]
#[command(name = "midi-presets")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Validate preset JSON files against policy, structure and business rules
    Validate {
        /// JSON files to validate, relative to the repository root
        #[arg(value_name = "FILES", required = true)]
        files: Vec<PathBuf>,

        /// Repository root directory
        #[arg(long, default_value = ".")]
        root: PathBuf,

        /// Treat warnings as failures in the exit code
        #[arg(long)]
        strict: bool,

        /// Number of parallel validation workers
        #[arg(short = 'j', long)]
        jobs: Option<usize>,

        /// TOML configuration file overriding the policy defaults
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },

    /// Generate or verify the repository checksum manifest
    Checksum {
        /// Folder containing the device preset files
        #[arg(long, default_value = "devices")]
        devices_folder: PathBuf,

        /// Verify the existing manifest instead of regenerating it
        #[arg(long)]
        verify: bool,
    },
}
