//! # midi-presets CLI
//!
//! Command-line front end for validating community-contributed MIDI device
//! preset files and maintaining the repository checksum manifest.
//!
//! ## Usage
//!
//! ```bash
//! # Validate changed files in a pull request
//! midi-presets validate devices/acme/factory.json devices/acme/user.json
//!
//! # Regenerate the checksum manifest
//! midi-presets checksum --devices-folder devices
//!
//! # Verify the tree against the committed manifest
//! midi-presets checksum --devices-folder devices --verify
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    let args = Cli::parse();

    // Initialize logging based on verbosity
    let log_level = match args.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    match args.command {
        Commands::Validate {
            files,
            root,
            strict,
            jobs,
            config,
        } => cli::run_validate(files, root, strict, jobs, config),
        Commands::Checksum {
            devices_folder,
            verify,
        } => cli::run_checksum(devices_folder, verify),
    }
}
