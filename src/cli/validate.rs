use anyhow::Result;
use log::info;
use std::path::PathBuf;

use midi_presets::config::ValidationConfig;
use midi_presets::validator::{validate_batch, BatchContext};

use super::Config;

/// Validate a list of preset files and print the aggregated report
pub fn run(
    files: Vec<PathBuf>,
    root: PathBuf,
    strict: bool,
    jobs: Option<usize>,
    config_file: Option<PathBuf>,
) -> Result<()> {
    let mut config = match config_file {
        Some(path) => Config::from_file(&path)?.into_validation_config(),
        None => ValidationConfig::default(),
    };
    if let Some(jobs) = jobs {
        config.concurrency = jobs;
    }
    if strict {
        config.strict = true;
    }

    info!("validating {} files under {}", files.len(), root.display());

    let report = validate_batch(&files, &root, &config, &BatchContext::default());

    // Use colorized output if available
    #[cfg(feature = "colorized_output")]
    {
        println!("{}", report.format_colored());
    }

    #[cfg(not(feature = "colorized_output"))]
    {
        println!("{}", report);
    }

    let failed = !report.passed() || (config.strict && report.has_warnings());
    if failed {
        std::process::exit(1);
    }

    Ok(())
}
