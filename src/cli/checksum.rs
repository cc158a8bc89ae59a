use anyhow::{bail, Context, Result};
use log::info;
use std::path::PathBuf;

use midi_presets::checksum::ChecksumManifest;

/// Generate or verify the repository checksum manifest
pub fn run(devices_folder: PathBuf, verify: bool) -> Result<()> {
    if !devices_folder.exists() {
        bail!("devices folder not found: {}", devices_folder.display());
    }

    if verify {
        let manifest = ChecksumManifest::load(&devices_folder)
            .with_context(|| format!("loading manifest under {}", devices_folder.display()))?;
        let outcome = manifest
            .verify(&devices_folder)
            .context("verifying manifest")?;

        println!("Verified: {} files", outcome.verified);
        for path in &outcome.changed {
            println!("  changed:   {}", path);
        }
        for path in &outcome.missing {
            println!("  missing:   {}", path);
        }
        for path in &outcome.untracked {
            println!("  untracked: {}", path);
        }

        if outcome.is_clean() {
            println!("All checksums verified");
            Ok(())
        } else {
            std::process::exit(1);
        }
    } else {
        let manifest = ChecksumManifest::build(&devices_folder)
            .with_context(|| format!("building manifest under {}", devices_folder.display()))?;
        let manifest_path = manifest.save(&devices_folder).context("saving manifest")?;

        info!("manifest saved to {}", manifest_path.display());
        println!("Manifest saved to {}", manifest_path.display());
        println!("Files: {}", manifest.files.len());
        println!("Aggregate digest: {}", manifest.aggregate);
        Ok(())
    }
}
