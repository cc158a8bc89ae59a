//! Content digests and the repository checksum manifest.
//!
//! Every preset file gets a SHA-256 digest, and the manifest carries one
//! aggregate digest computed over the sorted `(path, digest)` sequence. The
//! aggregate is a pure function of file content: permuting the input order or
//! changing filesystem enumeration order never changes it.
//!
//! The manifest is persisted as pretty-printed JSON (`_manifest.json`) so a
//! reviewer can diff it by hand.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Identifier of the digest algorithm used throughout
pub const DIGEST_ALGORITHM: &str = "sha256";

/// File name the manifest is persisted under, excluded from its own digests
pub const MANIFEST_FILE_NAME: &str = "_manifest.json";

/// Version of the manifest format itself
pub const MANIFEST_VERSION: &str = "1.0.0";

/// Errors from manifest building, loading and verification.
///
/// I/O failures are kept distinct from content concerns: an unreadable file
/// is an error here, never a silently skipped entry.
#[derive(Debug, thiserror::Error)]
pub enum ChecksumError {
    /// A file or directory could not be read
    #[error("failed to read {path}: {source}")]
    Io {
        /// Path that failed
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Manifest JSON could not be parsed or written
    #[error("manifest serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// No manifest file at the expected location
    #[error("manifest not found at {0}")]
    MissingManifest(PathBuf),
}

/// Compute the SHA-256 digest of a byte slice as lowercase hex
pub fn compute_digest(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

/// Digest record for one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecksumRecord {
    /// Lowercase hex SHA-256 digest of the file content
    pub digest: String,
    /// Algorithm identifier (`sha256`)
    pub algorithm: String,
    /// File size in bytes
    pub size_bytes: u64,
}

/// Outcome of verifying a manifest against the current tree
#[derive(Debug, Default)]
pub struct VerifyOutcome {
    /// Files whose digest matched
    pub verified: usize,
    /// Files whose content changed since the manifest was written
    pub changed: Vec<String>,
    /// Files listed in the manifest but absent from the tree
    pub missing: Vec<String>,
    /// Files present in the tree but not listed in the manifest
    pub untracked: Vec<String>,
}

impl VerifyOutcome {
    /// True iff the tree matches the manifest exactly
    pub fn is_clean(&self) -> bool {
        self.changed.is_empty() && self.missing.is_empty() && self.untracked.is_empty()
    }
}

/// Repository checksum manifest: per-file records plus one aggregate digest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChecksumManifest {
    /// Manifest format version
    pub manifest_version: String,
    /// UTC timestamp the manifest was generated at
    pub generated_date: String,
    /// Digest algorithm identifier
    pub algorithm: String,
    /// Per-file records, keyed by `/`-separated relative path (sorted)
    pub files: BTreeMap<String, ChecksumRecord>,
    /// Aggregate digest over the sorted (path, digest) sequence
    pub aggregate: String,
}

impl ChecksumManifest {
    /// Build a manifest from in-memory path/content pairs.
    ///
    /// Paths are treated as `/`-separated relative paths; the map's sorted
    /// iteration order fixes the aggregate independent of how the caller
    /// collected the entries.
    pub fn build_from_bytes(entries: &BTreeMap<String, Vec<u8>>) -> Self {
        let files: BTreeMap<String, ChecksumRecord> = entries
            .iter()
            .map(|(path, bytes)| {
                (
                    path.clone(),
                    ChecksumRecord {
                        digest: compute_digest(bytes),
                        algorithm: DIGEST_ALGORITHM.to_string(),
                        size_bytes: bytes.len() as u64,
                    },
                )
            })
            .collect();

        let aggregate = aggregate_digest(&files);

        Self {
            manifest_version: MANIFEST_VERSION.to_string(),
            generated_date: Utc::now().to_rfc3339(),
            algorithm: DIGEST_ALGORITHM.to_string(),
            files,
            aggregate,
        }
    }

    /// Build a manifest by walking `*.json` files under `root`.
    ///
    /// The manifest file itself is excluded. Any unreadable file aborts the
    /// build with [`ChecksumError::Io`].
    pub fn build(root: &Path) -> Result<Self, ChecksumError> {
        let mut entries = BTreeMap::new();

        for path in collect_json_files(root)? {
            let bytes = fs::read(&path).map_err(|source| ChecksumError::Io {
                path: path.clone(),
                source,
            })?;
            let relative = relative_key(root, &path);
            debug!("digesting {} ({} bytes)", relative, bytes.len());
            entries.insert(relative, bytes);
        }

        let manifest = Self::build_from_bytes(&entries);
        info!(
            "built manifest over {} files, aggregate {}",
            manifest.files.len(),
            &manifest.aggregate[..16]
        );
        Ok(manifest)
    }

    /// Load a manifest from the canonical location under `root`
    pub fn load(root: &Path) -> Result<Self, ChecksumError> {
        let manifest_path = root.join(MANIFEST_FILE_NAME);
        if !manifest_path.exists() {
            return Err(ChecksumError::MissingManifest(manifest_path));
        }
        let content = fs::read_to_string(&manifest_path).map_err(|source| ChecksumError::Io {
            path: manifest_path,
            source,
        })?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Persist the manifest as pretty JSON under `root`
    pub fn save(&self, root: &Path) -> Result<PathBuf, ChecksumError> {
        let manifest_path = root.join(MANIFEST_FILE_NAME);
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        fs::write(&manifest_path, json).map_err(|source| ChecksumError::Io {
            path: manifest_path.clone(),
            source,
        })?;
        Ok(manifest_path)
    }

    /// Verify this manifest against the current state of `root`
    pub fn verify(&self, root: &Path) -> Result<VerifyOutcome, ChecksumError> {
        let mut outcome = VerifyOutcome::default();

        for (relative, record) in &self.files {
            let full = root.join(relative);
            if !full.exists() {
                outcome.missing.push(relative.clone());
                continue;
            }
            let bytes = fs::read(&full).map_err(|source| ChecksumError::Io {
                path: full,
                source,
            })?;
            if compute_digest(&bytes) == record.digest {
                outcome.verified += 1;
            } else {
                outcome.changed.push(relative.clone());
            }
        }

        for path in collect_json_files(root)? {
            let relative = relative_key(root, &path);
            if !self.files.contains_key(&relative) {
                outcome.untracked.push(relative);
            }
        }

        info!(
            "manifest verification: {} verified, {} changed, {} missing, {} untracked",
            outcome.verified,
            outcome.changed.len(),
            outcome.missing.len(),
            outcome.untracked.len()
        );
        Ok(outcome)
    }
}

/// Aggregate digest over sorted (path, digest) pairs
fn aggregate_digest(files: &BTreeMap<String, ChecksumRecord>) -> String {
    let mut hasher = Sha256::new();
    for (path, record) in files {
        hasher.update(path.as_bytes());
        hasher.update(record.digest.as_bytes());
    }
    format!("{:x}", hasher.finalize())
}

/// Recursively collect `*.json` files under `root`, excluding the manifest
fn collect_json_files(root: &Path) -> Result<Vec<PathBuf>, ChecksumError> {
    let mut files = Vec::new();
    let mut stack = vec![root.to_path_buf()];

    while let Some(dir) = stack.pop() {
        let entries = fs::read_dir(&dir).map_err(|source| ChecksumError::Io {
            path: dir.clone(),
            source,
        })?;
        for entry in entries {
            let entry = entry.map_err(|source| ChecksumError::Io {
                path: dir.clone(),
                source,
            })?;
            let path = entry.path();
            if path.is_dir() {
                stack.push(path);
            } else if path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
                && path.file_name().is_some_and(|name| name != MANIFEST_FILE_NAME)
            {
                files.push(path);
            }
        }
    }

    Ok(files)
}

/// Relative path key with `/` separators regardless of platform
fn relative_key(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
