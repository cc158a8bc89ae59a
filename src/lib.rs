//! # midi-presets - Preset Repository Validation Core
//!
//! `midi_presets` is the validation and checksum engine behind a
//! community-maintained repository of MIDI device preset files. Contributors
//! open pull requests adding or changing JSON preset files; CI calls into
//! this crate to answer one question per file: *is this content valid?*
//!
//! ## Key Features
//!
//! - **Multi-layer validation pipeline**: repository policy (path, depth,
//!   size), security scanning of raw text, JSON structural validation, and
//!   cross-field business rules, aggregated into one report with complete
//!   diagnostics per file.
//!
//! - **Rule-as-data security scanning**: suspicious-content patterns are a
//!   data table, applied uniformly before JSON parsing so malformed-but-
//!   malicious payloads are still caught.
//!
//! - **Forward-compatible schema**: known fields are validated against an
//!   allow-list; unknown fields pass through unexamined, so additive schema
//!   changes never break older validators.
//!
//! - **Deterministic checksums**: SHA-256 per file plus one aggregate
//!   manifest digest computed over the sorted path/digest sequence,
//!   independent of input or enumeration order.
//!
//! - **Deterministic concurrency**: batches may fan out to a bounded worker
//!   pool, but reports always come back in the caller's input order.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::path::{Path, PathBuf};
//! use midi_presets::config::ValidationConfig;
//! use midi_presets::validator::{validate_batch, BatchContext};
//!
//! let paths = vec![
//!     PathBuf::from("devices/acme/factory.json"),
//!     PathBuf::from("devices/acme/user_bank.json"),
//! ];
//! let config = ValidationConfig::default();
//! let report = validate_batch(&paths, Path::new("."), &config, &BatchContext::default());
//!
//! println!("{}", report);
//! std::process::exit(if report.passed() { 0 } else { 1 });
//! ```
//!
//! ## Document Shape
//!
//! One JSON file describes one device:
//!
//! | Field | Type | Required | Description |
//! |-------|------|----------|-------------|
//! | `_metadata.schema_version` | string | Yes | Semantic version `X.Y.Z` |
//! | `_metadata.file_revision` | integer | Yes | Non-negative revision counter |
//! | `_metadata.created_date` | string | No | ISO-8601 timestamp |
//! | `_metadata.modified_date` | string | No | ISO-8601 timestamp |
//! | `device_info.name` | string | Yes | Non-empty device name |
//! | `device_info.manufacturer` | string | Yes | Non-empty manufacturer |
//! | `preset_collections` | object | Yes | Collection name → collection |
//! | `…presets[].id` | string | Yes | Unique within the collection |
//! | `…presets[].params` | array | Yes | `[controller, value]` pairs, 0-127 |
//! | `…preset_metadata` | object | Yes | Preset ID → bookkeeping metadata |
//!
//! Repository policy: files live under `devices/`, at most 4 directory
//! levels below it, at most 3 MiB each. Policy violations are decided from
//! path and size metadata without reading content.
//!
//! ## Architecture
//!
//! - [`validator`]: validation pipeline, batch orchestrator and report types
//! - [`scanner`]: security pattern scanning over raw text
//! - [`model`]: serde document model
//! - [`checksum`]: SHA-256 digests and the repository manifest
//! - [`config`]: policy constants and runtime configuration

// Documentation lints - enforce complete documentation for publication
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod checksum;
pub mod config;
pub mod model;
pub mod scanner;
pub mod validator;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::checksum::{
        compute_digest, ChecksumError, ChecksumManifest, ChecksumRecord, VerifyOutcome,
    };
    pub use crate::config::ValidationConfig;
    pub use crate::model::{
        CollectionMetadata, DeviceDocument, DeviceInfo, FileMetadata, Preset, PresetCollection,
        PresetMetadata,
    };
    pub use crate::scanner::{scan, ScanRule, SCAN_RULES};
    pub use crate::validator::{
        validate_batch, validate_file, BatchContext, FileReport, IssueKind, Severity,
        ValidationIssue, ValidationReport,
    };
}
