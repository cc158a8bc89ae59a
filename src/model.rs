//! Document model for MIDI device preset files.
//!
//! One JSON file describes one device: a `_metadata` block, a `device_info`
//! block, and a mapping of named preset collections. The model is rebuilt
//! from file bytes on every validation call; nothing is cached across runs.
//!
//! Unknown fields are tolerated everywhere so that older validators keep
//! working when newer files carry additive fields. Only the fields below are
//! inspected; everything else passes through unexamined.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Root entity for one preset file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceDocument {
    /// File-level metadata block
    #[serde(rename = "_metadata")]
    pub metadata: FileMetadata,

    /// Device identification block
    pub device_info: DeviceInfo,

    /// Named preset collections; map keys are collection names, unique by
    /// construction
    pub preset_collections: BTreeMap<String, PresetCollection>,
}

impl DeviceDocument {
    /// Total number of presets across all collections
    pub fn preset_count(&self) -> usize {
        self.preset_collections
            .values()
            .map(|c| c.presets.len())
            .sum()
    }
}

/// File-level metadata: schema version, revision, timestamps
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileMetadata {
    /// Semantic version of the document schema (`MAJOR.MINOR.PATCH`)
    pub schema_version: String,

    /// Monotonically increasing file revision
    pub file_revision: u64,

    /// ISO-8601 creation timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_date: Option<String>,

    /// ISO-8601 last-modified timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_date: Option<String>,

    /// Contributor who created the file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,

    /// Contributor who last modified the file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_by: Option<String>,
}

/// Device identification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceInfo {
    /// Device name, non-empty
    pub name: String,

    /// Manufacturer name, non-empty
    pub manufacturer: String,

    /// Firmware or hardware version string
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// MIDI manufacturer system-exclusive ID (0-127)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manufacturer_id: Option<i64>,

    /// Device ID on the MIDI bus (0-127)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_id: Option<i64>,
}

/// One named collection of presets plus per-preset metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresetCollection {
    /// Descriptive collection metadata
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<CollectionMetadata>,

    /// Ordered preset entries
    pub presets: Vec<Preset>,

    /// Per-preset metadata, keyed by preset ID
    pub preset_metadata: BTreeMap<String, PresetMetadata>,
}

/// Descriptive metadata for a collection
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CollectionMetadata {
    /// Display name of the collection
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Collection author
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    /// Collection revision counter
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<u64>,

    /// Declared number of presets; checked against the actual count
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preset_count: Option<u64>,
}

/// A named set of MIDI controller/value assignments
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Preset {
    /// Preset identifier, unique within its collection
    pub id: String,

    /// Display name
    pub name: String,

    /// Ordered parameter assignments as (controller, value) pairs.
    /// Modeled as i64 so out-of-range values survive deserialization and can
    /// be reported instead of rejected at parse time.
    pub params: Vec<(i64, i64)>,

    /// Free-form category tag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// Per-preset bookkeeping metadata
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PresetMetadata {
    /// Preset version string
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Where the preset came from (factory, user, imported, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    /// ISO-8601 creation timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_date: Option<String>,

    /// ISO-8601 last-modified timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_date: Option<String>,
}
