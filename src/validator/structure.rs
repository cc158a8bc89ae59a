//! Structural validation of a parsed preset document.
//!
//! Works on the raw `serde_json::Value` tree rather than the typed model so
//! every discrepancy can be enumerated in one pass instead of stopping at
//! serde's first error. Known fields are checked for type, pattern and
//! range; unknown fields are passed through unexamined (forward-compatible
//! allow-list).

use chrono::DateTime;
use serde_json::Value;

use super::{IssueKind, ValidationIssue};

/// Top-level keys every document must carry
const REQUIRED_KEYS: &[&str] = &["_metadata", "device_info", "preset_collections"];

/// Validate the document structure, returning every discrepancy found.
///
/// The caller is expected to have parsed the JSON already; a parse failure is
/// its own terminal issue and never reaches this function.
pub fn validate_structure(doc: &Value) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    let Some(root) = doc.as_object() else {
        issues.push(ValidationIssue::error(
            IssueKind::Structure,
            "document root must be a JSON object",
        ));
        return issues;
    };

    // Enumerate all missing keys, not just the first
    for key in REQUIRED_KEYS {
        if !root.contains_key(*key) {
            issues.push(
                ValidationIssue::error(
                    IssueKind::Structure,
                    format!("missing required top-level key '{}'", key),
                )
                .with_field(*key),
            );
        }
    }

    if let Some(metadata) = root.get("_metadata") {
        check_metadata(metadata, &mut issues);
    }
    if let Some(device_info) = root.get("device_info") {
        check_device_info(device_info, &mut issues);
    }
    if let Some(collections) = root.get("preset_collections") {
        check_collections(collections, &mut issues);
    }

    issues
}

fn check_metadata(metadata: &Value, issues: &mut Vec<ValidationIssue>) {
    let Some(obj) = metadata.as_object() else {
        issues.push(
            ValidationIssue::error(IssueKind::Structure, "'_metadata' must be an object")
                .with_field("_metadata"),
        );
        return;
    };

    match obj.get("schema_version") {
        Some(Value::String(version)) if is_semver(version) => {}
        Some(Value::String(version)) => issues.push(
            ValidationIssue::error(
                IssueKind::Structure,
                format!("schema_version '{}' is not MAJOR.MINOR.PATCH", version),
            )
            .with_field("_metadata.schema_version"),
        ),
        Some(_) => issues.push(
            ValidationIssue::error(IssueKind::Structure, "schema_version must be a string")
                .with_field("_metadata.schema_version"),
        ),
        None => issues.push(
            ValidationIssue::error(IssueKind::Structure, "missing required field schema_version")
                .with_field("_metadata.schema_version"),
        ),
    }

    match obj.get("file_revision") {
        Some(value) if value.as_u64().is_some() => {}
        Some(_) => issues.push(
            ValidationIssue::error(
                IssueKind::Structure,
                "file_revision must be a non-negative integer",
            )
            .with_field("_metadata.file_revision"),
        ),
        None => issues.push(
            ValidationIssue::error(IssueKind::Structure, "missing required field file_revision")
                .with_field("_metadata.file_revision"),
        ),
    }

    for key in ["created_date", "modified_date"] {
        if let Some(value) = obj.get(key) {
            check_timestamp(value, &format!("_metadata.{}", key), issues);
        }
    }
}

fn check_device_info(device_info: &Value, issues: &mut Vec<ValidationIssue>) {
    let Some(obj) = device_info.as_object() else {
        issues.push(
            ValidationIssue::error(IssueKind::Structure, "'device_info' must be an object")
                .with_field("device_info"),
        );
        return;
    };

    for key in ["name", "manufacturer"] {
        let field = format!("device_info.{}", key);
        match obj.get(key) {
            Some(Value::String(s)) if !s.trim().is_empty() => {}
            Some(Value::String(_)) => issues.push(
                ValidationIssue::error(IssueKind::Structure, format!("{} must not be empty", key))
                    .with_field(field),
            ),
            Some(_) => issues.push(
                ValidationIssue::error(IssueKind::Structure, format!("{} must be a string", key))
                    .with_field(field),
            ),
            None => issues.push(
                ValidationIssue::error(
                    IssueKind::Structure,
                    format!("missing required field {}", key),
                )
                .with_field(field),
            ),
        }
    }

    for key in ["manufacturer_id", "device_id"] {
        if let Some(value) = obj.get(key) {
            let in_range = value.as_i64().is_some_and(|v| (0..=127).contains(&v));
            if !in_range {
                issues.push(
                    ValidationIssue::error(
                        IssueKind::Structure,
                        format!("{} must be an integer in 0..=127", key),
                    )
                    .with_field(format!("device_info.{}", key)),
                );
            }
        }
    }
}

fn check_collections(collections: &Value, issues: &mut Vec<ValidationIssue>) {
    let Some(map) = collections.as_object() else {
        issues.push(
            ValidationIssue::error(
                IssueKind::Structure,
                "'preset_collections' must be an object mapping names to collections",
            )
            .with_field("preset_collections"),
        );
        return;
    };

    if map.is_empty() {
        issues.push(
            ValidationIssue::error(
                IssueKind::Structure,
                "at least one preset collection is required",
            )
            .with_field("preset_collections"),
        );
        return;
    }

    for (name, collection) in map {
        check_collection(name, collection, issues);
    }
}

fn check_collection(name: &str, collection: &Value, issues: &mut Vec<ValidationIssue>) {
    let base = format!("preset_collections.{}", name);

    let Some(obj) = collection.as_object() else {
        issues.push(
            ValidationIssue::error(
                IssueKind::Structure,
                format!("collection '{}' must be an object", name),
            )
            .with_field(base),
        );
        return;
    };

    match obj.get("presets") {
        Some(Value::Array(presets)) => {
            for (index, preset) in presets.iter().enumerate() {
                check_preset(&base, index, preset, issues);
            }
        }
        Some(_) => issues.push(
            ValidationIssue::error(
                IssueKind::Structure,
                format!("'presets' in collection '{}' must be an array", name),
            )
            .with_field(format!("{}.presets", base)),
        ),
        None => issues.push(
            ValidationIssue::error(
                IssueKind::Structure,
                format!("collection '{}' is missing required field presets", name),
            )
            .with_field(format!("{}.presets", base)),
        ),
    }

    match obj.get("preset_metadata") {
        Some(Value::Object(_)) => {}
        Some(_) => issues.push(
            ValidationIssue::error(
                IssueKind::Structure,
                format!("'preset_metadata' in collection '{}' must be an object", name),
            )
            .with_field(format!("{}.preset_metadata", base)),
        ),
        None => issues.push(
            ValidationIssue::error(
                IssueKind::Structure,
                format!("collection '{}' is missing required field preset_metadata", name),
            )
            .with_field(format!("{}.preset_metadata", base)),
        ),
    }
}

fn check_preset(base: &str, index: usize, preset: &Value, issues: &mut Vec<ValidationIssue>) {
    let preset_path = format!("{}.presets[{}]", base, index);

    let Some(obj) = preset.as_object() else {
        issues.push(
            ValidationIssue::error(IssueKind::Structure, "preset entry must be an object")
                .with_field(preset_path),
        );
        return;
    };

    for key in ["id", "name"] {
        match obj.get(key) {
            Some(Value::String(s)) if !s.trim().is_empty() => {}
            Some(_) | None => issues.push(
                ValidationIssue::error(
                    IssueKind::Structure,
                    format!("preset {} must be a non-empty string", key),
                )
                .with_field(format!("{}.{}", preset_path, key)),
            ),
        }
    }

    match obj.get("params") {
        Some(Value::Array(params)) => {
            for (pi, pair) in params.iter().enumerate() {
                let well_formed = pair
                    .as_array()
                    .is_some_and(|p| p.len() == 2 && p.iter().all(|v| v.as_i64().is_some()));
                if !well_formed {
                    issues.push(
                        ValidationIssue::error(
                            IssueKind::Structure,
                            "parameter entry must be a pair of integers",
                        )
                        .with_field(format!("{}.params[{}]", preset_path, pi)),
                    );
                }
            }
        }
        Some(_) | None => issues.push(
            ValidationIssue::error(
                IssueKind::Structure,
                "preset params must be an array of [controller, value] pairs",
            )
            .with_field(format!("{}.params", preset_path)),
        ),
    }
}

fn check_timestamp(value: &Value, field: &str, issues: &mut Vec<ValidationIssue>) {
    let valid = value
        .as_str()
        .is_some_and(|s| DateTime::parse_from_rfc3339(s).is_ok());
    if !valid {
        issues.push(
            ValidationIssue::error(
                IssueKind::Structure,
                format!("{} must be an ISO-8601 timestamp", field),
            )
            .with_field(field),
        );
    }
}

/// Numeric MAJOR.MINOR.PATCH check, no prerelease or build suffixes
fn is_semver(version: &str) -> bool {
    let parts: Vec<&str> = version.split('.').collect();
    parts.len() == 3
        && parts
            .iter()
            .all(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit()))
}
