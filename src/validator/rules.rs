//! Cross-field business rules over a structurally valid document.
//!
//! Every check runs even when earlier ones found problems, so one report
//! surfaces everything. Checks assume the typed model deserialized cleanly;
//! the orchestrator only calls in here after structure validation produced
//! no errors.

use std::collections::HashSet;

use log::debug;

use crate::model::{DeviceDocument, PresetCollection};

use super::{IssueKind, ValidationIssue};

/// Lowest valid MIDI controller number or value
pub const MIDI_MIN: i64 = 0;

/// Highest valid MIDI controller number or value
pub const MIDI_MAX: i64 = 127;

/// Run all business rules against a document.
///
/// `prior_revision` is the last `file_revision` the caller has on record for
/// this file, when available; the validator keeps no history of its own, so
/// monotonicity is only checked when the caller supplies one and is always a
/// warning.
pub fn validate_rules(
    doc: &DeviceDocument,
    prior_revision: Option<u64>,
) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    for (name, collection) in &doc.preset_collections {
        check_collection_name(name, &mut issues);
        check_midi_ranges(name, collection, &mut issues);
        check_preset_id_uniqueness(name, collection, &mut issues);
        check_metadata_consistency(name, collection, &mut issues);
        check_preset_count(name, collection, &mut issues);
    }

    check_revision_monotonicity(doc, prior_revision, &mut issues);

    debug!(
        "business rules over {} collections, {} presets: {} findings",
        doc.preset_collections.len(),
        doc.preset_count(),
        issues.len()
    );

    issues
}

/// Every controller and value must lie in the MIDI range 0..=127
fn check_midi_ranges(name: &str, collection: &PresetCollection, issues: &mut Vec<ValidationIssue>) {
    for (pi, preset) in collection.presets.iter().enumerate() {
        for (index, &(controller, value)) in preset.params.iter().enumerate() {
            let field = format!("preset_collections.{}.presets[{}].params[{}]", name, pi, index);
            if !(MIDI_MIN..=MIDI_MAX).contains(&controller) {
                issues.push(
                    ValidationIssue::error(
                        IssueKind::BusinessRule,
                        format!(
                            "controller {} at param {} of preset '{}' outside MIDI range {}..={}",
                            controller, index, preset.id, MIDI_MIN, MIDI_MAX
                        ),
                    )
                    .with_field(field.clone()),
                );
            }
            if !(MIDI_MIN..=MIDI_MAX).contains(&value) {
                issues.push(
                    ValidationIssue::error(
                        IssueKind::BusinessRule,
                        format!(
                            "value {} at param {} of preset '{}' outside MIDI range {}..={}",
                            value, index, preset.id, MIDI_MIN, MIDI_MAX
                        ),
                    )
                    .with_field(field),
                );
            }
        }
    }
}

/// No two presets in one collection may share an ID; the first occurrence is
/// the original, later ones are flagged with their position
fn check_preset_id_uniqueness(
    name: &str,
    collection: &PresetCollection,
    issues: &mut Vec<ValidationIssue>,
) {
    let mut seen: HashSet<&str> = HashSet::new();
    for (position, preset) in collection.presets.iter().enumerate() {
        if !seen.insert(preset.id.as_str()) {
            issues.push(
                ValidationIssue::error(
                    IssueKind::BusinessRule,
                    format!(
                        "duplicate preset id '{}' at position {} in collection '{}'",
                        preset.id, position, name
                    ),
                )
                .with_field(format!("preset_collections.{}.presets[{}].id", name, position)),
            );
        }
    }
}

/// Referential integrity between `presets` and `preset_metadata`, both ways
fn check_metadata_consistency(
    name: &str,
    collection: &PresetCollection,
    issues: &mut Vec<ValidationIssue>,
) {
    let preset_ids: HashSet<&str> = collection.presets.iter().map(|p| p.id.as_str()).collect();

    for preset in &collection.presets {
        if !collection.preset_metadata.contains_key(&preset.id) {
            issues.push(
                ValidationIssue::error(
                    IssueKind::BusinessRule,
                    format!(
                        "preset '{}' has no entry in preset_metadata of collection '{}'",
                        preset.id, name
                    ),
                )
                .with_field(format!("preset_collections.{}.preset_metadata", name)),
            );
        }
    }

    for id in collection.preset_metadata.keys() {
        if !preset_ids.contains(id.as_str()) {
            issues.push(
                ValidationIssue::error(
                    IssueKind::BusinessRule,
                    format!(
                        "orphan preset_metadata entry '{}' in collection '{}' has no preset",
                        id, name
                    ),
                )
                .with_field(format!("preset_collections.{}.preset_metadata.{}", name, id)),
            );
        }
    }
}

/// Collection names follow the same charset as directory names
fn check_collection_name(name: &str, issues: &mut Vec<ValidationIssue>) {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if !valid {
        issues.push(
            ValidationIssue::warning(
                IssueKind::BusinessRule,
                format!(
                    "collection name '{}' is not alphanumeric with '_'/'-'",
                    name
                ),
            )
            .with_field(format!("preset_collections.{}", name)),
        );
    }
}

/// Declared preset_count should match the actual number of presets
fn check_preset_count(name: &str, collection: &PresetCollection, issues: &mut Vec<ValidationIssue>) {
    let declared = collection
        .metadata
        .as_ref()
        .and_then(|m| m.preset_count);
    if let Some(declared) = declared {
        let actual = collection.presets.len() as u64;
        if declared != actual {
            issues.push(
                ValidationIssue::warning(
                    IssueKind::BusinessRule,
                    format!(
                        "collection '{}' declares {} presets but contains {}",
                        name, declared, actual
                    ),
                )
                .with_field(format!("preset_collections.{}.metadata.preset_count", name)),
            );
        }
    }
}

/// file_revision should not decrease relative to the caller's recorded value
fn check_revision_monotonicity(
    doc: &DeviceDocument,
    prior_revision: Option<u64>,
    issues: &mut Vec<ValidationIssue>,
) {
    if let Some(prior) = prior_revision {
        if doc.metadata.file_revision < prior {
            issues.push(
                ValidationIssue::warning(
                    IssueKind::BusinessRule,
                    format!(
                        "file_revision {} is lower than previously recorded {}",
                        doc.metadata.file_revision, prior
                    ),
                )
                .with_field("_metadata.file_revision"),
            );
        }
    }
}
