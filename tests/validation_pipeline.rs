//! End-to-end validation scenarios over real directory trees.
//!
//! These tests exercise the full pipeline the way CI does: write preset
//! files under a temporary repository root, validate a batch, and inspect
//! the aggregated report.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::json;
use tempfile::tempdir;

use midi_presets::config::ValidationConfig;
use midi_presets::validator::{validate_batch, validate_file, BatchContext, IssueKind};

fn valid_document() -> serde_json::Value {
    json!({
        "_metadata": {
            "schema_version": "1.0.0",
            "file_revision": 1,
            "created_date": "2024-01-01T00:00:00Z",
            "modified_date": "2024-06-01T00:00:00Z"
        },
        "device_info": {
            "name": "Acme Synth",
            "manufacturer": "Acme",
            "manufacturer_id": 65
        },
        "preset_collections": {
            "default": {
                "metadata": { "name": "Factory", "preset_count": 1 },
                "presets": [
                    { "id": "p1", "name": "Lead", "params": [[0, 32], [32, 1]] }
                ],
                "preset_metadata": {
                    "p1": { "version": "1.0", "source": "factory" }
                }
            }
        }
    })
}

fn write_file(root: &Path, relative: &str, content: &str) -> PathBuf {
    let full = root.join(relative);
    fs::create_dir_all(full.parent().unwrap()).unwrap();
    fs::write(&full, content).unwrap();
    PathBuf::from(relative)
}

fn write_document(root: &Path, relative: &str, doc: &serde_json::Value) -> PathBuf {
    write_file(root, relative, &serde_json::to_string_pretty(doc).unwrap())
}

#[test]
fn valid_batch_passes_with_zero_errors() {
    let dir = tempdir().unwrap();
    let a = write_document(dir.path(), "devices/acme/factory.json", &valid_document());
    let b = write_document(dir.path(), "devices/other/factory.json", &valid_document());

    let report = validate_batch(
        &[a, b],
        dir.path(),
        &ValidationConfig::default(),
        &BatchContext::default(),
    );

    assert!(report.passed());
    assert_eq!(report.error_count(), 0);
    assert_eq!(report.files.len(), 2);
}

#[test]
fn out_of_range_value_yields_one_business_rule_error() {
    let dir = tempdir().unwrap();
    let mut doc = valid_document();
    doc["preset_collections"]["default"]["presets"][0]["params"] = json!([[1, 200]]);
    let path = write_document(dir.path(), "devices/acme/factory.json", &doc);

    let report = validate_batch(
        &[path],
        dir.path(),
        &ValidationConfig::default(),
        &BatchContext::default(),
    );

    assert!(!report.passed());
    let errors: Vec<_> = report.files[0]
        .issues
        .iter()
        .filter(|i| i.is_error())
        .collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, IssueKind::BusinessRule);
    assert!(errors[0].message.contains("200"));
    assert!(errors[0].message.contains("'p1'"));
}

#[test]
fn duplicate_preset_id_flags_second_occurrence() {
    let dir = tempdir().unwrap();
    let mut doc = valid_document();
    doc["preset_collections"]["default"]["presets"] = json!([
        { "id": "p1", "name": "First", "params": [] },
        { "id": "p1", "name": "Second", "params": [] }
    ]);
    doc["preset_collections"]["default"]["metadata"]["preset_count"] = json!(2);
    let path = write_document(dir.path(), "devices/acme/factory.json", &doc);

    let report = validate_batch(
        &[path],
        dir.path(),
        &ValidationConfig::default(),
        &BatchContext::default(),
    );

    let duplicates: Vec<_> = report.files[0]
        .issues
        .iter()
        .filter(|i| i.message.contains("duplicate"))
        .collect();
    assert_eq!(duplicates.len(), 1);
    assert!(duplicates[0].message.contains("position 1"));
}

#[test]
fn oversized_file_is_rejected_without_parsing() {
    let dir = tempdir().unwrap();
    // 4 MiB of garbage that would fail parsing if it were ever read
    let garbage = "not json ".repeat(4 * 1024 * 1024 / 9 + 1);
    let path = write_file(dir.path(), "devices/a/b.json", &garbage);

    let report = validate_batch(
        &[path],
        dir.path(),
        &ValidationConfig::default(),
        &BatchContext::default(),
    );

    assert!(!report.passed());
    let issues = &report.files[0].issues;
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].kind, IssueKind::Policy);
    assert!(issues[0].message.contains("exceeds"));
}

#[test]
fn deep_path_is_rejected_without_reading_content() {
    let dir = tempdir().unwrap();
    // Depth 5 below devices/; content stays unread, so garbage is fine
    let path = write_file(dir.path(), "devices/a/b/c/d/e/file.json", "garbage");

    let report = validate_batch(
        &[path],
        dir.path(),
        &ValidationConfig::default(),
        &BatchContext::default(),
    );

    assert!(!report.passed());
    let issues = &report.files[0].issues;
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].kind, IssueKind::Policy);
    assert!(issues[0].message.contains("depth"));
}

#[test]
fn path_outside_devices_is_rejected() {
    let dir = tempdir().unwrap();
    let path = write_file(dir.path(), "presets/acme/factory.json", "{}");

    let report = validate_batch(
        &[path],
        dir.path(),
        &ValidationConfig::default(),
        &BatchContext::default(),
    );

    assert!(!report.passed());
    assert_eq!(report.files[0].issues[0].kind, IssueKind::Policy);
}

#[test]
fn malformed_json_is_a_single_parse_error() {
    let dir = tempdir().unwrap();
    let path = write_file(dir.path(), "devices/acme/broken.json", "{\"invalid\": json}");

    let report = validate_batch(
        &[path],
        dir.path(),
        &ValidationConfig::default(),
        &BatchContext::default(),
    );

    assert!(!report.passed());
    let issues = &report.files[0].issues;
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].kind, IssueKind::Parse);
}

#[test]
fn missing_file_is_an_io_error_and_batch_continues() {
    let dir = tempdir().unwrap();
    let good = write_document(dir.path(), "devices/acme/factory.json", &valid_document());
    let missing = PathBuf::from("devices/acme/ghost.json");

    let report = validate_batch(
        &[missing, good],
        dir.path(),
        &ValidationConfig::default(),
        &BatchContext::default(),
    );

    assert!(!report.passed());
    assert_eq!(report.files.len(), 2);
    assert_eq!(report.files[0].issues[0].kind, IssueKind::Io);
    assert!(report.files[1].passed());
}

#[test]
fn security_finding_does_not_block_other_checks() {
    let dir = tempdir().unwrap();
    let mut doc = valid_document();
    // Suspicious pattern in a string field plus an out-of-range value: both
    // must be reported in one pass
    doc["device_info"]["name"] = json!("eval(danger)");
    doc["preset_collections"]["default"]["presets"][0]["params"] = json!([[1, 200]]);
    let path = write_document(dir.path(), "devices/acme/factory.json", &doc);

    let report = validate_batch(
        &[path],
        dir.path(),
        &ValidationConfig::default(),
        &BatchContext::default(),
    );

    let issues = &report.files[0].issues;
    assert!(issues.iter().any(|i| i.kind == IssueKind::Security));
    assert!(issues.iter().any(|i| i.kind == IssueKind::BusinessRule));
}

#[test]
fn structure_errors_suppress_business_rules() {
    let dir = tempdir().unwrap();
    // Missing device_info entirely; presets carry an out-of-range value that
    // business rules would flag, but they must not run
    let doc = json!({
        "_metadata": { "schema_version": "1.0.0", "file_revision": 1 },
        "preset_collections": {
            "default": {
                "presets": [{ "id": "p1", "name": "L", "params": [[1, 999]] }],
                "preset_metadata": { "p1": {} }
            }
        }
    });
    let path = write_document(dir.path(), "devices/acme/factory.json", &doc);

    let report = validate_batch(
        &[path],
        dir.path(),
        &ValidationConfig::default(),
        &BatchContext::default(),
    );

    let issues = &report.files[0].issues;
    assert!(issues.iter().any(|i| i.kind == IssueKind::Structure));
    assert!(!issues.iter().any(|i| i.kind == IssueKind::BusinessRule));
}

#[test]
fn round_trip_of_valid_document_stays_clean() {
    let dir = tempdir().unwrap();
    let path = write_document(dir.path(), "devices/acme/factory.json", &valid_document());

    let config = ValidationConfig::default();
    let first = validate_file(&path, dir.path(), &config, None);
    assert!(first.passed());
    assert!(first.issues.is_empty());

    // Re-serialize through the typed model and validate again
    let bytes = fs::read(dir.path().join(&path)).unwrap();
    let doc: midi_presets::model::DeviceDocument = serde_json::from_slice(&bytes).unwrap();
    let reserialized = serde_json::to_string_pretty(&doc).unwrap();
    let path2 = write_file(dir.path(), "devices/acme/roundtrip.json", &reserialized);

    let second = validate_file(&path2, dir.path(), &config, None);
    assert!(second.issues.is_empty());
}

#[test]
fn revision_decrease_warns_but_still_passes() {
    let dir = tempdir().unwrap();
    let path = write_document(dir.path(), "devices/acme/factory.json", &valid_document());

    let mut ctx = BatchContext::default();
    ctx.prior_revisions
        .insert("devices/acme/factory.json".to_string(), 9);

    let report = validate_batch(&[path], dir.path(), &ValidationConfig::default(), &ctx);

    assert!(report.passed());
    assert_eq!(report.files[0].warning_count(), 1);
    assert!(report.files[0].issues[0].message.contains("lower than previously recorded"));
}

#[test]
fn concurrent_batch_preserves_input_order() {
    let dir = tempdir().unwrap();

    let mut paths = Vec::new();
    for i in 0..12 {
        let relative = format!("devices/dev{}/factory.json", i);
        let doc = if i % 3 == 0 {
            let mut bad = valid_document();
            bad["preset_collections"]["default"]["presets"][0]["params"] = json!([[1, 300 + i]]);
            bad
        } else {
            valid_document()
        };
        paths.push(write_document(dir.path(), &relative, &doc));
    }

    let mut sequential_config = ValidationConfig::default();
    sequential_config.concurrency = 1;
    let mut parallel_config = ValidationConfig::default();
    parallel_config.concurrency = 4;

    let sequential = validate_batch(&paths, dir.path(), &sequential_config, &BatchContext::default());
    let parallel = validate_batch(&paths, dir.path(), &parallel_config, &BatchContext::default());

    assert_eq!(sequential.files.len(), parallel.files.len());
    for (s, p) in sequential.files.iter().zip(parallel.files.iter()) {
        assert_eq!(s.path, p.path);
        assert_eq!(s.issues.len(), p.issues.len());
        for (si, pi) in s.issues.iter().zip(p.issues.iter()) {
            assert_eq!(si.message, pi.message);
        }
    }
}
