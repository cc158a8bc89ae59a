//! Manifest generation and verification against real directory trees.

use std::fs;
use std::path::Path;

use tempfile::tempdir;

use midi_presets::checksum::{ChecksumManifest, MANIFEST_FILE_NAME};

fn write_file(root: &Path, relative: &str, content: &str) {
    let full = root.join(relative);
    fs::create_dir_all(full.parent().unwrap()).unwrap();
    fs::write(&full, content).unwrap();
}

#[test]
fn build_records_every_json_file() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "acme/factory.json", "{\"a\": 1}");
    write_file(dir.path(), "other/user.json", "{\"b\": 2}");
    write_file(dir.path(), "other/notes.txt", "not digested");

    let manifest = ChecksumManifest::build(dir.path()).unwrap();

    assert_eq!(manifest.files.len(), 2);
    assert!(manifest.files.contains_key("acme/factory.json"));
    assert!(manifest.files.contains_key("other/user.json"));
    assert_eq!(manifest.algorithm, "sha256");
    assert_eq!(manifest.aggregate.len(), 64);
    for record in manifest.files.values() {
        assert_eq!(record.digest.len(), 64);
        assert!(record.digest.chars().all(|c| c.is_ascii_hexdigit()));
    }
}

#[test]
fn rebuilding_the_same_tree_gives_the_same_aggregate() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "a/one.json", "{}");
    write_file(dir.path(), "b/two.json", "[]");
    write_file(dir.path(), "b/three.json", "1");

    let first = ChecksumManifest::build(dir.path()).unwrap();
    let second = ChecksumManifest::build(dir.path()).unwrap();

    assert_eq!(first.aggregate, second.aggregate);
    assert_eq!(first.files, second.files);
}

#[test]
fn manifest_excludes_itself_from_digests() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "acme/factory.json", "{}");

    let before = ChecksumManifest::build(dir.path()).unwrap();
    before.save(dir.path()).unwrap();
    let after = ChecksumManifest::build(dir.path()).unwrap();

    assert!(!after.files.contains_key(MANIFEST_FILE_NAME));
    assert_eq!(before.aggregate, after.aggregate);
}

#[test]
fn save_then_load_round_trips() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "acme/factory.json", "{\"x\": true}");

    let built = ChecksumManifest::build(dir.path()).unwrap();
    let path = built.save(dir.path()).unwrap();
    assert!(path.ends_with(MANIFEST_FILE_NAME));

    let loaded = ChecksumManifest::load(dir.path()).unwrap();
    assert_eq!(loaded.aggregate, built.aggregate);
    assert_eq!(loaded.files, built.files);
    assert_eq!(loaded.manifest_version, built.manifest_version);
}

#[test]
fn verify_reports_clean_on_untouched_tree() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "acme/factory.json", "{}");
    write_file(dir.path(), "acme/user.json", "[]");

    let manifest = ChecksumManifest::build(dir.path()).unwrap();
    let outcome = manifest.verify(dir.path()).unwrap();

    assert!(outcome.is_clean());
    assert_eq!(outcome.verified, 2);
}

#[test]
fn verify_detects_changed_missing_and_untracked() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "acme/changed.json", "original");
    write_file(dir.path(), "acme/removed.json", "{}");

    let manifest = ChecksumManifest::build(dir.path()).unwrap();

    write_file(dir.path(), "acme/changed.json", "tampered");
    fs::remove_file(dir.path().join("acme/removed.json")).unwrap();
    write_file(dir.path(), "acme/added.json", "{}");

    let outcome = manifest.verify(dir.path()).unwrap();

    assert!(!outcome.is_clean());
    assert_eq!(outcome.verified, 0);
    assert_eq!(outcome.changed, vec!["acme/changed.json".to_string()]);
    assert_eq!(outcome.missing, vec!["acme/removed.json".to_string()]);
    assert_eq!(outcome.untracked, vec!["acme/added.json".to_string()]);
}

#[test]
fn load_fails_without_a_manifest() {
    let dir = tempdir().unwrap();
    let err = ChecksumManifest::load(dir.path()).unwrap_err();
    assert!(err.to_string().contains("manifest not found"));
}
