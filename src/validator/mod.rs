//! Multi-layer content validation for preset files.
//!
//! ## Validation pipeline
//!
//! Each file goes through a fixed sequence of stages:
//!
//! 1. **Policy**: path location, directory depth and file size, decided from
//!    path and size metadata alone. A violation is terminal for the file
//!    before any content is read.
//! 2. **Security scan**: rule-table match over the raw text, before parsing.
//!    Findings are errors but never block the later stages.
//! 3. **Parse**: malformed JSON is one terminal issue, with no cascading
//!    false positives from the stages below.
//! 4. **Structure**: required keys and field-level types/patterns/ranges,
//!    enumerated in full rather than stopping at the first discrepancy.
//! 5. **Business rules**: cross-field checks over the typed model, run only
//!    when structure validation produced no errors.
//!
//! Every finding is recovered into the report; a single bad file never
//! aborts the batch. Batches may fan out to a bounded worker pool, but the
//! report always comes back in the caller's input order.
//!
//! ```rust,no_run
//! use std::path::{Path, PathBuf};
//! use midi_presets::config::ValidationConfig;
//! use midi_presets::validator::{validate_batch, BatchContext};
//!
//! let paths = vec![PathBuf::from("devices/acme/factory.json")];
//! let config = ValidationConfig::default();
//! let report = validate_batch(&paths, Path::new("."), &config, &BatchContext::default());
//! println!("{}", report);
//! assert!(report.passed());
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};
use serde_json::Value;

pub use report::{FileReport, IssueKind, Severity, ValidationIssue, ValidationReport};

pub mod policy;
mod report;
pub mod rules;
pub mod structure;

use crate::config::ValidationConfig;
use crate::model::DeviceDocument;
use crate::scanner;

/// Caller-supplied context for a batch run.
///
/// The validator holds no state between invocations; anything that needs
/// history, like revision monotonicity, comes in from the caller here.
#[derive(Debug, Clone, Default)]
pub struct BatchContext {
    /// Last known `file_revision` per `/`-separated relative path
    pub prior_revisions: BTreeMap<String, u64>,
}

/// Validate a single file through the full pipeline.
///
/// Never fails: every problem ends up as an issue in the returned report.
pub fn validate_file(
    path: &Path,
    repo_root: &Path,
    config: &ValidationConfig,
    prior_revision: Option<u64>,
) -> FileReport {
    let mut report = FileReport::new(path.display().to_string());
    debug!("validating {}", path.display());

    let Some((full, relative)) = resolve(path, repo_root) else {
        report.add_issue(ValidationIssue::error(
            IssueKind::Policy,
            "path does not resolve under the repository root",
        ));
        return report;
    };

    report.extend(policy::check_path(&relative, config));
    if !report.passed() {
        return report;
    }

    // Size comes from metadata so oversized files are never read
    let metadata = match fs::metadata(&full) {
        Ok(metadata) => metadata,
        Err(e) => {
            report.add_issue(ValidationIssue::error(
                IssueKind::Io,
                format!("cannot stat file: {}", e),
            ));
            return report;
        }
    };
    if let Some(issue) = policy::check_size(metadata.len(), config) {
        report.add_issue(issue);
        return report;
    }

    let bytes = match fs::read(&full) {
        Ok(bytes) => bytes,
        Err(e) => {
            report.add_issue(ValidationIssue::error(
                IssueKind::Io,
                format!("cannot read file: {}", e),
            ));
            return report;
        }
    };
    let text = String::from_utf8_lossy(&bytes);

    // Security scan runs before parsing and never blocks the later stages
    report.extend(scanner::scan(path, &text));

    let value: Value = match serde_json::from_str(&text) {
        Ok(value) => value,
        Err(e) => {
            report.add_issue(ValidationIssue::error(
                IssueKind::Parse,
                format!("invalid JSON: {}", e),
            ));
            return report;
        }
    };

    let structure_issues = structure::validate_structure(&value);
    let structure_blocked = structure_issues.iter().any(|i| i.is_error());
    report.extend(structure_issues);
    if structure_blocked {
        return report;
    }

    // Business rules assume a structurally valid shape
    let doc: DeviceDocument = match serde_json::from_value(value) {
        Ok(doc) => doc,
        Err(e) => {
            report.add_issue(ValidationIssue::error(
                IssueKind::Structure,
                format!("document shape: {}", e),
            ));
            return report;
        }
    };
    report.extend(rules::validate_rules(&doc, prior_revision));

    debug!(
        "{}: {} errors, {} warnings",
        path.display(),
        report.error_count(),
        report.warning_count()
    );
    report
}

/// Validate a batch of files and aggregate one report.
///
/// Every file in the list is processed; one file's failure never aborts the
/// batch. When `config.concurrency > 1` files are validated on a bounded
/// worker pool, and per-file reports are merged back by input index so the
/// aggregated report is deterministic regardless of scheduling.
pub fn validate_batch(
    paths: &[PathBuf],
    repo_root: &Path,
    config: &ValidationConfig,
    ctx: &BatchContext,
) -> ValidationReport {
    info!(
        "validating {} files under {} ({} workers)",
        paths.len(),
        repo_root.display(),
        config.concurrency.max(1)
    );

    let workers = config.concurrency.max(1).min(paths.len().max(1));
    let mut report = ValidationReport::new();

    if workers <= 1 {
        for path in paths {
            let prior = prior_revision_for(path, repo_root, ctx);
            report.add_file(validate_file(path, repo_root, config, prior));
        }
        return report;
    }

    let mut slots: Vec<Option<FileReport>> = Vec::with_capacity(paths.len());
    slots.resize_with(paths.len(), || None);

    std::thread::scope(|scope| {
        let (job_tx, job_rx) = crossbeam_channel::unbounded::<(usize, &PathBuf)>();
        let (result_tx, result_rx) = crossbeam_channel::unbounded::<(usize, FileReport)>();

        for _ in 0..workers {
            let job_rx = job_rx.clone();
            let result_tx = result_tx.clone();
            scope.spawn(move || {
                while let Ok((index, path)) = job_rx.recv() {
                    let prior = prior_revision_for(path, repo_root, ctx);
                    let file_report = validate_file(path, repo_root, config, prior);
                    if result_tx.send((index, file_report)).is_err() {
                        break;
                    }
                }
            });
        }
        drop(job_rx);
        drop(result_tx);

        for job in paths.iter().enumerate() {
            // Receivers only disappear if a worker panicked; the panic will
            // resurface when the scope joins
            let _ = job_tx.send(job);
        }
        drop(job_tx);

        while let Ok((index, file_report)) = result_rx.recv() {
            slots[index] = Some(file_report);
        }
    });

    for (index, slot) in slots.into_iter().enumerate() {
        match slot {
            Some(file_report) => report.add_file(file_report),
            // Unreachable unless a worker died mid-file; keep the report
            // complete either way
            None => report.add_file(FileReport::new(paths[index].display().to_string())),
        }
    }

    info!(
        "batch complete: {}/{} files passed, {} errors, {} warnings",
        report.passed_count(),
        report.files.len(),
        report.error_count(),
        report.warning_count()
    );
    report
}

/// Split a caller path into (full filesystem path, path relative to root).
/// Returns None for absolute paths that do not live under the root.
fn resolve(path: &Path, repo_root: &Path) -> Option<(PathBuf, PathBuf)> {
    if path.is_absolute() {
        let relative = path.strip_prefix(repo_root).ok()?;
        Some((path.to_path_buf(), relative.to_path_buf()))
    } else {
        Some((repo_root.join(path), path.to_path_buf()))
    }
}

fn prior_revision_for(path: &Path, repo_root: &Path, ctx: &BatchContext) -> Option<u64> {
    let (_, relative) = resolve(path, repo_root)?;
    let key = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");
    ctx.prior_revisions.get(&key).copied()
}
