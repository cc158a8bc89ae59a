//! Repository hygiene policy: path location, directory depth, file size.
//!
//! All checks here are pure functions of the path and of size metadata.
//! Rejection never requires reading file content, which is what bounds
//! resource use for oversized or misplaced files.

use std::path::{Component, Path};

use crate::config::ValidationConfig;

use super::{IssueKind, ValidationIssue};

/// Validate the location and shape of a path relative to the repository root.
///
/// The path must resolve under the configured root directory, must not
/// traverse upward, must stay within the depth limit, must use well-formed
/// directory names, and must be a `.json` file.
pub fn check_path(relative: &Path, config: &ValidationConfig) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    let mut segments: Vec<String> = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(part) => segments.push(part.to_string_lossy().into_owned()),
            Component::ParentDir => {
                issues.push(ValidationIssue::error(
                    IssueKind::Policy,
                    "path traverses above the repository root ('..' component)",
                ));
                return issues;
            }
            Component::CurDir => {}
            Component::RootDir | Component::Prefix(_) => {
                issues.push(ValidationIssue::error(
                    IssueKind::Policy,
                    "path does not resolve under the repository root",
                ));
                return issues;
            }
        }
    }

    if segments.first().map(String::as_str) != Some(config.root_dir_name.as_str()) {
        issues.push(ValidationIssue::error(
            IssueKind::Policy,
            format!("file must be under the {}/ directory", config.root_dir_name),
        ));
        return issues;
    }

    if segments.len() < 2 {
        issues.push(ValidationIssue::error(
            IssueKind::Policy,
            format!("path names the {}/ directory, not a file", config.root_dir_name),
        ));
        return issues;
    }

    // Levels between the root directory and the file itself
    let depth = segments.len() - 2;
    if depth > config.max_depth {
        issues.push(ValidationIssue::error(
            IssueKind::Policy,
            format!(
                "directory depth {} exceeds the maximum of {} below {}/",
                depth, config.max_depth, config.root_dir_name
            ),
        ));
    }

    for folder in &segments[1..segments.len() - 1] {
        if !is_valid_folder_name(folder) {
            issues.push(ValidationIssue::error(
                IssueKind::Policy,
                format!(
                    "invalid directory name '{}' (alphanumeric, '_' and '-' only)",
                    folder
                ),
            ));
        }
    }

    let file_name = &segments[segments.len() - 1];
    if !file_name.to_lowercase().ends_with(".json") {
        issues.push(ValidationIssue::error(
            IssueKind::Policy,
            format!("'{}' is not a .json file; only .json files are accepted", file_name),
        ));
    }

    issues
}

/// Validate a file's size against the configured limit.
///
/// Takes the byte length from filesystem metadata so oversized files are
/// rejected without reading their content.
pub fn check_size(size: u64, config: &ValidationConfig) -> Option<ValidationIssue> {
    (size > config.max_file_size).then(|| {
        ValidationIssue::error(
            IssueKind::Policy,
            format!(
                "file size {} bytes exceeds the {} byte limit",
                size, config.max_file_size
            ),
        )
    })
}

fn is_valid_folder_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn check(path: &str) -> Vec<ValidationIssue> {
        check_path(&PathBuf::from(path), &ValidationConfig::default())
    }

    #[test]
    fn accepts_well_formed_path() {
        assert!(check("devices/acme/factory.json").is_empty());
    }

    #[test]
    fn accepts_path_at_maximum_depth() {
        assert!(check("devices/a/b/c/d/file.json").is_empty());
    }

    #[test]
    fn rejects_path_beyond_maximum_depth() {
        let issues = check("devices/a/b/c/d/e/file.json");
        assert_eq!(issues.len(), 1);
        assert!(issues[0].message.contains("depth 5"));
    }

    #[test]
    fn rejects_path_outside_root_directory() {
        let issues = check("presets/acme/factory.json");
        assert!(issues.iter().any(|i| i.message.contains("devices/")));
    }

    #[test]
    fn rejects_parent_traversal() {
        let issues = check("devices/../secrets.json");
        assert!(issues.iter().any(|i| i.message.contains("traverses")));
    }

    #[test]
    fn rejects_non_json_extension() {
        let issues = check("devices/acme/factory.yaml");
        assert!(issues.iter().any(|i| i.message.contains(".json")));
    }

    #[test]
    fn rejects_bad_folder_name() {
        let issues = check("devices/ac me/factory.json");
        assert!(issues.iter().any(|i| i.message.contains("invalid directory name")));
    }

    #[test]
    fn size_check_is_pure_function_of_length() {
        let config = ValidationConfig::default();
        assert!(check_size(config.max_file_size, &config).is_none());
        let issue = check_size(config.max_file_size + 1, &config).unwrap();
        assert!(issue.is_error());
        assert!(issue.message.contains("exceeds"));
    }
}
