//! Security scanner for raw preset file text.
//!
//! Runs before JSON parsing so that malformed-but-malicious payloads are
//! caught even when the parser would reject them. Rules are data, not
//! control flow: each entry in [`SCAN_RULES`] is a named case-insensitive
//! substring to look for, and adding a rule never touches the scan loop.
//!
//! Scanning never fails; a clean file simply yields an empty list.

use std::path::Path;

use log::{debug, warn};

use crate::validator::{IssueKind, ValidationIssue};

/// Maximum tolerated JSON bracket nesting before the file is flagged.
/// Protects the parser from pathological deeply nested payloads.
pub const MAX_NESTING_DEPTH: usize = 128;

/// One scan rule: a named suspicious substring
#[derive(Debug, Clone, Copy)]
pub struct ScanRule {
    /// Rule name reported on a match
    pub name: &'static str,
    /// Case-insensitive substring to search for
    pub needle: &'static str,
}

/// Ordered rule table applied to every file
pub const SCAN_RULES: &[ScanRule] = &[
    ScanRule { name: "script-tag", needle: "<script" },
    ScanRule { name: "iframe-tag", needle: "<iframe" },
    ScanRule { name: "javascript-uri", needle: "javascript:" },
    ScanRule { name: "html-data-uri", needle: "data:text/html" },
    ScanRule { name: "inline-handler", needle: "onclick=" },
    ScanRule { name: "eval-call", needle: "eval(" },
    ScanRule { name: "alert-call", needle: "alert(" },
    ScanRule { name: "dom-access", needle: "document." },
    ScanRule { name: "window-access", needle: "window." },
    ScanRule { name: "timer-injection", needle: "settimeout" },
    ScanRule { name: "timer-injection", needle: "setinterval" },
    ScanRule { name: "python-import", needle: "__import__" },
    ScanRule { name: "python-exec", needle: "exec(" },
    ScanRule { name: "python-compile", needle: "compile(" },
    ScanRule { name: "python-getattr", needle: "getattr(" },
    ScanRule { name: "path-traversal", needle: "../" },
    ScanRule { name: "path-traversal", needle: "..\\" },
    ScanRule { name: "null-byte", needle: "\u{0}" },
];

/// Scan raw file text against the rule table.
///
/// Returns one error-severity issue per matching rule, naming the rule and
/// the byte offset of the first occurrence. An empty return means no
/// findings.
pub fn scan(path: &Path, text: &str) -> Vec<ValidationIssue> {
    let lowered = text.to_lowercase();
    let mut issues = Vec::new();

    for rule in SCAN_RULES {
        if let Some(offset) = lowered.find(rule.needle) {
            warn!(
                "suspicious pattern '{}' in {} at byte {}",
                rule.name,
                path.display(),
                offset
            );
            issues.push(ValidationIssue::error(
                IssueKind::Security,
                format!(
                    "suspicious pattern '{}' ({:?}) at byte {}",
                    rule.name, rule.needle, offset
                ),
            ));
        }
    }

    if let Some(depth) = excessive_nesting(text) {
        warn!(
            "nesting depth {} exceeds limit {} in {}",
            depth,
            MAX_NESTING_DEPTH,
            path.display()
        );
        issues.push(ValidationIssue::error(
            IssueKind::Security,
            format!(
                "nesting depth {} exceeds limit of {}",
                depth, MAX_NESTING_DEPTH
            ),
        ));
    }

    debug!(
        "security scan of {}: {} findings over {} rules",
        path.display(),
        issues.len(),
        SCAN_RULES.len()
    );

    issues
}

/// Bracket-depth heuristic over raw text. Returns the peak depth if it
/// exceeds [`MAX_NESTING_DEPTH`]. String contents are not excluded; a
/// bracket-heavy string long enough to trip this is suspicious in itself.
fn excessive_nesting(text: &str) -> Option<usize> {
    let mut depth: usize = 0;
    let mut peak: usize = 0;

    for byte in text.bytes() {
        match byte {
            b'{' | b'[' => {
                depth += 1;
                if depth > peak {
                    peak = depth;
                }
            }
            b'}' | b']' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }

    (peak > MAX_NESTING_DEPTH).then_some(peak)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn scan_text(text: &str) -> Vec<ValidationIssue> {
        scan(&PathBuf::from("devices/test/factory.json"), text)
    }

    #[test]
    fn clean_document_has_no_findings() {
        let issues = scan_text(r#"{"device_info": {"name": "Clean"}}"#);
        assert!(issues.is_empty());
    }

    #[test]
    fn detects_script_tag_case_insensitively() {
        let issues = scan_text(r#"{"name": "<SCRIPT>alert(1)</SCRIPT>"}"#);
        assert!(issues.iter().any(|i| i.message.contains("script-tag")));
        assert!(issues.iter().all(|i| i.is_error()));
    }

    #[test]
    fn detects_path_traversal_and_null_byte() {
        let issues = scan_text("{\"path\": \"../../etc/passwd\", \"x\": \"a\u{0}b\"}");
        assert!(issues.iter().any(|i| i.message.contains("path-traversal")));
        assert!(issues.iter().any(|i| i.message.contains("null-byte")));
    }

    #[test]
    fn reports_offset_of_first_occurrence() {
        let issues = scan_text(r#"{"a": "eval(x)", "b": "eval(y)"}"#);
        let eval = issues.iter().find(|i| i.message.contains("eval-call")).unwrap();
        assert!(eval.message.contains("at byte 7"));
    }

    #[test]
    fn flags_excessive_nesting() {
        let mut text = String::new();
        for _ in 0..(MAX_NESTING_DEPTH + 10) {
            text.push('[');
        }
        for _ in 0..(MAX_NESTING_DEPTH + 10) {
            text.push(']');
        }
        let issues = scan_text(&text);
        assert!(issues.iter().any(|i| i.message.contains("nesting depth")));
    }

    #[test]
    fn nesting_at_limit_is_allowed() {
        let mut text = String::new();
        for _ in 0..MAX_NESTING_DEPTH {
            text.push('{');
        }
        for _ in 0..MAX_NESTING_DEPTH {
            text.push('}');
        }
        assert!(scan_text(&text).is_empty());
    }
}
