use std::fmt;

#[cfg(feature = "colorized_output")]
use console::style;

/// Severity of a validation issue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The file cannot be accepted while this issue is present
    Error,
    /// Worth surfacing, but never fails the batch on its own
    Warning,
}

/// Category of a validation issue, matching the stage that produced it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueKind {
    /// File unreadable or missing
    Io,
    /// Path, depth or size policy violation
    Policy,
    /// Suspicious pattern in the raw text
    Security,
    /// Malformed JSON
    Parse,
    /// Missing or malformed required field
    Structure,
    /// Cross-field business rule violation
    BusinessRule,
}

impl IssueKind {
    /// Short lowercase label used in report output
    pub fn label(&self) -> &'static str {
        match self {
            IssueKind::Io => "io",
            IssueKind::Policy => "policy",
            IssueKind::Security => "security",
            IssueKind::Parse => "parse",
            IssueKind::Structure => "structure",
            IssueKind::BusinessRule => "business-rule",
        }
    }
}

/// A single validation finding, immutable once created
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    /// Error or warning
    pub severity: Severity,
    /// Pipeline stage that produced the issue
    pub kind: IssueKind,
    /// Human-readable description
    pub message: String,
    /// Dotted path to the offending field, when known
    pub field_path: Option<String>,
}

impl ValidationIssue {
    /// Create an error-severity issue
    pub fn error(kind: IssueKind, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            kind,
            message: message.into(),
            field_path: None,
        }
    }

    /// Create a warning-severity issue
    pub fn warning(kind: IssueKind, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            kind,
            message: message.into(),
            field_path: None,
        }
    }

    /// Attach a dotted field path to the issue
    pub fn with_field(mut self, field_path: impl Into<String>) -> Self {
        self.field_path = Some(field_path.into());
        self
    }

    /// True if the issue has error severity
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self.severity {
            Severity::Error => "✗",
            Severity::Warning => "⚠",
        };
        write!(f, "[{}] {}: {}", symbol, self.kind.label(), self.message)?;
        if let Some(path) = &self.field_path {
            write!(f, " (at {})", path)?;
        }
        Ok(())
    }
}

/// All issues found for a single file, in the order the pipeline produced them
#[derive(Debug, Clone)]
pub struct FileReport {
    /// Path of the validated file, as given by the caller
    pub path: String,
    /// Ordered list of findings
    pub issues: Vec<ValidationIssue>,
}

impl FileReport {
    /// Create an empty report for the given file path
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            issues: Vec::new(),
        }
    }

    /// Append a finding to the report
    pub fn add_issue(&mut self, issue: ValidationIssue) {
        self.issues.push(issue);
    }

    /// Append a batch of findings to the report
    pub fn extend(&mut self, issues: impl IntoIterator<Item = ValidationIssue>) {
        self.issues.extend(issues);
    }

    /// True iff the file has no error-severity issues (warnings allowed)
    pub fn passed(&self) -> bool {
        !self.issues.iter().any(|i| i.is_error())
    }

    /// Number of error-severity issues
    pub fn error_count(&self) -> usize {
        self.issues.iter().filter(|i| i.is_error()).count()
    }

    /// Number of warning-severity issues
    pub fn warning_count(&self) -> usize {
        self.issues.iter().filter(|i| !i.is_error()).count()
    }
}

/// Aggregated validation report for a batch of files
#[derive(Debug, Default)]
pub struct ValidationReport {
    /// Per-file reports, in the caller's input order
    pub files: Vec<FileReport>,
}

impl ValidationReport {
    /// Create an empty batch report
    pub fn new() -> Self {
        Self { files: Vec::new() }
    }

    /// Append a per-file report, preserving insertion order
    pub fn add_file(&mut self, file: FileReport) {
        self.files.push(file);
    }

    /// True iff every file passed
    pub fn passed(&self) -> bool {
        self.files.iter().all(|f| f.passed())
    }

    /// True if any file has warnings
    pub fn has_warnings(&self) -> bool {
        self.files.iter().any(|f| f.warning_count() > 0)
    }

    /// Total error-severity issues across all files
    pub fn error_count(&self) -> usize {
        self.files.iter().map(|f| f.error_count()).sum()
    }

    /// Total warning-severity issues across all files
    pub fn warning_count(&self) -> usize {
        self.files.iter().map(|f| f.warning_count()).sum()
    }

    /// Number of files that passed
    pub fn passed_count(&self) -> usize {
        self.files.iter().filter(|f| f.passed()).count()
    }

    /// Format the report with colors (requires console feature)
    pub fn format_colored(&self) -> String {
        #[cfg(feature = "colorized_output")]
        {
            let mut output = String::new();

            output.push_str(&format!("{}\n", style("Preset Validation Report").bold().cyan()));
            output.push_str(&format!("{}\n\n", style("========================").cyan()));

            for file in &self.files {
                let verdict = if file.passed() {
                    style("ok").green()
                } else {
                    style("FAILED").red().bold()
                };
                output.push_str(&format!("{} ... {}\n", style(&file.path).bold(), verdict));

                for issue in &file.issues {
                    let line = format!("{}", issue);
                    let styled = match issue.severity {
                        Severity::Error => style(line).red(),
                        Severity::Warning => style(line).yellow(),
                    };
                    output.push_str(&format!("  {}\n", styled));
                }
            }

            output.push('\n');
            output.push_str(&format!(
                "{}: {} files, {} passed, {} errors, {} warnings\n",
                style("Summary").bold(),
                self.files.len(),
                style(self.passed_count()).green(),
                style(self.error_count()).red(),
                style(self.warning_count()).yellow()
            ));

            output.push('\n');
            if self.passed() {
                if self.has_warnings() {
                    output.push_str(&format!(
                        "{}\n",
                        style("Validation PASSED with warnings").yellow().bold()
                    ));
                } else {
                    output.push_str(&format!("{}\n", style("Validation PASSED").green().bold()));
                }
            } else {
                output.push_str(&format!("{}\n", style("Validation FAILED").red().bold()));
            }

            output
        }

        #[cfg(not(feature = "colorized_output"))]
        {
            format!("{}", self)
        }
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Preset Validation Report")?;
        writeln!(f, "========================")?;
        writeln!(f)?;

        for file in &self.files {
            let verdict = if file.passed() { "ok" } else { "FAILED" };
            writeln!(f, "{} ... {}", file.path, verdict)?;

            for issue in &file.issues {
                writeln!(f, "  {}", issue)?;
            }
        }

        writeln!(f)?;
        writeln!(
            f,
            "Summary: {} files, {} passed, {} errors, {} warnings",
            self.files.len(),
            self.passed_count(),
            self.error_count(),
            self.warning_count()
        )?;

        writeln!(f)?;
        if self.passed() {
            if self.has_warnings() {
                writeln!(f, "Validation PASSED with warnings")?;
            } else {
                writeln!(f, "Validation PASSED")?;
            }
        } else {
            writeln!(f, "Validation FAILED")?;
        }

        Ok(())
    }
}
