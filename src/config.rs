//! Repository policy and runtime configuration.
//!
//! The constants here are configuration, not code: CI deployments override
//! them via CLI flags or a TOML file. Rate limiting
//! (max concurrent validations, max validations per hour) is enforced by the
//! calling CI system and deliberately has no counterpart here.

/// Default maximum preset file size in bytes (3 MiB)
pub const DEFAULT_MAX_FILE_SIZE: u64 = 3 * 1024 * 1024;

/// Default maximum directory depth below the repository root
pub const DEFAULT_MAX_DEPTH: usize = 4;

/// Default name of the directory all preset files must live under
pub const DEFAULT_ROOT_DIR: &str = "devices";

/// Default number of validation workers; kept small to bound resource use in
/// shared CI environments
pub const DEFAULT_CONCURRENCY: usize = 2;

/// Policy and concurrency settings for a validation run
#[derive(Debug, Clone)]
pub struct ValidationConfig {
    /// Maximum file size in bytes; oversized files are rejected before any
    /// content is read
    pub max_file_size: u64,

    /// Maximum number of directory levels between the root directory and the
    /// file itself
    pub max_depth: usize,

    /// Name of the directory files must resolve under (`devices`)
    pub root_dir_name: String,

    /// Number of files validated in parallel; 1 disables the worker pool
    pub concurrency: usize,

    /// Treat warnings as failures in the CLI exit code. The report itself is
    /// unaffected.
    pub strict: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            max_depth: DEFAULT_MAX_DEPTH,
            root_dir_name: DEFAULT_ROOT_DIR.to_string(),
            concurrency: DEFAULT_CONCURRENCY,
            strict: false,
        }
    }
}
