//! Error types and handling for FamilyHub
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! Only genuine faults live here. Conditions the registry treats as normal
//! (a missing standalone source, a denied symlink, a stub module, an ambiguous
//! deployment context) are reported through return values and log events.

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for FamilyHub operations
#[derive(Error, Diagnostic, Debug)]
pub enum HubError {
    // Catalog errors
    #[error("Unknown module: {key}")]
    #[diagnostic(
        code(familyhub::catalog::unknown_module),
        help("Run 'familyhub status' to list the known module keys")
    )]
    UnknownModule { key: String },

    #[error("Duplicate module key in catalog: {key}")]
    #[diagnostic(code(familyhub::catalog::duplicate_key))]
    DuplicateModuleKey { key: String },

    // Project errors
    #[error("Project root not found: {path}")]
    #[diagnostic(
        code(familyhub::project::not_found),
        help("Pass --root or set FAMILYHUB_ROOT to the directory holding FamilyHub/ and standalone-apps/")
    )]
    ProjectRootNotFound { path: String },

    // Configuration errors
    #[error("Failed to read configuration file {path}: {reason}")]
    #[diagnostic(code(familyhub::config::read_failed))]
    ConfigReadFailed { path: String, reason: String },

    #[error("Failed to parse configuration file {path}: {reason}")]
    #[diagnostic(code(familyhub::config::parse_failed))]
    ConfigParseFailed { path: String, reason: String },

    #[error("Invalid configuration: {message}")]
    #[diagnostic(code(familyhub::config::invalid))]
    ConfigInvalid { message: String },

    // Ledger errors
    #[error("Failed to read sync ledger {path}: {reason}")]
    #[diagnostic(
        code(familyhub::ledger::read_failed),
        help("Delete the ledger file and re-run 'familyhub sync' to rebuild it")
    )]
    LedgerReadFailed { path: String, reason: String },

    #[error("Failed to write sync ledger {path}: {reason}")]
    #[diagnostic(code(familyhub::ledger::write_failed))]
    LedgerWriteFailed { path: String, reason: String },

    // Sync errors
    #[error("Sync failed for: {}", modules.join(", "))]
    #[diagnostic(
        code(familyhub::sync::failed),
        help("Symbolic links may need elevated privileges; retry with --method copy")
    )]
    SyncFailed { modules: Vec<String> },

    // File system errors
    #[error("File not found: {path}")]
    #[diagnostic(code(familyhub::fs::not_found))]
    FileNotFound { path: String },

    #[error("Failed to read file {path}: {reason}")]
    #[diagnostic(code(familyhub::fs::read_failed))]
    FileReadFailed { path: String, reason: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(familyhub::fs::io_error))]
    IoError { message: String },
}

impl From<std::io::Error> for HubError {
    fn from(err: std::io::Error) -> Self {
        HubError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for HubError {
    fn from(err: serde_yaml::Error) -> Self {
        HubError::ConfigParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for HubError {
    fn from(err: serde_json::Error) -> Self {
        HubError::IoError {
            message: format!("JSON serialization failed: {err}"),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, HubError>;
