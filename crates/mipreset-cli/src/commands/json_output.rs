//! JSON output types for machine-readable CLI output.
//!
//! Every command prints one [`JsonOutput`] object when `--json` is given.

use anyhow::Result;
use serde::Serialize;
use std::process::ExitCode;

/// Error codes for CLI-level failures. Library errors pass their own codes
/// through (e.g. "R003", "X001").
pub mod error_codes {
    /// Preset document could not be read
    pub const PRESET_READ: &str = "CLI_001";
    /// Invalid `--bind` argument
    pub const BIND: &str = "CLI_002";
    /// Preset to delete does not exist
    pub const NOT_FOUND: &str = "CLI_003";
}

/// Warning codes for CLI output.
pub mod warning_codes {
    /// A parameter was not applied
    pub const SKIPPED_PARAMETER: &str = "CLI_W001";
    /// A migration mapping produced no value
    pub const FAILED_MAPPING: &str = "CLI_W002";
}

/// A structured error in JSON output.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct JsonError {
    /// Stable error code (e.g., "CLI_001", "R003")
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Location of the problem inside a document (if applicable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl JsonError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            path: None,
        }
    }

    pub fn with_path(mut self, path: Option<String>) -> Self {
        self.path = path;
        self
    }
}

/// Envelope printed by every command in `--json` mode.
#[derive(Debug, Serialize)]
pub struct JsonOutput<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<T>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<JsonError>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<JsonError>,
}

impl<T: Serialize> JsonOutput<T> {
    pub fn success(result: T) -> Self {
        Self {
            success: true,
            result: Some(result),
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn failure(errors: Vec<JsonError>) -> Self {
        Self {
            success: false,
            result: None,
            errors,
            warnings: Vec::new(),
        }
    }

    pub fn with_warnings(mut self, warnings: Vec<JsonError>) -> Self {
        self.warnings = warnings;
        self
    }

    /// Prints the envelope and maps `success` to the exit code.
    pub fn emit(&self) -> Result<ExitCode> {
        println!("{}", serde_json::to_string_pretty(self)?);
        Ok(if self.success {
            ExitCode::SUCCESS
        } else {
            ExitCode::from(1)
        })
    }
}

/// Prints a single-error failure envelope.
pub fn emit_error(code: &str, message: impl Into<String>) -> Result<ExitCode> {
    JsonOutput::<()>::failure(vec![JsonError::new(code, message)]).emit()
}
