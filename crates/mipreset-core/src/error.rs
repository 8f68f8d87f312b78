//! Error types for preset management and migration.
//!
//! ## Error Codes
//!
//! | Code | Meaning |
//! |------|---------|
//! | R001 | Instance has no ancestor for the requested scope |
//! | R002 | Invalid preset name |
//! | R003 | Preset file not found |
//! | R004 | Preset file is not valid JSON |
//! | R005 | Preset document failed validation |
//! | R006 | File system error |
//! | R007 | Host error |
//! | M001 | Migration table could not be read |
//! | M002 | Migration host error |

use std::io;
use std::path::PathBuf;

use mipreset_spec::{SpecError, ValidationError};
use thiserror::Error;

use crate::host::HostError;
use crate::resolver::PresetScope;

/// Errors from saving, loading, or deleting presets.
#[derive(Debug, Error)]
pub enum PresetError {
    /// R001: The instance has no root or parent material.
    #[error("R001: '{instance}' has no {scope} material")]
    NoAncestor {
        instance: String,
        scope: PresetScope,
    },

    /// R002: The preset name is not a safe file stem.
    #[error("R002: {0}")]
    InvalidName(#[source] ValidationError),

    /// R003: No preset file at the resolved location.
    #[error("R003: preset not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// R004: The preset file is not a valid preset document.
    #[error("R004: malformed preset {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// R005: The document parsed but failed validation.
    #[error("R005: preset {} is invalid: {}", path.display(), summarize(errors))]
    Invalid {
        path: PathBuf,
        errors: Vec<ValidationError>,
    },

    /// R006: Reading, writing, or removing a preset file failed.
    #[error("R006: I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// R007: The host rejected the operation.
    #[error("R007: {0}")]
    Host(#[from] HostError),
}

impl PresetError {
    /// Returns the error code (e.g., "R001").
    pub fn code(&self) -> &'static str {
        match self {
            PresetError::NoAncestor { .. } => "R001",
            PresetError::InvalidName(_) => "R002",
            PresetError::NotFound { .. } => "R003",
            PresetError::Json { .. } => "R004",
            PresetError::Invalid { .. } => "R005",
            PresetError::Io { .. } => "R006",
            PresetError::Host(_) => "R007",
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        PresetError::Io {
            path: path.into(),
            source,
        }
    }
}

fn summarize(errors: &[ValidationError]) -> String {
    match errors {
        [] => "no details".to_string(),
        [only] => only.to_string(),
        [first, rest @ ..] => format!("{} (and {} more)", first, rest.len()),
    }
}

/// Errors from migrating a material instance.
#[derive(Debug, Error)]
pub enum MigrationError {
    /// M001: The migration table could not be read or parsed.
    #[error("M001: failed to read migration table {}: {source}", path.display())]
    Table {
        path: PathBuf,
        #[source]
        source: SpecError,
    },

    /// M002: Reading the source, re-parenting, or applying to the target failed.
    #[error("M002: {0}")]
    Host(#[from] HostError),
}

impl MigrationError {
    /// Returns the error code (e.g., "M001").
    pub fn code(&self) -> &'static str {
        match self {
            MigrationError::Table { .. } => "M001",
            MigrationError::Host(_) => "M002",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mipreset_spec::ErrorCode;

    #[test]
    fn test_codes() {
        let err = PresetError::NoAncestor {
            instance: "/Game/MI".to_string(),
            scope: PresetScope::Root,
        };
        assert_eq!(err.code(), "R001");
        assert_eq!(err.to_string(), "R001: '/Game/MI' has no root material");

        let err: PresetError = HostError::AssetNotFound {
            path: "/Game/X".to_string(),
        }
        .into();
        assert_eq!(err.code(), "R007");
    }

    #[test]
    fn test_invalid_summary() {
        let err = PresetError::Invalid {
            path: PathBuf::from("a.json"),
            errors: vec![
                ValidationError::new(ErrorCode::EmptyParameterName, "first"),
                ValidationError::new(ErrorCode::EmptyParameterName, "second"),
            ],
        };
        assert!(err.to_string().ends_with("(and 1 more)"));
    }
}
