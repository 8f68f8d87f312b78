//! Preset document: the on-disk JSON shape of one saved preset.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;

use crate::error::SpecError;
use crate::parameter::MaterialParameterSet;

/// Identity of the instance a preset was captured from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresetMetadata {
    /// Path of the material instance that was serialized.
    #[serde(default)]
    pub asset_path: String,
    /// Immediate parent material, if known.
    #[serde(default)]
    pub parent_material: Option<String>,
    /// Top-most non-instance ancestor, if known.
    #[serde(default)]
    pub root_material: Option<String>,
}

/// A complete preset file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PresetDocument {
    #[serde(default)]
    pub metadata: PresetMetadata,
    #[serde(default)]
    pub parameters: MaterialParameterSet,
}

impl PresetDocument {
    /// Creates a document for `asset_path` with no parameters.
    pub fn new(asset_path: impl Into<String>) -> Self {
        Self {
            metadata: PresetMetadata {
                asset_path: asset_path.into(),
                ..Default::default()
            },
            parameters: MaterialParameterSet::default(),
        }
    }

    /// Parses a document from JSON text.
    pub fn from_json(json: &str) -> Result<Self, SpecError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a document from a file.
    pub fn from_file(path: &Path) -> Result<Self, SpecError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Serializes with 4-space indentation, leaving non-ASCII text unescaped.
    pub fn to_json_pretty(&self) -> Result<String, SpecError> {
        let mut buf = Vec::new();
        let formatter = PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut ser)?;
        // serde_json only ever emits valid UTF-8
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}
