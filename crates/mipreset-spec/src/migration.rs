//! Migration table: how to compute a new material's parameters from an old one.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SpecError;
use crate::parameter::ParameterKind;

/// Recipe for one target parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterMapping {
    /// Expression evaluated over the bound aliases.
    pub expression: String,
    /// Category of the target parameter; the result is coerced to it.
    #[serde(rename = "type")]
    pub kind: ParameterKind,
    /// Alias name used in the expression -> old parameter name.
    #[serde(default)]
    pub aliases: BTreeMap<String, String>,
}

impl ParameterMapping {
    /// Creates a mapping with no aliases.
    pub fn new(expression: impl Into<String>, kind: ParameterKind) -> Self {
        Self {
            expression: expression.into(),
            kind,
            aliases: BTreeMap::new(),
        }
    }

    /// Adds an alias binding (builder style).
    pub fn alias(mut self, alias: impl Into<String>, old_name: impl Into<String>) -> Self {
        self.aliases.insert(alias.into(), old_name.into());
        self
    }
}

/// A hand-authored migration table file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationTable {
    /// Parent material to assign to the migrated instance, if any.
    #[serde(default)]
    pub new_parent_material: Option<String>,
    /// New parameter name -> mapping.
    #[serde(default)]
    pub parameter_mappings: BTreeMap<String, ParameterMapping>,
}

impl MigrationTable {
    /// Parses a table from JSON text.
    pub fn from_json(json: &str) -> Result<Self, SpecError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a table file.
    pub fn from_file(path: &Path) -> Result<Self, SpecError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }
}
