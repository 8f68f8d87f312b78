//! Material parameter set and per-entry value shapes.
//!
//! Entries accept two JSON shapes on input:
//!
//! - wrapped: `{"value": 0.5, "override": true}` (`override` defaults to true)
//! - bare: `0.5`
//!
//! and always serialize in the wrapped shape.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::color::LinearColor;

/// The four material parameter categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterKind {
    /// Single float.
    Scalar,
    /// Linear RGBA color.
    Vector,
    /// Texture reference (asset path or none).
    Texture,
    /// Compile-time boolean switch.
    StaticSwitch,
}

impl ParameterKind {
    /// All categories, in document order.
    pub const ALL: [ParameterKind; 4] = [
        ParameterKind::Scalar,
        ParameterKind::Vector,
        ParameterKind::Texture,
        ParameterKind::StaticSwitch,
    ];

    /// Returns the key used for this category in preset documents.
    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterKind::Scalar => "scalar",
            ParameterKind::Vector => "vector",
            ParameterKind::Texture => "texture",
            ParameterKind::StaticSwitch => "static_switch",
        }
    }
}

impl fmt::Display for ParameterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ParameterKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scalar" => Ok(ParameterKind::Scalar),
            "vector" => Ok(ParameterKind::Vector),
            "texture" => Ok(ParameterKind::Texture),
            "static_switch" => Ok(ParameterKind::StaticSwitch),
            other => Err(format!(
                "unknown parameter type '{}' (expected scalar, vector, texture, or static_switch)",
                other
            )),
        }
    }
}

/// A typed parameter value, independent of its category map.
#[derive(Debug, Clone, PartialEq)]
pub enum ParameterValue {
    Scalar(f32),
    Vector(LinearColor),
    Texture(Option<String>),
    StaticSwitch(bool),
}

impl ParameterValue {
    /// Returns the category this value belongs to.
    pub fn kind(&self) -> ParameterKind {
        match self {
            ParameterValue::Scalar(_) => ParameterKind::Scalar,
            ParameterValue::Vector(_) => ParameterKind::Vector,
            ParameterValue::Texture(_) => ParameterKind::Texture,
            ParameterValue::StaticSwitch(_) => ParameterKind::StaticSwitch,
        }
    }
}

fn default_override() -> bool {
    true
}

/// Both accepted input shapes of a parameter entry.
#[derive(Deserialize)]
#[serde(untagged)]
enum EntryShape<T> {
    Wrapped {
        value: T,
        #[serde(rename = "override", default = "default_override")]
        overridden: bool,
    },
    Bare(T),
}

impl<T> From<EntryShape<T>> for ParameterEntry<T> {
    fn from(shape: EntryShape<T>) -> Self {
        match shape {
            EntryShape::Wrapped { value, overridden } => Self { value, overridden },
            EntryShape::Bare(value) => Self::overridden(value),
        }
    }
}

/// One saved parameter value plus its override flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "EntryShape<T>")]
pub struct ParameterEntry<T> {
    pub value: T,
    #[serde(rename = "override")]
    pub overridden: bool,
}

impl<T> ParameterEntry<T> {
    /// Creates an entry marked as an override.
    pub fn overridden(value: T) -> Self {
        Self {
            value,
            overridden: true,
        }
    }
}

/// The serializable overrides of one material instance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MaterialParameterSet {
    #[serde(default)]
    pub scalar: BTreeMap<String, ParameterEntry<f32>>,
    #[serde(default)]
    pub vector: BTreeMap<String, ParameterEntry<LinearColor>>,
    #[serde(default)]
    pub texture: BTreeMap<String, ParameterEntry<Option<String>>>,
    #[serde(default)]
    pub static_switch: BTreeMap<String, ParameterEntry<bool>>,
}

impl MaterialParameterSet {
    /// Creates an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a value into the map matching its category, marked as an override.
    ///
    /// Any entry with the same name in another category is removed so the
    /// name stays unique across categories.
    pub fn insert(&mut self, name: impl Into<String>, value: ParameterValue) {
        let name = name.into();
        self.remove(&name);
        match value {
            ParameterValue::Scalar(v) => {
                self.scalar.insert(name, ParameterEntry::overridden(v));
            }
            ParameterValue::Vector(v) => {
                self.vector.insert(name, ParameterEntry::overridden(v));
            }
            ParameterValue::Texture(v) => {
                self.texture.insert(name, ParameterEntry::overridden(v));
            }
            ParameterValue::StaticSwitch(v) => {
                self.static_switch.insert(name, ParameterEntry::overridden(v));
            }
        }
    }

    /// Removes `name` from every category. Returns true if anything was removed.
    pub fn remove(&mut self, name: &str) -> bool {
        let mut removed = self.scalar.remove(name).is_some();
        removed |= self.vector.remove(name).is_some();
        removed |= self.texture.remove(name).is_some();
        removed |= self.static_switch.remove(name).is_some();
        removed
    }

    /// Looks `name` up across all four categories.
    ///
    /// Categories are searched in document order; the first hit wins.
    pub fn get(&self, name: &str) -> Option<ParameterValue> {
        if let Some(e) = self.scalar.get(name) {
            return Some(ParameterValue::Scalar(e.value));
        }
        if let Some(e) = self.vector.get(name) {
            return Some(ParameterValue::Vector(e.value));
        }
        if let Some(e) = self.texture.get(name) {
            return Some(ParameterValue::Texture(e.value.clone()));
        }
        self.static_switch
            .get(name)
            .map(|e| ParameterValue::StaticSwitch(e.value))
    }

    /// Returns the names stored under `kind`, sorted.
    pub fn names(&self, kind: ParameterKind) -> Vec<&str> {
        match kind {
            ParameterKind::Scalar => self.scalar.keys().map(String::as_str).collect(),
            ParameterKind::Vector => self.vector.keys().map(String::as_str).collect(),
            ParameterKind::Texture => self.texture.keys().map(String::as_str).collect(),
            ParameterKind::StaticSwitch => {
                self.static_switch.keys().map(String::as_str).collect()
            }
        }
    }

    /// Total number of entries across all categories.
    pub fn len(&self) -> usize {
        self.scalar.len() + self.vector.len() + self.texture.len() + self.static_switch.len()
    }

    /// Returns true if no category has entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_bare_and_wrapped_shapes_normalize() {
        let wrapped: MaterialParameterSet = serde_json::from_str(
            r#"{
                "scalar": {"Roughness": {"value": 0.5, "override": true}},
                "vector": {"Tint": {"value": {"r": 1, "g": 0.5, "b": 0, "a": 1}, "override": true}},
                "texture": {"Albedo": {"value": "/Game/Tex/T_Albedo", "override": true}},
                "static_switch": {"UseDetail": {"value": true, "override": true}}
            }"#,
        )
        .unwrap();
        let bare: MaterialParameterSet = serde_json::from_str(
            r#"{
                "scalar": {"Roughness": 0.5},
                "vector": {"Tint": {"r": 1, "g": 0.5, "b": 0, "a": 1}},
                "texture": {"Albedo": "/Game/Tex/T_Albedo"},
                "static_switch": {"UseDetail": true}
            }"#,
        )
        .unwrap();
        assert_eq!(wrapped, bare);
    }

    #[test]
    fn test_override_defaults_to_true() {
        let set: MaterialParameterSet =
            serde_json::from_str(r#"{"scalar": {"Metallic": {"value": 1.0}}}"#).unwrap();
        assert!(set.scalar["Metallic"].overridden);
    }

    #[test]
    fn test_null_texture_in_both_shapes() {
        let set: MaterialParameterSet = serde_json::from_str(
            r#"{"texture": {"A": null, "B": {"value": null, "override": false}}}"#,
        )
        .unwrap();
        assert_eq!(set.texture["A"], ParameterEntry::overridden(None));
        assert_eq!(set.texture["B"].value, None);
        assert!(!set.texture["B"].overridden);
    }

    #[test]
    fn test_serializes_wrapped_shape() {
        let mut set = MaterialParameterSet::new();
        set.insert("Roughness", ParameterValue::Scalar(0.25));
        let json = serde_json::to_value(&set).unwrap();
        assert_eq!(
            json["scalar"]["Roughness"],
            serde_json::json!({"value": 0.25, "override": true})
        );
    }

    #[test]
    fn test_insert_keeps_names_unique_across_categories() {
        let mut set = MaterialParameterSet::new();
        set.insert("Mask", ParameterValue::Scalar(1.0));
        set.insert("Mask", ParameterValue::StaticSwitch(true));
        assert_eq!(set.len(), 1);
        assert_eq!(set.get("Mask"), Some(ParameterValue::StaticSwitch(true)));
    }

    #[test]
    fn test_missing_categories_default_empty() {
        let set: MaterialParameterSet = serde_json::from_str("{}").unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn test_parameter_kind_from_str() {
        assert_eq!("static_switch".parse::<ParameterKind>(), Ok(ParameterKind::StaticSwitch));
        assert!("float".parse::<ParameterKind>().is_err());
    }
}
