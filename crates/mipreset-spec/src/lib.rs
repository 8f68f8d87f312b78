//! Material Instance Preset Document Library
//!
//! This crate provides the data model, file format, path rules, and
//! validation for material-instance presets. A preset is a JSON document
//! holding the parameter overrides of one material instance, grouped into
//! four categories: scalar, vector, texture, and static switch.
//!
//! # Example
//!
//! ```
//! use mipreset_spec::{LinearColor, ParameterValue, PresetDocument};
//! use mipreset_spec::location::preset_folder;
//! use mipreset_spec::validation::validate_document;
//!
//! let mut doc = PresetDocument::new("/Game/Props/MI_Crate");
//! doc.metadata.root_material = Some("/Game/Materials/Base".to_string());
//! doc.parameters.insert("Roughness", ParameterValue::Scalar(0.35));
//! doc.parameters.insert("Tint", ParameterValue::Vector(LinearColor::rgb(0.8, 0.6, 0.4)));
//!
//! assert!(validate_document(&doc).is_ok());
//! assert_eq!(preset_folder("/Game/Materials/Base"), "Saved/Material/Materials/Base/Preset");
//!
//! let json = doc.to_json_pretty().unwrap();
//! assert_eq!(PresetDocument::from_json(&json).unwrap(), doc);
//! ```
//!
//! # Modules
//!
//! - [`color`]: Linear RGBA color for vector parameters
//! - [`document`]: Preset document and metadata
//! - [`error`]: Error and warning types
//! - [`location`]: Preset folder derivation and preset name rules
//! - [`migration`]: Migration table types
//! - [`parameter`]: Parameter set and value shapes
//! - [`validation`]: Document validation

pub mod color;
pub mod document;
pub mod error;
pub mod location;
pub mod migration;
pub mod parameter;
pub mod validation;

pub use color::LinearColor;
pub use document::{PresetDocument, PresetMetadata};
pub use error::{
    ErrorCode, SpecError, ValidationError, ValidationResult, ValidationWarning, WarningCode,
};
pub use location::{
    canonical_asset_path, is_valid_preset_name, object_path, preset_file_name, preset_folder,
    validate_preset_name, PresetPathRules,
};
pub use migration::{MigrationTable, ParameterMapping};
pub use parameter::{MaterialParameterSet, ParameterEntry, ParameterKind, ParameterValue};
pub use validation::validate_document;
