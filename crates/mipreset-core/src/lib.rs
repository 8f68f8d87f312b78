//! Material Instance Preset Engine
//!
//! This crate captures material-instance parameters as preset documents,
//! stores them in folders keyed by an ancestor material, applies them back,
//! and migrates parameters between material schemas.
//!
//! All operations run against a [`MaterialHost`]. [`MaterialLibrary`] is a
//! JSON-backed host used by the `mipreset` CLI and by tests.
//!
//! # Example
//!
//! ```
//! use mipreset_core::library::{MaterialAsset, MaterialLibrary};
//! use mipreset_core::{PresetConfig, PresetManager};
//!
//! let project = tempfile::tempdir().unwrap();
//! let mut lib = MaterialLibrary::new();
//! lib.insert("/Game/Materials/Base", MaterialAsset::material().with_scalar("Roughness", 0.5))
//!     .insert("/Game/Props/MI_Crate", MaterialAsset::instance("/Game/Materials/Base"))
//!     .insert("/Game/Props/MI_Barrel", MaterialAsset::instance("/Game/Materials/Base"));
//!
//! let manager = PresetManager::new(PresetConfig::new(project.path()));
//! manager.save_root_preset(&lib, "/Game/Props/MI_Crate", "metal_01").unwrap();
//!
//! // instances sharing a root share presets
//! assert_eq!(manager.list_root_presets(&lib, "/Game/Props/MI_Barrel"), vec!["metal_01"]);
//! ```
//!
//! # Modules
//!
//! - [`config`]: Preset folder configuration
//! - [`error`]: Preset and migration errors
//! - [`host`]: Host capability trait
//! - [`library`]: JSON-backed host
//! - [`manager`]: Save, load, list, and delete presets
//! - [`migrate`]: Expression-driven parameter migration
//! - [`resolver`]: Root and parent material resolution
//! - [`serializer`]: Instance to document and back

pub mod config;
pub mod error;
mod fsutil;
pub mod host;
pub mod library;
pub mod manager;
pub mod migrate;
pub mod resolver;
pub mod serializer;

pub use config::PresetConfig;
pub use error::{MigrationError, PresetError};
pub use host::{HostError, MaterialHost};
pub use library::MaterialLibrary;
pub use manager::PresetManager;
pub use migrate::{
    load_migration_table, migrate_material_instance, migrate_parameters, MappingError,
    MappingFailure, MigrationOutcome, MigrationReport,
};
pub use resolver::{parent_material_path, root_material_path, PresetScope};
pub use serializer::{deserialize, serialize, ApplyReport, SkipReason, SkippedParameter};
