//! Host capability interface.
//!
//! The serializer, resolver, and migration engine only talk to the material
//! system through [`MaterialHost`]. An editor binding implements it over the
//! live object model; [`crate::library::MaterialLibrary`] implements it over a
//! JSON file.

use mipreset_spec::LinearColor;
use thiserror::Error;

/// Errors reported by a material host.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HostError {
    /// H001: No asset exists at the path.
    #[error("H001: asset not found: {path}")]
    AssetNotFound { path: String },

    /// H002: The asset exists but is not a material instance.
    #[error("H002: '{path}' is not a material instance")]
    NotAnInstance { path: String },

    /// H003: The material has no parameter with that name and type.
    #[error("H003: '{path}' has no {kind} parameter '{name}'")]
    UnknownParameter {
        path: String,
        kind: String,
        name: String,
    },

    /// H004: Setting a parent would make the chain cyclic.
    #[error("H004: setting parent of '{path}' to '{parent}' would create a cycle")]
    ParentCycle { path: String, parent: String },

    /// H005: The asset could not be persisted.
    #[error("H005: failed to save '{path}': {message}")]
    SaveFailed { path: String, message: String },
}

impl HostError {
    /// Returns the error code (e.g., "H001").
    pub fn code(&self) -> &'static str {
        match self {
            HostError::AssetNotFound { .. } => "H001",
            HostError::NotAnInstance { .. } => "H002",
            HostError::UnknownParameter { .. } => "H003",
            HostError::ParentCycle { .. } => "H004",
            HostError::SaveFailed { .. } => "H005",
        }
    }
}

/// Typed access to materials and material instances.
///
/// Paths are logical asset paths (`/Game/...`). Implementations should accept
/// both package paths and object paths (`/Game/M/Base.Base`).
pub trait MaterialHost {
    /// Whether `path` names a material instance.
    fn is_material_instance(&self, path: &str) -> bool;

    /// Whether any asset (material, instance, or texture) exists at `path`.
    fn contains_asset(&self, path: &str) -> bool;

    /// The immediate parent of a material instance, if any.
    fn parent_material(&self, path: &str) -> Option<String>;

    /// Re-parents a material instance.
    fn set_parent_material(&mut self, path: &str, parent: &str) -> Result<(), HostError>;

    fn scalar_parameter_names(&self, path: &str) -> Result<Vec<String>, HostError>;
    fn get_scalar(&self, path: &str, name: &str) -> Result<f32, HostError>;
    fn set_scalar(&mut self, path: &str, name: &str, value: f32) -> Result<(), HostError>;

    fn vector_parameter_names(&self, path: &str) -> Result<Vec<String>, HostError>;
    fn get_vector(&self, path: &str, name: &str) -> Result<LinearColor, HostError>;
    fn set_vector(&mut self, path: &str, name: &str, value: LinearColor)
        -> Result<(), HostError>;

    fn texture_parameter_names(&self, path: &str) -> Result<Vec<String>, HostError>;
    fn get_texture(&self, path: &str, name: &str) -> Result<Option<String>, HostError>;
    /// Assigns a texture. `texture` is a reference returned by
    /// [`MaterialHost::load_texture`], or `None` to clear the slot.
    fn set_texture(
        &mut self,
        path: &str,
        name: &str,
        texture: Option<&str>,
    ) -> Result<(), HostError>;

    fn static_switch_parameter_names(&self, path: &str) -> Result<Vec<String>, HostError>;
    fn get_static_switch(&self, path: &str, name: &str) -> Result<bool, HostError>;
    fn set_static_switch(&mut self, path: &str, name: &str, value: bool)
        -> Result<(), HostError>;

    /// Resolves a texture reference. Returns the host's reference for the
    /// texture, or `None` when nothing matches `candidate` exactly.
    fn load_texture(&self, candidate: &str) -> Option<String>;

    /// Persists pending changes of an asset.
    fn save_asset(&mut self, path: &str) -> Result<(), HostError>;
}
