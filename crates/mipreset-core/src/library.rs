//! JSON-backed material library.
//!
//! A [`MaterialLibrary`] is a stand-alone [`MaterialHost`]: base materials
//! declare parameters with default values, instances point at a parent and
//! hold overrides. The parameter names of an instance are the names declared
//! by its root material, mirroring how an editor reports them.
//!
//! ```json
//! {
//!     "materials": {
//!         "/Game/Materials/Base": { "scalar": { "Roughness": 0.5 } },
//!         "/Game/Props/MI_Crate": { "kind": "instance", "parent": "/Game/Materials/Base" }
//!     },
//!     "textures": ["/Game/Textures/T_Wood"]
//! }
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use mipreset_spec::location::{canonical_asset_path, object_path};
use mipreset_spec::{LinearColor, ParameterKind, SpecError};
use serde::{Deserialize, Serialize};

use crate::fsutil::write_atomic;
use crate::host::{HostError, MaterialHost};

/// Parent chains longer than this are treated as broken.
pub const MAX_PARENT_DEPTH: usize = 64;

/// Whether an asset is a base material or an instance of one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetKind {
    #[default]
    Material,
    Instance,
}

/// A material or material instance.
///
/// For a base material the parameter maps declare the parameters and their
/// defaults. For an instance they hold overrides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MaterialAsset {
    #[serde(default)]
    pub kind: AssetKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub scalar: BTreeMap<String, f32>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub vector: BTreeMap<String, LinearColor>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub texture: BTreeMap<String, Option<String>>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub static_switch: BTreeMap<String, bool>,
}

impl MaterialAsset {
    /// A base material with no parameters.
    pub fn material() -> Self {
        Self::default()
    }

    /// An instance of `parent` with no overrides.
    pub fn instance(parent: impl Into<String>) -> Self {
        Self {
            kind: AssetKind::Instance,
            parent: Some(parent.into()),
            ..Default::default()
        }
    }

    pub fn with_scalar(mut self, name: impl Into<String>, value: f32) -> Self {
        self.scalar.insert(name.into(), value);
        self
    }

    pub fn with_vector(mut self, name: impl Into<String>, value: LinearColor) -> Self {
        self.vector.insert(name.into(), value);
        self
    }

    pub fn with_texture(mut self, name: impl Into<String>, value: Option<&str>) -> Self {
        self.texture.insert(name.into(), value.map(str::to_string));
        self
    }

    pub fn with_static_switch(mut self, name: impl Into<String>, value: bool) -> Self {
        self.static_switch.insert(name.into(), value);
        self
    }

    fn is_instance(&self) -> bool {
        self.kind == AssetKind::Instance
    }
}

/// Materials, instances, and textures known to the host.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MaterialLibrary {
    #[serde(default)]
    pub materials: BTreeMap<String, MaterialAsset>,
    #[serde(default)]
    pub textures: BTreeSet<String>,
    /// Assets that cannot be saved (e.g. checked out elsewhere).
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub locked: BTreeSet<String>,
    #[serde(skip)]
    saved: BTreeSet<String>,
}

impl MaterialLibrary {
    /// Creates an empty library.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a library file.
    pub fn from_file(path: &Path) -> Result<Self, SpecError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parses a library from JSON text.
    pub fn from_json(json: &str) -> Result<Self, SpecError> {
        let raw: MaterialLibrary = serde_json::from_str(json)?;
        // keys are looked up by package path
        let materials = raw
            .materials
            .into_iter()
            .map(|(path, asset)| (canonical_asset_path(&path), asset))
            .collect();
        let textures = raw
            .textures
            .iter()
            .map(|t| canonical_asset_path(t))
            .collect();
        Ok(Self {
            materials,
            textures,
            locked: raw.locked.iter().map(|p| canonical_asset_path(p)).collect(),
            saved: BTreeSet::new(),
        })
    }

    /// Writes the library as pretty JSON, replacing `path` atomically.
    pub fn to_file(&self, path: &Path) -> Result<(), SpecError> {
        let json = serde_json::to_string_pretty(self)?;
        write_atomic(path, json.as_bytes())?;
        Ok(())
    }

    /// Adds or replaces an asset.
    pub fn insert(&mut self, path: &str, asset: MaterialAsset) -> &mut Self {
        self.materials.insert(canonical_asset_path(path), asset);
        self
    }

    /// Registers a texture asset.
    pub fn add_texture(&mut self, path: &str) -> &mut Self {
        self.textures.insert(canonical_asset_path(path));
        self
    }

    /// Looks up an asset by package or object path.
    pub fn asset(&self, path: &str) -> Option<&MaterialAsset> {
        self.materials.get(&canonical_asset_path(path))
    }

    /// Paths passed to a successful [`MaterialHost::save_asset`] since load.
    pub fn saved_assets(&self) -> &BTreeSet<String> {
        &self.saved
    }

    fn existing(&self, path: &str) -> Result<(String, &MaterialAsset), HostError> {
        let key = canonical_asset_path(path);
        match self.materials.get(&key) {
            Some(asset) => Ok((key, asset)),
            None => Err(HostError::AssetNotFound {
                path: path.to_string(),
            }),
        }
    }

    fn instance_mut(&mut self, path: &str) -> Result<&mut MaterialAsset, HostError> {
        let key = canonical_asset_path(path);
        match self.materials.get_mut(&key) {
            Some(asset) if asset.is_instance() => Ok(asset),
            Some(_) => Err(HostError::NotAnInstance {
                path: path.to_string(),
            }),
            None => Err(HostError::AssetNotFound {
                path: path.to_string(),
            }),
        }
    }

    /// The asset itself followed by its ancestors, ending at the root
    /// material. Returns `None` when the chain is broken, cyclic, or too deep.
    fn chain(&self, path: &str) -> Result<Option<Vec<&MaterialAsset>>, HostError> {
        let (_, mut current) = self.existing(path)?;
        let mut chain = vec![current];
        while current.is_instance() {
            if chain.len() > MAX_PARENT_DEPTH {
                return Ok(None);
            }
            let Some(parent) = current.parent.as_deref() else {
                return Ok(None);
            };
            let Some(next) = self.asset(parent) else {
                return Ok(None);
            };
            current = next;
            chain.push(current);
        }
        Ok(Some(chain))
    }

    fn names<T>(
        &self,
        path: &str,
        select: fn(&MaterialAsset) -> &BTreeMap<String, T>,
    ) -> Result<Vec<String>, HostError> {
        Ok(match self.chain(path)? {
            Some(chain) => chain
                .last()
                .map(|root| select(root).keys().cloned().collect())
                .unwrap_or_default(),
            None => Vec::new(),
        })
    }

    fn value<T: Clone>(
        &self,
        path: &str,
        kind: ParameterKind,
        name: &str,
        select: fn(&MaterialAsset) -> &BTreeMap<String, T>,
    ) -> Result<T, HostError> {
        let unknown = || HostError::UnknownParameter {
            path: path.to_string(),
            kind: kind.to_string(),
            name: name.to_string(),
        };
        let chain = self.chain(path)?.ok_or_else(unknown)?;
        let declared = chain
            .last()
            .is_some_and(|root| select(root).contains_key(name));
        if !declared {
            return Err(unknown());
        }
        chain
            .iter()
            .find_map(|asset| select(asset).get(name).cloned())
            .ok_or_else(unknown)
    }

    fn check_declared<T>(
        &self,
        path: &str,
        kind: ParameterKind,
        name: &str,
        select: fn(&MaterialAsset) -> &BTreeMap<String, T>,
    ) -> Result<(), HostError> {
        let names = self.names(path, select)?;
        if names.iter().any(|n| n == name) {
            Ok(())
        } else {
            Err(HostError::UnknownParameter {
                path: path.to_string(),
                kind: kind.to_string(),
                name: name.to_string(),
            })
        }
    }
}

impl MaterialHost for MaterialLibrary {
    fn is_material_instance(&self, path: &str) -> bool {
        self.asset(path).is_some_and(MaterialAsset::is_instance)
    }

    fn contains_asset(&self, path: &str) -> bool {
        let key = canonical_asset_path(path);
        self.materials.contains_key(&key) || self.textures.contains(&key)
    }

    fn parent_material(&self, path: &str) -> Option<String> {
        self.asset(path)
            .filter(|asset| asset.is_instance())
            .and_then(|asset| asset.parent.clone())
    }

    fn set_parent_material(&mut self, path: &str, parent: &str) -> Result<(), HostError> {
        let key = canonical_asset_path(path);
        let parent_key = canonical_asset_path(parent);
        self.existing(parent)?;

        // walk up from the new parent; reaching `path` means a cycle
        let mut cursor = Some(parent_key.clone());
        let mut hops = 0;
        while let Some(current) = cursor {
            if current == key || hops > MAX_PARENT_DEPTH {
                return Err(HostError::ParentCycle {
                    path: path.to_string(),
                    parent: parent.to_string(),
                });
            }
            cursor = self.parent_material(&current).map(|p| canonical_asset_path(&p));
            hops += 1;
        }

        self.instance_mut(path)?.parent = Some(parent_key);
        Ok(())
    }

    fn scalar_parameter_names(&self, path: &str) -> Result<Vec<String>, HostError> {
        self.names(path, |a| &a.scalar)
    }

    fn get_scalar(&self, path: &str, name: &str) -> Result<f32, HostError> {
        self.value(path, ParameterKind::Scalar, name, |a| &a.scalar)
    }

    fn set_scalar(&mut self, path: &str, name: &str, value: f32) -> Result<(), HostError> {
        self.check_declared(path, ParameterKind::Scalar, name, |a| &a.scalar)?;
        self.instance_mut(path)?
            .scalar
            .insert(name.to_string(), value);
        Ok(())
    }

    fn vector_parameter_names(&self, path: &str) -> Result<Vec<String>, HostError> {
        self.names(path, |a| &a.vector)
    }

    fn get_vector(&self, path: &str, name: &str) -> Result<LinearColor, HostError> {
        self.value(path, ParameterKind::Vector, name, |a| &a.vector)
    }

    fn set_vector(
        &mut self,
        path: &str,
        name: &str,
        value: LinearColor,
    ) -> Result<(), HostError> {
        self.check_declared(path, ParameterKind::Vector, name, |a| &a.vector)?;
        self.instance_mut(path)?
            .vector
            .insert(name.to_string(), value);
        Ok(())
    }

    fn texture_parameter_names(&self, path: &str) -> Result<Vec<String>, HostError> {
        self.names(path, |a| &a.texture)
    }

    fn get_texture(&self, path: &str, name: &str) -> Result<Option<String>, HostError> {
        self.value(path, ParameterKind::Texture, name, |a| &a.texture)
    }

    fn set_texture(
        &mut self,
        path: &str,
        name: &str,
        texture: Option<&str>,
    ) -> Result<(), HostError> {
        self.check_declared(path, ParameterKind::Texture, name, |a| &a.texture)?;
        if let Some(texture) = texture {
            if !self.textures.contains(&canonical_asset_path(texture)) {
                return Err(HostError::AssetNotFound {
                    path: texture.to_string(),
                });
            }
        }
        self.instance_mut(path)?
            .texture
            .insert(name.to_string(), texture.map(str::to_string));
        Ok(())
    }

    fn static_switch_parameter_names(&self, path: &str) -> Result<Vec<String>, HostError> {
        self.names(path, |a| &a.static_switch)
    }

    fn get_static_switch(&self, path: &str, name: &str) -> Result<bool, HostError> {
        self.value(path, ParameterKind::StaticSwitch, name, |a| &a.static_switch)
    }

    fn set_static_switch(
        &mut self,
        path: &str,
        name: &str,
        value: bool,
    ) -> Result<(), HostError> {
        self.check_declared(path, ParameterKind::StaticSwitch, name, |a| {
            &a.static_switch
        })?;
        self.instance_mut(path)?
            .static_switch
            .insert(name.to_string(), value);
        Ok(())
    }

    /// Matches `candidate` against registered package paths and their
    /// object paths. No normalization is applied to `candidate`.
    fn load_texture(&self, candidate: &str) -> Option<String> {
        self.textures
            .iter()
            .find(|t| t.as_str() == candidate || object_path(t) == candidate)
            .cloned()
    }

    fn save_asset(&mut self, path: &str) -> Result<(), HostError> {
        let (key, _) = self.existing(path)?;
        if self.locked.contains(&key) {
            return Err(HostError::SaveFailed {
                path: path.to_string(),
                message: "asset is locked".to_string(),
            });
        }
        self.saved.insert(key);
        Ok(())
    }
}
