//! Preset location resolver: which ancestor keys an instance's presets.

use std::fmt;
use std::str::FromStr;

use mipreset_spec::location::canonical_asset_path;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::host::MaterialHost;
use crate::library::MAX_PARENT_DEPTH;

/// Which ancestor a preset folder is keyed by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PresetScope {
    /// The top-most non-instance ancestor.
    #[default]
    Root,
    /// The immediate parent.
    Parent,
}

impl PresetScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            PresetScope::Root => "root",
            PresetScope::Parent => "parent",
        }
    }

    /// Resolves the ancestor path for `instance` under this scope.
    pub fn ancestor(&self, host: &dyn MaterialHost, instance: &str) -> Option<String> {
        match self {
            PresetScope::Root => root_material_path(host, instance),
            PresetScope::Parent => parent_material_path(host, instance),
        }
    }
}

impl fmt::Display for PresetScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PresetScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "root" => Ok(PresetScope::Root),
            "parent" => Ok(PresetScope::Parent),
            other => Err(format!("unknown preset scope '{}'", other)),
        }
    }
}

/// Immediate parent of `instance`, as a package path.
pub fn parent_material_path(host: &dyn MaterialHost, instance: &str) -> Option<String> {
    host.parent_material(instance)
        .map(|p| canonical_asset_path(&p))
}

/// Walks the parent chain of `instance` up to the first ancestor that is not
/// an instance and returns its package path.
///
/// `None` when `instance` has no parent, or the chain is cyclic or deeper
/// than [`MAX_PARENT_DEPTH`].
pub fn root_material_path(host: &dyn MaterialHost, instance: &str) -> Option<String> {
    let mut current = parent_material_path(host, instance)?;
    for _ in 0..MAX_PARENT_DEPTH {
        if !host.is_material_instance(&current) {
            return Some(current);
        }
        current = parent_material_path(host, &current)?;
    }
    debug!(asset = instance, "parent chain exceeds {} hops", MAX_PARENT_DEPTH);
    None
}
