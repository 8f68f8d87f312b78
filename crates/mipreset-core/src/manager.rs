//! Preset manager: save, load, list, and delete named presets.
//!
//! Presets are keyed by an ancestor of the instance (see [`PresetScope`]), so
//! every instance sharing that ancestor sees the same presets.

use std::io;
use std::path::PathBuf;

use mipreset_spec::location::{preset_file_name, validate_preset_name, PRESET_EXTENSION};
use mipreset_spec::validation::validate_document;
use mipreset_spec::{PresetDocument, SpecError};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::config::PresetConfig;
use crate::error::PresetError;
use crate::fsutil::write_atomic;
use crate::host::MaterialHost;
use crate::resolver::PresetScope;
use crate::serializer::{self, ApplyReport};

/// Stores presets below a project directory.
#[derive(Debug, Clone, Default)]
pub struct PresetManager {
    config: PresetConfig,
}

impl PresetManager {
    pub fn new(config: PresetConfig) -> Self {
        Self { config }
    }

    /// Preset folder for `instance` under `scope`.
    pub fn preset_dir(
        &self,
        scope: PresetScope,
        host: &dyn MaterialHost,
        instance: &str,
    ) -> Result<PathBuf, PresetError> {
        let ancestor = scope
            .ancestor(host, instance)
            .ok_or_else(|| PresetError::NoAncestor {
                instance: instance.to_string(),
                scope,
            })?;
        let dir = self.config.preset_dir(&ancestor);
        debug!(
            instance,
            %scope,
            ancestor = ancestor.as_str(),
            dir = %dir.display(),
            "resolved preset folder"
        );
        Ok(dir)
    }

    /// File path of preset `name` for `instance` under `scope`.
    ///
    /// The name is checked before anything else is resolved.
    pub fn preset_path(
        &self,
        scope: PresetScope,
        host: &dyn MaterialHost,
        instance: &str,
        name: &str,
    ) -> Result<PathBuf, PresetError> {
        validate_preset_name(name).map_err(PresetError::InvalidName)?;
        Ok(self
            .preset_dir(scope, host, instance)?
            .join(preset_file_name(name)))
    }

    /// Serializes `instance` and writes it as preset `name`.
    ///
    /// Overwrites an existing preset of the same name. Returns the file path.
    pub fn save(
        &self,
        scope: PresetScope,
        host: &dyn MaterialHost,
        instance: &str,
        name: &str,
    ) -> Result<PathBuf, PresetError> {
        let path = self.preset_path(scope, host, instance, name)?;
        let doc = serializer::serialize(host, instance)?;
        let json = doc.to_json_pretty().map_err(|e| match e {
            SpecError::JsonParse(source) => PresetError::Json {
                path: path.clone(),
                source,
            },
            SpecError::Io(source) => PresetError::io(&path, source),
        })?;
        write_atomic(&path, json.as_bytes()).map_err(|e| PresetError::io(&path, e))?;
        debug!(instance, path = %path.display(), "saved preset");
        Ok(path)
    }

    /// Reads and validates preset `name` without applying it.
    pub fn read(
        &self,
        scope: PresetScope,
        host: &dyn MaterialHost,
        instance: &str,
        name: &str,
    ) -> Result<PresetDocument, PresetError> {
        let path = self.preset_path(scope, host, instance, name)?;
        let content = std::fs::read_to_string(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => PresetError::NotFound { path: path.clone() },
            _ => PresetError::io(&path, e),
        })?;
        let doc: PresetDocument =
            serde_json::from_str(&content).map_err(|source| PresetError::Json {
                path: path.clone(),
                source,
            })?;

        let warnings = validate_document(&doc)
            .into_result()
            .map_err(|errors| PresetError::Invalid {
                path: path.clone(),
                errors,
            })?;
        for warning in &warnings {
            debug!(path = %path.display(), "{}", warning);
        }
        Ok(doc)
    }

    /// Reads preset `name` and applies it to `instance`.
    ///
    /// A preset captured from another instance applies as long as the
    /// parameter names match; mismatches are reported as skipped.
    pub fn load(
        &self,
        scope: PresetScope,
        host: &mut dyn MaterialHost,
        instance: &str,
        name: &str,
    ) -> Result<ApplyReport, PresetError> {
        let doc = self.read(scope, &*host, instance, name)?;
        let report = serializer::deserialize(host, instance, &doc.parameters)?;
        if !report.is_complete() {
            warn!(
                instance,
                preset = name,
                skipped = report.skipped.len(),
                "preset applied partially"
            );
        }
        Ok(report)
    }

    /// Names of the presets available to `instance`, sorted.
    ///
    /// Empty when the ancestor cannot be resolved or the folder is missing
    /// or unreadable.
    pub fn list(&self, scope: PresetScope, host: &dyn MaterialHost, instance: &str) -> Vec<String> {
        let dir = match self.preset_dir(scope, host, instance) {
            Ok(dir) => dir,
            Err(err) => {
                debug!(instance, "no presets: {}", err);
                return Vec::new();
            }
        };

        let mut names: Vec<String> = WalkDir::new(&dir)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| {
                e.path()
                    .extension()
                    .is_some_and(|ext| ext == PRESET_EXTENSION)
            })
            .filter_map(|e| {
                e.path()
                    .file_stem()
                    .map(|stem| stem.to_string_lossy().into_owned())
            })
            .collect();
        names.sort();
        names
    }

    /// Removes preset `name`. `Ok(false)` when it did not exist.
    pub fn delete(
        &self,
        scope: PresetScope,
        host: &dyn MaterialHost,
        instance: &str,
        name: &str,
    ) -> Result<bool, PresetError> {
        let path = self.preset_path(scope, host, instance, name)?;
        match std::fs::remove_file(&path) {
            Ok(()) => {
                debug!(path = %path.display(), "deleted preset");
                Ok(true)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(PresetError::io(&path, e)),
        }
    }

    pub fn save_root_preset(
        &self,
        host: &dyn MaterialHost,
        instance: &str,
        name: &str,
    ) -> Result<PathBuf, PresetError> {
        self.save(PresetScope::Root, host, instance, name)
    }

    pub fn save_parent_preset(
        &self,
        host: &dyn MaterialHost,
        instance: &str,
        name: &str,
    ) -> Result<PathBuf, PresetError> {
        self.save(PresetScope::Parent, host, instance, name)
    }

    pub fn load_root_preset(
        &self,
        host: &mut dyn MaterialHost,
        instance: &str,
        name: &str,
    ) -> Result<ApplyReport, PresetError> {
        self.load(PresetScope::Root, host, instance, name)
    }

    pub fn load_parent_preset(
        &self,
        host: &mut dyn MaterialHost,
        instance: &str,
        name: &str,
    ) -> Result<ApplyReport, PresetError> {
        self.load(PresetScope::Parent, host, instance, name)
    }

    pub fn list_root_presets(&self, host: &dyn MaterialHost, instance: &str) -> Vec<String> {
        self.list(PresetScope::Root, host, instance)
    }

    pub fn list_parent_presets(&self, host: &dyn MaterialHost, instance: &str) -> Vec<String> {
        self.list(PresetScope::Parent, host, instance)
    }

    pub fn delete_root_preset(
        &self,
        host: &dyn MaterialHost,
        instance: &str,
        name: &str,
    ) -> Result<bool, PresetError> {
        self.delete(PresetScope::Root, host, instance, name)
    }

    pub fn delete_parent_preset(
        &self,
        host: &dyn MaterialHost,
        instance: &str,
        name: &str,
    ) -> Result<bool, PresetError> {
        self.delete(PresetScope::Parent, host, instance, name)
    }
}
