//! Preset manager configuration.

use std::path::{Path, PathBuf};

use mipreset_spec::location::{LOGICAL_ROOT, PRESET_SEGMENT, SAVED_ROOT};
use mipreset_spec::{PresetPathRules, SpecError};
use serde::{Deserialize, Serialize};

/// Where presets live on disk.
///
/// Every field has a default, so a config file only needs the keys it
/// changes:
///
/// ```json
/// { "saved_root": "Saved/Presets" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PresetConfig {
    /// Project directory; preset folders are resolved below it.
    pub project_dir: PathBuf,
    /// Logical asset root replaced by `saved_root`.
    pub logical_root: String,
    /// Project-relative folder that mirrors the logical root.
    pub saved_root: String,
    /// Folder name appended to every preset folder.
    pub preset_segment: String,
}

impl Default for PresetConfig {
    fn default() -> Self {
        Self {
            project_dir: PathBuf::from("."),
            logical_root: LOGICAL_ROOT.to_string(),
            saved_root: SAVED_ROOT.to_string(),
            preset_segment: PRESET_SEGMENT.to_string(),
        }
    }
}

impl PresetConfig {
    /// Default configuration rooted at `project_dir`.
    pub fn new(project_dir: impl Into<PathBuf>) -> Self {
        Self {
            project_dir: project_dir.into(),
            ..Default::default()
        }
    }

    /// Reads a JSON config file; missing keys take their defaults.
    pub fn from_file(path: &Path) -> Result<Self, SpecError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Path substitution rules derived from this configuration.
    pub fn path_rules(&self) -> PresetPathRules {
        PresetPathRules {
            logical_root: self.logical_root.clone(),
            saved_root: self.saved_root.clone(),
            preset_segment: self.preset_segment.clone(),
        }
    }

    /// Absolute (or project-relative) preset folder for a material path.
    pub fn preset_dir(&self, material_path: &str) -> PathBuf {
        let folder = self.path_rules().preset_folder(material_path);
        folder
            .split('/')
            .filter(|s| !s.is_empty())
            .fold(self.project_dir.clone(), |dir, segment| dir.join(segment))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: PresetConfig =
            serde_json::from_str(r#"{ "saved_root": "Saved/Presets" }"#).unwrap();
        assert_eq!(config.saved_root, "Saved/Presets");
        assert_eq!(config.logical_root, "/Game");
        assert_eq!(config.preset_segment, "Preset");
        assert_eq!(config.project_dir, PathBuf::from("."));
    }

    #[test]
    fn test_preset_dir() {
        let config = PresetConfig::new("/proj");
        assert_eq!(
            config.preset_dir("/Game/Materials/Base"),
            Path::new("/proj")
                .join("Saved")
                .join("Material")
                .join("Materials")
                .join("Base")
                .join("Preset")
        );
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mipreset.json");
        std::fs::write(&path, r#"{ "preset_segment": "Looks" }"#).unwrap();
        let config = PresetConfig::from_file(&path).unwrap();
        assert_eq!(config.preset_segment, "Looks");
        assert!(PresetConfig::from_file(&dir.path().join("missing.json")).is_err());
    }
}
