//! Preset location rules.
//!
//! A preset folder is derived from a material's logical asset path by
//! replacing the logical root (`/Game`) with the physical saved-data root
//! (`Saved/Material`) and appending a `Preset` segment:
//!
//! ```
//! use mipreset_spec::location::preset_folder;
//!
//! assert_eq!(
//!     preset_folder("/Game/Materials/Base"),
//!     "Saved/Material/Materials/Base/Preset"
//! );
//! ```
//!
//! Paths outside the logical root are appended to the saved root as they are.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{ErrorCode, ValidationError};

/// Logical root of project content.
pub const LOGICAL_ROOT: &str = "/Game";

/// Saved-data folder, relative to the project directory, that mirrors content paths.
pub const SAVED_ROOT: &str = "Saved/Material";

/// Segment appended to every preset folder.
pub const PRESET_SEGMENT: &str = "Preset";

/// File extension of preset documents.
pub const PRESET_EXTENSION: &str = "json";

/// Preset names are file stems in any script: letters, digits, and combining
/// marks plus space, `_`, `.`, and `-`. No separators, no control
/// characters, no leading dot, bounded length.
const PRESET_NAME_PATTERN: &str = r"^[\p{L}\p{N}][\p{L}\p{M}\p{N} _.\-]{0,127}$";

static PRESET_NAME_REGEX: OnceLock<Regex> = OnceLock::new();

fn preset_name_regex() -> &'static Regex {
    PRESET_NAME_REGEX
        .get_or_init(|| Regex::new(PRESET_NAME_PATTERN).expect("invalid regex pattern"))
}

/// Prefix substitution rules for deriving preset folders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PresetPathRules {
    /// Logical prefix that is replaced (e.g. `/Game`).
    pub logical_root: String,
    /// Physical prefix that replaces it (e.g. `Saved/Material`).
    pub saved_root: String,
    /// Final folder segment (e.g. `Preset`).
    pub preset_segment: String,
}

impl Default for PresetPathRules {
    fn default() -> Self {
        Self {
            logical_root: LOGICAL_ROOT.to_string(),
            saved_root: SAVED_ROOT.to_string(),
            preset_segment: PRESET_SEGMENT.to_string(),
        }
    }
}

impl PresetPathRules {
    /// Derives the preset folder (relative, `/`-separated) for a material path.
    pub fn preset_folder(&self, material_path: &str) -> String {
        let path = canonical_asset_path(material_path);
        let rest = strip_logical_root(&path, &self.logical_root).unwrap_or(&path);
        let rest = rest.trim_matches('/');

        let mut folder = self.saved_root.trim_end_matches('/').to_string();
        if !rest.is_empty() {
            folder.push('/');
            folder.push_str(rest);
        }
        let segment = self.preset_segment.trim_matches('/');
        if !segment.is_empty() {
            folder.push('/');
            folder.push_str(segment);
        }
        folder
    }
}

/// Returns the remainder after `root` when `path` is `root` itself or lies below it.
fn strip_logical_root<'a>(path: &'a str, root: &str) -> Option<&'a str> {
    let root = root.trim_end_matches('/');
    if root.is_empty() {
        return None;
    }
    let rest = path.strip_prefix(root)?;
    if rest.is_empty() || rest.starts_with('/') {
        Some(rest)
    } else {
        None
    }
}

/// Derives the preset folder for `material_path` using the default rules.
pub fn preset_folder(material_path: &str) -> String {
    PresetPathRules::default().preset_folder(material_path)
}

/// Strips a trailing `.ObjectName` from the last path segment and any trailing slash.
///
/// `/Game/Materials/Base.Base` becomes `/Game/Materials/Base`.
pub fn canonical_asset_path(path: &str) -> String {
    let path = path.trim().trim_end_matches('/');
    let (dir, leaf) = match path.rfind('/') {
        Some(idx) => path.split_at(idx + 1),
        None => ("", path),
    };
    let leaf = match leaf.find('.') {
        Some(idx) => &leaf[..idx],
        None => leaf,
    };
    format!("{}{}", dir, leaf)
}

/// Returns the object path form `/Pkg/Name.Name` of a package path.
pub fn object_path(path: &str) -> String {
    let package = canonical_asset_path(path);
    let name = package.rsplit('/').next().unwrap_or_default();
    format!("{}.{}", package, name)
}

/// File name for a preset (`<name>.json`).
pub fn preset_file_name(name: &str) -> String {
    format!("{}.{}", name, PRESET_EXTENSION)
}

/// Checks whether `name` can be used as a preset file stem.
pub fn is_valid_preset_name(name: &str) -> bool {
    preset_name_regex().is_match(name) && !name.ends_with('.')
}

/// Validates a preset name.
pub fn validate_preset_name(name: &str) -> Result<(), ValidationError> {
    if is_valid_preset_name(name) {
        Ok(())
    } else {
        Err(ValidationError::new(
            ErrorCode::InvalidPresetName,
            format!(
                "preset name '{}' must start with a letter or digit and contain only letters, digits, spaces, '_', '-', or '.'",
                name
            ),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_prefix_is_substituted() {
        assert_eq!(
            preset_folder("/Game/Materials/Base"),
            "Saved/Material/Materials/Base/Preset"
        );
    }

    #[test]
    fn test_object_suffix_is_ignored() {
        assert_eq!(
            preset_folder("/Game/Materials/Base.Base"),
            preset_folder("/Game/Materials/Base")
        );
    }

    #[test]
    fn test_foreign_prefix_is_kept_literally() {
        assert_eq!(
            preset_folder("/Engine/EngineMaterials/DefaultMaterial"),
            "Saved/Material/Engine/EngineMaterials/DefaultMaterial/Preset"
        );
        assert_eq!(
            preset_folder("/GameData/M_Thing"),
            "Saved/Material/GameData/M_Thing/Preset"
        );
    }

    #[test]
    fn test_bare_root() {
        assert_eq!(preset_folder("/Game"), "Saved/Material/Preset");
    }

    #[test]
    fn test_custom_rules() {
        let rules = PresetPathRules {
            logical_root: "/Plugin".to_string(),
            saved_root: "Presets/".to_string(),
            preset_segment: "Snapshots".to_string(),
        };
        assert_eq!(rules.preset_folder("/Plugin/M_A"), "Presets/M_A/Snapshots");
    }

    #[test]
    fn test_canonical_asset_path() {
        assert_eq!(canonical_asset_path("/Game/M/Base.Base"), "/Game/M/Base");
        assert_eq!(canonical_asset_path("/Game/M/Base/"), "/Game/M/Base");
        assert_eq!(canonical_asset_path("/Game/M.v2/Base"), "/Game/M.v2/Base");
    }

    #[test]
    fn test_object_path() {
        assert_eq!(object_path("/Game/Tex/T_Albedo"), "/Game/Tex/T_Albedo.T_Albedo");
        assert_eq!(object_path("/Game/Tex/T_Albedo.T_Albedo"), "/Game/Tex/T_Albedo.T_Albedo");
    }

    #[test]
    fn test_preset_names() {
        for name in ["metal_01", "Rusty Metal", "v1.2-final", "9", "메탈_01", "Rouillé", "錆び"] {
            assert!(is_valid_preset_name(name), "expected valid: {}", name);
        }
        for name in [
            "",
            ".hidden",
            "../escape",
            "a/b",
            "a\\b",
            "trailing.",
            "-dash",
            "tab\there",
            "new\nline",
            "メタル/01",
            "金属.",
        ] {
            assert!(!is_valid_preset_name(name), "expected invalid: {}", name);
        }
        let err = validate_preset_name("a/b").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidPresetName);
    }
}
