//! Settings shared by every command: library file, project, and output mode.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use mipreset_core::{MaterialLibrary, PresetConfig, PresetManager};
use tracing::debug;

/// Resolved global options.
#[derive(Debug, Clone)]
pub struct Session {
    library: Option<PathBuf>,
    pub config: PresetConfig,
    /// Print machine-readable JSON instead of colored text.
    pub json: bool,
}

impl Session {
    /// Builds a session from the global flags.
    ///
    /// The config file is read first; `--project` overrides its
    /// `project_dir`.
    pub fn new(
        library: Option<&str>,
        project: Option<&str>,
        config: Option<&str>,
        json: bool,
    ) -> Result<Self> {
        let mut preset_config = match config {
            Some(path) => PresetConfig::from_file(Path::new(path))
                .with_context(|| format!("Failed to read config file: {}", path))?,
            None => PresetConfig::default(),
        };
        if let Some(project) = project {
            preset_config.project_dir = PathBuf::from(project);
        }
        Ok(Self {
            library: library.map(PathBuf::from),
            config: preset_config,
            json,
        })
    }

    /// Path of the material library file.
    pub fn library_path(&self) -> Result<&Path> {
        self.library
            .as_deref()
            .context("this command needs a material library (--library <file>)")
    }

    /// Reads the material library.
    pub fn load_library(&self) -> Result<MaterialLibrary> {
        let path = self.library_path()?;
        debug!(path = %path.display(), "loading material library");
        MaterialLibrary::from_file(path)
            .with_context(|| format!("Failed to read material library: {}", path.display()))
    }

    /// Writes the material library back to its file.
    pub fn save_library(&self, library: &MaterialLibrary) -> Result<()> {
        let path = self.library_path()?;
        debug!(path = %path.display(), "writing material library");
        library
            .to_file(path)
            .with_context(|| format!("Failed to write material library: {}", path.display()))
    }

    /// Preset manager for the configured project.
    pub fn manager(&self) -> PresetManager {
        PresetManager::new(self.config.clone())
    }
}
