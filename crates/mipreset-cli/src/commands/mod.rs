//! CLI command implementations

pub mod delete;
pub mod eval;
pub mod list;
pub mod load;
pub mod migrate;
pub mod save;
pub mod show;
pub mod validate;

pub mod json_output;

use anyhow::Result;
use mipreset_core::PresetScope;

/// Parses a `--scope` value.
pub(crate) fn parse_scope(scope: &str) -> Result<PresetScope> {
    scope.parse::<PresetScope>().map_err(anyhow::Error::msg)
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::path::PathBuf;
    use std::process::ExitCode;

    use mipreset_core::library::{MaterialAsset, MaterialLibrary};
    use tempfile::TempDir;

    use crate::session::Session;

    pub const BASE: &str = "/Game/Materials/Base";
    pub const CRATE: &str = "/Game/Props/MI_Crate";
    pub const BARREL: &str = "/Game/Props/MI_Barrel";

    /// A project directory holding `library.json` with one base material and
    /// two instances of it.
    pub struct Fixture {
        pub dir: TempDir,
        pub library: PathBuf,
    }

    impl Fixture {
        pub fn new() -> Self {
            let dir = tempfile::tempdir().unwrap();
            let library = dir.path().join("library.json");
            let mut lib = MaterialLibrary::new();
            lib.insert(
                BASE,
                MaterialAsset::material()
                    .with_scalar("Roughness", 0.5)
                    .with_scalar("Metallic", 0.0),
            )
            .insert(CRATE, MaterialAsset::instance(BASE))
            .insert(BARREL, MaterialAsset::instance(BASE));
            lib.to_file(&library).unwrap();
            Self { dir, library }
        }

        pub fn session(&self, json: bool) -> Session {
            Session::new(
                self.library.to_str(),
                self.dir.path().to_str(),
                None,
                json,
            )
            .unwrap()
        }

        /// Re-reads the library file from disk.
        pub fn library(&self) -> MaterialLibrary {
            MaterialLibrary::from_file(&self.library).unwrap()
        }

        pub fn path(&self, relative: &str) -> PathBuf {
            self.dir.path().join(relative)
        }

        pub fn root_preset(&self, name: &str) -> PathBuf {
            self.path("Saved/Material/Materials/Base/Preset")
                .join(format!("{}.json", name))
        }

        pub fn write(&self, relative: &str, content: &str) -> PathBuf {
            let path = self.path(relative);
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).unwrap();
            }
            std::fs::write(&path, content).unwrap();
            path
        }
    }

    /// `ExitCode` has no accessor, so compare the debug rendering.
    pub fn assert_exit(code: ExitCode, expected: u8) {
        assert_eq!(format!("{:?}", code), format!("{:?}", ExitCode::from(expected)));
    }
}
