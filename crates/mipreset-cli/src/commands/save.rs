//! Save command implementation
//!
//! Captures an instance's parameters as a named preset.

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use std::process::ExitCode;

use super::json_output::{emit_error, JsonOutput};
use super::parse_scope;
use crate::session::Session;

#[derive(Serialize)]
struct SaveResult {
    name: String,
    scope: String,
    path: String,
}

/// Run the save command
///
/// # Arguments
/// * `session` - Global options
/// * `instance` - Material instance to capture
/// * `name` - Preset name
/// * `scope` - "root" or "parent"
pub fn run(session: &Session, instance: &str, name: &str, scope: &str) -> Result<ExitCode> {
    let scope = parse_scope(scope)?;
    let library = session.load_library()?;
    let manager = session.manager();

    let path = match manager.save(scope, &library, instance, name) {
        Ok(path) => path,
        Err(e) if session.json => return emit_error(e.code(), e.to_string()),
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to save preset '{}'", name));
        }
    };

    if session.json {
        return JsonOutput::success(SaveResult {
            name: name.to_string(),
            scope: scope.to_string(),
            path: path.display().to_string(),
        })
        .emit();
    }

    println!(
        "{} Saved {} preset '{}' to {}",
        "SUCCESS".green().bold(),
        scope,
        name,
        path.display()
    );
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{assert_exit, Fixture, CRATE};
    use mipreset_core::PresetError;

    #[test]
    fn test_save_writes_root_preset() {
        let fixture = Fixture::new();
        let code = run(&fixture.session(false), CRATE, "metal_01", "root").unwrap();
        assert_exit(code, 0);
        assert!(fixture.root_preset("metal_01").is_file());
    }

    #[test]
    fn test_invalid_name_keeps_its_code() {
        let fixture = Fixture::new();
        let err = run(&fixture.session(false), CRATE, "../escape", "root").unwrap_err();
        assert_eq!(
            err.downcast_ref::<PresetError>().map(PresetError::code),
            Some("R002")
        );

        let code = run(&fixture.session(true), CRATE, "../escape", "root").unwrap();
        assert_exit(code, 1);
        assert!(!fixture.path("Saved").exists());
    }
}
