//! List command implementation

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use std::process::ExitCode;

use super::json_output::JsonOutput;
use super::parse_scope;
use crate::session::Session;

#[derive(Serialize)]
struct ListResult {
    scope: String,
    folder: Option<String>,
    presets: Vec<String>,
}

/// Run the list command
///
/// Listing never fails for a missing folder or ancestor; it prints nothing.
pub fn run(session: &Session, instance: &str, scope: &str) -> Result<ExitCode> {
    let scope = parse_scope(scope)?;
    let library = session.load_library()?;
    let manager = session.manager();

    let presets = manager.list(scope, &library, instance);
    let folder = manager
        .preset_dir(scope, &library, instance)
        .ok()
        .map(|dir| dir.display().to_string());

    if session.json {
        return JsonOutput::success(ListResult {
            scope: scope.to_string(),
            folder,
            presets,
        })
        .emit();
    }

    match &folder {
        Some(folder) => println!("{} {}", "Folder:".dimmed(), folder),
        None => println!(
            "{} {} has no {} material",
            "!".yellow(),
            instance,
            scope
        ),
    }
    if presets.is_empty() {
        println!("No presets found.");
    }
    for name in &presets {
        println!("  {}", name);
    }
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{assert_exit, Fixture, BASE, CRATE};

    #[test]
    fn test_list_succeeds_without_presets_or_ancestor() {
        let fixture = Fixture::new();
        assert_exit(run(&fixture.session(false), CRATE, "root").unwrap(), 0);
        // a material has no parent, so nothing resolves
        assert_exit(run(&fixture.session(true), BASE, "parent").unwrap(), 0);
    }

    #[test]
    fn test_list_requires_library() {
        let session = Session::new(None, None, None, false).unwrap();
        assert!(run(&session, CRATE, "root").is_err());
    }
}
