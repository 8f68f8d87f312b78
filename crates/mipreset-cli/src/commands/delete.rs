//! Delete command implementation

use anyhow::{Context, Result};
use colored::Colorize;
use std::process::ExitCode;

use super::json_output::{emit_error, error_codes, JsonOutput};
use super::parse_scope;
use crate::session::Session;

/// Run the delete command
///
/// # Returns
/// Exit code: 0 if the preset was removed, 1 if it did not exist
pub fn run(session: &Session, instance: &str, name: &str, scope: &str) -> Result<ExitCode> {
    let scope = parse_scope(scope)?;
    let library = session.load_library()?;
    let manager = session.manager();

    let removed = match manager.delete(scope, &library, instance, name) {
        Ok(removed) => removed,
        Err(e) if session.json => return emit_error(e.code(), e.to_string()),
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to delete preset '{}'", name));
        }
    };

    if session.json {
        if removed {
            return JsonOutput::success(name).emit();
        }
        return emit_error(
            error_codes::NOT_FOUND,
            format!("no {} preset named '{}'", scope, name),
        );
    }

    if removed {
        println!("{} Deleted preset '{}'", "SUCCESS".green().bold(), name);
        Ok(ExitCode::SUCCESS)
    } else {
        println!(
            "{} No {} preset named '{}'",
            "FAILED".red().bold(),
            scope,
            name
        );
        Ok(ExitCode::from(1))
    }
}
