//! Migrate command implementation
//!
//! Recomputes a target instance's parameters from a source instance using a
//! migration table, then writes the library back.

use anyhow::{Context, Result};
use colored::Colorize;
use mipreset_core::{load_migration_table, migrate_material_instance, MigrationReport};
use std::path::Path;
use std::process::ExitCode;

use super::json_output::{emit_error, warning_codes, JsonError, JsonOutput};
use super::load::{print_report, skipped_warnings};
use crate::session::Session;

/// Run the migrate command
///
/// Failing mappings are reported but do not fail the command; only a failed
/// apply step does.
///
/// # Arguments
/// * `session` - Global options
/// * `from` - Source instance
/// * `to` - Target instance
/// * `table_path` - Migration table file (JSON)
pub fn run(session: &Session, from: &str, to: &str, table_path: &str) -> Result<ExitCode> {
    let table = match load_migration_table(Path::new(table_path)) {
        Ok(table) => table,
        Err(e) if session.json => return emit_error(e.code(), e.to_string()),
        Err(e) => return Err(e).context("Failed to load migration table"),
    };
    let mut library = session.load_library()?;

    let report = match migrate_material_instance(&mut library, from, to, &table) {
        Ok(report) => report,
        Err(e) if session.json => return emit_error(e.code(), e.to_string()),
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to migrate {} to {}", from, to));
        }
    };
    session.save_library(&library)?;

    if session.json {
        let mut warnings = mapping_warnings(&report);
        warnings.extend(skipped_warnings(&report.apply));
        return JsonOutput::success(&report).with_warnings(warnings).emit();
    }

    println!("{} {} -> {}", "Migrating:".cyan().bold(), report.source, report.target);
    println!(
        "{} {} migrated, {} failed",
        "Mappings:".dimmed(),
        report.migrated,
        report.failures.len()
    );
    for failure in &report.failures {
        println!("  {} {}: {}", "x".red(), failure.parameter, failure.error);
    }
    print_report(&report.apply);
    println!("{} Migration applied", "SUCCESS".green().bold());
    Ok(ExitCode::SUCCESS)
}

fn mapping_warnings(report: &MigrationReport) -> Vec<JsonError> {
    report
        .failures
        .iter()
        .map(|f| {
            JsonError::new(
                warning_codes::FAILED_MAPPING,
                format!("{}: {}", f.parameter, f.error),
            )
            .with_path(Some(f.parameter.clone()))
        })
        .collect()
}
