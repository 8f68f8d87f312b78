//! Load command implementation
//!
//! Applies a named preset to an instance and writes the library back.

use anyhow::{Context, Result};
use colored::Colorize;
use mipreset_core::ApplyReport;
use std::process::ExitCode;

use super::json_output::{emit_error, warning_codes, JsonError, JsonOutput};
use super::parse_scope;
use crate::session::Session;

/// Run the load command
///
/// A partially applied preset still succeeds; skipped parameters are
/// reported as warnings.
///
/// # Arguments
/// * `session` - Global options
/// * `instance` - Material instance to modify
/// * `name` - Preset name
/// * `scope` - "root" or "parent"
pub fn run(session: &Session, instance: &str, name: &str, scope: &str) -> Result<ExitCode> {
    let scope = parse_scope(scope)?;
    let mut library = session.load_library()?;
    let manager = session.manager();

    let report = match manager.load(scope, &mut library, instance, name) {
        Ok(report) => report,
        Err(e) if session.json => return emit_error(e.code(), e.to_string()),
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to load preset '{}'", name));
        }
    };
    session.save_library(&library)?;

    if session.json {
        let warnings = skipped_warnings(&report);
        return JsonOutput::success(&report).with_warnings(warnings).emit();
    }

    print_report(&report);
    println!(
        "{} Applied preset '{}' to {}",
        "SUCCESS".green().bold(),
        name,
        report.asset_path
    );
    Ok(ExitCode::SUCCESS)
}

/// One warning per skipped parameter.
pub fn skipped_warnings(report: &ApplyReport) -> Vec<JsonError> {
    report
        .skipped
        .iter()
        .map(|s| {
            JsonError::new(
                warning_codes::SKIPPED_PARAMETER,
                format!("{} parameter '{}': {}", s.kind, s.name, s.reason),
            )
            .with_path(Some(s.name.clone()))
        })
        .collect()
}

/// Prints applied and skipped parameter counts plus one line per skip.
pub fn print_report(report: &ApplyReport) {
    println!(
        "{} {} applied, {} skipped",
        "Parameters:".dimmed(),
        report.applied.len(),
        report.skipped.len()
    );
    for skipped in &report.skipped {
        println!(
            "  {} [{}] {}: {}",
            "!".yellow(),
            skipped.kind,
            skipped.name,
            skipped.reason
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{assert_exit, Fixture, BARREL, CRATE};
    use mipreset_core::{MaterialHost, PresetError};

    #[test]
    fn test_load_writes_library_back() {
        let fixture = Fixture::new();
        fixture.write(
            "Saved/Material/Materials/Base/Preset/wet.json",
            r#"{"parameters": {"scalar": {"Roughness": 0.1, "Sheen": 1.0}}}"#,
        );

        let code = run(&fixture.session(false), CRATE, "wet", "root").unwrap();
        assert_exit(code, 0);

        let lib = fixture.library();
        assert_eq!(lib.get_scalar(CRATE, "Roughness"), Ok(0.1));
        assert_eq!(lib.get_scalar(BARREL, "Roughness"), Ok(0.5));
    }

    #[test]
    fn test_missing_preset_fails_without_writing() {
        let fixture = Fixture::new();
        let before = std::fs::read_to_string(&fixture.library).unwrap();

        let err = run(&fixture.session(false), CRATE, "absent", "root").unwrap_err();
        assert_eq!(
            err.downcast_ref::<PresetError>().map(PresetError::code),
            Some("R003")
        );
        let code = run(&fixture.session(true), CRATE, "absent", "root").unwrap();
        assert_exit(code, 1);

        assert_eq!(std::fs::read_to_string(&fixture.library).unwrap(), before);
    }

    #[test]
    fn test_skipped_parameters_become_warnings() {
        let report = ApplyReport {
            asset_path: CRATE.to_string(),
            applied: vec!["Roughness".to_string()],
            skipped: vec![mipreset_core::SkippedParameter {
                name: "Sheen".to_string(),
                kind: mipreset_spec::ParameterKind::Scalar,
                reason: mipreset_core::SkipReason::NotOverridden,
            }],
        };
        let warnings = skipped_warnings(&report);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].code, warning_codes::SKIPPED_PARAMETER);
        assert_eq!(warnings[0].path.as_deref(), Some("Sheen"));
    }
}
