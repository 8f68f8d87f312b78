//! Validate command implementation
//!
//! Checks a preset document without applying it.

use anyhow::{Context, Result};
use colored::Colorize;
use mipreset_spec::validation::validate_document;
use mipreset_spec::{PresetDocument, ValidationResult};
use serde::Serialize;
use std::path::Path;
use std::process::ExitCode;

use super::json_output::{emit_error, error_codes, JsonError, JsonOutput};
use crate::session::Session;

#[derive(Serialize)]
struct ValidateResult {
    asset_path: String,
    parameters: usize,
}

/// Run the validate command
///
/// # Returns
/// Exit code: 0 if valid, 1 if invalid
pub fn run(session: &Session, preset_path: &str) -> Result<ExitCode> {
    let doc = match PresetDocument::from_file(Path::new(preset_path)) {
        Ok(doc) => doc,
        Err(e) if session.json => return emit_error(error_codes::PRESET_READ, e.to_string()),
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to read preset: {}", preset_path));
        }
    };
    let result = validate_document(&doc);

    if session.json {
        return json_output(&doc, result).emit();
    }

    println!("{} {}", "Validating:".cyan().bold(), preset_path);
    for warning in &result.warnings {
        println!("  {} {}", "!".yellow(), warning);
    }
    for error in &result.errors {
        println!("  {} {}", "x".red(), error);
    }

    if result.is_ok() {
        println!(
            "\n{} Preset is valid ({} parameters)",
            "SUCCESS".green().bold(),
            doc.parameters.len()
        );
        Ok(ExitCode::SUCCESS)
    } else {
        println!(
            "\n{} Preset has {} error(s)",
            "FAILED".red().bold(),
            result.errors.len()
        );
        Ok(ExitCode::from(1))
    }
}

fn json_output(doc: &PresetDocument, result: ValidationResult) -> JsonOutput<ValidateResult> {
    let warnings = result
        .warnings
        .iter()
        .map(|w| JsonError::new(w.code.code(), w.message.clone()).with_path(w.path.clone()))
        .collect();
    if result.is_ok() {
        JsonOutput::success(ValidateResult {
            asset_path: doc.metadata.asset_path.clone(),
            parameters: doc.parameters.len(),
        })
        .with_warnings(warnings)
    } else {
        let errors = result
            .errors
            .iter()
            .map(|e| JsonError::new(e.code.code(), e.message.clone()).with_path(e.path.clone()))
            .collect();
        JsonOutput::failure(errors).with_warnings(warnings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{assert_exit, Fixture};
    use mipreset_spec::ParameterValue;

    #[test]
    fn test_json_output_for_invalid_document() {
        let mut doc = PresetDocument::new("");
        doc.parameters.insert("Roughness", ParameterValue::Scalar(f32::NAN));
        let out = json_output(&doc, validate_document(&doc));
        assert!(!out.success);
        let codes: Vec<_> = out.errors.iter().map(|e| e.code.as_str()).collect();
        assert_eq!(codes, vec!["P001"]);
        assert_eq!(out.warnings[0].code, "W004");
    }

    #[test]
    fn test_run_exit_codes() {
        let fixture = Fixture::new();
        let valid = fixture.write("valid.json", r#"{"parameters": {"scalar": {"A": 1.0}}}"#);
        let duplicate = fixture.write(
            "dup.json",
            r#"{"parameters": {"scalar": {"A": 1.0}, "static_switch": {"A": true}}}"#,
        );
        let broken = fixture.write("broken.json", "{ not json");

        for json in [false, true] {
            let session = fixture.session(json);
            assert_exit(run(&session, valid.to_str().unwrap()).unwrap(), 0);
            assert_exit(run(&session, duplicate.to_str().unwrap()).unwrap(), 1);
        }
        assert!(run(&fixture.session(false), broken.to_str().unwrap()).is_err());
        assert_exit(
            run(&fixture.session(true), broken.to_str().unwrap()).unwrap(),
            1,
        );
    }

    #[test]
    fn test_json_output_for_valid_document() {
        let mut doc = PresetDocument::new("/Game/MI");
        doc.parameters.insert("Roughness", ParameterValue::Scalar(0.5));
        let out = json_output(&doc, validate_document(&doc));
        assert!(out.success);
        assert_eq!(out.result.map(|r| r.parameters), Some(1));
    }
}
