//! Show command implementation
//!
//! Prints the parameters of a material instance as a preset document.

use anyhow::{Context, Result};
use colored::Colorize;
use mipreset_core::serialize;
use mipreset_spec::{ParameterKind, ParameterValue, PresetDocument};
use std::process::ExitCode;

use super::json_output::{emit_error, JsonOutput};
use crate::session::Session;

/// Run the show command
///
/// # Arguments
/// * `session` - Global options
/// * `instance` - Material instance path
pub fn run(session: &Session, instance: &str) -> Result<ExitCode> {
    let library = session.load_library()?;

    let doc = match serialize(&library, instance) {
        Ok(doc) => doc,
        Err(e) if session.json => return emit_error(e.code(), e.to_string()),
        Err(e) => return Err(e).with_context(|| format!("Failed to read instance: {}", instance)),
    };

    if session.json {
        return JsonOutput::success(&doc).emit();
    }

    print_document(&doc);
    Ok(ExitCode::SUCCESS)
}

fn print_document(doc: &PresetDocument) {
    let none = || "(none)".dimmed().to_string();
    println!("{} {}", "Instance:".cyan().bold(), doc.metadata.asset_path);
    println!(
        "{} {}",
        "Parent:".dimmed(),
        doc.metadata.parent_material.clone().unwrap_or_else(none)
    );
    println!(
        "{} {}",
        "Root:".dimmed(),
        doc.metadata.root_material.clone().unwrap_or_else(none)
    );

    for kind in ParameterKind::ALL {
        let names = doc.parameters.names(kind);
        if names.is_empty() {
            continue;
        }
        println!("\n{} ({})", kind.as_str().bold(), names.len());
        for name in names {
            let value = doc
                .parameters
                .get(name)
                .map(|v| format_value(&v))
                .unwrap_or_default();
            println!("  {} = {}", name, value);
        }
    }
}

/// Formats a parameter value for display.
pub fn format_value(value: &ParameterValue) -> String {
    match value {
        ParameterValue::Scalar(v) => format!("{}", v),
        ParameterValue::Vector(c) => format!("({}, {}, {}, {})", c.r, c.g, c.b, c.a),
        ParameterValue::Texture(Some(t)) => t.clone(),
        ParameterValue::Texture(None) => "none".to_string(),
        ParameterValue::StaticSwitch(b) => b.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mipreset_spec::LinearColor;

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(&ParameterValue::Scalar(0.5)), "0.5");
        assert_eq!(
            format_value(&ParameterValue::Vector(LinearColor::rgb(1.0, 0.5, 0.0))),
            "(1, 0.5, 0, 1)"
        );
        assert_eq!(format_value(&ParameterValue::Texture(None)), "none");
        assert_eq!(format_value(&ParameterValue::StaticSwitch(true)), "true");
    }
}
