//! Eval command implementation
//!
//! Evaluates a single migration expression, useful when writing tables.

use anyhow::{Context, Result};
use colored::Colorize;
use mipreset_expr::{eval_str, ExprError, Scope, FUNCTIONS};
use serde::Serialize;
use std::process::ExitCode;

use super::json_output::{emit_error, error_codes, JsonOutput};
use crate::session::Session;

#[derive(Debug, Serialize)]
struct EvalResult {
    #[serde(rename = "type")]
    type_name: &'static str,
    value: String,
}

/// Run the eval command
///
/// # Arguments
/// * `session` - Global options
/// * `expr` - Expression source
/// * `binds` - `name=expression` pairs; each right-hand side is evaluated
///   with an empty scope
pub fn run(session: &Session, expr: &str, binds: &[String]) -> Result<ExitCode> {
    let scope = match build_scope(binds) {
        Ok(scope) => scope,
        Err(e) if session.json => return emit_error(error_codes::BIND, format!("{:#}", e)),
        Err(e) => return Err(e),
    };

    let value = match eval_str(expr, &scope) {
        Ok(value) => value,
        Err(e) if session.json => return emit_error(e.code(), e.to_string()),
        Err(e @ ExprError::UnknownFunction { .. }) => {
            return Err(e).context(format!("available functions: {}", FUNCTIONS.join(", ")));
        }
        Err(e) => return Err(e).context("Failed to evaluate expression"),
    };

    if session.json {
        return JsonOutput::success(EvalResult {
            type_name: value.type_name(),
            value: value.to_string(),
        })
        .emit();
    }

    println!("{} {}", format!("{}:", value.type_name()).dimmed(), value);
    Ok(ExitCode::SUCCESS)
}

fn build_scope(binds: &[String]) -> Result<Scope> {
    let mut scope = Scope::new();
    for bind in binds {
        let (name, source) = parse_bind(bind)?;
        let value = eval_str(source, &Scope::new())
            .with_context(|| format!("Failed to evaluate binding '{}'", name))?;
        scope.bind(name, value);
    }
    Ok(scope)
}

fn parse_bind(bind: &str) -> Result<(&str, &str)> {
    let (name, source) = bind
        .split_once('=')
        .with_context(|| format!("binding '{}' must look like name=value", bind))?;
    let name = name.trim();
    if name.is_empty() {
        anyhow::bail!("binding '{}' has an empty name", bind);
    }
    Ok((name, source))
}
