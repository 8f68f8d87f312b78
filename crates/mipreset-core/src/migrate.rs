//! Parameter migration between material schemas.
//!
//! A [`MigrationTable`] describes every parameter of the new material as an
//! expression over aliased parameters of the old one. Each mapping is
//! evaluated on its own; a failing mapping is reported and the rest still
//! migrate.

use std::fmt;
use std::path::Path;

use mipreset_expr::{evaluate, parse, ExprError, Scope, Value};
use mipreset_spec::{
    LinearColor, MaterialParameterSet, MigrationTable, ParameterKind, ParameterMapping,
    ParameterValue,
};
use serde::{Serialize, Serializer};
use thiserror::Error;
use tracing::{debug, error};

use crate::error::MigrationError;
use crate::host::MaterialHost;
use crate::serializer::{self, ApplyReport};

/// Why a single mapping produced no value.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MappingError {
    /// M010: An alias names a parameter the old material does not have.
    #[error("M010: alias '{alias}' refers to missing parameter '{old_name}'")]
    MissingParameter { alias: String, old_name: String },

    /// The expression failed to parse or evaluate.
    #[error(transparent)]
    Expression(#[from] ExprError),

    /// M011: The result cannot be stored as the declared type.
    #[error("M011: cannot store {got} as {expected} parameter")]
    Coercion {
        expected: ParameterKind,
        got: String,
    },
}

impl MappingError {
    /// Returns the error code; expression errors keep their own `X` code.
    pub fn code(&self) -> &'static str {
        match self {
            MappingError::MissingParameter { .. } => "M010",
            MappingError::Expression(err) => err.code(),
            MappingError::Coercion { .. } => "M011",
        }
    }
}

fn serialize_display<T: fmt::Display, S: Serializer>(v: &T, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(v)
}

/// A mapping that was skipped.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MappingFailure {
    /// New parameter name.
    pub parameter: String,
    pub code: &'static str,
    #[serde(rename = "message", serialize_with = "serialize_display")]
    pub error: MappingError,
}

/// Result of migrating a parameter set.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MigrationOutcome {
    pub parameters: MaterialParameterSet,
    pub failures: Vec<MappingFailure>,
}

/// Result of migrating one instance onto another.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MigrationReport {
    pub source: String,
    pub target: String,
    /// Number of mappings that produced a value.
    pub migrated: usize,
    pub failures: Vec<MappingFailure>,
    /// Outcome of applying the migrated values to the target.
    pub apply: ApplyReport,
}

/// Converts an old parameter value into an expression value.
pub fn to_expr_value(value: &ParameterValue) -> Value {
    match value {
        ParameterValue::Scalar(v) => Value::Number(f64::from(*v)),
        ParameterValue::Vector(c) => Value::Color(c.to_array().map(f64::from)),
        ParameterValue::Texture(t) => t.clone().into(),
        ParameterValue::StaticSwitch(b) => Value::Bool(*b),
    }
}

/// Stores an expression result as a parameter of `kind`.
///
/// Scalars accept numbers and booleans; vectors accept colors and numbers
/// (RGB broadcast, alpha 1); textures accept text and null; switches accept
/// booleans and numbers (non-zero is true).
pub fn coerce(value: Value, kind: ParameterKind) -> Result<ParameterValue, MappingError> {
    let mismatch = |v: &Value| MappingError::Coercion {
        expected: kind,
        got: v.type_name().to_string(),
    };
    let finite = |x: f64| -> Result<f32, MappingError> {
        let v = x as f32;
        if v.is_finite() {
            Ok(v)
        } else {
            Err(MappingError::Coercion {
                expected: kind,
                got: format!("non-finite number {}", x),
            })
        }
    };

    match (kind, &value) {
        (ParameterKind::Scalar, Value::Number(_) | Value::Bool(_)) => {
            let n = value.as_number().ok_or_else(|| mismatch(&value))?;
            Ok(ParameterValue::Scalar(finite(n)?))
        }
        (ParameterKind::Vector, Value::Color([r, g, b, a])) => Ok(ParameterValue::Vector(
            LinearColor::rgba(finite(*r)?, finite(*g)?, finite(*b)?, finite(*a)?),
        )),
        (ParameterKind::Vector, Value::Number(n)) => {
            let v = finite(*n)?;
            Ok(ParameterValue::Vector(LinearColor::rgb(v, v, v)))
        }
        (ParameterKind::Texture, Value::Text(s)) => Ok(ParameterValue::Texture(Some(s.clone()))),
        (ParameterKind::Texture, Value::Null) => Ok(ParameterValue::Texture(None)),
        (ParameterKind::StaticSwitch, Value::Bool(b)) => Ok(ParameterValue::StaticSwitch(*b)),
        (ParameterKind::StaticSwitch, Value::Number(n)) => {
            Ok(ParameterValue::StaticSwitch(*n != 0.0))
        }
        _ => Err(mismatch(&value)),
    }
}

/// Evaluates one mapping against the old parameters.
pub fn migrate_parameter(
    mapping: &ParameterMapping,
    old: &MaterialParameterSet,
) -> Result<ParameterValue, MappingError> {
    let mut scope = Scope::new();
    for (alias, old_name) in &mapping.aliases {
        let value = old
            .get(old_name)
            .ok_or_else(|| MappingError::MissingParameter {
                alias: alias.clone(),
                old_name: old_name.clone(),
            })?;
        scope.bind(alias.as_str(), to_expr_value(&value));
    }
    let expr = parse(&mapping.expression)?;
    let result = evaluate(&expr, &scope)?;
    coerce(result, mapping.kind)
}

/// Computes the new parameter set described by `table` from `old`.
///
/// Failing mappings are logged and listed in the outcome; they never stop the
/// remaining mappings.
pub fn migrate_parameters(table: &MigrationTable, old: &MaterialParameterSet) -> MigrationOutcome {
    let mut outcome = MigrationOutcome::default();
    for (name, mapping) in &table.parameter_mappings {
        match migrate_parameter(mapping, old) {
            Ok(value) => {
                debug!(parameter = name.as_str(), "migrated parameter");
                outcome.parameters.insert(name.clone(), value);
            }
            Err(err) => {
                error!(
                    parameter = name.as_str(),
                    expression = mapping.expression.as_str(),
                    "failed to migrate parameter: {}",
                    err
                );
                outcome.failures.push(MappingFailure {
                    parameter: name.clone(),
                    code: err.code(),
                    error: err,
                });
            }
        }
    }
    outcome
}

/// Migrates the parameters of `old_instance` onto `new_instance`.
///
/// Re-parents the target first when the table names a new parent. The result
/// reflects the final apply step only; per-mapping failures are in the
/// report.
pub fn migrate_material_instance(
    host: &mut dyn MaterialHost,
    old_instance: &str,
    new_instance: &str,
    table: &MigrationTable,
) -> Result<MigrationReport, MigrationError> {
    let snapshot = serializer::serialize(&*host, old_instance)?;
    let outcome = migrate_parameters(table, &snapshot.parameters);

    if let Some(parent) = table.new_parent_material.as_deref() {
        host.set_parent_material(new_instance, parent)?;
        debug!(instance = new_instance, parent, "re-parented migration target");
    }

    let apply = serializer::deserialize(host, new_instance, &outcome.parameters)?;
    Ok(MigrationReport {
        source: snapshot.metadata.asset_path,
        target: apply.asset_path.clone(),
        migrated: outcome.parameters.len(),
        failures: outcome.failures,
        apply,
    })
}

/// Reads a migration table file.
pub fn load_migration_table(path: &Path) -> Result<MigrationTable, MigrationError> {
    MigrationTable::from_file(path).map_err(|source| MigrationError::Table {
        path: path.to_path_buf(),
        source,
    })
}
