//! Preset document validation.

use std::collections::BTreeMap;

use crate::document::PresetDocument;
use crate::error::{ErrorCode, ValidationError, ValidationResult, ValidationWarning, WarningCode};
use crate::parameter::{MaterialParameterSet, ParameterKind};

/// Validates a preset document.
///
/// # Returns
/// * `ValidationResult` with `ok=true` if the document can be applied, with any warnings.
/// * `ValidationResult` with `ok=false` and errors otherwise.
///
/// # Example
/// ```
/// use mipreset_spec::{PresetDocument, ParameterValue};
/// use mipreset_spec::validation::validate_document;
///
/// let mut doc = PresetDocument::new("/Game/Props/MI_Crate");
/// doc.parameters.insert("Roughness", ParameterValue::Scalar(0.4));
///
/// assert!(validate_document(&doc).is_ok());
/// ```
pub fn validate_document(doc: &PresetDocument) -> ValidationResult {
    let mut result = ValidationResult::default();

    if doc.metadata.asset_path.trim().is_empty() {
        result.add_warning(ValidationWarning::with_path(
            WarningCode::MissingAssetPath,
            "metadata.asset_path must not be empty",
            "metadata.asset_path",
        ));
    }

    validate_parameters(&doc.parameters, &mut result);
    result
}

/// Validates a parameter set on its own.
pub fn validate_parameters(params: &MaterialParameterSet, result: &mut ValidationResult) {
    if params.is_empty() {
        result.add_warning(ValidationWarning::with_path(
            WarningCode::EmptyDocument,
            "preset carries no parameters",
            "parameters",
        ));
        return;
    }

    validate_names(params, result);

    for (name, entry) in &params.scalar {
        if !entry.value.is_finite() {
            result.add_error(ValidationError::with_path(
                ErrorCode::NonFiniteScalar,
                format!("scalar value must be finite, got {}", entry.value),
                field_path(ParameterKind::Scalar, name),
            ));
        }
    }

    for (name, entry) in &params.vector {
        if !entry.value.is_finite() {
            result.add_error(ValidationError::with_path(
                ErrorCode::NonFiniteVector,
                "vector components must be finite",
                field_path(ParameterKind::Vector, name),
            ));
        }
    }

    for (name, entry) in &params.texture {
        if entry.value.is_none() {
            result.add_warning(ValidationWarning::with_path(
                WarningCode::NullTexture,
                "texture parameter has no texture assigned",
                field_path(ParameterKind::Texture, name),
            ));
        }
    }

    let not_overridden = params
        .scalar
        .iter()
        .filter(|(_, e)| !e.overridden)
        .map(|(n, _)| (ParameterKind::Scalar, n))
        .chain(
            params
                .vector
                .iter()
                .filter(|(_, e)| !e.overridden)
                .map(|(n, _)| (ParameterKind::Vector, n)),
        )
        .chain(
            params
                .texture
                .iter()
                .filter(|(_, e)| !e.overridden)
                .map(|(n, _)| (ParameterKind::Texture, n)),
        )
        .chain(
            params
                .static_switch
                .iter()
                .filter(|(_, e)| !e.overridden)
                .map(|(n, _)| (ParameterKind::StaticSwitch, n)),
        );
    for (kind, name) in not_overridden {
        result.add_warning(ValidationWarning::with_path(
            WarningCode::NotOverridden,
            "entry is not marked as an override and will be skipped",
            field_path(kind, name),
        ));
    }
}

fn validate_names(params: &MaterialParameterSet, result: &mut ValidationResult) {
    let mut seen: BTreeMap<&str, Vec<ParameterKind>> = BTreeMap::new();
    for kind in ParameterKind::ALL {
        for name in params.names(kind) {
            if name.trim().is_empty() {
                result.add_error(ValidationError::with_path(
                    ErrorCode::EmptyParameterName,
                    "parameter name must not be empty",
                    format!("parameters.{}", kind),
                ));
            }
            seen.entry(name).or_default().push(kind);
        }
    }

    for (name, kinds) in seen.into_iter().filter(|(_, k)| k.len() > 1) {
        let kinds: Vec<&str> = kinds.iter().map(ParameterKind::as_str).collect();
        result.add_error(ValidationError::with_path(
            ErrorCode::DuplicateParameterName,
            format!(
                "parameter '{}' appears in more than one category ({})",
                name,
                kinds.join(", ")
            ),
            format!("parameters.*.{}", name),
        ));
    }
}

fn field_path(kind: ParameterKind, name: &str) -> String {
    format!("parameters.{}.{}", kind, name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::LinearColor;
    use crate::parameter::{ParameterEntry, ParameterValue};

    fn make_valid_document() -> PresetDocument {
        let mut doc = PresetDocument::new("/Game/Props/MI_Crate");
        doc.parameters.insert("Roughness", ParameterValue::Scalar(0.5));
        doc.parameters
            .insert("Tint", ParameterValue::Vector(LinearColor::rgb(1.0, 0.5, 0.2)));
        doc
    }

    #[test]
    fn test_valid_document() {
        let result = validate_document(&make_valid_document());
        assert!(result.is_ok(), "errors: {:?}", result.errors);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_missing_asset_path_only_warns() {
        let mut doc = make_valid_document();
        doc.metadata.asset_path = String::new();
        let result = validate_document(&doc);
        assert!(result.is_ok());
        assert!(result
            .warnings
            .iter()
            .any(|w| w.code == WarningCode::MissingAssetPath));
    }

    #[test]
    fn test_document_without_metadata_is_applicable() {
        let doc = PresetDocument::from_json(r#"{"parameters": {"scalar": {"Roughness": 0.9}}}"#)
            .unwrap();
        assert_eq!(doc.metadata.asset_path, "");
        assert!(validate_document(&doc).is_ok());
    }

    #[test]
    fn test_duplicate_name_across_categories() {
        let mut doc = make_valid_document();
        doc.parameters
            .static_switch
            .insert("Roughness".to_string(), ParameterEntry::overridden(true));
        let result = validate_document(&doc);
        assert!(!result.is_ok());
        let err = result
            .errors
            .iter()
            .find(|e| e.code == ErrorCode::DuplicateParameterName)
            .expect("duplicate error");
        assert!(err.message.contains("scalar, static_switch"));
    }

    #[test]
    fn test_non_finite_values() {
        let mut doc = make_valid_document();
        doc.parameters.insert("Bad", ParameterValue::Scalar(f32::INFINITY));
        doc.parameters
            .insert("BadColor", ParameterValue::Vector(LinearColor::splat(f32::NAN)));
        let result = validate_document(&doc);
        let codes: Vec<ErrorCode> = result.errors.iter().map(|e| e.code).collect();
        assert!(codes.contains(&ErrorCode::NonFiniteScalar));
        assert!(codes.contains(&ErrorCode::NonFiniteVector));
    }

    #[test]
    fn test_warnings() {
        let mut doc = make_valid_document();
        doc.parameters
            .texture
            .insert("Mask".to_string(), ParameterEntry::overridden(None));
        doc.parameters.scalar.insert(
            "Metallic".to_string(),
            ParameterEntry {
                value: 0.0,
                overridden: false,
            },
        );
        let result = validate_document(&doc);
        assert!(result.is_ok());
        let codes: Vec<WarningCode> = result.warnings.iter().map(|w| w.code).collect();
        assert!(codes.contains(&WarningCode::NullTexture));
        assert!(codes.contains(&WarningCode::NotOverridden));
    }

    #[test]
    fn test_empty_document_warns() {
        let doc = PresetDocument::new("/Game/MI_Empty");
        let result = validate_document(&doc);
        assert!(result.is_ok());
        assert_eq!(result.warnings[0].code, WarningCode::EmptyDocument);
    }
}
