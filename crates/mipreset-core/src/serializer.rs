//! Parameter serializer: host instance <-> preset document.

use std::fmt;

use mipreset_spec::location::{canonical_asset_path, object_path};
use mipreset_spec::{
    MaterialParameterSet, ParameterEntry, ParameterKind, ParameterValue, PresetDocument,
};
use serde::Serialize;
use tracing::{debug, warn};

use crate::host::{HostError, MaterialHost};
use crate::resolver::{parent_material_path, root_material_path};

/// Why a parameter was not applied.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SkipReason {
    /// The entry's `override` flag is false.
    NotOverridden,
    /// No lookup strategy resolved the texture reference.
    TextureNotFound { reference: String },
    /// The host refused the value.
    Rejected { code: String, message: String },
}

impl From<HostError> for SkipReason {
    fn from(err: HostError) -> Self {
        SkipReason::Rejected {
            code: err.code().to_string(),
            message: err.to_string(),
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NotOverridden => write!(f, "not marked as override"),
            SkipReason::TextureNotFound { reference } => {
                write!(f, "texture '{}' could not be loaded", reference)
            }
            SkipReason::Rejected { message, .. } => write!(f, "{}", message),
        }
    }
}

/// A parameter left untouched by [`deserialize`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedParameter {
    pub name: String,
    pub kind: ParameterKind,
    #[serde(flatten)]
    pub reason: SkipReason,
}

/// Outcome of applying a parameter set to an instance.
///
/// Application is not transactional: parameters listed in `applied` stay
/// applied even when others were skipped.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ApplyReport {
    pub asset_path: String,
    pub applied: Vec<String>,
    pub skipped: Vec<SkippedParameter>,
}

impl ApplyReport {
    /// Whether every parameter in the set was applied.
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }

    fn skip(&mut self, name: &str, kind: ParameterKind, reason: SkipReason) {
        warn!(
            asset = %self.asset_path,
            parameter = name,
            kind = %kind,
            "skipping parameter: {}",
            reason
        );
        self.skipped.push(SkippedParameter {
            name: name.to_string(),
            kind,
            reason,
        });
    }

    fn record(&mut self, name: &str, kind: ParameterKind, result: Result<(), HostError>) {
        match result {
            Ok(()) => self.applied.push(name.to_string()),
            Err(err) => self.skip(name, kind, err.into()),
        }
    }
}

fn ensure_instance(host: &dyn MaterialHost, instance: &str) -> Result<(), HostError> {
    if !host.contains_asset(instance) {
        return Err(HostError::AssetNotFound {
            path: instance.to_string(),
        });
    }
    if !host.is_material_instance(instance) {
        return Err(HostError::NotAnInstance {
            path: instance.to_string(),
        });
    }
    Ok(())
}

/// Captures every parameter of `instance` as a preset document.
///
/// All entries are marked as overrides. Reads only.
pub fn serialize(host: &dyn MaterialHost, instance: &str) -> Result<PresetDocument, HostError> {
    ensure_instance(host, instance)?;

    let mut doc = PresetDocument::new(canonical_asset_path(instance));
    doc.metadata.parent_material = parent_material_path(host, instance);
    doc.metadata.root_material = root_material_path(host, instance);

    let params = &mut doc.parameters;
    for name in host.scalar_parameter_names(instance)? {
        let value = host.get_scalar(instance, &name)?;
        params.insert(name, ParameterValue::Scalar(value));
    }
    for name in host.vector_parameter_names(instance)? {
        let value = host.get_vector(instance, &name)?;
        params.insert(name, ParameterValue::Vector(value));
    }
    for name in host.texture_parameter_names(instance)? {
        let value = host.get_texture(instance, &name)?;
        params.insert(name, ParameterValue::Texture(value));
    }
    for name in host.static_switch_parameter_names(instance)? {
        let value = host.get_static_switch(instance, &name)?;
        params.insert(name, ParameterValue::StaticSwitch(value));
    }

    debug!(asset = instance, parameters = params.len(), "serialized instance");
    Ok(doc)
}

/// Resolves a saved texture reference.
///
/// Tries the reference as written, then its package path, then its object
/// path (`/Pkg/Name.Name`). The first strategy the host accepts wins.
pub fn resolve_texture(host: &dyn MaterialHost, reference: &str) -> Option<String> {
    let mut candidates = vec![reference.to_string()];
    for candidate in [canonical_asset_path(reference), object_path(reference)] {
        if !candidates.contains(&candidate) {
            candidates.push(candidate);
        }
    }
    candidates.iter().find_map(|candidate| {
        let found = host.load_texture(candidate);
        if found.is_some() {
            debug!(reference, candidate = candidate.as_str(), "resolved texture");
        }
        found
    })
}

fn apply_entries<T: Clone>(
    report: &mut ApplyReport,
    kind: ParameterKind,
    entries: &std::collections::BTreeMap<String, ParameterEntry<T>>,
    mut apply: impl FnMut(&str, T, &mut ApplyReport),
) {
    for (name, entry) in entries {
        if entry.overridden {
            apply(name, entry.value.clone(), report);
        } else {
            report.skip(name, kind, SkipReason::NotOverridden);
        }
    }
}

/// Applies `params` to `instance`, then saves the asset.
///
/// Parameters the host rejects, textures that cannot be resolved, and entries
/// not marked as overrides are skipped and listed in the report. Only a
/// missing instance or a failed save fails the call.
pub fn deserialize(
    host: &mut dyn MaterialHost,
    instance: &str,
    params: &MaterialParameterSet,
) -> Result<ApplyReport, HostError> {
    ensure_instance(host, instance)?;

    let mut report = ApplyReport {
        asset_path: canonical_asset_path(instance),
        ..Default::default()
    };

    apply_entries(&mut report, ParameterKind::Scalar, &params.scalar, |name, v, r| {
        r.record(name, ParameterKind::Scalar, host.set_scalar(instance, name, v))
    });
    apply_entries(&mut report, ParameterKind::Vector, &params.vector, |name, v, r| {
        r.record(name, ParameterKind::Vector, host.set_vector(instance, name, v))
    });
    apply_entries(&mut report, ParameterKind::Texture, &params.texture, |name, v, r| {
        let result = match v {
            None => host.set_texture(instance, name, None),
            Some(reference) => match resolve_texture(&*host, &reference) {
                Some(texture) => host.set_texture(instance, name, Some(&texture)),
                None => {
                    r.skip(
                        name,
                        ParameterKind::Texture,
                        SkipReason::TextureNotFound { reference },
                    );
                    return;
                }
            },
        };
        r.record(name, ParameterKind::Texture, result)
    });
    apply_entries(
        &mut report,
        ParameterKind::StaticSwitch,
        &params.static_switch,
        |name, v, r| {
            r.record(
                name,
                ParameterKind::StaticSwitch,
                host.set_static_switch(instance, name, v),
            )
        },
    );

    host.save_asset(instance)?;
    debug!(
        asset = instance,
        applied = report.applied.len(),
        skipped = report.skipped.len(),
        "applied parameters"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::{MaterialAsset, MaterialLibrary};
    use mipreset_spec::LinearColor;
    use pretty_assertions::assert_eq;

    const BASE: &str = "/Game/Materials/Base";
    const CRATE: &str = "/Game/Props/MI_Crate";

    fn library() -> MaterialLibrary {
        let mut lib = MaterialLibrary::new();
        lib.insert(
            BASE,
            MaterialAsset::material()
                .with_scalar("Roughness", 0.5)
                .with_vector("Tint", LinearColor::white())
                .with_texture("Albedo", None)
                .with_static_switch("UseDetail", false),
        )
        .insert(CRATE, MaterialAsset::instance(BASE))
        .add_texture("/Game/Textures/T_Wood");
        lib
    }

    #[test]
    fn test_serialize_reads_all_categories() {
        let lib = library();
        let doc = serialize(&lib, CRATE).unwrap();
        assert_eq!(doc.metadata.asset_path, CRATE);
        assert_eq!(doc.metadata.parent_material.as_deref(), Some(BASE));
        assert_eq!(doc.metadata.root_material.as_deref(), Some(BASE));
        assert_eq!(doc.parameters.get("Roughness"), Some(ParameterValue::Scalar(0.5)));
        assert_eq!(doc.parameters.get("Albedo"), Some(ParameterValue::Texture(None)));
        assert!(doc.parameters.scalar.values().all(|e| e.overridden));
        assert_eq!(doc.parameters.len(), 4);
    }

    #[test]
    fn test_serialize_rejects_base_material() {
        let lib = library();
        assert_eq!(serialize(&lib, BASE).unwrap_err().code(), "H002");
        assert_eq!(serialize(&lib, "/Game/Nope").unwrap_err().code(), "H001");
    }

    #[test]
    fn test_deserialize_applies_and_saves() {
        let mut lib = library();
        let mut params = MaterialParameterSet::new();
        params.insert("Roughness", ParameterValue::Scalar(0.1));
        params.insert("UseDetail", ParameterValue::StaticSwitch(true));
        params.insert(
            "Albedo",
            ParameterValue::Texture(Some("/Game/Textures/T_Wood".to_string())),
        );

        let report = deserialize(&mut lib, CRATE, &params).unwrap();
        assert!(report.is_complete());
        assert_eq!(report.applied.len(), 3);
        assert_eq!(lib.get_scalar(CRATE, "Roughness"), Ok(0.1));
        assert_eq!(lib.get_static_switch(CRATE, "UseDetail"), Ok(true));
        assert!(lib.saved_assets().contains(CRATE));
    }

    #[test]
    fn test_texture_lookup_falls_back_to_package_path() {
        let lib = library();
        assert_eq!(
            resolve_texture(&lib, "/Game/Textures/T_Wood.Renamed"),
            Some("/Game/Textures/T_Wood".to_string())
        );
        assert_eq!(
            resolve_texture(&lib, "/Game/Textures/T_Wood.T_Wood"),
            Some("/Game/Textures/T_Wood".to_string())
        );
        assert_eq!(resolve_texture(&lib, "/Game/Textures/T_Missing"), None);
    }

    #[test]
    fn test_unresolved_texture_is_skipped_not_fatal() {
        let mut lib = library();
        let mut params = MaterialParameterSet::new();
        params.insert(
            "Albedo",
            ParameterValue::Texture(Some("/Game/Textures/T_Missing".to_string())),
        );
        params.insert("Roughness", ParameterValue::Scalar(0.2));

        let report = deserialize(&mut lib, CRATE, &params).unwrap();
        assert_eq!(report.applied, vec!["Roughness".to_string()]);
        assert_eq!(
            report.skipped,
            vec![SkippedParameter {
                name: "Albedo".to_string(),
                kind: ParameterKind::Texture,
                reason: SkipReason::TextureNotFound {
                    reference: "/Game/Textures/T_Missing".to_string()
                },
            }]
        );
        assert_eq!(lib.get_scalar(CRATE, "Roughness"), Ok(0.2));
    }

    #[test]
    fn test_not_overridden_entries_are_skipped() {
        let mut lib = library();
        let mut params = MaterialParameterSet::new();
        params.scalar.insert(
            "Roughness".to_string(),
            ParameterEntry {
                value: 0.9,
                overridden: false,
            },
        );
        let report = deserialize(&mut lib, CRATE, &params).unwrap();
        assert_eq!(report.skipped[0].reason, SkipReason::NotOverridden);
        assert_eq!(lib.get_scalar(CRATE, "Roughness"), Ok(0.5));
    }

    #[test]
    fn test_unknown_parameter_is_recorded() {
        let mut lib = library();
        let mut params = MaterialParameterSet::new();
        params.insert("Metallic", ParameterValue::Scalar(1.0));
        let report = deserialize(&mut lib, CRATE, &params).unwrap();
        assert!(!report.is_complete());
        assert!(matches!(
            &report.skipped[0].reason,
            SkipReason::Rejected { code, .. } if code == "H003"
        ));
    }

    #[test]
    fn test_failed_save_fails_the_call() {
        let mut lib = library();
        lib.locked.insert(CRATE.to_string());
        let mut params = MaterialParameterSet::new();
        params.insert("Roughness", ParameterValue::Scalar(0.3));
        let err = deserialize(&mut lib, CRATE, &params).unwrap_err();
        assert_eq!(err.code(), "H005");
        // no rollback
        assert_eq!(lib.get_scalar(CRATE, "Roughness"), Ok(0.3));
    }
}
