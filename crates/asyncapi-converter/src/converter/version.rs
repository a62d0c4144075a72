//! Version gate, identifier assignment and version stamp.

use serde_json::Value;

use super::{ConvertOptions, LEGACY_VERSIONS, TARGET_VERSION};
use crate::document::{render_scalar, Document};
use crate::error::ConvertError;

/// Check that the declared `asyncapi` version is one we can convert.
pub(super) fn verify_version(
    doc: &mut Document,
    _options: &ConvertOptions,
) -> Result<(), ConvertError> {
    let version = doc
        .get("asyncapi")
        .ok_or_else(|| ConvertError::invalid_property("asyncapi"))?;
    let version = render_scalar(version).unwrap_or_else(|| version.to_string());

    if version == TARGET_VERSION {
        return Err(ConvertError::DocumentVersionUpToDate(TARGET_VERSION.to_string()));
    }
    if LEGACY_VERSIONS.contains(&version.as_str()) {
        tracing::debug!(version = %version, "legacy version accepted");
        return Ok(());
    }
    Err(ConvertError::UnsupportedAsyncapiVersion(version))
}

/// Write `id`, either the configured override or `urn:` plus the dotted,
/// lower-cased `info.title`.
pub(super) fn assign_id(doc: &mut Document, options: &ConvertOptions) -> Result<(), ConvertError> {
    if let Some(id) = &options.id {
        doc.insert("id", Value::String(id.clone()));
        return Ok(());
    }

    let info = doc
        .get("info")
        .and_then(Value::as_object)
        .ok_or_else(|| ConvertError::invalid_property("info"))?;
    let title = info
        .get("title")
        .and_then(render_scalar)
        .ok_or_else(|| ConvertError::invalid_property("title"))?;

    doc.insert("id", Value::String(format!("urn:{}", derive_id(&title))));
    Ok(())
}

fn derive_id(title: &str) -> String {
    title.to_lowercase().replace(' ', ".")
}

pub(super) fn stamp_version(
    doc: &mut Document,
    _options: &ConvertOptions,
) -> Result<(), ConvertError> {
    doc.insert("asyncapi", Value::String(TARGET_VERSION.to_string()));
    Ok(())
}
