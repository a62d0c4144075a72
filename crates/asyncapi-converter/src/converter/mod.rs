//! The AsyncAPI 1.x → 2.0.0-rc2 conversion pipeline.
//!
//! A conversion is a fixed sequence of steps over one [`Document`]. Each step
//! takes the document by exclusive borrow and either mutates it or fails; the
//! first failure aborts the run and is returned to the caller unchanged.

mod channels;
mod servers;
mod version;

use std::io::{Read, Write};

use serde_json::Value;

use crate::codec::{self, DecodeOrder, OutputFormat};
use crate::document::Document;
use crate::error::ConvertError;

pub use channels::LegacyChannels;

/// The AsyncAPI version documents are converted to.
pub const TARGET_VERSION: &str = "2.0.0-rc2";

/// Source versions accepted by the converter.
pub const LEGACY_VERSIONS: &[&str] = &["1.0.0", "1.1.0", "1.2.0"];

/// Root fields with no counterpart in the target version.
const LEGACY_ROOT_FIELDS: &[&str] = &["topics", "baseTopic", "stream", "events", "security"];

/// Options consumed by the conversion pipeline.
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// Explicit document identifier. When unset, one is derived from `info.title`.
    pub id: Option<String>,
    /// Parser order used by [`Converter::convert`].
    pub decode_order: DecodeOrder,
}

impl ConvertOptions {
    /// Create options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the document identifier override.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the decode order.
    pub fn with_decode_order(mut self, order: DecodeOrder) -> Self {
        self.decode_order = order;
        self
    }
}

type Step = fn(&mut Document, &ConvertOptions) -> Result<(), ConvertError>;

/// Pipeline steps, in execution order.
const STEPS: &[(&str, Step)] = &[
    ("verify_version", version::verify_version),
    ("assign_id", version::assign_id),
    ("stamp_version", version::stamp_version),
    ("remap_servers", servers::remap_servers),
    ("create_channels", channels::create_channels),
    ("refine_channels", channels::refine_channels),
    ("prune_legacy_fields", prune_legacy_fields),
];

fn prune_legacy_fields(doc: &mut Document, _options: &ConvertOptions) -> Result<(), ConvertError> {
    for field in LEGACY_ROOT_FIELDS {
        doc.remove(field);
    }
    Ok(())
}

/// Converts AsyncAPI documents from a legacy version to [`TARGET_VERSION`].
///
/// Holds only immutable options, so one converter can serve any number of
/// independent conversions.
#[derive(Debug, Clone, Default)]
pub struct Converter {
    options: ConvertOptions,
}

impl Converter {
    pub fn new(options: ConvertOptions) -> Self {
        Self { options }
    }

    /// Run every pipeline step over `doc`, in place.
    ///
    /// On error the document may be partially converted and should be
    /// discarded.
    pub fn convert_document(&self, doc: &mut Document) -> Result<(), ConvertError> {
        for (name, step) in STEPS {
            tracing::debug!(step = *name, "running conversion step");
            step(doc, &self.options)?;
        }
        let id = doc.get("id").and_then(Value::as_str).unwrap_or_default();
        tracing::info!(id, "document converted to {}", TARGET_VERSION);
        Ok(())
    }

    /// Convert an already decoded value, whose root must be a mapping.
    pub fn convert_value(&self, value: Value) -> Result<Document, ConvertError> {
        let mut doc = Document::from_value(value)?;
        self.convert_document(&mut doc)?;
        Ok(doc)
    }

    /// Decode `input`, convert it and encode the result in `format`.
    pub fn convert(&self, input: &[u8], format: OutputFormat) -> Result<Vec<u8>, ConvertError> {
        let mut doc = codec::decode(input, self.options.decode_order)?;
        self.convert_document(&mut doc)?;
        codec::encode(&doc, format)
    }

    /// Read a document from `reader` and write the converted form to `writer`.
    ///
    /// Nothing is written unless every step succeeded.
    pub fn convert_reader<R: Read, W: Write>(
        &self,
        mut reader: R,
        mut writer: W,
        format: OutputFormat,
    ) -> Result<(), ConvertError> {
        let mut input = Vec::new();
        reader.read_to_end(&mut input)?;
        let output = self.convert(&input, format)?;
        writer.write_all(&output)?;
        writer.flush()?;
        Ok(())
    }
}
