use thiserror::Error;

/// Errors produced while converting an AsyncAPI document.
///
/// Callers branch on the variant, never on the message text.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// A required property is missing or has the wrong shape.
    #[error("asyncapi: error invalid property {0}")]
    InvalidProperty(String),

    /// The decoded document root is not a mapping.
    #[error("asyncapi: unable to decode document")]
    InvalidDocument,

    /// The declared version is neither the target nor a legacy version.
    #[error("asyncapi: unsupported asyncapi version '{0}'")]
    UnsupportedAsyncapiVersion(String),

    /// The document already declares the target version.
    ///
    /// Not a failure of the input: there is simply nothing to convert.
    #[error("asyncapi: document is already in version '{0}'")]
    DocumentVersionUpToDate(String),

    /// The input is neither valid JSON nor valid YAML.
    #[error("asyncapi: decode error: {0}")]
    Decode(String),

    /// The converted document could not be serialized.
    #[error("asyncapi: encode error: {0}")]
    Encode(String),

    /// I/O error while reading input or writing output.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConvertError {
    pub(crate) fn invalid_property(context: impl Into<String>) -> Self {
        Self::InvalidProperty(context.into())
    }

    /// Whether the document needed no conversion at all.
    pub fn is_up_to_date(&self) -> bool {
        matches!(self, Self::DocumentVersionUpToDate(_))
    }
}
