use asyncapi_converter::ConvertError;
use thiserror::Error;

/// Errors surfaced by the command-line tool.
#[derive(Debug, Error)]
pub enum CliError {
    /// The source path does not exist.
    #[error("file does not exist: {0}")]
    FileDoesNotExist(String),

    /// The source URL could not be fetched.
    #[error("failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },

    /// I/O error reading the source or writing the output.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The conversion itself failed.
    #[error(transparent)]
    Convert(#[from] ConvertError),
}

impl CliError {
    /// Whether the document was already in the target version.
    pub fn is_up_to_date(&self) -> bool {
        matches!(self, Self::Convert(e) if e.is_up_to_date())
    }
}
