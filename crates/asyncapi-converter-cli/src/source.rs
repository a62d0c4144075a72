//! Where the document to convert comes from.

use std::fmt;
use std::path::{Path, PathBuf};

use reqwest::Url;

use crate::error::CliError;

/// Location of the input document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// Local file.
    Path(PathBuf),
    /// Remote `http(s)` document.
    Url(Url),
}

impl Source {
    /// Classify a command-line argument.
    ///
    /// Anything that parses as a URL with both a scheme and a host is remote;
    /// everything else is a local path.
    pub fn parse(arg: &str) -> Self {
        match Url::parse(arg) {
            Ok(url) if url.host_str().is_some_and(|host| !host.is_empty()) => Self::Url(url),
            _ => Self::Path(PathBuf::from(arg)),
        }
    }

    /// Read the raw document bytes.
    pub fn read(&self) -> Result<Vec<u8>, CliError> {
        match self {
            Self::Path(path) => read_file(path),
            Self::Url(url) => fetch(url),
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(path) => write!(f, "{}", path.display()),
            Self::Url(url) => write!(f, "{}", url),
        }
    }
}

fn read_file(path: &Path) -> Result<Vec<u8>, CliError> {
    if !path.exists() {
        return Err(CliError::FileDoesNotExist(path.display().to_string()));
    }
    Ok(std::fs::read(path)?)
}

fn fetch(url: &Url) -> Result<Vec<u8>, CliError> {
    let fetch_error = |e: reqwest::Error| CliError::Fetch {
        url: url.to_string(),
        reason: e.to_string(),
    };

    let response = reqwest::blocking::get(url.clone())
        .and_then(|response| response.error_for_status())
        .map_err(fetch_error)?;
    let body = response.bytes().map_err(fetch_error)?;
    Ok(body.to_vec())
}
