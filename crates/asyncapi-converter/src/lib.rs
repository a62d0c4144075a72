//! AsyncAPI 1.x to 2.0.0-rc2 converter.
//!
//! Decodes a legacy AsyncAPI document (JSON or YAML), upgrades it through a
//! fixed pipeline of steps and encodes the result as JSON or YAML.
//!
//! ```
//! use asyncapi_converter::{Converter, ConvertOptions, OutputFormat};
//!
//! let input = br#"{
//!     "asyncapi": "1.2.0",
//!     "info": {"title": "Chat API"},
//!     "stream": {"read": [{"payload": {"type": "string"}}]}
//! }"#;
//!
//! let converter = Converter::new(ConvertOptions::new());
//! let output = converter.convert(input, OutputFormat::Json).unwrap();
//! let doc: serde_json::Value = serde_json::from_slice(&output).unwrap();
//! assert_eq!(doc["asyncapi"], "2.0.0-rc2");
//! assert_eq!(doc["id"], "urn:chat.api");
//! ```

pub mod codec;
pub mod converter;
pub mod document;
pub mod error;

pub use codec::{decode, encode, DecodeOrder, OutputFormat};
pub use converter::{ConvertOptions, Converter, LegacyChannels, LEGACY_VERSIONS, TARGET_VERSION};
pub use document::{Document, Object};
pub use error::ConvertError;
