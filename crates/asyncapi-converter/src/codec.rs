//! Decoding raw input into a [`Document`] and encoding it back.
//!
//! Input may be JSON or YAML. Both parsers are tried in the configured order
//! and only if both fail is a single [`ConvertError::Decode`] returned.

use serde_json::Value;

use crate::document::Document;
use crate::error::ConvertError;

/// Which parser to try first when decoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DecodeOrder {
    /// JSON first, YAML on failure.
    #[default]
    JsonFirst,
    /// YAML first, JSON on failure.
    YamlFirst,
}

/// Serialization format of the converted document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
}

impl OutputFormat {
    /// Parse from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }
}

type Decoder = fn(&[u8]) -> Result<Value, String>;

fn decode_json(input: &[u8]) -> Result<Value, String> {
    serde_json::from_slice(input).map_err(|e| format!("json: {}", e))
}

/// Anchors are resolved by the parser, `<<` merge keys are expanded here.
fn decode_yaml(input: &[u8]) -> Result<Value, String> {
    let mut yaml: serde_yaml::Value =
        serde_yaml::from_slice(input).map_err(|e| format!("yaml: {}", e))?;
    yaml.apply_merge().map_err(|e| format!("yaml: {}", e))?;
    serde_yaml::from_value(yaml).map_err(|e| format!("yaml: {}", e))
}

/// Decode raw bytes into a document.
///
/// Fails with [`ConvertError::InvalidDocument`] when the input parses but its
/// root is not a mapping.
pub fn decode(input: &[u8], order: DecodeOrder) -> Result<Document, ConvertError> {
    let (first, second): (Decoder, Decoder) = match order {
        DecodeOrder::JsonFirst => (decode_json, decode_yaml),
        DecodeOrder::YamlFirst => (decode_yaml, decode_json),
    };

    let value = match first(input) {
        Ok(value) => value,
        Err(first_err) => match second(input) {
            Ok(value) => {
                tracing::debug!(reason = %first_err, "falling back to second decoder");
                value
            }
            Err(second_err) => {
                return Err(ConvertError::Decode(format!("{}; {}", first_err, second_err)))
            }
        },
    };

    Document::from_value(value)
}

/// Encode a document in the requested format.
///
/// JSON output is pretty-printed and ends with a newline.
pub fn encode(document: &Document, format: OutputFormat) -> Result<Vec<u8>, ConvertError> {
    match format {
        OutputFormat::Json => {
            let mut out = serde_json::to_vec_pretty(document.as_object())
                .map_err(|e| ConvertError::Encode(e.to_string()))?;
            out.push(b'\n');
            Ok(out)
        }
        OutputFormat::Yaml => serde_yaml::to_string(document.as_object())
            .map(String::into_bytes)
            .map_err(|e| ConvertError::Encode(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decode_json_input() {
        let doc = decode(br#"{"asyncapi": "1.2.0"}"#, DecodeOrder::JsonFirst).unwrap();
        assert_eq!(doc.get("asyncapi"), Some(&json!("1.2.0")));
    }

    #[test]
    fn yaml_input_falls_back() {
        let yaml = b"asyncapi: 1.1.0\ninfo:\n  title: Streetlights\n";
        let doc = decode(yaml, DecodeOrder::JsonFirst).unwrap();
        assert_eq!(doc.get("asyncapi"), Some(&json!("1.1.0")));
        assert_eq!(doc.get("info"), Some(&json!({"title": "Streetlights"})));
    }

    #[test]
    fn yaml_merge_keys_are_expanded() {
        let yaml = br#"
asyncapi: 1.2.0
shared: &shared
  description: shared
  deprecated: false
topics:
  a.b:
    <<: *shared
    deprecated: true
    publish: X
"#;
        let doc = decode(yaml, DecodeOrder::JsonFirst).unwrap();
        assert_eq!(
            doc.get("topics"),
            Some(&json!({"a.b": {
                "description": "shared",
                "deprecated": true,
                "publish": "X"
            }}))
        );
    }

    #[test]
    fn yaml_first_still_reads_json() {
        let doc = decode(br#"{"asyncapi": "1.0.0"}"#, DecodeOrder::YamlFirst).unwrap();
        assert_eq!(doc.get("asyncapi"), Some(&json!("1.0.0")));
    }

    #[test]
    fn garbage_reports_both_decoders() {
        let err = decode(b"{ not: [valid", DecodeOrder::JsonFirst).unwrap_err();
        match err {
            ConvertError::Decode(msg) => {
                assert!(msg.contains("json:"));
                assert!(msg.contains("yaml:"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn sequence_root_is_invalid_document() {
        let err = decode(b"[1, 2, 3]", DecodeOrder::JsonFirst).unwrap_err();
        assert!(matches!(err, ConvertError::InvalidDocument));
    }

    #[test]
    fn encode_json_and_yaml() {
        let doc = Document::from_value(json!({"asyncapi": "2.0.0-rc2", "id": "urn:x"})).unwrap();

        let json_out = String::from_utf8(encode(&doc, OutputFormat::Json).unwrap()).unwrap();
        assert!(json_out.ends_with('\n'));
        let reparsed: Value = serde_json::from_str(&json_out).unwrap();
        assert_eq!(reparsed["id"], "urn:x");

        let yaml_out = encode(&doc, OutputFormat::Yaml).unwrap();
        let reparsed: Value = serde_yaml::from_slice(&yaml_out).unwrap();
        assert_eq!(reparsed["asyncapi"], "2.0.0-rc2");
    }

    #[test]
    fn output_format_parse() {
        assert_eq!(OutputFormat::parse("JSON"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::parse("yaml"), Some(OutputFormat::Yaml));
        assert_eq!(OutputFormat::parse("yml"), Some(OutputFormat::Yaml));
        assert_eq!(OutputFormat::parse("toml"), None);
    }
}
