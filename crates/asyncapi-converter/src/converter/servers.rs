use serde_json::Value;

use super::ConvertOptions;
use crate::document::{expect_object_mut, rename_key, Document, Object};
use crate::error::ConvertError;

/// Key of the server at `index` once the list becomes a mapping.
fn server_key(index: usize) -> String {
    if index == 0 {
        "default".to_string()
    } else {
        format!("server{}", index)
    }
}

/// Turn the legacy `servers` list into a keyed mapping.
///
/// `scheme`/`schemeVersion` become `protocol`/`protocolVersion` and the root
/// `security` requirement is copied into every server. A missing or
/// non-sequence `servers` field is left untouched.
pub(super) fn remap_servers(
    doc: &mut Document,
    _options: &ConvertOptions,
) -> Result<(), ConvertError> {
    let security = doc.get("security").cloned();

    let Some(Value::Array(servers)) = doc.get_mut("servers") else {
        return Ok(());
    };

    for server in servers.iter_mut() {
        let server = expect_object_mut(server, "server")?;
        rename_key(server, "scheme", "protocol");
        rename_key(server, "schemeVersion", "protocolVersion");
        if let Some(security) = &security {
            server.insert("security".to_string(), security.clone());
        }
    }

    let mapped: Object = std::mem::take(servers)
        .into_iter()
        .enumerate()
        .map(|(index, server)| (server_key(index), server))
        .collect();

    tracing::debug!(count = mapped.len(), "servers remapped");
    doc.insert("servers", Value::Object(mapped));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn remap(value: Value) -> Result<Value, ConvertError> {
        let mut doc = Document::from_value(value)?;
        remap_servers(&mut doc, &ConvertOptions::default())?;
        Ok(doc.into_value())
    }

    #[test]
    fn list_becomes_mapping() {
        let out = remap(json!({
            "servers": [
                {"scheme": "mqtt", "schemeVersion": "3"},
                {"scheme": "http"}
            ]
        }))
        .unwrap();

        assert_eq!(
            out["servers"],
            json!({
                "default": {"protocol": "mqtt", "protocolVersion": "3"},
                "server1": {"protocol": "http"}
            })
        );
    }

    #[test]
    fn later_servers_are_numbered_from_one() {
        let out = remap(json!({
            "servers": [{"scheme": "a"}, {"scheme": "b"}, {"scheme": "c"}]
        }))
        .unwrap();

        let servers = out["servers"].as_object().unwrap();
        let mut keys: Vec<&str> = servers.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, ["default", "server1", "server2"]);
        assert_eq!(servers["server2"]["protocol"], "c");
    }

    #[test]
    fn root_security_is_copied() {
        let out = remap(json!({
            "security": [{"userPassword": []}],
            "servers": [{"url": "broker", "scheme": "amqp"}]
        }))
        .unwrap();

        assert_eq!(out["servers"]["default"]["security"], json!([{"userPassword": []}]));
        // Pruning the root field happens in a later step.
        assert!(out.get("security").is_some());
    }

    #[test]
    fn absent_or_non_list_servers_are_untouched() {
        let out = remap(json!({"info": {}})).unwrap();
        assert!(out.get("servers").is_none());

        let out = remap(json!({"servers": {"default": {"protocol": "ws"}}})).unwrap();
        assert_eq!(out["servers"], json!({"default": {"protocol": "ws"}}));
    }

    #[test]
    fn non_mapping_entry_fails() {
        let err = remap(json!({"servers": [{"scheme": "mqtt"}, "broker:1883"]})).unwrap_err();
        assert!(matches!(err, ConvertError::InvalidProperty(ctx) if ctx == "server"));
    }

    #[test]
    fn empty_list_becomes_empty_mapping() {
        let out = remap(json!({"servers": []})).unwrap();
        assert_eq!(out["servers"], json!({}));
    }
}
