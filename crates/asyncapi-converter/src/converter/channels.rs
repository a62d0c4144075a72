//! Channel synthesis from legacy containers and channel refinement.
//!
//! AsyncAPI 1.x describes channels in one of three ways: a `topics` mapping
//! (optionally prefixed by `baseTopic`), a single `stream`, or a single
//! `events` object. All three become the 2.x `channels` mapping.

use std::sync::OnceLock;

use regex_lite::Regex;
use serde_json::{json, Value};

use super::ConvertOptions;
use crate::document::{
    expect_object, expect_object_mut, rename_key, render_scalar, Document, Object,
};
use crate::error::ConvertError;

/// Channel key used for `stream` and `events` documents.
const ROOT_CHANNEL: &str = "/";

/// The legacy container a document's channels are built from.
///
/// Selected once per conversion, in priority order `topics`, `stream`,
/// `events`. When a document carries several, only the first is used.
#[derive(Debug, Clone, Copy)]
pub enum LegacyChannels<'a> {
    /// `topics` mapping, with the optional root `baseTopic`.
    Topics {
        topics: &'a Value,
        base_topic: Option<&'a Value>,
    },
    /// `stream` object with `read`/`write` message lists.
    Stream(&'a Value),
    /// `events` object with `receive`/`send` message lists.
    Events(&'a Value),
}

impl<'a> LegacyChannels<'a> {
    /// Find the legacy container in `doc`, if any.
    pub fn detect(doc: &'a Document) -> Option<Self> {
        if let Some(topics) = doc.get("topics") {
            return Some(Self::Topics {
                topics,
                base_topic: doc.get("baseTopic"),
            });
        }
        if let Some(stream) = doc.get("stream") {
            return Some(Self::Stream(stream));
        }
        doc.get("events").map(Self::Events)
    }

    /// Name of the root field this container came from.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Topics { .. } => "topics",
            Self::Stream(_) => "stream",
            Self::Events(_) => "events",
        }
    }

    /// Build the 2.x `channels` mapping.
    pub fn into_channels(self) -> Result<Object, ConvertError> {
        match self {
            Self::Topics { topics, base_topic } => channels_from_topics(topics, base_topic),
            // Each context names the other container. Callers match on these strings.
            Self::Stream(stream) => single_channel(stream, "events", "read", "write"),
            Self::Events(events) => single_channel(events, "stream", "receive", "send"),
        }
    }
}

fn channels_from_topics(
    topics: &Value,
    base_topic: Option<&Value>,
) -> Result<Object, ConvertError> {
    let topics = expect_object(topics, "topics")?;
    let base = base_topic
        .and_then(render_scalar)
        .filter(|base| !base.is_empty());

    let mut channels = Object::new();
    for (key, topic) in topics {
        let path = match &base {
            Some(base) => format!("{}/{}", base, key),
            None => key.clone(),
        };
        let name = path.replace('.', "/");

        let mut topic = topic.clone();
        if let Some(obj) = topic.as_object_mut() {
            wrap_message(obj, "publish");
            wrap_message(obj, "subscribe");
        }

        if channels.insert(name.clone(), topic).is_some() {
            tracing::warn!(
                channel = %name,
                topic = %key,
                "topic overwrites an earlier channel with the same name"
            );
        }
    }
    Ok(channels)
}

/// Replace a legacy operation value `v` with `{"message": v}`.
fn wrap_message(topic: &mut Object, operation: &str) {
    if let Some(slot) = topic.get_mut(operation) {
        if !slot.is_null() {
            let message = slot.take();
            *slot = json!({ "message": message });
        }
    }
}

fn single_channel(
    source: &Value,
    context: &str,
    publish_key: &str,
    subscribe_key: &str,
) -> Result<Object, ConvertError> {
    let source = expect_object(source, context)?;

    let mut channel = Object::new();
    if let Some(messages) = source.get(publish_key) {
        channel.insert("publish".to_string(), one_of(messages));
    }
    if let Some(messages) = source.get(subscribe_key) {
        channel.insert("subscribe".to_string(), one_of(messages));
    }

    let mut channels = Object::new();
    channels.insert(ROOT_CHANNEL.to_string(), Value::Object(channel));
    Ok(channels)
}

fn one_of(messages: &Value) -> Value {
    json!({ "message": { "oneOf": messages.clone() } })
}

/// Build `channels` from whichever legacy container the document carries.
pub(super) fn create_channels(
    doc: &mut Document,
    _options: &ConvertOptions,
) -> Result<(), ConvertError> {
    let source = LegacyChannels::detect(doc)
        .ok_or_else(|| ConvertError::invalid_property("missing one of topics/stream/events"))?;
    let kind = source.kind();
    let channels = source.into_channels()?;

    tracing::debug!(source = kind, count = channels.len(), "channels created");
    doc.insert("channels", Value::Object(channels));
    Ok(())
}

/// Normalize parameters and rename `protocolInfo` to `bindings` in every channel.
pub(super) fn refine_channels(
    doc: &mut Document,
    _options: &ConvertOptions,
) -> Result<(), ConvertError> {
    let channels = doc
        .get_mut("channels")
        .and_then(Value::as_object_mut)
        .ok_or_else(|| ConvertError::invalid_property("missing channels"))?;

    for (name, channel) in channels.iter_mut() {
        let channel = expect_object_mut(channel, "malformed channel")?;

        normalize_parameters(name, channel)?;

        for operation in ["publish", "subscribe"] {
            if let Some(Value::Object(op)) = channel.get_mut(operation) {
                normalize_message_bindings(op);
                rename_key(op, "protocolInfo", "bindings");
            }
        }
        rename_key(channel, "protocolInfo", "bindings");
    }
    Ok(())
}

/// Placeholder names (`{name}` tokens) of a channel, braces stripped, in order.
fn placeholder_names(channel: &str) -> Vec<&str> {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    let re = PLACEHOLDER
        .get_or_init(|| Regex::new(r"\{([^}]+)\}").expect("valid placeholder regex"));
    re.captures_iter(channel)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .collect()
}

fn strip_braces(name: &str) -> &str {
    name.strip_prefix('{')
        .and_then(|inner| inner.strip_suffix('}'))
        .unwrap_or(name)
}

/// Turn a legacy parameter list into a mapping keyed by parameter name.
///
/// A parameter's own `name` wins; otherwise the placeholder at the same
/// position in the channel name is used, and `default` after that.
fn normalize_parameters(channel_name: &str, channel: &mut Object) -> Result<(), ConvertError> {
    let Some(Value::Array(params)) = channel.get_mut("parameters") else {
        return Ok(());
    };
    let params = std::mem::take(params);
    let placeholders = placeholder_names(channel_name);

    let mut mapped = Object::new();
    for (index, param) in params.into_iter().enumerate() {
        let Value::Object(mut param) = param else {
            return Err(ConvertError::invalid_property("malformed parameter of channel"));
        };

        let name = match param.remove("name") {
            Some(Value::String(name)) => strip_braces(&name).to_string(),
            _ => placeholders
                .get(index)
                .map(|placeholder| placeholder.to_string())
                .unwrap_or_else(|| "default".to_string()),
        };
        mapped.insert(name, Value::Object(param));
    }

    channel.insert("parameters".to_string(), Value::Object(mapped));
    Ok(())
}

/// Rename `protocolInfo` inside an operation's message.
///
/// A `oneOf` list of messages is handled per element; any other message is
/// renamed in place.
fn normalize_message_bindings(operation: &mut Object) {
    let Some(Value::Object(message)) = operation.get_mut("message") else {
        return;
    };

    let one_of_messages = matches!(
        message.get("oneOf"),
        Some(Value::Array(variants)) if variants.iter().all(Value::is_object)
    );

    if one_of_messages {
        if let Some(Value::Array(variants)) = message.get_mut("oneOf") {
            for variant in variants.iter_mut().filter_map(Value::as_object_mut) {
                rename_key(variant, "protocolInfo", "bindings");
            }
        }
    } else {
        rename_key(message, "protocolInfo", "bindings");
    }
}
