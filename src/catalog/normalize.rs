//! Normalization of upstream payloads.
//!
//! Records arrive either flat or nested under `attributes`; each field
//! prefers the nested value and falls back to the flat one. A nested value
//! that is null, false, zero or empty counts as absent.

use serde_json::Value;

use super::models::{CharacterDetail, CharacterId, CharacterSummary};
use crate::error::CatalogError;

/// Known layouts of the list payload, in detection order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadShape {
    /// `data: [...]`
    BareArray,
    /// `data: { data: [...] }`
    DataWrapper,
    /// `data: { list: [...] }`
    ListWrapper,
}

impl PayloadShape {
    pub const PRIORITY: [PayloadShape; 3] = [
        PayloadShape::BareArray,
        PayloadShape::DataWrapper,
        PayloadShape::ListWrapper,
    ];

    fn extract(self, payload: &Value) -> Option<&Vec<Value>> {
        match self {
            Self::BareArray => payload.as_array(),
            Self::DataWrapper => payload.get("data")?.as_array(),
            Self::ListWrapper => payload.get("list")?.as_array(),
        }
    }
}

/// Locate the record array inside a list payload.
///
/// Fails closed with `UnrecognizedShape` when no known layout matches.
pub fn character_records(payload: &Value) -> Result<(PayloadShape, &Vec<Value>), CatalogError> {
    PayloadShape::PRIORITY
        .into_iter()
        .find_map(|shape| shape.extract(payload).map(|records| (shape, records)))
        .ok_or(CatalogError::UnrecognizedShape)
}

/// Normalize one upstream record into the summary shape.
pub fn summary(raw: &Value) -> CharacterSummary {
    CharacterSummary {
        id: raw.get("id").and_then(character_id),
        raw_id: text(raw, "rawId"),
        name: text(raw, "name"),
        short_desc: text(raw, "shortDesc"),
        desc: text(raw, "desc"),
        hello_tip: text(raw, "helloTip"),
        avatar: avatar(raw),
        is_star: field(raw, "isStar").is_some(),
    }
}

/// Normalize one upstream detail payload, keeping the prompt intact.
///
/// Returns `None` when the payload is not a character record: it must be
/// an object with an `attributes` object, or carry a flat `id`, `name` or
/// `prompt`.
pub fn detail(raw: &Value) -> Option<CharacterDetail> {
    if !is_record(raw) {
        return None;
    }

    let prompt = text(raw, "prompt").unwrap_or_default();
    Some(CharacterDetail::new(summary(raw), prompt))
}

fn is_record(raw: &Value) -> bool {
    let Some(map) = raw.as_object() else {
        return false;
    };
    map.get("attributes").is_some_and(Value::is_object)
        || ["id", "name", "prompt"]
            .into_iter()
            .any(|key| map.get(key).is_some_and(is_truthy))
}

/// JavaScript-style truthiness, which decides nested-vs-flat fallback.
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn field<'a>(raw: &'a Value, name: &str) -> Option<&'a Value> {
    raw.get("attributes")
        .and_then(|attrs| attrs.get(name))
        .filter(|v| is_truthy(v))
        .or_else(|| raw.get(name).filter(|v| is_truthy(v)))
}

fn text(raw: &Value, name: &str) -> Option<String> {
    field(raw, name).and_then(as_text)
}

fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn avatar(raw: &Value) -> Option<String> {
    raw.pointer("/attributes/avatar/data/attributes/url")
        .filter(|v| is_truthy(v))
        .or_else(|| raw.get("avatar").filter(|v| is_truthy(v)))
        .and_then(as_text)
}

fn character_id(value: &Value) -> Option<CharacterId> {
    match value {
        Value::Number(n) => n.as_i64().map(CharacterId::Number),
        Value::String(s) => Some(CharacterId::Text(s.clone())),
        _ => None,
    }
}
