//! JSON documents mapped to embeddable attribute lists.
//!
//! The codec never parses JSON itself. It converts between attribute
//! values and an order-preserving [`JsonNode`] tree and hands the tree to
//! an injected [`FormatMapper`] for the text form.

use core::fmt;

use serde::de::{self, MapAccess, SeqAccess, Visitor};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::{check_values, Field, Kind, Value};
use crate::error::{DialectError, Result};

/// A JSON value whose object members keep their document order.
#[derive(Debug, Clone, PartialEq)]
pub enum JsonNode {
    /// `null`
    Null,
    /// `true` / `false`
    Bool(bool),
    /// Any number.
    Number(serde_json::Number),
    /// A string.
    String(String),
    /// An array.
    Array(Vec<JsonNode>),
    /// An object, members in document order.
    Object(Vec<(String, JsonNode)>),
}

impl JsonNode {
    const fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Array(_) => "array",
            Self::Object(_) => "object",
        }
    }
}

impl Serialize for JsonNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Number(n) => n.serialize(serializer),
            Self::String(s) => serializer.serialize_str(s),
            Self::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Object(members) => {
                let mut map = serializer.serialize_map(Some(members.len()))?;
                for (key, value) in members {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
        }
    }
}

struct JsonNodeVisitor;

impl<'de> Visitor<'de> for JsonNodeVisitor {
    type Value = JsonNode;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("any JSON value")
    }

    fn visit_unit<E: de::Error>(self) -> std::result::Result<JsonNode, E> {
        Ok(JsonNode::Null)
    }

    fn visit_none<E: de::Error>(self) -> std::result::Result<JsonNode, E> {
        Ok(JsonNode::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> std::result::Result<JsonNode, D::Error> {
        JsonNode::deserialize(deserializer)
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> std::result::Result<JsonNode, E> {
        Ok(JsonNode::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<JsonNode, E> {
        Ok(JsonNode::Number(v.into()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<JsonNode, E> {
        Ok(JsonNode::Number(v.into()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<JsonNode, E> {
        serde_json::Number::from_f64(v)
            .map(JsonNode::Number)
            .ok_or_else(|| E::custom("non-finite number"))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<JsonNode, E> {
        Ok(JsonNode::String(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> std::result::Result<JsonNode, E> {
        Ok(JsonNode::String(v))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> std::result::Result<JsonNode, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(JsonNode::Array(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<JsonNode, A::Error> {
        let mut members = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((key, value)) = map.next_entry::<String, JsonNode>()? {
            members.push((key, value));
        }
        Ok(JsonNode::Object(members))
    }
}

impl<'de> Deserialize<'de> for JsonNode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_any(JsonNodeVisitor)
    }
}

/// Pluggable JSON text marshaling.
pub trait FormatMapper: Send + Sync {
    /// Writes a document.
    ///
    /// # Errors
    ///
    /// Returns the adapter's failure.
    fn to_string(&self, node: &JsonNode) -> Result<String>;

    /// Reads a document.
    ///
    /// # Errors
    ///
    /// Returns the adapter's failure.
    fn from_string(&self, text: &str) -> Result<JsonNode>;
}

/// [`FormatMapper`] backed by `serde_json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SerdeJsonMapper;

impl FormatMapper for SerdeJsonMapper {
    fn to_string(&self, node: &JsonNode) -> Result<String> {
        Ok(serde_json::to_string(node)?)
    }

    fn from_string(&self, text: &str) -> Result<JsonNode> {
        Ok(serde_json::from_str(text)?)
    }
}

/// An embeddable type stored as one JSON object, attributes in declared
/// order.
///
/// ```rust
/// use oxide_dialect_core::codec::{EmbeddableSchema, Field, Kind, SerdeJsonMapper, Value};
///
/// let schema = EmbeddableSchema::new(
///     "Money",
///     vec![Field::required("amount", Kind::Integer), Field::new("currency", Kind::Text)],
/// );
/// let values = vec![Value::Integer(100), Value::Null];
/// let text = schema.encode(&values, &SerdeJsonMapper).unwrap();
/// assert_eq!(text, r#"{"amount":100,"currency":null}"#);
/// assert_eq!(schema.decode(&text, &SerdeJsonMapper).unwrap(), values);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddableSchema {
    name: String,
    fields: Vec<Field>,
}

impl EmbeddableSchema {
    /// Creates a schema.
    #[must_use]
    pub fn new(name: impl Into<String>, fields: Vec<Field>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }

    /// Declared fields.
    #[must_use]
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Encodes values, in declared order, as a JSON object.
    ///
    /// # Errors
    ///
    /// Fails on a count or kind mismatch, or when the mapper fails.
    pub fn encode(&self, values: &[Value], mapper: &dyn FormatMapper) -> Result<String> {
        check_values(&self.name, &self.fields, values)?;
        let members = self
            .fields
            .iter()
            .zip(values)
            .map(|(field, value)| Ok((field.name.clone(), to_node(value)?)))
            .collect::<Result<Vec<_>>>()?;
        mapper.to_string(&JsonNode::Object(members))
    }

    /// Decodes a JSON object into values in declared order.
    ///
    /// # Errors
    ///
    /// Fails when the document is not an object, when its member count or
    /// order differs from the declaration, or when a member has the wrong
    /// type.
    pub fn decode(&self, text: &str, mapper: &dyn FormatMapper) -> Result<Vec<Value>> {
        let members = match mapper.from_string(text)? {
            JsonNode::Object(members) => members,
            other => {
                return Err(DialectError::malformed(
                    "json",
                    0,
                    format!("expected an object, found {}", other.type_name()),
                ));
            }
        };
        if members.len() != self.fields.len() {
            return Err(DialectError::AttributeCountMismatch {
                type_name: self.name.clone(),
                expected: self.fields.len(),
                found: members.len(),
            });
        }
        self.fields
            .iter()
            .zip(members)
            .enumerate()
            .map(|(position, (field, (key, node)))| {
                if key != field.name {
                    return Err(DialectError::AttributeOrderMismatch {
                        type_name: self.name.clone(),
                        position,
                        expected: field.name.clone(),
                        found: key,
                    });
                }
                let value = from_node(field, node)?;
                field.check(&value)?;
                Ok(value)
            })
            .collect()
    }
}

fn to_node(value: &Value) -> Result<JsonNode> {
    Ok(match value {
        Value::Null => JsonNode::Null,
        Value::Boolean(b) => JsonNode::Bool(*b),
        Value::Integer(n) => JsonNode::Number((*n).into()),
        Value::Float(f) => JsonNode::Number(serde_json::Number::from_f64(*f).ok_or_else(|| {
            DialectError::FormatMapper(format!("{f} cannot be represented in JSON"))
        })?),
        Value::Text(_) | Value::Date(_) | Value::Timestamp(_) => {
            JsonNode::String(value.to_text().unwrap_or_default())
        }
    })
}

fn from_node(field: &Field, node: JsonNode) -> Result<Value> {
    let mismatch = |node: &JsonNode| DialectError::AttributeTypeMismatch {
        attribute: field.name.clone(),
        expected: field.kind.as_str().to_string(),
        found: node.type_name().to_string(),
    };
    match (field.kind, node) {
        (_, JsonNode::Null) => Ok(Value::Null),
        (Kind::Boolean, JsonNode::Bool(b)) => Ok(Value::Boolean(b)),
        (Kind::Integer, JsonNode::Number(n)) => {
            let node = JsonNode::Number(n.clone());
            n.as_i64().map(Value::Integer).ok_or_else(|| mismatch(&node))
        }
        (Kind::Float, JsonNode::Number(n)) => {
            let node = JsonNode::Number(n.clone());
            n.as_f64().map(Value::Float).ok_or_else(|| mismatch(&node))
        }
        (Kind::Text | Kind::Date | Kind::Timestamp, JsonNode::String(s)) => {
            field.kind.parse_text(&field.name, &s)
        }
        (_, node) => Err(mismatch(&node)),
    }
}
