//! Structured-value codec.
//!
//! Encodes and decodes the three composite payload shapes databases
//! exchange with clients:
//!
//! - JSON documents mapped to a flat ordered list of attribute values
//!   through an [`EmbeddableSchema`] and an injected [`FormatMapper`],
//! - homogeneous arrays in the dialect's array literal syntax
//!   ([`ArrayCodec`]),
//! - struct/object values with an optional physical attribute reordering
//!   ([`StructCodec`]).
//!
//! Decoding is strict: a payload whose shape disagrees with the declared
//! schema fails instead of assigning values to the wrong attribute.

mod access;
mod array;
mod json;
mod literal;
mod raw;
mod structs;

pub use access::{read_nullable, RowAccess};
pub use array::ArrayCodec;
pub use json::{EmbeddableSchema, FormatMapper, JsonNode, SerdeJsonMapper};
pub use raw::RawValueTransform;
pub use structs::{StructCodec, StructSchema};

use core::fmt;

use chrono::{NaiveDate, NaiveDateTime};

use crate::error::{DialectError, Result};

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Declared type of an attribute or array element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// Truth value.
    Boolean,
    /// 64-bit integer.
    Integer,
    /// 64-bit float.
    Float,
    /// Text.
    Text,
    /// Calendar date.
    Date,
    /// Timestamp without zone.
    Timestamp,
}

impl Kind {
    /// Returns the kind name used in error messages.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Text => "text",
            Self::Date => "date",
            Self::Timestamp => "timestamp",
        }
    }

    /// Parses the unquoted text form of a value of this kind.
    fn parse_text(self, attribute: &str, text: &str) -> Result<Value> {
        let mismatch = || DialectError::AttributeTypeMismatch {
            attribute: attribute.to_string(),
            expected: self.as_str().to_string(),
            found: format!("'{text}'"),
        };
        match self {
            Self::Boolean => match text.to_ascii_lowercase().as_str() {
                "t" | "true" => Ok(Value::Boolean(true)),
                "f" | "false" => Ok(Value::Boolean(false)),
                _ => Err(mismatch()),
            },
            Self::Integer => text.parse().map(Value::Integer).map_err(|_| mismatch()),
            Self::Float => text.parse().map(Value::Float).map_err(|_| mismatch()),
            Self::Text => Ok(Value::Text(text.to_string())),
            Self::Date => NaiveDate::parse_from_str(text, DATE_FORMAT)
                .map(Value::Date)
                .map_err(|_| mismatch()),
            Self::Timestamp => NaiveDateTime::parse_from_str(text, TIMESTAMP_FORMAT)
                .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f"))
                .map(Value::Timestamp)
                .map_err(|_| mismatch()),
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A decoded attribute or element value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// SQL NULL.
    Null,
    /// Truth value.
    Boolean(bool),
    /// Integer.
    Integer(i64),
    /// Float.
    Float(f64),
    /// Text.
    Text(String),
    /// Calendar date.
    Date(NaiveDate),
    /// Timestamp without zone.
    Timestamp(NaiveDateTime),
}

impl Value {
    /// Returns the kind of a non-null value.
    #[must_use]
    pub const fn kind(&self) -> Option<Kind> {
        match self {
            Self::Null => None,
            Self::Boolean(_) => Some(Kind::Boolean),
            Self::Integer(_) => Some(Kind::Integer),
            Self::Float(_) => Some(Kind::Float),
            Self::Text(_) => Some(Kind::Text),
            Self::Date(_) => Some(Kind::Date),
            Self::Timestamp(_) => Some(Kind::Timestamp),
        }
    }

    /// Unquoted text form; `None` for NULL.
    fn to_text(&self) -> Option<String> {
        match self {
            Self::Null => None,
            Self::Boolean(b) => Some(b.to_string()),
            Self::Integer(n) => Some(n.to_string()),
            Self::Float(f) => Some(f.to_string()),
            Self::Text(s) => Some(s.clone()),
            Self::Date(d) => Some(d.format(DATE_FORMAT).to_string()),
            Self::Timestamp(ts) => Some(ts.format(TIMESTAMP_FORMAT).to_string()),
        }
    }

    /// SQL literal form.
    fn to_sql_literal(&self) -> String {
        match self {
            Self::Null => String::from("NULL"),
            Self::Boolean(true) => String::from("TRUE"),
            Self::Boolean(false) => String::from("FALSE"),
            Self::Integer(n) => n.to_string(),
            Self::Float(f) => f.to_string(),
            Self::Text(s) => format!("'{}'", s.replace('\'', "''")),
            Self::Date(d) => format!("DATE '{}'", d.format(DATE_FORMAT)),
            Self::Timestamp(ts) => format!("TIMESTAMP '{}'", ts.format(TIMESTAMP_FORMAT)),
        }
    }
}

/// A named, typed attribute of a structured value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Attribute name.
    pub name: String,
    /// Declared kind.
    pub kind: Kind,
    /// Whether NULL is allowed.
    pub nullable: bool,
}

impl Field {
    /// A nullable attribute.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: Kind) -> Self {
        Self {
            name: name.into(),
            kind,
            nullable: true,
        }
    }

    /// A NOT NULL attribute.
    #[must_use]
    pub fn required(name: impl Into<String>, kind: Kind) -> Self {
        Self {
            name: name.into(),
            kind,
            nullable: false,
        }
    }

    /// Checks a value against the declaration.
    fn check(&self, value: &Value) -> Result<()> {
        let found = match value.kind() {
            None if self.nullable => return Ok(()),
            None => "null",
            Some(kind) if kind == self.kind => return Ok(()),
            Some(kind) => kind.as_str(),
        };
        Err(DialectError::AttributeTypeMismatch {
            attribute: self.name.clone(),
            expected: self.kind.as_str().to_string(),
            found: found.to_string(),
        })
    }
}

/// Checks a value list against declared fields, by count then by kind.
fn check_values(type_name: &str, fields: &[Field], values: &[Value]) -> Result<()> {
    if fields.len() != values.len() {
        return Err(DialectError::AttributeCountMismatch {
            type_name: type_name.to_string(),
            expected: fields.len(),
            found: values.len(),
        });
    }
    fields
        .iter()
        .zip(values)
        .try_for_each(|(field, value)| field.check(value))
}
