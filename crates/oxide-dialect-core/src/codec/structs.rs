//! Struct/object values with physical attribute reordering.
//!
//! Callers work with attributes in declared (logical) order. Some
//! databases store a structured type's attributes in a different physical
//! order; the codec applies the schema's order mapping on both encode and
//! decode so values always land on the attribute they belong to.

use super::literal::split_list;
use super::{check_values, Field, Value};
use crate::dialect::StructLiteralStyle;
use crate::error::{DialectError, Result};

const FORMAT: &str = "record";

/// Declared attributes of a structured type and their physical order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructSchema {
    type_name: String,
    attributes: Vec<Field>,
    /// `physical[i]` is the logical index stored at physical position `i`.
    physical: Vec<usize>,
}

impl StructSchema {
    /// A schema whose physical order equals the declared order.
    #[must_use]
    pub fn new(type_name: impl Into<String>, attributes: Vec<Field>) -> Self {
        let physical = (0..attributes.len()).collect();
        Self {
            type_name: type_name.into(),
            attributes,
            physical,
        }
    }

    /// Sets the physical order: `order[i]` is the logical index of the
    /// attribute stored at physical position `i`.
    ///
    /// # Errors
    ///
    /// Returns [`DialectError::InvalidOrderMapping`] unless `order` is a
    /// permutation of the attribute indexes.
    pub fn with_physical_order(mut self, order: Vec<usize>) -> Result<Self> {
        let invalid = |message: String| DialectError::InvalidOrderMapping {
            type_name: self.type_name.clone(),
            message,
        };
        if order.len() != self.attributes.len() {
            return Err(invalid(format!(
                "{} positions for {} attributes",
                order.len(),
                self.attributes.len()
            )));
        }
        let mut seen = vec![false; order.len()];
        for &index in &order {
            match seen.get_mut(index) {
                Some(slot) if !*slot => *slot = true,
                Some(_) => return Err(invalid(format!("attribute {index} mapped twice"))),
                None => return Err(invalid(format!("attribute {index} does not exist"))),
            }
        }
        self.physical = order;
        Ok(self)
    }

    /// The type name.
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Attributes in declared order.
    #[must_use]
    pub fn attributes(&self) -> &[Field] {
        &self.attributes
    }

    /// Reorders logical values into physical order.
    fn to_physical(&self, logical: &[Value]) -> Vec<Value> {
        self.physical.iter().map(|&index| logical[index].clone()).collect()
    }

    /// Reorders physical values into logical order.
    fn to_logical(&self, physical: Vec<Value>) -> Vec<Value> {
        let mut logical = vec![Value::Null; physical.len()];
        for (position, value) in physical.into_iter().enumerate() {
            logical[self.physical[position]] = value;
        }
        logical
    }
}

/// Encodes and decodes struct values in a dialect's literal syntax.
///
/// ```rust
/// use oxide_dialect_core::codec::{Field, Kind, StructCodec, StructSchema, Value};
/// use oxide_dialect_core::dialect::StructLiteralStyle;
///
/// let schema = StructSchema::new(
///     "address_t",
///     vec![Field::new("street", Kind::Text), Field::new("number", Kind::Integer)],
/// )
/// .with_physical_order(vec![1, 0])
/// .unwrap();
/// let codec = StructCodec::new(StructLiteralStyle::Record, schema);
///
/// let values = vec![Value::Text("Main St".into()), Value::Integer(12)];
/// assert_eq!(codec.encode(&values).unwrap(), r#"(12,"Main St")"#);
/// assert_eq!(codec.decode(r#"(12,"Main St")"#).unwrap(), values);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructCodec {
    style: StructLiteralStyle,
    schema: StructSchema,
}

impl StructCodec {
    /// Creates a codec.
    #[must_use]
    pub const fn new(style: StructLiteralStyle, schema: StructSchema) -> Self {
        Self { style, schema }
    }

    /// Encodes logical-order values.
    ///
    /// # Errors
    ///
    /// Fails on a count or kind mismatch with the schema, or when the
    /// dialect has no struct syntax.
    pub fn encode(&self, values: &[Value]) -> Result<String> {
        check_values(&self.schema.type_name, &self.schema.attributes, values)?;
        let physical = self.schema.to_physical(values);
        match self.style {
            StructLiteralStyle::Record => {
                let items: Vec<String> = physical.iter().map(record_element).collect();
                Ok(format!("({})", items.join(",")))
            }
            StructLiteralStyle::TypeConstructor => {
                let items: Vec<String> = physical.iter().map(Value::to_sql_literal).collect();
                Ok(format!("{}({})", self.schema.type_name, items.join(", ")))
            }
            StructLiteralStyle::Unsupported => Err(DialectError::FormatMapper(String::from(
                "the dialect has no struct literal syntax",
            ))),
        }
    }

    /// Decodes a literal into logical-order values.
    ///
    /// # Errors
    ///
    /// Fails on malformed syntax, a count mismatch or a value of the wrong
    /// kind.
    pub fn decode(&self, text: &str) -> Result<Vec<Value>> {
        let trimmed = text.trim();
        let base = text.len() - text.trim_start().len();
        let raw = match self.style {
            StructLiteralStyle::Record => {
                let inner = strip(trimmed, "(", base)?;
                record_items(inner, base + 1)?
            }
            StructLiteralStyle::TypeConstructor => {
                let open = format!("{}(", self.schema.type_name);
                let inner = strip(trimmed, &open, base)?;
                split_list(inner, FORMAT, base + open.len())?
                    .into_iter()
                    .map(|token| match token {
                        super::literal::Token::Null => None,
                        super::literal::Token::Bare(text)
                        | super::literal::Token::Quoted(text)
                        | super::literal::Token::Typed(text) => Some(text),
                    })
                    .collect()
            }
            StructLiteralStyle::Unsupported => {
                return Err(DialectError::FormatMapper(String::from(
                    "the dialect has no struct literal syntax",
                )));
            }
        };
        if raw.len() != self.schema.attributes.len() {
            return Err(DialectError::AttributeCountMismatch {
                type_name: self.schema.type_name.clone(),
                expected: self.schema.attributes.len(),
                found: raw.len(),
            });
        }
        let physical = raw
            .into_iter()
            .enumerate()
            .map(|(position, text)| {
                let field = &self.schema.attributes[self.schema.physical[position]];
                let value = match text {
                    None => Value::Null,
                    Some(text) => field.kind.parse_text(&field.name, &text)?,
                };
                field.check(&value)?;
                Ok(value)
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(self.schema.to_logical(physical))
    }
}

fn strip<'a>(text: &'a str, open: &str, base: usize) -> Result<&'a str> {
    if text.len() > open.len() && text.starts_with(open) && text.ends_with(')') {
        Ok(&text[open.len()..text.len() - 1])
    } else {
        Err(DialectError::malformed(FORMAT, base, format!("expected {open}...)")))
    }
}

fn record_element(value: &Value) -> String {
    match value.to_text() {
        None => String::new(),
        Some(text)
            if text.is_empty()
                || text
                    .chars()
                    .any(|c| c.is_whitespace() || matches!(c, ',' | '(' | ')' | '"' | '\\')) =>
        {
            format!("\"{}\"", text.replace('"', "\"\"").replace('\\', "\\\\"))
        }
        Some(text) => text,
    }
}

/// Splits record text. An empty unquoted item is NULL.
fn record_items(inner: &str, base: usize) -> Result<Vec<Option<String>>> {
    let bytes = inner.as_bytes();
    let mut items = Vec::new();
    let mut pos = 0;
    loop {
        if bytes.get(pos) == Some(&b'"') {
            let mut out = String::new();
            pos += 1;
            loop {
                match bytes.get(pos) {
                    Some(b'"') if bytes.get(pos + 1) == Some(&b'"') => {
                        out.push('"');
                        pos += 2;
                    }
                    Some(b'"') => {
                        pos += 1;
                        break;
                    }
                    Some(b'\\') => {
                        let next = inner[pos + 1..].chars().next().ok_or_else(|| {
                            DialectError::malformed(FORMAT, base + pos, "dangling escape")
                        })?;
                        out.push(next);
                        pos += 1 + next.len_utf8();
                    }
                    Some(_) => {
                        let c = inner[pos..].chars().next().unwrap_or_default();
                        out.push(c);
                        pos += c.len_utf8();
                    }
                    None => {
                        return Err(DialectError::malformed(
                            FORMAT,
                            base + pos,
                            "unterminated quoted attribute",
                        ));
                    }
                }
            }
            items.push(Some(out));
        } else {
            let start = pos;
            while pos < bytes.len() && bytes[pos] != b',' {
                pos += 1;
            }
            let text = &inner[start..pos];
            items.push((!text.is_empty()).then(|| text.to_string()));
        }
        match bytes.get(pos) {
            Some(b',') => pos += 1,
            None => return Ok(items),
            Some(_) => {
                return Err(DialectError::malformed(FORMAT, base + pos, "expected ','"));
            }
        }
    }
}
