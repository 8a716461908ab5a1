//! Homogeneous array and nested-table literals.

use super::literal::split_list;
use super::{Field, Kind, Value};
use crate::dialect::ArrayLiteralStyle;
use crate::error::{DialectError, Result};

const FORMAT: &str = "array";

/// Encodes and decodes arrays of a single element kind.
///
/// ```rust
/// use oxide_dialect_core::codec::{ArrayCodec, Kind, Value};
/// use oxide_dialect_core::dialect::ArrayLiteralStyle;
///
/// let codec = ArrayCodec::new(ArrayLiteralStyle::Braces, Kind::Text);
/// let values = vec![Value::Text("a b".into()), Value::Null];
/// assert_eq!(codec.encode(&values).unwrap(), r#"{"a b",NULL}"#);
/// assert_eq!(codec.decode(r#"{"a b",NULL}"#).unwrap(), values);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayCodec {
    style: ArrayLiteralStyle,
    element: Kind,
    type_name: String,
}

impl ArrayCodec {
    /// Creates a codec for a dialect array syntax.
    #[must_use]
    pub fn new(style: ArrayLiteralStyle, element: Kind) -> Self {
        Self {
            style,
            element,
            type_name: String::new(),
        }
    }

    /// Names the collection type, for type-constructor syntax.
    #[must_use]
    pub fn named(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = type_name.into();
        self
    }

    fn element_field(&self, index: usize) -> Field {
        Field::new(format!("[{index}]"), self.element)
    }

    /// Encodes elements into the array literal.
    ///
    /// # Errors
    ///
    /// Fails when an element has the wrong kind or the dialect has no
    /// array syntax.
    pub fn encode(&self, values: &[Value]) -> Result<String> {
        for (index, value) in values.iter().enumerate() {
            self.element_field(index).check(value)?;
        }
        match self.style {
            ArrayLiteralStyle::Braces => {
                let items: Vec<String> = values.iter().map(brace_element).collect();
                Ok(format!("{{{}}}", items.join(",")))
            }
            ArrayLiteralStyle::ArrayConstructor => {
                let items: Vec<String> = values.iter().map(Value::to_sql_literal).collect();
                Ok(format!("ARRAY[{}]", items.join(", ")))
            }
            ArrayLiteralStyle::TypeConstructor => {
                let items: Vec<String> = values.iter().map(Value::to_sql_literal).collect();
                Ok(format!("{}({})", self.type_name, items.join(", ")))
            }
            ArrayLiteralStyle::Unsupported => Err(DialectError::FormatMapper(String::from(
                "the dialect has no array literal syntax",
            ))),
        }
    }

    /// Decodes an array literal.
    ///
    /// # Errors
    ///
    /// Fails on malformed syntax or elements of the wrong kind.
    pub fn decode(&self, text: &str) -> Result<Vec<Value>> {
        let trimmed = text.trim();
        let base = text.len() - text.trim_start().len();
        match self.style {
            ArrayLiteralStyle::Braces => self.decode_braces(trimmed, base),
            ArrayLiteralStyle::ArrayConstructor => {
                let inner = strip_wrapper(trimmed, "ARRAY[", "]", base)?;
                self.convert(split_list(inner, FORMAT, base + 6)?)
            }
            ArrayLiteralStyle::TypeConstructor => {
                let open = format!("{}(", self.type_name);
                let inner = strip_wrapper(trimmed, &open, ")", base)?;
                self.convert(split_list(inner, FORMAT, base + open.len())?)
            }
            ArrayLiteralStyle::Unsupported => Err(DialectError::FormatMapper(String::from(
                "the dialect has no array literal syntax",
            ))),
        }
    }

    fn convert(&self, tokens: Vec<super::literal::Token>) -> Result<Vec<Value>> {
        tokens
            .into_iter()
            .enumerate()
            .map(|(index, token)| token.into_value(self.element, &format!("[{index}]")))
            .collect()
    }

    fn decode_braces(&self, text: &str, base: usize) -> Result<Vec<Value>> {
        let inner = strip_wrapper(text, "{", "}", base)?;
        let bytes = inner.as_bytes();
        let mut values = Vec::new();
        if inner.trim().is_empty() {
            return Ok(values);
        }
        let mut pos = 0;
        loop {
            let (element, quoted, next) = brace_item(inner, pos, base + 1)?;
            let attribute = format!("[{}]", values.len());
            values.push(if !quoted && element.eq_ignore_ascii_case("null") {
                Value::Null
            } else {
                self.element.parse_text(&attribute, &element)?
            });
            pos = next;
            match bytes.get(pos) {
                Some(b',') => pos += 1,
                None => return Ok(values),
                Some(_) => {
                    return Err(DialectError::malformed(FORMAT, base + 1 + pos, "expected ','"));
                }
            }
        }
    }
}

fn strip_wrapper<'a>(text: &'a str, open: &str, close: &str, base: usize) -> Result<&'a str> {
    let starts = text
        .get(..open.len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(open));
    if !starts || !text.ends_with(close) || text.len() < open.len() + close.len() {
        return Err(DialectError::malformed(
            FORMAT,
            base,
            format!("expected {open}...{close}"),
        ));
    }
    Ok(&text[open.len()..text.len() - close.len()])
}

fn needs_quotes(text: &str) -> bool {
    text.is_empty()
        || text.eq_ignore_ascii_case("null")
        || text
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, ',' | '{' | '}' | '"' | '\\'))
}

fn brace_element(value: &Value) -> String {
    match value.to_text() {
        None => String::from("NULL"),
        Some(text) if needs_quotes(&text) => {
            format!("\"{}\"", text.replace('\\', "\\\\").replace('"', "\\\""))
        }
        Some(text) => text,
    }
}

/// Reads one element starting at `pos`; returns the text, whether it was
/// quoted and the offset after it.
fn brace_item(inner: &str, mut pos: usize, base: usize) -> Result<(String, bool, usize)> {
    let bytes = inner.as_bytes();
    if bytes.get(pos) == Some(&b'"') {
        let mut out = String::new();
        pos += 1;
        let mut start = pos;
        while pos < bytes.len() {
            match bytes[pos] {
                b'\\' => {
                    out.push_str(&inner[start..pos]);
                    start = pos + 1;
                    pos += 2;
                }
                b'"' => {
                    out.push_str(&inner[start..pos]);
                    return Ok((out, true, pos + 1));
                }
                _ => pos += 1,
            }
        }
        return Err(DialectError::malformed(FORMAT, base + pos, "unterminated quoted element"));
    }
    let start = pos;
    while pos < bytes.len() && bytes[pos] != b',' {
        pos += 1;
    }
    Ok((inner[start..pos].trim().to_string(), false, pos))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts() -> Vec<Value> {
        vec![
            Value::Text(String::from("plain")),
            Value::Text(String::from("with \"quote\" and \\")),
            Value::Text(String::new()),
            Value::Text(String::from("NULL")),
            Value::Null,
        ]
    }

    #[test]
    fn test_braces_quoting() {
        let codec = ArrayCodec::new(ArrayLiteralStyle::Braces, Kind::Text);
        let encoded = codec.encode(&texts()).unwrap();
        assert_eq!(
            encoded,
            r#"{plain,"with \"quote\" and \\","","NULL",NULL}"#
        );
        assert_eq!(codec.decode(&encoded).unwrap(), texts());
    }

    #[test]
    fn test_constructor_styles() {
        let values = vec![Value::Integer(1), Value::Null, Value::Integer(-2)];
        let array = ArrayCodec::new(ArrayLiteralStyle::ArrayConstructor, Kind::Integer);
        assert_eq!(array.encode(&values).unwrap(), "ARRAY[1, NULL, -2]");
        assert_eq!(array.decode("ARRAY[1, NULL, -2]").unwrap(), values);

        let table = ArrayCodec::new(ArrayLiteralStyle::TypeConstructor, Kind::Integer).named("int_list");
        assert_eq!(table.encode(&values).unwrap(), "int_list(1, NULL, -2)");
        assert_eq!(table.decode("int_list(1, NULL, -2)").unwrap(), values);
    }

    #[test]
    fn test_wrong_element_kind() {
        let codec = ArrayCodec::new(ArrayLiteralStyle::Braces, Kind::Integer);
        assert!(matches!(
            codec.encode(&[Value::Text(String::from("x"))]),
            Err(DialectError::AttributeTypeMismatch { .. })
        ));
        assert!(codec.decode("{1,x}").is_err());
        assert!(codec.decode("1,2").is_err());
    }

    #[test]
    fn test_empty_arrays() {
        let codec = ArrayCodec::new(ArrayLiteralStyle::Braces, Kind::Integer);
        assert_eq!(codec.encode(&[]).unwrap(), "{}");
        assert!(codec.decode("{}").unwrap().is_empty());
    }

    #[test]
    fn test_multibyte_prefix_is_malformed() {
        let codec = ArrayCodec::new(ArrayLiteralStyle::ArrayConstructor, Kind::Text);
        assert!(matches!(
            codec.decode("a\u{e9}\u{e9}\u{e9}\u{e9}]"),
            Err(DialectError::MalformedPayload { .. })
        ));
        let codec =
            ArrayCodec::new(ArrayLiteralStyle::TypeConstructor, Kind::Integer).named("num_list");
        assert!(matches!(
            codec.decode("nu\u{e9}\u{e9}\u{e9}\u{e9}\u{e9}\u{e9})"),
            Err(DialectError::MalformedPayload { .. })
        ));
        let codec = ArrayCodec::new(ArrayLiteralStyle::Braces, Kind::Text);
        assert!(codec.decode("\u{e9}}").is_err());
    }
}
