//! Scanner for comma-separated SQL literal lists such as the argument list
//! of `ARRAY[...]` or a type constructor call.

use super::{Kind, Value};
use crate::error::{DialectError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum Token {
    Null,
    Bare(String),
    Quoted(String),
    Typed(String),
}

impl Token {
    pub(super) fn into_value(self, kind: Kind, attribute: &str) -> Result<Value> {
        match self {
            Self::Null => Ok(Value::Null),
            Self::Quoted(text) if kind == Kind::Text => Ok(Value::Text(text)),
            Self::Bare(text) | Self::Quoted(text) | Self::Typed(text) => {
                kind.parse_text(attribute, &text)
            }
        }
    }
}

struct Scanner<'a> {
    input: &'a str,
    bytes: &'a [u8],
    pos: usize,
    format: &'static str,
    base: usize,
}

impl<'a> Scanner<'a> {
    fn error(&self, message: impl Into<String>) -> DialectError {
        DialectError::malformed(self.format, self.base + self.pos, message)
    }

    fn skip_whitespace(&mut self) {
        while self.pos < self.bytes.len() && self.bytes[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
    }

    fn quoted(&mut self) -> Result<String> {
        let mut out = String::new();
        self.pos += 1;
        let mut start = self.pos;
        while self.pos < self.bytes.len() {
            if self.bytes[self.pos] == b'\'' {
                out.push_str(&self.input[start..self.pos]);
                if self.bytes.get(self.pos + 1) == Some(&b'\'') {
                    out.push('\'');
                    self.pos += 2;
                    start = self.pos;
                    continue;
                }
                self.pos += 1;
                return Ok(out);
            }
            self.pos += 1;
        }
        Err(self.error("unterminated string literal"))
    }

    fn word(&mut self) -> &'a str {
        let start = self.pos;
        while self.pos < self.bytes.len()
            && (self.bytes[self.pos].is_ascii_alphanumeric()
                || matches!(self.bytes[self.pos], b'-' | b'+' | b'.' | b'_' | b':'))
        {
            self.pos += 1;
        }
        &self.input[start..self.pos]
    }

    fn token(&mut self) -> Result<Token> {
        match self.bytes.get(self.pos) {
            Some(b'\'') => self.quoted().map(Token::Quoted),
            Some(_) => {
                let word = self.word();
                if word.is_empty() {
                    return Err(self.error("expected a literal"));
                }
                if word.eq_ignore_ascii_case("null") {
                    return Ok(Token::Null);
                }
                if ["date", "time", "timestamp"]
                    .iter()
                    .any(|keyword| word.eq_ignore_ascii_case(keyword))
                {
                    self.skip_whitespace();
                    if self.bytes.get(self.pos) == Some(&b'\'') {
                        return self.quoted().map(Token::Typed);
                    }
                }
                Ok(Token::Bare(word.to_string()))
            }
            None => Err(self.error("unexpected end of input")),
        }
    }
}

/// Splits `input` into literal tokens. `base` is the offset of `input`
/// inside the whole payload, for error positions.
pub(super) fn split_list(input: &str, format: &'static str, base: usize) -> Result<Vec<Token>> {
    let mut scanner = Scanner {
        input,
        bytes: input.as_bytes(),
        pos: 0,
        format,
        base,
    };
    let mut tokens = Vec::new();
    scanner.skip_whitespace();
    if scanner.pos == scanner.bytes.len() {
        return Ok(tokens);
    }
    loop {
        scanner.skip_whitespace();
        tokens.push(scanner.token()?);
        scanner.skip_whitespace();
        match scanner.bytes.get(scanner.pos) {
            Some(b',') => scanner.pos += 1,
            None => return Ok(tokens),
            Some(_) => return Err(scanner.error("expected ',' between literals")),
        }
    }
}
