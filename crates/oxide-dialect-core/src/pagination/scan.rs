//! Top-level word scanning over finished SQL text.
//!
//! Limit handlers rewrite SQL they did not build, so they need to find the
//! main `SELECT`, its `FROM`, the trailing `ORDER BY` and any lock clause
//! without being fooled by subqueries, string literals, quoted identifiers
//! or comments.

/// A bare word found outside any parentheses, quotes or comments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Word<'a> {
    /// Byte offset of the first character.
    pub start: usize,
    /// Byte offset just past the last character.
    pub end: usize,
    /// The word text as written.
    pub text: &'a str,
}

impl Word<'_> {
    /// Case-insensitive keyword comparison.
    #[must_use]
    pub fn is(&self, keyword: &str) -> bool {
        self.text.eq_ignore_ascii_case(keyword)
    }
}

const fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'_' | b'$' | b'@' | b'#')
}

/// Returns the offset just past a quoted section opened at `pos`.
///
/// A doubled closing character is an escaped quote. Unterminated sections
/// run to the end of the input.
fn skip_quoted(bytes: &[u8], pos: usize, close: u8) -> usize {
    let mut i = pos + 1;
    while i < bytes.len() {
        if bytes[i] == close {
            if bytes.get(i + 1) == Some(&close) {
                i += 2;
                continue;
            }
            return i + 1;
        }
        i += 1;
    }
    bytes.len()
}

/// Collects the words at parenthesis depth zero.
#[must_use]
pub fn top_level_words(sql: &str) -> Vec<Word<'_>> {
    let bytes = sql.as_bytes();
    let mut words = Vec::new();
    let mut depth = 0usize;
    let mut pos = 0;

    while pos < bytes.len() {
        match bytes[pos] {
            quote @ (b'\'' | b'"' | b'`') => pos = skip_quoted(bytes, pos, quote),
            b'[' => pos = skip_quoted(bytes, pos, b']'),
            b'-' if bytes.get(pos + 1) == Some(&b'-') => {
                while pos < bytes.len() && bytes[pos] != b'\n' {
                    pos += 1;
                }
            }
            b'/' if bytes.get(pos + 1) == Some(&b'*') => {
                pos += 2;
                while pos < bytes.len() && !(bytes[pos] == b'*' && bytes.get(pos + 1) == Some(&b'/')) {
                    pos += 1;
                }
                pos = (pos + 2).min(bytes.len());
            }
            b'(' => {
                depth += 1;
                pos += 1;
            }
            b')' => {
                depth = depth.saturating_sub(1);
                pos += 1;
            }
            b if is_word_byte(b) => {
                let start = pos;
                while pos < bytes.len() && is_word_byte(bytes[pos]) {
                    pos += 1;
                }
                if depth == 0 {
                    words.push(Word {
                        start,
                        end: pos,
                        text: &sql[start..pos],
                    });
                }
            }
            _ => pos += 1,
        }
    }
    words
}

/// Index of the main `SELECT` in `words`.
fn main_select(words: &[Word<'_>]) -> Option<usize> {
    words.iter().position(|word| word.is("select"))
}

/// Offset just past the main `SELECT` keyword, or past `SELECT DISTINCT`
/// when `after_distinct` is set.
#[must_use]
pub fn select_insert_point(sql: &str, after_distinct: bool) -> Option<usize> {
    let words = top_level_words(sql);
    let select = main_select(&words)?;
    match words.get(select + 1) {
        Some(next) if after_distinct && next.is("distinct") => Some(next.end),
        _ => Some(words[select].end),
    }
}

/// Offset of the `FROM` of the main query.
#[must_use]
pub fn from_position(sql: &str) -> Option<usize> {
    let words = top_level_words(sql);
    let select = main_select(&words)?;
    words[select..]
        .iter()
        .find(|word| word.is("from"))
        .map(|word| word.start)
}

/// Span from the last top-level `ORDER` to the end of its `BY`, after the
/// main `SELECT`.
#[must_use]
pub fn order_by_span(sql: &str) -> Option<(usize, usize)> {
    let words = top_level_words(sql);
    let select = main_select(&words)?;
    words[select..]
        .windows(2)
        .rev()
        .find(|pair| pair[0].is("order") && pair[1].is("by"))
        .map(|pair| (pair[0].start, pair[1].end))
}

/// Offset of the last top-level `ORDER BY` after the main `SELECT`.
#[must_use]
pub fn order_by_position(sql: &str) -> Option<usize> {
    order_by_span(sql).map(|(start, _)| start)
}

/// Offset of a trailing lock clause (`FOR UPDATE`, `FOR SHARE`,
/// `FOR READ ONLY`, `FOR NO KEY UPDATE`, `WITH LOCK`).
#[must_use]
pub fn lock_clause_position(sql: &str) -> Option<usize> {
    let words = top_level_words(sql);
    let select = main_select(&words)?;
    words[select..]
        .windows(2)
        .find(|pair| {
            (pair[0].is("for")
                && ["update", "share", "read", "no", "key"]
                    .iter()
                    .any(|next| pair[1].is(next)))
                || (pair[0].is("with") && pair[1].is("lock"))
        })
        .map(|pair| pair[0].start)
}

/// Offset at which a trailing limit clause goes: before any lock clause,
/// otherwise at the end with trailing whitespace and semicolons trimmed.
#[must_use]
pub fn suffix_insert_point(sql: &str) -> usize {
    lock_clause_position(sql).map_or_else(
        || {
            sql.trim_end_matches(|c: char| c.is_whitespace() || c == ';')
                .len()
        },
        |pos| sql[..pos].trim_end().len(),
    )
}
