//! Vendor renderings of portable SQL functions.
//!
//! Statements call functions by a portable name (`locate`, `substring`,
//! `length`, `format`, `current_timestamp`). Each dialect maps those names
//! to a [`FunctionTemplate`]: either a plain rename or a pattern whose
//! `?1`..`?9` slots are filled with the rendered arguments. Names without
//! an entry are written exactly as called.

use core::fmt;

/// How one portable function is written on a dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionTemplate {
    /// Same arguments under the vendor's name.
    Named(&'static str),
    /// Argument slots `?1`..`?9`; a slot may repeat or be reordered.
    Pattern(&'static str),
}

/// One piece of a parsed pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternPiece<'a> {
    /// Literal SQL text.
    Text(&'a str),
    /// Zero-based argument index.
    Arg(usize),
}

impl FunctionTemplate {
    /// Splits a pattern into text and argument slots. A `Named` template
    /// has no pieces.
    #[must_use]
    pub fn pieces(&self) -> Vec<PatternPiece<'static>> {
        let Self::Pattern(pattern) = *self else {
            return Vec::new();
        };
        let bytes = pattern.as_bytes();
        let mut pieces = Vec::new();
        let mut start = 0;
        let mut pos = 0;
        while pos < bytes.len() {
            match (bytes[pos], bytes.get(pos + 1).copied()) {
                (b'?', Some(digit @ b'1'..=b'9')) => {
                    if start < pos {
                        pieces.push(PatternPiece::Text(&pattern[start..pos]));
                    }
                    pieces.push(PatternPiece::Arg(usize::from(digit - b'1')));
                    pos += 2;
                    start = pos;
                }
                _ => pos += 1,
            }
        }
        if start < bytes.len() {
            pieces.push(PatternPiece::Text(&pattern[start..]));
        }
        pieces
    }

    /// Highest argument slot the pattern uses, zero for `Named`.
    #[must_use]
    pub fn slots(&self) -> usize {
        self.pieces()
            .iter()
            .filter_map(|piece| match piece {
                PatternPiece::Arg(index) => Some(index + 1),
                PatternPiece::Text(_) => None,
            })
            .max()
            .unwrap_or(0)
    }

    /// Renders already translated arguments. Returns `None` when the
    /// pattern refers to an argument that was not given.
    ///
    /// ```rust
    /// use oxide_dialect_core::dialect::FunctionTemplate;
    ///
    /// let instr = FunctionTemplate::Pattern("instr(?2,?1)");
    /// assert_eq!(instr.render(&["'x'", "name"]).as_deref(), Some("instr(name,'x')"));
    /// assert_eq!(instr.render(&["'x'"]), None);
    /// ```
    #[must_use]
    pub fn render(&self, args: &[&str]) -> Option<String> {
        match self {
            Self::Named(vendor) => Some(format!("{vendor}({})", args.join(", "))),
            Self::Pattern(_) => {
                let mut out = String::new();
                for piece in self.pieces() {
                    match piece {
                        PatternPiece::Text(text) => out.push_str(text),
                        PatternPiece::Arg(index) => out.push_str(args.get(index)?),
                    }
                }
                Some(out)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Entry {
    name: &'static str,
    /// `None` matches any argument count.
    arity: Option<usize>,
    template: FunctionTemplate,
}

/// Portable function name to template table.
///
/// Later registrations override earlier ones for the same name and arity,
/// so version patches can replace what the base configuration set.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct FunctionTemplates {
    entries: Vec<Entry>,
}

impl FunctionTemplates {
    /// ANSI spellings shared by most dialects.
    #[must_use]
    pub fn standard() -> Self {
        Self::default()
            .with("locate", 2, FunctionTemplate::Pattern("position(?1 in ?2)"))
            .with("substring", 2, FunctionTemplate::Pattern("substring(?1 from ?2)"))
            .with(
                "substring",
                3,
                FunctionTemplate::Pattern("substring(?1 from ?2 for ?3)"),
            )
            .with("length", 1, FunctionTemplate::Named("character_length"))
            .with("current_timestamp", 0, FunctionTemplate::Pattern("current_timestamp"))
    }

    /// Returns a copy with `name` called with `arity` arguments mapped to
    /// `template`.
    #[must_use]
    pub fn with(mut self, name: &'static str, arity: usize, template: FunctionTemplate) -> Self {
        self.set(name, Some(arity), template);
        self
    }

    /// Returns a copy with `name` renamed for every argument count.
    /// Arity-specific entries for the name are dropped.
    #[must_use]
    pub fn renamed(mut self, name: &'static str, vendor: &'static str) -> Self {
        self.entries.retain(|entry| !entry.name.eq_ignore_ascii_case(name));
        self.set(name, None, FunctionTemplate::Named(vendor));
        self
    }

    /// Sets the template for `name` and `arity`.
    pub fn set(&mut self, name: &'static str, arity: Option<usize>, template: FunctionTemplate) {
        let entry = Entry {
            name,
            arity,
            template,
        };
        match self
            .entries
            .iter_mut()
            .find(|e| e.name.eq_ignore_ascii_case(name) && e.arity == arity)
        {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
    }

    /// Looks up the template for a call. An entry for the exact argument
    /// count wins over one for any count.
    #[must_use]
    pub fn find(&self, name: &str, arity: usize) -> Option<FunctionTemplate> {
        let mut fallback = None;
        for entry in &self.entries {
            if !entry.name.eq_ignore_ascii_case(name) {
                continue;
            }
            match entry.arity {
                Some(n) if n == arity => return Some(entry.template),
                None => fallback = Some(entry.template),
                Some(_) => {}
            }
        }
        fallback
    }
}

impl fmt::Debug for FunctionTemplates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|e| (e.name, e.arity, e.template)))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_pieces() {
        let template = FunctionTemplate::Pattern("substring(?1,?2,len(?1)-?2+1)");
        assert_eq!(template.slots(), 2);
        assert_eq!(
            template.pieces()[..4],
            [
                PatternPiece::Text("substring("),
                PatternPiece::Arg(0),
                PatternPiece::Text(","),
                PatternPiece::Arg(1),
            ]
        );
        assert!(FunctionTemplate::Named("len").pieces().is_empty());
    }

    #[test]
    fn test_bare_question_marks_are_text() {
        let template = FunctionTemplate::Pattern("coalesce(?1, ?)");
        assert_eq!(template.render(&["a"]).as_deref(), Some("coalesce(a, ?)"));
    }

    #[test]
    fn test_exact_arity_wins() {
        let table = FunctionTemplates::standard().renamed("length", "len");
        assert_eq!(table.find("LENGTH", 1), Some(FunctionTemplate::Named("len")));
        assert_eq!(
            table.find("substring", 3),
            Some(FunctionTemplate::Pattern("substring(?1 from ?2 for ?3)"))
        );
        assert_eq!(table.find("substring", 4), None);
        assert_eq!(table.find("upper", 1), None);

        let table = table
            .renamed("locate", "charindex")
            .with("locate", 2, FunctionTemplate::Pattern("charindex(?1,?2,1)"));
        assert_eq!(table.find("locate", 3), Some(FunctionTemplate::Named("charindex")));
        assert_eq!(
            table.find("locate", 2),
            Some(FunctionTemplate::Pattern("charindex(?1,?2,1)"))
        );
    }

    #[test]
    fn test_later_registration_overrides() {
        let mut table = FunctionTemplates::standard();
        table.set("locate", Some(2), FunctionTemplate::Pattern("instr(?2,?1)"));
        assert_eq!(
            table.find("locate", 2),
            Some(FunctionTemplate::Pattern("instr(?2,?1)"))
        );
    }
}
