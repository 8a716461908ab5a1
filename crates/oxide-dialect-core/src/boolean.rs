//! Boolean representations and conversions between them.
//!
//! Databases without a boolean type store truth values as integers or
//! one-character codes. [`BooleanDecoder`] yields a SQL pattern converting
//! between any two representations, with `?1` standing for the operand.

use serde::{Deserialize, Serialize};

/// A way of storing truth values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BooleanRepr {
    /// Native boolean.
    Boolean,
    /// The strings `'true'` and `'false'`.
    String,
    /// `'Y'` and `'N'`.
    YesNo,
    /// `'T'` and `'F'`.
    TrueFalse,
    /// Any integer; zero is false.
    Integer,
    /// The integers `1` and `0` used as a boolean synonym.
    IntegerBoolean,
}

impl BooleanRepr {
    /// Every representation.
    pub const ALL: [Self; 6] = [
        Self::Boolean,
        Self::String,
        Self::YesNo,
        Self::TrueFalse,
        Self::Integer,
        Self::IntegerBoolean,
    ];

    /// Returns the literal for a truth value.
    #[must_use]
    pub const fn literal(&self, value: bool) -> &'static str {
        match (self, value) {
            (Self::Boolean, true) => "TRUE",
            (Self::Boolean, false) => "FALSE",
            (Self::String, true) => "'true'",
            (Self::String, false) => "'false'",
            (Self::YesNo, true) => "'Y'",
            (Self::YesNo, false) => "'N'",
            (Self::TrueFalse, true) => "'T'",
            (Self::TrueFalse, false) => "'F'",
            (Self::Integer | Self::IntegerBoolean, true) => "1",
            (Self::Integer | Self::IntegerBoolean, false) => "0",
        }
    }
}

/// Result of asking for a conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conversion {
    /// A pattern with a single `?1` operand slot.
    Expression(&'static str),
    /// The operand can be used as is.
    NotApplicable,
}

impl Conversion {
    /// Returns the text before and after the operand slot.
    #[must_use]
    pub fn split(&self) -> Option<(&'static str, &'static str)> {
        match self {
            Self::Expression(pattern) => pattern.split_once("?1"),
            Self::NotApplicable => None,
        }
    }

    /// Substitutes the operand.
    #[must_use]
    pub fn render(&self, operand: &str) -> String {
        match self.split() {
            Some((before, after)) => format!("{before}{operand}{after}"),
            None => operand.to_string(),
        }
    }
}

/// Converts between boolean representations.
pub struct BooleanDecoder;

impl BooleanDecoder {
    /// Returns the conversion from `from` to `to`.
    #[must_use]
    pub const fn convert(from: BooleanRepr, to: BooleanRepr) -> Conversion {
        use BooleanRepr::{Boolean, Integer, IntegerBoolean, String, TrueFalse, YesNo};

        let pattern = match (from, to) {
            (Integer | IntegerBoolean, Boolean) => "(?1<>0)",
            (YesNo, Boolean) => "(?1<>'N')",
            (TrueFalse, Boolean) => "(?1<>'F')",
            (String, Boolean) => "CASE lower(?1) WHEN 'true' THEN TRUE WHEN 'false' THEN FALSE END",

            (Boolean, Integer | IntegerBoolean) => "CASE ?1 WHEN TRUE THEN 1 WHEN FALSE THEN 0 END",
            (YesNo, Integer | IntegerBoolean) => "CASE ?1 WHEN 'Y' THEN 1 WHEN 'N' THEN 0 END",
            (TrueFalse, Integer | IntegerBoolean) => "CASE ?1 WHEN 'T' THEN 1 WHEN 'F' THEN 0 END",
            (String, Integer | IntegerBoolean) => {
                "CASE lower(?1) WHEN 'true' THEN 1 WHEN 'false' THEN 0 END"
            }
            (Integer, IntegerBoolean) => "abs(sign(?1))",

            (Integer, YesNo) => "CASE abs(sign(?1)) WHEN 1 THEN 'Y' WHEN 0 THEN 'N' END",
            (IntegerBoolean, YesNo) => "CASE ?1 WHEN 1 THEN 'Y' WHEN 0 THEN 'N' END",
            (Boolean, YesNo) => "CASE ?1 WHEN TRUE THEN 'Y' WHEN FALSE THEN 'N' END",
            (TrueFalse, YesNo) => "CASE ?1 WHEN 'T' THEN 'Y' WHEN 'F' THEN 'N' END",
            (String, YesNo) => "CASE lower(?1) WHEN 'true' THEN 'Y' WHEN 'false' THEN 'N' END",

            (Integer, TrueFalse) => "CASE abs(sign(?1)) WHEN 1 THEN 'T' WHEN 0 THEN 'F' END",
            (IntegerBoolean, TrueFalse) => "CASE ?1 WHEN 1 THEN 'T' WHEN 0 THEN 'F' END",
            (Boolean, TrueFalse) => "CASE ?1 WHEN TRUE THEN 'T' WHEN FALSE THEN 'F' END",
            (YesNo, TrueFalse) => "CASE ?1 WHEN 'Y' THEN 'T' WHEN 'N' THEN 'F' END",
            (String, TrueFalse) => "CASE lower(?1) WHEN 'true' THEN 'T' WHEN 'false' THEN 'F' END",

            (Integer, String) => "CASE abs(sign(?1)) WHEN 1 THEN 'true' WHEN 0 THEN 'false' END",
            (IntegerBoolean, String) => "CASE ?1 WHEN 1 THEN 'true' WHEN 0 THEN 'false' END",
            (Boolean, String) => "CASE ?1 WHEN TRUE THEN 'true' WHEN FALSE THEN 'false' END",
            (YesNo, String) => "CASE ?1 WHEN 'Y' THEN 'true' WHEN 'N' THEN 'false' END",
            (TrueFalse, String) => "CASE ?1 WHEN 'T' THEN 'true' WHEN 'F' THEN 'false' END",

            // Same representation, or a 0/1 value read as a plain integer.
            (Boolean, Boolean)
            | (String, String)
            | (YesNo, YesNo)
            | (TrueFalse, TrueFalse)
            | (Integer, Integer)
            | (IntegerBoolean, IntegerBoolean | Integer) => return Conversion::NotApplicable,
        };
        Conversion::Expression(pattern)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_pair_is_total() {
        for from in BooleanRepr::ALL {
            for to in BooleanRepr::ALL {
                match BooleanDecoder::convert(from, to) {
                    Conversion::Expression(pattern) => {
                        assert_ne!(from, to);
                        assert_eq!(pattern.matches("?1").count(), 1, "{from:?} -> {to:?}");
                        assert!(!pattern.trim().is_empty());
                    }
                    Conversion::NotApplicable => {
                        assert!(
                            from == to
                                || (from == BooleanRepr::IntegerBoolean
                                    && to == BooleanRepr::Integer)
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_render() {
        let conversion = BooleanDecoder::convert(BooleanRepr::YesNo, BooleanRepr::Boolean);
        assert_eq!(conversion.render("t.active"), "(t.active<>'N')");
        assert_eq!(
            BooleanDecoder::convert(BooleanRepr::Boolean, BooleanRepr::Boolean).render("x"),
            "x"
        );
    }

    #[test]
    fn test_literals() {
        assert_eq!(BooleanRepr::Boolean.literal(true), "TRUE");
        assert_eq!(BooleanRepr::IntegerBoolean.literal(false), "0");
        assert_eq!(BooleanRepr::YesNo.literal(true), "'Y'");
    }
}
