//! Bound parameter values.
//!
//! Statements carry their parameters inline as [`SqlValue`]s; the
//! translator replaces each one with a `?` marker and collects the values
//! in marker order.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};

/// A value bound to a `?` marker.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Bool(bool),
    Int(i64),
    /// Double precision.
    Float(f64),
    Text(String),
    Blob(Vec<u8>),
    /// Calendar date.
    Date(NaiveDate),
    /// Time of day.
    Time(NaiveTime),
    /// Timestamp without zone.
    Timestamp(NaiveDateTime),
    /// Timestamp with a fixed offset.
    TimestampTz(DateTime<FixedOffset>),
    /// A serialized JSON document, bound through the dialect's JSON
    /// marker.
    Json(String),
}

impl SqlValue {
    /// Renders the value as an escaped literal.
    ///
    /// Only limit values on dialects that cannot bind them are inlined;
    /// everything else travels as a parameter.
    #[must_use]
    pub fn to_sql_inline(&self) -> String {
        match self {
            Self::Null => String::from("NULL"),
            Self::Bool(b) => String::from(if *b { "TRUE" } else { "FALSE" }),
            Self::Int(n) => format!("{n}"),
            Self::Float(f) => format!("{f}"),
            Self::Text(s) | Self::Json(s) => quote(s),
            Self::Blob(b) => {
                let hex: String = b.iter().map(|byte| format!("{byte:02X}")).collect();
                format!("X'{hex}'")
            }
            Self::Date(d) => format!("DATE '{}'", d.format("%Y-%m-%d")),
            Self::Time(t) => format!("TIME '{}'", t.format("%H:%M:%S%.f")),
            Self::Timestamp(ts) => format!("TIMESTAMP '{}'", ts.format("%Y-%m-%d %H:%M:%S%.f")),
            Self::TimestampTz(ts) => {
                format!("TIMESTAMP '{}'", ts.format("%Y-%m-%d %H:%M:%S%.f %:z"))
            }
        }
    }

    /// Returns the integer when this is one.
    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns true for the NULL value.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Short type name used in error messages.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Int(_) => "integer",
            Self::Float(_) => "float",
            Self::Text(_) => "text",
            Self::Blob(_) => "blob",
            Self::Date(_) => "date",
            Self::Time(_) => "time",
            Self::Timestamp(_) => "timestamp",
            Self::TimestampTz(_) => "timestamp with time zone",
            Self::Json(_) => "json",
        }
    }
}

fn quote(s: &str) -> String {
    // Single quotes are escaped by doubling them
    format!("'{}'", s.replace('\'', "''"))
}

/// Rust values that can be bound as statement parameters.
pub trait ToSqlValue {
    /// Wraps `self` in the matching [`SqlValue`] variant.
    fn to_sql_value(self) -> SqlValue;
}

impl ToSqlValue for SqlValue {
    fn to_sql_value(self) -> SqlValue {
        self
    }
}

macro_rules! scalar_values {
    (@impl $ty:ty, $variant:ident) => {
        impl ToSqlValue for $ty {
            fn to_sql_value(self) -> SqlValue {
                SqlValue::$variant(self)
            }
        }
    };
    (@impl $ty:ty, $variant:ident, $conv:path) => {
        impl ToSqlValue for $ty {
            fn to_sql_value(self) -> SqlValue {
                SqlValue::$variant($conv(self))
            }
        }
    };
    ($($ty:ty => $variant:ident $(via $conv:path)?;)+) => {
        $(scalar_values!(@impl $ty, $variant $(, $conv)?);)+
    };
}

scalar_values! {
    bool => Bool;
    i64 => Int;
    i32 => Int via i64::from;
    u32 => Int via i64::from;
    f64 => Float;
    String => Text;
    &str => Text via String::from;
    Vec<u8> => Blob;
    NaiveDate => Date;
    NaiveTime => Time;
    NaiveDateTime => Timestamp;
    DateTime<FixedOffset> => TimestampTz;
}

impl ToSqlValue for serde_json::Value {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Json(self.to_string())
    }
}

impl<T: ToSqlValue> ToSqlValue for Option<T> {
    fn to_sql_value(self) -> SqlValue {
        match self {
            Some(v) => v.to_sql_value(),
            None => SqlValue::Null,
        }
    }
}
