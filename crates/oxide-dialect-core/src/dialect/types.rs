//! Abstract column type codes and per-dialect DDL type mappings.

use core::fmt;
use core::str::FromStr;

use crate::error::DialectError;

macro_rules! type_codes {
    ($($(#[$doc:meta])* $variant:ident => $name:literal,)+) => {
        /// Database-agnostic column type code.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum TypeCode {
            $($(#[$doc])* $variant,)+
        }

        impl TypeCode {
            /// Every type code, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant,)+];

            /// Returns the code name.
            #[must_use]
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $name,)+
                }
            }
        }

        impl FromStr for TypeCode {
            type Err = DialectError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($name => Ok(Self::$variant),)+
                    _ => Err(DialectError::Config(format!("unknown type code '{s}'"))),
                }
            }
        }
    };
}

type_codes! {
    /// Boolean.
    Boolean => "boolean",
    /// 1-byte integer.
    TinyInt => "tinyint",
    /// 2-byte integer.
    SmallInt => "smallint",
    /// 4-byte integer.
    Integer => "integer",
    /// 8-byte integer.
    BigInt => "bigint",
    /// 4-byte float.
    Real => "real",
    /// Float with binary precision `$p`.
    Float => "float",
    /// 8-byte float.
    Double => "double",
    /// Exact numeric `($p, $s)`.
    Numeric => "numeric",
    /// Exact decimal `($p, $s)`.
    Decimal => "decimal",
    /// Fixed-length character string.
    Char => "char",
    /// Variable-length character string.
    Varchar => "varchar",
    /// Long character string.
    LongVarchar => "longvarchar",
    /// Character large object.
    Clob => "clob",
    /// Fixed-length national character string.
    NChar => "nchar",
    /// Variable-length national character string.
    NVarchar => "nvarchar",
    /// National character large object.
    NClob => "nclob",
    /// Fixed-length binary.
    Binary => "binary",
    /// Variable-length binary.
    Varbinary => "varbinary",
    /// Long binary.
    LongVarbinary => "longvarbinary",
    /// Binary large object.
    Blob => "blob",
    /// Date.
    Date => "date",
    /// Time of day.
    Time => "time",
    /// Timestamp without zone.
    Timestamp => "timestamp",
    /// Timestamp with zone offset.
    TimestampWithTimeZone => "timestamp_with_timezone",
    /// UUID.
    Uuid => "uuid",
    /// JSON document.
    Json => "json",
    /// Array of a single element type.
    Array => "array",
    /// Nested table of a single element type.
    Table => "table",
    /// Struct/object type.
    Struct => "struct",
}

impl TypeCode {
    /// Returns true for composite codes that need a named or element type.
    #[must_use]
    pub const fn is_composite(&self) -> bool {
        matches!(self, Self::Array | Self::Table | Self::Struct)
    }

    /// Returns the plain counterpart of a national character code.
    #[must_use]
    pub const fn denationalized(&self) -> Self {
        match self {
            Self::NChar => Self::Char,
            Self::NVarchar => Self::Varchar,
            Self::NClob => Self::Clob,
            other => *other,
        }
    }

    /// Returns true for national character codes.
    #[must_use]
    pub const fn is_nationalized(&self) -> bool {
        matches!(self, Self::NChar | Self::NVarchar | Self::NClob)
    }

    /// Precision used for `$p` when the caller gives none: fractional
    /// seconds for temporal codes, binary digits for `float`.
    #[must_use]
    pub const fn default_precision(&self) -> u32 {
        match self {
            Self::Time | Self::Timestamp | Self::TimestampWithTimeZone => 6,
            Self::Float => 53,
            _ => DEFAULT_PRECISION,
        }
    }
}

impl fmt::Display for TypeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Default length used when a template needs `$l` and none was given.
pub const DEFAULT_LENGTH: u32 = 255;
/// Default precision used when a template needs `$p` and none was given.
pub const DEFAULT_PRECISION: u32 = 19;
/// Default scale used when a template needs `$s` and none was given.
pub const DEFAULT_SCALE: u32 = 2;

/// Type code to DDL template table.
///
/// Templates may contain `$l` (length), `$p` (precision) and `$s` (scale).
/// A missing entry means the type is not available on the dialect.
#[derive(Clone, PartialEq, Eq)]
pub struct TypeMappings {
    entries: Vec<Option<&'static str>>,
}

impl TypeMappings {
    /// Mappings shared by most dialects.
    #[must_use]
    pub fn standard() -> Self {
        Self::empty()
            .with(TypeCode::Boolean, "boolean")
            .with(TypeCode::TinyInt, "smallint")
            .with(TypeCode::SmallInt, "smallint")
            .with(TypeCode::Integer, "integer")
            .with(TypeCode::BigInt, "bigint")
            .with(TypeCode::Real, "real")
            .with(TypeCode::Float, "float($p)")
            .with(TypeCode::Double, "double precision")
            .with(TypeCode::Numeric, "numeric($p,$s)")
            .with(TypeCode::Decimal, "decimal($p,$s)")
            .with(TypeCode::Char, "char($l)")
            .with(TypeCode::Varchar, "varchar($l)")
            .with(TypeCode::LongVarchar, "varchar($l)")
            .with(TypeCode::Clob, "clob")
            .with(TypeCode::NChar, "nchar($l)")
            .with(TypeCode::NVarchar, "nvarchar($l)")
            .with(TypeCode::NClob, "nclob")
            .with(TypeCode::Binary, "binary($l)")
            .with(TypeCode::Varbinary, "varbinary($l)")
            .with(TypeCode::LongVarbinary, "varbinary($l)")
            .with(TypeCode::Blob, "blob")
            .with(TypeCode::Date, "date")
            .with(TypeCode::Time, "time")
            .with(TypeCode::Timestamp, "timestamp($p)")
            .with(TypeCode::TimestampWithTimeZone, "timestamp($p) with time zone")
    }

    /// A table with no entries.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            entries: vec![None; TypeCode::ALL.len()],
        }
    }

    /// Returns a copy with `code` mapped to `template`.
    #[must_use]
    pub fn with(mut self, code: TypeCode, template: &'static str) -> Self {
        self.set(code, Some(template));
        self
    }

    /// Returns a copy with `code` unmapped.
    #[must_use]
    pub fn without(mut self, code: TypeCode) -> Self {
        self.set(code, None);
        self
    }

    /// Sets or clears the template for `code`.
    pub fn set(&mut self, code: TypeCode, template: Option<&'static str>) {
        self.entries[code as usize] = template;
    }

    /// Returns the raw template for `code`.
    #[must_use]
    pub fn template(&self, code: TypeCode) -> Option<&'static str> {
        self.entries[code as usize]
    }

    /// Iterates over the mapped codes.
    pub fn iter(&self) -> impl Iterator<Item = (TypeCode, &'static str)> + '_ {
        TypeCode::ALL
            .iter()
            .filter_map(|code| self.template(*code).map(|template| (*code, template)))
    }
}

impl fmt::Debug for TypeMappings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Fills the `$l`, `$p` and `$s` placeholders of a DDL template.
#[must_use]
pub fn expand_template(
    template: &str,
    length: Option<u32>,
    precision: Option<u32>,
    scale: Option<u32>,
) -> String {
    template
        .replace("$l", &length.unwrap_or(DEFAULT_LENGTH).to_string())
        .replace("$p", &precision.unwrap_or(DEFAULT_PRECISION).to_string())
        .replace("$s", &scale.unwrap_or(DEFAULT_SCALE).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_template() {
        assert_eq!(
            expand_template("numeric($p,$s)", None, Some(10), Some(4)),
            "numeric(10,4)"
        );
        assert_eq!(expand_template("varchar($l)", None, None, None), "varchar(255)");
        assert_eq!(expand_template("date", Some(3), None, None), "date");
    }

    #[test]
    fn test_mappings() {
        let mappings = TypeMappings::standard().without(TypeCode::Blob);
        assert_eq!(mappings.template(TypeCode::Varchar), Some("varchar($l)"));
        assert_eq!(mappings.template(TypeCode::Blob), None);
        assert_eq!(mappings.template(TypeCode::Json), None);
    }

    #[test]
    fn test_type_code_names() {
        for code in TypeCode::ALL {
            assert_eq!(code.as_str().parse::<TypeCode>().unwrap(), *code);
        }
        assert_eq!(TypeCode::NVarchar.denationalized(), TypeCode::Varchar);
        assert!(TypeCode::Table.is_composite());
        assert_eq!(TypeCode::Timestamp.default_precision(), 6);
        assert_eq!(TypeCode::Decimal.default_precision(), DEFAULT_PRECISION);
    }
}
