//! Google Cloud Spanner.

use super::config::{ArrayLiteralStyle, DialectConfig, Patch};
use super::functions::{FunctionTemplate, FunctionTemplates};
use super::lock::LockConfig;
use super::types::{TypeCode, TypeMappings};
use super::DialectFamily;
use crate::capability::Capability;
use crate::pagination::PaginationStyle;
use crate::strategy::{NationalizationSupport, NullOrdering, TimeZoneSupport};

/// Spanner GoogleSQL.
pub(super) fn base() -> DialectConfig {
    let mut config = DialectConfig::ansi(DialectFamily::Spanner)
        .with(&[
            Capability::OffsetInSubquery,
            Capability::WindowFunctions,
            Capability::Arrays,
            Capability::StructTypes,
            Capability::JsonType,
            Capability::BooleanType,
            Capability::NullsOrderingSyntax,
        ])
        .without(&[Capability::OuterJoinForUpdate]);
    config.identifier_quote = ('`', '`');
    config.types = TypeMappings::empty()
        .with(TypeCode::Boolean, "bool")
        .with(TypeCode::TinyInt, "int64")
        .with(TypeCode::SmallInt, "int64")
        .with(TypeCode::Integer, "int64")
        .with(TypeCode::BigInt, "int64")
        .with(TypeCode::Real, "float64")
        .with(TypeCode::Float, "float64")
        .with(TypeCode::Double, "float64")
        .with(TypeCode::Numeric, "numeric")
        .with(TypeCode::Decimal, "numeric")
        .with(TypeCode::Char, "string($l)")
        .with(TypeCode::Varchar, "string($l)")
        .with(TypeCode::LongVarchar, "string(max)")
        .with(TypeCode::Clob, "string(max)")
        .with(TypeCode::Binary, "bytes($l)")
        .with(TypeCode::Varbinary, "bytes($l)")
        .with(TypeCode::LongVarbinary, "bytes(max)")
        .with(TypeCode::Blob, "bytes(max)")
        .with(TypeCode::Date, "date")
        .with(TypeCode::Timestamp, "timestamp")
        .with(TypeCode::TimestampWithTimeZone, "timestamp")
        .with(TypeCode::Uuid, "string(36)")
        .with(TypeCode::Json, "json");
    config.array_type = Some("array<$e>");
    config.null_ordering = NullOrdering::Smallest;
    config.pagination = PaginationStyle::LimitOffset;
    config.locks = LockConfig {
        for_update: "",
        for_share: "",
        ..LockConfig::default()
    };
    config.nationalization = NationalizationSupport::Implicit;
    config.time_zone = TimeZoneSupport::Normalize;
    config.array_literal = ArrayLiteralStyle::ArrayConstructor;
    config.functions = FunctionTemplates::standard()
        .renamed("substring", "substr")
        .renamed("length", "char_length")
        .with("locate", 2, FunctionTemplate::Pattern("strpos(?2,?1)"))
        .with("format", 2, FunctionTemplate::Pattern("format_timestamp(?2,?1)"));
    config
}

pub(super) static PATCHES: &[Patch] = &[];

#[cfg(test)]
mod tests {
    use crate::dialect::{Dialect, DialectFamily, TypeCode};
    use crate::strategy::{LockMode, LockTimeout};
    use crate::version::DatabaseVersion;

    #[test]
    fn test_spanner_types() {
        let dialect = Dialect::new(DialectFamily::Spanner, DatabaseVersion::UNKNOWN);
        assert_eq!(
            dialect.column_type(TypeCode::NVarchar, Some(20), None, None).as_deref(),
            Some("string(20)")
        );
        assert_eq!(dialect.column_type(TypeCode::Time, None, None, None), None);
        assert_eq!(
            dialect.composite_type(TypeCode::Array, "int64").as_deref(),
            Some("array<int64>")
        );
        assert_eq!(dialect.lock_string(LockMode::Write, LockTimeout::WaitForever), "");
        assert_eq!(dialect.sequence_ddl("s", 1, 1), None);
    }
}
