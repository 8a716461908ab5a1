//! SQLite.

use super::config::{DialectConfig, Patch};
use super::functions::{FunctionTemplate, FunctionTemplates};
use super::lock::LockConfig;
use super::types::{TypeCode, TypeMappings};
use super::DialectFamily;
use crate::boolean::BooleanRepr;
use crate::capability::Capability;
use crate::pagination::PaginationStyle;
use crate::strategy::{NationalizationSupport, NullOrdering, SelectItemReferenceStrategy};
use crate::version::DatabaseVersion;

/// SQLite 3.
pub(super) fn base() -> DialectConfig {
    let mut config = DialectConfig::ansi(DialectFamily::Sqlite)
        .with(&[Capability::OffsetInSubquery])
        .without(&[Capability::MultiRowValues, Capability::OuterJoinForUpdate]);
    config.types = TypeMappings::empty()
        .with(TypeCode::Boolean, "integer")
        .with(TypeCode::TinyInt, "integer")
        .with(TypeCode::SmallInt, "integer")
        .with(TypeCode::Integer, "integer")
        .with(TypeCode::BigInt, "integer")
        .with(TypeCode::Real, "real")
        .with(TypeCode::Float, "real")
        .with(TypeCode::Double, "real")
        .with(TypeCode::Numeric, "numeric")
        .with(TypeCode::Decimal, "numeric")
        .with(TypeCode::Char, "text")
        .with(TypeCode::Varchar, "text")
        .with(TypeCode::LongVarchar, "text")
        .with(TypeCode::Clob, "text")
        .with(TypeCode::Binary, "blob")
        .with(TypeCode::Varbinary, "blob")
        .with(TypeCode::LongVarbinary, "blob")
        .with(TypeCode::Blob, "blob")
        .with(TypeCode::Date, "date")
        .with(TypeCode::Time, "time")
        .with(TypeCode::Timestamp, "timestamp")
        .with(TypeCode::Uuid, "blob")
        .with(TypeCode::Json, "text");
    config.boolean = BooleanRepr::IntegerBoolean;
    config.null_ordering = NullOrdering::Smallest;
    config.pagination = PaginationStyle::LimitOffset;
    config.locks = LockConfig {
        for_update: "",
        for_share: "",
        ..LockConfig::default()
    };
    config.nationalization = NationalizationSupport::Implicit;
    config.select_item_reference = SelectItemReferenceStrategy::Position;
    config.functions = FunctionTemplates::standard()
        .renamed("substring", "substr")
        .renamed("length", "length")
        .with("locate", 2, FunctionTemplate::Pattern("instr(?2,?1)"))
        .with("format", 2, FunctionTemplate::Pattern("strftime(?2,?1)"));
    config
}

pub(super) static PATCHES: &[Patch] = &[
    Patch::new("multi-row values", DatabaseVersion::new(3, 7, 11), |c| {
        c.enable(Capability::MultiRowValues, true);
    }),
    Patch::new("recursive cte", DatabaseVersion::new(3, 8, 3), |c| {
        c.enable(Capability::RecursiveCte, true);
    }),
    Patch::new("window functions", DatabaseVersion::simple(3, 25), |c| {
        c.enable(Capability::WindowFunctions, true);
    }),
    Patch::new("nulls first/last", DatabaseVersion::simple(3, 30), |c| {
        c.enable(Capability::NullsOrderingSyntax, true);
    }),
    Patch::new("returning", DatabaseVersion::simple(3, 35), |c| {
        c.enable(Capability::Returning, true);
    }),
];

#[cfg(test)]
mod tests {
    use crate::capability::Capability;
    use crate::dialect::{Dialect, DialectFamily};
    use crate::version::DatabaseVersion;

    #[test]
    fn test_sqlite_version_gates() {
        let old = Dialect::new(DialectFamily::Sqlite, DatabaseVersion::new(3, 7, 10));
        assert!(!old.supports(Capability::MultiRowValues));
        let v324 = Dialect::new(DialectFamily::Sqlite, DatabaseVersion::simple(3, 24));
        assert!(v324.supports(Capability::MultiRowValues));
        assert!(!v324.supports(Capability::WindowFunctions));
        let v335 = Dialect::new(DialectFamily::Sqlite, DatabaseVersion::simple(3, 35));
        assert!(v335.supports(Capability::Returning));
        assert!(v335.supports(Capability::WindowFunctions));
    }
}
