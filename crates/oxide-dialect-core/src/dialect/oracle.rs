//! Oracle Database.

use super::config::{ArrayLiteralStyle, DialectConfig, Patch, StructLiteralStyle};
use super::functions::{FunctionTemplate, FunctionTemplates};
use super::lock::LockConfig;
use super::sequence::{IdentitySupport, SequenceSupport};
use super::types::{TypeCode, TypeMappings};
use super::DialectFamily;
use crate::boolean::BooleanRepr;
use crate::capability::Capability;
use crate::codec::RawValueTransform;
use crate::pagination::PaginationStyle;
use crate::strategy::{RowLockStrategy, TimeZoneSupport};
use crate::version::DatabaseVersion;

/// Oracle 8i.
pub(super) fn base() -> DialectConfig {
    let mut config = DialectConfig::ansi(DialectFamily::Oracle)
        .with(&[
            Capability::Sequences,
            Capability::OffsetInSubquery,
            Capability::WindowFunctions,
            Capability::NoWait,
            Capability::Wait,
            Capability::AliasLocks,
            Capability::NestedTables,
            Capability::Arrays,
            Capability::StructTypes,
        ])
        .without(&[Capability::MultiRowValues]);
    config.types = TypeMappings::standard()
        .with(TypeCode::Boolean, "number(1,0)")
        .with(TypeCode::TinyInt, "number(3,0)")
        .with(TypeCode::SmallInt, "number(5,0)")
        .with(TypeCode::Integer, "number(10,0)")
        .with(TypeCode::BigInt, "number(19,0)")
        .with(TypeCode::Real, "float(24)")
        .with(TypeCode::Numeric, "number($p,$s)")
        .with(TypeCode::Decimal, "number($p,$s)")
        .with(TypeCode::Varchar, "varchar2($l char)")
        .with(TypeCode::LongVarchar, "clob")
        .with(TypeCode::NVarchar, "nvarchar2($l)")
        .with(TypeCode::Binary, "raw($l)")
        .with(TypeCode::Varbinary, "raw($l)")
        .with(TypeCode::LongVarbinary, "blob")
        .with(TypeCode::Time, "date")
        .with(TypeCode::Timestamp, "date")
        .without(TypeCode::TimestampWithTimeZone)
        .with(TypeCode::Uuid, "raw(16)");
    config.boolean = BooleanRepr::IntegerBoolean;
    config.pagination = PaginationStyle::Rownum;
    config.locks = LockConfig {
        write_row_lock_strategy: RowLockStrategy::Column,
        read_row_lock_strategy: RowLockStrategy::Column,
        ..LockConfig::default()
    };
    config.sequences = Some(SequenceSupport {
        next_value: "{name}.nextval",
        select_next_value: "SELECT {name}.nextval FROM dual",
        ..SequenceSupport::STANDARD
    });
    config.dual = Some("dual");
    config.raw_value_transform = RawValueTransform::OracleTimestampWithTimeZone;
    config.array_literal = ArrayLiteralStyle::TypeConstructor;
    config.struct_literal = StructLiteralStyle::TypeConstructor;
    config.recursive_keyword = false;
    config.cycle_using = false;
    config.functions = FunctionTemplates::standard()
        .renamed("substring", "substr")
        .renamed("length", "length")
        .renamed("format", "to_char")
        .with("locate", 2, FunctionTemplate::Pattern("instr(?2,?1)"))
        .with("locate", 3, FunctionTemplate::Pattern("instr(?2,?1,?3)"));
    config
}

pub(super) static PATCHES: &[Patch] = &[
    Patch::new("timestamps", DatabaseVersion::major(9), |c| {
        c.types.set(TypeCode::Timestamp, Some("timestamp($p)"));
        c.types.set(TypeCode::TimestampWithTimeZone, Some("timestamp($p) with time zone"));
        c.time_zone = TimeZoneSupport::Native;
    }),
    Patch::new("skip locked", DatabaseVersion::major(10), |c| {
        c.enable(Capability::SkipLocked, true);
        c.types.set(TypeCode::Double, Some("binary_double"));
    }),
    Patch::new("recursive cte, search/cycle", DatabaseVersion::simple(11, 2), |c| {
        c.enable(Capability::RecursiveCte, true);
        c.enable(Capability::CteSearchClause, true);
        c.enable(Capability::CteCycleClause, true);
    }),
    Patch::new("offset/fetch, identity, lateral", DatabaseVersion::major(12), |c| {
        c.pagination = PaginationStyle::OffsetFetch;
        c.enable(Capability::OffsetFetch, true);
        c.enable(Capability::FetchPercent, true);
        c.enable(Capability::FetchWithTies, true);
        c.enable(Capability::IdentityColumns, true);
        c.enable(Capability::Lateral, true);
        c.identity = Some(IdentitySupport::STANDARD);
    }),
    Patch::new("json", DatabaseVersion::major(21), |c| {
        c.enable(Capability::JsonType, true);
        c.types.set(TypeCode::Json, Some("json"));
    }),
    Patch::new("boolean, multi-row values", DatabaseVersion::major(23), |c| {
        c.enable(Capability::BooleanType, true);
        c.enable(Capability::MultiRowValues, true);
        c.boolean = BooleanRepr::Boolean;
        c.types.set(TypeCode::Boolean, Some("boolean"));
    }),
];

#[cfg(test)]
mod tests {
    use crate::capability::Capability;
    use crate::dialect::{Dialect, DialectFamily, TypeCode};
    use crate::pagination::PaginationStyle;
    use crate::strategy::{LockMode, LockTimeout, RowLockStrategy};
    use crate::version::DatabaseVersion;

    #[test]
    fn test_oracle_pagination_by_version() {
        let v11 = Dialect::new(DialectFamily::Oracle, DatabaseVersion::simple(11, 2));
        assert_eq!(v11.config().pagination, PaginationStyle::Rownum);
        assert!(!v11.supports(Capability::FetchPercent));
        let v12 = Dialect::new(DialectFamily::Oracle, DatabaseVersion::major(12));
        assert_eq!(v12.config().pagination, PaginationStyle::OffsetFetch);
        assert!(v12.supports(Capability::FetchPercent));
    }

    #[test]
    fn test_oracle_booleans() {
        let v19 = Dialect::new(DialectFamily::Oracle, DatabaseVersion::major(19));
        assert_eq!(v19.boolean_literal(true), "1");
        assert_eq!(
            v19.column_type(TypeCode::Boolean, None, None, None).as_deref(),
            Some("number(1,0)")
        );
        let v23 = Dialect::new(DialectFamily::Oracle, DatabaseVersion::major(23));
        assert_eq!(v23.boolean_literal(true), "TRUE");
        assert!(v23.supports(Capability::MultiRowValues));
    }

    #[test]
    fn test_oracle_locks_name_columns() {
        let oracle = Dialect::new(DialectFamily::Oracle, DatabaseVersion::major(19));
        assert_eq!(oracle.row_lock_strategy(LockMode::Write), RowLockStrategy::Column);
        assert_eq!(
            oracle.lock_string_of(
                LockMode::Write,
                LockTimeout::Millis(5000),
                &[String::from("o.id")]
            ),
            " FOR UPDATE OF o.id WAIT 5"
        );
        assert_eq!(oracle.next_value_sql("s").as_deref(), Some("s.nextval"));
    }
}
