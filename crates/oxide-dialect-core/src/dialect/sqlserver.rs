//! Microsoft SQL Server.
//!
//! Versions use the internal major number: 8 is SQL Server 2000, 9 is
//! 2005, 10 is 2008 and 11 is 2012.

use super::config::{ConcatStyle, DialectConfig, Patch};
use super::functions::{FunctionTemplate, FunctionTemplates};
use super::lock::{LockConfig, LockStyle};
use super::sequence::{IdentitySupport, SequenceSupport};
use super::types::{TypeCode, TypeMappings};
use super::DialectFamily;
use crate::boolean::BooleanRepr;
use crate::capability::Capability;
use crate::codec::RawValueTransform;
use crate::pagination::PaginationStyle;
use crate::strategy::{NullOrdering, TimeZoneSupport};
use crate::version::DatabaseVersion;

/// SQL Server 2000.
pub(super) fn base() -> DialectConfig {
    let mut config = DialectConfig::ansi(DialectFamily::SqlServer)
        .with(&[
            Capability::IdentityColumns,
            Capability::NoWait,
            Capability::SkipLocked,
        ])
        .without(&[Capability::VariableLimit, Capability::MultiRowValues]);
    config.identifier_quote = ('[', ']');
    config.types = TypeMappings::standard()
        .with(TypeCode::Boolean, "bit")
        .with(TypeCode::TinyInt, "tinyint")
        .with(TypeCode::Double, "float")
        .with(TypeCode::LongVarchar, "text")
        .with(TypeCode::Clob, "text")
        .with(TypeCode::NClob, "ntext")
        .with(TypeCode::LongVarbinary, "image")
        .with(TypeCode::Blob, "image")
        .with(TypeCode::Date, "datetime")
        .with(TypeCode::Time, "datetime")
        .with(TypeCode::Timestamp, "datetime")
        .without(TypeCode::TimestampWithTimeZone)
        .with(TypeCode::Uuid, "uniqueidentifier");
    config.boolean = BooleanRepr::IntegerBoolean;
    config.null_ordering = NullOrdering::Smallest;
    config.pagination = PaginationStyle::Top {
        parenthesized: false,
    };
    config.locks = LockConfig {
        style: LockStyle::TableHint,
        ..LockConfig::default()
    };
    config.identity = Some(IdentitySupport {
        column: " identity not null",
        insert_value: None,
    });
    config.concat = ConcatStyle::Plus;
    config.window_order_fallback = Some("CURRENT_TIMESTAMP");
    config.recursive_keyword = false;
    config.functions = FunctionTemplates::standard()
        .renamed("locate", "charindex")
        .renamed("length", "len")
        .with("substring", 2, FunctionTemplate::Pattern("substring(?1,?2,len(?1)-?2+1)"))
        .with("substring", 3, FunctionTemplate::Named("substring"));
    config
}

pub(super) static PATCHES: &[Patch] = &[
    Patch::new("row_number, cte, variable top", DatabaseVersion::major(9), |c| {
        c.pagination = PaginationStyle::RowNumberWindow;
        c.enable(Capability::WindowFunctions, true);
        c.enable(Capability::RecursiveCte, true);
        c.enable(Capability::VariableLimit, true);
        c.enable(Capability::OffsetInSubquery, true);
        c.types.set(TypeCode::LongVarchar, Some("varchar(max)"));
        c.types.set(TypeCode::Clob, Some("varchar(max)"));
        c.types.set(TypeCode::NClob, Some("nvarchar(max)"));
        c.types.set(TypeCode::LongVarbinary, Some("varbinary(max)"));
        c.types.set(TypeCode::Blob, Some("varbinary(max)"));
        c.types.set(TypeCode::Json, Some("nvarchar(max)"));
    }),
    Patch::new("multi-row values, datetimeoffset", DatabaseVersion::major(10), |c| {
        c.enable(Capability::MultiRowValues, true);
        c.time_zone = TimeZoneSupport::Native;
        c.raw_value_transform = RawValueTransform::SqlServerDateTimeOffset;
        c.types.set(TypeCode::Date, Some("date"));
        c.types.set(TypeCode::Time, Some("time($p)"));
        c.types.set(TypeCode::Timestamp, Some("datetime2($p)"));
        c.types.set(TypeCode::TimestampWithTimeZone, Some("datetimeoffset($p)"));
    }),
    Patch::new("offset/fetch, sequences", DatabaseVersion::major(11), |c| {
        c.pagination = PaginationStyle::OffsetFetch;
        c.pagination_order_fallback = Some("@@VERSION");
        c.enable(Capability::OffsetFetch, true);
        c.enable(Capability::Sequences, true);
        c.sequences = Some(SequenceSupport {
            select_next_value: "SELECT NEXT VALUE FOR {name}",
            ..SequenceSupport::STANDARD
        });
    }),
];

#[cfg(test)]
mod tests {
    use crate::capability::Capability;
    use crate::dialect::{Dialect, DialectFamily, TypeCode};
    use crate::pagination::{Limit, PaginationStyle};
    use crate::strategy::{LockMode, LockTimeout};
    use crate::version::DatabaseVersion;

    fn sqlserver(major: u32) -> Dialect {
        Dialect::new(DialectFamily::SqlServer, DatabaseVersion::major(major))
    }

    #[test]
    fn test_pagination_by_version() {
        assert_eq!(
            sqlserver(8).config().pagination,
            PaginationStyle::Top {
                parenthesized: false
            }
        );
        assert_eq!(sqlserver(9).config().pagination, PaginationStyle::RowNumberWindow);
        assert_eq!(sqlserver(10).config().pagination, PaginationStyle::RowNumberWindow);
        assert_eq!(sqlserver(11).config().pagination, PaginationStyle::OffsetFetch);
    }

    #[test]
    fn test_offset_fetch_injects_order() {
        let query = sqlserver(11)
            .limit_handler()
            .apply("SELECT a FROM t", &Limit::new(Some(10), Some(5)), Vec::new())
            .unwrap();
        assert_eq!(
            query.sql,
            "SELECT a FROM t ORDER BY @@VERSION OFFSET ? ROWS FETCH NEXT ? ROWS ONLY"
        );
    }

    #[test]
    fn test_table_hints() {
        let dialect = sqlserver(11);
        assert_eq!(dialect.lock_string(LockMode::Write, LockTimeout::NoWait), "");
        assert_eq!(
            dialect.lock_hint(LockMode::Write, LockTimeout::NoWait).as_deref(),
            Some(" WITH (UPDLOCK, HOLDLOCK, ROWLOCK, NOWAIT)")
        );
        assert_eq!(
            dialect.lock_hint(LockMode::Read, LockTimeout::SkipLocked).as_deref(),
            Some(" WITH (ROWLOCK, READPAST)")
        );
    }

    #[test]
    fn test_types_and_sequences() {
        assert_eq!(
            sqlserver(8).column_type(TypeCode::Timestamp, None, None, None).as_deref(),
            Some("datetime")
        );
        assert_eq!(
            sqlserver(10).column_type(TypeCode::TimestampWithTimeZone, None, Some(7), None).as_deref(),
            Some("datetimeoffset(7)")
        );
        assert_eq!(sqlserver(10).sequence_ddl("s", 1, 1), None);
        assert!(sqlserver(11).supports(Capability::Sequences));
        assert_eq!(sqlserver(11).boolean_literal(false), "0");
    }
}
