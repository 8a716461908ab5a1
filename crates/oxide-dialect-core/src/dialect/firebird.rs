//! Firebird and InterBase.

use super::config::{DialectConfig, Patch};
use super::functions::FunctionTemplates;
use super::lock::LockConfig;
use super::sequence::{IdentitySupport, SequenceSupport};
use super::types::{TypeCode, TypeMappings};
use super::DialectFamily;
use crate::boolean::BooleanRepr;
use crate::capability::Capability;
use crate::pagination::PaginationStyle;
use crate::strategy::{NullOrdering, TimeZoneSupport};
use crate::version::DatabaseVersion;

const GENERATORS: SequenceSupport = SequenceSupport {
    create: "CREATE GENERATOR {name}",
    start_increment: "",
    drop: "DROP GENERATOR {name}",
    next_value: "gen_id({name}, 1)",
    select_next_value: "SELECT gen_id({name}, 1) FROM rdb$database",
};

fn shared(family: DialectFamily) -> DialectConfig {
    let mut config = DialectConfig::ansi(family)
        .with(&[Capability::Sequences])
        .without(&[Capability::MultiRowValues]);
    config.types = TypeMappings::standard()
        .with(TypeCode::Boolean, "smallint")
        .with(TypeCode::Float, "double precision")
        .with(TypeCode::Clob, "blob sub_type text")
        .with(TypeCode::LongVarchar, "blob sub_type text")
        .with(TypeCode::Binary, "char($l) character set octets")
        .with(TypeCode::Varbinary, "varchar($l) character set octets")
        .with(TypeCode::LongVarbinary, "blob")
        .with(TypeCode::Timestamp, "timestamp")
        .without(TypeCode::TimestampWithTimeZone)
        .with(TypeCode::Uuid, "char(16) character set octets");
    config.boolean = BooleanRepr::IntegerBoolean;
    config.locks = LockConfig {
        for_update: " WITH LOCK",
        for_share: " WITH LOCK",
        ..LockConfig::default()
    };
    config.sequences = Some(GENERATORS);
    config.dual = Some("rdb$database");
    config.functions = FunctionTemplates::standard().renamed("length", "char_length");
    config
}

/// Firebird 1.5.
pub(super) fn firebird() -> DialectConfig {
    let mut config = shared(DialectFamily::Firebird).with(&[Capability::OffsetInSubquery]);
    config.null_ordering = NullOrdering::Last;
    config.pagination = PaginationStyle::FirstSkip;
    config
}

pub(super) static FIREBIRD_PATCHES: &[Patch] = &[
    Patch::new("nulls ordering, sequences", DatabaseVersion::major(2), |c| {
        c.null_ordering = NullOrdering::Smallest;
        c.enable(Capability::NullsOrderingSyntax, true);
        c.sequences = Some(SequenceSupport {
            start_increment: " START WITH {start}",
            select_next_value: "SELECT NEXT VALUE FOR {name} FROM rdb$database",
            ..SequenceSupport::STANDARD
        });
    }),
    Patch::new("recursive cte, returning", DatabaseVersion::simple(2, 1), |c| {
        c.enable(Capability::RecursiveCte, true);
        c.enable(Capability::Returning, true);
    }),
    Patch::new("offset/fetch, window functions, boolean, identity", DatabaseVersion::major(3), |c| {
        c.pagination = PaginationStyle::OffsetFetch;
        c.enable(Capability::OffsetFetch, true);
        c.enable(Capability::WindowFunctions, true);
        c.enable(Capability::BooleanType, true);
        c.enable(Capability::IdentityColumns, true);
        c.boolean = BooleanRepr::Boolean;
        c.types.set(TypeCode::Boolean, Some("boolean"));
        c.identity = Some(IdentitySupport::STANDARD);
        if let Some(sequences) = c.sequences.as_mut() {
            sequences.start_increment = SequenceSupport::STANDARD.start_increment;
        }
    }),
    Patch::new("time zones, lateral", DatabaseVersion::major(4), |c| {
        c.time_zone = TimeZoneSupport::Native;
        c.enable(Capability::Lateral, true);
        c.types.set(TypeCode::Timestamp, Some("timestamp"));
        c.types
            .set(TypeCode::TimestampWithTimeZone, Some("timestamp with time zone"));
    }),
    Patch::new("skip locked", DatabaseVersion::major(5), |c| {
        c.enable(Capability::SkipLocked, true);
    }),
];

/// InterBase 6.
pub(super) fn interbase() -> DialectConfig {
    let mut config = shared(DialectFamily::InterBase);
    config.pagination = PaginationStyle::RowsTo;
    config
}

pub(super) static INTERBASE_PATCHES: &[Patch] = &[Patch::new(
    "boolean",
    DatabaseVersion::major(7),
    |c| {
        c.enable(Capability::BooleanType, true);
        c.boolean = BooleanRepr::Boolean;
        c.types.set(TypeCode::Boolean, Some("boolean"));
    },
)];

#[cfg(test)]
mod tests {
    use crate::dialect::{Dialect, DialectFamily};
    use crate::pagination::{Limit, PaginationStyle};
    use crate::strategy::{LockMode, LockTimeout, NullOrdering};
    use crate::version::DatabaseVersion;

    #[test]
    fn test_firebird_versions() {
        let v15 = Dialect::new(DialectFamily::Firebird, DatabaseVersion::simple(1, 5));
        assert_eq!(v15.config().pagination, PaginationStyle::FirstSkip);
        assert_eq!(v15.config().null_ordering, NullOrdering::Last);
        assert_eq!(v15.next_value_sql("g").as_deref(), Some("gen_id(g, 1)"));
        assert_eq!(v15.sequence_ddl("g", 1, 1).as_deref(), Some("CREATE GENERATOR g"));

        let v25 = Dialect::new(DialectFamily::Firebird, DatabaseVersion::simple(2, 5));
        assert_eq!(v25.config().null_ordering, NullOrdering::Smallest);
        assert_eq!(
            v25.sequence_ddl("s", 10, 1).as_deref(),
            Some("CREATE SEQUENCE s START WITH 10")
        );

        let v3 = Dialect::new(DialectFamily::Firebird, DatabaseVersion::major(3));
        assert_eq!(v3.config().pagination, PaginationStyle::OffsetFetch);
        assert_eq!(v3.lock_string(LockMode::Write, LockTimeout::SkipLocked), " WITH LOCK");
    }

    #[test]
    fn test_interbase_rows_to() {
        let dialect = Dialect::new(DialectFamily::InterBase, DatabaseVersion::UNKNOWN);
        let query = dialect
            .limit_handler()
            .apply("SELECT a FROM t", &Limit::new(Some(40), Some(20)), Vec::new())
            .unwrap();
        assert_eq!(query.sql, "SELECT a FROM t ROWS ? TO ?");
        let values: Vec<_> = query.params.iter().filter_map(|p| p.as_int()).collect();
        assert_eq!(values, vec![41, 60]);
    }
}
