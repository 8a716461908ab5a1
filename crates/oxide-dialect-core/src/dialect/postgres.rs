//! PostgreSQL and CockroachDB.

use super::config::{ArrayLiteralStyle, DialectConfig, Patch, StructLiteralStyle};
use super::functions::FunctionTemplates;
use super::lock::LockConfig;
use super::sequence::{IdentitySupport, SequenceSupport};
use super::types::{TypeCode, TypeMappings};
use super::DialectFamily;
use crate::capability::Capability;
use crate::pagination::PaginationStyle;
use crate::strategy::{
    NationalizationSupport, RowLockStrategy, SelectItemReferenceStrategy, TimeZoneSupport,
};
use crate::version::DatabaseVersion;

const SEQUENCES: SequenceSupport = SequenceSupport {
    create: "CREATE SEQUENCE {name}",
    start_increment: " START {start} INCREMENT {increment}",
    drop: "DROP SEQUENCE {name}",
    next_value: "nextval('{name}')",
    select_next_value: "SELECT nextval('{name}')",
};

fn types() -> TypeMappings {
    TypeMappings::standard()
        .with(TypeCode::Float, "float($p)")
        .with(TypeCode::LongVarchar, "text")
        .with(TypeCode::Clob, "text")
        .with(TypeCode::Binary, "bytea")
        .with(TypeCode::Varbinary, "bytea")
        .with(TypeCode::LongVarbinary, "bytea")
        .with(TypeCode::Blob, "bytea")
        .with(TypeCode::Time, "time($p)")
        .with(TypeCode::Uuid, "uuid")
}

/// PostgreSQL 8.2.
pub(super) fn postgresql() -> DialectConfig {
    let mut config = DialectConfig::ansi(DialectFamily::PostgreSql)
        .with(&[
            Capability::Sequences,
            Capability::OffsetInSubquery,
            Capability::NoWait,
            Capability::AliasLocks,
            Capability::ForShare,
            Capability::Arrays,
            Capability::StructTypes,
            Capability::BooleanType,
            Capability::Returning,
        ])
        .without(&[Capability::OuterJoinForUpdate]);
    config.types = types();
    config.array_type = Some("$e array");
    config.pagination = PaginationStyle::LimitOffset;
    config.locks = LockConfig {
        for_share: " FOR SHARE",
        write_row_lock_strategy: RowLockStrategy::Table,
        read_row_lock_strategy: RowLockStrategy::Table,
        ..LockConfig::default()
    };
    config.sequences = Some(SEQUENCES);
    config.nationalization = NationalizationSupport::Implicit;
    config.time_zone = TimeZoneSupport::Normalize;
    config.select_item_reference = SelectItemReferenceStrategy::Position;
    config.array_literal = ArrayLiteralStyle::Braces;
    config.struct_literal = StructLiteralStyle::Record;
    config.functions = FunctionTemplates::standard().renamed("format", "to_char");
    config
}

pub(super) static POSTGRESQL_PATCHES: &[Patch] = &[
    Patch::new("nulls first/last", DatabaseVersion::simple(8, 3), |c| {
        c.enable(Capability::NullsOrderingSyntax, true);
        c.types.set(TypeCode::Uuid, Some("uuid"));
    }),
    Patch::new("offset/fetch, window functions, recursive cte", DatabaseVersion::simple(8, 4), |c| {
        c.pagination = PaginationStyle::OffsetFetch;
        c.enable(Capability::OffsetFetch, true);
        c.enable(Capability::WindowFunctions, true);
        c.enable(Capability::RecursiveCte, true);
    }),
    Patch::new("json", DatabaseVersion::simple(9, 2), |c| {
        c.enable(Capability::JsonType, true);
        c.types.set(TypeCode::Json, Some("json"));
    }),
    Patch::new("lateral", DatabaseVersion::simple(9, 3), |c| {
        c.enable(Capability::Lateral, true);
    }),
    Patch::new("jsonb", DatabaseVersion::simple(9, 4), |c| {
        c.types.set(TypeCode::Json, Some("jsonb"));
    }),
    Patch::new("skip locked", DatabaseVersion::simple(9, 5), |c| {
        c.enable(Capability::SkipLocked, true);
    }),
    Patch::new("identity columns", DatabaseVersion::major(10), |c| {
        c.enable(Capability::IdentityColumns, true);
        c.identity = Some(IdentitySupport::STANDARD);
        c.sequences = Some(SequenceSupport {
            start_increment: " START WITH {start} INCREMENT BY {increment}",
            ..SEQUENCES
        });
    }),
    Patch::new("fetch with ties", DatabaseVersion::major(13), |c| {
        c.enable(Capability::FetchWithTies, true);
    }),
    Patch::new("cte search/cycle", DatabaseVersion::major(14), |c| {
        c.enable(Capability::CteSearchClause, true);
        c.enable(Capability::CteCycleClause, true);
    }),
];

/// CockroachDB 19.2.
pub(super) fn cockroach() -> DialectConfig {
    let mut config = DialectConfig::ansi(DialectFamily::CockroachDb)
        .with(&[
            Capability::Sequences,
            Capability::OffsetInSubquery,
            Capability::WindowFunctions,
            Capability::RecursiveCte,
            Capability::Arrays,
            Capability::JsonType,
            Capability::BooleanType,
            Capability::NullsOrderingSyntax,
            Capability::Returning,
        ])
        .without(&[Capability::OuterJoinForUpdate]);
    config.types = types()
        .with(TypeCode::Json, "jsonb")
        .with(TypeCode::Float, "float8");
    config.array_type = Some("$e array");
    config.pagination = PaginationStyle::LimitOffset;
    config.sequences = Some(SEQUENCES);
    config.nationalization = NationalizationSupport::Implicit;
    config.time_zone = TimeZoneSupport::Normalize;
    config.select_item_reference = SelectItemReferenceStrategy::Position;
    config.array_literal = ArrayLiteralStyle::Braces;
    config.functions = FunctionTemplates::standard().renamed("format", "to_char");
    config
}

pub(super) static COCKROACH_PATCHES: &[Patch] = &[
    Patch::new("row locks", DatabaseVersion::simple(20, 1), |c| {
        c.enable(Capability::AliasLocks, true);
        c.enable(Capability::NoWait, true);
        c.locks.write_row_lock_strategy = RowLockStrategy::Table;
        c.locks.read_row_lock_strategy = RowLockStrategy::Table;
    }),
    Patch::new("for share", DatabaseVersion::simple(20, 2), |c| {
        c.enable(Capability::ForShare, true);
        c.locks.for_share = " FOR SHARE";
    }),
    Patch::new("skip locked", DatabaseVersion::simple(23, 2), |c| {
        c.enable(Capability::SkipLocked, true);
    }),
];

#[cfg(test)]
mod tests {
    use crate::capability::Capability;
    use crate::dialect::{Dialect, DialectFamily};
    use crate::pagination::PaginationStyle;
    use crate::strategy::{LockMode, LockTimeout, RowLockStrategy};
    use crate::version::DatabaseVersion;

    #[test]
    fn test_postgresql_version_gates() {
        let old = Dialect::new(DialectFamily::PostgreSql, DatabaseVersion::simple(8, 2));
        assert_eq!(old.config().pagination, PaginationStyle::LimitOffset);
        assert!(!old.supports(Capability::WindowFunctions));

        let v84 = Dialect::new(DialectFamily::PostgreSql, DatabaseVersion::simple(8, 4));
        assert_eq!(v84.config().pagination, PaginationStyle::OffsetFetch);
        assert!(!v84.supports(Capability::FetchWithTies));

        let v13 = Dialect::new(DialectFamily::PostgreSql, DatabaseVersion::major(13));
        assert!(v13.supports(Capability::FetchWithTies));
        assert!(!v13.supports(Capability::CteCycleClause));
        assert!(Dialect::new(DialectFamily::PostgreSql, DatabaseVersion::major(14))
            .supports(Capability::CteCycleClause));
    }

    #[test]
    fn test_postgresql_locks() {
        let pg = Dialect::new(DialectFamily::PostgreSql, DatabaseVersion::simple(9, 4));
        assert_eq!(pg.row_lock_strategy(LockMode::Write), RowLockStrategy::Table);
        assert_eq!(
            pg.lock_string(LockMode::UpgradeSkipLocked, LockTimeout::WaitForever),
            " FOR UPDATE"
        );
        let pg = Dialect::new(DialectFamily::PostgreSql, DatabaseVersion::simple(9, 5));
        assert_eq!(
            pg.lock_string(LockMode::UpgradeSkipLocked, LockTimeout::WaitForever),
            " FOR UPDATE SKIP LOCKED"
        );
        assert_eq!(
            pg.lock_string_of(LockMode::Read, LockTimeout::NoWait, &[String::from("o")]),
            " FOR SHARE OF o NOWAIT"
        );
    }

    #[test]
    fn test_postgresql_sequences() {
        let pg = Dialect::new(DialectFamily::PostgreSql, DatabaseVersion::major(16));
        assert_eq!(pg.next_value_sql("s").as_deref(), Some("nextval('s')"));
        assert_eq!(
            pg.sequence_ddl("s", 1, 50).as_deref(),
            Some("CREATE SEQUENCE s START WITH 1 INCREMENT BY 50")
        );
    }

    #[test]
    fn test_cockroach_row_locks() {
        let old = Dialect::new(DialectFamily::CockroachDb, DatabaseVersion::simple(19, 2));
        assert_eq!(old.row_lock_strategy(LockMode::Write), RowLockStrategy::None);
        let new = Dialect::new(DialectFamily::CockroachDb, DatabaseVersion::simple(20, 1));
        assert_eq!(new.row_lock_strategy(LockMode::Write), RowLockStrategy::Table);
    }
}
