//! MySQL and MariaDB.

use super::config::{ConcatStyle, DialectConfig, Patch};
use super::functions::FunctionTemplates;
use super::lock::LockConfig;
use super::sequence::{IdentitySupport, SequenceSupport};
use super::types::{TypeCode, TypeMappings};
use super::DialectFamily;
use crate::capability::Capability;
use crate::pagination::PaginationStyle;
use crate::storage_engine::MySqlStorageEngine;
use crate::strategy::{
    NationalizationSupport, NullOrdering, RowLockStrategy, SelectItemReferenceStrategy,
    TimeZoneSupport,
};
use crate::version::DatabaseVersion;

const AUTO_INCREMENT: IdentitySupport = IdentitySupport {
    column: " auto_increment",
    insert_value: None,
};

fn shared(family: DialectFamily) -> DialectConfig {
    let mut config = DialectConfig::ansi(family).with(&[
        Capability::OffsetInSubquery,
        Capability::IdentityColumns,
    ]);
    config.identifier_quote = ('`', '`');
    config.types = TypeMappings::standard()
        .with(TypeCode::Boolean, "bit")
        .with(TypeCode::TinyInt, "tinyint")
        .with(TypeCode::Double, "double precision")
        .with(TypeCode::LongVarchar, "longtext")
        .with(TypeCode::Clob, "longtext")
        .with(TypeCode::LongVarbinary, "longblob")
        .with(TypeCode::Blob, "longblob")
        .with(TypeCode::Timestamp, "datetime")
        .with(TypeCode::TimestampWithTimeZone, "timestamp")
        .with(TypeCode::Uuid, "binary(16)");
    config.null_ordering = NullOrdering::Smallest;
    config.pagination = PaginationStyle::MySqlLimit;
    config.locks = LockConfig {
        for_share: " LOCK IN SHARE MODE",
        ..LockConfig::default()
    };
    config.identity = Some(AUTO_INCREMENT);
    config.nationalization = NationalizationSupport::Implicit;
    config.time_zone = TimeZoneSupport::Normalize;
    config.select_item_reference = SelectItemReferenceStrategy::Position;
    config.concat = ConcatStyle::Function;
    config.storage_engine = Some(MySqlStorageEngine::InnoDb);
    config.functions = FunctionTemplates::standard()
        .renamed("locate", "locate")
        .renamed("length", "char_length")
        .renamed("format", "date_format");
    config
}

/// MySQL 5.5.
pub(super) fn mysql() -> DialectConfig {
    shared(DialectFamily::MySql)
}

pub(super) static MYSQL_PATCHES: &[Patch] = &[
    Patch::new("fractional seconds", DatabaseVersion::new(5, 6, 4), |c| {
        c.types.set(TypeCode::Time, Some("time($p)"));
        c.types.set(TypeCode::Timestamp, Some("datetime($p)"));
        c.types.set(TypeCode::TimestampWithTimeZone, Some("timestamp($p)"));
    }),
    Patch::new("json type", DatabaseVersion::simple(5, 7), |c| {
        c.enable(Capability::JsonType, true);
        c.types.set(TypeCode::Json, Some("json"));
        c.json_bind = Some("CAST(? AS JSON)");
    }),
    Patch::new("native json parameters", DatabaseVersion::simple(8, 0), |c| {
        c.json_bind = None;
    }),
    Patch::new("for share, alias locks, skip locked, nowait", DatabaseVersion::new(8, 0, 1), |c| {
        c.enable(Capability::ForShare, true);
        c.enable(Capability::AliasLocks, true);
        c.enable(Capability::SkipLocked, true);
        c.enable(Capability::NoWait, true);
        c.locks.for_share = " FOR SHARE";
        c.locks.write_row_lock_strategy = RowLockStrategy::Table;
        c.locks.read_row_lock_strategy = RowLockStrategy::Table;
    }),
    Patch::new("window functions", DatabaseVersion::new(8, 0, 2), |c| {
        c.enable(Capability::WindowFunctions, true);
    }),
    Patch::new("lateral, recursive cte", DatabaseVersion::new(8, 0, 14), |c| {
        c.enable(Capability::Lateral, true);
        c.enable(Capability::RecursiveCte, true);
    }),
];

/// MariaDB 10.0.
pub(super) fn mariadb() -> DialectConfig {
    let mut config = shared(DialectFamily::MariaDb);
    config.types.set(TypeCode::Time, Some("time($p)"));
    config.types.set(TypeCode::Timestamp, Some("datetime($p)"));
    config.types.set(TypeCode::TimestampWithTimeZone, Some("timestamp($p)"));
    config
}

pub(super) static MARIADB_PATCHES: &[Patch] = &[
    Patch::new("window functions, recursive cte, json", DatabaseVersion::simple(10, 2), |c| {
        c.enable(Capability::WindowFunctions, true);
        c.enable(Capability::RecursiveCte, true);
        c.enable(Capability::JsonType, true);
        c.types.set(TypeCode::Json, Some("json"));
    }),
    Patch::new("sequences, wait/nowait", DatabaseVersion::simple(10, 3), |c| {
        c.enable(Capability::Sequences, true);
        c.enable(Capability::Wait, true);
        c.enable(Capability::NoWait, true);
        c.sequences = Some(SequenceSupport {
            next_value: "nextval({name})",
            select_next_value: "SELECT nextval({name})",
            ..SequenceSupport::STANDARD
        });
    }),
    Patch::new("returning", DatabaseVersion::simple(10, 5), |c| {
        c.enable(Capability::Returning, true);
    }),
    Patch::new("skip locked", DatabaseVersion::simple(10, 6), |c| {
        c.enable(Capability::SkipLocked, true);
    }),
];

#[cfg(test)]
mod tests {
    use crate::capability::Capability;
    use crate::dialect::{Dialect, DialectFamily, TypeCode};
    use crate::strategy::{LockMode, LockTimeout, RowLockStrategy};
    use crate::version::DatabaseVersion;

    fn mysql(major: u32, minor: u32, micro: u32) -> Dialect {
        Dialect::new(DialectFamily::MySql, DatabaseVersion::new(major, minor, micro))
    }

    #[test]
    fn test_mysql_version_gates() {
        assert!(!mysql(8, 0, 1).supports(Capability::WindowFunctions));
        assert!(mysql(8, 0, 2).supports(Capability::WindowFunctions));
        assert!(!mysql(8, 0, 13).supports(Capability::RecursiveCte));
        assert!(mysql(8, 0, 14).supports(Capability::Lateral));
        assert!(!mysql(5, 6, 0).supports(Capability::JsonType));
        assert!(mysql(5, 7, 0).supports(Capability::JsonType));
    }

    #[test]
    fn test_mysql_json_bind() {
        assert_eq!(mysql(5, 7, 30).json_bind_marker(), "CAST(? AS JSON)");
        assert_eq!(mysql(8, 0, 0).json_bind_marker(), "?");
    }

    #[test]
    fn test_mysql_locks() {
        let old = mysql(5, 7, 0);
        assert_eq!(old.row_lock_strategy(LockMode::Write), RowLockStrategy::None);
        assert_eq!(
            old.lock_string(LockMode::Read, LockTimeout::NoWait),
            " LOCK IN SHARE MODE"
        );
        let new = mysql(8, 0, 1);
        assert_eq!(new.lock_string(LockMode::Read, LockTimeout::NoWait), " FOR SHARE NOWAIT");
        assert_eq!(
            new.lock_string_of(LockMode::Write, LockTimeout::SkipLocked, &[String::from("t")]),
            " FOR UPDATE OF t SKIP LOCKED"
        );
    }

    #[test]
    fn test_fractional_seconds() {
        assert_eq!(
            mysql(5, 6, 3).column_type(TypeCode::Timestamp, None, None, None).as_deref(),
            Some("datetime")
        );
        assert_eq!(
            mysql(5, 6, 4).column_type(TypeCode::Timestamp, None, Some(3), None).as_deref(),
            Some("datetime(3)")
        );
    }

    #[test]
    fn test_mariadb() {
        let old = Dialect::new(DialectFamily::MariaDb, DatabaseVersion::simple(10, 2));
        assert!(old.supports(Capability::RecursiveCte));
        assert_eq!(old.next_value_sql("s"), None);
        let new = Dialect::new(DialectFamily::MariaDb, DatabaseVersion::simple(10, 3));
        assert_eq!(new.next_value_sql("s").as_deref(), Some("nextval(s)"));
        assert_eq!(
            new.lock_string(LockMode::Write, LockTimeout::Millis(3000)),
            " FOR UPDATE WAIT 3"
        );
        assert_eq!(new.table_type_string(), " engine=InnoDB");
    }
}
