//! SAP HANA.

use super::config::{DialectConfig, Patch};
use super::functions::{FunctionTemplate, FunctionTemplates};
use super::lock::LockConfig;
use super::sequence::{IdentitySupport, SequenceSupport};
use super::types::{TypeCode, TypeMappings};
use super::DialectFamily;
use crate::capability::Capability;
use crate::pagination::PaginationStyle;
use crate::strategy::{NullOrdering, RowLockStrategy};
use crate::version::DatabaseVersion;

/// HANA 1.0.
pub(super) fn base() -> DialectConfig {
    let mut config = DialectConfig::ansi(DialectFamily::Hana).with(&[
        Capability::Sequences,
        Capability::IdentityColumns,
        Capability::OffsetInSubquery,
        Capability::WindowFunctions,
        Capability::BooleanType,
        Capability::NullsOrderingSyntax,
        Capability::NoWait,
        Capability::Wait,
        Capability::AliasLocks,
    ]);
    config.types = TypeMappings::standard()
        .with(TypeCode::TinyInt, "tinyint")
        .with(TypeCode::LongVarchar, "clob")
        .with(TypeCode::LongVarbinary, "blob")
        .with(TypeCode::Timestamp, "timestamp")
        .without(TypeCode::TimestampWithTimeZone);
    config.null_ordering = NullOrdering::Smallest;
    config.pagination = PaginationStyle::LimitOffset;
    config.locks = LockConfig {
        skip_locked: " IGNORE LOCKED",
        write_row_lock_strategy: RowLockStrategy::Column,
        read_row_lock_strategy: RowLockStrategy::Column,
        ..LockConfig::default()
    };
    config.sequences = Some(SequenceSupport {
        next_value: "{name}.NEXTVAL",
        select_next_value: "SELECT {name}.NEXTVAL FROM DUMMY",
        ..SequenceSupport::STANDARD
    });
    config.identity = Some(IdentitySupport::STANDARD);
    config.dual = Some("DUMMY");
    config.functions = FunctionTemplates::standard()
        .renamed("length", "length")
        .renamed("format", "to_varchar")
        .with("locate", 2, FunctionTemplate::Pattern("locate(?2,?1)"))
        .with("locate", 3, FunctionTemplate::Pattern("locate(?2,?1,?3)"));
    config
}

pub(super) static PATCHES: &[Patch] = &[Patch::new(
    "ignore locked",
    DatabaseVersion::major(2),
    |c| {
        c.enable(Capability::SkipLocked, true);
    },
)];
