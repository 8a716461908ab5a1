//! IBM DB2 for Linux, Unix and Windows.

use super::config::{DialectConfig, Patch};
use super::functions::FunctionTemplates;
use super::lock::LockConfig;
use super::sequence::{IdentitySupport, SequenceSupport};
use super::types::{TypeCode, TypeMappings};
use super::DialectFamily;
use crate::boolean::BooleanRepr;
use crate::capability::Capability;
use crate::pagination::PaginationStyle;
use crate::version::DatabaseVersion;

/// DB2 9.7.
pub(super) fn base() -> DialectConfig {
    let mut config = DialectConfig::ansi(DialectFamily::Db2).with(&[
        Capability::Sequences,
        Capability::IdentityColumns,
        Capability::WindowFunctions,
        Capability::RecursiveCte,
        Capability::SkipLocked,
    ]);
    config.types = TypeMappings::standard()
        .with(TypeCode::Boolean, "smallint")
        .with(TypeCode::Binary, "char($l) for bit data")
        .with(TypeCode::Varbinary, "varchar($l) for bit data")
        .with(TypeCode::LongVarbinary, "blob")
        .with(TypeCode::LongVarchar, "clob")
        .with(TypeCode::NChar, "graphic($l)")
        .with(TypeCode::NVarchar, "vargraphic($l)")
        .with(TypeCode::NClob, "dbclob")
        .with(TypeCode::Uuid, "char(16) for bit data");
    config.boolean = BooleanRepr::IntegerBoolean;
    config.pagination = PaginationStyle::RowNumberWindow;
    config.locks = LockConfig {
        for_update: " FOR READ ONLY WITH RS USE AND KEEP UPDATE LOCKS",
        for_share: " FOR READ ONLY WITH RS USE AND KEEP SHARE LOCKS",
        skip_locked: " SKIP LOCKED DATA",
        ..LockConfig::default()
    };
    config.sequences = Some(SequenceSupport::STANDARD);
    config.identity = Some(IdentitySupport {
        insert_value: Some("default"),
        ..IdentitySupport::STANDARD
    });
    config.dual = Some("sysibm.sysdummy1");
    config.recursive_keyword = false;
    config.functions = FunctionTemplates::standard()
        .renamed("locate", "locate")
        .renamed("substring", "substr")
        .renamed("length", "length")
        .renamed("format", "varchar_format");
    config
}

pub(super) static PATCHES: &[Patch] = &[Patch::new(
    "offset/fetch, boolean",
    DatabaseVersion::simple(11, 1),
    |c| {
        c.pagination = PaginationStyle::OffsetFetch;
        c.enable(Capability::OffsetFetch, true);
        c.enable(Capability::OffsetInSubquery, true);
        c.enable(Capability::BooleanType, true);
        c.boolean = BooleanRepr::Boolean;
        c.types.set(TypeCode::Boolean, Some("boolean"));
    },
)];
