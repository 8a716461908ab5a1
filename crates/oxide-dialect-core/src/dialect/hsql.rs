//! HyperSQL.

use super::config::{DialectConfig, Patch};
use super::functions::FunctionTemplates;
use super::sequence::{IdentitySupport, SequenceSupport};
use super::types::{TypeCode, TypeMappings};
use super::DialectFamily;
use crate::capability::Capability;
use crate::pagination::PaginationStyle;
use crate::version::DatabaseVersion;

/// HSQLDB 1.8.
pub(super) fn base() -> DialectConfig {
    let mut config = DialectConfig::ansi(DialectFamily::HsqlDb).with(&[
        Capability::Sequences,
        Capability::IdentityColumns,
        Capability::BooleanType,
    ]);
    config.types = TypeMappings::standard()
        .with(TypeCode::TinyInt, "tinyint")
        .with(TypeCode::LongVarchar, "longvarchar")
        .with(TypeCode::LongVarbinary, "longvarbinary")
        .without(TypeCode::TimestampWithTimeZone);
    config.pagination = PaginationStyle::LegacyHsql;
    config.sequences = Some(SequenceSupport {
        select_next_value: "CALL NEXT VALUE FOR {name}",
        ..SequenceSupport::STANDARD
    });
    config.identity = Some(IdentitySupport {
        column: " GENERATED BY DEFAULT AS IDENTITY (START WITH 1)",
        insert_value: Some("null"),
    });
    config.functions = FunctionTemplates::standard()
        .renamed("locate", "locate")
        .renamed("format", "to_char");
    config
}

pub(super) static PATCHES: &[Patch] = &[
    Patch::new("limit/offset, recursive cte", DatabaseVersion::major(2), |c| {
        c.pagination = PaginationStyle::LimitOffset;
        c.enable(Capability::OffsetInSubquery, true);
        c.enable(Capability::RecursiveCte, true);
        c.types
            .set(TypeCode::TimestampWithTimeZone, Some("timestamp($p) with time zone"));
    }),
    Patch::new("offset/fetch", DatabaseVersion::simple(2, 5), |c| {
        c.pagination = PaginationStyle::OffsetFetch;
        c.enable(Capability::OffsetFetch, true);
    }),
];
