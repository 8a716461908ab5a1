//! SAP SQL Anywhere.

use super::config::{DialectConfig, Patch};
use super::functions::{FunctionTemplate, FunctionTemplates};
use super::lock::{LockConfig, LockStyle};
use super::sequence::{IdentitySupport, SequenceSupport};
use super::types::{TypeCode, TypeMappings};
use super::DialectFamily;
use crate::boolean::BooleanRepr;
use crate::capability::Capability;
use crate::pagination::PaginationStyle;
use crate::strategy::NullOrdering;
use crate::version::DatabaseVersion;

/// SQL Anywhere 10.
pub(super) fn base() -> DialectConfig {
    let mut config = DialectConfig::ansi(DialectFamily::SqlAnywhere).with(&[
        Capability::IdentityColumns,
        Capability::OffsetInSubquery,
        Capability::WindowFunctions,
        Capability::RecursiveCte,
        Capability::NoWait,
    ]);
    config.types = TypeMappings::standard()
        .with(TypeCode::Boolean, "bit")
        .with(TypeCode::TinyInt, "tinyint")
        .with(TypeCode::LongVarchar, "long varchar")
        .with(TypeCode::Clob, "long varchar")
        .with(TypeCode::NClob, "long nvarchar")
        .with(TypeCode::LongVarbinary, "long binary")
        .with(TypeCode::Blob, "long binary")
        .with(TypeCode::Uuid, "uniqueidentifier")
        .without(TypeCode::TimestampWithTimeZone);
    config.boolean = BooleanRepr::IntegerBoolean;
    config.null_ordering = NullOrdering::Smallest;
    config.pagination = PaginationStyle::TopStartAt;
    config.locks = LockConfig {
        style: LockStyle::TableHint,
        ..LockConfig::default()
    };
    config.identity = Some(IdentitySupport {
        column: " default autoincrement",
        insert_value: None,
    });
    config.dual = Some("SYS.DUMMY");
    config.functions = FunctionTemplates::standard()
        .renamed("length", "length")
        .renamed("format", "dateformat")
        .with("locate", 2, FunctionTemplate::Pattern("locate(?2,?1)"))
        .with("locate", 3, FunctionTemplate::Pattern("locate(?2,?1,?3)"));
    config
}

pub(super) static PATCHES: &[Patch] = &[
    Patch::new("sequences, timestamp with time zone", DatabaseVersion::major(12), |c| {
        c.enable(Capability::Sequences, true);
        c.sequences = Some(SequenceSupport {
            next_value: "{name}.nextval",
            select_next_value: "SELECT {name}.nextval FROM SYS.DUMMY",
            ..SequenceSupport::STANDARD
        });
        c.types.set(TypeCode::TimestampWithTimeZone, Some("timestamp with time zone"));
    }),
    Patch::new("nulls ordering syntax", DatabaseVersion::major(16), |c| {
        c.enable(Capability::NullsOrderingSyntax, true);
    }),
];
