//! InterSystems IRIS.

use super::config::{DialectConfig, Patch};
use super::functions::FunctionTemplates;
use super::sequence::IdentitySupport;
use super::types::{TypeCode, TypeMappings};
use super::DialectFamily;
use crate::boolean::BooleanRepr;
use crate::capability::Capability;
use crate::pagination::PaginationStyle;
use crate::version::DatabaseVersion;

/// IRIS 2020.1.
pub(super) fn base() -> DialectConfig {
    let mut config = DialectConfig::ansi(DialectFamily::Iris).with(&[
        Capability::IdentityColumns,
        Capability::WindowFunctions,
    ]);
    config.types = TypeMappings::standard()
        .with(TypeCode::Boolean, "bit")
        .with(TypeCode::TinyInt, "tinyint")
        .with(TypeCode::LongVarchar, "longvarchar")
        .with(TypeCode::Clob, "longvarchar")
        .with(TypeCode::LongVarbinary, "longvarbinary")
        .with(TypeCode::Blob, "longvarbinary")
        .with(TypeCode::Timestamp, "timestamp")
        .without(TypeCode::TimestampWithTimeZone);
    config.boolean = BooleanRepr::IntegerBoolean;
    config.pagination = PaginationStyle::Top {
        parenthesized: false,
    };
    config.identity = Some(IdentitySupport {
        column: " identity",
        insert_value: None,
    });
    config.functions = FunctionTemplates::standard()
        .renamed("length", "length")
        .renamed("format", "to_char");
    config
}

pub(super) static PATCHES: &[Patch] = &[Patch::new(
    "recursive cte",
    DatabaseVersion::simple(2023, 1),
    |c| {
        c.enable(Capability::RecursiveCte, true);
    },
)];
