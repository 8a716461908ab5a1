//! H2.

use super::config::{ArrayLiteralStyle, DialectConfig, Patch};
use super::functions::FunctionTemplates;
use super::sequence::{IdentitySupport, SequenceSupport};
use super::types::{TypeCode, TypeMappings};
use super::DialectFamily;
use crate::capability::Capability;
use crate::pagination::PaginationStyle;
use crate::strategy::TimeZoneSupport;
use crate::version::DatabaseVersion;

/// H2 1.4.
pub(super) fn base() -> DialectConfig {
    let mut config = DialectConfig::ansi(DialectFamily::H2).with(&[
        Capability::Sequences,
        Capability::IdentityColumns,
        Capability::OffsetInSubquery,
        Capability::RecursiveCte,
        Capability::BooleanType,
        Capability::Arrays,
        Capability::NullsOrderingSyntax,
    ]);
    config.types = TypeMappings::standard()
        .with(TypeCode::TinyInt, "tinyint")
        .with(TypeCode::LongVarchar, "varchar")
        .with(TypeCode::Uuid, "uuid");
    config.array_type = Some("$e array");
    config.pagination = PaginationStyle::LimitOffset;
    config.sequences = Some(SequenceSupport {
        select_next_value: "CALL NEXT VALUE FOR {name}",
        ..SequenceSupport::STANDARD
    });
    config.identity = Some(IdentitySupport::STANDARD);
    config.time_zone = TimeZoneSupport::Native;
    config.array_literal = ArrayLiteralStyle::ArrayConstructor;
    config.functions = FunctionTemplates::standard()
        .renamed("locate", "locate")
        .renamed("format", "formatdatetime");
    config
}

pub(super) static PATCHES: &[Patch] = &[
    Patch::new("offset/fetch", DatabaseVersion::new(1, 4, 195), |c| {
        c.pagination = PaginationStyle::OffsetFetch;
        c.enable(Capability::OffsetFetch, true);
    }),
    Patch::new("percent, with ties, window functions", DatabaseVersion::new(1, 4, 198), |c| {
        c.enable(Capability::FetchPercent, true);
        c.enable(Capability::FetchWithTies, true);
        c.enable(Capability::WindowFunctions, true);
    }),
    Patch::new("json", DatabaseVersion::new(1, 4, 200), |c| {
        c.enable(Capability::JsonType, true);
        c.types.set(TypeCode::Json, Some("json"));
    }),
];
