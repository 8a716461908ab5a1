//! Informix.

use super::config::{DialectConfig, Patch};
use super::functions::{FunctionTemplate, FunctionTemplates};
use super::sequence::SequenceSupport;
use super::types::{TypeCode, TypeMappings};
use super::DialectFamily;
use crate::boolean::BooleanRepr;
use crate::capability::Capability;
use crate::pagination::PaginationStyle;
use crate::strategy::NationalizationSupport;
use crate::version::DatabaseVersion;

/// Informix 10.
pub(super) fn base() -> DialectConfig {
    let mut config = DialectConfig::ansi(DialectFamily::Informix)
        .with(&[Capability::BooleanType])
        .without(&[Capability::VariableLimit, Capability::MultiRowValues]);
    config.types = TypeMappings::standard()
        .with(TypeCode::TinyInt, "smallint")
        .with(TypeCode::Real, "smallfloat")
        .with(TypeCode::Double, "float")
        .with(TypeCode::Float, "float")
        .with(TypeCode::LongVarchar, "lvarchar($l)")
        .with(TypeCode::Clob, "clob")
        .with(TypeCode::Binary, "byte")
        .with(TypeCode::Varbinary, "byte")
        .with(TypeCode::LongVarbinary, "blob")
        .with(TypeCode::Time, "datetime hour to second")
        .with(TypeCode::Timestamp, "datetime year to fraction(5)")
        .without(TypeCode::TimestampWithTimeZone);
    config.boolean = BooleanRepr::TrueFalse;
    config.pagination = PaginationStyle::First;
    config.nationalization = NationalizationSupport::Unsupported;
    config.dual = Some("sysmaster:sysdual");
    config.functions = FunctionTemplates::standard()
        .renamed("substring", "substr")
        .renamed("length", "char_length")
        .renamed("format", "to_char")
        .with("locate", 2, FunctionTemplate::Pattern("instr(?2,?1)"))
        .with("current_timestamp", 0, FunctionTemplate::Pattern("current"));
    config
}

pub(super) static PATCHES: &[Patch] = &[
    Patch::new("skip/first, bound limits", DatabaseVersion::major(11), |c| {
        c.pagination = PaginationStyle::SkipFirst;
        c.enable(Capability::VariableLimit, true);
        c.enable(Capability::OffsetInSubquery, true);
    }),
    Patch::new("sequences", DatabaseVersion::simple(11, 70), |c| {
        c.enable(Capability::Sequences, true);
        c.sequences = Some(SequenceSupport {
            next_value: "{name}.nextval",
            select_next_value: "SELECT {name}.nextval FROM sysmaster:sysdual",
            ..SequenceSupport::STANDARD
        });
    }),
    Patch::new("window functions", DatabaseVersion::simple(12, 10), |c| {
        c.enable(Capability::WindowFunctions, true);
    }),
];
