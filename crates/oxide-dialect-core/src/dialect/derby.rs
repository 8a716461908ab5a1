//! Apache Derby.

use super::config::{DialectConfig, Patch};
use super::functions::FunctionTemplates;
use super::lock::LockConfig;
use super::sequence::{IdentitySupport, SequenceSupport};
use super::types::{TypeCode, TypeMappings};
use super::DialectFamily;
use crate::boolean::BooleanRepr;
use crate::capability::Capability;
use crate::version::DatabaseVersion;

/// Derby 10.5.
pub(super) fn base() -> DialectConfig {
    let mut config = DialectConfig::ansi(DialectFamily::Derby)
        .with(&[Capability::OffsetFetch, Capability::IdentityColumns])
        .without(&[Capability::VariableLimit, Capability::OuterJoinForUpdate]);
    config.types = TypeMappings::standard()
        .with(TypeCode::Boolean, "smallint")
        .with(TypeCode::Binary, "char($l) for bit data")
        .with(TypeCode::Varbinary, "varchar($l) for bit data")
        .with(TypeCode::LongVarbinary, "blob")
        .with(TypeCode::LongVarchar, "long varchar")
        .without(TypeCode::TimestampWithTimeZone)
        .with(TypeCode::Timestamp, "timestamp");
    config.boolean = BooleanRepr::IntegerBoolean;
    config.locks = LockConfig {
        for_update: " FOR UPDATE WITH RS",
        for_share: " FOR READ ONLY WITH RS",
        ..LockConfig::default()
    };
    config.identity = Some(IdentitySupport::STANDARD);
    config.dual = Some("sysibm.sysdummy1");
    config.functions = FunctionTemplates::standard()
        .renamed("locate", "locate")
        .renamed("substring", "substr")
        .renamed("length", "length");
    config
}

pub(super) static PATCHES: &[Patch] = &[
    Patch::new("bound offset/fetch, sequences", DatabaseVersion::simple(10, 6), |c| {
        c.enable(Capability::VariableLimit, true);
        c.enable(Capability::Sequences, true);
        c.sequences = Some(SequenceSupport {
            select_next_value: "VALUES (NEXT VALUE FOR {name})",
            ..SequenceSupport::STANDARD
        });
    }),
    Patch::new("boolean", DatabaseVersion::simple(10, 7), |c| {
        c.enable(Capability::BooleanType, true);
        c.boolean = BooleanRepr::Boolean;
        c.types.set(TypeCode::Boolean, Some("boolean"));
    }),
];
