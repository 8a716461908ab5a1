//! Flattened dialect configuration and version-keyed patches.
//!
//! A family describes its oldest supported behavior as a base
//! [`DialectConfig`] and lists [`Patch`]es keyed by the minimum version at
//! which they apply. Resolving a version copies the base and applies every
//! satisfied patch in declaration order, so the effective capability set of
//! any `(family, version)` is one inspectable value.

use tracing::trace;

use super::functions::FunctionTemplates;
use super::lock::LockConfig;
use super::sequence::{IdentitySupport, SequenceSupport};
use super::types::TypeMappings;
use super::DialectFamily;
use crate::boolean::BooleanRepr;
use crate::capability::{Capability, CapabilitySet};
use crate::codec::RawValueTransform;
use crate::pagination::PaginationStyle;
use crate::storage_engine::MySqlStorageEngine;
use crate::strategy::{
    NationalizationSupport, NullOrdering, SelectItemReferenceStrategy, TimeZoneSupport,
};
use crate::version::DatabaseVersion;

/// Literal syntax for array values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrayLiteralStyle {
    /// Text form in braces: `{1,2,NULL,"a b"}`.
    Braces,
    /// `ARRAY[1, 2, NULL, 'a b']`.
    ArrayConstructor,
    /// Named collection constructor: `int_list(1, 2, NULL)`.
    TypeConstructor,
    /// No array values.
    Unsupported,
}

/// Literal syntax for struct values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructLiteralStyle {
    /// Record text form: `(1,"a b",)`.
    Record,
    /// Named object constructor: `address_t('Main St', 12)`.
    TypeConstructor,
    /// No struct values.
    Unsupported,
}

/// String concatenation syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConcatStyle {
    /// `a || b`
    Operator,
    /// `concat(a, b)`
    Function,
    /// `a + b`
    Plus,
}

/// The complete, flattened configuration of one dialect version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialectConfig {
    /// The family this configuration belongs to.
    pub family: DialectFamily,
    /// Boolean capabilities.
    pub capabilities: CapabilitySet,
    /// Opening and closing identifier quote.
    pub identifier_quote: (char, char),
    /// Column type templates.
    pub types: TypeMappings,
    /// Array column template; `$e` is the element type.
    pub array_type: Option<&'static str>,
    /// How boolean values are stored and written as literals.
    pub boolean: BooleanRepr,
    /// Default null placement.
    pub null_ordering: NullOrdering,
    /// Limit/offset rendering.
    pub pagination: PaginationStyle,
    /// ORDER BY item injected when offset/fetch requires one and the
    /// query has none.
    pub pagination_order_fallback: Option<&'static str>,
    /// Lock templates.
    pub locks: LockConfig,
    /// Sequence templates, when sequences exist.
    pub sequences: Option<SequenceSupport>,
    /// Identity column templates, when identity columns exist.
    pub identity: Option<IdentitySupport>,
    /// Unicode text support.
    pub nationalization: NationalizationSupport,
    /// Zoned timestamp storage.
    pub time_zone: TimeZoneSupport,
    /// GROUP BY / ORDER BY select item references.
    pub select_item_reference: SelectItemReferenceStrategy,
    /// Wrapper around JSON bind markers, e.g. `CAST(? AS JSON)`.
    pub json_bind: Option<&'static str>,
    /// Array literal syntax.
    pub array_literal: ArrayLiteralStyle,
    /// Struct literal syntax.
    pub struct_literal: StructLiteralStyle,
    /// String concatenation.
    pub concat: ConcatStyle,
    /// Single-row table for `SELECT ... FROM <dual>`; `None` when FROM may
    /// be omitted.
    pub dual: Option<&'static str>,
    /// ORDER BY used in `row_number() over (...)` when the query has none.
    pub window_order_fallback: Option<&'static str>,
    /// Vendor raw value normalization applied when reading zoned
    /// timestamps.
    pub raw_value_transform: RawValueTransform,
    /// MySQL storage engine, for families that have one.
    pub storage_engine: Option<MySqlStorageEngine>,
    /// Whether recursive CTEs are introduced by `WITH RECURSIVE`.
    pub recursive_keyword: bool,
    /// Whether a native `CYCLE` clause ends with `USING <path column>`.
    pub cycle_using: bool,
    /// Vendor spellings of portable functions.
    pub functions: FunctionTemplates,
}

impl DialectConfig {
    /// Creates a configuration with ANSI defaults for a family.
    #[must_use]
    pub fn ansi(family: DialectFamily) -> Self {
        Self {
            family,
            capabilities: CapabilitySet::of(&[
                Capability::VariableLimit,
                Capability::CascadeDelete,
                Capability::OuterJoinForUpdate,
                Capability::MultiRowValues,
            ]),
            identifier_quote: ('"', '"'),
            types: TypeMappings::standard(),
            array_type: None,
            boolean: BooleanRepr::Boolean,
            null_ordering: NullOrdering::Greatest,
            pagination: PaginationStyle::OffsetFetch,
            pagination_order_fallback: None,
            locks: LockConfig::default(),
            sequences: None,
            identity: None,
            nationalization: NationalizationSupport::Explicit,
            time_zone: TimeZoneSupport::None,
            select_item_reference: SelectItemReferenceStrategy::Expression,
            json_bind: None,
            array_literal: ArrayLiteralStyle::Unsupported,
            struct_literal: StructLiteralStyle::Unsupported,
            concat: ConcatStyle::Operator,
            dual: None,
            window_order_fallback: None,
            raw_value_transform: RawValueTransform::None,
            storage_engine: None,
            recursive_keyword: true,
            cycle_using: true,
            functions: FunctionTemplates::standard(),
        }
    }

    /// Adds capabilities.
    #[must_use]
    pub fn with(mut self, capabilities: &[Capability]) -> Self {
        for capability in capabilities {
            self.capabilities.set(*capability, true);
        }
        self
    }

    /// Removes capabilities.
    #[must_use]
    pub fn without(mut self, capabilities: &[Capability]) -> Self {
        for capability in capabilities {
            self.capabilities.set(*capability, false);
        }
        self
    }

    /// Enables or disables one capability in place.
    pub fn enable(&mut self, capability: Capability, enabled: bool) {
        self.capabilities.set(capability, enabled);
    }
}

/// A named configuration change applying from a minimum version on.
#[derive(Clone, Copy)]
pub struct Patch {
    /// Short description of what changes.
    pub name: &'static str,
    /// Minimum version.
    pub since: DatabaseVersion,
    /// The change.
    pub apply: fn(&mut DialectConfig),
}

impl Patch {
    /// Creates a patch.
    #[must_use]
    pub const fn new(
        name: &'static str,
        since: DatabaseVersion,
        apply: fn(&mut DialectConfig),
    ) -> Self {
        Self { name, since, apply }
    }
}

impl core::fmt::Debug for Patch {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Patch")
            .field("name", &self.name)
            .field("since", &self.since)
            .finish_non_exhaustive()
    }
}

/// Applies the patches satisfied by `version` to a copy of `base`.
///
/// Returns the flattened configuration and the names of the applied
/// patches.
#[must_use]
pub fn resolve(
    base: &DialectConfig,
    patches: &[Patch],
    version: &DatabaseVersion,
) -> (DialectConfig, Vec<&'static str>) {
    let mut config = base.clone();
    let mut applied = Vec::new();
    for patch in patches {
        if version.satisfies(&patch.since) {
            trace!(patch = patch.name, since = %patch.since, "applying dialect patch");
            (patch.apply)(&mut config);
            applied.push(patch.name);
        }
    }
    (config, applied)
}
