//! Named boolean capabilities of a dialect.

use core::fmt;
use core::str::FromStr;

use crate::error::DialectError;

macro_rules! capabilities {
    ($($(#[$doc:meta])* $variant:ident => $name:literal,)+) => {
        /// A named boolean property of a dialect.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum Capability {
            $($(#[$doc])* $variant,)+
        }

        impl Capability {
            /// Every capability, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant,)+];

            /// Returns the capability name.
            #[must_use]
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $name,)+
                }
            }
        }

        impl FromStr for Capability {
            type Err = DialectError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
                match normalized.as_str() {
                    $($name => Ok(Self::$variant),)+
                    _ => Err(DialectError::UnknownCapability(s.to_string())),
                }
            }
        }
    };
}

capabilities! {
    /// `create sequence` and next-value expressions.
    Sequences => "sequences",
    /// Identity (auto-increment) columns.
    IdentityColumns => "identity_columns",
    /// Standard `offset n rows fetch first m rows only`.
    OffsetFetch => "offset_fetch",
    /// Offset/fetch may appear in non-root query parts.
    OffsetInSubquery => "offset_in_subquery",
    /// `fetch first n rows with ties`.
    FetchWithTies => "fetch_with_ties",
    /// `fetch first n percent rows only`.
    FetchPercent => "fetch_percent",
    /// Ranking window functions such as `row_number() over (...)`.
    WindowFunctions => "window_functions",
    /// Lateral joins.
    Lateral => "lateral",
    /// `with recursive`.
    RecursiveCte => "recursive_cte",
    /// Native `search depth|breadth first by ... set ...` on recursive CTEs.
    CteSearchClause => "cte_search_clause",
    /// Native `cycle ... set ...` on recursive CTEs.
    CteCycleClause => "cte_cycle_clause",
    /// `skip locked` lock modifier.
    SkipLocked => "skip_locked",
    /// `nowait` lock modifier.
    NoWait => "nowait",
    /// `wait n` lock modifier.
    Wait => "wait",
    /// Row lock targets naming table aliases or columns.
    AliasLocks => "alias_locks",
    /// A distinct shared-lock clause (`for share`).
    ForShare => "for_share",
    /// Locking rows that come from outer joins.
    OuterJoinForUpdate => "outer_join_for_update",
    /// Nested table (table-valued column) types.
    NestedTables => "nested_tables",
    /// Array column types.
    Arrays => "arrays",
    /// A JSON column type.
    JsonType => "json_type",
    /// Struct/object column types.
    StructTypes => "struct_types",
    /// A native boolean column type and literals.
    BooleanType => "boolean_type",
    /// `nulls first` / `nulls last` in ORDER BY.
    NullsOrderingSyntax => "nulls_ordering_syntax",
    /// `insert ... values (...), (...)`.
    MultiRowValues => "multi_row_values",
    /// `returning` on DML.
    Returning => "returning",
    /// `on delete cascade` foreign keys.
    CascadeDelete => "cascade_delete",
    /// Parameter markers inside the limit clause.
    VariableLimit => "variable_limit",
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A compact set of capabilities.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CapabilitySet(u64);

impl CapabilitySet {
    /// The empty set.
    pub const EMPTY: Self = Self(0);

    const fn bit(capability: Capability) -> u64 {
        1 << (capability as u32)
    }

    /// Creates a set from a list of capabilities.
    #[must_use]
    pub fn of(capabilities: &[Capability]) -> Self {
        capabilities
            .iter()
            .fold(Self::EMPTY, |set, capability| set.with(*capability))
    }

    /// Returns a copy with the capability added.
    #[must_use]
    pub const fn with(self, capability: Capability) -> Self {
        Self(self.0 | Self::bit(capability))
    }

    /// Returns a copy with the capability removed.
    #[must_use]
    pub const fn without(self, capability: Capability) -> Self {
        Self(self.0 & !Self::bit(capability))
    }

    /// Adds or removes a capability.
    pub fn set(&mut self, capability: Capability, enabled: bool) {
        *self = if enabled {
            self.with(capability)
        } else {
            self.without(capability)
        };
    }

    /// Returns true if the capability is in the set.
    #[must_use]
    pub const fn contains(&self, capability: Capability) -> bool {
        self.0 & Self::bit(capability) != 0
    }

    /// Iterates over the capabilities in the set.
    pub fn iter(&self) -> impl Iterator<Item = Capability> + '_ {
        Capability::ALL
            .iter()
            .copied()
            .filter(|capability| self.contains(*capability))
    }
}

impl fmt::Debug for CapabilitySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
