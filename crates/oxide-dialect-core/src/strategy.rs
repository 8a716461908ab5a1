//! Small closed sets of named policies the translator consults.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DialectError;

/// Where a dialect sorts nulls when no explicit precedence is given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NullOrdering {
    /// Nulls compare smaller than any value: first ascending, last descending.
    Smallest,
    /// Nulls compare greater than any value: last ascending, first descending.
    Greatest,
    /// Nulls always sort first.
    First,
    /// Nulls always sort last.
    Last,
}

impl NullOrdering {
    /// Returns whether nulls land first for the given direction.
    #[must_use]
    pub const fn nulls_first(&self, descending: bool) -> bool {
        match self {
            Self::Smallest => !descending,
            Self::Greatest => descending,
            Self::First => true,
            Self::Last => false,
        }
    }
}

/// How a row lock clause names its targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowLockStrategy {
    /// `for update of t.id, u.id`
    Column,
    /// `for update of t, u`
    Table,
    /// Plain `for update`, no targets.
    None,
}

/// How GROUP BY / ORDER BY refer back to a select item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectItemReferenceStrategy {
    /// One-based position of the select item.
    Position,
    /// The select item alias.
    Alias,
    /// The select item expression, repeated.
    Expression,
}

/// Fetch clause modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchClauseType {
    /// `fetch first n rows only`
    #[default]
    RowsOnly,
    /// `fetch first n rows with ties`
    RowsWithTies,
    /// `fetch first n percent rows only`
    PercentOnly,
    /// `fetch first n percent rows with ties`
    PercentWithTies,
}

impl FetchClauseType {
    /// Returns true for the percent variants.
    #[must_use]
    pub const fn is_percent(&self) -> bool {
        matches!(self, Self::PercentOnly | Self::PercentWithTies)
    }

    /// Returns true for the with-ties variants.
    #[must_use]
    pub const fn is_with_ties(&self) -> bool {
        matches!(self, Self::RowsWithTies | Self::PercentWithTies)
    }

    /// Returns the name used in error messages.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::RowsOnly => "ROWS_ONLY",
            Self::RowsWithTies => "ROWS_WITH_TIES",
            Self::PercentOnly => "PERCENT_ONLY",
            Self::PercentWithTies => "PERCENT_WITH_TIES",
        }
    }
}

impl fmt::Display for FetchClauseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Level of support for nationalized (unicode) character types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NationalizationSupport {
    /// Ordinary character types already store unicode; `nvarchar` maps to
    /// `varchar`.
    Implicit,
    /// Distinct `nchar`/`nvarchar`/`nclob` types must be used.
    Explicit,
    /// No way to store unicode text specifically.
    Unsupported,
}

/// How `timestamp with time zone` values are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeZoneSupport {
    /// The offset is retained.
    Native,
    /// Values are normalized to UTC; the offset is lost.
    Normalize,
    /// No time zone aware type.
    None,
}

/// Pessimistic lock modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LockMode {
    /// No lock.
    #[default]
    None,
    /// Shared (read) lock.
    Read,
    /// Exclusive (write) lock.
    Write,
    /// `for update`, honoring the timeout.
    Upgrade,
    /// `for update nowait` regardless of the timeout.
    UpgradeNoWait,
    /// `for update skip locked` regardless of the timeout.
    UpgradeSkipLocked,
    /// Exclusive lock taken to bump a version column.
    ForceIncrement,
}

impl LockMode {
    /// Returns the mode name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Read => "read",
            Self::Write => "write",
            Self::Upgrade => "upgrade",
            Self::UpgradeNoWait => "upgrade_nowait",
            Self::UpgradeSkipLocked => "upgrade_skip_locked",
            Self::ForceIncrement => "force_increment",
        }
    }

    /// Returns true for modes that take a shared lock.
    #[must_use]
    pub const fn is_read(&self) -> bool {
        matches!(self, Self::Read)
    }
}

impl FromStr for LockMode {
    type Err = DialectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "none" => Ok(Self::None),
            "read" | "pessimistic_read" => Ok(Self::Read),
            "write" | "pessimistic_write" => Ok(Self::Write),
            "upgrade" => Ok(Self::Upgrade),
            "upgrade_nowait" => Ok(Self::UpgradeNoWait),
            "upgrade_skip_locked" | "upgrade_skiplocked" => Ok(Self::UpgradeSkipLocked),
            "force_increment" | "force" => Ok(Self::ForceIncrement),
            _ => Err(DialectError::Config(format!("unknown lock mode '{s}'"))),
        }
    }
}

/// What to do when a row is already locked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LockTimeout {
    /// Block until the lock is granted.
    #[default]
    WaitForever,
    /// Fail immediately.
    NoWait,
    /// Skip rows that are locked.
    SkipLocked,
    /// Wait at most this many milliseconds.
    Millis(u32),
}

impl LockTimeout {
    /// Converts the timeout to whole seconds, rounding up.
    #[must_use]
    pub const fn seconds(&self) -> Option<u32> {
        match self {
            Self::Millis(ms) => Some((*ms).div_ceil(1000)),
            _ => None,
        }
    }
}

impl FromStr for LockTimeout {
    type Err = DialectError;

    /// Accepts `wait`, `nowait`, `skip_locked` or a millisecond count.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "-1" => return Ok(Self::WaitForever),
            "-2" => return Ok(Self::SkipLocked),
            _ => {}
        }
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "wait" | "wait_forever" => Ok(Self::WaitForever),
            "nowait" | "no_wait" | "0" => Ok(Self::NoWait),
            "skip_locked" | "skiplocked" => Ok(Self::SkipLocked),
            other => other
                .parse::<u32>()
                .map(Self::Millis)
                .map_err(|_| DialectError::Config(format!("unknown lock timeout '{s}'"))),
        }
    }
}
