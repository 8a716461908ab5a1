//! Database version gate.
//!
//! A [`DatabaseVersion`] is a `(major, minor, micro)` triple where minor and
//! micro may be left unspecified, plus an [`UNKNOWN`](DatabaseVersion::UNKNOWN)
//! sentinel for targets whose version could not be determined.
//!
//! Comparisons only look at the components both sides specify:
//!
//! ```rust
//! use oxide_dialect_core::DatabaseVersion;
//!
//! let v = DatabaseVersion::simple(10, 5);
//! assert!(v.is_same_or_after(10, Some(4)));
//! assert!(v.is_before(10, Some(6)));
//!
//! // No minor: any minor of major 10 is satisfied.
//! let major_only = DatabaseVersion::major(10);
//! assert!(major_only.is_same_or_after(10, Some(9)));
//! assert!(!major_only.is_before(10, Some(9)));
//! ```
//!
//! The unknown sentinel never fails: it is treated as the newest version,
//! so it satisfies every `is_same_or_after` and no `is_before`.

use core::cmp::Ordering;
use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DialectError;

/// An immutable database version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DatabaseVersion {
    major: Option<u32>,
    minor: Option<u32>,
    micro: Option<u32>,
}

impl DatabaseVersion {
    /// The "no version" sentinel.
    pub const UNKNOWN: Self = Self {
        major: None,
        minor: None,
        micro: None,
    };

    /// Creates a fully specified version.
    #[must_use]
    pub const fn new(major: u32, minor: u32, micro: u32) -> Self {
        Self {
            major: Some(major),
            minor: Some(minor),
            micro: Some(micro),
        }
    }

    /// Creates a `major.minor` version with an unspecified micro.
    #[must_use]
    pub const fn simple(major: u32, minor: u32) -> Self {
        Self {
            major: Some(major),
            minor: Some(minor),
            micro: None,
        }
    }

    /// Creates a major-only version.
    #[must_use]
    pub const fn major(major: u32) -> Self {
        Self {
            major: Some(major),
            minor: None,
            micro: None,
        }
    }

    /// Returns true for the unknown sentinel.
    #[must_use]
    pub const fn is_unknown(&self) -> bool {
        self.major.is_none()
    }

    /// Returns the major component.
    #[must_use]
    pub const fn major_version(&self) -> Option<u32> {
        self.major
    }

    /// Returns the minor component.
    #[must_use]
    pub const fn minor_version(&self) -> Option<u32> {
        self.minor
    }

    /// Returns the micro component.
    #[must_use]
    pub const fn micro_version(&self) -> Option<u32> {
        self.micro
    }

    /// Returns a copy with unspecified minor/micro set to zero.
    ///
    /// Only meant for display; comparisons on the normalized value are
    /// stricter than on the original.
    #[must_use]
    pub const fn normalized(&self) -> Self {
        match self.major {
            None => *self,
            Some(major) => Self {
                major: Some(major),
                minor: Some(match self.minor {
                    Some(minor) => minor,
                    None => 0,
                }),
                micro: Some(match self.micro {
                    Some(micro) => micro,
                    None => 0,
                }),
            },
        }
    }

    /// Compares against `(major, minor, micro)`, skipping any component
    /// either side leaves unspecified. `None` for the unknown sentinel.
    fn compare(&self, major: u32, minor: Option<u32>, micro: Option<u32>) -> Option<Ordering> {
        let own_major = self.major?;
        let ordering = own_major
            .cmp(&major)
            .then_with(|| compare_component(self.minor, minor))
            .then_with(|| compare_component(self.micro, micro));
        Some(ordering)
    }

    /// Returns true if this version has the given major.
    #[must_use]
    pub fn is_same(&self, major: u32) -> bool {
        self.major.is_none_or(|own| own == major)
    }

    /// Returns true if this version is `major[.minor]` or later.
    #[must_use]
    pub fn is_same_or_after(&self, major: u32, minor: Option<u32>) -> bool {
        self.compare(major, minor, None)
            .is_none_or(|ordering| ordering != Ordering::Less)
    }

    /// Returns true if this version is `major.minor.micro` or later.
    #[must_use]
    pub fn is_same_or_after_micro(&self, major: u32, minor: u32, micro: u32) -> bool {
        self.compare(major, Some(minor), Some(micro))
            .is_none_or(|ordering| ordering != Ordering::Less)
    }

    /// Returns true if this version is strictly before `major[.minor]`.
    #[must_use]
    pub fn is_before(&self, major: u32, minor: Option<u32>) -> bool {
        self.compare(major, minor, None)
            .is_some_and(|ordering| ordering == Ordering::Less)
    }

    /// Returns true if this version is strictly before `major.minor.micro`.
    #[must_use]
    pub fn is_before_micro(&self, major: u32, minor: u32, micro: u32) -> bool {
        self.compare(major, Some(minor), Some(micro))
            .is_some_and(|ordering| ordering == Ordering::Less)
    }

    /// Returns true if this version satisfies `other` as a lower bound.
    #[must_use]
    pub fn satisfies(&self, other: &Self) -> bool {
        match other.major {
            None => true,
            Some(major) => self
                .compare(major, other.minor, other.micro)
                .is_none_or(|ordering| ordering != Ordering::Less),
        }
    }
}

fn compare_component(own: Option<u32>, other: Option<u32>) -> Ordering {
    match (own, other) {
        (Some(a), Some(b)) => a.cmp(&b),
        _ => Ordering::Equal,
    }
}

impl Default for DatabaseVersion {
    fn default() -> Self {
        Self::UNKNOWN
    }
}

impl fmt::Display for DatabaseVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(major) = self.major else {
            return f.write_str("unknown");
        };
        write!(f, "{major}")?;
        if let Some(minor) = self.minor {
            write!(f, ".{minor}")?;
            if let Some(micro) = self.micro {
                write!(f, ".{micro}")?;
            }
        }
        Ok(())
    }
}

impl FromStr for DatabaseVersion {
    type Err = DialectError;

    /// Parses `"8"`, `"8.0"`, `"8.0.14"` or `"unknown"`.
    ///
    /// A non-numeric suffix on the last component is ignored, which
    /// accepts server banners such as `"10.4.12-MariaDB"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        if text.is_empty() || text.eq_ignore_ascii_case("unknown") {
            return Ok(Self::UNKNOWN);
        }

        let mut components = [None; 3];
        for (index, part) in text.split('.').enumerate() {
            if index >= components.len() {
                return Err(DialectError::InvalidVersion(s.to_string()));
            }
            let digits: &str = part
                .find(|c: char| !c.is_ascii_digit())
                .map_or(part, |end| &part[..end]);
            if digits.is_empty() {
                return Err(DialectError::InvalidVersion(s.to_string()));
            }
            let value = digits
                .parse::<u32>()
                .map_err(|_| DialectError::InvalidVersion(s.to_string()))?;
            components[index] = Some(value);
            if digits.len() != part.len() {
                break;
            }
        }

        Ok(Self {
            major: components[0],
            minor: components[1],
            micro: components[2],
        })
    }
}

impl TryFrom<String> for DatabaseVersion {
    type Error = DialectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DatabaseVersion> for String {
    fn from(version: DatabaseVersion) -> Self {
        version.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_or_after_and_before() {
        let v = DatabaseVersion::simple(10, 5);
        assert!(v.is_same_or_after(10, Some(4)));
        assert!(v.is_same_or_after(10, Some(5)));
        assert!(!v.is_same_or_after(10, Some(6)));
        assert!(v.is_before(10, Some(6)));
        assert!(!v.is_before(10, Some(5)));
        assert!(v.is_before(11, None));
        assert!(v.is_same_or_after(9, Some(99)));
    }

    #[test]
    fn test_unspecified_minor_is_major_granularity() {
        let v = DatabaseVersion::major(10);
        assert!(v.is_same_or_after(10, Some(7)));
        assert!(!v.is_before(10, Some(7)));
        assert!(v.is_before(11, Some(0)));
        assert!(!v.is_same_or_after(11, None));
    }

    #[test]
    fn test_micro_tie_break() {
        let v = DatabaseVersion::new(8, 0, 14);
        assert!(v.is_same_or_after_micro(8, 0, 14));
        assert!(v.is_same_or_after_micro(8, 0, 2));
        assert!(v.is_before_micro(8, 0, 19));
        assert!(!DatabaseVersion::simple(8, 0).is_before_micro(8, 0, 19));
    }

    #[test]
    fn test_unknown_is_permissive() {
        let v = DatabaseVersion::UNKNOWN;
        assert!(v.is_same_or_after(99, Some(99)));
        assert!(!v.is_before(0, Some(0)));
        assert!(v.is_same(3));
        assert!(v.satisfies(&DatabaseVersion::new(23, 0, 0)));
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!(
            "8.0.14".parse::<DatabaseVersion>().unwrap(),
            DatabaseVersion::new(8, 0, 14)
        );
        assert_eq!(
            "10.4.12-MariaDB".parse::<DatabaseVersion>().unwrap(),
            DatabaseVersion::new(10, 4, 12)
        );
        assert_eq!(
            "12c".parse::<DatabaseVersion>().unwrap(),
            DatabaseVersion::major(12)
        );
        assert!("unknown".parse::<DatabaseVersion>().unwrap().is_unknown());
        assert!("x.1".parse::<DatabaseVersion>().is_err());
        assert!("1.2.3.4".parse::<DatabaseVersion>().is_err());
        assert_eq!(DatabaseVersion::simple(2, 5).to_string(), "2.5");
        assert_eq!(DatabaseVersion::simple(2, 5).normalized().to_string(), "2.5.0");
        assert_eq!(DatabaseVersion::UNKNOWN.to_string(), "unknown");
    }

    #[test]
    fn test_serde_as_string() {
        let v: DatabaseVersion = serde_json::from_str("\"11.2\"").unwrap();
        assert_eq!(v, DatabaseVersion::simple(11, 2));
        assert_eq!(serde_json::to_string(&v).unwrap(), "\"11.2\"");
    }
}
