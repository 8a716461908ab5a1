//! MySQL storage engines.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DialectError;

/// A MySQL table storage engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum MySqlStorageEngine {
    /// Transactional engine with foreign key support.
    #[default]
    InnoDb,
    /// Non-transactional engine; foreign keys are parsed and ignored.
    MyIsam,
}

impl MySqlStorageEngine {
    /// Every engine, for name lookup.
    pub const ALL: [Self; 2] = [Self::InnoDb, Self::MyIsam];

    /// Looks up an engine by case-insensitive name.
    ///
    /// # Errors
    ///
    /// Returns [`DialectError::UnknownStorageEngine`] for any other name.
    pub fn from_name(name: &str) -> Result<Self, DialectError> {
        Self::ALL
            .into_iter()
            .find(|engine| engine.name().eq_ignore_ascii_case(name.trim()))
            .ok_or_else(|| DialectError::UnknownStorageEngine(name.to_string()))
    }

    /// Returns the engine name as MySQL spells it.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::InnoDb => "InnoDB",
            Self::MyIsam => "MyISAM",
        }
    }

    /// Whether `on delete cascade` is enforced.
    #[must_use]
    pub const fn supports_cascade_delete(&self) -> bool {
        matches!(self, Self::InnoDb)
    }

    /// Whether cascading deletes through a self-referencing foreign key
    /// fail on this engine.
    #[must_use]
    pub const fn has_self_referential_foreign_key_bug(&self) -> bool {
        matches!(self, Self::InnoDb)
    }

    /// Whether constraints must be dropped before dropping tables.
    #[must_use]
    pub const fn drop_constraints(&self) -> bool {
        matches!(self, Self::InnoDb)
    }

    /// Returns the CREATE TABLE suffix, e.g. `" engine=InnoDB"`.
    #[must_use]
    pub fn table_type_string(&self, engine_keyword: &str) -> String {
        format!(" {engine_keyword}={}", self.name())
    }
}

impl fmt::Display for MySqlStorageEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MySqlStorageEngine {
    type Err = DialectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}

impl TryFrom<String> for MySqlStorageEngine {
    type Error = DialectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_name(&value)
    }
}

impl From<MySqlStorageEngine> for String {
    fn from(engine: MySqlStorageEngine) -> Self {
        engine.name().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_name() {
        assert_eq!(
            MySqlStorageEngine::from_name("innodb").unwrap(),
            MySqlStorageEngine::InnoDb
        );
        assert_eq!(
            MySqlStorageEngine::from_name("MyISAM").unwrap(),
            MySqlStorageEngine::MyIsam
        );
        let err = MySqlStorageEngine::from_name("memory").unwrap_err();
        assert_eq!(err.to_string(), "The memory storage engine is not supported");
    }

    #[test]
    fn test_predicates() {
        let innodb = MySqlStorageEngine::InnoDb;
        assert!(innodb.supports_cascade_delete());
        assert!(innodb.has_self_referential_foreign_key_bug());
        assert!(innodb.drop_constraints());

        let myisam = MySqlStorageEngine::MyIsam;
        assert!(!myisam.supports_cascade_delete());
        assert!(!myisam.has_self_referential_foreign_key_bug());
        assert!(!myisam.drop_constraints());
    }

    #[test]
    fn test_table_type_string() {
        assert_eq!(
            MySqlStorageEngine::InnoDb.table_type_string("engine"),
            " engine=InnoDB"
        );
        assert_eq!(
            MySqlStorageEngine::MyIsam.table_type_string("type"),
            " type=MyISAM"
        );
    }
}
