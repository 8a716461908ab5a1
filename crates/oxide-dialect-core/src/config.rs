//! Target database settings.
//!
//! Settings name a dialect family and optionally a version and a MySQL
//! storage engine. They are plain data, loaded from JSON, and resolved
//! through the process-wide [`DialectRegistry`].
//!
//! ```rust
//! use oxide_dialect_core::config::DialectSettings;
//! use oxide_dialect_core::Capability;
//!
//! let settings = DialectSettings::from_json_str(
//!     r#"{ "dialect": "mysql", "version": "8.0.14", "storage_engine": "innodb" }"#,
//! )
//! .unwrap();
//! let dialect = settings.resolve().unwrap();
//! assert!(dialect.supports(Capability::RecursiveCte));
//! ```

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dialect::{Dialect, DialectFamily, DialectOptions, DialectRegistry};
use crate::error::{DialectError, Result};
use crate::storage_engine::MySqlStorageEngine;
use crate::version::DatabaseVersion;

/// Which database to translate for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DialectSettings {
    /// Family name or alias, such as `postgresql` or `mssql`.
    pub dialect: String,
    /// Dotted version. Absent means unknown, which resolves to the newest
    /// capabilities of the family.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<DatabaseVersion>,
    /// MySQL storage engine name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_engine: Option<String>,
}

impl DialectSettings {
    /// Creates settings for a family with unknown version.
    #[must_use]
    pub fn new(dialect: impl Into<String>) -> Self {
        Self {
            dialect: dialect.into(),
            version: None,
            storage_engine: None,
        }
    }

    /// Sets the version.
    #[must_use]
    pub const fn with_version(mut self, version: DatabaseVersion) -> Self {
        self.version = Some(version);
        self
    }

    /// Sets the storage engine name.
    #[must_use]
    pub fn with_storage_engine(mut self, engine: impl Into<String>) -> Self {
        self.storage_engine = Some(engine.into());
        self
    }

    /// Parses settings from JSON text.
    ///
    /// # Errors
    ///
    /// Fails on malformed JSON, unknown fields or an unparsable version.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads settings from a JSON file.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read or does not parse.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading dialect settings");
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// The resolved family.
    ///
    /// # Errors
    ///
    /// Fails on an unknown family name.
    pub fn family(&self) -> Result<DialectFamily> {
        DialectFamily::from_name(&self.dialect)
    }

    /// The construction options.
    ///
    /// # Errors
    ///
    /// Fails on an unknown storage engine, or when an engine is given for a
    /// family without storage engines.
    pub fn options(&self) -> Result<DialectOptions> {
        let Some(engine) = &self.storage_engine else {
            return Ok(DialectOptions::default());
        };
        let family = self.family()?;
        if !family.has_storage_engines() {
            return Err(DialectError::Config(format!(
                "{} has no storage engines",
                family.display_name()
            )));
        }
        Ok(DialectOptions {
            storage_engine: Some(MySqlStorageEngine::from_name(engine)?),
        })
    }

    /// Resolves the dialect through the process-wide registry.
    ///
    /// # Errors
    ///
    /// Fails on an unknown family or storage engine.
    pub fn resolve(&self) -> Result<Arc<Dialect>> {
        let family = self.family()?;
        let options = self.options()?;
        let version = self.version.unwrap_or_default();
        Ok(DialectRegistry::global().get(family, version, options))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::capability::Capability;

    #[test]
    fn test_parse_settings() {
        let settings =
            DialectSettings::from_json_str(r#"{ "dialect": "pg", "version": "9.4" }"#).unwrap();
        assert_eq!(settings.version, Some(DatabaseVersion::simple(9, 4)));
        let dialect = settings.resolve().unwrap();
        assert_eq!(dialect.family(), DialectFamily::PostgreSql);
        assert!(!dialect.supports(Capability::SkipLocked));
    }

    #[test]
    fn test_missing_version_is_unknown() {
        let settings = DialectSettings::from_json_str(r#"{ "dialect": "oracle" }"#).unwrap();
        assert_eq!(settings.version, None);
        let dialect = settings.resolve().unwrap();
        assert!(dialect.version().is_unknown());
        assert!(dialect.supports(Capability::MultiRowValues));
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(matches!(
            DialectSettings::from_json_str(r#"{ "dialect": "mysql", "engine": "x" }"#),
            Err(DialectError::Json(_))
        ));
        assert!(matches!(
            DialectSettings::from_json_str(r#"{ "dialect": "mysql", "version": "eight" }"#),
            Err(DialectError::Json(_))
        ));
        assert!(matches!(
            DialectSettings::new("nosuchdb").resolve(),
            Err(DialectError::UnknownDialect(_))
        ));
        assert!(matches!(
            DialectSettings::new("mysql").with_storage_engine("csv").resolve(),
            Err(DialectError::UnknownStorageEngine(_))
        ));
        assert!(matches!(
            DialectSettings::new("oracle").with_storage_engine("innodb").resolve(),
            Err(DialectError::Config(_))
        ));
    }

    #[test]
    fn test_storage_engine() {
        let dialect = DialectSettings::new("mysql")
            .with_version(DatabaseVersion::new(8, 0, 30))
            .with_storage_engine("MyISAM")
            .resolve()
            .unwrap();
        assert!(!dialect.supports(Capability::CascadeDelete));
        assert_eq!(dialect.table_type_string(), " engine=MyISAM");
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "dialect": "sqlserver", "version": "11" }}"#).unwrap();
        let settings = DialectSettings::from_file(file.path()).unwrap();
        assert_eq!(settings.dialect, "sqlserver");
        assert_eq!(settings.version, Some(DatabaseVersion::major(11)));
    }

    #[test]
    fn test_serialize_round_trip() {
        let settings = DialectSettings::new("mariadb").with_version(DatabaseVersion::simple(10, 6));
        let json = serde_json::to_string(&settings).unwrap();
        assert_eq!(json, r#"{"dialect":"mariadb","version":"10.6"}"#);
        assert_eq!(DialectSettings::from_json_str(&json).unwrap(), settings);
    }
}
