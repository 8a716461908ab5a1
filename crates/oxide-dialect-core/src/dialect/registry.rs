//! Process-wide cache of resolved dialects.
//!
//! Resolution is deterministic, so two threads racing to populate the same
//! key build equal dialects; whichever inserts first wins and both callers
//! get the same shared instance afterwards.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use tracing::debug;

use super::{Dialect, DialectFamily, DialectOptions};
use crate::error::Result;
use crate::storage_engine::MySqlStorageEngine;
use crate::version::DatabaseVersion;

type Key = (DialectFamily, DatabaseVersion, Option<MySqlStorageEngine>);

/// Compute-if-absent map from (family, version, engine) to a dialect.
#[derive(Debug, Default)]
pub struct DialectRegistry {
    dialects: RwLock<HashMap<Key, Arc<Dialect>>>,
}

static GLOBAL_REGISTRY: OnceLock<DialectRegistry> = OnceLock::new();

impl DialectRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry.
    #[must_use]
    pub fn global() -> &'static Self {
        GLOBAL_REGISTRY.get_or_init(Self::new)
    }

    /// Returns the cached dialect for the key, resolving it on first use.
    #[must_use]
    pub fn get(
        &self,
        family: DialectFamily,
        version: DatabaseVersion,
        options: DialectOptions,
    ) -> Arc<Dialect> {
        let key = (family, version, options.storage_engine);
        {
            let dialects = self.dialects.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(dialect) = dialects.get(&key) {
                return Arc::clone(dialect);
            }
        }
        let resolved = Arc::new(Dialect::with_options(family, version, options));
        let mut dialects = self.dialects.write().unwrap_or_else(PoisonError::into_inner);
        let entry = dialects.entry(key).or_insert_with(|| {
            debug!(family = family.name(), version = %version, "registered dialect");
            resolved
        });
        Arc::clone(entry)
    }

    /// Resolves a family name and version string.
    ///
    /// # Errors
    ///
    /// Fails on an unknown family name or unparsable version.
    pub fn resolve(&self, name: &str, version: &str) -> Result<Arc<Dialect>> {
        let family = DialectFamily::from_name(name)?;
        let version: DatabaseVersion = version.parse()?;
        Ok(self.get(family, version, DialectOptions::default()))
    }

    /// Number of cached dialects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.dialects
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns true when nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_key_returns_same_instance() {
        let registry = DialectRegistry::new();
        let a = registry.resolve("postgres", "16").unwrap();
        let b = registry.resolve("PostgreSQL", "16").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(registry.len(), 1);
        let c = registry.resolve("postgres", "15").unwrap();
        assert!(!Arc::ptr_eq(&a, &c));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_storage_engine_is_part_of_the_key() {
        let registry = DialectRegistry::new();
        let version = DatabaseVersion::major(8);
        let innodb = registry.get(DialectFamily::MySql, version, DialectOptions::default());
        let myisam = registry.get(
            DialectFamily::MySql,
            version,
            DialectOptions {
                storage_engine: Some(MySqlStorageEngine::MyIsam),
            },
        );
        assert!(!Arc::ptr_eq(&innodb, &myisam));
        assert_eq!(myisam.table_type_string(), " engine=MyISAM");
    }

    #[test]
    fn test_concurrent_first_access() {
        let registry = Arc::new(DialectRegistry::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || registry.resolve("oracle", "19").unwrap())
            })
            .collect();
        let dialects: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(registry.len(), 1);
        assert!(dialects.iter().all(|d| Arc::ptr_eq(d, &dialects[0])));
    }

    #[test]
    fn test_unknown_family() {
        assert!(DialectRegistry::global().resolve("dbase", "4").is_err());
        assert!(DialectRegistry::global().resolve("h2", "one").is_err());
    }
}
