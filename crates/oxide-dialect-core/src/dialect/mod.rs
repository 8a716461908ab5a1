//! Dialect families and resolved dialects.
//!
//! A [`DialectFamily`] names a database product. Resolving it against a
//! [`DatabaseVersion`] copies the family's base [`DialectConfig`], applies
//! every version patch the target satisfies and yields an immutable
//! [`Dialect`] that answers capability questions and renders DDL, lock and
//! sequence fragments.
//!
//! ```rust
//! use oxide_dialect_core::{Capability, DatabaseVersion, Dialect, DialectFamily};
//!
//! let old = Dialect::new(DialectFamily::MySql, DatabaseVersion::new(5, 7, 0));
//! let new = Dialect::new(DialectFamily::MySql, DatabaseVersion::new(8, 0, 14));
//! assert!(!old.supports(Capability::WindowFunctions));
//! assert!(new.supports(Capability::WindowFunctions));
//! ```

mod config;
mod db2;
mod derby;
mod firebird;
mod functions;
mod h2;
mod hana;
mod hsql;
mod informix;
mod iris;
mod lock;
mod mysql;
mod oracle;
mod postgres;
pub mod registry;
mod sequence;
mod spanner;
mod sqlanywhere;
mod sqlite;
mod sqlserver;
mod types;

pub use config::{
    resolve, ArrayLiteralStyle, ConcatStyle, DialectConfig, Patch, StructLiteralStyle,
};
pub use functions::{FunctionTemplate, FunctionTemplates, PatternPiece};
pub use lock::{LockConfig, LockStyle};
pub use registry::DialectRegistry;
pub use sequence::{IdentitySupport, SequenceSupport};
pub use types::{
    expand_template, TypeCode, TypeMappings, DEFAULT_LENGTH, DEFAULT_PRECISION, DEFAULT_SCALE,
};

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::capability::Capability;
use crate::error::{DialectError, Result};
use crate::pagination::{LimitHandler, PaginationStyle};
use crate::storage_engine::MySqlStorageEngine;
use crate::strategy::{
    LockMode, LockTimeout, NationalizationSupport, RowLockStrategy, TimeZoneSupport,
};
use crate::version::DatabaseVersion;

macro_rules! dialect_families {
    ($($(#[$doc:meta])* $variant:ident => $name:literal, $display:literal, [$($alias:literal),*];)+) => {
        /// A database product.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub enum DialectFamily {
            $($(#[$doc])* $variant,)+
        }

        impl DialectFamily {
            /// Every family.
            pub const ALL: &'static [Self] = &[$(Self::$variant,)+];

            /// Canonical lowercase name.
            #[must_use]
            pub const fn name(&self) -> &'static str {
                match self {
                    $(Self::$variant => $name,)+
                }
            }

            /// Product name as the vendor spells it.
            #[must_use]
            pub const fn display_name(&self) -> &'static str {
                match self {
                    $(Self::$variant => $display,)+
                }
            }

            /// Looks up a family by canonical name or alias, ignoring case,
            /// spaces, dashes and underscores.
            ///
            /// # Errors
            ///
            /// Returns [`DialectError::UnknownDialect`] for unknown names.
            pub fn from_name(name: &str) -> Result<Self> {
                let key: String = name
                    .chars()
                    .filter(|c| !matches!(c, ' ' | '-' | '_'))
                    .map(|c| c.to_ascii_lowercase())
                    .collect();
                match key.as_str() {
                    $($name $(| $alias)* => Ok(Self::$variant),)+
                    _ => Err(DialectError::UnknownDialect(name.to_string())),
                }
            }
        }
    };
}

dialect_families! {
    /// PostgreSQL.
    PostgreSql => "postgresql", "PostgreSQL", ["postgres", "pg", "pgsql"];
    /// CockroachDB.
    CockroachDb => "cockroachdb", "CockroachDB", ["cockroach", "crdb"];
    /// MySQL.
    MySql => "mysql", "MySQL", [];
    /// MariaDB.
    MariaDb => "mariadb", "MariaDB", ["maria"];
    /// Oracle Database.
    Oracle => "oracle", "Oracle", ["oracledb"];
    /// Microsoft SQL Server.
    SqlServer => "sqlserver", "SQL Server", ["mssql", "tsql", "microsoftsqlserver"];
    /// IBM DB2 for LUW.
    Db2 => "db2", "DB2", ["ibmdb2"];
    /// Apache Derby.
    Derby => "derby", "Derby", ["javadb"];
    /// H2.
    H2 => "h2", "H2", [];
    /// HyperSQL.
    HsqlDb => "hsqldb", "HSQLDB", ["hsql", "hypersql"];
    /// Firebird.
    Firebird => "firebird", "Firebird", ["firebirdsql"];
    /// InterBase.
    InterBase => "interbase", "InterBase", [];
    /// Informix.
    Informix => "informix", "Informix", ["ids"];
    /// SAP SQL Anywhere.
    SqlAnywhere => "sqlanywhere", "SQL Anywhere", ["sybaseanywhere", "asa"];
    /// SAP HANA.
    Hana => "hana", "HANA", ["saphana"];
    /// Google Cloud Spanner.
    Spanner => "spanner", "Spanner", ["cloudspanner"];
    /// InterSystems IRIS.
    Iris => "iris", "InterSystems IRIS", ["intersystemsiris"];
    /// SQLite.
    Sqlite => "sqlite", "SQLite", ["sqlite3"];
}

impl DialectFamily {
    /// Base configuration and version patches of the family.
    fn definition(self) -> (DialectConfig, &'static [Patch]) {
        match self {
            Self::PostgreSql => (postgres::postgresql(), postgres::POSTGRESQL_PATCHES),
            Self::CockroachDb => (postgres::cockroach(), postgres::COCKROACH_PATCHES),
            Self::MySql => (mysql::mysql(), mysql::MYSQL_PATCHES),
            Self::MariaDb => (mysql::mariadb(), mysql::MARIADB_PATCHES),
            Self::Oracle => (oracle::base(), oracle::PATCHES),
            Self::SqlServer => (sqlserver::base(), sqlserver::PATCHES),
            Self::Db2 => (db2::base(), db2::PATCHES),
            Self::Derby => (derby::base(), derby::PATCHES),
            Self::H2 => (h2::base(), h2::PATCHES),
            Self::HsqlDb => (hsql::base(), hsql::PATCHES),
            Self::Firebird => (firebird::firebird(), firebird::FIREBIRD_PATCHES),
            Self::InterBase => (firebird::interbase(), firebird::INTERBASE_PATCHES),
            Self::Informix => (informix::base(), informix::PATCHES),
            Self::SqlAnywhere => (sqlanywhere::base(), sqlanywhere::PATCHES),
            Self::Hana => (hana::base(), hana::PATCHES),
            Self::Spanner => (spanner::base(), spanner::PATCHES),
            Self::Iris => (iris::base(), iris::PATCHES),
            Self::Sqlite => (sqlite::base(), sqlite::PATCHES),
        }
    }

    /// Returns true for families with MySQL storage engines.
    #[must_use]
    pub const fn has_storage_engines(&self) -> bool {
        matches!(self, Self::MySql | Self::MariaDb)
    }
}

impl fmt::Display for DialectFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DialectFamily {
    type Err = DialectError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_name(s)
    }
}

impl TryFrom<String> for DialectFamily {
    type Error = DialectError;

    fn try_from(value: String) -> Result<Self> {
        Self::from_name(&value)
    }
}

impl From<DialectFamily> for String {
    fn from(family: DialectFamily) -> Self {
        family.name().to_string()
    }
}

/// Construction options beyond family and version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DialectOptions {
    /// MySQL storage engine; ignored by other families.
    pub storage_engine: Option<MySqlStorageEngine>,
}

/// A resolved, immutable dialect of one family and version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dialect {
    version: DatabaseVersion,
    config: DialectConfig,
    applied_patches: Vec<&'static str>,
}

impl Dialect {
    /// Resolves a family at a version with default options.
    #[must_use]
    pub fn new(family: DialectFamily, version: DatabaseVersion) -> Self {
        Self::with_options(family, version, DialectOptions::default())
    }

    /// Resolves a family at a version.
    #[must_use]
    pub fn with_options(
        family: DialectFamily,
        version: DatabaseVersion,
        options: DialectOptions,
    ) -> Self {
        let (base, patches) = family.definition();
        let (mut config, applied_patches) = resolve(&base, patches, &version);
        if let Some(engine) = options.storage_engine {
            if family.has_storage_engines() {
                config.storage_engine = Some(engine);
            } else {
                debug!(family = family.name(), engine = engine.name(), "storage engine ignored");
            }
        }
        if let Some(engine) = config.storage_engine {
            config.enable(Capability::CascadeDelete, engine.supports_cascade_delete());
        }
        debug!(
            family = family.name(),
            version = %version,
            patches = applied_patches.len(),
            "resolved dialect"
        );
        Self {
            version,
            config,
            applied_patches,
        }
    }

    /// Resolves a family by name and a version string.
    ///
    /// # Errors
    ///
    /// Fails on an unknown family name or unparsable version.
    pub fn from_name(name: &str, version: &str) -> Result<Self> {
        Ok(Self::new(DialectFamily::from_name(name)?, version.parse()?))
    }

    /// Wraps a hand-built configuration.
    #[must_use]
    pub const fn from_config(config: DialectConfig, version: DatabaseVersion) -> Self {
        Self {
            version,
            config,
            applied_patches: Vec::new(),
        }
    }

    /// The family.
    #[must_use]
    pub const fn family(&self) -> DialectFamily {
        self.config.family
    }

    /// The target version.
    #[must_use]
    pub const fn version(&self) -> &DatabaseVersion {
        &self.version
    }

    /// The flattened configuration.
    #[must_use]
    pub const fn config(&self) -> &DialectConfig {
        &self.config
    }

    /// Names of the version patches applied on top of the base.
    #[must_use]
    pub fn applied_patches(&self) -> &[&'static str] {
        &self.applied_patches
    }

    /// Product name and version, as used in error messages.
    #[must_use]
    pub fn name(&self) -> String {
        if self.version.is_unknown() {
            self.family().display_name().to_string()
        } else {
            format!("{} {}", self.family().display_name(), self.version)
        }
    }

    /// Returns true if the dialect has the capability.
    #[must_use]
    pub const fn supports(&self, capability: Capability) -> bool {
        self.config.capabilities.contains(capability)
    }

    /// Looks up a capability by name.
    ///
    /// # Errors
    ///
    /// Returns [`DialectError::UnknownCapability`] for names outside the
    /// capability set.
    pub fn supports_named(&self, name: &str) -> Result<bool> {
        Ok(self.supports(name.parse()?))
    }

    /// Renders a column type, or `None` when the dialect has no such type.
    ///
    /// National character codes map to their plain counterpart on dialects
    /// whose character types are already Unicode. Composite codes always
    /// return `None`; use [`Self::composite_type`].
    #[must_use]
    pub fn column_type(
        &self,
        code: TypeCode,
        length: Option<u32>,
        precision: Option<u32>,
        scale: Option<u32>,
    ) -> Option<String> {
        if code.is_composite() {
            return None;
        }
        let code = match self.config.nationalization {
            NationalizationSupport::Explicit => code,
            NationalizationSupport::Implicit | NationalizationSupport::Unsupported => {
                code.denationalized()
            }
        };
        let template = match self.config.types.template(code) {
            Some(template) => template,
            None if code == TypeCode::TimestampWithTimeZone
                && self.config.time_zone == TimeZoneSupport::Normalize =>
            {
                self.config.types.template(TypeCode::Timestamp)?
            }
            None => return None,
        };
        Some(expand_template(
            template,
            length,
            Some(precision.unwrap_or_else(|| code.default_precision())),
            scale,
        ))
    }

    /// Renders an array, nested table or struct column type.
    ///
    /// `element` is the element type for arrays with a generic array
    /// syntax and the declared type name otherwise. Returns `None` when the
    /// dialect lacks the composite kind.
    #[must_use]
    pub fn composite_type(&self, code: TypeCode, element: &str) -> Option<String> {
        let capability = match code {
            TypeCode::Array => Capability::Arrays,
            TypeCode::Table => Capability::NestedTables,
            TypeCode::Struct => Capability::StructTypes,
            _ => return None,
        };
        if !self.supports(capability) {
            return None;
        }
        match (code, self.config.array_type) {
            (TypeCode::Array, Some(template)) => Some(template.replace("$e", element)),
            _ => Some(element.to_string()),
        }
    }

    /// The literal for a truth value.
    #[must_use]
    pub const fn boolean_literal(&self, value: bool) -> &'static str {
        self.config.boolean.literal(value)
    }

    /// Quotes an identifier, doubling embedded closing quotes.
    #[must_use]
    pub fn quote_identifier(&self, name: &str) -> String {
        let (open, close) = self.config.identifier_quote;
        let escaped = name.replace(close, &format!("{close}{close}"));
        format!("{open}{escaped}{close}")
    }

    /// The row-lock strategy for a lock mode.
    #[must_use]
    pub const fn row_lock_strategy(&self, mode: LockMode) -> RowLockStrategy {
        self.config.locks.row_lock_strategy(mode)
    }

    /// Renders the lock clause; empty for table-hint dialects and dialects
    /// without row locks.
    #[must_use]
    pub fn lock_string(&self, mode: LockMode, timeout: LockTimeout) -> String {
        self.config
            .locks
            .lock_string(mode, timeout, self.config.capabilities)
    }

    /// Renders the lock clause naming lock targets.
    #[must_use]
    pub fn lock_string_of(&self, mode: LockMode, timeout: LockTimeout, targets: &[String]) -> String {
        self.config
            .locks
            .lock_string_of(mode, timeout, targets, self.config.capabilities)
    }

    /// Renders the table hint of table-hint dialects.
    #[must_use]
    pub fn lock_hint(&self, mode: LockMode, timeout: LockTimeout) -> Option<String> {
        self.config
            .locks
            .lock_hint(mode, timeout, self.config.capabilities)
    }

    fn sequences(&self) -> Option<&SequenceSupport> {
        if self.supports(Capability::Sequences) {
            self.config.sequences.as_ref()
        } else {
            None
        }
    }

    /// Renders `CREATE SEQUENCE`, or `None` without sequence support.
    #[must_use]
    pub fn sequence_ddl(&self, name: &str, start: i64, increment: i64) -> Option<String> {
        self.sequences()
            .map(|sequences| sequences.create_sql(name, start, increment))
    }

    /// Renders `DROP SEQUENCE`.
    #[must_use]
    pub fn drop_sequence_sql(&self, name: &str) -> Option<String> {
        self.sequences().map(|sequences| sequences.drop_sql(name))
    }

    /// Renders the next-value expression.
    #[must_use]
    pub fn next_value_sql(&self, name: &str) -> Option<String> {
        self.sequences().map(|sequences| sequences.next_value_sql(name))
    }

    /// Renders a standalone query returning the next value.
    #[must_use]
    pub fn select_next_value_sql(&self, name: &str) -> Option<String> {
        self.sequences()
            .map(|sequences| sequences.select_next_value_sql(name))
    }

    /// Identity column templates, when identity columns exist.
    #[must_use]
    pub fn identity(&self) -> Option<&IdentitySupport> {
        if self.supports(Capability::IdentityColumns) {
            self.config.identity.as_ref()
        } else {
            None
        }
    }

    /// The bind marker for a JSON parameter.
    #[must_use]
    pub fn json_bind_marker(&self) -> &'static str {
        self.config.json_bind.unwrap_or("?")
    }

    /// The string-level limit handler of this dialect.
    #[must_use]
    pub fn limit_handler(&self) -> Box<dyn LimitHandler> {
        let fallback = match self.config.pagination {
            PaginationStyle::RowNumberWindow => self.config.window_order_fallback,
            _ => self.config.pagination_order_fallback,
        };
        self.config
            .pagination
            .handler(self.supports(Capability::VariableLimit), fallback)
    }

    /// Text appended to `CREATE TABLE`, e.g. `" engine=InnoDB"`. Empty for
    /// families without storage engines.
    #[must_use]
    pub fn table_type_string(&self) -> String {
        self.config
            .storage_engine
            .map(|engine| engine.table_type_string("engine"))
            .unwrap_or_default()
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}
