//! # oxide-dialect-core
//!
//! Dialect-aware SQL translation for a fleet of database products.
//!
//! This crate provides:
//! - A version gate and a capability registry answering "does this
//!   database, at this version, support X?"
//! - One resolved [`Dialect`] per family and version, with column types,
//!   lock strings, sequence DDL and pagination handlers
//! - A translator rendering a database-agnostic statement tree into the
//!   target's SQL, emulating missing features where an equivalent exists
//! - A codec for structured values, arrays and JSON in vendor wire formats
//!
//! ## Translating a Query
//!
//! ```rust
//! use oxide_dialect_core::ast::Expr;
//! use oxide_dialect_core::builder::Select;
//! use oxide_dialect_core::{translate, DatabaseVersion, Dialect, DialectFamily};
//!
//! let query = Select::new()
//!     .columns(&["id"])
//!     .from("orders")
//!     .where_clause(Expr::column("status").eq(Expr::param("open")))
//!     .offset(20)
//!     .limit(10)
//!     .build();
//!
//! let mysql = Dialect::new(DialectFamily::MySql, DatabaseVersion::new(8, 0, 30));
//! let translation = translate(&query.into(), &mysql).unwrap();
//! assert_eq!(translation.sql, "SELECT id FROM orders WHERE status = ? LIMIT ?, ?");
//! assert_eq!(translation.params.len(), 3);
//! ```
//!
//! ## Capabilities
//!
//! Ask a dialect before relying on a feature the translator would have to
//! degrade:
//!
//! ```rust
//! use oxide_dialect_core::{Capability, DatabaseVersion, Dialect, DialectFamily};
//!
//! let pg = Dialect::new(DialectFamily::PostgreSql, DatabaseVersion::simple(9, 4));
//! assert!(!pg.supports(Capability::SkipLocked));
//! ```

pub mod ast;
pub mod boolean;
pub mod builder;
pub mod capability;
pub mod codec;
pub mod config;
pub mod dialect;
pub mod error;
pub mod pagination;
pub mod storage_engine;
pub mod strategy;
pub mod translate;
pub mod version;

pub use ast::Statement;
pub use capability::{Capability, CapabilitySet};
pub use config::DialectSettings;
pub use dialect::{Dialect, DialectFamily, DialectOptions, DialectRegistry};
pub use error::{DialectError, Result};
pub use pagination::{Limit, LimitHandler, PaginationStyle};
pub use storage_engine::MySqlStorageEngine;
pub use translate::{translate, Clause, Translation};
pub use version::DatabaseVersion;
