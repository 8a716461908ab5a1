//! Statement tree builders.
//!
//! The builders use the typestate pattern so an incomplete statement does
//! not compile:
//!
//! ```rust
//! use oxide_dialect_core::builder::Select;
//! use oxide_dialect_core::ast::Expr;
//!
//! let query = Select::new()
//!     .columns(&["id", "name"])
//!     .from("users")
//!     .where_clause(Expr::column("active").eq(Expr::param(true)))
//!     .build();
//!
//! // This would NOT compile:
//! // let query = Select::new()
//! //     .columns(&["id", "name"])
//! //     .build();  // Error: missing FROM clause
//! ```

mod insert;
mod select;
pub mod value;

pub use insert::{Insert, InsertValue};
pub use select::Select;
pub use value::{SqlValue, ToSqlValue};
