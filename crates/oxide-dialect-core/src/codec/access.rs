//! Null-safe typed reads from a driver row.
//!
//! Some drivers fail on typed access to a NULL column instead of reporting
//! the null. [`read_nullable`] tells the two apart by asking for the raw
//! value: only a raw NULL turns the failure into `None`.

use crate::builder::SqlValue;
use crate::error::{DialectError, Result};

/// Raw access to the current row of a driver result.
pub trait RowAccess {
    /// Returns the untyped value of a one-based column.
    ///
    /// # Errors
    ///
    /// Returns the driver's message when the column cannot be read at all.
    fn raw(&self, index: usize) -> std::result::Result<SqlValue, String>;
}

/// Reads a column through a typed getter, mapping a failed read of a NULL
/// column to `None`.
///
/// # Errors
///
/// Returns [`DialectError::ColumnAccess`] carrying the getter's message when
/// the raw value is not NULL, or when the raw access fails too.
pub fn read_nullable<R, T, F>(row: &R, index: usize, getter: F) -> Result<Option<T>>
where
    R: RowAccess + ?Sized,
    F: FnOnce(&R, usize) -> std::result::Result<Option<T>, String>,
{
    match getter(row, index) {
        Ok(value) => Ok(value),
        Err(message) => match row.raw(index) {
            Ok(SqlValue::Null) => Ok(None),
            Ok(_) | Err(_) => Err(DialectError::ColumnAccess { index, message }),
        },
    }
}
