//! Name-based row mapping.
//!
//! The lower-level binder for code that does not go through the typed
//! Field/Payload path: [`FromRow`] maps a result row into a struct by
//! column name, [`ToRow`] turns a struct into an ordered column/value map
//! for INSERT/REPLACE. Both are usually derived:
//!
//! ```ignore
//! use myorm::{FromRow, ToRow};
//!
//! #[derive(FromRow, ToRow)]
//! struct User {
//!     id: i64,
//!     #[orm(column = "user_name")]
//!     name: String,
//!     #[orm(omitempty)]
//!     nick: Option<String>,
//!     #[orm(skip)]
//!     cached: bool,
//! }
//! ```
//!
//! Mapping rule: explicit `#[orm(column = "...")]` override, else the field
//! name; `#[orm(skip)]` excludes a field entirely; `#[orm(omitempty)]`
//! drops the field from row maps when its value is the type's zero value.

use crate::error::OrmResult;
use crate::scan::{FromScanRow, RowView};
use crate::value::Value;

/// Convert one result row into a struct, matching columns by name.
///
/// Missing columns and NULL cells leave the field at its zero value;
/// unconvertible text is a decode error. Derive with
/// `#[derive(FromRow)]`.
pub trait FromRow: Sized {
    fn from_row(row: &RowView<'_>) -> OrmResult<Self>;
}

/// Convert a struct into an ordered column/value row map, in declaration
/// order. Derive with `#[derive(ToRow)]`.
pub trait ToRow {
    fn to_row(&self) -> Vec<(&'static str, Value)>;
}

/// Extension methods for [`RowView`] used by derived [`FromRow`] impls.
pub trait RowExt {
    /// Decode a column by name. Missing columns and NULLs yield the
    /// type's default; parse failures are decode errors.
    fn try_column<T: FromScanRow + Default>(&self, column: &str) -> OrmResult<T>;
}

impl RowExt for RowView<'_> {
    fn try_column<T: FromScanRow + Default>(&self, column: &str) -> OrmResult<T> {
        let Some(cell) = self.by_name(column) else {
            return Ok(T::default());
        };
        match T::from_scan(&cell) {
            Ok(v) => Ok(v),
            Err(e) if e.is_null_value() => Ok(T::default()),
            Err(e) => Err(e),
        }
    }
}
