//! Raw result decoding.
//!
//! Drivers behind the [`Executor`](crate::executor::Executor) contract hand
//! results back as raw textual cells. [`ScanRow`] wraps one cell together
//! with its column metadata and offers the typed, null-aware conversions;
//! [`FromScanRow`] is the decode hook the binders dispatch through.
//!
//! A true NULL (`value() == None`) and an empty string are distinguishable.
//! Every `to_*` conversion returns the [`OrmError::NullValue`] sentinel for
//! NULL instead of silently coercing to zero.

use crate::error::{OrmError, OrmResult};
use chrono::{NaiveDate, NaiveDateTime};

/// Column metadata as reported by the driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnInfo {
    name: String,
    type_name: String,
}

impl ColumnInfo {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
        }
    }

    /// The column label of the result set.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The database type name, e.g. `BIGINT` or `VARCHAR`.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }
}

/// A materialized query result: column metadata plus raw rows.
///
/// Cells are raw bytes; `None` is database NULL. The set is iterated
/// forward-only and consumed by the binding layer.
#[derive(Debug, Clone, Default)]
pub struct RowSet {
    columns: Vec<ColumnInfo>,
    rows: Vec<Vec<Option<Vec<u8>>>>,
}

impl RowSet {
    pub fn new(columns: Vec<ColumnInfo>, rows: Vec<Vec<Option<Vec<u8>>>>) -> Self {
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[ColumnInfo] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = RowView<'_>> {
        self.rows.iter().map(|cells| RowView {
            columns: &self.columns,
            cells,
        })
    }

    pub fn first(&self) -> Option<RowView<'_>> {
        self.iter().next()
    }
}

/// A borrowed view over one result row.
#[derive(Debug, Clone, Copy)]
pub struct RowView<'a> {
    columns: &'a [ColumnInfo],
    cells: &'a [Option<Vec<u8>>],
}

impl<'a> RowView<'a> {
    pub fn columns(&self) -> &'a [ColumnInfo] {
        self.columns
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Cell at result position `idx`.
    pub fn get(&self, idx: usize) -> Option<ScanRow<'a>> {
        let column = self.columns.get(idx)?;
        let cell = self.cells.get(idx)?;
        Some(ScanRow {
            value: cell.as_deref(),
            column,
        })
    }

    /// Cell under the given column label.
    pub fn by_name(&self, name: &str) -> Option<ScanRow<'a>> {
        let idx = self.columns.iter().position(|c| c.name() == name)?;
        self.get(idx)
    }
}

/// One column value of one row: raw bytes, null validity and column
/// metadata. Consumed once per destination assignment.
#[derive(Debug, Clone, Copy)]
pub struct ScanRow<'a> {
    value: Option<&'a [u8]>,
    column: &'a ColumnInfo,
}

impl<'a> ScanRow<'a> {
    pub fn new(column: &'a ColumnInfo, value: Option<&'a [u8]>) -> Self {
        Self { value, column }
    }

    pub fn column(&self) -> &'a ColumnInfo {
        self.column
    }

    /// Whether the cell is database NULL (distinct from an empty string).
    pub fn is_null(&self) -> bool {
        self.value.is_none()
    }

    fn require(&self) -> OrmResult<&'a [u8]> {
        self.value.ok_or(OrmError::NullValue)
    }

    fn parse_err(&self, message: impl Into<String>) -> OrmError {
        OrmError::decode(self.column.name(), message)
    }

    /// Borrow the raw bytes.
    pub fn to_bytes(&self) -> OrmResult<&'a [u8]> {
        self.require()
    }

    /// Borrow the cell as UTF-8 text.
    pub fn to_str(&self) -> OrmResult<&'a str> {
        let raw = self.require()?;
        std::str::from_utf8(raw).map_err(|e| self.parse_err(format!("invalid utf-8: {e}")))
    }

    /// The cell as an owned string.
    pub fn to_string(&self) -> OrmResult<String> {
        Ok(self.to_str()?.to_string())
    }

    /// The cell as an `i64`. Empty (non-NULL) text decodes to zero.
    pub fn to_i64(&self) -> OrmResult<i64> {
        let s = self.to_str()?;
        if s.is_empty() {
            return Ok(0);
        }
        s.parse()
            .map_err(|e| self.parse_err(format!("not an integer: {e}")))
    }

    /// The cell as a `u64`. Empty (non-NULL) text decodes to zero.
    pub fn to_u64(&self) -> OrmResult<u64> {
        let s = self.to_str()?;
        if s.is_empty() {
            return Ok(0);
        }
        s.parse()
            .map_err(|e| self.parse_err(format!("not an unsigned integer: {e}")))
    }

    /// The cell as an `f64`. Empty (non-NULL) text decodes to zero.
    pub fn to_f64(&self) -> OrmResult<f64> {
        let s = self.to_str()?;
        if s.is_empty() {
            return Ok(0.0);
        }
        s.parse()
            .map_err(|e| self.parse_err(format!("not a float: {e}")))
    }

    /// The cell as a bool: `""`, `"0"` and `"false"` are false, anything
    /// else is true.
    pub fn to_bool(&self) -> OrmResult<bool> {
        let s = self.to_str()?;
        Ok(!matches!(s.to_ascii_lowercase().as_str(), "" | "0" | "false"))
    }

    /// The cell as a DATE (`%Y-%m-%d`).
    pub fn to_date(&self) -> OrmResult<NaiveDate> {
        let s = self.to_str()?;
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map_err(|e| self.parse_err(format!("not a date: {e}")))
    }

    /// The cell as a DATETIME (`%Y-%m-%d %H:%M:%S`, fractional seconds
    /// tolerated).
    pub fn to_datetime(&self) -> OrmResult<NaiveDateTime> {
        let s = self.to_str()?;
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f")
            .map_err(|e| self.parse_err(format!("not a datetime: {e}")))
    }

    /// The cell as a JSON document.
    pub fn to_json(&self) -> OrmResult<serde_json::Value> {
        let raw = self.require()?;
        serde_json::from_slice(raw).map_err(|e| self.parse_err(format!("not json: {e}")))
    }
}

/// Decode hook: convert one [`ScanRow`] cell into an application value.
///
/// This is the custom-unmarshal seam. Implementations for all supported
/// scalars are provided; `Option<T>` decodes NULL to `None` and allocates on
/// non-NULL. User types implement this directly (typically on top of
/// [`ScanRow::to_str`] or [`ScanRow::to_bytes`]).
pub trait FromScanRow: Sized {
    fn from_scan(cell: &ScanRow<'_>) -> OrmResult<Self>;
}

macro_rules! from_scan_int {
    ($($t:ty),*) => {
        $(impl FromScanRow for $t {
            fn from_scan(cell: &ScanRow<'_>) -> OrmResult<Self> {
                let v = cell.to_i64()?;
                <$t>::try_from(v).map_err(|_| {
                    cell.parse_err(format!("{v} out of range for {}", stringify!($t)))
                })
            }
        })*
    };
}

macro_rules! from_scan_uint {
    ($($t:ty),*) => {
        $(impl FromScanRow for $t {
            fn from_scan(cell: &ScanRow<'_>) -> OrmResult<Self> {
                let v = cell.to_u64()?;
                <$t>::try_from(v).map_err(|_| {
                    cell.parse_err(format!("{v} out of range for {}", stringify!($t)))
                })
            }
        })*
    };
}

from_scan_int!(i8, i16, i32);
from_scan_uint!(u8, u16, u32);

impl FromScanRow for i64 {
    fn from_scan(cell: &ScanRow<'_>) -> OrmResult<Self> {
        cell.to_i64()
    }
}

impl FromScanRow for u64 {
    fn from_scan(cell: &ScanRow<'_>) -> OrmResult<Self> {
        cell.to_u64()
    }
}

impl FromScanRow for f32 {
    fn from_scan(cell: &ScanRow<'_>) -> OrmResult<Self> {
        Ok(cell.to_f64()? as f32)
    }
}

impl FromScanRow for f64 {
    fn from_scan(cell: &ScanRow<'_>) -> OrmResult<Self> {
        cell.to_f64()
    }
}

impl FromScanRow for bool {
    fn from_scan(cell: &ScanRow<'_>) -> OrmResult<Self> {
        cell.to_bool()
    }
}

impl FromScanRow for String {
    fn from_scan(cell: &ScanRow<'_>) -> OrmResult<Self> {
        cell.to_string()
    }
}

impl FromScanRow for Vec<u8> {
    fn from_scan(cell: &ScanRow<'_>) -> OrmResult<Self> {
        Ok(cell.to_bytes()?.to_vec())
    }
}

impl FromScanRow for NaiveDate {
    fn from_scan(cell: &ScanRow<'_>) -> OrmResult<Self> {
        cell.to_date()
    }
}

impl FromScanRow for NaiveDateTime {
    fn from_scan(cell: &ScanRow<'_>) -> OrmResult<Self> {
        cell.to_datetime()
    }
}

impl FromScanRow for serde_json::Value {
    fn from_scan(cell: &ScanRow<'_>) -> OrmResult<Self> {
        cell.to_json()
    }
}

impl<T: FromScanRow> FromScanRow for Option<T> {
    fn from_scan(cell: &ScanRow<'_>) -> OrmResult<Self> {
        if cell.is_null() {
            return Ok(None);
        }
        T::from_scan(cell).map(Some)
    }
}
