//! Payload binding and dirty tracking.
//!
//! A payload is an application struct that embeds [`PayloadBase`] and lists
//! its fields, in declaration order, from [`Payload::bind`]:
//!
//! ```
//! use myorm::{Bindings, Field, Payload, PayloadBase, Schema};
//!
//! # pub struct UserSchema { pub id: Field<i64>, pub name: Field<String> }
//! # impl Schema for UserSchema { fn table_name(&self) -> &'static str { "user" } }
//! # pub static USER: UserSchema = UserSchema {
//! #     id: Field::new("user", "id").auto_increment(),
//! #     name: Field::new("user", "name"),
//! # };
//! #[derive(Default)]
//! struct UserPayload {
//!     base: PayloadBase,
//!     id: i64,
//!     name: String,
//! }
//!
//! impl Payload for UserPayload {
//!     fn bind(&mut self) -> Bindings<'_> {
//!         Bindings::new(&mut self.base)
//!             .field(&mut self.id, &USER.id)
//!             .field(&mut self.name, &USER.name)
//!     }
//! }
//! ```
//!
//! Binding order is positional with the rendered select list, so scan
//! targets always line up with row columns. Bindings are rebuilt on every
//! `bind()` call; the embedded base keeps the per-position baselines that
//! drive dirty detection.

use crate::error::{OrmError, OrmResult};
use crate::scan::{ColumnInfo, FromScanRow, RowView, ScanRow};
use crate::schema::{ColumnRef, Field};
use crate::value::{ToValue, Value};

/// A destination slot a schema field can be bound to.
///
/// Blanket-implemented for every `FromScanRow + ToValue + Default` type, so
/// any supported scalar (and `Option` of it, and user types implementing
/// the two codec traits) can back a payload field. The NULL sentinel is
/// digested here: scanning NULL into a non-`Option` slot zeroes it rather
/// than erroring.
pub trait BindValue {
    /// Current value, used for SET/INSERT args and dirty comparison.
    fn current(&self) -> Value;

    /// Assign one scanned cell into the slot.
    fn assign(&mut self, cell: &ScanRow<'_>) -> OrmResult<()>;
}

impl<T: FromScanRow + ToValue + Default> BindValue for T {
    fn current(&self) -> Value {
        self.to_value()
    }

    fn assign(&mut self, cell: &ScanRow<'_>) -> OrmResult<()> {
        match T::from_scan(cell) {
            Ok(v) => {
                *self = v;
                Ok(())
            }
            Err(e) if e.is_null_value() => {
                *self = T::default();
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}

/// A payload exposes its bound fields for the statement and session layers.
pub trait Payload {
    /// Rebuild the ordered bound-field list. Declaration order is
    /// significant: it is positional with the select list.
    fn bind(&mut self) -> Bindings<'_>;
}

#[derive(Debug, Clone, Default)]
struct Baseline {
    scanned: bool,
    prev: Value,
}

/// Per-payload binding state: the scanned flags and previous-value
/// snapshots that dirty detection compares against. Embed one per payload
/// struct; zero-value constructible.
#[derive(Debug, Clone, Default)]
pub struct PayloadBase {
    baselines: Vec<Baseline>,
}

impl PayloadBase {
    fn ensure(&mut self, len: usize) {
        if self.baselines.len() < len {
            self.baselines.resize(len, Baseline::default());
        }
    }
}

struct BoundField<'a> {
    col: ColumnRef,
    slot: &'a mut dyn BindValue,
}

/// The ordered bound-field list of one payload, rebuilt per `bind()` call.
pub struct Bindings<'a> {
    base: &'a mut PayloadBase,
    slots: Vec<BoundField<'a>>,
}

impl<'a> Bindings<'a> {
    pub fn new(base: &'a mut PayloadBase) -> Self {
        Self {
            base,
            slots: Vec::new(),
        }
    }

    /// Bind a destination to its schema field. The slot type must match the
    /// field's declared type. Rebinding an already-bound column keeps the
    /// first binding.
    pub fn field<T: BindValue>(self, slot: &'a mut T, field: &Field<T>) -> Self {
        self.push(field.col(), slot)
    }

    /// Bind an optional destination: NULL scans to `None`, non-NULL
    /// allocates.
    pub fn field_opt<T>(self, slot: &'a mut Option<T>, field: &Field<T>) -> Self
    where
        Option<T>: BindValue,
    {
        self.push(field.col(), slot)
    }

    fn push(mut self, col: ColumnRef, slot: &'a mut dyn BindValue) -> Self {
        if self.slots.iter().any(|s| s.col == col) {
            return self;
        }
        self.slots.push(BoundField { col, slot });
        self
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Bound columns, in binding order.
    pub fn columns(&self) -> Vec<ColumnRef> {
        self.slots.iter().map(|s| s.col).collect()
    }

    /// Current values, in binding order.
    pub fn values(&self) -> Vec<Value> {
        self.slots.iter().map(|s| s.slot.current()).collect()
    }

    /// Bound columns minus auto-increment ones: the INSERT column set.
    pub fn insert_columns(&self) -> Vec<ColumnRef> {
        self.slots
            .iter()
            .filter(|s| !s.col.auto_increment)
            .map(|s| s.col)
            .collect()
    }

    /// Current values for the INSERT column set.
    pub fn insert_values(&self) -> Vec<Value> {
        self.slots
            .iter()
            .filter(|s| !s.col.auto_increment)
            .map(|s| s.slot.current())
            .collect()
    }

    /// Dirty flags, in binding order. A never-scanned field is always
    /// dirty; otherwise dirty means the current value differs from the
    /// scanned baseline.
    pub fn dirty(&mut self) -> Vec<bool> {
        self.base.ensure(self.slots.len());
        self.slots
            .iter()
            .zip(self.base.baselines.iter())
            .map(|(s, b)| !b.scanned || b.prev != s.slot.current())
            .collect()
    }

    /// Assign one result row positionally into the slots, then snapshot the
    /// baselines.
    pub fn scan(&mut self, row: &RowView<'_>) -> OrmResult<()> {
        for (idx, bound) in self.slots.iter_mut().enumerate() {
            let cell = row.get(idx).ok_or_else(|| {
                OrmError::decode(bound.col.name, "row is narrower than the select list")
            })?;
            bound.slot.assign(&cell)?;
        }
        self.snapshot();
        Ok(())
    }

    /// Record the current values as the clean baseline.
    pub fn snapshot(&mut self) {
        self.base.ensure(self.slots.len());
        for (slot, baseline) in self.slots.iter().zip(self.base.baselines.iter_mut()) {
            baseline.scanned = true;
            baseline.prev = slot.slot.current();
        }
    }

    /// Write a generated key into the auto-increment slot, if any.
    pub fn backfill_auto_increment(&mut self, id: i64) -> OrmResult<()> {
        let text = id.to_string();
        for bound in self.slots.iter_mut().filter(|s| s.col.auto_increment) {
            let column = ColumnInfo::new(bound.col.name, "BIGINT");
            let cell = ScanRow::new(&column, Some(text.as_bytes()));
            bound.slot.assign(&cell)?;
        }
        Ok(())
    }
}
