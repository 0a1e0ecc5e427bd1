//! Table schemas and typed column descriptors.
//!
//! A schema is declared once, usually as a `static`, with one [`Field`] per
//! column:
//!
//! ```
//! use myorm::{Field, Schema};
//!
//! pub struct UserSchema {
//!     pub id: Field<i64>,
//!     pub name: Field<String>,
//! }
//!
//! impl Schema for UserSchema {
//!     fn table_name(&self) -> &'static str {
//!         "user"
//!     }
//! }
//!
//! pub static USER: UserSchema = UserSchema {
//!     id: Field::new("user", "id").auto_increment(),
//!     name: Field::new("user", "name"),
//! };
//! ```
//!
//! Fields are immutable value objects; two fields naming the same table and
//! column are interchangeable.

use crate::expr::{Cond, Operand, SubQuery};
use crate::value::ToValue;
use std::marker::PhantomData;

/// Identifies a table. Stateless; one value is shared by every field of the
/// table.
pub trait Schema: Send + Sync {
    fn table_name(&self) -> &'static str;
}

/// Type-erased column descriptor: owning table, column name and the
/// auto-increment flag. Equality is structural on (table, name).
#[derive(Debug, Clone, Copy, Eq)]
pub struct ColumnRef {
    pub table: &'static str,
    pub name: &'static str,
    pub auto_increment: bool,
}

impl PartialEq for ColumnRef {
    fn eq(&self, other: &Self) -> bool {
        self.table == other.table && self.name == other.name
    }
}

impl ColumnRef {
    /// Render the bare quoted column name.
    pub(crate) fn write_bare(&self, out: &mut String) {
        crate::ident::write_quoted(out, self.name);
    }

    /// Render the table-qualified quoted column reference.
    pub(crate) fn write_qualified(&self, out: &mut String) {
        crate::ident::write_qualified(out, self.table, self.name);
    }
}

/// A typed column reference bound to its schema.
///
/// All comparison methods are pure: they construct an immutable [`Cond`]
/// and have no side effects. Type mismatches between a field and a compared
/// value are compile errors via the parameter `T`.
pub struct Field<T> {
    col: ColumnRef,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Field<T> {
    pub const fn new(table: &'static str, name: &'static str) -> Self {
        Self {
            col: ColumnRef {
                table,
                name,
                auto_increment: false,
            },
            _marker: PhantomData,
        }
    }

    /// Mark the column as auto-increment. Insert paths skip such columns and
    /// backfill them from the driver's last-insert-id.
    pub const fn auto_increment(mut self) -> Self {
        self.col.auto_increment = true;
        self
    }

    /// The type-erased descriptor.
    pub fn col(&self) -> ColumnRef {
        self.col
    }

    /// Ascending order entry.
    pub fn asc(&self) -> Order {
        Order {
            col: self.col,
            desc: false,
        }
    }

    /// Descending order entry.
    pub fn desc(&self) -> Order {
        Order {
            col: self.col,
            desc: true,
        }
    }

    /// `IS NULL` predicate.
    pub fn is_null(&self) -> Cond {
        Cond::Null {
            left: Operand::Column(self.col),
            negated: false,
        }
    }

    /// `IS NOT NULL` predicate.
    pub fn is_not_null(&self) -> Cond {
        Cond::Null {
            left: Operand::Column(self.col),
            negated: true,
        }
    }

    fn cmp_col(&self, op: &'static str, other: &Field<T>) -> Cond {
        Cond::Compare {
            left: Operand::Column(self.col),
            op,
            right: Operand::Column(other.col),
        }
    }

    /// Column-to-column equality, e.g. a join condition.
    pub fn eq_col(&self, other: &Field<T>) -> Cond {
        self.cmp_col("=", other)
    }

    /// Column-to-column inequality.
    pub fn ne_col(&self, other: &Field<T>) -> Cond {
        self.cmp_col("!=", other)
    }

    /// Column-to-column greater-than.
    pub fn gt_col(&self, other: &Field<T>) -> Cond {
        self.cmp_col(">", other)
    }

    /// Column-to-column less-than.
    pub fn lt_col(&self, other: &Field<T>) -> Cond {
        self.cmp_col("<", other)
    }

    /// Compare against a correlated subquery: `col = (SELECT ...)`.
    pub fn eq_query(&self, sub: SubQuery) -> Cond {
        Cond::Compare {
            left: Operand::Column(self.col),
            op: "=",
            right: Operand::SubQuery(sub),
        }
    }

    /// Membership in a subquery: `col IN (SELECT ...)`.
    pub fn in_query(&self, sub: SubQuery) -> Cond {
        Cond::Compare {
            left: Operand::Column(self.col),
            op: "IN",
            right: Operand::SubQuery(sub),
        }
    }

    /// Non-membership in a subquery: `col NOT IN (SELECT ...)`.
    pub fn not_in_query(&self, sub: SubQuery) -> Cond {
        Cond::Compare {
            left: Operand::Column(self.col),
            op: "NOT IN",
            right: Operand::SubQuery(sub),
        }
    }
}

impl<T: ToValue> Field<T> {
    fn cmp(&self, op: &'static str, val: T) -> Cond {
        Cond::Compare {
            left: Operand::Column(self.col),
            op,
            right: Operand::Value(val.to_value()),
        }
    }

    /// `col = ?`
    pub fn eq(&self, val: T) -> Cond {
        self.cmp("=", val)
    }

    /// `col != ?`
    pub fn ne(&self, val: T) -> Cond {
        self.cmp("!=", val)
    }

    /// `col > ?`
    pub fn gt(&self, val: T) -> Cond {
        self.cmp(">", val)
    }

    /// `col >= ?`
    pub fn gte(&self, val: T) -> Cond {
        self.cmp(">=", val)
    }

    /// `col < ?`
    pub fn lt(&self, val: T) -> Cond {
        self.cmp("<", val)
    }

    /// `col <= ?`
    pub fn lte(&self, val: T) -> Cond {
        self.cmp("<=", val)
    }

    /// `col IN (?,...)`. An empty list renders a no-match guard instead of
    /// invalid SQL.
    pub fn in_list(&self, vals: impl IntoIterator<Item = T>) -> Cond {
        let values: Vec<_> = vals.into_iter().map(|v| v.to_value()).collect();
        if values.is_empty() {
            return Cond::False;
        }
        Cond::Compare {
            left: Operand::Column(self.col),
            op: "IN",
            right: Operand::List(values),
        }
    }

    /// `col NOT IN (?,...)`. An empty list renders an all-match guard.
    pub fn not_in(&self, vals: impl IntoIterator<Item = T>) -> Cond {
        let values: Vec<_> = vals.into_iter().map(|v| v.to_value()).collect();
        if values.is_empty() {
            return Cond::True;
        }
        Cond::Compare {
            left: Operand::Column(self.col),
            op: "NOT IN",
            right: Operand::List(values),
        }
    }

    /// Assignment-shaped condition for `Stmt::set`.
    pub fn set(&self, val: T) -> Cond {
        self.cmp("=", val)
    }
}

impl Field<String> {
    /// `col LIKE ?`
    pub fn like(&self, pattern: impl Into<String>) -> Cond {
        Cond::Compare {
            left: Operand::Column(self.col),
            op: "LIKE",
            right: Operand::Value(crate::value::Value::Text(pattern.into())),
        }
    }

    /// `col NOT LIKE ?`
    pub fn not_like(&self, pattern: impl Into<String>) -> Cond {
        Cond::Compare {
            left: Operand::Column(self.col),
            op: "NOT LIKE",
            right: Operand::Value(crate::value::Value::Text(pattern.into())),
        }
    }
}

// PhantomData<fn() -> T> keeps Field shareable regardless of T.
impl<T> Clone for Field<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Field<T> {}

impl<T> std::fmt::Debug for Field<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Field")
            .field("table", &self.col.table)
            .field("name", &self.col.name)
            .field("auto_increment", &self.col.auto_increment)
            .finish()
    }
}

impl<T> PartialEq for Field<T> {
    fn eq(&self, other: &Self) -> bool {
        self.col == other.col
    }
}

/// One ORDER BY entry. Ascending renders the bare column; descending appends
/// `DESC`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Order {
    pub(crate) col: ColumnRef,
    pub(crate) desc: bool,
}

/// An ordered tuple of columns for composite subquery membership:
/// `` (`a`,`b`) IN (SELECT ...) ``.
#[derive(Debug, Clone)]
pub struct FieldGroup {
    cols: Vec<ColumnRef>,
}

impl FieldGroup {
    pub fn new(cols: impl IntoIterator<Item = ColumnRef>) -> Self {
        Self {
            cols: cols.into_iter().collect(),
        }
    }

    /// Composite membership in a multi-column subquery.
    pub fn in_query(&self, sub: SubQuery) -> Cond {
        Cond::Compare {
            left: Operand::ColumnTuple(self.cols.clone()),
            op: "IN",
            right: Operand::SubQuery(sub),
        }
    }
}
