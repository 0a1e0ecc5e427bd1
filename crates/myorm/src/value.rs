//! Owned SQL argument values.
//!
//! [`Value`] is the currency for positional `?` arguments and for the
//! snapshot-compare step of dirty tracking, so it carries structural
//! equality. [`ToValue`] converts application scalars into `Value` and is
//! the custom-marshal hook for user-defined column types.

use crate::error::OrmResult;
use chrono::{NaiveDate, NaiveDateTime};

/// An owned SQL argument value.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
    /// SQL NULL
    #[default]
    Null,
    /// Signed integer kinds
    Int(i64),
    /// Unsigned integer kinds
    UInt(u64),
    /// Floating point kinds
    Float(f64),
    /// Boolean
    Bool(bool),
    /// Character data
    Text(String),
    /// Binary data
    Bytes(Vec<u8>),
    /// DATE
    Date(NaiveDate),
    /// DATETIME / TIMESTAMP
    DateTime(NaiveDateTime),
    /// JSON column value
    Json(serde_json::Value),
}

impl Value {
    /// Whether this value is the zero value of its kind.
    ///
    /// Used by the `omitempty` row-map rule: zero-valued fields are dropped
    /// from INSERT/REPLACE row maps.
    pub fn is_zero(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Int(v) => *v == 0,
            Value::UInt(v) => *v == 0,
            Value::Float(v) => *v == 0.0,
            Value::Bool(v) => !v,
            Value::Text(v) => v.is_empty(),
            Value::Bytes(v) => v.is_empty(),
            Value::Json(v) => v.is_null(),
            Value::Date(_) | Value::DateTime(_) => false,
        }
    }
}

/// Convert a value produced by `serde::Serialize` into a JSON column value.
pub fn json_value<T: serde::Serialize>(value: &T) -> OrmResult<Value> {
    let v = serde_json::to_value(value)
        .map_err(|e| crate::error::OrmError::Other(format!("json serialize: {e}")))?;
    Ok(Value::Json(v))
}

/// Conversion of application values into SQL arguments.
///
/// Implement this (together with [`FromScanRow`](crate::scan::FromScanRow))
/// for custom column types; the payload binder and the comparison builders
/// accept any `T: ToValue`.
pub trait ToValue {
    fn to_value(&self) -> Value;
}

impl ToValue for Value {
    fn to_value(&self) -> Value {
        self.clone()
    }
}

macro_rules! to_value_int {
    ($($t:ty),*) => {
        $(impl ToValue for $t {
            fn to_value(&self) -> Value {
                Value::Int(*self as i64)
            }
        })*
    };
}

macro_rules! to_value_uint {
    ($($t:ty),*) => {
        $(impl ToValue for $t {
            fn to_value(&self) -> Value {
                Value::UInt(*self as u64)
            }
        })*
    };
}

to_value_int!(i8, i16, i32, i64);
to_value_uint!(u8, u16, u32, u64);

impl ToValue for f32 {
    fn to_value(&self) -> Value {
        Value::Float(*self as f64)
    }
}

impl ToValue for f64 {
    fn to_value(&self) -> Value {
        Value::Float(*self)
    }
}

impl ToValue for bool {
    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }
}

impl ToValue for String {
    fn to_value(&self) -> Value {
        Value::Text(self.clone())
    }
}

impl ToValue for &str {
    fn to_value(&self) -> Value {
        Value::Text((*self).to_string())
    }
}

impl ToValue for Vec<u8> {
    fn to_value(&self) -> Value {
        Value::Bytes(self.clone())
    }
}

impl ToValue for &[u8] {
    fn to_value(&self) -> Value {
        Value::Bytes(self.to_vec())
    }
}

impl ToValue for NaiveDate {
    fn to_value(&self) -> Value {
        Value::Date(*self)
    }
}

impl ToValue for NaiveDateTime {
    fn to_value(&self) -> Value {
        Value::DateTime(*self)
    }
}

impl ToValue for serde_json::Value {
    fn to_value(&self) -> Value {
        Value::Json(self.clone())
    }
}

impl<T: ToValue> ToValue for Option<T> {
    fn to_value(&self) -> Value {
        match self {
            Some(v) => v.to_value(),
            None => Value::Null,
        }
    }
}
