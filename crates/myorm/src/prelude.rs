//! Convenience re-exports for the common path.
//!
//! ```ignore
//! use myorm::prelude::*;
//! ```

pub use crate::error::{OrmError, OrmResult};
pub use crate::executor::{ExecOutcome, Executor, Transaction, with_transaction};
pub use crate::expr::{and, or};
pub use crate::payload::{Bindings, Payload, PayloadBase};
pub use crate::row::{FromRow, RowExt, ToRow};
pub use crate::schema::{Field, Schema};
pub use crate::session::Session;
pub use crate::value::{ToValue, Value};

#[cfg(feature = "derive")]
pub use myorm_derive::{FromRow, ToRow};
