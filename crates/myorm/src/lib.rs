//! # myorm
//!
//! A typed SQL builder and row mapper for MySQL-style databases
//! (`?` placeholders, backtick identifiers).
//!
//! ## Features
//!
//! - **Typed schemas**: declare tables once as `static`s of [`Field`]s;
//!   comparisons are type-checked at compile time
//! - **Fluent statements**: select / insert / update / delete / join /
//!   subquery, rendered to parameterized SQL plus an ordered argument list
//! - **Payload binding**: scan rows straight into your structs and track
//!   dirty columns, so updates only emit what actually changed
//! - **Driver-agnostic**: anything implementing [`Executor`] runs the SQL —
//!   a connection, a transaction handle, or a test double
//! - **Fail-late building**: build errors stick to the statement and
//!   surface at execution, keeping chains uninterrupted
//!
//! ## Example
//!
//! ```ignore
//! use myorm::{Field, Schema, Session};
//!
//! pub struct UserSchema {
//!     pub id: Field<i64>,
//!     pub name: Field<String>,
//! }
//!
//! impl Schema for UserSchema {
//!     fn table_name(&self) -> &'static str { "user" }
//! }
//!
//! pub static USER: UserSchema = UserSchema {
//!     id: Field::new("user", "id").auto_increment(),
//!     name: Field::new("user", "name"),
//! };
//!
//! # async fn demo(db: impl myorm::Executor) -> myorm::OrmResult<()> {
//! let session = Session::new(db);
//! let mut user = UserPayload::default();
//! let found = session
//!     .table(&USER)
//!     .select()
//!     .filter(USER.id.eq(10))
//!     .take_payload(&mut user)
//!     .await?;
//!
//! user.name = "archever".to_string();
//! session
//!     .table(&USER)
//!     .update_payload(&mut user)
//!     .filter(USER.id.eq(10))
//!     .execute()
//!     .await?;
//! # Ok(()) }
//! ```

pub mod error;
pub mod executor;
pub mod expr;
pub mod ident;
pub mod payload;
pub mod row;
pub mod scan;
pub mod schema;
pub mod session;
pub mod stmt;
pub mod value;

pub mod prelude;

pub use error::{OrmError, OrmResult};
pub use executor::{ExecOutcome, Executor, Transaction, with_transaction};
pub use expr::{Cond, Operand, SubQuery, and, or, raw};
pub use payload::{BindValue, Bindings, Payload, PayloadBase};
pub use row::{FromRow, RowExt, ToRow};
pub use scan::{ColumnInfo, FromScanRow, RowSet, RowView, ScanRow};
pub use schema::{ColumnRef, Field, FieldGroup, Order, Schema};
pub use session::{RawStmt, Session, TableRef};
pub use stmt::Stmt;
pub use value::{ToValue, Value, json_value};

#[cfg(feature = "derive")]
pub use myorm_derive::{FromRow, ToRow};
