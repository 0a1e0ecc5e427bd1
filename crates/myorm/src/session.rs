//! Session: the execution entry point.
//!
//! A [`Session`] owns (or borrows) an [`Executor`] and hands out statement
//! builders scoped to one table. It is intentionally thin: statements render
//! themselves, the session forwards SQL + args to the driver and logs each
//! execution.

use crate::error::{OrmError, OrmResult};
use crate::executor::{ExecOutcome, Executor};
use crate::expr::Operand;
use crate::payload::Payload;
use crate::row::{FromRow, ToRow};
use crate::scan::RowSet;
use crate::schema::{ColumnRef, Schema};
use crate::stmt::{Stmt, StmtKind};
use crate::value::{ToValue, Value};

/// The entry point: wraps an executor (a connection or a transaction) and
/// builds statements against it.
pub struct Session<E: Executor> {
    db: E,
}

impl<E: Executor> Session<E> {
    pub fn new(db: E) -> Self {
        Self { db }
    }

    /// The wrapped executor.
    pub fn executor(&self) -> &E {
        &self.db
    }

    /// Start building statements against one table.
    pub fn table<'a>(&'a self, schema: &dyn Schema) -> TableRef<'a, E> {
        TableRef {
            session: self,
            table: schema.table_name(),
        }
    }

    /// Escape hatch: a raw SQL statement with `?` placeholders.
    pub fn exec(&self, sql: impl Into<String>) -> RawStmt<'_, E> {
        RawStmt {
            session: self,
            sql: sql.into(),
            args: Vec::new(),
        }
    }

    pub(crate) async fn run_execute(&self, sql: &str, args: &[Value]) -> OrmResult<ExecOutcome> {
        tracing::debug!(target: "myorm::sql", sql = %sql, args = ?args, "exec");
        self.db.execute(sql, args).await
    }

    pub(crate) async fn run_query(&self, sql: &str, args: &[Value]) -> OrmResult<RowSet> {
        tracing::debug!(target: "myorm::sql", sql = %sql, args = ?args, "query");
        self.db.query(sql, args).await
    }
}

/// A statement factory scoped to one table.
pub struct TableRef<'a, E: Executor> {
    session: &'a Session<E>,
    table: &'static str,
}

impl<'a, E: Executor> TableRef<'a, E> {
    /// Start a SELECT. Columns come from `select_cols`, from the payload
    /// terminal, or default to `*`.
    pub fn select(self) -> Stmt<'a, E> {
        Stmt::new(self.session, StmtKind::Select, self.table)
    }

    /// Start an UPDATE with explicit assignments (`Stmt::set`).
    pub fn update(self) -> Stmt<'a, E> {
        Stmt::new(self.session, StmtKind::Update, self.table)
    }

    /// Start an UPDATE carrying exactly the payload's dirty columns.
    ///
    /// A freshly constructed (never-scanned) payload is dirty on every
    /// bound field; a payload populated by a prior select emits only what
    /// changed since. No dirty columns is an error ([`OrmError::EmptyData`]),
    /// surfaced at completion.
    pub fn update_payload(self, payload: &'a mut dyn Payload) -> Stmt<'a, E> {
        let stmt = Stmt::new(self.session, StmtKind::Update, self.table);
        let sets = {
            let mut binds = payload.bind();
            let dirty = binds.dirty();
            binds
                .columns()
                .into_iter()
                .zip(binds.values())
                .zip(dirty)
                .filter(|(_, dirty)| *dirty)
                .map(|((col, value), _)| (col, Operand::Value(value)))
                .collect::<Vec<_>>()
        };
        if sets.is_empty() {
            return stmt.fail(OrmError::EmptyData);
        }
        stmt.set_assignments(sets).set_payloads(vec![payload])
    }

    /// Start a multi-row INSERT from payloads. Auto-increment columns are
    /// skipped and backfilled after execution; all payloads must bind the
    /// same column set.
    pub fn insert_payload(self, payloads: Vec<&'a mut dyn Payload>) -> Stmt<'a, E> {
        self.payload_write("INSERT", payloads)
    }

    /// Like [`TableRef::insert_payload`] with the `REPLACE` verb.
    pub fn replace_payload(self, payloads: Vec<&'a mut dyn Payload>) -> Stmt<'a, E> {
        self.payload_write("REPLACE", payloads)
    }

    fn payload_write(
        self,
        verb: &'static str,
        mut payloads: Vec<&'a mut dyn Payload>,
    ) -> Stmt<'a, E> {
        let stmt = Stmt::new(self.session, StmtKind::Insert, self.table).set_insert_verb(verb);
        if payloads.is_empty() {
            return stmt.fail(OrmError::EmptyData);
        }
        // column identity includes the owning table, so payloads of
        // different schemas never silently batch together
        let mut cols: Vec<ColumnRef> = Vec::new();
        let mut rows: Vec<Vec<Value>> = Vec::new();
        for (i, payload) in payloads.iter_mut().enumerate() {
            let binds = payload.bind();
            let row_cols = binds.insert_columns();
            if i == 0 {
                cols = row_cols;
            } else if row_cols != cols {
                return stmt.fail(OrmError::MismatchedColumns);
            }
            rows.push(binds.insert_values());
        }
        if cols.is_empty() {
            return stmt.fail(OrmError::EmptyData);
        }
        let names = cols.iter().map(|c| c.name).collect();
        stmt.set_insert_rows(names, rows).set_payloads(payloads)
    }

    /// Start a multi-row INSERT from [`ToRow`] row maps (the derive-based
    /// path). `omitempty` fields are already dropped by the row maps; all
    /// rows must end up with the same column set.
    pub fn insert<T: ToRow>(self, rows: &[T]) -> Stmt<'a, E> {
        self.row_write("INSERT", rows)
    }

    /// Like [`TableRef::insert`] with the `REPLACE` verb.
    pub fn replace<T: ToRow>(self, rows: &[T]) -> Stmt<'a, E> {
        self.row_write("REPLACE", rows)
    }

    fn row_write<T: ToRow>(self, verb: &'static str, rows: &[T]) -> Stmt<'a, E> {
        let stmt = Stmt::new(self.session, StmtKind::Insert, self.table).set_insert_verb(verb);
        if rows.is_empty() {
            return stmt.fail(OrmError::EmptyData);
        }
        let mut cols: Vec<&'static str> = Vec::new();
        let mut values: Vec<Vec<Value>> = Vec::new();
        for (i, row) in rows.iter().enumerate() {
            let pairs = row.to_row();
            let row_cols: Vec<&'static str> = pairs.iter().map(|(name, _)| *name).collect();
            if i == 0 {
                cols = row_cols;
            } else if row_cols != cols {
                return stmt.fail(OrmError::MismatchedColumns);
            }
            values.push(pairs.into_iter().map(|(_, value)| value).collect());
        }
        if cols.is_empty() {
            return stmt.fail(OrmError::EmptyData);
        }
        stmt.set_insert_rows(cols, values)
    }

    /// Start a DELETE.
    pub fn delete(self) -> Stmt<'a, E> {
        Stmt::new(self.session, StmtKind::Delete, self.table)
    }
}

/// A raw SQL statement with bound positional arguments.
pub struct RawStmt<'a, E: Executor> {
    session: &'a Session<E>,
    sql: String,
    args: Vec<Value>,
}

impl<'a, E: Executor> RawStmt<'a, E> {
    /// Bind the next `?` argument.
    pub fn bind(mut self, value: impl ToValue) -> Self {
        self.args.push(value.to_value());
        self
    }

    /// Execute as a write statement.
    pub async fn execute(self) -> OrmResult<ExecOutcome> {
        self.session.run_execute(&self.sql, &self.args).await
    }

    /// Execute as a query, handing back the raw rows.
    pub async fn rows(self) -> OrmResult<RowSet> {
        self.session.run_query(&self.sql, &self.args).await
    }

    /// Execute as a query and map rows through [`FromRow`].
    pub async fn fetch_all<T: FromRow>(self) -> OrmResult<Vec<T>> {
        let rows = self.rows().await?;
        rows.iter().map(|row| T::from_row(&row)).collect()
    }

    /// Execute as a query and map the first row, if any.
    pub async fn fetch_opt<T: FromRow>(self) -> OrmResult<Option<T>> {
        let rows = self.rows().await?;
        rows.first().map(|row| T::from_row(&row)).transpose()
    }

    /// Execute as a query requiring one row.
    pub async fn fetch_one<T: FromRow>(self) -> OrmResult<T> {
        self.fetch_opt()
            .await?
            .ok_or_else(|| OrmError::not_found("expected one row, got none"))
    }
}
