//! The driver contract.
//!
//! This layer consumes a database driver, it never implements one. Anything
//! that can run parameterized SQL — a plain connection, a pooled handle, a
//! transaction, a test double — implements [`Executor`]. Cancellation is
//! dropping the returned future; deadlines belong to the caller.

use crate::error::{OrmError, OrmResult};
use crate::scan::RowSet;
use crate::value::Value;

/// Outcome of a write statement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecOutcome {
    /// First auto-generated id of the statement, 0 when none.
    pub last_insert_id: i64,
    /// Number of rows the statement affected.
    pub rows_affected: i64,
}

/// A handle able to execute parameterized SQL.
///
/// Both plain connections and transaction handles satisfy this, so
/// statement-building code composes with either. Driver errors are passed
/// through unwrapped (as [`OrmError::Driver`]); no retry or backoff lives
/// here.
pub trait Executor: Send + Sync {
    /// Run a write statement and report its outcome.
    fn execute(
        &self,
        sql: &str,
        args: &[Value],
    ) -> impl std::future::Future<Output = OrmResult<ExecOutcome>> + Send;

    /// Run a query and materialize its rows.
    fn query(
        &self,
        sql: &str,
        args: &[Value],
    ) -> impl std::future::Future<Output = OrmResult<RowSet>> + Send;
}

impl<E: Executor> Executor for &E {
    fn execute(
        &self,
        sql: &str,
        args: &[Value],
    ) -> impl std::future::Future<Output = OrmResult<ExecOutcome>> + Send {
        (*self).execute(sql, args)
    }

    fn query(
        &self,
        sql: &str,
        args: &[Value],
    ) -> impl std::future::Future<Output = OrmResult<RowSet>> + Send {
        (*self).query(sql, args)
    }
}

/// A transaction handle: an [`Executor`] that can be resolved.
///
/// `commit` and `rollback` consume the handle; an unresolved transaction is
/// the driver's business (typically rolled back on drop).
pub trait Transaction: Executor + Sized {
    fn commit(self) -> impl std::future::Future<Output = OrmResult<()>> + Send;
    fn rollback(self) -> impl std::future::Future<Output = OrmResult<()>> + Send;
}

/// Run `body` inside a transaction.
///
/// Commits on `Ok`, rolls back on `Err`. If the rollback itself fails, both
/// errors are returned together with the triggering error preserved as the
/// source.
pub async fn with_transaction<Tx, T, F>(tx: Tx, body: F) -> OrmResult<T>
where
    Tx: Transaction,
    F: AsyncFnOnce(&Tx) -> OrmResult<T>,
{
    match body(&tx).await {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(error) => match tx.rollback().await {
            Ok(()) => Err(error),
            Err(rollback_err) => Err(OrmError::Rollback {
                source: Box::new(error),
                rollback: rollback_err.to_string(),
            }),
        },
    }
}
