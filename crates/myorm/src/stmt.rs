//! The fluent statement builder.
//!
//! A [`Stmt`] accumulates clauses and assembles them in fixed order at
//! completion: base clause, joins, WHERE, GROUP BY, ORDER BY, LIMIT,
//! OFFSET. Build-time failures are sticky: once recorded, further chained
//! calls are inert and the error is returned from the terminal call, so
//! fluent chains never have to branch mid-way.

use crate::error::{OrmError, OrmResult};
use crate::expr::{Cond, GroupOp, Operand, SubQuery};
use crate::executor::{ExecOutcome, Executor};
use crate::ident::write_quoted;
use crate::payload::Payload;
use crate::row::FromRow;
use crate::scan::RowSet;
use crate::schema::{ColumnRef, Order, Schema};
use crate::session::Session;
use crate::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StmtKind {
    Select,
    Update,
    Delete,
    Insert,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum JoinKind {
    Plain,
    Inner,
    Left,
    Right,
}

impl JoinKind {
    fn keyword(self) -> &'static str {
        match self {
            JoinKind::Plain => "JOIN",
            JoinKind::Inner => "INNER JOIN",
            JoinKind::Left => "LEFT JOIN",
            JoinKind::Right => "RIGHT JOIN",
        }
    }
}

struct Join {
    kind: JoinKind,
    table: &'static str,
    on: Cond,
}

/// A statement being built against one table.
///
/// Not reusable across executions and not safe for concurrent mutation;
/// each logical query gets its own builder.
pub struct Stmt<'a, E: Executor> {
    session: &'a Session<E>,
    kind: StmtKind,
    table: &'static str,
    err: Option<OrmError>,
    joins: Vec<Join>,
    conds: Vec<Cond>,
    orders: Vec<Order>,
    groups: Vec<ColumnRef>,
    sets: Vec<(ColumnRef, Operand)>,
    select_cols: Vec<ColumnRef>,
    insert_verb: &'static str,
    insert_cols: Vec<&'static str>,
    insert_rows: Vec<Vec<Value>>,
    payloads: Vec<&'a mut dyn Payload>,
    limit: Option<i64>,
    offset: Option<i64>,
}

impl<'a, E: Executor> Stmt<'a, E> {
    pub(crate) fn new(session: &'a Session<E>, kind: StmtKind, table: &'static str) -> Self {
        Self {
            session,
            kind,
            table,
            err: None,
            joins: Vec::new(),
            conds: Vec::new(),
            orders: Vec::new(),
            groups: Vec::new(),
            sets: Vec::new(),
            select_cols: Vec::new(),
            insert_verb: "INSERT",
            insert_cols: Vec::new(),
            insert_rows: Vec::new(),
            payloads: Vec::new(),
            limit: None,
            offset: None,
        }
    }

    pub(crate) fn fail(mut self, err: OrmError) -> Self {
        if self.err.is_none() {
            self.err = Some(err);
        }
        self
    }

    pub(crate) fn set_insert_verb(mut self, verb: &'static str) -> Self {
        self.insert_verb = verb;
        self
    }

    pub(crate) fn set_insert_rows(
        mut self,
        cols: Vec<&'static str>,
        rows: Vec<Vec<Value>>,
    ) -> Self {
        self.insert_cols = cols;
        self.insert_rows = rows;
        self
    }

    pub(crate) fn set_payloads(mut self, payloads: Vec<&'a mut dyn Payload>) -> Self {
        self.payloads = payloads;
        self
    }

    pub(crate) fn set_assignments(mut self, sets: Vec<(ColumnRef, Operand)>) -> Self {
        self.sets = sets;
        self
    }

    // ==================== chainable clauses ====================

    /// Append one predicate. Successive calls AND together; passing a group
    /// built with [`and`](crate::expr::and) renders identically to the same
    /// conditions passed across calls.
    pub fn filter(mut self, cond: Cond) -> Self {
        if self.err.is_some() {
            return self;
        }
        self.conds.push(cond);
        self
    }

    /// Append an ORDER BY entry.
    pub fn order_by(mut self, order: Order) -> Self {
        if self.err.is_some() {
            return self;
        }
        self.orders.push(order);
        self
    }

    /// Append a GROUP BY column.
    pub fn group_by(mut self, col: ColumnRef) -> Self {
        if self.err.is_some() {
            return self;
        }
        self.groups.push(col);
        self
    }

    /// Set LIMIT; the last call wins.
    pub fn limit(mut self, n: i64) -> Self {
        if self.err.is_some() {
            return self;
        }
        self.limit = Some(n);
        self
    }

    /// Set OFFSET; the last call wins. An offset of zero renders no OFFSET
    /// clause.
    pub fn offset(mut self, n: i64) -> Self {
        if self.err.is_some() {
            return self;
        }
        self.offset = Some(n);
        self
    }

    /// Pagination: `page` is 1-based (lower values clamp to 1), limit is
    /// `size`, offset is `(page - 1) * size`.
    pub fn page(mut self, page: i64, size: i64) -> Self {
        if self.err.is_some() {
            return self;
        }
        let page = page.max(1);
        self.limit = Some(size);
        self.offset = Some((page - 1) * size);
        self
    }

    /// Append explicit select columns.
    pub fn select_cols(mut self, cols: &[ColumnRef]) -> Self {
        if self.err.is_some() {
            return self;
        }
        self.select_cols.extend_from_slice(cols);
        self
    }

    fn join_kind(mut self, kind: JoinKind, schema: &dyn Schema, on: Cond) -> Self {
        if self.err.is_some() {
            return self;
        }
        self.joins.push(Join {
            kind,
            table: schema.table_name(),
            on,
        });
        self
    }

    /// Append a plain `JOIN <table> ON <cond>`.
    pub fn join(self, schema: &dyn Schema, on: Cond) -> Self {
        self.join_kind(JoinKind::Plain, schema, on)
    }

    /// Append an `INNER JOIN`.
    pub fn inner_join(self, schema: &dyn Schema, on: Cond) -> Self {
        self.join_kind(JoinKind::Inner, schema, on)
    }

    /// Append a `LEFT JOIN`.
    pub fn left_join(self, schema: &dyn Schema, on: Cond) -> Self {
        self.join_kind(JoinKind::Left, schema, on)
    }

    /// Append a `RIGHT JOIN`.
    pub fn right_join(self, schema: &dyn Schema, on: Cond) -> Self {
        self.join_kind(JoinKind::Right, schema, on)
    }

    /// Append an assignment to the SET list. Only valid on UPDATE
    /// statements; elsewhere the error is recorded and surfaced at
    /// completion, keeping the chain uninterrupted.
    pub fn set(mut self, assignment: Cond) -> Self {
        if self.err.is_some() {
            return self;
        }
        if self.kind != StmtKind::Update {
            self.err = Some(OrmError::InvalidSet);
            return self;
        }
        match assignment {
            Cond::Compare {
                left: Operand::Column(col),
                op: "=",
                right,
            } => self.sets.push((col, right)),
            _ => self.err = Some(OrmError::InvalidSet),
        }
        self
    }

    // ==================== rendering ====================

    fn prepare(&mut self) -> OrmResult<()> {
        if let Some(err) = self.err.take() {
            return Err(err);
        }
        if self.table.is_empty() {
            return Err(OrmError::TableNotSet);
        }
        Ok(())
    }

    fn where_clause(&self, sql: &mut String, args: &mut Vec<Value>) {
        if self.conds.is_empty() {
            return;
        }
        let rendered = if self.conds.len() == 1 {
            self.conds[0].build(args)
        } else {
            Cond::Group {
                op: GroupOp::And,
                items: self.conds.clone(),
            }
            .build(args)
        };
        // an all-empty group (e.g. and([])) contributes no WHERE at all
        if rendered.is_empty() {
            return;
        }
        sql.push_str(" WHERE ");
        sql.push_str(&rendered);
    }

    fn group_clause(&self, sql: &mut String) {
        if self.groups.is_empty() {
            return;
        }
        sql.push_str(" GROUP BY ");
        for (i, col) in self.groups.iter().enumerate() {
            if i > 0 {
                sql.push_str(", ");
            }
            col.write_qualified(sql);
        }
    }

    fn order_clause(&self, sql: &mut String) {
        if self.orders.is_empty() {
            return;
        }
        sql.push_str(" ORDER BY ");
        for (i, order) in self.orders.iter().enumerate() {
            if i > 0 {
                sql.push_str(", ");
            }
            order.col.write_qualified(sql);
            if order.desc {
                sql.push_str(" DESC");
            }
        }
    }

    fn limit_offset_clause(&self, sql: &mut String, args: &mut Vec<Value>) {
        if let Some(limit) = self.limit {
            sql.push_str(" LIMIT ?");
            args.push(Value::Int(limit));
        }
        if let Some(offset) = self.offset {
            if offset > 0 {
                sql.push_str(" OFFSET ?");
                args.push(Value::Int(offset));
            }
        }
    }

    fn build_select(&self, is_count: bool) -> (String, Vec<Value>) {
        let mut sql = String::from("SELECT ");
        let mut args = Vec::new();

        if is_count {
            sql.push_str("COUNT(*)");
        } else if self.select_cols.is_empty() {
            sql.push('*');
        } else {
            // column references switch to table-qualified once a join is in
            // play; unqualified otherwise
            let qualified = !self.joins.is_empty();
            for (i, col) in self.select_cols.iter().enumerate() {
                if i > 0 {
                    sql.push_str(", ");
                }
                if qualified {
                    col.write_qualified(&mut sql);
                } else {
                    col.write_bare(&mut sql);
                }
            }
        }

        sql.push_str(" FROM ");
        write_quoted(&mut sql, self.table);

        for join in &self.joins {
            sql.push(' ');
            sql.push_str(join.kind.keyword());
            sql.push(' ');
            write_quoted(&mut sql, join.table);
            sql.push_str(" ON ");
            sql.push_str(&join.on.build(&mut args));
        }

        self.where_clause(&mut sql, &mut args);
        self.group_clause(&mut sql);
        if !is_count {
            self.order_clause(&mut sql);
            self.limit_offset_clause(&mut sql, &mut args);
        }

        (sql, args)
    }

    fn build_update(&self) -> OrmResult<(String, Vec<Value>)> {
        if self.sets.is_empty() {
            return Err(OrmError::EmptyData);
        }
        let mut sql = String::from("UPDATE ");
        let mut args = Vec::new();
        write_quoted(&mut sql, self.table);
        sql.push_str(" SET ");
        for (i, (col, value)) in self.sets.iter().enumerate() {
            if i > 0 {
                sql.push_str(", ");
            }
            col.write_bare(&mut sql);
            sql.push_str(" = ");
            sql.push_str(&value.build(&mut args));
        }
        self.where_clause(&mut sql, &mut args);
        self.group_clause(&mut sql);
        self.order_clause(&mut sql);
        self.limit_offset_clause(&mut sql, &mut args);
        Ok((sql, args))
    }

    fn build_delete(&self) -> (String, Vec<Value>) {
        let mut sql = String::from("DELETE FROM ");
        let mut args = Vec::new();
        write_quoted(&mut sql, self.table);
        self.where_clause(&mut sql, &mut args);
        self.limit_offset_clause(&mut sql, &mut args);
        (sql, args)
    }

    fn build_insert(&self) -> OrmResult<(String, Vec<Value>)> {
        if self.insert_rows.is_empty() || self.insert_cols.is_empty() {
            return Err(OrmError::EmptyData);
        }
        let mut sql = String::from(self.insert_verb);
        sql.push_str(" INTO ");
        write_quoted(&mut sql, self.table);
        sql.push_str(" (");
        for (i, col) in self.insert_cols.iter().enumerate() {
            if i > 0 {
                sql.push_str(", ");
            }
            write_quoted(&mut sql, col);
        }
        sql.push_str(") VALUES ");
        let mut args = Vec::with_capacity(self.insert_rows.len() * self.insert_cols.len());
        for (i, row) in self.insert_rows.iter().enumerate() {
            if i > 0 {
                sql.push(',');
            }
            sql.push('(');
            for (j, value) in row.iter().enumerate() {
                if j > 0 {
                    sql.push(',');
                }
                sql.push('?');
                args.push(value.clone());
            }
            sql.push(')');
        }
        Ok((sql, args))
    }

    fn complete(&mut self) -> OrmResult<(String, Vec<Value>)> {
        self.prepare()?;
        match self.kind {
            StmtKind::Select => Ok(self.build_select(false)),
            StmtKind::Update => self.build_update(),
            StmtKind::Delete => Ok(self.build_delete()),
            StmtKind::Insert => self.build_insert(),
        }
    }

    // ==================== terminals ====================

    /// Render the statement as `(sql, args)` without executing it.
    pub fn sql(mut self) -> OrmResult<(String, Vec<Value>)> {
        self.complete()
    }

    /// Render the select for use as a subquery operand.
    pub fn sub_query(mut self) -> OrmResult<SubQuery> {
        self.prepare()?;
        let (sql, args) = self.build_select(false);
        Ok(SubQuery::new(sql, args))
    }

    /// Execute a write statement. For payload-driven inserts the
    /// auto-increment keys are backfilled (consecutively, row-major) and
    /// the payload baselines snapshot; payload-driven updates snapshot as
    /// well, so a following update emits only new changes.
    pub async fn execute(mut self) -> OrmResult<ExecOutcome> {
        let kind = self.kind;
        let mut payloads = std::mem::take(&mut self.payloads);
        let (sql, args) = self.complete()?;
        let outcome = self.session.run_execute(&sql, &args).await?;
        match kind {
            StmtKind::Insert => {
                for (i, payload) in payloads.iter_mut().enumerate() {
                    let mut binds = payload.bind();
                    if outcome.last_insert_id != 0 {
                        binds.backfill_auto_increment(outcome.last_insert_id + i as i64)?;
                    }
                    binds.snapshot();
                }
            }
            StmtKind::Update => {
                for payload in payloads.iter_mut() {
                    payload.bind().snapshot();
                }
            }
            _ => {}
        }
        Ok(outcome)
    }

    /// Query one row into the payload (forces LIMIT 1). Returns whether a
    /// row was found; zero rows leave the payload untouched and are not an
    /// error.
    pub async fn take_payload(mut self, payload: &mut dyn Payload) -> OrmResult<bool> {
        self.limit = Some(1);
        {
            let binds = payload.bind();
            if binds.is_empty() {
                return Err(OrmError::EmptyData);
            }
            self.select_cols = binds.columns();
        }
        let (sql, args) = self.complete()?;
        let rows = self.session.run_query(&sql, &args).await?;
        match rows.first() {
            Some(row) => {
                payload.bind().scan(&row)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Query all rows, one payload per row.
    pub async fn find_payload<P: Payload + Default>(mut self) -> OrmResult<Vec<P>> {
        {
            let mut probe = P::default();
            let binds = probe.bind();
            if binds.is_empty() {
                return Err(OrmError::EmptyData);
            }
            self.select_cols = binds.columns();
        }
        let (sql, args) = self.complete()?;
        let rows = self.session.run_query(&sql, &args).await?;
        let mut out = Vec::with_capacity(rows.len());
        for row in rows.iter() {
            let mut payload = P::default();
            payload.bind().scan(&row)?;
            out.push(payload);
        }
        Ok(out)
    }

    /// Query and map all rows through the name-based [`FromRow`] binder.
    pub async fn fetch_all<T: FromRow>(mut self) -> OrmResult<Vec<T>> {
        let (sql, args) = self.complete()?;
        let rows = self.session.run_query(&sql, &args).await?;
        rows.iter().map(|row| T::from_row(&row)).collect()
    }

    /// Query at most one row (forces LIMIT 1); `None` when absent.
    pub async fn fetch_opt<T: FromRow>(mut self) -> OrmResult<Option<T>> {
        self.limit = Some(1);
        let (sql, args) = self.complete()?;
        let rows = self.session.run_query(&sql, &args).await?;
        rows.first().map(|row| T::from_row(&row)).transpose()
    }

    /// Query exactly one row; absence is a [`OrmError::NotFound`].
    pub async fn fetch_one<T: FromRow>(self) -> OrmResult<T> {
        self.fetch_opt()
            .await?
            .ok_or_else(|| OrmError::not_found("expected one row, got none"))
    }

    /// Rewrite the select as `SELECT COUNT(*)` (order and pagination
    /// dropped) and return the count.
    pub async fn count(mut self) -> OrmResult<i64> {
        self.prepare()?;
        let (sql, args) = self.build_select(true);
        let rows = self.session.run_query(&sql, &args).await?;
        match rows.first().and_then(|row| row.get(0)) {
            Some(cell) => cell.to_i64(),
            None => Ok(0),
        }
    }

    /// Execute the query and hand back the raw materialized rows.
    pub async fn rows(mut self) -> OrmResult<RowSet> {
        let (sql, args) = self.complete()?;
        self.session.run_query(&sql, &args).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::and;
    use crate::payload::{Bindings, PayloadBase};
    use crate::schema::Field;
    use crate::session::Session;

    struct NoopExec;

    impl Executor for NoopExec {
        async fn execute(&self, _sql: &str, _args: &[Value]) -> OrmResult<ExecOutcome> {
            Ok(ExecOutcome::default())
        }

        async fn query(&self, _sql: &str, _args: &[Value]) -> OrmResult<RowSet> {
            Ok(RowSet::default())
        }
    }

    pub struct UserSchema {
        pub id: Field<i64>,
        pub name: Field<String>,
        pub team_id: Field<i64>,
    }

    impl Schema for UserSchema {
        fn table_name(&self) -> &'static str {
            "user"
        }
    }

    static USER: UserSchema = UserSchema {
        id: Field::new("user", "id").auto_increment(),
        name: Field::new("user", "name"),
        team_id: Field::new("user", "team_id"),
    };

    pub struct TeamSchema {
        pub id: Field<i64>,
        pub name: Field<String>,
    }

    impl Schema for TeamSchema {
        fn table_name(&self) -> &'static str {
            "team"
        }
    }

    static TEAM: TeamSchema = TeamSchema {
        id: Field::new("team", "id").auto_increment(),
        name: Field::new("team", "name"),
    };

    #[derive(Default)]
    struct UserPayload {
        base: PayloadBase,
        id: i64,
        name: String,
    }

    impl Payload for UserPayload {
        fn bind(&mut self) -> Bindings<'_> {
            Bindings::new(&mut self.base)
                .field(&mut self.id, &USER.id)
                .field(&mut self.name, &USER.name)
        }
    }

    #[derive(Default)]
    struct TeamPayload {
        base: PayloadBase,
        id: i64,
        name: String,
    }

    impl Payload for TeamPayload {
        fn bind(&mut self) -> Bindings<'_> {
            Bindings::new(&mut self.base)
                .field(&mut self.id, &TEAM.id)
                .field(&mut self.name, &TEAM.name)
        }
    }

    fn session() -> Session<NoopExec> {
        Session::new(NoopExec)
    }

    #[test]
    fn select_golden() {
        let s = session();
        let (sql, args) = s
            .table(&USER)
            .select()
            .select_cols(&[USER.id.col(), USER.name.col()])
            .filter(USER.id.eq(10))
            .limit(1)
            .sql()
            .unwrap();
        assert_eq!(
            sql,
            "SELECT `id`, `name` FROM `user` WHERE `user`.`id` = ? LIMIT ?"
        );
        assert_eq!(args, vec![Value::Int(10), Value::Int(1)]);
    }

    #[test]
    fn select_star_without_columns() {
        let s = session();
        let (sql, args) = s.table(&USER).select().sql().unwrap();
        assert_eq!(sql, "SELECT * FROM `user`");
        assert!(args.is_empty());
    }

    #[test]
    fn delete_golden() {
        let s = session();
        let (sql, args) = s
            .table(&USER)
            .delete()
            .filter(USER.id.in_list([9, 10]))
            .sql()
            .unwrap();
        assert_eq!(sql, "DELETE FROM `user` WHERE `user`.`id` IN (?,?)");
        assert_eq!(args, vec![Value::Int(9), Value::Int(10)]);
    }

    #[test]
    fn filter_accumulation_matches_explicit_group() {
        let s = session();
        let chained = s
            .table(&USER)
            .select()
            .filter(USER.id.gt(1))
            .filter(USER.name.eq("a".into()))
            .sql()
            .unwrap();
        let grouped = s
            .table(&USER)
            .select()
            .filter(and([USER.id.gt(1), USER.name.eq("a".into())]))
            .sql()
            .unwrap();
        assert_eq!(chained, grouped);
        assert_eq!(
            chained.0,
            "SELECT * FROM `user` WHERE (`user`.`id` > ? AND `user`.`name` = ?)"
        );
    }

    #[test]
    fn single_filter_renders_bare() {
        let s = session();
        let (sql, _) = s.table(&USER).select().filter(USER.id.eq(1)).sql().unwrap();
        assert_eq!(sql, "SELECT * FROM `user` WHERE `user`.`id` = ?");
    }

    #[test]
    fn empty_group_filter_renders_no_where() {
        let s = session();
        let (sql, args) = s.table(&USER).select().filter(and([])).sql().unwrap();
        assert_eq!(sql, "SELECT * FROM `user`");
        assert!(args.is_empty());
    }

    #[test]
    fn page_one_renders_limit_only() {
        let s = session();
        let (sql, args) = s.table(&USER).select().page(1, 10).sql().unwrap();
        assert_eq!(sql, "SELECT * FROM `user` LIMIT ?");
        assert_eq!(args, vec![Value::Int(10)]);
    }

    #[test]
    fn page_two_renders_limit_and_offset() {
        let s = session();
        let (sql, args) = s.table(&USER).select().page(2, 10).sql().unwrap();
        assert_eq!(sql, "SELECT * FROM `user` LIMIT ? OFFSET ?");
        assert_eq!(args, vec![Value::Int(10), Value::Int(10)]);
    }

    #[test]
    fn page_zero_clamps_to_one() {
        let s = session();
        let clamped = s.table(&USER).select().page(0, 10).sql().unwrap();
        let first = s.table(&USER).select().page(1, 10).sql().unwrap();
        assert_eq!(clamped, first);
    }

    #[test]
    fn explicit_zero_offset_is_dropped() {
        let s = session();
        let (sql, args) = s.table(&USER).select().limit(5).offset(0).sql().unwrap();
        assert_eq!(sql, "SELECT * FROM `user` LIMIT ?");
        assert_eq!(args, vec![Value::Int(5)]);
    }

    #[test]
    fn order_and_group_render_qualified() {
        let s = session();
        let (sql, args) = s
            .table(&USER)
            .select()
            .group_by(USER.team_id.col())
            .order_by(USER.id.desc())
            .order_by(USER.name.asc())
            .sql()
            .unwrap();
        assert_eq!(
            sql,
            "SELECT * FROM `user` GROUP BY `user`.`team_id` ORDER BY `user`.`id` DESC, `user`.`name`"
        );
        assert!(args.is_empty());
    }

    #[test]
    fn clause_order_is_fixed() {
        let s = session();
        let (sql, args) = s
            .table(&USER)
            .select()
            .offset(20)
            .limit(10)
            .order_by(USER.id.asc())
            .group_by(USER.team_id.col())
            .filter(USER.id.gt(0))
            .sql()
            .unwrap();
        assert_eq!(
            sql,
            "SELECT * FROM `user` WHERE `user`.`id` > ? GROUP BY `user`.`team_id` ORDER BY `user`.`id` LIMIT ? OFFSET ?"
        );
        assert_eq!(args, vec![Value::Int(0), Value::Int(10), Value::Int(20)]);
    }

    #[test]
    fn join_qualifies_select_list() {
        let s = session();
        let (sql, args) = s
            .table(&USER)
            .select()
            .select_cols(&[USER.id.col(), USER.name.col()])
            .join(&TEAM, USER.team_id.eq_col(&TEAM.id))
            .filter(TEAM.name.eq("core".into()))
            .sql()
            .unwrap();
        assert_eq!(
            sql,
            "SELECT `user`.`id`, `user`.`name` FROM `user` JOIN `team` ON `user`.`team_id` = `team`.`id` WHERE `team`.`name` = ?"
        );
        assert_eq!(args, vec![Value::Text("core".into())]);
    }

    #[test]
    fn left_join_keyword() {
        let s = session();
        let (sql, _) = s
            .table(&USER)
            .select()
            .left_join(&TEAM, USER.team_id.eq_col(&TEAM.id))
            .sql()
            .unwrap();
        assert!(sql.contains("LEFT JOIN `team` ON"));
    }

    #[test]
    fn join_args_precede_where_args() {
        let s = session();
        let (sql, args) = s
            .table(&USER)
            .select()
            .join(&TEAM, and([USER.team_id.eq_col(&TEAM.id), TEAM.id.gt(5)]))
            .filter(USER.id.eq(1))
            .sql()
            .unwrap();
        assert_eq!(sql.matches('?').count(), args.len());
        assert_eq!(args, vec![Value::Int(5), Value::Int(1)]);
    }

    #[test]
    fn update_with_explicit_sets() {
        let s = session();
        let (sql, args) = s
            .table(&USER)
            .update()
            .set(USER.name.set("archever".into()))
            .filter(USER.id.eq(10))
            .sql()
            .unwrap();
        assert_eq!(
            sql,
            "UPDATE `user` SET `name` = ? WHERE `user`.`id` = ?"
        );
        assert_eq!(
            args,
            vec![Value::Text("archever".into()), Value::Int(10)]
        );
    }

    #[test]
    fn update_without_sets_is_empty_data() {
        let s = session();
        let err = s
            .table(&USER)
            .update()
            .filter(USER.id.eq(10))
            .sql()
            .unwrap_err();
        assert!(matches!(err, OrmError::EmptyData));
    }

    #[test]
    fn set_on_select_fails_late() {
        let s = session();
        // the chain itself must not report anything...
        let stmt = s.table(&USER).select().set(USER.name.set("x".into())).limit(1);
        // ...the terminal call does
        let err = stmt.sql().unwrap_err();
        assert!(matches!(err, OrmError::InvalidSet));
    }

    #[test]
    fn insert_payload_batches_rows() {
        let s = session();
        let mut a = UserPayload {
            name: "archever1".into(),
            ..Default::default()
        };
        let mut b = UserPayload {
            name: "archever2".into(),
            ..Default::default()
        };
        let (sql, args) = s
            .table(&USER)
            .insert_payload(vec![&mut a, &mut b])
            .sql()
            .unwrap();
        assert_eq!(sql, "INSERT INTO `user` (`name`) VALUES (?),(?)");
        assert_eq!(
            args,
            vec![
                Value::Text("archever1".into()),
                Value::Text("archever2".into())
            ]
        );
    }

    #[test]
    fn insert_payload_mismatched_columns() {
        let s = session();
        let mut a = UserPayload::default();
        let mut b = TeamPayload::default();
        let err = s
            .table(&USER)
            .insert_payload(vec![&mut a, &mut b])
            .sql()
            .unwrap_err();
        assert!(matches!(err, OrmError::MismatchedColumns));
    }

    #[test]
    fn insert_payload_empty_is_empty_data() {
        let s = session();
        let err = s.table(&USER).insert_payload(vec![]).sql().unwrap_err();
        assert!(matches!(err, OrmError::EmptyData));
    }

    #[test]
    fn update_payload_fresh_emits_all_fields() {
        let s = session();
        let mut p = UserPayload {
            id: 3,
            name: "archever".into(),
            ..Default::default()
        };
        let (sql, args) = s
            .table(&USER)
            .update_payload(&mut p)
            .filter(USER.id.eq(3))
            .sql()
            .unwrap();
        assert_eq!(
            sql,
            "UPDATE `user` SET `id` = ?, `name` = ? WHERE `user`.`id` = ?"
        );
        assert_eq!(
            args,
            vec![
                Value::Int(3),
                Value::Text("archever".into()),
                Value::Int(3)
            ]
        );
    }

    #[test]
    fn subquery_round_trip() {
        let s = session();
        let sub = s
            .table(&USER)
            .select()
            .select_cols(&[USER.id.col()])
            .filter(USER.name.eq("name".into()))
            .sub_query()
            .unwrap();
        let (sql, args) = s
            .table(&USER)
            .select()
            .filter(USER.id.eq_query(sub))
            .limit(1)
            .sql()
            .unwrap();
        assert_eq!(
            sql,
            "SELECT * FROM `user` WHERE `user`.`id` = (SELECT `id` FROM `user` WHERE `user`.`name` = ?) LIMIT ?"
        );
        assert_eq!(args, vec![Value::Text("name".into()), Value::Int(1)]);
    }

    #[test]
    fn in_query_subquery() {
        let s = session();
        let sub = s
            .table(&TEAM)
            .select()
            .select_cols(&[TEAM.id.col()])
            .filter(TEAM.name.like("core%"))
            .sub_query()
            .unwrap();
        let (sql, args) = s
            .table(&USER)
            .delete()
            .filter(USER.team_id.in_query(sub))
            .sql()
            .unwrap();
        assert_eq!(
            sql,
            "DELETE FROM `user` WHERE `user`.`team_id` IN (SELECT `id` FROM `team` WHERE `team`.`name` LIKE ?)"
        );
        assert_eq!(args, vec![Value::Text("core%".into())]);
    }

    #[test]
    fn placeholder_count_matches_args_everywhere() {
        let s = session();
        let (sql, args) = s
            .table(&USER)
            .select()
            .filter(USER.id.in_list([1, 2, 3]))
            .filter(USER.name.ne("x".into()))
            .page(3, 25)
            .sql()
            .unwrap();
        assert_eq!(sql.matches('?').count(), args.len());
        assert_eq!(
            args,
            vec![
                Value::Int(1),
                Value::Int(2),
                Value::Int(3),
                Value::Text("x".into()),
                Value::Int(25),
                Value::Int(50)
            ]
        );
    }
}
