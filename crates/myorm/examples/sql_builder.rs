//! Render statements without touching a database.
//!
//! Run with: `cargo run --example sql_builder`

use myorm::{
    ExecOutcome, Executor, Field, OrmResult, RowSet, Schema, Session, Value, and, or,
};

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

pub static USER: UserSchema = UserSchema {
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

pub static TEAM: TeamSchema = TeamSchema {
    id: Field::new("team", "id").auto_increment(),
    name: Field::new("team", "name"),
};

/// Statements are rendered before execution, so a do-nothing executor is
/// enough to explore the generated SQL.
struct NullExecutor;

impl Executor for NullExecutor {
    async fn execute(&self, _sql: &str, _args: &[Value]) -> OrmResult<ExecOutcome> {
        Ok(ExecOutcome::default())
    }

    async fn query(&self, _sql: &str, _args: &[Value]) -> OrmResult<RowSet> {
        Ok(RowSet::default())
    }
}

fn show(label: &str, rendered: myorm::OrmResult<(String, Vec<Value>)>) {
    let (sql, args) = rendered.expect(label);
    println!("{label}:\n  {sql}\n  args: {args:?}\n");
}

fn main() {
    let session = Session::new(NullExecutor);

    show(
        "select with pagination",
        session
            .table(&USER)
            .select()
            .select_cols(&[USER.id.col(), USER.name.col()])
            .filter(USER.team_id.eq(3))
            .order_by(USER.id.desc())
            .page(2, 25)
            .sql(),
    );

    show(
        "grouped conditions",
        session
            .table(&USER)
            .select()
            .filter(and([
                USER.team_id.gt(0),
                or([USER.name.like("a%"), USER.name.like("b%")]),
            ]))
            .sql(),
    );

    show(
        "join",
        session
            .table(&USER)
            .select()
            .select_cols(&[USER.id.col(), TEAM.name.col()])
            .join(&TEAM, USER.team_id.eq_col(&TEAM.id))
            .filter(TEAM.name.eq("core".into()))
            .sql(),
    );

    let sub = session
        .table(&TEAM)
        .select()
        .select_cols(&[TEAM.id.col()])
        .filter(TEAM.name.like("core%"))
        .sub_query()
        .expect("subquery");
    show(
        "subquery membership",
        session
            .table(&USER)
            .delete()
            .filter(USER.team_id.in_query(sub))
            .sql(),
    );

    show(
        "update",
        session
            .table(&USER)
            .update()
            .set(USER.name.set("renamed".into()))
            .filter(USER.id.eq(10))
            .sql(),
    );
}
