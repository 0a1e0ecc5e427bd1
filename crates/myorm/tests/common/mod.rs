//! Shared test fixtures: an in-memory recording executor and the `user` /
//! `team` schemas used across the integration tests.

// not every test binary touches every fixture
#![allow(dead_code)]

use myorm::{
    Bindings, ColumnInfo, ExecOutcome, Executor, Field, OrmResult, Payload, PayloadBase, RowSet,
    Schema, Value,
};
use std::collections::VecDeque;
use std::sync::Mutex;

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

#[derive(Debug, Default)]
pub struct UserPayload {
    pub base: PayloadBase,
    pub id: i64,
    pub name: String,
    pub team_id: i64,
}

impl Payload for UserPayload {
    fn bind(&mut self) -> Bindings<'_> {
        Bindings::new(&mut self.base)
            .field(&mut self.id, &USER.id)
            .field(&mut self.name, &USER.name)
            .field(&mut self.team_id, &USER.team_id)
    }
}

/// Build the row set the `UserPayload` select list expects.
pub fn user_rows(rows: Vec<(i64, &str, i64)>) -> RowSet {
    RowSet::new(
        vec![
            ColumnInfo::new("id", "BIGINT"),
            ColumnInfo::new("name", "VARCHAR"),
            ColumnInfo::new("team_id", "BIGINT"),
        ],
        rows.into_iter()
            .map(|(id, name, team_id)| {
                vec![
                    Some(id.to_string().into_bytes()),
                    Some(name.as_bytes().to_vec()),
                    Some(team_id.to_string().into_bytes()),
                ]
            })
            .collect(),
    )
}

/// In-memory executor: records every statement and replays canned results.
#[derive(Default)]
pub struct MockExecutor {
    pub results: Mutex<VecDeque<RowSet>>,
    pub outcome: Mutex<ExecOutcome>,
    pub log: Mutex<Vec<(String, Vec<Value>)>>,
}

impl MockExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(rows: RowSet) -> Self {
        let this = Self::default();
        this.results.lock().unwrap().push_back(rows);
        this
    }

    pub fn push_rows(&self, rows: RowSet) {
        self.results.lock().unwrap().push_back(rows);
    }

    pub fn set_outcome(&self, outcome: ExecOutcome) {
        *self.outcome.lock().unwrap() = outcome;
    }

    /// Statements seen so far, oldest first.
    pub fn statements(&self) -> Vec<(String, Vec<Value>)> {
        self.log.lock().unwrap().clone()
    }

    pub fn last_statement(&self) -> (String, Vec<Value>) {
        self.log.lock().unwrap().last().cloned().expect("no statement executed")
    }
}

impl Executor for MockExecutor {
    async fn execute(&self, sql: &str, args: &[Value]) -> OrmResult<ExecOutcome> {
        self.log
            .lock()
            .unwrap()
            .push((sql.to_string(), args.to_vec()));
        Ok(*self.outcome.lock().unwrap())
    }

    async fn query(&self, sql: &str, args: &[Value]) -> OrmResult<RowSet> {
        self.log
            .lock()
            .unwrap()
            .push((sql.to_string(), args.to_vec()));
        Ok(self.results.lock().unwrap().pop_front().unwrap_or_default())
    }
}
