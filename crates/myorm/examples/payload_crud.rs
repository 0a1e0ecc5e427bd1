//! Payload round-trip against a toy in-memory executor: insert with key
//! backfill, select into a payload, dirty-tracked update.
//!
//! Run with: `cargo run --example payload_crud`

use myorm::{
    Bindings, ColumnInfo, ExecOutcome, Executor, Field, OrmResult, Payload, PayloadBase, RowSet,
    Schema, Session, Value,
};
use std::sync::Mutex;

pub struct UserSchema {
    pub id: Field<i64>,
    pub name: Field<String>,
}

impl Schema for UserSchema {
    fn table_name(&self) -> &'static str {
        "user"
    }
}

pub static USER: UserSchema = UserSchema {
    id: Field::new("user", "id").auto_increment(),
    name: Field::new("user", "name"),
};

#[derive(Debug, Default)]
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

/// A toy driver: prints every statement, pretends writes succeeded and
/// serves one canned row for queries.
struct EchoExecutor {
    next_id: Mutex<i64>,
}

impl Executor for EchoExecutor {
    async fn execute(&self, sql: &str, args: &[Value]) -> OrmResult<ExecOutcome> {
        println!("exec : {sql}  {args:?}");
        let mut next = self.next_id.lock().unwrap();
        let id = *next;
        *next += 1;
        Ok(ExecOutcome {
            last_insert_id: id,
            rows_affected: 1,
        })
    }

    async fn query(&self, sql: &str, args: &[Value]) -> OrmResult<RowSet> {
        println!("query: {sql}  {args:?}");
        Ok(RowSet::new(
            vec![
                ColumnInfo::new("id", "BIGINT"),
                ColumnInfo::new("name", "VARCHAR"),
            ],
            vec![vec![Some(b"1".to_vec()), Some(b"archever".to_vec())]],
        ))
    }
}

#[tokio::main]
async fn main() -> OrmResult<()> {
    let session = Session::new(EchoExecutor {
        next_id: Mutex::new(1),
    });

    // insert: the auto-increment key comes back into the payload
    let mut user = UserPayload {
        name: "archever".into(),
        ..Default::default()
    };
    session
        .table(&USER)
        .insert_payload(vec![&mut user])
        .execute()
        .await?;
    println!("inserted -> {user:?}\n");

    // select into a payload; the baseline snapshot makes it clean
    let mut fetched = UserPayload::default();
    let found = session
        .table(&USER)
        .select()
        .filter(USER.id.eq(1))
        .take_payload(&mut fetched)
        .await?;
    println!("found={found} -> {fetched:?}\n");

    // mutate one field; the update emits only that column
    fetched.name = "renamed".into();
    session
        .table(&USER)
        .update_payload(&mut fetched)
        .filter(USER.id.eq(1))
        .execute()
        .await?;
    println!("updated -> {fetched:?}");

    Ok(())
}
