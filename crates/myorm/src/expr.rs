//! Composable condition expressions.
//!
//! Every node renders through the same two-output contract: `build` appends
//! its positional arguments to the shared list and returns the SQL
//! fragment. The invariant throughout: each `?` in a returned fragment has
//! exactly one argument pushed, in left-to-right rendering order.

use crate::schema::ColumnRef;
use crate::value::Value;

/// A rendered subquery, used as a bracketed operand inside conditions.
///
/// Produced by [`Stmt::sub_query`](crate::stmt::Stmt::sub_query).
#[derive(Debug, Clone, PartialEq)]
pub struct SubQuery {
    pub(crate) sql: String,
    pub(crate) args: Vec<Value>,
}

impl SubQuery {
    pub fn new(sql: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            sql: sql.into(),
            args,
        }
    }
}

/// One side of a comparison.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// A column reference; renders table-qualified.
    Column(ColumnRef),
    /// A parenthesized column tuple for composite comparisons.
    ColumnTuple(Vec<ColumnRef>),
    /// A bare value; renders `?` plus one argument.
    Value(Value),
    /// A value list; renders `?,?,...` preserving input order.
    List(Vec<Value>),
    /// A bracketed subquery; renders `(<sql>)` plus the subquery's args.
    SubQuery(SubQuery),
}

impl Operand {
    pub(crate) fn build(&self, args: &mut Vec<Value>) -> String {
        match self {
            Operand::Column(col) => {
                let mut out = String::new();
                col.write_qualified(&mut out);
                out
            }
            Operand::ColumnTuple(cols) => {
                let mut out = String::from("(");
                for (i, col) in cols.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    col.write_qualified(&mut out);
                }
                out.push(')');
                out
            }
            Operand::Value(v) => {
                args.push(v.clone());
                "?".to_string()
            }
            Operand::List(values) => {
                let mut out = String::from("(");
                for (i, v) in values.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    out.push('?');
                    args.push(v.clone());
                }
                out.push(')');
                out
            }
            Operand::SubQuery(sub) => {
                args.extend(sub.args.iter().cloned());
                format!("({})", sub.sql)
            }
        }
    }
}

/// Group connective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupOp {
    And,
    Or,
}

impl GroupOp {
    fn keyword(self) -> &'static str {
        match self {
            GroupOp::And => "AND",
            GroupOp::Or => "OR",
        }
    }
}

/// A typed predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum Cond {
    /// `<left> <op> <right>`; left args precede right args.
    Compare {
        left: Operand,
        op: &'static str,
        right: Operand,
    },
    /// `<left> IS NULL` / `<left> IS NOT NULL` — no placeholder.
    Null { left: Operand, negated: bool },
    /// AND/OR group; parenthesized only when it has more than one child.
    Group { op: GroupOp, items: Vec<Cond> },
    /// Raw fragment with `?` placeholders and matching args.
    Raw { sql: String, args: Vec<Value> },
    /// Always-true guard (empty NOT IN).
    True,
    /// Always-false guard (empty IN).
    False,
}

/// AND a list of conditions.
pub fn and(items: impl IntoIterator<Item = Cond>) -> Cond {
    Cond::Group {
        op: GroupOp::And,
        items: items.into_iter().collect(),
    }
}

/// OR a list of conditions.
pub fn or(items: impl IntoIterator<Item = Cond>) -> Cond {
    Cond::Group {
        op: GroupOp::Or,
        items: items.into_iter().collect(),
    }
}

/// A raw condition fragment with `?` placeholders.
pub fn raw(sql: impl Into<String>, args: Vec<Value>) -> Cond {
    Cond::Raw {
        sql: sql.into(),
        args,
    }
}

impl Cond {
    /// Append args, return the SQL fragment.
    pub(crate) fn build(&self, args: &mut Vec<Value>) -> String {
        match self {
            Cond::Compare { left, op, right } => {
                let l = left.build(args);
                let r = right.build(args);
                format!("{l} {op} {r}")
            }
            Cond::Null { left, negated } => {
                let l = left.build(args);
                if *negated {
                    format!("{l} IS NOT NULL")
                } else {
                    format!("{l} IS NULL")
                }
            }
            Cond::Group { op, items } => {
                let mut parts: Vec<String> = items
                    .iter()
                    .map(|c| c.build(args))
                    .filter(|s| !s.is_empty())
                    .collect();
                match parts.len() {
                    0 => String::new(),
                    1 => parts.swap_remove(0),
                    _ => format!("({})", parts.join(&format!(" {} ", op.keyword()))),
                }
            }
            Cond::Raw { sql, args: own } => {
                args.extend(own.iter().cloned());
                sql.clone()
            }
            Cond::True => "1=1".to_string(),
            Cond::False => "1=0".to_string(),
        }
    }

    /// Render this condition standalone as `(sql, args)`.
    pub fn render(&self) -> (String, Vec<Value>) {
        let mut args = Vec::new();
        let sql = self.build(&mut args);
        (sql, args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Field;

    static ID: Field<i64> = Field::new("user", "id");
    static NAME: Field<String> = Field::new("user", "name");

    fn placeholders(sql: &str) -> usize {
        sql.matches('?').count()
    }

    #[test]
    fn compare_renders_qualified_with_one_arg() {
        let (sql, args) = ID.eq(10).render();
        assert_eq!(sql, "`user`.`id` = ?");
        assert_eq!(args, vec![Value::Int(10)]);
    }

    #[test]
    fn every_placeholder_has_one_arg_in_order() {
        let cond = and([
            ID.gt(1),
            NAME.like("a%"),
            ID.in_list([7, 8, 9]),
        ]);
        let (sql, args) = cond.render();
        assert_eq!(placeholders(&sql), args.len());
        assert_eq!(
            args,
            vec![
                Value::Int(1),
                Value::Text("a%".into()),
                Value::Int(7),
                Value::Int(8),
                Value::Int(9),
            ]
        );
    }

    #[test]
    fn in_list_preserves_order() {
        let (sql, args) = ID.in_list([9, 10]).render();
        assert_eq!(sql, "`user`.`id` IN (?,?)");
        assert_eq!(args, vec![Value::Int(9), Value::Int(10)]);
    }

    #[test]
    fn empty_in_guards() {
        assert_eq!(ID.in_list([]).render().0, "1=0");
        assert_eq!(ID.not_in([]).render().0, "1=1");
    }

    #[test]
    fn is_null_has_no_placeholder() {
        let (sql, args) = NAME.is_null().render();
        assert_eq!(sql, "`user`.`name` IS NULL");
        assert!(args.is_empty());
        assert_eq!(NAME.is_not_null().render().0, "`user`.`name` IS NOT NULL");
    }

    #[test]
    fn single_item_group_adds_no_parens() {
        let (sql, _) = and([ID.eq(1)]).render();
        assert_eq!(sql, "`user`.`id` = ?");
    }

    #[test]
    fn empty_groups_render_nothing() {
        assert_eq!(and([]).render().0, "");
        assert_eq!(or([and([]), and([])]).render().0, "");
        // a group collapsing to one live child drops the parens too
        let (sql, _) = and([and([]), ID.eq(1)]).render();
        assert_eq!(sql, "`user`.`id` = ?");
    }

    #[test]
    fn group_parenthesizes_multiple() {
        let (sql, args) = or([ID.eq(1), ID.eq(2)]).render();
        assert_eq!(sql, "(`user`.`id` = ? OR `user`.`id` = ?)");
        assert_eq!(args, vec![Value::Int(1), Value::Int(2)]);
    }

    #[test]
    fn nested_groups() {
        let cond = and([ID.gt(0), or([NAME.eq("a".into()), NAME.eq("b".into())])]);
        let (sql, args) = cond.render();
        assert_eq!(
            sql,
            "(`user`.`id` > ? AND (`user`.`name` = ? OR `user`.`name` = ?))"
        );
        assert_eq!(args.len(), 3);
    }

    #[test]
    fn column_to_column_has_no_args() {
        let team_id: Field<i64> = Field::new("team", "id");
        let user_team: Field<i64> = Field::new("user", "team_id");
        let (sql, args) = user_team.eq_col(&team_id).render();
        assert_eq!(sql, "`user`.`team_id` = `team`.`id`");
        assert!(args.is_empty());
    }

    #[test]
    fn subquery_operand_brackets_and_appends_args() {
        let sub = SubQuery::new(
            "SELECT `id` FROM `user` WHERE `user`.`name` = ?",
            vec![Value::Text("archever".into())],
        );
        let (sql, args) = ID.eq_query(sub).render();
        assert_eq!(
            sql,
            "`user`.`id` = (SELECT `id` FROM `user` WHERE `user`.`name` = ?)"
        );
        assert_eq!(args, vec![Value::Text("archever".into())]);
    }

    #[test]
    fn composite_in_query() {
        use crate::schema::FieldGroup;
        let group = FieldGroup::new([ID.col(), NAME.col()]);
        let sub = SubQuery::new("SELECT `id`, `name` FROM `old_user`", vec![]);
        let (sql, args) = group.in_query(sub).render();
        assert_eq!(
            sql,
            "(`user`.`id`,`user`.`name`) IN (SELECT `id`, `name` FROM `old_user`)"
        );
        assert!(args.is_empty());
    }

    #[test]
    fn raw_fragment_carries_its_args() {
        let (sql, args) = raw("a = ? OR b = ?", vec![Value::Int(1), Value::Int(2)]).render();
        assert_eq!(sql, "a = ? OR b = ?");
        assert_eq!(args.len(), 2);
    }
}
