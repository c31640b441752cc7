//! Regenerates SQL text from an AST.
//!
//! Output is canonical rather than faithful to the input: keywords are upper
//! case, every `AND`/`OR` node is parenthesised, and each statement ends with
//! `;` on its own line. Arithmetic is parenthesised wherever the dialect's
//! flat left-to-right evaluation would otherwise read differently under
//! standard SQL operator precedence, so the output means the same thing to
//! any SQL engine.

use crate::sql::ast::*;

/// Render every statement, one per line.
pub fn render_sql(statements: &[Statement]) -> String {
    statements
        .iter()
        .map(statement_sql)
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn statement_sql(stmt: &Statement) -> String {
    match stmt {
        Statement::Select(sel) => select_sql(sel),
    }
}

fn select_sql(sel: &SelectStatement) -> String {
    let mut sql = format!("SELECT {} FROM {}", sel.columns.names().join(", "), sel.table);
    for join in &sel.joins {
        sql.push(' ');
        sql.push_str(&join_sql(join));
    }
    if let Some(cond) = &sel.where_clause {
        sql.push_str(" WHERE ");
        sql.push_str(&condition_sql(cond));
    }
    sql.push(';');
    sql
}

fn join_sql(join: &Join) -> String {
    let mut sql = format!(
        "JOIN {} ON {} {} {}",
        join.table,
        join.on.left,
        join.on.op.symbol(),
        join.on.right
    );
    if let Some(filter) = &join.filter {
        // The comment must not close early on a `*/` inside a string literal.
        let text = condition_sql(filter).replace("*/", "* /");
        sql.push_str(&format!(" /* filter: {} */", text));
    }
    sql
}

/// Render a condition tree. `Boolean` leaves become tautologies
/// (`1 = 1` / `1 = 0`) so the text stays valid SQL.
pub fn condition_sql(cond: &Condition) -> String {
    match cond {
        Condition::Logic { op, left, right } => format!(
            "({} {} {})",
            condition_sql(left),
            op.keyword(),
            condition_sql(right)
        ),
        Condition::Comparison { left, op, right } => format!(
            "{} {} {}",
            expression_sql(left),
            op.symbol(),
            expression_sql(right)
        ),
        Condition::Boolean(true) => "1 = 1".to_string(),
        Condition::Boolean(false) => "1 = 0".to_string(),
    }
}

pub fn expression_sql(expr: &Expression) -> String {
    match expr {
        Expression::Number(n) => n.clone(),
        Expression::String(s) => quote_string(s),
        Expression::Identifier(name) => name.clone(),
        Expression::Binary { op, left, right } => {
            let lhs = match left.as_ref() {
                Expression::Binary { op: inner, .. } if binds_looser(*inner, *op) => {
                    format!("({})", expression_sql(left))
                }
                _ => expression_sql(left),
            };
            let rhs = match right.as_ref() {
                Expression::Binary { .. } => format!("({})", expression_sql(right)),
                _ => expression_sql(right),
            };
            format!("{} {} {}", lhs, op.symbol(), rhs)
        }
        Expression::Subquery(sub) => {
            let mut sql = format!("(SELECT {} FROM {}", sub.columns.names().join(", "), sub.table);
            if let Some(cond) = &sub.where_clause {
                sql.push_str(" WHERE ");
                sql.push_str(&condition_sql(cond));
            }
            sql.push(')');
            sql
        }
    }
}

/// Single-quote a string literal, doubling embedded quotes.
pub fn quote_string(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

/// True when `inner` has lower precedence than `outer` in standard SQL.
fn binds_looser(inner: ArithOp, outer: ArithOp) -> bool {
    matches!(inner, ArithOp::Add | ArithOp::Sub) && matches!(outer, ArithOp::Mul | ArithOp::Div)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql::parser::Parser;

    fn roundtrip(sql: &str) -> String {
        render_sql(&Parser::parse_sql(sql).unwrap())
    }

    #[test]
    fn render_simple_select() {
        assert_eq!(roundtrip("select * from users"), "SELECT * FROM users;");
        assert_eq!(
            roundtrip("SELECT id, name FROM users WHERE age > 25;"),
            "SELECT id, name FROM users WHERE age > 25;"
        );
    }

    #[test]
    fn render_parenthesises_logic_nodes() {
        assert_eq!(
            roundtrip("SELECT a FROM t WHERE a = 1 AND b = 2 OR c = 3"),
            "SELECT a FROM t WHERE (a = 1 AND (b = 2 OR c = 3));"
        );
    }

    #[test]
    fn render_requotes_strings() {
        assert_eq!(
            roundtrip("SELECT a FROM t WHERE name = 'O''Brien'"),
            "SELECT a FROM t WHERE name = 'O''Brien';"
        );
    }

    #[test]
    fn render_arithmetic_keeps_left_to_right_meaning() {
        assert_eq!(
            roundtrip("SELECT a FROM t WHERE a > 1 + 2 * 3"),
            "SELECT a FROM t WHERE a > (1 + 2) * 3;"
        );
        assert_eq!(
            roundtrip("SELECT a FROM t WHERE a > 10 - (4 - 1)"),
            "SELECT a FROM t WHERE a > 10 - (4 - 1);"
        );
        assert_eq!(
            roundtrip("SELECT a FROM t WHERE a > 2 * 3 + 1"),
            "SELECT a FROM t WHERE a > 2 * 3 + 1;"
        );
    }

    #[test]
    fn render_in_subquery() {
        assert_eq!(
            roundtrip("SELECT * FROM orders WHERE customer_id IN (SELECT id FROM customers WHERE active = 1)"),
            "SELECT * FROM orders WHERE customer_id IN (SELECT id FROM customers WHERE active = 1);"
        );
    }

    #[test]
    fn render_joins_and_booleans() {
        let mut sel = SelectStatement::new(Projection::All, "orders", Some(Condition::Boolean(false)));
        sel.joins.push(Join {
            table: "customers".into(),
            on: JoinCondition {
                left: "orders.customer_id".into(),
                op: CompareOp::Eq,
                right: "customers.id".into(),
            },
            filter: Some(Condition::comparison(
                Expression::Identifier("active".into()),
                CompareOp::Eq,
                Expression::Number("1".into()),
            )),
        });
        assert_eq!(
            render_sql(&[Statement::Select(sel)]),
            "SELECT * FROM orders JOIN customers ON orders.customer_id = customers.id \
             /* filter: active = 1 */ WHERE 1 = 0;"
        );
    }

    #[test]
    fn join_filter_cannot_close_its_comment() {
        let mut sel = SelectStatement::new(Projection::All, "orders", None);
        sel.joins.push(Join {
            table: "customers".into(),
            on: JoinCondition {
                left: "orders.customer_id".into(),
                op: CompareOp::Eq,
                right: "customers.id".into(),
            },
            filter: Some(Condition::comparison(
                Expression::Identifier("name".into()),
                CompareOp::Eq,
                Expression::String("*/ WHERE 1 = 0 /*".into()),
            )),
        });
        let sql = render_sql(&[Statement::Select(sel)]);
        assert_eq!(
            sql,
            "SELECT * FROM orders JOIN customers ON orders.customer_id = customers.id \
             /* filter: name = '* / WHERE 1 = 0 /*' */;"
        );
        assert_eq!(sql.matches("*/").count(), 1);
    }

    #[test]
    fn render_one_statement_per_line() {
        assert_eq!(
            roundtrip("SELECT a FROM t; SELECT b FROM u"),
            "SELECT a FROM t;\nSELECT b FROM u;"
        );
        assert_eq!(render_sql(&[]), "");
    }

    #[test]
    fn rendered_sql_reparses_to_the_same_tree() {
        let sql = "SELECT id, name FROM users WHERE (age + 1) * 2 >= 40 AND name != 'x' OR id IN (SELECT id FROM users)";
        let first = Parser::parse_sql(sql).unwrap();
        let second = Parser::parse_sql(&render_sql(&first)).unwrap();
        assert_eq!(first, second);
    }
}
