//! # Rewrite-pass optimizer
//!
//! A fixed pipeline of tree-to-tree passes applied to every `SELECT`:
//!
//! 1. column deduplication
//! 2. comparison normalization (literal operands moved to the right)
//! 3. cost-based reordering of `AND`/`OR` children
//! 4. constant folding
//! 5. redundant-condition elimination
//! 6. IN-subquery to JOIN conversion
//!
//! Each pass consumes its input and returns a new tree. A pass appends one
//! entry to the statement's `optimization_log` when it changed something and
//! nothing otherwise.

use std::cmp::Ordering;

use crate::error::{Result, SqlFoldError};
use crate::sql::ast::*;
use crate::sql::render::expression_sql;

pub const LOG_DEDUP: &str = "Removed duplicate columns";
pub const LOG_NORMALIZE: &str = "Normalized comparison operand order";
pub const LOG_REORDER: &str = "Reordered conditions by estimated cost";
pub const LOG_FOLD: &str = "Folded constant expressions";
pub const LOG_ELIMINATE: &str = "Eliminated redundant conditions";
pub const LOG_IN_TO_JOIN: &str = "Converted IN-subquery to JOIN";

/// Optimize every statement. Any failure aborts the whole batch.
pub fn optimize(statements: Vec<Statement>) -> Result<Vec<Statement>> {
    statements
        .into_iter()
        .map(|stmt| match stmt {
            Statement::Select(sel) => optimize_select(sel).map(Statement::Select),
        })
        .collect()
}

pub fn optimize_select(mut sel: SelectStatement) -> Result<SelectStatement> {
    let mut changed = false;
    sel.columns = dedup_columns(sel.columns, &mut changed);
    record(&mut sel, changed, LOG_DEDUP);

    // Condition passes. Each is skipped entirely when there is no filter.
    let passes: [(fn(Condition, &mut bool) -> Condition, &str); 3] = [
        (normalize, LOG_NORMALIZE),
        (reorder, LOG_REORDER),
        (fold_constants, LOG_FOLD),
    ];
    for (pass, entry) in passes {
        if let Some(cond) = sel.where_clause.take() {
            let mut changed = false;
            sel.where_clause = Some(pass(cond, &mut changed));
            record(&mut sel, changed, entry);
        }
    }

    if let Some(cond) = sel.where_clause.take() {
        let mut changed = false;
        sel.where_clause = eliminate_redundant(cond, &mut changed);
        record(&mut sel, changed, LOG_ELIMINATE);
    }

    sel = subquery_to_join(sel)?;

    log::debug!(
        "optimized SELECT on '{}': {} rewrite(s)",
        sel.table,
        sel.optimization_log.len()
    );
    Ok(sel)
}

fn record(sel: &mut SelectStatement, changed: bool, entry: &str) {
    if changed && !sel.optimization_log.iter().any(|e| e == entry) {
        log::trace!("{entry} on '{}'", sel.table);
        sel.optimization_log.push(entry.to_string());
    }
}

// ===========================================================================
// 1. Column deduplication
// ===========================================================================

/// Drop repeated column names, keeping the first occurrence of each.
pub fn dedup_columns(columns: Projection, changed: &mut bool) -> Projection {
    match columns {
        Projection::All => Projection::All,
        Projection::Columns(cols) => {
            let mut seen: Vec<String> = Vec::with_capacity(cols.len());
            for col in cols {
                if seen.contains(&col) {
                    *changed = true;
                } else {
                    seen.push(col);
                }
            }
            Projection::Columns(seen)
        }
    }
}

// ===========================================================================
// 2. Normalization
// ===========================================================================

/// Mirror comparisons of the form `literal op column` into
/// `column op' literal`. A left side that folds to a literal counts as one,
/// so a second run over folded output finds nothing new.
pub fn normalize(cond: Condition, changed: &mut bool) -> Condition {
    match cond {
        Condition::Logic { op, left, right } => {
            Condition::logic(op, normalize(*left, changed), normalize(*right, changed))
        }
        Condition::Comparison { left, op, right }
            if matches!(right, Expression::Identifier(_))
                && fold_expression(left.clone(), &mut false).is_literal() =>
        {
            match op.mirrored() {
                Some(mirrored) => {
                    *changed = true;
                    Condition::comparison(right, mirrored, left)
                }
                None => Condition::comparison(left, op, right),
            }
        }
        other => other,
    }
}

// ===========================================================================
// 3. Cost-based reordering
// ===========================================================================

/// Estimated evaluation cost: comparisons against a numeric literal are
/// cheapest, then string literals, then everything else.
///
/// The cost is that of the condition after folding and elimination, so
/// `a = 1 + 2` costs the same as `a = 3`. A condition that is eliminated
/// entirely costs 3.
pub fn condition_cost(cond: &Condition) -> u8 {
    settled_cost(cond).unwrap_or(3)
}

fn settled_cost(cond: &Condition) -> Option<u8> {
    let settled = eliminate_redundant(fold_constants(cond.clone(), &mut false), &mut false)?;
    Some(match settled {
        Condition::Comparison { right, .. } => match right {
            Expression::Number(_) => 1,
            Expression::String(_) => 2,
            _ => 3,
        },
        _ => 3,
    })
}

/// Single bottom-up pass: children of every `Logic` node are reordered
/// first, then the node's own children are swapped if the left one costs
/// more. A child that elimination will remove is never swapped.
pub fn reorder(cond: Condition, changed: &mut bool) -> Condition {
    match cond {
        Condition::Logic { op, left, right } => {
            let left = reorder(*left, changed);
            let right = reorder(*right, changed);
            match (settled_cost(&left), settled_cost(&right)) {
                (Some(l), Some(r)) if l > r => {
                    *changed = true;
                    Condition::logic(op, right, left)
                }
                _ => Condition::logic(op, left, right),
            }
        }
        leaf => leaf,
    }
}

// ===========================================================================
// 4. Constant folding
// ===========================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
enum Num {
    Int(i64),
    Float(f64),
}

impl Num {
    fn parse(text: &str) -> Option<Num> {
        if !text.contains('.') {
            if let Ok(i) = text.parse::<i64>() {
                return Some(Num::Int(i));
            }
        }
        text.parse::<f64>().ok().filter(|f| f.is_finite()).map(Num::Float)
    }

    fn as_f64(self) -> f64 {
        match self {
            Num::Int(i) => i as f64,
            Num::Float(f) => f,
        }
    }

    fn apply(self, op: ArithOp, rhs: Num) -> Option<Num> {
        match (self, rhs) {
            (Num::Int(a), Num::Int(b)) => {
                let out = match op {
                    ArithOp::Add => a.checked_add(b),
                    ArithOp::Sub => a.checked_sub(b),
                    ArithOp::Mul => a.checked_mul(b),
                    ArithOp::Div => a.checked_div(b),
                };
                out.map(Num::Int)
            }
            (a, b) => {
                let (a, b) = (a.as_f64(), b.as_f64());
                let out = match op {
                    ArithOp::Add => a + b,
                    ArithOp::Sub => a - b,
                    ArithOp::Mul => a * b,
                    ArithOp::Div if b == 0.0 => return None,
                    ArithOp::Div => a / b,
                };
                out.is_finite().then_some(Num::Float(out))
            }
        }
    }

    fn compare(self, rhs: Num) -> Option<Ordering> {
        match (self, rhs) {
            (Num::Int(a), Num::Int(b)) => Some(a.cmp(&b)),
            (a, b) => a.as_f64().partial_cmp(&b.as_f64()),
        }
    }

    /// Literal spelling, or `None` when the value has no unsigned literal
    /// form in the dialect.
    fn to_literal(self) -> Option<String> {
        match self {
            Num::Int(i) if i >= 0 => Some(i.to_string()),
            Num::Float(f) if f >= 0.0 && f.fract() == 0.0 => Some(format!("{f:.1}")),
            Num::Float(f) if f >= 0.0 => Some(f.to_string()),
            _ => None,
        }
    }
}

/// Evaluate arithmetic on numeric literals, then replace comparisons
/// between two numeric literals with their boolean result. Anything that
/// cannot be evaluated is left as it was.
pub fn fold_constants(cond: Condition, changed: &mut bool) -> Condition {
    match cond {
        Condition::Logic { op, left, right } => Condition::logic(
            op,
            fold_constants(*left, changed),
            fold_constants(*right, changed),
        ),
        Condition::Comparison { left, op, right } => {
            let left = fold_expression(left, changed);
            let right = fold_expression(right, changed);
            let folded = match (&left, &right) {
                (Expression::Number(a), Expression::Number(b)) => evaluate_comparison(a, op, b),
                _ => None,
            };
            match folded {
                Some(value) => {
                    *changed = true;
                    Condition::Boolean(value)
                }
                None => Condition::comparison(left, op, right),
            }
        }
        boolean @ Condition::Boolean(_) => boolean,
    }
}

fn evaluate_comparison(left: &str, op: CompareOp, right: &str) -> Option<bool> {
    let ordering = Num::parse(left)?.compare(Num::parse(right)?)?;
    Some(match op {
        CompareOp::Eq => ordering == Ordering::Equal,
        CompareOp::NotEq => ordering != Ordering::Equal,
        CompareOp::Lt => ordering == Ordering::Less,
        CompareOp::Gt => ordering == Ordering::Greater,
        CompareOp::LtEq => ordering != Ordering::Greater,
        CompareOp::GtEq => ordering != Ordering::Less,
        CompareOp::In => return None,
    })
}

fn fold_expression(expr: Expression, changed: &mut bool) -> Expression {
    match expr {
        Expression::Binary { op, left, right } => {
            let left = fold_expression(*left, changed);
            let right = fold_expression(*right, changed);
            if let (Expression::Number(a), Expression::Number(b)) = (&left, &right) {
                let folded = Num::parse(a)
                    .zip(Num::parse(b))
                    .and_then(|(a, b)| a.apply(op, b))
                    .and_then(Num::to_literal);
                if let Some(literal) = folded {
                    *changed = true;
                    return Expression::Number(literal);
                }
            }
            Expression::binary(op, left, right)
        }
        other => other,
    }
}

// ===========================================================================
// 5. Redundant-condition elimination
// ===========================================================================

/// Remove always-true leaves. A `Logic` node that loses one child collapses
/// to the other, for `OR` as well as `AND`; `None` means no filter remains.
/// `Boolean(false)` is kept so the statement stays selective.
pub fn eliminate_redundant(cond: Condition, changed: &mut bool) -> Option<Condition> {
    match cond {
        Condition::Boolean(true) => {
            *changed = true;
            None
        }
        ref cmp if is_literal_tautology(cmp) => {
            *changed = true;
            None
        }
        Condition::Logic { op, left, right } => {
            let left = eliminate_redundant(*left, changed);
            let right = eliminate_redundant(*right, changed);
            match (left, right) {
                (Some(l), Some(r)) => Some(Condition::logic(op, l, r)),
                (Some(survivor), None) | (None, Some(survivor)) => Some(survivor),
                (None, None) => None,
            }
        }
        other => Some(other),
    }
}

/// The literal shape `1 = 1`.
fn is_literal_tautology(cond: &Condition) -> bool {
    matches!(
        cond,
        Condition::Comparison {
            left: Expression::Number(l),
            op: CompareOp::Eq,
            right: Expression::Number(r),
        } if l == "1" && r == "1"
    )
}

// ===========================================================================
// 6. IN-subquery to JOIN
// ===========================================================================

/// Turn `WHERE col IN (SELECT key FROM t WHERE f)` into
/// `JOIN t ON outer.col = t.key` carrying `f` as an advisory filter.
///
/// Applies only when the whole filter is that single comparison. Only the
/// subquery's first column becomes the join key.
pub fn subquery_to_join(mut sel: SelectStatement) -> Result<SelectStatement> {
    let (left, sub) = match sel.where_clause.take() {
        Some(Condition::Comparison {
            left,
            op: CompareOp::In,
            right: Expression::Subquery(sub),
        }) => (left, *sub),
        other => {
            sel.where_clause = other;
            return Ok(sel);
        }
    };

    let key = match &sub.columns {
        Projection::All => {
            return Err(SqlFoldError::UnsupportedRewrite(format!(
                "IN-subquery on '{}' selects * and has no join key",
                sub.table
            )))
        }
        Projection::Columns(cols) => {
            if cols.len() > 1 {
                log::warn!(
                    "IN-subquery on '{}' selects {} columns; joining on '{}' only",
                    sub.table,
                    cols.len(),
                    cols[0]
                );
            }
            cols.first().cloned().unwrap_or_default()
        }
    };

    let outer = match &left {
        Expression::Identifier(name) if !name.contains('.') => format!("{}.{}", sel.table, name),
        other => expression_sql(other),
    };

    sel.joins.push(Join {
        on: JoinCondition {
            left: outer,
            op: CompareOp::Eq,
            right: format!("{}.{}", sub.table, key),
        },
        table: sub.table,
        filter: sub.where_clause,
    });
    record(&mut sel, true, LOG_IN_TO_JOIN);
    Ok(sel)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql::parser::Parser;

    fn optimize_one(sql: &str) -> SelectStatement {
        let stmts = optimize(Parser::parse_sql(sql).unwrap()).unwrap();
        match stmts.into_iter().next().unwrap() {
            Statement::Select(sel) => sel,
        }
    }

    fn where_of(sql: &str) -> Option<Condition> {
        match Parser::parse_sql(sql).unwrap().remove(0) {
            Statement::Select(sel) => sel.where_clause,
        }
    }

    fn cond(expr: &str) -> Condition {
        where_of(&format!("SELECT a FROM t WHERE {expr}")).unwrap()
    }

    // -- dedup ---------------------------------------------------------------

    #[test]
    fn dedup_keeps_first_occurrence() {
        let sel = optimize_one("SELECT id, id, name FROM users;");
        assert_eq!(sel.columns, Projection::Columns(vec!["id".into(), "name".into()]));
        assert_eq!(sel.optimization_log, vec![LOG_DEDUP]);

        let sel = optimize_one("SELECT b, a, b, c, a FROM t");
        assert_eq!(sel.columns.names(), vec!["b", "a", "c"]);
    }

    #[test]
    fn dedup_logs_nothing_without_duplicates() {
        let sel = optimize_one("SELECT id, name FROM users");
        assert!(sel.optimization_log.is_empty());
        let sel = optimize_one("SELECT * FROM users");
        assert!(sel.optimization_log.is_empty());
    }

    #[test]
    fn second_run_appends_nothing_to_dedup() {
        let first = optimize(Parser::parse_sql("SELECT id, id, name FROM users WHERE age > 1").unwrap()).unwrap();
        let second = optimize(first.clone()).unwrap();
        assert_eq!(first, second);
    }

    // -- normalize -----------------------------------------------------------

    #[test]
    fn normalize_mirrors_literal_left_comparisons() {
        let mut changed = false;
        assert_eq!(normalize(cond("25 < age"), &mut changed), cond("age > 25"));
        assert!(changed);

        let mut changed = false;
        assert_eq!(normalize(cond("'bob' = name"), &mut changed), cond("name = 'bob'"));
        assert!(changed);
    }

    #[test]
    fn normalize_mirrors_foldable_left_side() {
        let mut changed = false;
        assert_eq!(normalize(cond("1 + 2 < age"), &mut changed), cond("age > 1 + 2"));
        assert!(changed);
        assert_eq!(normalize(cond("1 - 2 < age"), &mut false), cond("1 - 2 < age"));
    }

    #[test]
    fn normalize_leaves_other_shapes() {
        for shape in ["age > 25", "1 = 2", "a = b", "1 + a = b", "a IN (SELECT b FROM u)"] {
            let mut changed = false;
            assert_eq!(normalize(cond(shape), &mut changed), cond(shape), "{shape}");
            assert!(!changed, "{shape}");
        }
    }

    // -- reorder -------------------------------------------------------------

    #[test]
    fn cost_model() {
        assert_eq!(condition_cost(&cond("a = 1")), 1);
        assert_eq!(condition_cost(&cond("a = 'x'")), 2);
        assert_eq!(condition_cost(&cond("a = b")), 3);
        assert_eq!(condition_cost(&cond("a = 1 + 2")), 1);
        assert_eq!(condition_cost(&cond("a = b + 2")), 3);
        assert_eq!(condition_cost(&cond("1 = 2")), 3);
        assert_eq!(condition_cost(&Condition::Boolean(true)), 3);
        assert_eq!(condition_cost(&cond("a = 1 AND b = 1")), 3);
    }

    #[test]
    fn reorder_swaps_expensive_left_child() {
        let mut changed = false;
        let out = reorder(cond("name = 'x' AND age = 3"), &mut changed);
        assert_eq!(out, Condition::logic(LogicOp::And, cond("age = 3"), cond("name = 'x'")));
        assert!(changed);
    }

    #[test]
    fn reorder_is_bottom_up_not_a_sort() {
        // a = b AND (c = 'x' AND d = 1): the inner pair is swapped; the outer
        // pair costs 3 vs 3 and stays put.
        let mut changed = false;
        let out = reorder(cond("a = b AND c = 'x' AND d = 1"), &mut changed);
        let expected = Condition::logic(
            LogicOp::And,
            cond("a = b"),
            Condition::logic(LogicOp::And, cond("d = 1"), cond("c = 'x'")),
        );
        assert_eq!(out, expected);
    }

    #[test]
    fn reorder_preserves_leaf_set() {
        let input = cond("a = b OR c = 'x' AND (d = 1 OR e = f) AND g = 2");
        let mut changed = false;
        let out = reorder(input.clone(), &mut changed);
        let mut before: Vec<String> = input.leaves().iter().map(|l| format!("{l:?}")).collect();
        let mut after: Vec<String> = out.leaves().iter().map(|l| format!("{l:?}")).collect();
        before.sort();
        after.sort();
        assert_eq!(before, after);
    }

    #[test]
    fn eliminated_child_is_not_swapped() {
        let mut changed = false;
        let input = cond("1 = 1 AND name = 'x'");
        assert_eq!(reorder(input.clone(), &mut changed), input);
        assert!(!changed);
    }

    #[test]
    fn second_run_adds_no_log_entries() {
        for sql in [
            "SELECT * FROM t WHERE 1 = 2 AND a = 1",
            "SELECT * FROM t WHERE name = 'x' AND (1 = 1 AND age > 2)",
            "SELECT * FROM t WHERE 1 + 2 < age AND name = 'x'",
            "SELECT * FROM t WHERE a = b + 1 OR 3 * 2 > c",
            "SELECT * FROM t WHERE (a = 'x' OR 2 = 2) AND b = 5 - 1",
        ] {
            let first = optimize(Parser::parse_sql(sql).unwrap()).unwrap();
            let second = optimize(first.clone()).unwrap();
            assert_eq!(first, second, "{sql}");
        }
    }

    #[test]
    fn stable_order_is_not_logged() {
        let sel = optimize_one("SELECT id FROM users WHERE age = 1 AND name = 'x'");
        assert!(sel.optimization_log.is_empty());
    }

    // -- fold ----------------------------------------------------------------

    #[test]
    fn fold_numeric_comparisons() {
        let cases = [
            ("1 = 1", true),
            ("1 = 2", false),
            ("1 != 2", true),
            ("2 < 10", true),
            ("10 > 9.5", true),
            ("3 <= 3", true),
            ("3 >= 4", false),
            ("1.0 = 1", true),
            ("007 = 7", true),
        ];
        for (expr, expected) in cases {
            let mut changed = false;
            assert_eq!(
                fold_constants(cond(expr), &mut changed),
                Condition::Boolean(expected),
                "{expr}"
            );
            assert!(changed);
        }
    }

    #[test]
    fn fold_arithmetic() {
        let mut changed = false;
        assert_eq!(fold_constants(cond("age > 20 + 5"), &mut changed), cond("age > 25"));
        assert!(changed);
        assert_eq!(fold_constants(cond("a = 7 / 2"), &mut false), cond("a = 3"));
        assert_eq!(fold_constants(cond("a = 1.5 * 2"), &mut false), cond("a = 3.0"));
        assert_eq!(fold_constants(cond("a = 0.5 + 0.25"), &mut false), cond("a = 0.75"));
        assert_eq!(fold_constants(cond("2 * 3 = 6"), &mut false), Condition::Boolean(true));
    }

    #[test]
    fn fold_leaves_unevaluable_nodes() {
        for shape in [
            "a = 1 / 0",
            "a = 1.5 / 0",
            "a = 9223372036854775807 + 1",
            "a = 1 - 5",
            "'a' = 'a'",
            "a = b + 1",
        ] {
            let mut changed = false;
            assert_eq!(fold_constants(cond(shape), &mut changed), cond(shape), "{shape}");
            assert!(!changed, "{shape}");
        }
    }

    // -- eliminate -----------------------------------------------------------

    #[test]
    fn true_is_removed_false_is_kept() {
        assert_eq!(eliminate_redundant(Condition::Boolean(true), &mut false), None);
        assert_eq!(
            eliminate_redundant(Condition::Boolean(false), &mut false),
            Some(Condition::Boolean(false))
        );
    }

    #[test]
    fn literal_one_equals_one_is_removed_before_folding() {
        let mut changed = false;
        assert_eq!(eliminate_redundant(cond("1 = 1"), &mut changed), None);
        assert!(changed);
        assert_eq!(eliminate_redundant(cond("2 = 2"), &mut false), Some(cond("2 = 2")));
    }

    #[test]
    fn logic_collapses_to_surviving_child() {
        let tree = Condition::logic(LogicOp::And, Condition::Boolean(true), cond("a = 1"));
        assert_eq!(eliminate_redundant(tree, &mut false), Some(cond("a = 1")));

        let both = Condition::logic(LogicOp::And, Condition::Boolean(true), Condition::Boolean(true));
        assert_eq!(eliminate_redundant(both, &mut false), None);
    }

    #[test]
    fn or_collapse_asymmetry_is_preserved() {
        // `TRUE OR a = 1` is always true, but collapses to `a = 1` like AND.
        let tree = Condition::logic(LogicOp::Or, Condition::Boolean(true), cond("a = 1"));
        assert_eq!(eliminate_redundant(tree, &mut false), Some(cond("a = 1")));
    }

    #[test]
    fn tautology_where_vanishes() {
        let sel = optimize_one("SELECT * FROM users WHERE 1 = 1;");
        assert!(sel.where_clause.is_none());
        assert_eq!(sel.optimization_log, vec![LOG_FOLD, LOG_ELIMINATE]);
    }

    #[test]
    fn contradiction_stays() {
        let sel = optimize_one("SELECT * FROM users WHERE age > 1 AND 1 = 2");
        assert_eq!(
            sel.where_clause,
            Some(Condition::logic(LogicOp::And, cond("age > 1"), Condition::Boolean(false)))
        );
        assert!(!sel.optimization_log.iter().any(|e| e == LOG_ELIMINATE));
    }

    // -- IN to JOIN ----------------------------------------------------------

    #[test]
    fn in_subquery_becomes_join() {
        let sel = optimize_one(
            "SELECT * FROM orders WHERE customer_id IN (SELECT id FROM customers WHERE active = 1);",
        );
        assert!(sel.where_clause.is_none());
        assert_eq!(sel.joins.len(), 1);
        let join = &sel.joins[0];
        assert_eq!(join.table, "customers");
        assert_eq!(join.on.left, "orders.customer_id");
        assert_eq!(join.on.op, CompareOp::Eq);
        assert_eq!(join.on.right, "customers.id");
        assert_eq!(join.filter, Some(cond("active = 1")));
        assert_eq!(sel.optimization_log, vec![LOG_IN_TO_JOIN]);
    }

    #[test]
    fn in_subquery_under_logic_is_not_rewritten() {
        let sel = optimize_one("SELECT * FROM orders WHERE id = 1 AND customer_id IN (SELECT id FROM customers)");
        assert!(sel.joins.is_empty());
        assert!(sel.where_clause.is_some());
    }

    #[test]
    fn multi_column_subquery_joins_on_first_column() {
        let sel = optimize_one("SELECT * FROM orders WHERE customer_id IN (SELECT id, name FROM customers)");
        assert_eq!(sel.joins[0].on.right, "customers.id");
        assert!(sel.joins[0].filter.is_none());
    }

    #[test]
    fn star_subquery_is_an_unsupported_rewrite() {
        let stmts = Parser::parse_sql(
            "SELECT id FROM users; SELECT * FROM orders WHERE customer_id IN (SELECT * FROM customers)",
        )
        .unwrap();
        assert!(matches!(
            optimize(stmts),
            Err(SqlFoldError::UnsupportedRewrite(msg)) if msg.contains("customers")
        ));
    }

    #[test]
    fn folded_filter_then_join() {
        let sel = optimize_one(
            "SELECT * FROM orders WHERE customer_id IN (SELECT id FROM customers) AND 1 = 1",
        );
        assert!(sel.where_clause.is_none());
        assert_eq!(sel.joins.len(), 1);
        // `1 = 1` is eliminated later, so it is never swapped ahead.
        assert_eq!(
            sel.optimization_log,
            vec![LOG_FOLD, LOG_ELIMINATE, LOG_IN_TO_JOIN]
        );
    }
}
