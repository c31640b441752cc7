//! Semantic validation of parsed statements against a schema.
//!
//! Validation is read-only and never fails: every finding is collected into
//! a list of human-readable messages, and an empty list means the batch is
//! valid. The caller decides whether findings halt the pipeline.

use crate::catalog::TableLookup;
use crate::sql::ast::*;

/// Check every statement, returning all findings in source order.
pub fn validate<L: TableLookup + ?Sized>(statements: &[Statement], schema: &L) -> Vec<String> {
    let mut errors = Vec::new();
    for stmt in statements {
        match stmt {
            Statement::Select(sel) => {
                check_query(&sel.table, &sel.columns, sel.where_clause.as_ref(), schema, &mut errors)
            }
        }
    }
    log::debug!("validation found {} error(s)", errors.len());
    errors
}

/// Shared by top-level statements and IN-subqueries.
fn check_query<L: TableLookup + ?Sized>(
    table: &str,
    columns: &Projection,
    where_clause: Option<&Condition>,
    schema: &L,
    errors: &mut Vec<String>,
) {
    let Some(table_columns) = schema.lookup(table) else {
        errors.push(format!("Table '{table}' does not exist."));
        return;
    };

    if let Projection::Columns(cols) = columns {
        for col in cols {
            check_column(col, table, table_columns, errors);
        }
    }

    if let Some(cond) = where_clause {
        check_condition(cond, table, table_columns, schema, errors);
    }
}

fn check_condition<L: TableLookup + ?Sized>(
    cond: &Condition,
    table: &str,
    table_columns: &[String],
    schema: &L,
    errors: &mut Vec<String>,
) {
    match cond {
        Condition::Logic { left, right, .. } => {
            check_condition(left, table, table_columns, schema, errors);
            check_condition(right, table, table_columns, schema, errors);
        }
        Condition::Comparison { left, right, .. } => {
            for side in [left, right] {
                for name in side.identifiers() {
                    check_column(name, table, table_columns, errors);
                }
                if let Expression::Subquery(sub) = side {
                    check_query(&sub.table, &sub.columns, sub.where_clause.as_ref(), schema, errors);
                }
            }
        }
        Condition::Boolean(_) => {}
    }
}

fn check_column(column: &str, table: &str, table_columns: &[String], errors: &mut Vec<String>) {
    if !table_columns.iter().any(|c| c == column) {
        errors.push(format!("Column '{column}' does not exist in table '{table}'."));
    }
}
