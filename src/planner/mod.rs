//! # Query Planner
//!
//! Lowers optimized `SELECT` statements into a logical relational-algebra
//! plan and prints it as the compiler's intermediate representation:
//!
//! ```text
//! π[id, name] (σ[age > 25] (users))
//! π[*] (orders ⋈[orders.customer_id = customers.id] σ[active = 1] (customers))
//! ```

use std::fmt;

use crate::sql::ast::*;
use crate::sql::render::expression_sql;

/// A logical plan node describing what to compute.
#[derive(Debug, Clone, PartialEq)]
pub enum LogicalPlan {
    /// Scan all rows from a table.
    Scan { table: String },
    /// Filter rows by a predicate.
    Filter {
        input: Box<LogicalPlan>,
        predicate: Condition,
    },
    /// Equi-join two inputs.
    Join {
        left: Box<LogicalPlan>,
        right: Box<LogicalPlan>,
        on: JoinCondition,
    },
    /// Project (select) specific columns.
    Project {
        input: Box<LogicalPlan>,
        columns: Projection,
    },
}

/// Plan a parsed SQL statement into a logical plan.
pub fn plan_statement(stmt: &Statement) -> LogicalPlan {
    match stmt {
        Statement::Select(select) => plan_select(select),
    }
}

fn plan_select(select: &SelectStatement) -> LogicalPlan {
    // Build the plan bottom-up: scan -> joins -> filter -> project

    let mut plan = LogicalPlan::Scan {
        table: select.table.clone(),
    };

    for join in &select.joins {
        let mut right = LogicalPlan::Scan {
            table: join.table.clone(),
        };
        if let Some(filter) = &join.filter {
            right = LogicalPlan::Filter {
                input: Box::new(right),
                predicate: filter.clone(),
            };
        }
        plan = LogicalPlan::Join {
            left: Box::new(plan),
            right: Box::new(right),
            on: join.on.clone(),
        };
    }

    if let Some(ref where_clause) = select.where_clause {
        plan = LogicalPlan::Filter {
            input: Box::new(plan),
            predicate: where_clause.clone(),
        };
    }

    LogicalPlan::Project {
        input: Box::new(plan),
        columns: select.columns.clone(),
    }
}

/// Render every statement as one line of relational algebra.
pub fn generate_ir(statements: &[Statement]) -> String {
    statements
        .iter()
        .map(|stmt| plan_statement(stmt).to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

impl fmt::Display for LogicalPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogicalPlan::Scan { table } => f.write_str(table),
            LogicalPlan::Filter { input, predicate } => {
                write!(f, "σ[{}] ({})", condition_ir(predicate), input)
            }
            LogicalPlan::Join { left, right, on } => write!(
                f,
                "{} ⋈[{} {} {}] {}",
                left,
                on.left,
                on.op.symbol(),
                on.right,
                right
            ),
            LogicalPlan::Project { input, columns } => {
                write!(f, "π[{}] ({})", columns.names().join(", "), input)
            }
        }
    }
}

fn condition_ir(cond: &Condition) -> String {
    match cond {
        Condition::Logic { op, left, right } => format!(
            "({} {} {})",
            condition_ir(left),
            op.keyword(),
            condition_ir(right)
        ),
        Condition::Comparison { left, op, right } => format!(
            "{} {} {}",
            expression_sql(left),
            op.symbol(),
            expression_sql(right)
        ),
        Condition::Boolean(true) => "TRUE".to_string(),
        Condition::Boolean(false) => "FALSE".to_string(),
    }
}
