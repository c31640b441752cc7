//! Abstract syntax tree definitions for the sqlfold dialect.
//!
//! Every statement parsed by the [`super::parser::Parser`] is represented
//! as a tree of the types defined here. Conditions and expressions are
//! closed, explicitly tagged sum types: a node's kind is fixed when the parser
//! builds it. Optimizer passes consume a tree and return a new owned one, so
//! no node is ever shared between statements.

use serde::Serialize;

/// A top-level SQL statement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Statement {
    Select(SelectStatement),
}

impl Statement {
    /// Keyword naming the statement kind, as used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Statement::Select(_) => "SELECT",
        }
    }
}

/// A `SELECT` statement.
///
/// `joins` and `optimization_log` are always empty when the statement comes
/// out of the parser; only the optimizer fills them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectStatement {
    pub columns: Projection,
    pub table: String,
    pub where_clause: Option<Condition>,
    pub joins: Vec<Join>,
    pub optimization_log: Vec<String>,
}

impl SelectStatement {
    pub fn new(columns: Projection, table: impl Into<String>, where_clause: Option<Condition>) -> Self {
        SelectStatement {
            columns,
            table: table.into(),
            where_clause,
            joins: Vec::new(),
            optimization_log: Vec::new(),
        }
    }
}

/// The projection list of a `SELECT`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Projection {
    /// A bare `*`.
    All,
    /// Named columns, in source order.
    Columns(Vec<String>),
}

impl Projection {
    /// Column names for display; `*` for [`Projection::All`].
    pub fn names(&self) -> Vec<&str> {
        match self {
            Projection::All => vec!["*"],
            Projection::Columns(cols) => cols.iter().map(String::as_str).collect(),
        }
    }

    /// The first selected column, if the projection names any.
    pub fn first(&self) -> Option<&str> {
        match self {
            Projection::All => None,
            Projection::Columns(cols) => cols.first().map(String::as_str),
        }
    }
}

/// A join produced by the IN-subquery rewrite.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Join {
    pub table: String,
    pub on: JoinCondition,
    /// The subquery's residual filter. Advisory only: it is carried for
    /// display and is not re-validated.
    pub filter: Option<Condition>,
}

/// `left op right` between two column references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JoinCondition {
    pub left: String,
    pub op: CompareOp,
    pub right: String,
}

// ---------------------------------------------------------------------------
// Conditions
// ---------------------------------------------------------------------------

/// A boolean filter tree. `Logic` nodes are internal; `Comparison` and
/// `Boolean` are leaves.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Condition {
    Logic {
        op: LogicOp,
        left: Box<Condition>,
        right: Box<Condition>,
    },
    /// `op` is [`CompareOp::In`] only when `right` is an
    /// [`Expression::Subquery`].
    Comparison {
        left: Expression,
        op: CompareOp,
        right: Expression,
    },
    Boolean(bool),
}

impl Condition {
    pub fn logic(op: LogicOp, left: Condition, right: Condition) -> Self {
        Condition::Logic {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn comparison(left: Expression, op: CompareOp, right: Expression) -> Self {
        Condition::Comparison { left, op, right }
    }

    /// All leaf nodes, left to right.
    pub fn leaves(&self) -> Vec<&Condition> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a Condition>) {
        match self {
            Condition::Logic { left, right, .. } => {
                left.collect_leaves(out);
                right.collect_leaves(out);
            }
            leaf => out.push(leaf),
        }
    }
}

/// `AND` / `OR`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LogicOp {
    And,
    Or,
}

impl LogicOp {
    pub fn keyword(self) -> &'static str {
        match self {
            LogicOp::And => "AND",
            LogicOp::Or => "OR",
        }
    }
}

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CompareOp {
    Eq,
    NotEq,
    Lt,
    Gt,
    LtEq,
    GtEq,
    In,
}

impl CompareOp {
    pub fn symbol(self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::NotEq => "!=",
            CompareOp::Lt => "<",
            CompareOp::Gt => ">",
            CompareOp::LtEq => "<=",
            CompareOp::GtEq => ">=",
            CompareOp::In => "IN",
        }
    }

    /// The operator that keeps the comparison true when its operands are
    /// swapped (`a < b` iff `b > a`). `None` for `IN`.
    pub fn mirrored(self) -> Option<CompareOp> {
        match self {
            CompareOp::Eq => Some(CompareOp::Eq),
            CompareOp::NotEq => Some(CompareOp::NotEq),
            CompareOp::Lt => Some(CompareOp::Gt),
            CompareOp::Gt => Some(CompareOp::Lt),
            CompareOp::LtEq => Some(CompareOp::GtEq),
            CompareOp::GtEq => Some(CompareOp::LtEq),
            CompareOp::In => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Expressions
// ---------------------------------------------------------------------------

/// Anything that can appear on either side of a comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Expression {
    /// Numeric literal, kept in its source spelling.
    Number(String),
    /// String literal content, without quotes.
    String(String),
    Identifier(String),
    Binary {
        op: ArithOp,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    Subquery(Box<Subquery>),
}

impl Expression {
    pub fn binary(op: ArithOp, left: Expression, right: Expression) -> Self {
        Expression::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Expression::Number(_) | Expression::String(_))
    }

    /// Every column name referenced by this expression, left to right.
    /// Subqueries are not descended into; they reference another table.
    pub fn identifiers(&self) -> Vec<&str> {
        match self {
            Expression::Identifier(name) => vec![name.as_str()],
            Expression::Binary { left, right, .. } => {
                let mut names = left.identifiers();
                names.extend(right.identifiers());
                names
            }
            Expression::Number(_) | Expression::String(_) | Expression::Subquery(_) => vec![],
        }
    }
}

/// Arithmetic operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl ArithOp {
    pub fn symbol(self) -> &'static str {
        match self {
            ArithOp::Add => "+",
            ArithOp::Sub => "-",
            ArithOp::Mul => "*",
            ArithOp::Div => "/",
        }
    }
}

/// `(SELECT columns FROM table WHERE ...)` on the right of `IN`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Subquery {
    pub columns: Projection,
    pub table: String,
    pub where_clause: Option<Condition>,
}
