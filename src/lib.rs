//! # sqlfold
//!
//! A front-end compiler for a restricted SQL dialect. A query string is
//! tokenized, parsed into an AST, validated against a table/column schema,
//! rewritten by a fixed pipeline of optimizer passes, and finally emitted
//! both as relational algebra and as regenerated SQL.
//!
//! ```no_run
//! use std::sync::Arc;
//! use sqlfold::{Compiler, Schema};
//!
//! let schema = Arc::new(Schema::load("schema/mock_schema.json")?);
//! let out = Compiler::new(schema).compile("SELECT id, id FROM users WHERE 1 = 1;")?;
//! assert_eq!(out.sql, "SELECT id FROM users;");
//! # Ok::<(), sqlfold::SqlFoldError>(())
//! ```

pub mod error;
pub mod catalog;
pub mod sql;
pub mod semantic;
pub mod optimizer;
pub mod planner;

pub use catalog::{Schema, TableLookup};
pub use error::{Result, SqlFoldError};
pub use optimizer::optimize;
pub use planner::generate_ir;
pub use semantic::validate;
pub use sql::{parse, render_sql, tokenize, Statement, Token, TokenKind};

use std::sync::Arc;

use serde::Serialize;

/// Everything the pipeline produced for one query string.
#[derive(Debug, Clone, Serialize)]
pub struct Compilation {
    pub source: String,
    pub tokens: Vec<Token>,
    /// Statements as parsed, before optimization.
    pub statements: Vec<Statement>,
    pub optimized: Vec<Statement>,
    /// Relational algebra, one line per statement.
    pub ir: String,
    /// Regenerated SQL, one line per statement.
    pub sql: String,
}

/// The compiler pipeline, bound to a shared read-only schema.
///
/// Cloning is cheap and a `Compiler` may be used from many threads at once;
/// each call to [`Compiler::compile`] owns its own trees.
#[derive(Debug, Clone)]
pub struct Compiler {
    schema: Arc<Schema>,
}

impl Compiler {
    pub fn new(schema: Arc<Schema>) -> Self {
        Compiler { schema }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Run the full pipeline.
    ///
    /// Lex and parse errors stop the pipeline immediately; semantic errors
    /// are reported all at once as [`SqlFoldError::Semantic`].
    pub fn compile(&self, source: &str) -> Result<Compilation> {
        let tokens = tokenize(source)?;
        log::debug!("lexed {} tokens", tokens.len());

        let mut parser = sql::Parser::new(tokens.clone());
        parser.set_end(source.len());
        let statements = parser.parse_program()?;
        log::debug!("parsed {} statement(s)", statements.len());

        let errors = validate(&statements, self.schema.as_ref());
        if !errors.is_empty() {
            return Err(SqlFoldError::Semantic(errors));
        }

        let optimized = optimize(statements.clone())?;
        let ir = generate_ir(&optimized);
        let sql = render_sql(&optimized);
        log::debug!("emitted IR and SQL for {} statement(s)", optimized.len());

        Ok(Compilation {
            source: source.to_string(),
            tokens,
            statements,
            optimized,
            ir,
            sql,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compiler() -> Compiler {
        Compiler::new(Arc::new(Schema::from_tables([
            ("users", vec!["id", "name", "age"]),
            ("orders", vec!["id", "customer_id", "total"]),
            ("customers", vec!["id", "name", "active"]),
        ])))
    }

    #[test]
    fn compile_reports_every_stage() {
        let out = compiler().compile("SELECT id, id FROM users WHERE age > 20 + 5;").unwrap();
        assert_eq!(out.tokens.len(), 13);
        assert_eq!(out.statements.len(), 1);
        assert_eq!(out.ir, "π[id] (σ[age > 25] (users))");
        assert_eq!(out.sql, "SELECT id FROM users WHERE age > 25;");
    }

    #[test]
    fn semantic_errors_halt_the_pipeline() {
        match compiler().compile("SELECT foo FROM users WHERE bar = 1") {
            Err(SqlFoldError::Semantic(errors)) => assert_eq!(errors.len(), 2),
            other => panic!("expected Semantic, got {other:?}"),
        }
    }

    #[test]
    fn lex_errors_stop_before_parsing() {
        assert!(matches!(
            compiler().compile("SELECT # FROM users"),
            Err(SqlFoldError::Lex { ch: '#', position: 7 })
        ));
    }

    #[test]
    fn parse_error_at_end_reports_source_length() {
        let sql = "SELECT id FROM users WHERE ";
        match compiler().compile(sql) {
            Err(SqlFoldError::Parse { position, .. }) => assert_eq!(position, sql.len()),
            other => panic!("expected Parse, got {other:?}"),
        }
    }

    #[test]
    fn empty_input_compiles_to_nothing() {
        let out = compiler().compile("  ;  ").unwrap();
        assert!(out.optimized.is_empty());
        assert_eq!(out.ir, "");
        assert_eq!(out.sql, "");
    }

    #[test]
    fn compilation_serializes_to_json() {
        let out = compiler().compile("SELECT name FROM users WHERE id = 1").unwrap();
        let json = serde_json::to_value(&out).unwrap();
        assert_eq!(json["tokens"][0]["kind"], "SELECT");
        assert_eq!(json["optimized"][0]["Select"]["table"], "users");
        assert_eq!(json["sql"], "SELECT name FROM users WHERE id = 1;");
    }
}
