//! Predictive recursive-descent parser for the sqlfold dialect.
//!
//! The entry point is [`Parser::parse_sql`], which tokenizes the input and
//! then parses zero or more semicolon-separated statements into a
//! `Vec<Statement>`. Every decision is made on the current token alone; the
//! parser never backtracks.
//!
//! ```text
//! program     := statement (SEMICOLON)? *
//! select      := SELECT columns FROM IDENTIFIER (WHERE condition)?
//! columns     := ASTERISK | IDENTIFIER (COMMA IDENTIFIER)*
//! condition   := atomic ((AND|OR) condition)*
//! atomic      := LPAREN condition RPAREN
//!              | operand (IN subquery | comparator expression)
//! subquery    := LPAREN SELECT columns FROM IDENTIFIER (WHERE condition)? RPAREN
//! expression  := operand ((PLUS|MINUS|STAR|SLASH) operand)*
//! operand     := LPAREN expression RPAREN | NUMBER | STRING | IDENTIFIER
//! ```
//!
//! `AND`/`OR` chains nest to the right (`a AND b AND c` is
//! `a AND (b AND c)`) with no precedence between the two; arithmetic chains
//! nest to the left with no precedence between operators.

use crate::error::{Result, SqlFoldError};
use crate::sql::ast::*;
use crate::sql::lexer::{unquote, Lexer, Token, TokenKind};

/// Result of parsing a parenthesised group at the start of a condition,
/// where `(` may open either a nested condition or an arithmetic operand.
enum Group {
    Condition(Condition),
    Expression(Expression),
}

/// A recursive-descent parser that transforms a token stream into an AST.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    /// Byte offset reported for errors at end of input.
    end: usize,
}

/// Parse an already-lexed token stream.
pub fn parse(tokens: Vec<Token>) -> Result<Vec<Statement>> {
    Parser::new(tokens).parse_program()
}

impl Parser {
    /// Create a parser over `tokens`. End-of-input errors are reported at the
    /// end of the last token.
    pub fn new(tokens: Vec<Token>) -> Self {
        let end = tokens.last().map_or(0, |t| t.position + t.text.len());
        Parser { tokens, pos: 0, end }
    }

    /// Report end-of-input errors at `end`, normally the source length.
    pub fn set_end(&mut self, end: usize) {
        self.end = end;
    }

    /// Tokenize and parse a query string into a list of statements.
    pub fn parse_sql(sql: &str) -> Result<Vec<Statement>> {
        let tokens = Lexer::new(sql).tokenize()?;
        let mut parser = Parser::new(tokens);
        parser.set_end(sql.len());
        parser.parse_program()
    }

    /// Parse every statement in the token stream.
    pub fn parse_program(&mut self) -> Result<Vec<Statement>> {
        let mut stmts = Vec::new();
        loop {
            // Skip optional semicolons between statements.
            while self.at(TokenKind::Semicolon) {
                self.advance();
            }
            if self.current().is_none() {
                break;
            }
            stmts.push(self.parse_statement()?);
            if self.at(TokenKind::Semicolon) {
                self.advance();
            }
        }
        log::trace!("parsed {} statement(s)", stmts.len());
        Ok(stmts)
    }

    // =======================================================================
    // Token helpers
    // =======================================================================

    fn current(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn current_kind(&self) -> Option<TokenKind> {
        self.current().map(|t| t.kind)
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.current_kind() == Some(kind)
    }

    fn advance(&mut self) -> Option<Token> {
        let tok = self.tokens.get(self.pos).cloned();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    /// Consume a token of the given kind or fail.
    fn expect(&mut self, kind: TokenKind) -> Result<Token> {
        match self.current() {
            Some(tok) if tok.kind == kind => {
                let tok = tok.clone();
                self.pos += 1;
                Ok(tok)
            }
            _ => Err(self.error(kind.name())),
        }
    }

    fn error(&self, expected: &str) -> SqlFoldError {
        let (found, position) = match self.current() {
            Some(tok) => (describe(tok), tok.position),
            None => ("end of input".to_string(), self.end),
        };
        SqlFoldError::Parse {
            expected: expected.to_string(),
            found,
            position,
        }
    }

    // =======================================================================
    // Statements
    // =======================================================================

    fn parse_statement(&mut self) -> Result<Statement> {
        match self.current() {
            Some(tok) if tok.kind == TokenKind::Select => {
                Ok(Statement::Select(self.parse_select()?))
            }
            // INSERT, UPDATE, ... lex as plain identifiers in this dialect.
            Some(tok) if tok.kind == TokenKind::Identifier => Err(
                SqlFoldError::UnsupportedStatement(tok.text.to_ascii_uppercase()),
            ),
            _ => Err(self.error("SELECT")),
        }
    }

    fn parse_select(&mut self) -> Result<SelectStatement> {
        let (columns, table, where_clause) = self.parse_select_body()?;
        Ok(SelectStatement::new(columns, table, where_clause))
    }

    /// `SELECT columns FROM IDENTIFIER (WHERE condition)?`, shared by
    /// top-level statements and subqueries.
    fn parse_select_body(&mut self) -> Result<(Projection, String, Option<Condition>)> {
        self.expect(TokenKind::Select)?;
        let columns = self.parse_columns()?;
        self.expect(TokenKind::From)?;
        let table = self.expect(TokenKind::Identifier)?.text;

        let where_clause = if self.at(TokenKind::Where) {
            self.advance();
            Some(self.parse_condition()?)
        } else {
            None
        };
        Ok((columns, table, where_clause))
    }

    fn parse_columns(&mut self) -> Result<Projection> {
        if self.at(TokenKind::Asterisk) {
            self.advance();
            return Ok(Projection::All);
        }

        let mut cols = vec![self.expect(TokenKind::Identifier)?.text];
        while self.at(TokenKind::Comma) {
            self.advance();
            cols.push(self.expect(TokenKind::Identifier)?.text);
        }
        Ok(Projection::Columns(cols))
    }

    // =======================================================================
    // Conditions
    // =======================================================================

    fn parse_condition(&mut self) -> Result<Condition> {
        let left = self.parse_atomic()?;
        self.continue_condition(left)
    }

    /// Attach a trailing `AND`/`OR` chain to an already parsed left side.
    fn continue_condition(&mut self, left: Condition) -> Result<Condition> {
        let op = match self.current_kind() {
            Some(TokenKind::And) => LogicOp::And,
            Some(TokenKind::Or) => LogicOp::Or,
            _ => return Ok(left),
        };
        self.advance();
        let right = self.parse_condition()?;
        Ok(Condition::logic(op, left, right))
    }

    fn parse_atomic(&mut self) -> Result<Condition> {
        if self.at(TokenKind::LParen) {
            return match self.parse_group()? {
                Group::Condition(cond) => Ok(cond),
                Group::Expression(expr) => {
                    let expr = self.continue_expression(expr)?;
                    self.finish_comparison(expr)
                }
            };
        }
        let left = self.parse_expression()?;
        self.finish_comparison(left)
    }

    /// Parse `( ... )` where the contents may be a condition or an
    /// arithmetic expression. The choice is made after the inner expression:
    /// a comparator or `IN` makes it a condition.
    fn parse_group(&mut self) -> Result<Group> {
        self.expect(TokenKind::LParen)?;

        let inner = if self.at(TokenKind::LParen) {
            self.parse_group()?
        } else {
            Group::Expression(self.parse_expression()?)
        };

        let group = match inner {
            Group::Condition(cond) => Group::Condition(self.continue_condition(cond)?),
            Group::Expression(expr) => {
                let expr = self.continue_expression(expr)?;
                if self.at_comparison_operator() {
                    let cmp = self.finish_comparison(expr)?;
                    Group::Condition(self.continue_condition(cmp)?)
                } else {
                    Group::Expression(expr)
                }
            }
        };

        self.expect(TokenKind::RParen)?;
        Ok(group)
    }

    fn at_comparison_operator(&self) -> bool {
        self.current_kind()
            .map_or(false, |k| k.is_comparator() || k == TokenKind::In)
    }

    /// Parse the operator and right side of a comparison whose left operand
    /// has been parsed already.
    fn finish_comparison(&mut self, left: Expression) -> Result<Condition> {
        let op = match self.current_kind() {
            Some(TokenKind::In) => {
                self.advance();
                let subquery = self.parse_subquery()?;
                return Ok(Condition::comparison(
                    left,
                    CompareOp::In,
                    Expression::Subquery(Box::new(subquery)),
                ));
            }
            Some(TokenKind::Eq) => CompareOp::Eq,
            Some(TokenKind::Neq) => CompareOp::NotEq,
            Some(TokenKind::Lt) => CompareOp::Lt,
            Some(TokenKind::Gt) => CompareOp::Gt,
            Some(TokenKind::Lte) => CompareOp::LtEq,
            Some(TokenKind::Gte) => CompareOp::GtEq,
            _ => return Err(self.error("comparison operator or IN")),
        };
        self.advance();
        let right = self.parse_expression()?;
        Ok(Condition::comparison(left, op, right))
    }

    fn parse_subquery(&mut self) -> Result<Subquery> {
        self.expect(TokenKind::LParen)?;
        let (columns, table, where_clause) = self.parse_select_body()?;
        self.expect(TokenKind::RParen)?;
        Ok(Subquery {
            columns,
            table,
            where_clause,
        })
    }

    // =======================================================================
    // Expressions
    // =======================================================================

    fn parse_expression(&mut self) -> Result<Expression> {
        let left = self.parse_operand()?;
        self.continue_expression(left)
    }

    fn continue_expression(&mut self, mut left: Expression) -> Result<Expression> {
        loop {
            let op = match self.current_kind() {
                Some(TokenKind::Plus) => ArithOp::Add,
                Some(TokenKind::Minus) => ArithOp::Sub,
                Some(TokenKind::Star) => ArithOp::Mul,
                Some(TokenKind::Slash) => ArithOp::Div,
                _ => break,
            };
            self.advance();
            let right = self.parse_operand()?;
            left = Expression::binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_operand(&mut self) -> Result<Expression> {
        let kind = match self.current_kind() {
            Some(kind) => kind,
            None => return Err(self.error("NUMBER, STRING, IDENTIFIER or LPAREN")),
        };
        match kind {
            TokenKind::LParen => {
                self.advance();
                let expr = self.parse_expression()?;
                self.expect(TokenKind::RParen)?;
                Ok(expr)
            }
            TokenKind::Number | TokenKind::String | TokenKind::Identifier => {
                let text = self.advance().map(|t| t.text).unwrap_or_default();
                Ok(match kind {
                    TokenKind::Number => Expression::Number(text),
                    TokenKind::String => Expression::String(unquote(&text)),
                    _ => Expression::Identifier(text),
                })
            }
            _ => Err(self.error("NUMBER, STRING, IDENTIFIER or LPAREN")),
        }
    }
}

fn describe(tok: &Token) -> String {
    match tok.kind {
        TokenKind::Identifier | TokenKind::Number => format!("{} '{}'", tok.kind, tok.text),
        TokenKind::String => format!("STRING {}", tok.text),
        kind => kind.name().to_string(),
    }
}

// ===========================================================================
// Tests
// ===========================================================================
