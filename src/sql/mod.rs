//! SQL front-end for sqlfold.
//!
//! This module contains the lexer (tokenizer), abstract syntax tree (AST)
//! definitions, a recursive-descent parser that transforms raw SQL text into
//! a structured AST, and the renderer that turns an AST back into SQL text.

pub mod lexer;
pub mod ast;
pub mod parser;
pub mod render;

pub use ast::*;
pub use lexer::{tokenize, Token, TokenKind};
pub use parser::{parse, Parser};
pub use render::render_sql;
