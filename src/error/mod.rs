//! Unified error handling for sqlfold.
//!
//! This module defines [`SqlFoldError`], the single error type propagated
//! through every stage of the compiler pipeline, from the lexer up to the
//! schema loader and the CLI.
//!
//! A convenience [`Result<T>`] type alias is re-exported so that callers can
//! write `Result<T>` instead of `std::result::Result<T, SqlFoldError>`.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// The canonical error type for all sqlfold operations.
///
/// Variants are organised by pipeline stage so that callers can match on the
/// failure category without inspecting free-form strings.
#[derive(Debug, Error)]
pub enum SqlFoldError {
    /// A byte of the input matched none of the token patterns. Tokenization
    /// stops at the first such byte.
    #[error("unexpected character '{ch}' at position {position}")]
    Lex { ch: char, position: usize },

    /// An expected token was absent, or the input ended early.
    #[error("expected {expected}, found {found} at position {position}")]
    Parse {
        expected: String,
        found: String,
        position: usize,
    },

    /// The statement kind is not part of the supported dialect.
    #[error("unsupported statement: {0}")]
    UnsupportedStatement(String),

    /// Every finding reported by the semantic validator.
    #[error("semantic check failed: {}", .0.join("; "))]
    Semantic(Vec<String>),

    /// A rewrite was requested on a shape it cannot express, e.g. an
    /// IN-subquery selecting `*` has no join key.
    #[error("unsupported rewrite: {0}")]
    UnsupportedRewrite(String),

    /// The schema file is missing or is not valid schema JSON.
    #[error("failed to load schema from {}: {reason}", .path.display())]
    SchemaLoad { path: PathBuf, reason: String },

    /// An I/O error from the CLI surface (reading input, saving output).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// A specialised [`Result`] type for sqlfold operations.
pub type Result<T> = std::result::Result<T, SqlFoldError>;
