//! Hand-written tokenizer for the sqlfold dialect.
//!
//! The [`Lexer`] takes a raw query string and produces a `Vec<Token>`.
//! Keywords are matched case-insensitively as whole words and normalised to
//! upper case; identifiers and literals keep their source spelling. Whitespace
//! is skipped and never produces a token.

use serde::Serialize;

use crate::error::{Result, SqlFoldError};

/// The closed set of token categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenKind {
    // -----------------------------------------------------------------------
    // Keywords
    // -----------------------------------------------------------------------
    Select,
    From,
    Where,
    And,
    Or,
    Not,
    In,

    // -----------------------------------------------------------------------
    // Literals & identifiers
    // -----------------------------------------------------------------------
    Number,
    String,
    Identifier,

    // -----------------------------------------------------------------------
    // Operators & punctuation
    // -----------------------------------------------------------------------
    /// `*` in a projection list (`SELECT *`).
    Asterisk,
    Eq,
    Neq,
    Lt,
    Gt,
    Lte,
    Gte,
    Plus,
    Minus,
    /// `*` used as multiplication.
    Star,
    Slash,
    Comma,
    Semicolon,
    #[serde(rename = "LPAREN")]
    LParen,
    #[serde(rename = "RPAREN")]
    RParen,
}

impl TokenKind {
    /// The upper-case name used in diagnostics (`IDENTIFIER`, `LPAREN`, ...).
    pub fn name(self) -> &'static str {
        match self {
            TokenKind::Select => "SELECT",
            TokenKind::From => "FROM",
            TokenKind::Where => "WHERE",
            TokenKind::And => "AND",
            TokenKind::Or => "OR",
            TokenKind::Not => "NOT",
            TokenKind::In => "IN",
            TokenKind::Number => "NUMBER",
            TokenKind::String => "STRING",
            TokenKind::Identifier => "IDENTIFIER",
            TokenKind::Asterisk => "ASTERISK",
            TokenKind::Eq => "EQ",
            TokenKind::Neq => "NEQ",
            TokenKind::Lt => "LT",
            TokenKind::Gt => "GT",
            TokenKind::Lte => "LTE",
            TokenKind::Gte => "GTE",
            TokenKind::Plus => "PLUS",
            TokenKind::Minus => "MINUS",
            TokenKind::Star => "STAR",
            TokenKind::Slash => "SLASH",
            TokenKind::Comma => "COMMA",
            TokenKind::Semicolon => "SEMICOLON",
            TokenKind::LParen => "LPAREN",
            TokenKind::RParen => "RPAREN",
        }
    }

    pub fn is_comparator(self) -> bool {
        matches!(
            self,
            TokenKind::Eq
                | TokenKind::Neq
                | TokenKind::Lt
                | TokenKind::Gt
                | TokenKind::Lte
                | TokenKind::Gte
        )
    }

    pub fn is_arithmetic(self) -> bool {
        matches!(
            self,
            TokenKind::Plus | TokenKind::Minus | TokenKind::Star | TokenKind::Slash
        )
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A single token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    /// Upper-cased for keywords and the source spelling for everything
    /// else, quotes included for string literals.
    pub text: String,
    /// Byte offset of the first character of the token in the source.
    pub position: usize,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, position: usize) -> Self {
        Token {
            kind,
            text: text.into(),
            position,
        }
    }
}

// ---------------------------------------------------------------------------
// Keyword lookup
// ---------------------------------------------------------------------------

fn keyword_kind(word: &str) -> Option<TokenKind> {
    // The input `word` is already uppercased by the caller.
    match word {
        "SELECT" => Some(TokenKind::Select),
        "FROM" => Some(TokenKind::From),
        "WHERE" => Some(TokenKind::Where),
        "AND" => Some(TokenKind::And),
        "OR" => Some(TokenKind::Or),
        "NOT" => Some(TokenKind::Not),
        "IN" => Some(TokenKind::In),
        _ => None,
    }
}

/// Content of a quoted string literal: outer quotes removed and `''`
/// collapsed to `'`.
pub fn unquote(literal: &str) -> String {
    let inner = literal
        .strip_prefix('\'')
        .and_then(|s| s.strip_suffix('\''))
        .unwrap_or(literal);
    inner.replace("''", "'")
}

/// Tokenize `source` in one call.
pub fn tokenize(source: &str) -> Result<Vec<Token>> {
    Lexer::new(source).tokenize()
}

// ---------------------------------------------------------------------------
// Lexer
// ---------------------------------------------------------------------------

/// A hand-written tokenizer.
///
/// Create one with [`Lexer::new`], then call [`Lexer::tokenize`] to obtain
/// the full token stream. The lexer holds no state beyond its cursor, so the
/// same input always yields the same tokens.
pub struct Lexer<'a> {
    source: &'a str,
    input: &'a [u8],
    pos: usize,
    /// Kind of the last emitted token, used to tell `SELECT *` from `a * b`.
    last: Option<TokenKind>,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer over the given query text.
    pub fn new(source: &'a str) -> Self {
        Lexer {
            source,
            input: source.as_bytes(),
            pos: 0,
            last: None,
        }
    }

    /// Tokenize the entire input and return the token list.
    ///
    /// Fails atomically on the first character that no pattern accepts.
    pub fn tokenize(&mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        while let Some(tok) = self.next_token()? {
            self.last = Some(tok.kind);
            tokens.push(tok);
        }
        log::trace!("lexed {} tokens", tokens.len());
        Ok(tokens)
    }

    // -- helpers ------------------------------------------------------------

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.input.get(self.pos + offset).copied()
    }

    fn advance(&mut self) -> Option<u8> {
        let ch = self.input.get(self.pos).copied()?;
        self.pos += 1;
        Some(ch)
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek() {
            if ch.is_ascii_whitespace() {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    fn mismatch(&self, position: usize) -> SqlFoldError {
        let ch = self.source[position..].chars().next().unwrap_or('\0');
        SqlFoldError::Lex { ch, position }
    }

    fn slice(&self, start: usize) -> &'a str {
        &self.source[start..self.pos]
    }

    // -- main scanner -------------------------------------------------------

    fn next_token(&mut self) -> Result<Option<Token>> {
        self.skip_whitespace();

        let ch = match self.peek() {
            Some(c) => c,
            None => return Ok(None),
        };

        if ch == b'\'' {
            return self.read_string_literal().map(Some);
        }

        if ch.is_ascii_digit() {
            return self.read_number().map(Some);
        }

        if ch.is_ascii_alphabetic() || ch == b'_' {
            return Ok(Some(self.read_identifier_or_keyword()));
        }

        self.read_operator().map(Some)
    }

    // -- literal readers ----------------------------------------------------

    fn read_string_literal(&mut self) -> Result<Token> {
        let start = self.pos;
        self.advance(); // consume opening '
        loop {
            match self.advance() {
                None => return Err(self.mismatch(start)),
                // A doubled quote is an escaped quote.
                Some(b'\'') if self.peek() == Some(b'\'') => {
                    self.advance();
                }
                Some(b'\'') => break,
                Some(_) => {}
            }
        }
        Ok(Token::new(TokenKind::String, self.slice(start), start))
    }

    fn read_number(&mut self) -> Result<Token> {
        let start = self.pos;

        while self.peek().map_or(false, |c| c.is_ascii_digit()) {
            self.advance();
        }

        // Fractional part only when a digit follows the dot.
        if self.peek() == Some(b'.') && self.peek_at(1).map_or(false, |c| c.is_ascii_digit()) {
            self.advance();
            while self.peek().map_or(false, |c| c.is_ascii_digit()) {
                self.advance();
            }
        }

        // `1abc` is not a number followed by a word.
        if self.peek().map_or(false, |c| c.is_ascii_alphanumeric() || c == b'_') {
            return Err(self.mismatch(start));
        }

        Ok(Token::new(TokenKind::Number, self.slice(start), start))
    }

    fn read_identifier_or_keyword(&mut self) -> Token {
        let start = self.pos;
        while self
            .peek()
            .map_or(false, |c| c.is_ascii_alphanumeric() || c == b'_')
        {
            self.advance();
        }
        let word = self.slice(start);
        let upper = word.to_ascii_uppercase();

        match keyword_kind(&upper) {
            Some(kind) => Token::new(kind, upper, start),
            None => Token::new(TokenKind::Identifier, word, start),
        }
    }

    fn read_operator(&mut self) -> Result<Token> {
        let start = self.pos;
        let ch = match self.advance() {
            Some(c) => c,
            None => return Err(self.mismatch(start)),
        };
        let kind = match ch {
            b'+' => TokenKind::Plus,
            b'-' => TokenKind::Minus,
            b'/' => TokenKind::Slash,
            b'(' => TokenKind::LParen,
            b')' => TokenKind::RParen,
            b',' => TokenKind::Comma,
            b';' => TokenKind::Semicolon,
            b'=' => TokenKind::Eq,
            b'*' => {
                if self.last == Some(TokenKind::Select) {
                    TokenKind::Asterisk
                } else {
                    TokenKind::Star
                }
            }
            b'!' => {
                if self.peek() == Some(b'=') {
                    self.advance();
                    TokenKind::Neq
                } else {
                    return Err(self.mismatch(start));
                }
            }
            b'<' => {
                if self.peek() == Some(b'=') {
                    self.advance();
                    TokenKind::Lte
                } else if self.peek() == Some(b'>') {
                    self.advance();
                    TokenKind::Neq
                } else {
                    TokenKind::Lt
                }
            }
            b'>' => {
                if self.peek() == Some(b'=') {
                    self.advance();
                    TokenKind::Gte
                } else {
                    TokenKind::Gt
                }
            }
            _ => return Err(self.mismatch(start)),
        };
        Ok(Token::new(kind, self.slice(start), start))
    }
}

// ===========================================================================
// Tests
// ===========================================================================
