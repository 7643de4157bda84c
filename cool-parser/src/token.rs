use crate::lexer::TokenKind;
use cool_source::Location;
use std::fmt;

/// The value carried by a literal token.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    None,
    Str(String),
    Bool(bool),
    Number(f64),
}

impl fmt::Display for LiteralValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LiteralValue::None => write!(f, "null"),
            LiteralValue::Str(val) => write!(f, "\"{}\"", val),
            LiteralValue::Bool(val) => write!(f, "{}", val),
            LiteralValue::Number(val) => write!(f, "{}", val),
        }
    }
}

/// A scanned token.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub literal: LiteralValue,
    /// The exact source text of the token. Empty only for [`TokenKind::Eof`].
    pub lexeme: String,
    pub line: usize,
}

impl Token {
    pub fn new(kind: TokenKind, literal: LiteralValue, lexeme: impl Into<String>, line: usize) -> Self {
        Self {
            kind,
            literal,
            lexeme: lexeme.into(),
            line,
        }
    }

    /// Creates the end of file sentinel.
    pub fn eof(line: usize) -> Self {
        Self::new(TokenKind::Eof, LiteralValue::None, "", line)
    }

    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.literal {
            LiteralValue::None => write!(f, "{:?} '{}' (line {})", self.kind, self.lexeme, self.line),
            ref literal => write!(
                f,
                "{:?} '{}' {} (line {})",
                self.kind, self.lexeme, literal, self.line
            ),
        }
    }
}

impl From<&Token> for Location {
    fn from(token: &Token) -> Self {
        if token.is_eof() {
            Location::End(token.line)
        } else {
            Location::Lexeme {
                line: token.line,
                lexeme: token.lexeme.clone(),
            }
        }
    }
}
