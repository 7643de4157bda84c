use crate::token::{LiteralValue, Token};
use cool_source::{ErrorKind, Source};
use logos::Logos;

#[derive(Debug, Logos, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // punctuation
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token(":")]
    Colon,
    #[token(";")]
    Semicolon,
    #[token("->")]
    Arrow,

    // operators
    // - arithmetics
    #[token("+")]
    Plus,
    #[token("-")]
    Minus, // NOTE: can also be unary
    #[token("*")]
    Star,
    /// Exponentiation.
    #[token("**")]
    StarStar,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    // - assignment
    #[token("=")]
    Equal,
    // - equality
    #[token("==")]
    EqualEqual,
    #[token("!=")]
    BangEqual,
    // - ordering
    #[token(">")]
    Greater,
    #[token(">=")]
    GreaterEqual,
    #[token("<")]
    Less,
    #[token("<=")]
    LessEqual,
    // - logical
    #[token("!")]
    Bang,
    #[token("&&")]
    And,
    #[token("||")]
    Or,
    #[token("&")]
    Ampersand,
    #[token("|")]
    Pipe,

    // literals
    #[regex("[0-9]+")]
    Number,
    #[regex(r#""[^"]*""#)]
    String,
    #[regex("[a-zA-Z_][a-zA-Z0-9_]*")]
    Identifier,

    // keywords
    #[token("class")]
    Class,
    #[token("extends")]
    Extends,
    #[token("var")]
    Var,
    #[token("val")]
    Val,
    #[token("fn")]
    Fn,
    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("if")]
    If,
    #[token("else")]
    Else,
    #[token("while")]
    While,
    #[token("for")]
    For,
    #[token("return")]
    Return,
    #[token("print")]
    Print,

    // primitive types
    #[token("int")]
    Int,
    #[token("string")]
    StringType,
    #[token("bool")]
    Bool,
    #[token("void")]
    Void,

    /// A string literal missing its closing quote. Never emitted by [`scan`].
    #[regex(r#""[^"]*"#)]
    UnterminatedString,

    // misc
    #[regex(r"[ \t\n\r\f]+", logos::skip)]
    #[error]
    Error,

    /// Only generated by [`scan`] once the source is exhausted.
    Eof,
}

impl TokenKind {
    /// Returns `true` if the token can be used as a type annotation.
    pub fn is_type_name(self) -> bool {
        matches!(
            self,
            TokenKind::Int
                | TokenKind::StringType
                | TokenKind::Bool
                | TokenKind::Void
                | TokenKind::Identifier
        )
    }

    /// Returns `true` if the token starts a declaration or a statement.
    /// Used as a synchronization point after a syntax error.
    pub fn starts_statement(self) -> bool {
        matches!(
            self,
            TokenKind::Class
                | TokenKind::Fn
                | TokenKind::Val
                | TokenKind::Var
                | TokenKind::For
                | TokenKind::If
                | TokenKind::While
                | TokenKind::Print
                | TokenKind::Return
        )
    }
}

/// Converts source code into [`Token`]s.
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, TokenKind>,
    source: &'a Source<'a>,
    /// Line number at byte offset `counted`.
    line: usize,
    counted: usize,
    /// Errors starting before this offset belong to a character that was already reported.
    resume: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a Source<'a>) -> Self {
        Self {
            inner: TokenKind::lexer(source.content),
            source,
            line: 1,
            counted: 0,
            resume: 0,
        }
    }

    /// Scans the whole source. Always ends with exactly one [`TokenKind::Eof`].
    pub fn scan(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();

        while let Some(kind) = self.inner.next() {
            let span = self.inner.span();
            let line = self.line_at(span.start);

            match kind {
                TokenKind::Error => self.unexpected_character(span.start, line),
                TokenKind::UnterminatedString => {
                    self.source
                        .errors
                        .error(ErrorKind::Lexical, line, "Unterminated string.")
                }
                _ => {
                    let lexeme = self.inner.slice();
                    if let Some(literal) = self.literal(kind, lexeme, line) {
                        tokens.push(Token::new(kind, literal, lexeme, line));
                    }
                }
            }
        }

        let line = self.line_at(self.source.content.len());
        tokens.push(Token::eof(line));
        tokens
    }

    /// Returns the literal value of the token or `None` if the token is invalid.
    fn literal(&self, kind: TokenKind, lexeme: &str, line: usize) -> Option<LiteralValue> {
        let literal = match kind {
            TokenKind::Number => match lexeme.parse() {
                Ok(val) => LiteralValue::Number(val),
                Err(_) => {
                    self.source
                        .errors
                        .error(ErrorKind::Lexical, line, "Invalid number literal.");
                    return None;
                }
            },
            // strip the quotes
            TokenKind::String => LiteralValue::Str(lexeme[1..lexeme.len() - 1].to_string()),
            TokenKind::True => LiteralValue::Bool(true),
            TokenKind::False => LiteralValue::Bool(false),
            _ => LiteralValue::None,
        };
        Some(literal)
    }

    fn unexpected_character(&mut self, offset: usize, line: usize) {
        if offset < self.resume {
            return;
        }
        let character = self
            .source
            .content
            .get(offset..)
            .and_then(|rest| rest.chars().next());
        if let Some(character) = character {
            self.resume = offset + character.len_utf8();
            self.source.errors.error(
                ErrorKind::Lexical,
                line,
                format!("Unexpected character '{}'.", character),
            );
        }
    }

    /// Returns the line number at byte `offset`. Offsets must be requested in increasing order.
    fn line_at(&mut self, offset: usize) -> usize {
        if offset > self.counted {
            self.line += self.source.content.as_bytes()[self.counted..offset]
                .iter()
                .filter(|&&byte| byte == b'\n')
                .count();
            self.counted = offset;
        }
        self.line
    }
}

/// Scans the source code of `source` into a [`Vec`] of [`Token`]s.
/// Lexical errors are reported to `source.errors` and scanning continues.
pub fn scan(source: &Source) -> Vec<Token> {
    Lexer::new(source).scan()
}
