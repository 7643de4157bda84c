use crate::ast::{Expr, Stmt};
use crate::lexer::{scan, TokenKind};
use crate::token::Token;
use cool_source::{ErrorKind, Source};

mod expr;
mod stmt;

/// Maximum number of arguments in a call and parameters in a function declaration.
pub const MAX_ARGS: usize = 255;
/// Maximum nesting of expressions and statements before the parser gives up on a declaration.
pub const MAX_NESTING_DEPTH: usize = 64;
/// Maximum height of an expression tree, counting operator chains and call suffixes.
pub const MAX_EXPR_HEIGHT: usize = 256;

/// Signals that the current declaration could not be parsed.
/// The error has already been reported when this is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseError;

pub type ParseResult<T> = Result<T, ParseError>;

pub struct Parser<'a> {
    tokens: Vec<Token>,
    /// Index of the current (peeked) token.
    current: usize,
    /// Current nesting depth. See [`MAX_NESTING_DEPTH`].
    depth: usize,
    /// Height of the last parsed expression. See [`MAX_EXPR_HEIGHT`].
    height: usize,
    /// Set when the nesting limit was hit. Enclosing blocks give up until the top level is reached.
    unwinding: bool,
    /// Source code
    source: &'a Source<'a>,
}

impl<'a> Parser<'a> {
    /// Scans `source` and creates a parser for the resulting tokens.
    pub fn new(source: &'a Source<'a>) -> Self {
        Self::with_tokens(scan(source), source)
    }

    /// Creates a parser for already scanned `tokens`.
    pub fn with_tokens(mut tokens: Vec<Token>, source: &'a Source<'a>) -> Self {
        if !tokens.last().map_or(false, Token::is_eof) {
            let line = tokens.last().map_or(1, |token| token.line);
            tokens.push(Token::eof(line));
        }
        Self {
            tokens,
            current: 0,
            depth: 0,
            height: 0,
            unwinding: false,
            source,
        }
    }
}

impl<'a> Parser<'a> {
    /// Parses all the top level declarations.
    /// Declarations with syntax errors are reported and left out of the result.
    pub fn parse_program(&mut self) -> Vec<Stmt> {
        let mut statements = Vec::new();
        while !self.is_at_end() {
            if let Some(stmt) = self.parse_declaration() {
                statements.push(stmt);
            }
        }
        statements
    }
}

/// Parse utilities
impl<'a> Parser<'a> {
    fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    fn previous(&self) -> &Token {
        &self.tokens[self.current - 1]
    }

    fn is_at_end(&self) -> bool {
        self.peek().is_eof()
    }

    /// Eats the current token and returns it. Never moves past [`TokenKind::Eof`].
    fn next(&mut self) -> Token {
        let token = self.peek().clone();
        if !self.is_at_end() {
            self.current += 1;
        }
        token
    }

    fn check(&self, kind: TokenKind) -> bool {
        !self.is_at_end() && self.peek().kind == kind
    }

    /// Like [`Self::check`] but for the token after the current one.
    fn check_next(&self, kind: TokenKind) -> bool {
        !self.is_at_end()
            && self
                .tokens
                .get(self.current + 1)
                .map_or(false, |token| token.kind == kind)
    }

    /// Predicate that tests whether the current token is of kind `kind` and eats it if yes as a side effect.
    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.next(); // eat token
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind, message: &str) -> ParseResult<Token> {
        if self.check(kind) {
            Ok(self.next())
        } else {
            Err(self.unexpected(message))
        }
    }

    /// Expects a primitive type name or a class name.
    fn expect_type(&mut self, message: &str) -> ParseResult<Token> {
        if self.peek().kind.is_type_name() {
            Ok(self.next())
        } else {
            Err(self.unexpected(message))
        }
    }

    /// Reports a syntax error at the current token.
    fn unexpected(&self, message: &str) -> ParseError {
        self.report(ErrorKind::Syntax, self.peek(), message);
        ParseError
    }

    /// Reports an error without aborting the current declaration.
    fn report(&self, kind: ErrorKind, token: &Token, message: &str) {
        self.source.errors.error(kind, token, message);
    }

    /// Runs `parse` one nesting level deeper.
    fn nested<T>(&mut self, parse: impl FnOnce(&mut Self) -> ParseResult<T>) -> ParseResult<T> {
        if self.depth >= MAX_NESTING_DEPTH {
            self.unwinding = true;
            return Err(self.unexpected("Nesting is too deep."));
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    /// Returns the height of a new expression node over a subtree of `height`.
    /// Reports an error at `token` if the tree gets too high.
    fn grow(&self, height: usize, token: &Token) -> ParseResult<usize> {
        if height >= MAX_EXPR_HEIGHT {
            self.report(ErrorKind::Syntax, token, "Expression is too deeply nested.");
            return Err(ParseError);
        }
        Ok(height + 1)
    }

    /// Discards the whole top level statement starting at token `start`,
    /// balancing `()` and `{}` groups.
    fn skip_statement(&mut self, start: usize) {
        self.current = start;
        let mut balance = 0usize;
        while !self.is_at_end() {
            let kind = self.next().kind;
            match kind {
                TokenKind::LParen | TokenKind::LBrace => balance += 1,
                TokenKind::RParen => balance = balance.saturating_sub(1),
                TokenKind::RBrace => {
                    balance = balance.saturating_sub(1);
                    // `while {c} {` and `if {c} {..} else` continue the statement
                    if balance == 0
                        && !matches!(self.peek().kind, TokenKind::LBrace | TokenKind::Else)
                    {
                        return;
                    }
                }
                TokenKind::Semicolon if balance == 0 => return,
                _ => {}
            }
        }
    }

    /// Discards tokens until the start of the next statement.
    fn synchronize(&mut self) {
        self.next();
        while !self.is_at_end() {
            if self.previous().kind == TokenKind::Semicolon || self.peek().kind.starts_statement() {
                return;
            }
            self.next();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Mutability;
    use crate::printer::AstPrinter;
    use insta::assert_snapshot;

    fn program(source: &str) -> Vec<Stmt> {
        let source = source.into();
        let ast = Parser::new(&source).parse_program();
        assert!(source.has_no_errors(), "{}", source.errors);
        ast
    }

    fn print(source: &str) -> String {
        AstPrinter::print(&program(source))
    }

    /// Parses `source` and returns the statements and rendered diagnostics.
    fn program_with_errors(source: &str) -> (Vec<Stmt>, String) {
        let source = source.into();
        let ast = Parser::new(&source).parse_program();
        (ast, source.errors.to_string())
    }

    #[test]
    fn test_var_declaration() {
        assert_snapshot!(print("var x: int = 1; val s: string = \"hi\"; var p: Point = origin;"), @r###"
        VarDecl: x, type: int (var)
          Literal: 1
        VarDecl: s, type: string (val)
          Literal: "hi"
        VarDecl: p, type: Point (var)
          Variable: origin
        "###);

        let ast = program("val y: bool = true;");
        match &ast[0] {
            Stmt::VarDecl(decl) => {
                assert_eq!(decl.mutability, Mutability::Immutable);
                assert_eq!(decl.declared_type.kind, TokenKind::Bool);
            }
            stmt => panic!("expected a variable declaration, got {:?}", stmt),
        }
    }

    #[test]
    fn test_if_else() {
        assert_snapshot!(print("if {a < 1} print a; else { print 2; }"), @r###"
        If:
          Condition:
            Binary: <
              Variable: a
              Literal: 1
          Then:
            Print:
              Variable: a
          Else:
            Block:
              Print:
                Literal: 2
        "###);
    }

    #[test]
    fn test_while() {
        assert_snapshot!(print("while {x} x = x - 1;"), @r###"
        While:
          Condition:
            Variable: x
          Body:
            ExprStatement:
              Assignment: x
                Binary: -
                  Variable: x
                  Literal: 1
        "###);
    }

    #[test]
    fn test_for_desugar() {
        assert_snapshot!(print("for {var i: int = 0; i < 10; i = i + 1} print i;"), @r###"
        Block:
          VarDecl: i, type: int (var)
            Literal: 0
          While:
            Condition:
              Binary: <
                Variable: i
                Literal: 10
            Body:
              Block:
                Print:
                  Variable: i
                ExprStatement:
                  Assignment: i
                    Binary: +
                      Variable: i
                      Literal: 1
        "###);
    }

    #[test]
    fn test_for_without_clauses() {
        assert_snapshot!(print("for {;;} print 1;"), @r###"
        While:
          Condition:
            Literal: true
          Body:
            Print:
              Literal: 1
        "###);
    }

    #[test]
    fn test_function() {
        assert_snapshot!(print("fn add(a: int, b: int) -> int { return a + b; } fn nop() -> void { return; }"), @r###"
        Function: add returns int
          Params: (a: int) (b: int)
          Body:
            Block:
              Return:
                Binary: +
                  Variable: a
                  Variable: b
        Function: nop returns void
          Params:
          Body:
            Block:
              Return:
        "###);
    }

    #[test]
    fn test_class() {
        assert_snapshot!(print("class Dog extends Animal { val name: string = \"rex\"; fn bark() -> void { print name; } }"), @r###"
        Class: Dog inherits Animal
          Attributes:
            VarDecl: name, type: string (val)
              Literal: "rex"
          Methods:
            Function: bark returns void
              Params:
              Body:
                Block:
                  Print:
                    Variable: name
        "###);

        let ast = program("class Empty {}");
        assert!(matches!(
            &ast[0],
            Stmt::Class { parent: None, methods, attributes, .. } if methods.is_empty() && attributes.is_empty()
        ));
    }

    #[test]
    fn test_statement_lines() {
        let ast = program("var a: int = 1;\n\nprint a;\n{}\nclass A {}");
        let lines: Vec<Option<usize>> = ast.iter().map(Stmt::line).collect();
        assert_eq!(lines, vec![Some(1), Some(3), None, Some(5)]);
    }

    #[test]
    fn test_error_recovery() {
        let (ast, errors) = program_with_errors("var x: int = ;\nprint 1;\nprint 2;");
        assert_eq!(errors, "[line 1] at ';': Expected expression.\n");
        assert_eq!(ast.len(), 2);
        assert!(ast.iter().all(|stmt| matches!(stmt, Stmt::Print(_))));
    }

    #[test]
    fn test_error_recovery_at_statement_keyword() {
        let (ast, errors) = program_with_errors("x = 1 2 3\nprint y;");
        assert_eq!(errors, "[line 1] at '2': Expected ';' after expression.\n");
        assert_eq!(ast.len(), 1);
        assert!(matches!(&ast[0], Stmt::Print(Expr::Variable(name)) if name.lexeme == "y"));
    }

    #[test]
    fn test_error_recovery_in_block() {
        let (ast, errors) = program_with_errors("{ print ; print 1; }\nprint 2;");
        assert_eq!(errors, "[line 1] at ';': Expected expression.\n");
        assert_eq!(ast.len(), 2);
        assert!(matches!(&ast[0], Stmt::Block(body) if body.len() == 1));
    }

    #[test]
    fn test_missing_semicolon_at_end() {
        let (ast, errors) = program_with_errors("print 1");
        assert_eq!(errors, "[line 1] at end: Expected ';' after value.\n");
        assert!(ast.is_empty());
    }

    #[test]
    fn test_condition_requires_braces() {
        let (_, errors) = program_with_errors("if (a) print a;");
        assert_eq!(errors, "[line 1] at '(': Expected '{' after 'if'.\n");
    }

    #[test]
    fn test_class_body_error() {
        let (ast, errors) = program_with_errors("class A { print 1; }");
        // the stray `}` is parsed as a statement once the class is dropped
        assert_eq!(
            errors,
            "[line 1] at 'print': Expected method or attribute declaration.\n\
             [line 1] at '}': Expected expression.\n"
        );
        assert!(ast.is_empty());
    }

    #[test]
    fn test_fn_without_name() {
        let (_, errors) = program_with_errors("fn (a: int) -> int { return a; }");
        assert!(errors.starts_with("[line 1] at '(': Expected function name.\n"));
    }

    #[test]
    fn test_missing_return_type() {
        let (ast, errors) = program_with_errors("fn f() { }\nprint 1;");
        assert_eq!(errors, "[line 1] at '{': Expected '->' after parameters.\n");
        assert_eq!(ast.len(), 1);
    }

    #[test]
    fn test_too_many_parameters() {
        let params: Vec<String> = (0..256).map(|i| format!("p{}: int", i)).collect();
        let code = format!("fn f({}) -> void {{}}", params.join(", "));
        let (ast, errors) = program_with_errors(&code);
        assert_eq!(errors, "[line 1] at 'p255': Cannot have more than 255 parameters.\n");
        // parsing continues after a capacity error
        assert!(matches!(&ast[0], Stmt::Function(func) if func.params.len() == 256));
    }

    #[test]
    fn test_nesting_limit() {
        let code = format!("print {}1{};\nprint 2;", "(".repeat(200), ")".repeat(200));
        let source = code.as_str().into();
        let ast = Parser::new(&source).parse_program();
        let diagnostics = source.errors.diagnostics();
        assert_eq!(diagnostics[0].message, "Nesting is too deep.");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(ast.len(), 1);
    }

    #[test]
    fn test_deep_blocks_report_once() {
        let code = format!("{}{}\nprint 2;", "{".repeat(100), "}".repeat(100));
        let (ast, errors) = program_with_errors(&code);
        assert_eq!(errors, "[line 1] at '{': Nesting is too deep.\n");
        assert_eq!(ast.len(), 1);
        assert!(matches!(&ast[0], Stmt::Print(_)));
    }

    #[test]
    fn test_deep_nesting_skips_whole_statement() {
        let code = format!(
            "fn f() -> void {{ while {{x}} {} print 1; {} }}\nprint 2;",
            "{".repeat(80),
            "}".repeat(80)
        );
        let (ast, errors) = program_with_errors(&code);
        assert_eq!(errors, "[line 1] at '{': Nesting is too deep.\n");
        assert_eq!(ast.len(), 1);
        assert!(matches!(&ast[0], Stmt::Print(Expr::Literal { line: 2, .. })));
    }

    #[test]
    fn test_nesting_limit_in_nested_block() {
        let code = format!("{{ print {}1{}; }}\nprint 2;", "(".repeat(100), ")".repeat(100));
        let (ast, errors) = program_with_errors(&code);
        assert_eq!(errors.lines().count(), 1);
        assert!(errors.ends_with("Nesting is too deep.\n"));
        assert_eq!(ast.len(), 1);
    }

    #[test]
    fn test_with_tokens_appends_eof() {
        let source = "".into();
        let mut parser = Parser::with_tokens(Vec::new(), &source);
        assert!(parser.parse_program().is_empty());
        assert!(source.has_no_errors());
    }

    #[test]
    fn test_print_twice_is_identical() {
        let ast = program("class A { var x: int = 1; fn f(a: int) -> int { return -a * (x + 1); } } print f(1)(2);");
        assert_eq!(AstPrinter::print(&ast), AstPrinter::print(&ast));
    }
}
