use super::*;
use crate::ast::{FunctionDecl, Mutability, Param, VarDecl};
use crate::token::LiteralValue;

impl<'a> Parser<'a> {
    /// Parses a declaration (or statement).
    /// On a syntax error, skips to the next statement and returns `None`.
    /// After hitting the nesting limit, the whole top level statement is skipped instead.
    pub fn parse_declaration(&mut self) -> Option<Stmt> {
        let start = self.current;
        match self.nested(Self::declaration) {
            Ok(stmt) => Some(stmt),
            Err(ParseError) if self.unwinding => {
                if self.depth == 0 {
                    self.unwinding = false;
                    self.skip_statement(start);
                }
                None
            }
            Err(ParseError) => {
                self.synchronize();
                None
            }
        }
    }

    fn declaration(&mut self) -> ParseResult<Stmt> {
        if self.eat(TokenKind::Class) {
            return self.parse_class_declaration();
        }
        if self.check(TokenKind::Fn) && self.check_next(TokenKind::Identifier) {
            self.next(); // eat 'fn'
            return Ok(Stmt::Function(self.parse_fn_declaration()?));
        }
        if let Some(mutability) = self.eat_mutability() {
            return Ok(Stmt::VarDecl(self.parse_var_declaration(mutability)?));
        }
        self.statement()
    }

    /// Parses a statement.
    pub fn parse_stmt(&mut self) -> ParseResult<Stmt> {
        self.nested(Self::statement)
    }

    fn statement(&mut self) -> ParseResult<Stmt> {
        match self.peek().kind {
            // `fn` without a name, report the missing name
            TokenKind::Fn => {
                self.next();
                Ok(Stmt::Function(self.parse_fn_declaration()?))
            }
            TokenKind::For => self.parse_for_stmt(),
            TokenKind::If => self.parse_if_stmt(),
            TokenKind::Print => self.parse_print_stmt(),
            TokenKind::Return => self.parse_return_stmt(),
            TokenKind::While => self.parse_while_stmt(),
            TokenKind::LBrace => self.parse_block_stmt(),
            _ => self.parse_expr_stmt(),
        }
    }

    /// Eats a `var` or `val` keyword.
    fn eat_mutability(&mut self) -> Option<Mutability> {
        let mutability = match self.peek().kind {
            TokenKind::Var => Mutability::Mutable,
            TokenKind::Val => Mutability::Immutable,
            _ => return None,
        };
        self.next();
        Some(mutability)
    }

    /// Parses `name: type = initializer;`. The `var` or `val` keyword must already be eaten.
    fn parse_var_declaration(&mut self, mutability: Mutability) -> ParseResult<VarDecl> {
        let name = self.expect(TokenKind::Identifier, "Expected variable name.")?;
        self.expect(TokenKind::Colon, "Expected ':' after variable name.")?;
        let declared_type = self.expect_type("Expected type after ':'.")?;
        self.expect(TokenKind::Equal, "Expected '=' after variable type.")?;
        let initializer = self.parse_expr()?;
        self.expect(TokenKind::Semicolon, "Expected ';' after variable declaration.")?;

        Ok(VarDecl {
            name,
            declared_type,
            initializer,
            mutability,
        })
    }

    /// The `fn` keyword must already be eaten.
    fn parse_fn_declaration(&mut self) -> ParseResult<FunctionDecl> {
        let name = self.expect(TokenKind::Identifier, "Expected function name.")?;
        self.expect(TokenKind::LParen, "Expected '(' after function name.")?;

        let mut params = Vec::new();
        if !self.check(TokenKind::RParen) {
            loop {
                if params.len() == MAX_ARGS {
                    self.report(
                        ErrorKind::Capacity,
                        self.peek(),
                        "Cannot have more than 255 parameters.",
                    );
                }
                let name = self.expect(TokenKind::Identifier, "Expected parameter name.")?;
                self.expect(TokenKind::Colon, "Expected ':' after parameter name.")?;
                let ty = self.expect_type("Expected parameter type.")?;
                params.push(Param { name, ty });

                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen, "Expected ')' after parameters.")?;
        self.expect(TokenKind::Arrow, "Expected '->' after parameters.")?;
        let return_type = self.expect_type("Expected return type.")?;

        self.expect(TokenKind::LBrace, "Expected '{' before function body.")?;
        let body = self.parse_block_body()?;

        Ok(FunctionDecl {
            name,
            params,
            return_type,
            body,
        })
    }

    /// The `class` keyword must already be eaten.
    fn parse_class_declaration(&mut self) -> ParseResult<Stmt> {
        let name = self.expect(TokenKind::Identifier, "Expected class name.")?;
        let parent = if self.eat(TokenKind::Extends) {
            Some(self.expect(TokenKind::Identifier, "Expected parent class name.")?)
        } else {
            None
        };
        self.expect(TokenKind::LBrace, "Expected '{' after class name.")?;

        let mut methods = Vec::new();
        let mut attributes = Vec::new();
        while !self.check(TokenKind::RBrace) && !self.is_at_end() {
            if self.eat(TokenKind::Fn) {
                methods.push(self.parse_fn_declaration()?);
            } else if let Some(mutability) = self.eat_mutability() {
                attributes.push(self.parse_var_declaration(mutability)?);
            } else {
                return Err(self.unexpected("Expected method or attribute declaration."));
            }
        }
        self.expect(TokenKind::RBrace, "Expected '}' after class body.")?;

        Ok(Stmt::Class {
            name,
            methods,
            attributes,
            parent,
        })
    }

    /// Parses declarations up to and including the closing `}`. The opening `{` must already be eaten.
    fn parse_block_body(&mut self) -> ParseResult<Vec<Stmt>> {
        let mut body = Vec::new();
        while !self.check(TokenKind::RBrace) && !self.is_at_end() {
            match self.parse_declaration() {
                Some(stmt) => body.push(stmt),
                None if self.unwinding => return Err(ParseError),
                None => {}
            }
        }
        self.expect(TokenKind::RBrace, "Expected '}' after block.")?;
        Ok(body)
    }

    fn parse_block_stmt(&mut self) -> ParseResult<Stmt> {
        self.next(); // eat '{'
        Ok(Stmt::Block(self.parse_block_body()?))
    }

    /// Parses a `{ condition }` clause of an `if` or `while` statement.
    fn parse_condition(&mut self, keyword: &str) -> ParseResult<Expr> {
        self.expect(
            TokenKind::LBrace,
            &format!("Expected '{{' after '{}'.", keyword),
        )?;
        let condition = self.parse_expr()?;
        self.expect(
            TokenKind::RBrace,
            &format!("Expected '}}' after {} condition.", keyword),
        )?;
        Ok(condition)
    }

    fn parse_if_stmt(&mut self) -> ParseResult<Stmt> {
        self.next(); // eat 'if'
        let condition = self.parse_condition("if")?;
        let then_branch = Box::new(self.parse_stmt()?);
        let else_branch = if self.eat(TokenKind::Else) {
            Some(Box::new(self.parse_stmt()?))
        } else {
            None
        };

        Ok(Stmt::If {
            condition,
            then_branch,
            else_branch,
        })
    }

    fn parse_while_stmt(&mut self) -> ParseResult<Stmt> {
        self.next(); // eat 'while'
        let condition = self.parse_condition("while")?;
        let body = Box::new(self.parse_stmt()?);
        Ok(Stmt::While { condition, body })
    }

    /// Parses a `for` loop and desugars it into a `while` loop.
    fn parse_for_stmt(&mut self) -> ParseResult<Stmt> {
        let keyword = self.next(); // eat 'for'
        self.expect(TokenKind::LBrace, "Expected '{' after 'for'.")?;

        let initializer = if self.eat(TokenKind::Semicolon) {
            None
        } else if let Some(mutability) = self.eat_mutability() {
            Some(Stmt::VarDecl(self.parse_var_declaration(mutability)?))
        } else {
            Some(self.parse_expr_stmt()?)
        };

        let condition = if !self.check(TokenKind::Semicolon) {
            Some(self.parse_expr()?)
        } else {
            None
        };
        self.expect(TokenKind::Semicolon, "Expected ';' after loop condition.")?;

        let increment = if !self.check(TokenKind::RBrace) {
            Some(self.parse_expr()?)
        } else {
            None
        };
        self.expect(TokenKind::RBrace, "Expected '}' after for clauses.")?;

        let mut body = self.parse_stmt()?;

        if let Some(increment) = increment {
            body = Stmt::Block(vec![body, Stmt::Expression(increment)]);
        }
        let condition = condition.unwrap_or(Expr::Literal {
            value: LiteralValue::Bool(true),
            line: keyword.line,
        });
        body = Stmt::While {
            condition,
            body: Box::new(body),
        };
        if let Some(initializer) = initializer {
            body = Stmt::Block(vec![initializer, body]);
        }

        Ok(body)
    }

    fn parse_print_stmt(&mut self) -> ParseResult<Stmt> {
        self.next(); // eat 'print'
        let value = self.parse_expr()?;
        self.expect(TokenKind::Semicolon, "Expected ';' after value.")?;
        Ok(Stmt::Print(value))
    }

    fn parse_return_stmt(&mut self) -> ParseResult<Stmt> {
        let keyword = self.next(); // eat 'return'
        let value = if !self.check(TokenKind::Semicolon) {
            Some(self.parse_expr()?)
        } else {
            None
        };
        self.expect(TokenKind::Semicolon, "Expected ';' after return value.")?;
        Ok(Stmt::Return { keyword, value })
    }

    fn parse_expr_stmt(&mut self) -> ParseResult<Stmt> {
        let expr = self.parse_expr()?;
        self.expect(TokenKind::Semicolon, "Expected ';' after expression.")?;
        Ok(Stmt::Expression(expr))
    }
}
