use super::*;

/// Builds a left-associative node from `lhs`, the operator and `rhs`.
type NodeFn = fn(Box<Expr>, Token, Box<Expr>) -> Expr;

impl<'a> Parser<'a> {
    /* Expressions */
    /// Parses any expression.
    /// Fails if the expression tree would be higher than [`MAX_EXPR_HEIGHT`].
    pub fn parse_expr(&mut self) -> ParseResult<Expr> {
        self.nested(Self::parse_assignment)
    }

    /// Parses an assignment. Assignment is right-associative (`a = b = c` is `a = (b = c)`).
    fn parse_assignment(&mut self) -> ParseResult<Expr> {
        let expr = self.parse_logic_or()?;

        if self.check(TokenKind::Equal) {
            let target_height = self.height;
            let equals = self.next();
            let value = self.parse_expr()?;

            return match expr {
                Expr::Variable(name) => {
                    self.height = self.grow(self.height, &equals)?;
                    Ok(Expr::Assignment {
                        name,
                        value: Box::new(value),
                    })
                }
                expr => {
                    // not fatal, the expression is still well formed
                    self.report(ErrorKind::Syntax, &equals, "Invalid assignment target.");
                    self.height = target_height;
                    Ok(expr)
                }
            };
        }

        Ok(expr)
    }

    fn parse_logic_or(&mut self) -> ParseResult<Expr> {
        self.parse_left_assoc(&[TokenKind::Or], Self::parse_logic_and, logical)
    }

    fn parse_logic_and(&mut self) -> ParseResult<Expr> {
        self.parse_left_assoc(&[TokenKind::And], Self::parse_equality, logical)
    }

    fn parse_equality(&mut self) -> ParseResult<Expr> {
        self.parse_left_assoc(
            &[TokenKind::BangEqual, TokenKind::EqualEqual],
            Self::parse_comparison,
            binary,
        )
    }

    fn parse_comparison(&mut self) -> ParseResult<Expr> {
        self.parse_left_assoc(
            &[
                TokenKind::Greater,
                TokenKind::GreaterEqual,
                TokenKind::Less,
                TokenKind::LessEqual,
            ],
            Self::parse_term,
            binary,
        )
    }

    fn parse_term(&mut self) -> ParseResult<Expr> {
        self.parse_left_assoc(&[TokenKind::Minus, TokenKind::Plus], Self::parse_factor, binary)
    }

    fn parse_factor(&mut self) -> ParseResult<Expr> {
        self.parse_left_assoc(
            &[TokenKind::Slash, TokenKind::Star, TokenKind::Percent],
            Self::parse_power,
            binary,
        )
    }

    fn parse_power(&mut self) -> ParseResult<Expr> {
        self.parse_left_assoc(&[TokenKind::StarStar], Self::parse_unary, binary)
    }

    /// Parses `operand (op operand)*` where `op` is one of `ops`, folding to the left.
    fn parse_left_assoc(
        &mut self,
        ops: &[TokenKind],
        operand: fn(&mut Self) -> ParseResult<Expr>,
        node: NodeFn,
    ) -> ParseResult<Expr> {
        let mut lhs = operand(self)?;
        let mut height = self.height;

        while ops.contains(&self.peek().kind) {
            let op = self.next();
            let rhs = operand(self)?;
            height = self.grow(height.max(self.height), &op)?;
            lhs = node(Box::new(lhs), op, Box::new(rhs));
        }

        self.height = height;
        Ok(lhs)
    }

    /// Parses a prefix `-` or `!` expression.
    fn parse_unary(&mut self) -> ParseResult<Expr> {
        if matches!(self.peek().kind, TokenKind::Minus | TokenKind::Bang) {
            let op = self.next();
            let operand = self.nested(Self::parse_unary)?;
            self.height = self.grow(self.height, &op)?;
            return Ok(Expr::Unary {
                op,
                operand: Box::new(operand),
            });
        }

        self.parse_call()
    }

    /* Expressions.Call */
    /// Parses a primary expression followed by any number of call argument lists (e.g. `f(1)(2)`).
    fn parse_call(&mut self) -> ParseResult<Expr> {
        let mut expr = self.parse_primary()?;
        let mut height = self.height;

        while self.eat(TokenKind::LParen) {
            let mut args = Vec::new();
            if !self.check(TokenKind::RParen) {
                loop {
                    if args.len() == MAX_ARGS {
                        self.report(
                            ErrorKind::Capacity,
                            self.peek(),
                            "Cannot have more than 255 arguments.",
                        );
                    }
                    args.push(self.parse_expr()?);
                    height = height.max(self.height);

                    if !self.eat(TokenKind::Comma) {
                        break;
                    }
                }
            }
            let paren = self.expect(TokenKind::RParen, "Expected ')' after arguments.")?;
            height = self.grow(height, &paren)?;

            expr = Expr::Call {
                callee: Box::new(expr),
                paren,
                args,
            };
        }

        self.height = height;
        Ok(expr)
    }

    /// Parses a primary (atom) expression.
    fn parse_primary(&mut self) -> ParseResult<Expr> {
        match self.peek().kind {
            TokenKind::True | TokenKind::False | TokenKind::Number | TokenKind::String => {
                let token = self.next();
                self.height = 1;
                Ok(Expr::Literal {
                    value: token.literal,
                    line: token.line,
                })
            }
            TokenKind::Identifier => {
                self.height = 1;
                Ok(Expr::Variable(self.next()))
            }
            TokenKind::LParen => {
                self.next(); // eat '('
                let inner = self.parse_expr()?;
                let paren = self.expect(TokenKind::RParen, "Expected ')' after expression.")?;
                self.height = self.grow(self.height, &paren)?;
                Ok(Expr::Grouping(Box::new(inner)))
            }
            _ => Err(self.unexpected("Expected expression.")),
        }
    }
}

fn binary(lhs: Box<Expr>, op: Token, rhs: Box<Expr>) -> Expr {
    Expr::Binary { lhs, op, rhs }
}

fn logical(lhs: Box<Expr>, op: Token, rhs: Box<Expr>) -> Expr {
    Expr::Logical { lhs, op, rhs }
}
