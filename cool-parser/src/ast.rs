use crate::token::{LiteralValue, Token};

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A constant (e.g. `1`, `"foo"`, `true`).
    Literal { value: LiteralValue, line: usize },
    /// An identifier (e.g. `foo`).
    Variable(Token),
    /// A parenthesized expression (e.g. `(1 + 2)`).
    Grouping(Box<Expr>),
    /// A prefix expression (e.g. `-a`, `!b`).
    Unary { op: Token, operand: Box<Expr> },
    /// A binary expression (e.g. `1+1`).
    Binary {
        lhs: Box<Expr>,
        op: Token,
        rhs: Box<Expr>,
    },
    /// A short-circuiting `&&` or `||` expression.
    Logical {
        lhs: Box<Expr>,
        op: Token,
        rhs: Box<Expr>,
    },
    /// Assignment to a variable (e.g. `a = 1`).
    Assignment { name: Token, value: Box<Expr> },
    /// A function call (e.g. `foo(1, 2)`).
    Call {
        callee: Box<Expr>,
        /// The closing parenthesis. Used for error reporting.
        paren: Token,
        args: Vec<Expr>,
    },
}

impl Expr {
    /// Returns the line where the expression starts.
    pub fn line(&self) -> usize {
        match self {
            Expr::Literal { line, .. } => *line,
            Expr::Variable(name) => name.line,
            Expr::Grouping(inner) => inner.line(),
            Expr::Unary { op, .. } => op.line,
            Expr::Binary { lhs, .. } | Expr::Logical { lhs, .. } => lhs.line(),
            Expr::Assignment { name, .. } => name.line,
            Expr::Call { callee, .. } => callee.line(),
        }
    }
}

/// Whether a variable was declared with `var` or `val`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutability {
    /// Declared with `var`.
    Mutable,
    /// Declared with `val`.
    Immutable,
}

impl Mutability {
    pub fn keyword(self) -> &'static str {
        match self {
            Mutability::Mutable => "var",
            Mutability::Immutable => "val",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl {
    pub name: Token,
    pub declared_type: Token,
    pub initializer: Expr,
    pub mutability: Mutability,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: Token,
    pub ty: Token,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    pub name: Token,
    pub params: Vec<Param>,
    pub return_type: Token,
    /// Statements of the function body block.
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// A `var` or `val` declaration.
    VarDecl(VarDecl),
    /// An expression evaluated for its side effects.
    Expression(Expr),
    If {
        condition: Expr,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
    },
    /// `for` loops are desugared into `While`.
    While { condition: Expr, body: Box<Stmt> },
    Return {
        keyword: Token,
        value: Option<Expr>,
    },
    Print(Expr),
    Function(FunctionDecl),
    Class {
        name: Token,
        methods: Vec<FunctionDecl>,
        attributes: Vec<VarDecl>,
        /// The class named after `extends`. Not resolved.
        parent: Option<Token>,
    },
    Block(Vec<Stmt>),
}

impl Stmt {
    /// Returns the line where the statement starts or `None` for an empty block.
    pub fn line(&self) -> Option<usize> {
        match self {
            Stmt::VarDecl(decl) => Some(decl.name.line),
            Stmt::Expression(expr) | Stmt::Print(expr) => Some(expr.line()),
            Stmt::If { condition, .. } | Stmt::While { condition, .. } => Some(condition.line()),
            Stmt::Return { keyword, .. } => Some(keyword.line),
            Stmt::Function(func) => Some(func.name.line),
            Stmt::Class { name, .. } => Some(name.line),
            Stmt::Block(body) => body.iter().find_map(Stmt::line),
        }
    }
}
