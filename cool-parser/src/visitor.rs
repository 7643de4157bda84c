//! Visitor pattern for AST nodes.

use crate::ast::{Expr, FunctionDecl, Stmt, VarDecl};

pub trait Visitor<'ast>: Sized {
    fn visit_expr(&mut self, expr: &'ast Expr) {
        walk_expr(self, expr);
    }
    fn visit_stmt(&mut self, stmt: &'ast Stmt) {
        walk_stmt(self, stmt);
    }
}

pub fn walk_expr<'ast>(visitor: &mut impl Visitor<'ast>, expr: &'ast Expr) {
    match expr {
        Expr::Literal { .. } => {}
        Expr::Variable(_) => {}
        Expr::Grouping(inner) => visitor.visit_expr(inner),
        Expr::Unary { op: _, operand } => visitor.visit_expr(operand),
        Expr::Binary { lhs, op: _, rhs } | Expr::Logical { lhs, op: _, rhs } => {
            visitor.visit_expr(lhs);
            visitor.visit_expr(rhs);
        }
        Expr::Assignment { name: _, value } => visitor.visit_expr(value),
        Expr::Call {
            callee,
            paren: _,
            args,
        } => {
            visitor.visit_expr(callee);
            for arg in args {
                visitor.visit_expr(arg);
            }
        }
    }
}

/// Visits the children of `stmt` in source order, except for classes:
/// all attributes are visited before all methods.
pub fn walk_stmt<'ast>(visitor: &mut impl Visitor<'ast>, stmt: &'ast Stmt) {
    /// Iteratively visit all statements in a `Vec<Stmt>`.
    macro_rules! visit_stmt_list {
        ($visitor: expr, $body: expr) => {
            for stmt in $body {
                Visitor::visit_stmt($visitor, stmt);
            }
        };
    }

    match stmt {
        Stmt::VarDecl(decl) => walk_var_decl(visitor, decl),
        Stmt::Expression(expr) => visitor.visit_expr(expr),
        Stmt::If {
            condition,
            then_branch,
            else_branch,
        } => {
            visitor.visit_expr(condition);
            visitor.visit_stmt(then_branch);
            if let Some(else_branch) = else_branch {
                visitor.visit_stmt(else_branch);
            }
        }
        Stmt::While { condition, body } => {
            visitor.visit_expr(condition);
            visitor.visit_stmt(body);
        }
        Stmt::Return { keyword: _, value } => {
            if let Some(value) = value {
                visitor.visit_expr(value);
            }
        }
        Stmt::Print(expr) => visitor.visit_expr(expr),
        Stmt::Function(func) => walk_function(visitor, func),
        Stmt::Class {
            name: _,
            methods,
            attributes,
            parent: _,
        } => {
            for attribute in attributes {
                walk_var_decl(visitor, attribute);
            }
            for method in methods {
                walk_function(visitor, method);
            }
        }
        Stmt::Block(body) => visit_stmt_list!(visitor, body),
    }
}

/// Visits the initializer of a variable declaration or class attribute.
pub fn walk_var_decl<'ast>(visitor: &mut impl Visitor<'ast>, decl: &'ast VarDecl) {
    visitor.visit_expr(&decl.initializer);
}

/// Visits the body of a function declaration or method.
pub fn walk_function<'ast>(visitor: &mut impl Visitor<'ast>, func: &'ast FunctionDecl) {
    for stmt in &func.body {
        visitor.visit_stmt(stmt);
    }
}
