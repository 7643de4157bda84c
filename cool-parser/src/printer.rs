//! Debug printing of the AST as an indented tree.

use crate::ast::{Expr, FunctionDecl, Stmt, VarDecl};
use crate::visitor::Visitor;

/// Renders AST nodes, one node per line, indented by two spaces per level.
#[derive(Default)]
pub struct AstPrinter {
    out: String,
    indent: usize,
}

impl AstPrinter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Renders all `statements`.
    pub fn print(statements: &[Stmt]) -> String {
        let mut printer = Self::new();
        for stmt in statements {
            printer.visit_stmt(stmt);
        }
        printer.into_inner()
    }

    /// Renders a single expression.
    pub fn print_expr(expr: &Expr) -> String {
        let mut printer = Self::new();
        printer.visit_expr(expr);
        printer.into_inner()
    }

    /// Consumes `self` and returns the rendered text.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.out
    }

    fn line(&mut self, text: &str) {
        for _ in 0..self.indent {
            self.out.push_str("  ");
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    /// Runs `f` one indentation level deeper.
    fn indented(&mut self, f: impl FnOnce(&mut Self)) {
        self.indent += 1;
        f(self);
        self.indent -= 1;
    }

    /// Prints a labelled child (e.g. `Condition:`) followed by the child one level deeper.
    fn labelled(&mut self, label: &str, f: impl FnOnce(&mut Self)) {
        self.indented(|printer| {
            printer.line(label);
            printer.indented(f);
        });
    }

    fn print_var_decl(&mut self, decl: &VarDecl) {
        self.line(&format!(
            "VarDecl: {}, type: {} ({})",
            decl.name.lexeme,
            decl.declared_type.lexeme,
            decl.mutability.keyword()
        ));
        self.indented(|printer| printer.visit_expr(&decl.initializer));
    }

    fn print_function(&mut self, func: &FunctionDecl) {
        self.line(&format!(
            "Function: {} returns {}",
            func.name.lexeme, func.return_type.lexeme
        ));
        let mut params = String::from("Params:");
        for param in &func.params {
            params.push_str(&format!(" ({}: {})", param.name.lexeme, param.ty.lexeme));
        }
        self.indented(|printer| printer.line(&params));
        self.labelled("Body:", |printer| printer.print_block(&func.body));
    }

    fn print_block(&mut self, body: &[Stmt]) {
        self.line("Block:");
        self.indented(|printer| {
            for stmt in body {
                printer.visit_stmt(stmt);
            }
        });
    }
}

impl<'ast> Visitor<'ast> for AstPrinter {
    fn visit_expr(&mut self, expr: &'ast Expr) {
        match expr {
            Expr::Literal { value, .. } => self.line(&format!("Literal: {}", value)),
            Expr::Variable(name) => self.line(&format!("Variable: {}", name.lexeme)),
            Expr::Grouping(inner) => {
                self.line("Grouping:");
                self.indented(|printer| printer.visit_expr(inner));
            }
            Expr::Unary { op, operand } => {
                self.line(&format!("Unary: {}", op.lexeme));
                self.indented(|printer| printer.visit_expr(operand));
            }
            Expr::Binary { lhs, op, rhs } | Expr::Logical { lhs, op, rhs } => {
                let label = if let Expr::Binary { .. } = expr {
                    "Binary"
                } else {
                    "Logical"
                };
                self.line(&format!("{}: {}", label, op.lexeme));
                self.indented(|printer| {
                    printer.visit_expr(lhs);
                    printer.visit_expr(rhs);
                });
            }
            Expr::Assignment { name, value } => {
                self.line(&format!("Assignment: {}", name.lexeme));
                self.indented(|printer| printer.visit_expr(value));
            }
            Expr::Call { callee, args, .. } => {
                self.line("Call:");
                self.indented(|printer| printer.visit_expr(callee));
                self.labelled("Arguments:", |printer| {
                    for arg in args {
                        printer.visit_expr(arg);
                    }
                });
            }
        }
    }

    fn visit_stmt(&mut self, stmt: &'ast Stmt) {
        match stmt {
            Stmt::VarDecl(decl) => self.print_var_decl(decl),
            Stmt::Expression(expr) => {
                self.line("ExprStatement:");
                self.indented(|printer| printer.visit_expr(expr));
            }
            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                self.line("If:");
                self.labelled("Condition:", |printer| printer.visit_expr(condition));
                self.labelled("Then:", |printer| printer.visit_stmt(then_branch));
                if let Some(else_branch) = else_branch {
                    self.labelled("Else:", |printer| printer.visit_stmt(else_branch));
                }
            }
            Stmt::While { condition, body } => {
                self.line("While:");
                self.labelled("Condition:", |printer| printer.visit_expr(condition));
                self.labelled("Body:", |printer| printer.visit_stmt(body));
            }
            Stmt::Return { value, .. } => {
                self.line("Return:");
                if let Some(value) = value {
                    self.indented(|printer| printer.visit_expr(value));
                }
            }
            Stmt::Print(expr) => {
                self.line("Print:");
                self.indented(|printer| printer.visit_expr(expr));
            }
            Stmt::Function(func) => self.print_function(func),
            Stmt::Class {
                name,
                methods,
                attributes,
                parent,
            } => {
                match parent {
                    Some(parent) => {
                        self.line(&format!("Class: {} inherits {}", name.lexeme, parent.lexeme))
                    }
                    None => self.line(&format!("Class: {}", name.lexeme)),
                }
                self.labelled("Attributes:", |printer| {
                    for attribute in attributes {
                        printer.print_var_decl(attribute);
                    }
                });
                self.labelled("Methods:", |printer| {
                    for method in methods {
                        printer.print_function(method);
                    }
                });
            }
            Stmt::Block(body) => self.print_block(body),
        }
    }
}
