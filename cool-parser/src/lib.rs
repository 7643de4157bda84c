//! Lexer, parser and abstract syntax tree of the cool language.

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod printer;
pub mod token;
pub mod visitor;
