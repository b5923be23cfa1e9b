//! proxylint Core - Core types for the proxylint condition analyzer
//!
//! This crate provides the fundamental types shared by the parser and analyzer:
//! - Value types for condition literals
//! - The static operator table
//! - Token and AST (Abstract Syntax Tree) definitions

pub mod ast;
pub mod types;

// Re-export commonly used types
pub use ast::{Expression, Operator, Token, TokenKind};
pub use types::{LiteralType, Value};
