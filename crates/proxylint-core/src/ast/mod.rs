//! Abstract Syntax Tree (AST) definitions for proxylint conditions
//!
//! This module contains:
//! - The operator table
//! - Tokens produced by the tokenizer
//! - Expression nodes produced by the parser

pub mod expression;
pub mod operator;
pub mod token;

pub use expression::{Expression, UnaryOperator};
pub use operator::{OperandKind, Operator, OperatorInfo, PrecedenceClass, OPERATOR_TABLE};
pub use token::{Boundary, Token, TokenKind};
