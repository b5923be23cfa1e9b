//! proxylint Parser - condition string to AST parser
//!
//! This crate turns the text of a `<Condition>` element into a token stream
//! and then into a `proxylint_core::Expression` tree. `ExpressionParser::validate`
//! is the structural check used when only well-formedness matters.

pub mod error;
pub mod expression_parser;
pub mod lexer;

// Re-export main parser types
pub use error::{LexError, ParseError, Result};
pub use expression_parser::{ExpressionParser, MAX_NESTING_DEPTH};
pub use lexer::Tokenizer;
