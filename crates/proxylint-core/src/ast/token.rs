//! Condition tokens

use super::operator::Operator;
use crate::types::{LiteralType, Value};
use serde::{Deserialize, Serialize};

/// Parenthesis boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Boundary {
    Open,
    Close,
}

/// Token kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TokenKind {
    /// Variable reference (e.g., `request.header.x-api-key`)
    Variable,
    /// Typed literal constant
    Constant(Value),
    /// Operator in any of its spellings
    Operator(Operator),
    /// `(` or `)`
    Boundary(Boundary),
}

/// A token with its source text and character offset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    /// Text as written in the condition (string literals keep their quotes)
    pub text: String,
    /// Character offset of the first character
    pub offset: usize,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, offset: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            offset,
        }
    }

    pub fn is_variable(&self) -> bool {
        matches!(self.kind, TokenKind::Variable)
    }

    /// The operator carried by this token, if any
    pub fn operator(&self) -> Option<Operator> {
        match self.kind {
            TokenKind::Operator(op) => Some(op),
            _ => None,
        }
    }

    /// The literal carried by this token, if any
    pub fn constant(&self) -> Option<&Value> {
        match &self.kind {
            TokenKind::Constant(value) => Some(value),
            _ => None,
        }
    }

    /// Primitive type of a constant token
    pub fn literal_type(&self) -> Option<LiteralType> {
        self.constant().map(Value::literal_type)
    }

    pub fn is_boundary(&self, boundary: Boundary) -> bool {
        self.kind == TokenKind::Boundary(boundary)
    }
}
