//! Condition AST nodes
//!
//! The tree is built once by the parser and only read afterwards. Comparison
//! nodes always carry a variable on the left; connectives carry boolean
//! sub-expressions on both sides.

use super::operator::Operator;
use crate::types::Value;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Condition AST node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expression {
    /// Literal value
    Literal(Value),

    /// Variable reference (e.g., request.verb, proxy.pathsuffix)
    Variable(String),

    /// Binary operation: a connective or a comparison
    Binary {
        left: Box<Expression>,
        op: Operator,
        right: Box<Expression>,
    },

    /// Unary operation
    Unary {
        op: UnaryOperator,
        operand: Box<Expression>,
    },
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOperator {
    /// Logical NOT (`Not`, `!`)
    Not,
}

impl Expression {
    /// Create a literal expression
    pub fn literal(value: Value) -> Self {
        Expression::Literal(value)
    }

    /// Create a variable expression
    pub fn variable(name: impl Into<String>) -> Self {
        Expression::Variable(name.into())
    }

    /// Create a binary expression
    pub fn binary(left: Expression, op: Operator, right: Expression) -> Self {
        Expression::Binary {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    /// Create a negation
    pub fn not(operand: Expression) -> Self {
        Expression::Unary {
            op: UnaryOperator::Not,
            operand: Box::new(operand),
        }
    }

    /// Names of all variables referenced by this expression, sorted
    pub fn variables(&self) -> BTreeSet<&str> {
        let mut names = BTreeSet::new();
        self.collect_variables(&mut names);
        names
    }

    fn collect_variables<'a>(&'a self, names: &mut BTreeSet<&'a str>) {
        match self {
            Expression::Literal(_) => {}
            Expression::Variable(name) => {
                names.insert(name.as_str());
            }
            Expression::Binary { left, right, .. } => {
                left.collect_variables(names);
                right.collect_variables(names);
            }
            Expression::Unary { operand, .. } => operand.collect_variables(names),
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Literal(value) => write!(f, "{}", value),
            Expression::Variable(name) => write!(f, "{}", name),
            Expression::Binary { left, op, right } if op.is_connective() => {
                write!(f, "({} {} {})", left, op, right)
            }
            Expression::Binary { left, op, right } => write!(f, "{} {} {}", left, op, right),
            Expression::Unary { operand, .. } => write!(f, "Not ({})", operand),
        }
    }
}
