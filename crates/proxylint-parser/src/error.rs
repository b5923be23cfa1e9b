//! Parser error types
//!
//! Every error carries the character offset into the condition string and, where
//! one exists, the text of the offending token.

use thiserror::Error;

/// Lexical error
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LexError {
    /// Input that is neither an operator, literal, variable nor parenthesis
    #[error("Unrecognized input '{fragment}' at offset {offset}")]
    Unrecognized { fragment: String, offset: usize },

    /// String literal without a closing quote
    #[error("Unterminated string literal {fragment} at offset {offset}")]
    UnterminatedString { fragment: String, offset: usize },
}

impl LexError {
    pub fn offset(&self) -> usize {
        match self {
            LexError::Unrecognized { offset, .. } | LexError::UnterminatedString { offset, .. } => {
                *offset
            }
        }
    }

    pub fn fragment(&self) -> &str {
        match self {
            LexError::Unrecognized { fragment, .. }
            | LexError::UnterminatedString { fragment, .. } => fragment,
        }
    }
}

/// Parser error
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// Tokenizer failure
    #[error("Lexical error: {0}")]
    Lex(#[from] LexError),

    /// `(` without `)` or `)` without `(`
    #[error("Unmatched parenthesis at offset {offset}")]
    UnmatchedParenthesis { offset: usize },

    /// An operator or group is missing an operand
    #[error("Missing operand for '{token}' at offset {offset}")]
    MissingOperand { token: String, offset: usize },

    /// Two connectives in a row (e.g., `a = 1 AND OR b = 2`)
    #[error("Unexpected '{second}' after '{first}' at offset {offset}")]
    ConsecutiveConnectives {
        first: String,
        second: String,
        offset: usize,
    },

    /// A variable used without a comparison (e.g., `b`, `!b`, `(b)`)
    #[error("Variable '{name}' at offset {offset} must be used in a comparison")]
    BareVariable { name: String, offset: usize },

    /// `Not` in front of a comparison that cannot be negated
    #[error("Operator '{operator}' at offset {offset} cannot be negated")]
    NonNegatableOperator { operator: String, offset: usize },

    /// A literal on the left-hand side of a comparison (e.g., `20 = 42`)
    #[error("Literal '{literal}' at offset {offset} cannot be the left operand of a comparison")]
    LiteralOnLeft { literal: String, offset: usize },

    /// Right operand of a type the operator does not accept
    #[error("Operator '{operator}' expects {expected} operand, found '{operand}' at offset {offset}")]
    IncompatibleOperand {
        operator: String,
        operand: String,
        expected: String,
        offset: usize,
    },

    /// Any other token out of place
    #[error("Unexpected token '{token}' at offset {offset}")]
    UnexpectedToken { token: String, offset: usize },

    /// Groups, negations and connectives nested past the parser's limit
    #[error("Condition nests deeper than {limit} levels at offset {offset}")]
    TooDeep { limit: usize, offset: usize },
}

impl ParseError {
    /// Character offset of the error in the condition string
    pub fn offset(&self) -> usize {
        match self {
            ParseError::Lex(err) => err.offset(),
            ParseError::UnmatchedParenthesis { offset }
            | ParseError::MissingOperand { offset, .. }
            | ParseError::ConsecutiveConnectives { offset, .. }
            | ParseError::BareVariable { offset, .. }
            | ParseError::NonNegatableOperator { offset, .. }
            | ParseError::LiteralOnLeft { offset, .. }
            | ParseError::IncompatibleOperand { offset, .. }
            | ParseError::UnexpectedToken { offset, .. }
            | ParseError::TooDeep { offset, .. } => *offset,
        }
    }

    /// Offending token text, if the error is tied to one
    pub fn token(&self) -> Option<&str> {
        match self {
            ParseError::Lex(err) => Some(err.fragment()),
            ParseError::UnmatchedParenthesis { .. } => None,
            ParseError::MissingOperand { token, .. } => Some(token),
            ParseError::ConsecutiveConnectives { second, .. } => Some(second),
            ParseError::BareVariable { name, .. } => Some(name),
            ParseError::NonNegatableOperator { operator, .. } => Some(operator),
            ParseError::LiteralOnLeft { literal, .. } => Some(literal),
            ParseError::IncompatibleOperand { operand, .. } => Some(operand),
            ParseError::UnexpectedToken { token, .. } => Some(token),
            ParseError::TooDeep { .. } => None,
        }
    }
}

/// Result type for parser operations
pub type Result<T> = std::result::Result<T, ParseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lex_error_accessors() {
        let err = LexError::Unrecognized {
            fragment: "@#".to_string(),
            offset: 3,
        };
        assert_eq!(err.offset(), 3);
        assert_eq!(err.fragment(), "@#");
        assert_eq!(err.to_string(), "Unrecognized input '@#' at offset 3");
    }

    #[test]
    fn test_parse_error_from_lex_error() {
        let err: ParseError = LexError::UnterminatedString {
            fragment: "\"abc".to_string(),
            offset: 4,
        }
        .into();
        assert_eq!(err.offset(), 4);
        assert_eq!(err.token(), Some("\"abc"));
    }

    #[test]
    fn test_parse_error_display() {
        let err = ParseError::NonNegatableOperator {
            operator: "Equals".to_string(),
            offset: 6,
        };
        assert_eq!(err.to_string(), "Operator 'Equals' at offset 6 cannot be negated");
        assert_eq!(err.token(), Some("Equals"));
    }
}
