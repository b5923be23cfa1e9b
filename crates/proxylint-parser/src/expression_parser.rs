//! Condition expression parser
//!
//! Parses condition strings into Expression AST nodes.
//!
//! Supported syntax:
//! - Comparisons: `request.verb = "GET"`, `response.status.code GreaterThan 399`
//! - Negated pattern comparisons: `proxy.pathsuffix Not MatchesPath "/admin/**"`
//! - Boolean literals: `true`, `false`
//! - Negation: `!(a = 1)`, `Not a StartsWith "x"`
//! - Connectives: `And`, `Or`, `&&`, `||`
//! - Parentheses for grouping: `(a = 1 or b = 2) and c = 3`
//!
//! Precedence, tightest first: `Not`, comparisons, connectives. `And` and `Or`
//! share one tier; the first connective at a level becomes the root, so
//! `a AND b OR c` parses as `And(a, Or(b, c))`.
//!
//! Every variable must appear on the left of a comparison. An empty condition
//! parses as the literal `true`.

use crate::error::{ParseError, Result};
use crate::lexer::Tokenizer;
use proxylint_core::ast::{Boundary, Expression, OperandKind, Operator, Token, TokenKind};
use proxylint_core::{LiteralType, Value};

/// Deepest nesting of groups, prefix negations and connectives accepted in
/// one condition. Bounds the depth of every parsed tree.
pub const MAX_NESTING_DEPTH: usize = 256;

/// Expression parser
pub struct ExpressionParser;

/// Cursor over a token slice
struct Parser<'t> {
    tokens: &'t [Token],
    pos: usize,
    /// Open parentheses enclosing the current position
    depth: usize,
    /// Groups, negations and connectives enclosing the current position
    nesting: usize,
    /// Character offset just past the input
    end_offset: usize,
}

impl ExpressionParser {
    /// Parse an expression from a string
    pub fn parse(input: &str) -> Result<Expression> {
        let tokens = Tokenizer::tokenize(input)?;
        let expr = ExpressionParser::parse_tokens(&tokens, input.chars().count())?;
        log::debug!("Parsed condition {:?} as {}", input, expr);
        Ok(expr)
    }

    /// Check that a string is a well-formed condition without keeping the tree
    pub fn validate(input: &str) -> Result<()> {
        Self::parse(input).map(|_| ())
    }

    /// Parse an already tokenized condition. `end_offset` is the character
    /// length of the source, used to position errors at end of input.
    pub fn parse_tokens(tokens: &[Token], end_offset: usize) -> Result<Expression> {
        if tokens.is_empty() {
            return Ok(Expression::literal(Value::Bool(true)));
        }

        let mut parser = Parser {
            tokens,
            pos: 0,
            depth: 0,
            nesting: 0,
            end_offset,
        };
        let expr = parser.parse_expression()?;

        // parse_expression only stops early at a closing parenthesis
        if let Some(token) = parser.peek() {
            return Err(ParseError::UnmatchedParenthesis {
                offset: token.offset,
            });
        }

        Ok(expr)
    }
}

impl<'t> Parser<'t> {
    fn peek(&self) -> Option<&'t Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<&'t Token> {
        let token = self.tokens.get(self.pos)?;
        self.pos += 1;
        Some(token)
    }

    /// Descend one tree level at `token`
    fn enter(&mut self, token: &Token) -> Result<()> {
        if self.nesting >= MAX_NESTING_DEPTH {
            return Err(ParseError::TooDeep {
                limit: MAX_NESTING_DEPTH,
                offset: token.offset,
            });
        }
        self.nesting += 1;
        Ok(())
    }

    /// term ( connective expression )?
    fn parse_expression(&mut self) -> Result<Expression> {
        let left = self.parse_term()?;

        let token = match self.peek() {
            Some(token) => token,
            None => return Ok(left),
        };

        match &token.kind {
            TokenKind::Operator(op) if op.is_connective() => {
                self.pos += 1;
                if let Some(next) = self.peek() {
                    if next.operator().map_or(false, |op| op.is_connective()) {
                        return Err(ParseError::ConsecutiveConnectives {
                            first: token.text.clone(),
                            second: next.text.clone(),
                            offset: next.offset,
                        });
                    }
                }
                self.enter(token)?;
                let right = self.parse_expression()?;
                self.nesting -= 1;
                Ok(Expression::binary(left, *op, right))
            }
            TokenKind::Boundary(Boundary::Close) => Ok(left),
            _ => Err(ParseError::UnexpectedToken {
                token: token.text.clone(),
                offset: token.offset,
            }),
        }
    }

    /// A parenthesized group, a negation, a comparison or a boolean literal
    fn parse_term(&mut self) -> Result<Expression> {
        let token = match self.next() {
            Some(token) => token,
            None => {
                let previous = self.pos.checked_sub(1).and_then(|i| self.tokens.get(i));
                return Err(ParseError::MissingOperand {
                    token: previous.map(|t| t.text.clone()).unwrap_or_default(),
                    offset: self.end_offset,
                });
            }
        };

        match &token.kind {
            TokenKind::Boundary(Boundary::Open) => self.parse_group(token),
            TokenKind::Boundary(Boundary::Close) => {
                if self.depth == 0 {
                    return Err(ParseError::UnmatchedParenthesis {
                        offset: token.offset,
                    });
                }
                let previous = self.pos.checked_sub(2).and_then(|i| self.tokens.get(i));
                Err(ParseError::MissingOperand {
                    token: previous.map(|t| t.text.clone()).unwrap_or_default(),
                    offset: token.offset,
                })
            }
            TokenKind::Operator(Operator::Not) => {
                self.enter(token)?;
                let operand = self.parse_term()?;
                self.nesting -= 1;
                Ok(Expression::not(operand))
            }
            TokenKind::Operator(_) => Err(ParseError::MissingOperand {
                token: token.text.clone(),
                offset: token.offset,
            }),
            TokenKind::Constant(value) => self.parse_literal_term(token, value),
            TokenKind::Variable => self.parse_comparison(token),
        }
    }

    fn parse_group(&mut self, open: &'t Token) -> Result<Expression> {
        self.enter(open)?;
        self.depth += 1;
        let inner = self.parse_expression()?;
        self.depth -= 1;
        self.nesting -= 1;

        match self.next() {
            Some(token) if token.is_boundary(Boundary::Close) => Ok(inner),
            _ => Err(ParseError::UnmatchedParenthesis {
                offset: open.offset,
            }),
        }
    }

    fn parse_literal_term(&self, token: &'t Token, value: &Value) -> Result<Expression> {
        let followed_by_comparison = self
            .peek()
            .and_then(Token::operator)
            .map_or(false, |op| op.is_comparison() || op == Operator::Not);
        if followed_by_comparison {
            return Err(ParseError::LiteralOnLeft {
                literal: token.text.clone(),
                offset: token.offset,
            });
        }

        match value {
            Value::Bool(_) => Ok(Expression::literal(value.clone())),
            _ => Err(ParseError::UnexpectedToken {
                token: token.text.clone(),
                offset: token.offset,
            }),
        }
    }

    /// variable ( Not )? comparison-operator operand
    fn parse_comparison(&mut self, variable: &'t Token) -> Result<Expression> {
        let mut negated = false;

        let mut token = self.peek_operator_or_bare(variable)?;
        if token.operator() == Some(Operator::Not) {
            self.pos += 1;
            negated = true;
            token = match self.peek() {
                Some(next) => next,
                None => {
                    return Err(ParseError::MissingOperand {
                        token: token.text.clone(),
                        offset: self.end_offset,
                    })
                }
            };
        }

        let op = match token.operator() {
            Some(op) if op.is_comparison() => op,
            _ => {
                return Err(ParseError::UnexpectedToken {
                    token: token.text.clone(),
                    offset: token.offset,
                })
            }
        };
        if negated && !op.is_negatable() {
            return Err(ParseError::NonNegatableOperator {
                operator: token.text.clone(),
                offset: token.offset,
            });
        }
        self.pos += 1;

        let right = self.parse_operand(token, op)?;
        let comparison = Expression::binary(Expression::variable(variable.text.clone()), op, right);

        Ok(if negated {
            Expression::not(comparison)
        } else {
            comparison
        })
    }

    /// The token after a variable, which must start a comparison
    fn peek_operator_or_bare(&self, variable: &'t Token) -> Result<&'t Token> {
        let bare = || ParseError::BareVariable {
            name: variable.text.clone(),
            offset: variable.offset,
        };

        match self.peek() {
            None => Err(bare()),
            Some(token) => match &token.kind {
                TokenKind::Boundary(Boundary::Close) => Err(bare()),
                TokenKind::Operator(op) if op.is_connective() => Err(bare()),
                _ => Ok(token),
            },
        }
    }

    /// Right-hand side of a comparison: a literal of an accepted type or a variable
    fn parse_operand(&mut self, operator: &'t Token, op: Operator) -> Result<Expression> {
        let token = match self.next() {
            Some(token) => token,
            None => {
                return Err(ParseError::MissingOperand {
                    token: operator.text.clone(),
                    offset: self.end_offset,
                })
            }
        };

        match &token.kind {
            TokenKind::Variable => Ok(Expression::variable(token.text.clone())),
            TokenKind::Constant(value) => {
                check_operand_kind(op, value, operator, token)?;
                Ok(Expression::literal(value.clone()))
            }
            TokenKind::Operator(_) | TokenKind::Boundary(_) => Err(ParseError::MissingOperand {
                token: operator.text.clone(),
                offset: token.offset,
            }),
        }
    }
}

fn check_operand_kind(op: Operator, value: &Value, operator: &Token, operand: &Token) -> Result<()> {
    let accepted = match op.operand_kind() {
        OperandKind::Any => true,
        OperandKind::Numeric => value.literal_type() == LiteralType::Number,
        OperandKind::Text => value.literal_type() == LiteralType::Str,
    };
    if accepted {
        return Ok(());
    }

    let expected = match op.operand_kind() {
        OperandKind::Any => "any",
        OperandKind::Numeric => "a numeric",
        OperandKind::Text => "a string",
    };
    Err(ParseError::IncompatibleOperand {
        operator: operator.text.clone(),
        operand: operand.text.clone(),
        expected: expected.to_string(),
        offset: operand.offset,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var(name: &str) -> Expression {
        Expression::variable(name)
    }

    fn num(n: f64) -> Expression {
        Expression::literal(Value::Number(n))
    }

    fn text(s: &str) -> Expression {
        Expression::literal(Value::string(s))
    }

    #[test]
    fn test_parse_empty_is_true() {
        assert_eq!(
            ExpressionParser::parse("").unwrap(),
            Expression::literal(Value::Bool(true))
        );
        assert_eq!(
            ExpressionParser::parse("   \n ").unwrap(),
            Expression::literal(Value::Bool(true))
        );
    }

    #[test]
    fn test_parse_boolean_literals() {
        assert_eq!(
            ExpressionParser::parse("false").unwrap(),
            Expression::literal(Value::Bool(false))
        );
        assert_eq!(
            ExpressionParser::parse("true OR false").unwrap(),
            Expression::binary(
                Expression::literal(Value::Bool(true)),
                Operator::Or,
                Expression::literal(Value::Bool(false))
            )
        );
    }

    #[test]
    fn test_parse_comparison() {
        assert_eq!(
            ExpressionParser::parse(r#"request.verb = "GET""#).unwrap(),
            Expression::binary(var("request.verb"), Operator::Equals, text("GET"))
        );
    }

    #[test]
    fn test_parse_variable_rhs() {
        assert_eq!(
            ExpressionParser::parse("b != b").unwrap(),
            Expression::binary(var("b"), Operator::NotEquals, var("b"))
        );
    }

    #[test]
    fn test_connectives_lean_right() {
        let expected = Expression::binary(
            Expression::binary(var("a"), Operator::Equals, num(1.0)),
            Operator::And,
            Expression::binary(
                Expression::binary(var("b"), Operator::Equals, num(2.0)),
                Operator::Or,
                Expression::binary(var("c"), Operator::Equals, num(3.0)),
            ),
        );
        assert_eq!(
            ExpressionParser::parse("a = 1 AND b = 2 OR c = 3").unwrap(),
            expected
        );
    }

    #[test]
    fn test_parentheses_are_transparent() {
        let plain = ExpressionParser::parse("b=1").unwrap();
        assert_eq!(ExpressionParser::parse("(b=1)").unwrap(), plain);
        assert_eq!(ExpressionParser::parse("((b=1))").unwrap(), plain);
    }

    #[test]
    fn test_group_overrides_right_leaning() {
        let expr = ExpressionParser::parse("(a = 1 or b = 2) and c = 3").unwrap();
        match expr {
            Expression::Binary { left, op, .. } => {
                assert_eq!(op, Operator::And);
                assert!(matches!(*left, Expression::Binary { op: Operator::Or, .. }));
            }
            _ => panic!("Expected Binary expression"),
        }
    }

    #[test]
    fn test_infix_not_on_pattern_operator() {
        assert_eq!(
            ExpressionParser::parse(r#"x Not StartsWith "w""#).unwrap(),
            Expression::not(Expression::binary(var("x"), Operator::StartsWith, text("w")))
        );
        assert_eq!(
            ExpressionParser::parse(r#"x ! ~/ "/p""#).unwrap(),
            Expression::not(Expression::binary(var("x"), Operator::MatchesPath, text("/p")))
        );
    }

    #[test]
    fn test_infix_not_on_equality_is_rejected() {
        let err = ExpressionParser::parse(r#"x Not Equals "p""#).unwrap_err();
        assert_eq!(
            err,
            ParseError::NonNegatableOperator {
                operator: "Equals".to_string(),
                offset: 6
            }
        );
    }

    #[test]
    fn test_prefix_not_on_group() {
        assert_eq!(
            ExpressionParser::parse("!(a = 1)").unwrap(),
            Expression::not(Expression::binary(var("a"), Operator::Equals, num(1.0)))
        );
    }

    #[test]
    fn test_bare_variable() {
        for input in ["b", "!b", "(b)", "b and a = 1"] {
            let err = ExpressionParser::parse(input).unwrap_err();
            assert!(
                matches!(err, ParseError::BareVariable { ref name, .. } if name == "b"),
                "{}: {:?}",
                input,
                err
            );
        }
    }

    #[test]
    fn test_literal_on_left() {
        let err = ExpressionParser::parse("20 = 42").unwrap_err();
        assert_eq!(
            err,
            ParseError::LiteralOnLeft {
                literal: "20".to_string(),
                offset: 0
            }
        );
    }

    #[test]
    fn test_unmatched_parenthesis() {
        assert_eq!(
            ExpressionParser::parse("(a = 1").unwrap_err(),
            ParseError::UnmatchedParenthesis { offset: 0 }
        );
        assert_eq!(
            ExpressionParser::parse("a = 1)").unwrap_err(),
            ParseError::UnmatchedParenthesis { offset: 5 }
        );
    }

    #[test]
    fn test_missing_operand() {
        assert_eq!(
            ExpressionParser::parse("a =").unwrap_err(),
            ParseError::MissingOperand {
                token: "=".to_string(),
                offset: 3
            }
        );
        assert!(matches!(
            ExpressionParser::parse("a = 1 and").unwrap_err(),
            ParseError::MissingOperand { .. }
        ));
        assert!(matches!(
            ExpressionParser::parse("()").unwrap_err(),
            ParseError::MissingOperand { .. }
        ));
    }

    #[test]
    fn test_consecutive_connectives() {
        let err = ExpressionParser::parse("a = 1 and or b = 2").unwrap_err();
        assert_eq!(
            err,
            ParseError::ConsecutiveConnectives {
                first: "and".to_string(),
                second: "or".to_string(),
                offset: 10
            }
        );
    }

    #[test]
    fn test_incompatible_operand() {
        let err = ExpressionParser::parse(r#"a > "abc""#).unwrap_err();
        assert!(matches!(err, ParseError::IncompatibleOperand { offset: 4, .. }));

        let err = ExpressionParser::parse("a StartsWith 5").unwrap_err();
        assert!(matches!(err, ParseError::IncompatibleOperand { .. }));
    }

    #[test]
    fn test_nesting_limit_on_groups() {
        let deep = format!("{}a = 1{}", "(".repeat(10_000), ")".repeat(10_000));
        let err = ExpressionParser::parse(&deep).unwrap_err();
        assert_eq!(
            err,
            ParseError::TooDeep {
                limit: MAX_NESTING_DEPTH,
                offset: MAX_NESTING_DEPTH
            }
        );
        assert_eq!(err.token(), None);
    }

    #[test]
    fn test_nesting_limit_is_inclusive() {
        let input = format!(
            "{}a = 1{}",
            "(".repeat(MAX_NESTING_DEPTH),
            ")".repeat(MAX_NESTING_DEPTH)
        );
        assert_eq!(
            ExpressionParser::parse(&input).unwrap(),
            Expression::binary(var("a"), Operator::Equals, Expression::literal(Value::Number(1.0)))
        );
    }

    #[test]
    fn test_nesting_limit_on_negations() {
        let input = format!("{}(a = 1)", "!".repeat(1_000));
        let err = ExpressionParser::parse(&input).unwrap_err();
        assert!(matches!(err, ParseError::TooDeep { .. }));
    }

    #[test]
    fn test_nesting_limit_on_connective_chains() {
        let input = vec!["a = 1"; 3_000].join(" and ");
        let err = ExpressionParser::parse(&input).unwrap_err();
        // the 257th `and` starts at 10 * 256 + 6
        assert_eq!(
            err,
            ParseError::TooDeep {
                limit: MAX_NESTING_DEPTH,
                offset: 2566
            }
        );

        let short = vec!["a = 1"; 200].join(" or ");
        assert!(ExpressionParser::parse(&short).is_ok());
    }

    #[test]
    fn test_validate() {
        assert!(ExpressionParser::validate(r#"proxy.pathsuffix MatchesPath "/orders/*""#).is_ok());
        assert!(ExpressionParser::validate("a = = 1").is_err());
    }
}
