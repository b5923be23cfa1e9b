//! Condition tokenizer
//!
//! Splits a condition string into tokens:
//! - Double-quoted string literals: `"/v1/orders"`, `"a \"quoted\" word"`
//! - Parentheses: `(`, `)`
//! - Symbolic operators: `=`, `==`, `!=`, `:=`, `>`, `>=`, `<`, `<=`, `~`, `~~`, `~/`, `=|`, `!`, `&&`, `||`
//! - Words: keyword operators (`StartsWith`, `and`, `NOT`, ...), `true`/`false`/`null`,
//!   numbers, and variable names made of letters, digits, `_`, `.` and `-`
//!
//! Operators are recognized from the shared operator table, longest spelling
//! first. Text inside a string literal is never treated as an operator.

use crate::error::LexError;
use proxylint_core::ast::{Boundary, Operator, Token, TokenKind};
use proxylint_core::Value;
use regex::Regex;
use std::sync::OnceLock;

fn number_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[+-]?(\d+(\.\d*)?|\.\d+)$").expect("number literal pattern is valid")
    })
}

/// Condition tokenizer
pub struct Tokenizer<'a> {
    input: &'a str,
    /// Byte position into `input`
    pos: usize,
    /// Character offset matching `pos`
    offset: usize,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            offset: 0,
        }
    }

    /// Tokenize a whole condition string
    pub fn tokenize(input: &str) -> Result<Vec<Token>, LexError> {
        let mut tokenizer = Tokenizer::new(input);
        let mut tokens = Vec::new();
        while let Some(token) = tokenizer.next_token()? {
            tokens.push(token);
        }
        log::trace!("Tokenized {:?} into {} tokens", input, tokens.len());
        Ok(tokens)
    }

    /// Read the next token, or `None` at end of input
    pub fn next_token(&mut self) -> Result<Option<Token>, LexError> {
        self.skip_whitespace();

        let c = match self.peek() {
            Some(c) => c,
            None => return Ok(None),
        };
        let start = self.offset;

        match c {
            '(' => {
                self.bump();
                Ok(Some(Token::new(TokenKind::Boundary(Boundary::Open), "(", start)))
            }
            ')' => {
                self.bump();
                Ok(Some(Token::new(TokenKind::Boundary(Boundary::Close), ")", start)))
            }
            '"' => self.read_string().map(Some),
            '+' if self.rest()[1..].starts_with(|c: char| c.is_ascii_digit() || c == '.') => {
                self.read_word().map(Some)
            }
            c if is_word_char(c) => self.read_word().map(Some),
            _ => {
                if let Some((op, spelling)) = Operator::match_symbol(self.rest()) {
                    self.advance_bytes(spelling.len());
                    return Ok(Some(Token::new(TokenKind::Operator(op), spelling, start)));
                }
                Err(LexError::Unrecognized {
                    fragment: self.unrecognized_fragment(),
                    offset: start,
                })
            }
        }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        self.offset += 1;
        Some(c)
    }

    /// Advance over an ASCII spelling
    fn advance_bytes(&mut self, len: usize) {
        self.pos += len;
        self.offset += len;
    }

    fn skip_whitespace(&mut self) {
        while self.peek().map_or(false, char::is_whitespace) {
            self.bump();
        }
    }

    /// Read a double-quoted literal. `\"` and `\\` are unescaped; any other
    /// backslash sequence is kept verbatim so regex patterns survive.
    fn read_string(&mut self) -> Result<Token, LexError> {
        let start_pos = self.pos;
        let start = self.offset;
        self.bump();

        let mut value = String::new();
        loop {
            match self.bump() {
                None => {
                    return Err(LexError::UnterminatedString {
                        fragment: self.input[start_pos..].to_string(),
                        offset: start,
                    })
                }
                Some('"') => break,
                Some('\\') => match self.bump() {
                    Some(escaped @ ('"' | '\\')) => value.push(escaped),
                    Some(other) => {
                        value.push('\\');
                        value.push(other);
                    }
                    None => {
                        return Err(LexError::UnterminatedString {
                            fragment: self.input[start_pos..].to_string(),
                            offset: start,
                        })
                    }
                },
                Some(c) => value.push(c),
            }
        }

        let text = &self.input[start_pos..self.pos];
        Ok(Token::new(TokenKind::Constant(Value::String(value)), text, start))
    }

    /// Read a word and classify it as keyword operator, literal or variable
    fn read_word(&mut self) -> Result<Token, LexError> {
        let start_pos = self.pos;
        let start = self.offset;
        // explicit sign on a number literal
        if self.peek() == Some('+') {
            self.bump();
        }
        while self.peek().map_or(false, is_word_char) {
            self.bump();
        }
        let word = &self.input[start_pos..self.pos];

        let kind = if let Some(op) = Operator::from_keyword(word) {
            TokenKind::Operator(op)
        } else if word.eq_ignore_ascii_case("true") {
            TokenKind::Constant(Value::Bool(true))
        } else if word.eq_ignore_ascii_case("false") {
            TokenKind::Constant(Value::Bool(false))
        } else if word.eq_ignore_ascii_case("null") {
            TokenKind::Constant(Value::Null)
        } else if number_pattern().is_match(word) {
            let number = word.parse::<f64>().map_err(|_| LexError::Unrecognized {
                fragment: word.to_string(),
                offset: start,
            })?;
            TokenKind::Constant(Value::Number(number))
        } else if word.starts_with(|c: char| c.is_alphabetic() || c == '_') {
            TokenKind::Variable
        } else {
            return Err(LexError::Unrecognized {
                fragment: word.to_string(),
                offset: start,
            });
        };

        Ok(Token::new(kind, word, start))
    }

    /// The run of input up to the next whitespace, parenthesis or quote
    fn unrecognized_fragment(&self) -> String {
        self.rest()
            .chars()
            .take_while(|c| !c.is_whitespace() && !matches!(c, '(' | ')' | '"'))
            .collect()
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '.' | '-')
}

#[cfg(test)]
mod tests {
    use super::*;
    use proxylint_core::LiteralType;

    fn kinds(input: &str) -> Vec<TokenKind> {
        Tokenizer::tokenize(input)
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_empty_input() {
        assert!(Tokenizer::tokenize("").unwrap().is_empty());
        assert!(Tokenizer::tokenize("  \n\t ").unwrap().is_empty());
    }

    #[test]
    fn test_simple_comparison() {
        let tokens = Tokenizer::tokenize(r#"request.verb = "GET""#).unwrap();
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0].kind, TokenKind::Variable);
        assert_eq!(tokens[0].text, "request.verb");
        assert_eq!(tokens[1].kind, TokenKind::Operator(Operator::Equals));
        assert_eq!(tokens[1].offset, 13);
        assert_eq!(tokens[2].kind, TokenKind::Constant(Value::string("GET")));
        assert_eq!(tokens[2].text, "\"GET\"");
    }

    #[test]
    fn test_symbols_without_spaces() {
        assert_eq!(
            kinds("a!=b"),
            vec![
                TokenKind::Variable,
                TokenKind::Operator(Operator::NotEquals),
                TokenKind::Variable
            ]
        );
        assert_eq!(
            kinds("a>=-5"),
            vec![
                TokenKind::Variable,
                TokenKind::Operator(Operator::GreaterOrEqual),
                TokenKind::Constant(Value::Number(-5.0))
            ]
        );
    }

    #[test]
    fn test_pattern_symbols() {
        assert_eq!(kinds(r#"p ~/ "/a""#)[1], TokenKind::Operator(Operator::MatchesPath));
        assert_eq!(kinds(r#"p ~~ "a.*""#)[1], TokenKind::Operator(Operator::JavaRegex));
        assert_eq!(kinds(r#"p ~ "a*""#)[1], TokenKind::Operator(Operator::Matches));
        assert_eq!(kinds(r#"p =| "a""#)[1], TokenKind::Operator(Operator::StartsWith));
        assert_eq!(kinds(r#"p := "a""#)[1], TokenKind::Operator(Operator::EqualsCaseInsensitive));
    }

    #[test]
    fn test_keywords_any_case() {
        for spelling in ["StartsWith", "startswith", "STARTSWITH", "sTaRtSwItH"] {
            let input = format!(r#"a {} "x""#, spelling);
            assert_eq!(kinds(&input)[1], TokenKind::Operator(Operator::StartsWith));
        }
    }

    #[test]
    fn test_quoted_operators_are_literal() {
        let tokens = Tokenizer::tokenize(r#"a = "x AND y != (z)""#).unwrap();
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[2].constant(), Some(&Value::string("x AND y != (z)")));
    }

    #[test]
    fn test_string_escapes() {
        let tokens = Tokenizer::tokenize(r#"a ~~ "say \"hi\" \d+\\""#).unwrap();
        assert_eq!(tokens[2].constant(), Some(&Value::string(r#"say "hi" \d+\"#)));
    }

    #[test]
    fn test_literal_types() {
        let tokens = Tokenizer::tokenize("true FALSE null 42 3.5 .5").unwrap();
        let types: Vec<_> = tokens.iter().map(|t| t.literal_type()).collect();
        assert_eq!(
            types,
            vec![
                Some(LiteralType::Bool),
                Some(LiteralType::Bool),
                Some(LiteralType::Null),
                Some(LiteralType::Number),
                Some(LiteralType::Number),
                Some(LiteralType::Number)
            ]
        );
    }

    #[test]
    fn test_signed_numbers() {
        assert_eq!(
            kinds("a = +5 and b = -2.5 and c = +.5"),
            vec![
                TokenKind::Variable,
                TokenKind::Operator(Operator::Equals),
                TokenKind::Constant(Value::Number(5.0)),
                TokenKind::Operator(Operator::And),
                TokenKind::Variable,
                TokenKind::Operator(Operator::Equals),
                TokenKind::Constant(Value::Number(-2.5)),
                TokenKind::Operator(Operator::And),
                TokenKind::Variable,
                TokenKind::Operator(Operator::Equals),
                TokenKind::Constant(Value::Number(0.5)),
            ]
        );
        let tokens = Tokenizer::tokenize("a = +5").unwrap();
        assert_eq!(tokens[2].text, "+5");
        assert_eq!(tokens[2].offset, 4);
    }

    #[test]
    fn test_lone_plus_is_rejected() {
        let err = Tokenizer::tokenize("a = + 5").unwrap_err();
        assert_eq!(err.fragment(), "+");
        assert_eq!(err.offset(), 4);
    }

    #[test]
    fn test_variable_with_hyphen_and_digits() {
        let tokens = Tokenizer::tokenize("request.header.x-api-key2").unwrap();
        assert_eq!(tokens.len(), 1);
        assert!(tokens[0].is_variable());
        assert_eq!(tokens[0].text, "request.header.x-api-key2");
    }

    #[test]
    fn test_parentheses() {
        assert_eq!(
            kinds("(!(a=1))"),
            vec![
                TokenKind::Boundary(Boundary::Open),
                TokenKind::Operator(Operator::Not),
                TokenKind::Boundary(Boundary::Open),
                TokenKind::Variable,
                TokenKind::Operator(Operator::Equals),
                TokenKind::Constant(Value::Number(1.0)),
                TokenKind::Boundary(Boundary::Close),
                TokenKind::Boundary(Boundary::Close),
            ]
        );
    }

    #[test]
    fn test_unrecognized_input() {
        let err = Tokenizer::tokenize("a = 1 @#$ b").unwrap_err();
        assert_eq!(
            err,
            LexError::Unrecognized {
                fragment: "@#$".to_string(),
                offset: 6
            }
        );
    }

    #[test]
    fn test_word_starting_with_digit_is_rejected() {
        let err = Tokenizer::tokenize("1abc = 2").unwrap_err();
        assert_eq!(err.fragment(), "1abc");
        assert_eq!(err.offset(), 0);
    }

    #[test]
    fn test_unterminated_string() {
        let err = Tokenizer::tokenize(r#"a = "open"#).unwrap_err();
        assert!(matches!(err, LexError::UnterminatedString { offset: 4, .. }));
    }

    #[test]
    fn test_offsets_count_characters() {
        let tokens = Tokenizer::tokenize(r#"a = "ü" and b = 1"#).unwrap();
        let and = &tokens[3];
        assert_eq!(and.kind, TokenKind::Operator(Operator::And));
        assert_eq!(and.offset, 8);
    }
}
