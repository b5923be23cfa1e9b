//! Operators for proxylint conditions
//!
//! A single static table maps every accepted surface spelling to its canonical
//! operator. Symbolic spellings are matched longest-first; keyword spellings are
//! matched as whole words, ignoring letter case. The table is read-only, so it
//! can be shared freely between threads analysing different conditions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Condition operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    // Unary
    /// Logical negation (`Not`, `!`)
    Not,

    // Connectives
    /// Logical AND (`And`, `&&`)
    And,
    /// Logical OR (`Or`, `||`)
    Or,

    // Equality and ordering
    /// Equal (`Equals`, `Is`, `=`, `==`)
    Equals,
    /// Not equal (`NotEquals`, `IsNot`, `!=`)
    NotEquals,
    /// Case-insensitive equal (`EqualsCaseInsensitive`, `:=`)
    EqualsCaseInsensitive,
    /// Greater than (`GreaterThan`, `>`)
    GreaterThan,
    /// Greater than or equal (`GreaterThanOrEquals`, `>=`)
    GreaterOrEqual,
    /// Less than (`LesserThan`, `<`)
    LesserThan,
    /// Less than or equal (`LesserThanOrEquals`, `<=`)
    LesserOrEqual,

    // Pattern operators
    /// Prefix test (`StartsWith`, `=|`)
    StartsWith,
    /// Wildcard match (`Matches`, `Like`, `~`)
    Matches,
    /// Regular expression match (`JavaRegex`, `~~`)
    JavaRegex,
    /// Path pattern match (`MatchesPath`, `LikePath`, `~/`)
    MatchesPath,
}

/// Precedence class of an operator, tightest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PrecedenceClass {
    Unary,
    Comparison,
    Connective,
}

/// Right-hand operand kinds a comparison accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperandKind {
    /// Any literal or a variable
    Any,
    /// Number literal or a variable
    Numeric,
    /// String literal or a variable
    Text,
}

/// One row of the operator table
#[derive(Debug, Clone, Copy)]
pub struct OperatorInfo {
    pub operator: Operator,
    pub arity: u8,
    pub class: PrecedenceClass,
    pub negatable: bool,
    pub operand: OperandKind,
}

const fn info(
    operator: Operator,
    arity: u8,
    class: PrecedenceClass,
    negatable: bool,
    operand: OperandKind,
) -> OperatorInfo {
    OperatorInfo {
        operator,
        arity,
        class,
        negatable,
        operand,
    }
}

/// Canonical operator table.
///
/// `negatable` marks the comparisons that may be written as `x Not <op> y`.
/// The restriction to the pattern operators is part of the condition language,
/// not something derived from the operators' semantics.
pub static OPERATOR_TABLE: &[OperatorInfo] = &[
    info(Operator::Not, 1, PrecedenceClass::Unary, false, OperandKind::Any),
    info(Operator::And, 2, PrecedenceClass::Connective, false, OperandKind::Any),
    info(Operator::Or, 2, PrecedenceClass::Connective, false, OperandKind::Any),
    info(Operator::Equals, 2, PrecedenceClass::Comparison, false, OperandKind::Any),
    info(Operator::NotEquals, 2, PrecedenceClass::Comparison, false, OperandKind::Any),
    info(Operator::EqualsCaseInsensitive, 2, PrecedenceClass::Comparison, false, OperandKind::Text),
    info(Operator::GreaterThan, 2, PrecedenceClass::Comparison, false, OperandKind::Numeric),
    info(Operator::GreaterOrEqual, 2, PrecedenceClass::Comparison, false, OperandKind::Numeric),
    info(Operator::LesserThan, 2, PrecedenceClass::Comparison, false, OperandKind::Numeric),
    info(Operator::LesserOrEqual, 2, PrecedenceClass::Comparison, false, OperandKind::Numeric),
    info(Operator::StartsWith, 2, PrecedenceClass::Comparison, true, OperandKind::Text),
    info(Operator::Matches, 2, PrecedenceClass::Comparison, true, OperandKind::Text),
    info(Operator::JavaRegex, 2, PrecedenceClass::Comparison, true, OperandKind::Text),
    info(Operator::MatchesPath, 2, PrecedenceClass::Comparison, true, OperandKind::Text),
];

/// Symbolic spellings
pub static SYMBOL_SPELLINGS: &[(&str, Operator)] = &[
    ("!", Operator::Not),
    ("&&", Operator::And),
    ("||", Operator::Or),
    ("=", Operator::Equals),
    ("==", Operator::Equals),
    ("!=", Operator::NotEquals),
    (":=", Operator::EqualsCaseInsensitive),
    (">", Operator::GreaterThan),
    (">=", Operator::GreaterOrEqual),
    ("<", Operator::LesserThan),
    ("<=", Operator::LesserOrEqual),
    ("=|", Operator::StartsWith),
    ("~", Operator::Matches),
    ("~~", Operator::JavaRegex),
    ("~/", Operator::MatchesPath),
];

/// Keyword spellings, compared ignoring ASCII case
pub static KEYWORD_SPELLINGS: &[(&str, Operator)] = &[
    ("Not", Operator::Not),
    ("And", Operator::And),
    ("Or", Operator::Or),
    ("Equals", Operator::Equals),
    ("Is", Operator::Equals),
    ("NotEquals", Operator::NotEquals),
    ("IsNot", Operator::NotEquals),
    ("EqualsCaseInsensitive", Operator::EqualsCaseInsensitive),
    ("GreaterThan", Operator::GreaterThan),
    ("GreaterThanOrEquals", Operator::GreaterOrEqual),
    ("LesserThan", Operator::LesserThan),
    ("LesserThanOrEquals", Operator::LesserOrEqual),
    ("StartsWith", Operator::StartsWith),
    ("Matches", Operator::Matches),
    ("Like", Operator::Matches),
    ("JavaRegex", Operator::JavaRegex),
    ("MatchesPath", Operator::MatchesPath),
    ("LikePath", Operator::MatchesPath),
];

impl Operator {
    /// Table row for this operator
    pub fn info(&self) -> &'static OperatorInfo {
        // Rows are stored in declaration order
        &OPERATOR_TABLE[*self as usize]
    }

    pub fn arity(&self) -> u8 {
        self.info().arity
    }

    pub fn class(&self) -> PrecedenceClass {
        self.info().class
    }

    /// Whether `x Not <op> y` is accepted
    pub fn is_negatable(&self) -> bool {
        self.info().negatable
    }

    /// Accepted right-hand operand kinds
    pub fn operand_kind(&self) -> OperandKind {
        self.info().operand
    }

    /// Returns true if this is a comparison or pattern operator
    pub fn is_comparison(&self) -> bool {
        self.class() == PrecedenceClass::Comparison
    }

    /// Returns true if this is a logical connective
    pub fn is_connective(&self) -> bool {
        self.class() == PrecedenceClass::Connective
    }

    /// Look up a keyword spelling, ignoring letter case
    pub fn from_keyword(word: &str) -> Option<Operator> {
        KEYWORD_SPELLINGS
            .iter()
            .find(|(spelling, _)| spelling.eq_ignore_ascii_case(word))
            .map(|(_, op)| *op)
    }

    /// Longest symbolic spelling that prefixes `input`
    pub fn match_symbol(input: &str) -> Option<(Operator, &'static str)> {
        SYMBOL_SPELLINGS
            .iter()
            .filter(|(spelling, _)| input.starts_with(*spelling))
            .max_by_key(|(spelling, _)| spelling.len())
            .map(|(spelling, op)| (*op, *spelling))
    }

    /// Canonical keyword spelling
    pub fn keyword(&self) -> &'static str {
        KEYWORD_SPELLINGS
            .iter()
            .find(|(_, op)| op == self)
            .map(|(spelling, _)| *spelling)
            .unwrap_or("?")
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}
