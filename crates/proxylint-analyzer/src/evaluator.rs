//! Exhaustive condition evaluation
//!
//! Evaluates a condition once per element of the cartesian product of its
//! variable domains. The cost is `O(∏ |domain(v)|)` over all free variables,
//! so the product size is checked against `AnalyzerOptions::max_combinations`
//! before any row is evaluated.
//!
//! The walk is recursive. Parsed conditions nest at most
//! `proxylint_parser::MAX_NESTING_DEPTH` levels, which bounds its depth.

use crate::domain::VariableDomains;
use crate::error::{AnalysisError, Result};
use crate::options::AnalyzerOptions;
use proxylint_core::ast::{Expression, Operator};
use proxylint_core::Value;
use serde::Serialize;
use std::borrow::Cow;
use std::collections::BTreeMap;

/// One assignment of a candidate value to every free variable
#[derive(Debug, Clone, PartialEq)]
pub struct Substitution<'d> {
    bindings: BTreeMap<&'d str, &'d Value>,
}

impl<'d> Substitution<'d> {
    pub fn get(&self, name: &str) -> Option<&'d Value> {
        self.bindings.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// Iterator over every substitution of a set of domains
pub struct Substitutions<'d> {
    domains: Vec<(&'d str, &'d [Value])>,
    /// Odometer of indices into each domain; `None` once exhausted
    indices: Option<Vec<usize>>,
}

impl<'d> Substitutions<'d> {
    pub fn new(domains: &'d VariableDomains) -> Self {
        let domains: Vec<_> = domains.iter().collect();
        let indices = if domains.iter().any(|(_, values)| values.is_empty()) {
            None
        } else {
            Some(vec![0; domains.len()])
        };
        Self { domains, indices }
    }
}

impl<'d> Iterator for Substitutions<'d> {
    type Item = Substitution<'d>;

    fn next(&mut self) -> Option<Self::Item> {
        let indices = self.indices.as_mut()?;

        let bindings = self
            .domains
            .iter()
            .zip(indices.iter())
            .map(|(&(name, values), &i)| (name, &values[i]))
            .collect();

        // Advance the odometer, last variable fastest
        let mut exhausted = true;
        for position in (0..indices.len()).rev() {
            indices[position] += 1;
            if indices[position] < self.domains[position].1.len() {
                exhausted = false;
                break;
            }
            indices[position] = 0;
        }
        if exhausted {
            self.indices = None;
        }

        Some(Substitution { bindings })
    }
}

/// Truth table of a condition: one result per substitution
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    results: Vec<bool>,
}

impl Evaluation {
    pub fn new(results: Vec<bool>) -> Self {
        Self { results }
    }

    pub fn results(&self) -> &[bool] {
        &self.results
    }

    /// Number of evaluated substitutions
    pub fn combinations(&self) -> usize {
        self.results.len()
    }

    /// Number of substitutions that make the condition true
    pub fn satisfied(&self) -> usize {
        self.results.iter().filter(|&&result| result).count()
    }
}

/// Condition evaluator
pub struct Evaluator {
    max_combinations: usize,
}

impl Evaluator {
    pub fn new(options: &AnalyzerOptions) -> Self {
        Self {
            max_combinations: options.max_combinations,
        }
    }

    /// Evaluate `expr` under every substitution of `domains`
    pub fn evaluate(&self, expr: &Expression, domains: &VariableDomains) -> Result<Evaluation> {
        let combinations = domains.combination_count();
        if combinations > self.max_combinations {
            return Err(AnalysisError::TooComplex {
                variables: domains.len(),
                combinations,
                limit: self.max_combinations,
            });
        }

        let results: Vec<bool> = Substitutions::new(domains)
            .map(|substitution| Self::eval_bool(expr, &substitution))
            .collect();

        tracing::debug!(
            combinations = results.len(),
            satisfied = results.iter().filter(|&&r| r).count(),
            "Evaluated condition"
        );
        Ok(Evaluation::new(results))
    }

    /// Truth value of an expression under one substitution
    pub fn eval_bool(expr: &Expression, substitution: &Substitution<'_>) -> bool {
        match expr {
            Expression::Literal(value) => value.as_bool().unwrap_or(false),
            Expression::Variable(name) => substitution
                .get(name)
                .and_then(Value::as_bool)
                .unwrap_or(false),
            Expression::Unary { operand, .. } => !Self::eval_bool(operand, substitution),
            Expression::Binary { left, op, right } => match op {
                // Both sides are always evaluated
                Operator::And => {
                    let l = Self::eval_bool(left, substitution);
                    let r = Self::eval_bool(right, substitution);
                    l & r
                }
                Operator::Or => {
                    let l = Self::eval_bool(left, substitution);
                    let r = Self::eval_bool(right, substitution);
                    l | r
                }
                _ => {
                    let lhs = Self::operand_value(left, substitution);
                    let rhs = Self::operand_value(right, substitution);
                    let rhs_is_variable = matches!(right.as_ref(), Expression::Variable(_));
                    Self::compare(*op, &lhs, &rhs, rhs_is_variable)
                }
            },
        }
    }

    fn operand_value<'a>(expr: &'a Expression, substitution: &Substitution<'a>) -> Cow<'a, Value> {
        match expr {
            Expression::Literal(value) => Cow::Borrowed(value),
            Expression::Variable(name) => match substitution.get(name) {
                Some(value) => Cow::Borrowed(value),
                None => Cow::Owned(Value::Null),
            },
            _ => Cow::Owned(Value::Bool(Self::eval_bool(expr, substitution))),
        }
    }

    /// Apply a comparison operator to two values
    pub fn compare(op: Operator, lhs: &Value, rhs: &Value, rhs_is_variable: bool) -> bool {
        match op {
            Operator::Equals => lhs.loose_eq(rhs),
            Operator::NotEquals => !lhs.loose_eq(rhs),
            Operator::EqualsCaseInsensitive => match (lhs.as_text(), rhs.as_text()) {
                (Some(l), Some(r)) => l.to_lowercase() == r.to_lowercase(),
                _ => lhs.loose_eq(rhs),
            },
            Operator::GreaterThan => Self::numeric(lhs, rhs, |l, r| l > r),
            Operator::GreaterOrEqual => Self::numeric(lhs, rhs, |l, r| l >= r),
            Operator::LesserThan => Self::numeric(lhs, rhs, |l, r| l < r),
            Operator::LesserOrEqual => Self::numeric(lhs, rhs, |l, r| l <= r),
            // Two variables cannot be compared as strings without real values
            Operator::StartsWith if rhs_is_variable => lhs.loose_eq(rhs),
            Operator::StartsWith => match (lhs.as_text(), rhs.as_text()) {
                (Some(l), Some(r)) => l.starts_with(r.as_ref()),
                _ => false,
            },
            // Patterns are approximated by their representative value
            Operator::Matches | Operator::JavaRegex | Operator::MatchesPath => lhs.loose_eq(rhs),
            Operator::Not | Operator::And | Operator::Or => false,
        }
    }

    fn numeric(lhs: &Value, rhs: &Value, cmp: impl Fn(f64, f64) -> bool) -> bool {
        match (lhs.as_number(), rhs.as_number()) {
            (Some(l), Some(r)) => cmp(l, r),
            _ => false,
        }
    }
}
