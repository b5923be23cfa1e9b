//! Variable domain generation
//!
//! Builds a small set of representative values for every variable from the
//! literals it is compared against. This is a boundary-value heuristic, not a
//! decision procedure: a contradiction is only found if it shows up on these
//! representative values.
//!
//! Candidates per literal:
//! - string `s`: `s`, `"z" + s`, `s + "z"`, `""`, `"NULL"`
//! - number `n`: `n`, `n - 1`, `n + 1`, `-n`, `0`, `1`
//! - boolean: `true`, `false`
//! - null: `null`, `"NULL"`, `""`
//!
//! Case-insensitive comparisons also add the upper- and lower-cased string.
//! Variables never compared with a literal get `{true, false}`.
//!
//! A comparison between two variables contributes no candidates to either
//! side; the two domains are never merged. `a = "x" and a = b` therefore
//! classifies as a contradiction (`b` only ranges over `{true, false}`), even
//! though it holds for `a = b = "x"`.

use proxylint_core::ast::{Expression, Operator};
use proxylint_core::Value;
use serde::Serialize;
use std::collections::BTreeMap;

/// Candidate values per variable, keyed and iterated by variable name
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VariableDomains {
    domains: BTreeMap<String, Vec<Value>>,
}

impl VariableDomains {
    pub fn new() -> Self {
        Self::default()
    }

    /// Candidate values of one variable
    pub fn get(&self, name: &str) -> Option<&[Value]> {
        self.domains.get(name).map(Vec::as_slice)
    }

    /// Iterate over `(name, candidates)` in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Value])> {
        self.domains
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    /// Number of variables
    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }

    /// Size of the cartesian product of all domains, saturating at `usize::MAX`
    pub fn combination_count(&self) -> usize {
        self.domains
            .values()
            .fold(1usize, |count, values| count.saturating_mul(values.len()))
    }

    /// Register a variable without adding candidates
    fn declare(&mut self, name: &str) {
        self.domains.entry(name.to_string()).or_default();
    }

    /// Add a candidate, keeping first-seen order and dropping duplicates
    fn add(&mut self, name: &str, value: Value) {
        let values = self.domains.entry(name.to_string()).or_default();
        if !values.contains(&value) {
            values.push(value);
        }
    }
}

/// Domain generator
pub struct DomainGenerator;

impl DomainGenerator {
    /// Build the domains of every variable in `expr`
    pub fn generate(expr: &Expression) -> VariableDomains {
        let mut domains = VariableDomains::new();
        for name in expr.variables() {
            domains.declare(name);
        }
        Self::collect(expr, &mut domains);

        for values in domains.domains.values_mut() {
            if values.is_empty() {
                values.push(Value::Bool(true));
                values.push(Value::Bool(false));
            }
        }

        tracing::debug!(
            variables = domains.len(),
            combinations = domains.combination_count(),
            "Generated variable domains"
        );
        domains
    }

    /// Add the candidates of every variable-to-literal comparison
    fn collect(expr: &Expression, domains: &mut VariableDomains) {
        match expr {
            Expression::Literal(_) | Expression::Variable(_) => {}
            Expression::Unary { operand, .. } => Self::collect(operand, domains),
            Expression::Binary { left, op, right } if op.is_comparison() => {
                match (left.as_ref(), right.as_ref()) {
                    (Expression::Variable(name), Expression::Literal(value))
                    | (Expression::Literal(value), Expression::Variable(name)) => {
                        for candidate in Self::candidates(*op, value) {
                            domains.add(name, candidate);
                        }
                    }
                    _ => {}
                }
            }
            Expression::Binary { left, right, .. } => {
                Self::collect(left, domains);
                Self::collect(right, domains);
            }
        }
    }

    /// Representative values for a variable compared with `literal`
    pub fn candidates(op: Operator, literal: &Value) -> Vec<Value> {
        match literal {
            Value::String(s) => {
                let mut values = vec![
                    Value::string(s.clone()),
                    Value::string(format!("z{}", s)),
                    Value::string(format!("{}z", s)),
                    Value::string(""),
                    Value::string("NULL"),
                ];
                if op == Operator::EqualsCaseInsensitive {
                    values.push(Value::string(s.to_uppercase()));
                    values.push(Value::string(s.to_lowercase()));
                }
                values
            }
            Value::Number(n) => vec![
                Value::Number(*n),
                Value::Number(n - 1.0),
                Value::Number(n + 1.0),
                Value::Number(-n),
                Value::Number(0.0),
                Value::Number(1.0),
            ],
            Value::Bool(_) => vec![Value::Bool(true), Value::Bool(false)],
            Value::Null => vec![Value::Null, Value::string("NULL"), Value::string("")],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proxylint_parser::ExpressionParser;

    fn domains(input: &str) -> VariableDomains {
        DomainGenerator::generate(&ExpressionParser::parse(input).unwrap())
    }

    #[test]
    fn test_string_candidates() {
        let d = domains(r#"a = "foo""#);
        assert_eq!(
            d.get("a").unwrap(),
            &[
                Value::string("foo"),
                Value::string("zfoo"),
                Value::string("fooz"),
                Value::string(""),
                Value::string("NULL"),
            ]
        );
    }

    #[test]
    fn test_number_candidates() {
        let d = domains("a > 5");
        assert_eq!(
            d.get("a").unwrap(),
            &[
                Value::Number(5.0),
                Value::Number(4.0),
                Value::Number(6.0),
                Value::Number(-5.0),
                Value::Number(0.0),
                Value::Number(1.0),
            ]
        );
    }

    #[test]
    fn test_number_candidates_deduplicate() {
        // 1: {1, 0, 2, -1, 0, 1} -> {1, 0, 2, -1}
        let d = domains("a = 1");
        assert_eq!(d.get("a").unwrap().len(), 4);
    }

    #[test]
    fn test_domains_merge_across_comparisons() {
        let d = domains(r#"a = "x" and a = "y""#);
        // x, zx, xz, "", NULL, y, zy, yz
        assert_eq!(d.get("a").unwrap().len(), 8);
    }

    #[test]
    fn test_variable_only_falls_back_to_bool() {
        let d = domains("a = b");
        assert_eq!(d.get("a").unwrap(), &[Value::Bool(true), Value::Bool(false)]);
        assert_eq!(d.get("b").unwrap(), &[Value::Bool(true), Value::Bool(false)]);
        assert_eq!(d.combination_count(), 4);
    }

    #[test]
    fn test_variable_comparison_does_not_merge_domains() {
        let d = domains(r#"a = "x" and a = b"#);
        assert_eq!(d.get("a").unwrap().len(), 5);
        assert_eq!(d.get("b").unwrap(), &[Value::Bool(true), Value::Bool(false)]);

        let d = domains("a = 5 and b = 7 and a = b");
        assert!(!d.get("a").unwrap().contains(&Value::Number(7.0)));
        assert!(!d.get("b").unwrap().contains(&Value::Number(5.0)));
    }

    #[test]
    fn test_every_variable_is_declared() {
        let expr = ExpressionParser::parse(r#"a = b or !(c StartsWith "x")"#).unwrap();
        let d = DomainGenerator::generate(&expr);
        let names: Vec<&str> = d.iter().map(|(name, _)| name).collect();
        let expected: Vec<&str> = expr.variables().into_iter().collect();
        assert_eq!(names, expected);
    }

    #[test]
    fn test_no_variables() {
        let d = domains("true and false");
        assert!(d.is_empty());
        assert_eq!(d.combination_count(), 1);
    }

    #[test]
    fn test_case_insensitive_adds_case_variants() {
        let d = domains(r#"a := "Foo""#);
        let values = d.get("a").unwrap();
        assert!(values.contains(&Value::string("FOO")));
        assert!(values.contains(&Value::string("foo")));
    }

    #[test]
    fn test_iteration_is_sorted_by_name() {
        let d = domains("zeta = 1 and alpha = 2");
        let names: Vec<&str> = d.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
    }
}
