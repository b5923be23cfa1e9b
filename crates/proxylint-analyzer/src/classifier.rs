//! Verdict classification
//!
//! A condition is satisfiable as soon as one substitution makes it true. An
//! always-true condition is reported as satisfiable as well; there is no
//! separate tautology verdict.

use crate::evaluator::Evaluation;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Satisfiability verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    /// Some representative substitution makes the condition true
    Satisfiable,
    /// No representative substitution makes the condition true
    Contradiction,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Satisfiable => write!(f, "satisfiable"),
            Verdict::Contradiction => write!(f, "contradiction"),
        }
    }
}

/// Verdict classifier
pub struct Classifier;

impl Classifier {
    /// Reduce a truth table to a verdict
    pub fn classify(results: &[bool]) -> Verdict {
        if results.iter().any(|&result| result) {
            Verdict::Satisfiable
        } else {
            Verdict::Contradiction
        }
    }

    pub fn classify_evaluation(evaluation: &Evaluation) -> Verdict {
        Self::classify(evaluation.results())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_false_is_contradiction() {
        assert_eq!(Classifier::classify(&[false, false, false]), Verdict::Contradiction);
    }

    #[test]
    fn test_some_true_is_satisfiable() {
        assert_eq!(Classifier::classify(&[false, true]), Verdict::Satisfiable);
    }

    #[test]
    fn test_all_true_is_satisfiable() {
        assert_eq!(Classifier::classify(&[true, true]), Verdict::Satisfiable);
    }

    #[test]
    fn test_verdict_serde() {
        let json = serde_json::to_string(&Verdict::Contradiction).unwrap();
        assert_eq!(json, "\"contradiction\"");
    }
}
