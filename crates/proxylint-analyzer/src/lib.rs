//! proxylint Analyzer - satisfiability checking for proxy conditions
//!
//! Given a condition string, the analyzer tokenizes and parses it, derives a
//! small set of representative values for every variable, evaluates the
//! condition under every combination of those values and reports whether any
//! combination makes it true.
//!
//! ```
//! use proxylint_analyzer::{Condition, Verdict};
//!
//! let condition = Condition::new(r#"(a = 1) and (a != 1)"#);
//! assert_eq!(condition.verdict().unwrap(), Verdict::Contradiction);
//! ```
//!
//! The analysis is heuristic. A `Contradiction` verdict means no representative
//! value satisfies the condition; it is not a proof.

pub mod classifier;
pub mod condition;
pub mod domain;
pub mod error;
pub mod evaluator;
pub mod options;
pub mod rule;

pub use classifier::{Classifier, Verdict};
pub use condition::Condition;
pub use domain::{DomainGenerator, VariableDomains};
pub use error::{AnalysisError, OptionsError, Result};
pub use evaluator::{Evaluation, Evaluator, Substitution, Substitutions};
pub use options::{AnalyzerOptions, DEFAULT_MAX_COMBINATIONS};
pub use rule::{
    ConditionElement, ConditionKind, ConditionLocation, ConditionSource, DeadBranchRule,
    Diagnostic, DiagnosticSeverity,
};
