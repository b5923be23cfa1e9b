//! Memoized condition analysis
//!
//! A `Condition` owns one expression string and computes each pipeline stage
//! (tokens, AST, domains, evaluation, verdict) at most once. Results, including
//! errors, are cached for the lifetime of the condition. Stages are stored in
//! `OnceLock`s, so a condition can be shared across threads.

use crate::classifier::{Classifier, Verdict};
use crate::domain::{DomainGenerator, VariableDomains};
use crate::error::{AnalysisError, Result};
use crate::evaluator::{Evaluation, Evaluator};
use crate::options::AnalyzerOptions;
use proxylint_core::ast::{Expression, Token};
use proxylint_parser::{ExpressionParser, ParseError, Tokenizer};
use std::fmt;
use std::sync::OnceLock;

/// A condition expression with lazily computed analysis results
pub struct Condition {
    source: String,
    options: AnalyzerOptions,
    tokens: OnceLock<Result<Vec<Token>>>,
    expression: OnceLock<Result<Expression>>,
    domains: OnceLock<Result<VariableDomains>>,
    evaluation: OnceLock<Result<Evaluation>>,
    verdict: OnceLock<Result<Verdict>>,
}

impl Condition {
    /// Create a condition with default options
    pub fn new(source: impl Into<String>) -> Self {
        Self::with_options(source, AnalyzerOptions::default())
    }

    pub fn with_options(source: impl Into<String>, options: AnalyzerOptions) -> Self {
        Self {
            source: source.into(),
            options,
            tokens: OnceLock::new(),
            expression: OnceLock::new(),
            domains: OnceLock::new(),
            evaluation: OnceLock::new(),
            verdict: OnceLock::new(),
        }
    }

    /// The expression text as authored
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn tokens(&self) -> Result<&[Token]> {
        self.tokens
            .get_or_init(|| {
                Tokenizer::tokenize(&self.source)
                    .map_err(|err| AnalysisError::Parse(ParseError::from(err)))
            })
            .as_deref()
            .map_err(Clone::clone)
    }

    pub fn expression(&self) -> Result<&Expression> {
        self.expression
            .get_or_init(|| {
                let tokens = self.tokens()?;
                let expr = ExpressionParser::parse_tokens(tokens, self.source.chars().count())?;
                Ok(expr)
            })
            .as_ref()
            .map_err(Clone::clone)
    }

    pub fn domains(&self) -> Result<&VariableDomains> {
        self.domains
            .get_or_init(|| Ok(DomainGenerator::generate(self.expression()?)))
            .as_ref()
            .map_err(Clone::clone)
    }

    pub fn evaluation(&self) -> Result<&Evaluation> {
        self.evaluation
            .get_or_init(|| {
                let expr = self.expression()?;
                let domains = self.domains()?;
                Evaluator::new(&self.options).evaluate(expr, domains)
            })
            .as_ref()
            .map_err(Clone::clone)
    }

    pub fn verdict(&self) -> Result<Verdict> {
        self.verdict
            .get_or_init(|| {
                let verdict = Classifier::classify_evaluation(self.evaluation()?);
                tracing::debug!(condition = %self.source, %verdict, "Classified condition");
                Ok(verdict)
            })
            .clone()
    }

    /// True only for a well-formed condition that can never hold
    pub fn is_contradiction(&self) -> bool {
        matches!(self.verdict(), Ok(Verdict::Contradiction))
    }
}

impl fmt::Debug for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Condition")
            .field("source", &self.source)
            .field("verdict", &self.verdict.get())
            .finish()
    }
}
