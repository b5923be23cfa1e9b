//! Dead-branch lint rule
//!
//! Flags `<Condition>` elements that can never be true. The bundle model is
//! owned by the caller; the rule only sees conditions through
//! [`ConditionSource`].

use crate::condition::Condition;
use crate::error::AnalysisError;
use crate::options::AnalyzerOptions;
use crate::Verdict;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of configuration element a condition is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionKind {
    Policy,
    Step,
    Flow,
    RouteRule,
}

impl fmt::Display for ConditionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConditionKind::Policy => write!(f, "policy"),
            ConditionKind::Step => write!(f, "step"),
            ConditionKind::Flow => write!(f, "flow"),
            ConditionKind::RouteRule => write!(f, "route rule"),
        }
    }
}

/// Where a condition lives in the proxy bundle
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConditionLocation {
    pub kind: ConditionKind,
    pub name: String,
}

impl ConditionLocation {
    pub fn new(kind: ConditionKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
        }
    }
}

impl fmt::Display for ConditionLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}'", self.kind, self.name)
    }
}

/// Anything that carries a condition expression
pub trait ConditionSource {
    /// Text content of the `<Condition>` element
    fn expression(&self) -> String;

    /// Location used in diagnostics
    fn location(&self) -> ConditionLocation;
}

/// A standalone condition element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionElement {
    pub location: ConditionLocation,
    pub expression: String,
}

impl ConditionElement {
    pub fn new(location: ConditionLocation, expression: impl Into<String>) -> Self {
        Self {
            location,
            expression: expression.into(),
        }
    }
}

impl ConditionSource for ConditionElement {
    fn expression(&self) -> String {
        self.expression.clone()
    }

    fn location(&self) -> ConditionLocation {
        self.location.clone()
    }
}

/// Severity level for lint diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticSeverity {
    Error,
    Warning,
    Info,
}

/// A single lint finding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Severity level
    pub severity: DiagnosticSeverity,

    /// Rule code (e.g., "PL001")
    pub code: String,

    /// Human-readable message
    pub message: String,

    /// Element the condition belongs to
    pub location: ConditionLocation,

    /// The condition text
    pub context: String,

    /// Character offset into the condition (parse errors only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<usize>,

    /// Offending token (parse errors only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl Diagnostic {
    fn new(
        severity: DiagnosticSeverity,
        code: &str,
        message: String,
        location: ConditionLocation,
        context: String,
    ) -> Self {
        Self {
            severity,
            code: code.to_string(),
            message,
            location,
            context,
            offset: None,
            token: None,
        }
    }
}

/// Code for a condition that can never be true
pub const DEAD_BRANCH: &str = "PL001";
/// Code for a condition that cannot be parsed
pub const UNPARSEABLE_CONDITION: &str = "PL002";
/// Code for a condition too large to analyze
pub const TOO_COMPLEX_CONDITION: &str = "PL003";

/// Lint rule reporting dead branches
#[derive(Debug, Clone, Default)]
pub struct DeadBranchRule {
    options: AnalyzerOptions,
}

impl DeadBranchRule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: AnalyzerOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &AnalyzerOptions {
        &self.options
    }

    /// Analyze one condition. Returns `None` when there is nothing to report.
    pub fn check<S: ConditionSource + ?Sized>(&self, source: &S) -> Option<Diagnostic> {
        let text = source.expression();
        let location = source.location();
        let condition = Condition::with_options(text.clone(), self.options.clone());

        match condition.verdict() {
            Ok(Verdict::Satisfiable) => None,
            Ok(Verdict::Contradiction) => {
                tracing::warn!(%location, condition = %text, "Condition can never be true");
                Some(Diagnostic::new(
                    DiagnosticSeverity::Warning,
                    DEAD_BRANCH,
                    format!("Condition on {} is never true; the {} is dead code", location, location.kind),
                    location,
                    text,
                ))
            }
            Err(AnalysisError::Parse(err)) => {
                if !self.options.report_unparseable {
                    return None;
                }
                tracing::warn!(%location, error = %err, "Condition could not be parsed");
                let mut diagnostic = Diagnostic::new(
                    DiagnosticSeverity::Error,
                    UNPARSEABLE_CONDITION,
                    format!("Condition on {} could not be parsed: {}", location, err),
                    location,
                    text,
                );
                diagnostic.offset = Some(err.offset());
                diagnostic.token = err.token().map(str::to_string);
                Some(diagnostic)
            }
            Err(err @ AnalysisError::TooComplex { .. }) => {
                if !self.options.report_too_complex {
                    return None;
                }
                tracing::info!(%location, error = %err, "Condition skipped");
                Some(Diagnostic::new(
                    DiagnosticSeverity::Info,
                    TOO_COMPLEX_CONDITION,
                    format!("Condition on {} was not analyzed: {}", location, err),
                    location,
                    text,
                ))
            }
        }
    }

    /// Analyze a sequence of conditions, collecting every diagnostic
    pub fn check_all<'s, S, I>(&self, sources: I) -> Vec<Diagnostic>
    where
        S: ConditionSource + ?Sized + 's,
        I: IntoIterator<Item = &'s S>,
    {
        let diagnostics: Vec<Diagnostic> = sources
            .into_iter()
            .filter_map(|source| self.check(source))
            .collect();
        tracing::debug!(count = diagnostics.len(), "Dead-branch check finished");
        diagnostics
    }
}
