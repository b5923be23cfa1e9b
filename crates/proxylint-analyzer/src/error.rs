//! Analyzer error types

use proxylint_parser::ParseError;
use thiserror::Error;

/// Analysis error
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// The condition could not be tokenized or parsed
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// The truth table is larger than the configured limit
    #[error("Condition has {combinations} value combinations over {variables} variables (limit {limit})")]
    TooComplex {
        variables: usize,
        combinations: usize,
        limit: usize,
    },
}

impl AnalysisError {
    /// The parse error behind this failure, if any
    pub fn parse_error(&self) -> Option<&ParseError> {
        match self {
            AnalysisError::Parse(err) => Some(err),
            AnalysisError::TooComplex { .. } => None,
        }
    }
}

/// Options loading error
#[derive(Error, Debug)]
pub enum OptionsError {
    /// Options file could not be read
    #[error("Failed to read options file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// Invalid field value
    #[error("Invalid value for field '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Result type for analyzer operations
pub type Result<T> = std::result::Result<T, AnalysisError>;
