//! Configuration types for the condition analyzer

use crate::error::OptionsError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default cap on the number of value combinations evaluated per condition
pub const DEFAULT_MAX_COMBINATIONS: usize = 250_000;

/// Analyzer options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerOptions {
    /// Largest truth table evaluated for one condition. The table has one row
    /// per element of the cartesian product of all variable domains, so it
    /// grows exponentially with the number of distinct variables.
    pub max_combinations: usize,

    /// Report conditions that fail to parse (otherwise they are skipped)
    pub report_unparseable: bool,

    /// Report conditions above `max_combinations` (otherwise they are skipped)
    pub report_too_complex: bool,
}

impl AnalyzerOptions {
    /// Create options with default values
    pub fn new() -> Self {
        Self {
            max_combinations: DEFAULT_MAX_COMBINATIONS,
            report_unparseable: true,
            report_too_complex: true,
        }
    }

    /// Set the combination cap
    pub fn with_max_combinations(mut self, max_combinations: usize) -> Self {
        self.max_combinations = max_combinations;
        self
    }

    /// Enable or disable diagnostics for unparseable conditions
    pub fn report_unparseable(mut self, enable: bool) -> Self {
        self.report_unparseable = enable;
        self
    }

    /// Enable or disable diagnostics for conditions too large to analyze
    pub fn report_too_complex(mut self, enable: bool) -> Self {
        self.report_too_complex = enable;
        self
    }

    /// Parse options from YAML
    ///
    /// ```yaml
    /// max_combinations: 100000
    /// report_unparseable: false
    /// ```
    pub fn from_yaml_str(content: &str) -> Result<Self, OptionsError> {
        let options: AnalyzerOptions = serde_yaml::from_str(content)?;
        options.validate()?;
        Ok(options)
    }

    /// Load options from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, OptionsError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&content)
    }

    fn validate(&self) -> Result<(), OptionsError> {
        if self.max_combinations == 0 {
            return Err(OptionsError::InvalidValue {
                field: "max_combinations".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for AnalyzerOptions {
    fn default() -> Self {
        Self::new()
    }
}
