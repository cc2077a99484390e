//! Outcome of pre-submission validation

use serde::{Deserialize, Serialize};

/// Ordered, human readable validation errors for a draft.
///
/// An empty report is a valid draft.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub errors: Vec<String>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: impl Into<String>) {
        self.errors.push(error.into());
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }
}

impl std::fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.errors.join("; "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_report_is_valid() {
        assert!(ValidationReport::new().is_valid());
    }

    #[test]
    fn test_display_joins_errors() {
        let mut report = ValidationReport::new();
        report.push("first");
        report.push("second");
        assert!(!report.is_valid());
        assert_eq!(report.to_string(), "first; second");
    }
}
