//! Diagnostics collected while parsing

use std::fmt;

use serde::{Deserialize, Serialize};

/// Severity level for parse issues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseIssueSeverity {
    /// The line could not be interpreted at all
    Error,

    /// The line was understood but ignored
    Warning,
}

impl fmt::Display for ParseIssueSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => f.write_str("error"),
            Self::Warning => f.write_str("warning"),
        }
    }
}

/// A problem found on a single line of a robots.txt document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseIssue {
    /// 1-based, blank and comment lines included
    pub line_number: usize,

    /// Trimmed text of the offending line
    pub line_content: String,

    pub reason: String,

    pub severity: ParseIssueSeverity,
}

impl ParseIssue {
    pub fn new(
        severity: ParseIssueSeverity,
        reason: impl Into<String>,
        line_number: usize,
        line_content: impl Into<String>,
    ) -> Self {
        Self {
            line_number,
            line_content: line_content.into(),
            reason: reason.into(),
            severity,
        }
    }

    pub fn error(
        reason: impl Into<String>,
        line_number: usize,
        line_content: impl Into<String>,
    ) -> Self {
        Self::new(ParseIssueSeverity::Error, reason, line_number, line_content)
    }

    pub fn warning(
        reason: impl Into<String>,
        line_number: usize,
        line_content: impl Into<String>,
    ) -> Self {
        Self::new(ParseIssueSeverity::Warning, reason, line_number, line_content)
    }

    pub fn is_error(&self) -> bool {
        self.severity == ParseIssueSeverity::Error
    }

    pub fn is_warning(&self) -> bool {
        self.severity == ParseIssueSeverity::Warning
    }
}

impl fmt::Display for ParseIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "line {} ({}): {} [{}]",
            self.line_number, self.severity, self.reason, self.line_content
        )
    }
}
