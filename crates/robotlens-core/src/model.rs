//! Parsed representation of a robots.txt document

use serde::{Deserialize, Serialize};

use crate::directive::{RobotsDirective, RobotsDirectiveType};
use crate::issue::{ParseIssue, ParseIssueSeverity};

/// Directives that apply to one user agent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RobotsUserAgentBlock {
    pub user_agent: String,

    /// Document order
    pub directives: Vec<RobotsDirective>,
}

impl RobotsUserAgentBlock {
    pub fn new(user_agent: impl Into<String>, directives: Vec<RobotsDirective>) -> Self {
        Self {
            user_agent: user_agent.into(),
            directives,
        }
    }

    /// Values of all directives of the given type, in document order
    pub fn values_of(&self, directive_type: RobotsDirectiveType) -> impl Iterator<Item = &str> {
        self.directives
            .iter()
            .filter(move |d| d.directive_type == directive_type)
            .map(|d| d.value.as_str())
    }

    pub fn is_wildcard(&self) -> bool {
        self.user_agent == "*"
    }
}

/// Result of parsing a robots.txt document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedRobots {
    /// Blocks in the order they were closed
    pub user_agent_blocks: Vec<RobotsUserAgentBlock>,

    /// Path-based directives found before the first `User-agent` line
    pub orphaned_path_directives: Vec<RobotsDirective>,

    /// Diagnostics in line order
    pub issues: Vec<ParseIssue>,
}

impl ParsedRobots {
    pub fn new(
        user_agent_blocks: Vec<RobotsUserAgentBlock>,
        orphaned_path_directives: Vec<RobotsDirective>,
        issues: Vec<ParseIssue>,
    ) -> Self {
        Self {
            user_agent_blocks,
            orphaned_path_directives,
            issues,
        }
    }

    pub fn has_errors(&self) -> bool {
        self.issues.iter().any(ParseIssue::is_error)
    }

    pub fn has_warnings(&self) -> bool {
        self.issues.iter().any(ParseIssue::is_warning)
    }

    pub fn errors(&self) -> Vec<&ParseIssue> {
        self.issues_with(ParseIssueSeverity::Error)
    }

    pub fn warnings(&self) -> Vec<&ParseIssue> {
        self.issues_with(ParseIssueSeverity::Warning)
    }

    fn issues_with(&self, severity: ParseIssueSeverity) -> Vec<&ParseIssue> {
        self.issues
            .iter()
            .filter(|issue| issue.severity == severity)
            .collect()
    }

    /// True when the document produced no blocks, orphans or issues
    pub fn is_empty(&self) -> bool {
        self.user_agent_blocks.is_empty()
            && self.orphaned_path_directives.is_empty()
            && self.issues.is_empty()
    }

    /// Sitemap URLs, orphaned ones first, without duplicates
    pub fn sitemaps(&self) -> Vec<&str> {
        let mut sitemaps: Vec<&str> = Vec::new();

        let candidates = self.orphaned_path_directives.iter().chain(
            self.user_agent_blocks
                .iter()
                .flat_map(|block| block.directives.iter()),
        );

        for directive in candidates {
            if directive.directive_type == RobotsDirectiveType::Sitemap
                && !directive.value.is_empty()
                && !sitemaps.contains(&directive.value.as_str())
            {
                sitemaps.push(&directive.value);
            }
        }

        sitemaps
    }

    /// Blocks whose user agent matches `agent`, ignoring case
    pub fn blocks_for<'a>(
        &'a self,
        agent: &'a str,
    ) -> impl Iterator<Item = &'a RobotsUserAgentBlock> + 'a {
        self.user_agent_blocks
            .iter()
            .filter(move |block| block.user_agent.eq_ignore_ascii_case(agent))
    }
}
