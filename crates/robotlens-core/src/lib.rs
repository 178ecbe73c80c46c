//! # robotlens-core
//!
//! Core library for turning robots.txt documents into a structured model.
//!
//! This library provides:
//! - A tolerant, single-pass directive parser that collects diagnostics
//!   instead of failing
//! - Hooks for handling unknown directives and post-processing results
//! - Crawler access analysis (AI crawlers, path checks)
//!
//! ## Features
//!
//! - `default`: Parsing and analysis, no network access
//! - `fetch`: Fetch robots.txt from a live site
//!
//! ## Example
//!
//! ```
//! use robotlens_core::{access, parse_robots};
//!
//! let parsed = parse_robots("User-agent: *\nDisallow: /admin/\nCrawl-delay 5");
//!
//! assert_eq!(parsed.user_agent_blocks.len(), 1);
//! assert!(parsed.has_errors());
//! assert!(!access::is_path_allowed(&parsed, "/admin/users", "GPTBot"));
//! ```

pub mod access;
pub mod directive;
pub mod events;
pub mod fetch;
pub mod issue;
pub mod model;
pub mod parser;

// Re-export commonly used types
pub use directive::{RobotsDirective, RobotsDirectiveType};
pub use events::{RobotsParsedEvent, UnknownDirectiveEvent};
pub use issue::{ParseIssue, ParseIssueSeverity};
pub use model::{ParsedRobots, RobotsUserAgentBlock};
pub use parser::{RobotsDirectiveParser, normalize_line_endings, parse_robots};

pub use fetch::{FetchedRobots, robots_url};

#[cfg(feature = "fetch")]
pub use fetch::fetch_robots_txt;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_realistic_document() {
        let content = r#"
# robots.txt for example.com
Sitemap: https://example.com/sitemap.xml

User-agent: GPTBot
User-agent: ClaudeBot
Disallow: /

User-agent: *
Disallow: /checkout/
Disallow: /account/
Allow: /account/login
Crawl-delay: 1
Noindex: /search
Request-rate 1/5
"#;

        let parsed = parse_robots(content);

        let agents: Vec<_> = parsed
            .user_agent_blocks
            .iter()
            .map(|b| b.user_agent.as_str())
            .collect();
        assert_eq!(agents, vec!["GPTBot", "ClaudeBot", "*"]);

        assert_eq!(
            parsed.orphaned_path_directives,
            vec![RobotsDirective::new(
                RobotsDirectiveType::Sitemap,
                "https://example.com/sitemap.xml"
            )]
        );
        assert_eq!(parsed.user_agent_blocks[2].directives.len(), 4);
        assert_eq!(parsed.sitemaps(), vec!["https://example.com/sitemap.xml"]);

        let lines: Vec<_> = parsed.issues.iter().map(|i| i.line_number).collect();
        assert_eq!(lines, vec![14, 15]);
        assert_eq!(parsed.warnings().len(), 1);
        assert_eq!(parsed.errors().len(), 1);

        assert_eq!(
            access::determine_access(&parsed, "ClaudeBot"),
            access::AccessLevel::Blocked
        );
        assert!(access::is_path_allowed(&parsed, "/account/login", "Bingbot"));
    }

    #[test]
    fn test_parsed_robots_serializes() {
        let parsed = parse_robots("User-agent: *\nDisallow: /tmp\nFoo: bar");
        let json = serde_json::to_value(&parsed).unwrap();

        assert_eq!(json["user_agent_blocks"][0]["user_agent"], "*");
        assert_eq!(
            json["user_agent_blocks"][0]["directives"][0]["type"],
            "Disallow"
        );
        assert_eq!(json["issues"][0]["severity"], "warning");

        let back: ParsedRobots = serde_json::from_value(json).unwrap();
        assert_eq!(back, parsed);
    }
}
