//! Crawler access analysis on top of a parsed robots.txt
//!
//! Flattens the user-agent blocks that apply to a crawler into [`AgentRules`]
//! and answers what that crawler may fetch, with special focus on AI crawlers
//! (GPTBot, ClaudeBot, etc.)

use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::directive::RobotsDirectiveType;
use crate::model::{ParsedRobots, RobotsUserAgentBlock};

/// Known AI crawler user agents
pub const AI_CRAWLERS: &[&str] = &[
    "GPTBot",          // OpenAI ChatGPT
    "ChatGPT-User",    // OpenAI ChatGPT browsing
    "OAI-SearchBot",   // OpenAI search
    "ClaudeBot",       // Anthropic Claude
    "Claude-Web",      // Anthropic Claude web
    "anthropic-ai",    // Anthropic general
    "Google-Extended", // Google Gemini
    "Bingbot",         // Microsoft Bing
    "Applebot",        // Apple Siri
    "PerplexityBot",   // Perplexity AI
    "CCBot",           // Common Crawl
    "YouBot",          // You.com AI
];

/// Merged rules from every block that applies to one user agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentRules {
    /// Agent name of the matched blocks, `*` when falling back
    pub user_agent: String,

    /// Disallowed path patterns, empty values dropped
    pub disallow: Vec<String>,

    /// Explicitly allowed path patterns
    pub allow: Vec<String>,

    /// Crawl delay in seconds
    pub crawl_delay: Option<f64>,

    /// Whether this blocks the entire site
    pub blocks_all: bool,

    /// Whether the rules came from the `*` group
    pub via_wildcard: bool,
}

/// Status for a specific crawler
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrawlerAccess {
    pub name: String,

    pub access: AccessLevel,

    /// Human readable summary of the rules that apply
    pub applicable_rules: Option<String>,
}

/// Access level for a crawler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessLevel {
    /// Full access to site
    Allowed,

    /// Partially blocked (some paths disallowed)
    Partial,

    /// Fully blocked
    Blocked,

    /// No specific rules (inherits from *)
    Default,
}

/// Rules applying to `agent`: its own blocks if any, else the `*` blocks
pub fn rules_for(parsed: &ParsedRobots, agent: &str) -> Option<AgentRules> {
    let own: Vec<&RobotsUserAgentBlock> = parsed.blocks_for(agent).collect();

    if !own.is_empty() {
        return Some(merge_blocks(&own, false));
    }

    let wildcard: Vec<&RobotsUserAgentBlock> = parsed.blocks_for("*").collect();
    if wildcard.is_empty() {
        None
    } else {
        Some(merge_blocks(&wildcard, true))
    }
}

fn merge_blocks(blocks: &[&RobotsUserAgentBlock], via_wildcard: bool) -> AgentRules {
    let mut rules = AgentRules {
        user_agent: blocks[0].user_agent.clone(),
        disallow: Vec::new(),
        allow: Vec::new(),
        crawl_delay: None,
        blocks_all: false,
        via_wildcard,
    };

    for directive in blocks.iter().flat_map(|block| block.directives.iter()) {
        let value = directive.value.as_str();

        match directive.directive_type {
            RobotsDirectiveType::Disallow if !value.is_empty() => {
                rules.disallow.push(value.to_string());
                if value == "/" {
                    rules.blocks_all = true;
                }
            }
            RobotsDirectiveType::Allow if !value.is_empty() => {
                rules.allow.push(value.to_string());
            }
            RobotsDirectiveType::CrawlDelay => {
                if let Ok(delay) = value.parse::<f64>() {
                    rules.crawl_delay = Some(delay);
                }
            }
            _ => {}
        }
    }

    rules
}

/// Determine access level for a specific crawler
pub fn determine_access(parsed: &ParsedRobots, agent: &str) -> AccessLevel {
    let Some(rules) = rules_for(parsed, agent) else {
        return AccessLevel::Default;
    };

    if rules.blocks_all {
        return AccessLevel::Blocked;
    }
    if !rules.disallow.is_empty() {
        return AccessLevel::Partial;
    }
    if rules.via_wildcard {
        AccessLevel::Default
    } else {
        AccessLevel::Allowed
    }
}

/// Analyze access for known AI crawlers
pub fn crawler_access(parsed: &ParsedRobots) -> Vec<CrawlerAccess> {
    AI_CRAWLERS
        .iter()
        .map(|crawler| CrawlerAccess {
            name: crawler.to_string(),
            access: determine_access(parsed, crawler),
            applicable_rules: rules_for(parsed, crawler).map(|rules| format_rules(&rules)),
        })
        .collect()
}

/// Format rules into human-readable string
pub fn format_rules(rules: &AgentRules) -> String {
    let agent = if rules.via_wildcard {
        "* (all bots)"
    } else {
        rules.user_agent.as_str()
    };
    let mut parts = vec![format!("User-agent: {}", agent)];

    if rules.blocks_all {
        parts.push("Disallow: / (FULL BLOCK)".to_string());
    } else {
        for path in &rules.disallow {
            parts.push(format!("Disallow: {}", path));
        }
        for path in &rules.allow {
            parts.push(format!("Allow: {}", path));
        }
    }

    if let Some(delay) = rules.crawl_delay {
        parts.push(format!("Crawl-delay: {}s", delay));
    }

    parts.join("; ")
}

/// Check if a specific path is allowed for a user agent.
///
/// The longest matching pattern wins; on a tie `Allow` beats `Disallow`.
/// Patterns may use `*` wildcards and a trailing `$` anchor.
pub fn is_path_allowed(parsed: &ParsedRobots, path: &str, agent: &str) -> bool {
    let Some(rules) = rules_for(parsed, agent) else {
        return true; // Default is allowed
    };

    let allow = longest_match(&rules.allow, path);
    let disallow = longest_match(&rules.disallow, path);

    match (allow, disallow) {
        (_, None) => true,
        (None, Some(_)) => false,
        (Some(allow), Some(disallow)) => allow >= disallow,
    }
}

fn longest_match(patterns: &[String], path: &str) -> Option<usize> {
    patterns
        .iter()
        .filter(|pattern| pattern_matches(pattern, path))
        .map(|pattern| pattern.len())
        .max()
}

fn pattern_matches(pattern: &str, path: &str) -> bool {
    if !pattern.contains('*') && !pattern.ends_with('$') {
        return path.starts_with(pattern);
    }

    match pattern_regex(pattern) {
        Ok(regex) => regex.is_match(path),
        Err(err) => {
            warn!(%pattern, error = %err, "skipping unusable robots.txt pattern");
            false
        }
    }
}

fn pattern_regex(pattern: &str) -> Result<Regex> {
    let (body, anchored) = match pattern.strip_suffix('$') {
        Some(body) => (body, true),
        None => (pattern, false),
    };

    let mut expression = String::from("^");
    expression.push_str(
        &body
            .split('*')
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join(".*"),
    );
    if anchored {
        expression.push('$');
    }

    Regex::new(&expression).with_context(|| format!("Failed to create regex for {pattern}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_robots;

    fn access_of<'a>(statuses: &'a [CrawlerAccess], name: &str) -> &'a CrawlerAccess {
        statuses.iter().find(|s| s.name == name).unwrap()
    }

    #[test]
    fn test_parse_ai_crawler_block() {
        let content = r#"
User-agent: *
Disallow:

User-agent: GPTBot
Disallow: /
"#;

        let parsed = parse_robots(content);
        let statuses = crawler_access(&parsed);

        assert_eq!(statuses.len(), AI_CRAWLERS.len());
        assert_eq!(access_of(&statuses, "GPTBot").access, AccessLevel::Blocked);
        assert_eq!(access_of(&statuses, "ClaudeBot").access, AccessLevel::Default);
        assert_eq!(
            access_of(&statuses, "GPTBot").applicable_rules.as_deref(),
            Some("User-agent: GPTBot; Disallow: / (FULL BLOCK)")
        );
    }

    #[test]
    fn test_access_levels() {
        let content = r#"
User-agent: ClaudeBot
Allow: /

User-agent: PerplexityBot
Disallow: /private/
Crawl-delay: 2.5

User-agent: *
Disallow: /admin/
"#;

        let parsed = parse_robots(content);

        assert_eq!(determine_access(&parsed, "ClaudeBot"), AccessLevel::Allowed);
        assert_eq!(determine_access(&parsed, "perplexitybot"), AccessLevel::Partial);
        assert_eq!(determine_access(&parsed, "CCBot"), AccessLevel::Partial);

        let rules = rules_for(&parsed, "PerplexityBot").unwrap();
        assert_eq!(rules.crawl_delay, Some(2.5));
        assert!(!rules.via_wildcard);

        let fallback = rules_for(&parsed, "CCBot").unwrap();
        assert!(fallback.via_wildcard);
        assert_eq!(
            format_rules(&fallback),
            "User-agent: * (all bots); Disallow: /admin/"
        );
    }

    #[test]
    fn test_no_rules_is_default() {
        let parsed = parse_robots("Sitemap: https://example.com/sitemap.xml");

        assert_eq!(determine_access(&parsed, "GPTBot"), AccessLevel::Default);
        assert!(rules_for(&parsed, "GPTBot").is_none());
        assert!(is_path_allowed(&parsed, "/anything", "GPTBot"));
    }

    #[test]
    fn test_rules_merge_across_blocks() {
        let content = "User-agent: GPTBot\nDisallow: /a\nUser-agent: Bingbot\nDisallow: /c\nUser-agent: gptbot\nDisallow: /b";

        let rules = rules_for(&parse_robots(content), "GPTBot").unwrap();
        assert_eq!(rules.disallow, vec!["/a", "/b"]);
    }

    #[test]
    fn test_is_path_allowed() {
        let content = r#"
User-agent: *
Disallow: /admin/
Allow: /admin/public/
"#;

        let parsed = parse_robots(content);

        assert!(is_path_allowed(&parsed, "/", "*"));
        assert!(!is_path_allowed(&parsed, "/admin/secret", "*"));
        assert!(is_path_allowed(&parsed, "/admin/public/doc.html", "*"));
        assert!(!is_path_allowed(&parsed, "/admin/secret", "SomeBot"));
    }

    #[test]
    fn test_wildcards_and_anchor() {
        let content = r#"
User-agent: *
Disallow: /*.pdf$
Disallow: /search*q=
Allow: /search/help
"#;

        let parsed = parse_robots(content);

        assert!(!is_path_allowed(&parsed, "/files/report.pdf", "bot"));
        assert!(is_path_allowed(&parsed, "/files/report.pdf?download=1", "bot"));
        assert!(!is_path_allowed(&parsed, "/search?q=shoes", "bot"));
        assert!(is_path_allowed(&parsed, "/search/help", "bot"));
        assert!(is_path_allowed(&parsed, "/catalog", "bot"));
    }

    #[test]
    fn test_longest_match_wins_and_allow_breaks_ties() {
        let content = "User-agent: *\nAllow: /shop\nDisallow: /shop/cart\nAllow: /page\nDisallow: /page";

        let parsed = parse_robots(content);

        assert!(is_path_allowed(&parsed, "/shop/list", "bot"));
        assert!(!is_path_allowed(&parsed, "/shop/cart/1", "bot"));
        assert!(is_path_allowed(&parsed, "/page", "bot"));
    }

    #[test]
    fn test_empty_disallow_allows_everything() {
        let parsed = parse_robots("User-agent: *\nDisallow:");

        assert!(is_path_allowed(&parsed, "/admin", "bot"));
        assert_eq!(determine_access(&parsed, "bot"), AccessLevel::Default);
    }

    #[test]
    fn test_access_level_serializes_lowercase() {
        let json = serde_json::to_string(&AccessLevel::Partial).unwrap();
        assert_eq!(json, "\"partial\"");
    }
}
