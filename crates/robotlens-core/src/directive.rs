//! Directive types recognised in robots.txt documents

use std::fmt;
use std::str::FromStr;

use anyhow::anyhow;
use serde::{Deserialize, Serialize};

/// Known robots.txt directive types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RobotsDirectiveType {
    /// Opens (or extends) a user-agent group
    #[serde(rename = "User-agent")]
    UserAgent,

    #[serde(rename = "Allow")]
    Allow,

    #[serde(rename = "Disallow")]
    Disallow,

    #[serde(rename = "Sitemap")]
    Sitemap,

    /// Seconds between requests
    #[serde(rename = "Crawl-delay")]
    CrawlDelay,

    /// Preferred mirror host (Yandex)
    #[serde(rename = "Host")]
    Host,

    /// Query parameters to ignore (Yandex)
    #[serde(rename = "Clean-param")]
    CleanParam,

    #[serde(rename = "Request-rate")]
    RequestRate,
}

impl RobotsDirectiveType {
    pub const ALL: [RobotsDirectiveType; 8] = [
        Self::UserAgent,
        Self::Allow,
        Self::Disallow,
        Self::Sitemap,
        Self::CrawlDelay,
        Self::Host,
        Self::CleanParam,
        Self::RequestRate,
    ];

    /// Resolve a directive token, ignoring case and surrounding whitespace.
    ///
    /// Returns `None` for anything that is not a known directive.
    pub fn try_from_insensitive(token: &str) -> Option<Self> {
        let normalized = token.trim().to_ascii_lowercase();

        match normalized.as_str() {
            "user-agent" => Some(Self::UserAgent),
            "allow" => Some(Self::Allow),
            "disallow" => Some(Self::Disallow),
            "sitemap" => Some(Self::Sitemap),
            "crawl-delay" => Some(Self::CrawlDelay),
            "host" => Some(Self::Host),
            "clean-param" => Some(Self::CleanParam),
            "request-rate" => Some(Self::RequestRate),
            _ => None,
        }
    }

    /// Whether the directive value denotes a URL path rather than a setting
    pub fn is_path_based(self) -> bool {
        matches!(self, Self::Allow | Self::Disallow | Self::Sitemap)
    }

    /// Canonical spelling as written in robots.txt files
    pub fn as_str(self) -> &'static str {
        match self {
            Self::UserAgent => "User-agent",
            Self::Allow => "Allow",
            Self::Disallow => "Disallow",
            Self::Sitemap => "Sitemap",
            Self::CrawlDelay => "Crawl-delay",
            Self::Host => "Host",
            Self::CleanParam => "Clean-param",
            Self::RequestRate => "Request-rate",
        }
    }
}

impl fmt::Display for RobotsDirectiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RobotsDirectiveType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from_insensitive(s).ok_or_else(|| anyhow!("unknown robots.txt directive: {s}"))
    }
}

/// A single `Type: value` instruction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RobotsDirective {
    #[serde(rename = "type")]
    pub directive_type: RobotsDirectiveType,
    pub value: String,
}

impl RobotsDirective {
    pub fn new(directive_type: RobotsDirectiveType, value: impl Into<String>) -> Self {
        Self {
            directive_type,
            value: value.into(),
        }
    }

    /// Parse one already extracted line into a path-based directive.
    ///
    /// Anything unparseable, unknown or not path-based yields `None`.
    #[deprecated(note = "use RobotsDirectiveParser::parse, which reports diagnostics")]
    pub fn parse_line(line: &str) -> Option<Self> {
        let (directive, value) = line.split_once(':')?;
        let directive_type = RobotsDirectiveType::try_from_insensitive(directive)?;

        if !directive_type.is_path_based() {
            return None;
        }

        Some(Self::new(directive_type, value.trim()))
    }
}

impl fmt::Display for RobotsDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.directive_type, self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_ignores_case_and_whitespace() {
        assert_eq!(
            RobotsDirectiveType::try_from_insensitive("  USER-AGENT "),
            Some(RobotsDirectiveType::UserAgent)
        );
        assert_eq!(
            RobotsDirectiveType::try_from_insensitive("crawl-Delay"),
            Some(RobotsDirectiveType::CrawlDelay)
        );
        assert_eq!(RobotsDirectiveType::try_from_insensitive("Foo"), None);
        assert_eq!(RobotsDirectiveType::try_from_insensitive(""), None);
    }

    #[test]
    fn test_canonical_names_resolve_to_themselves() {
        for directive_type in RobotsDirectiveType::ALL {
            assert_eq!(
                RobotsDirectiveType::try_from_insensitive(directive_type.as_str()),
                Some(directive_type)
            );
        }
    }

    #[test]
    fn test_path_based_table() {
        let path_based: Vec<_> = RobotsDirectiveType::ALL
            .into_iter()
            .filter(|t| t.is_path_based())
            .collect();

        assert_eq!(
            path_based,
            vec![
                RobotsDirectiveType::Allow,
                RobotsDirectiveType::Disallow,
                RobotsDirectiveType::Sitemap,
            ]
        );
    }

    #[test]
    fn test_from_str_rejects_unknown() {
        assert_eq!(
            "disallow".parse::<RobotsDirectiveType>().unwrap(),
            RobotsDirectiveType::Disallow
        );

        let err = "Noindex".parse::<RobotsDirectiveType>().unwrap_err();
        assert!(err.to_string().contains("Noindex"));
    }

    #[test]
    fn test_serializes_with_canonical_name() {
        let directive = RobotsDirective::new(RobotsDirectiveType::CrawlDelay, "10");
        let json = serde_json::to_value(&directive).unwrap();

        assert_eq!(json["type"], "Crawl-delay");
        assert_eq!(json["value"], "10");
    }

    #[test]
    #[allow(deprecated)]
    fn test_legacy_parse_line() {
        assert_eq!(
            RobotsDirective::parse_line("disallow: /admin"),
            Some(RobotsDirective::new(RobotsDirectiveType::Disallow, "/admin"))
        );
        assert_eq!(
            RobotsDirective::parse_line("Sitemap: https://example.com/sitemap.xml"),
            Some(RobotsDirective::new(
                RobotsDirectiveType::Sitemap,
                "https://example.com/sitemap.xml"
            ))
        );
        assert_eq!(RobotsDirective::parse_line("Crawl-delay: 5"), None);
        assert_eq!(RobotsDirective::parse_line("User-agent: *"), None);
        assert_eq!(RobotsDirective::parse_line("Foo: bar"), None);
        assert_eq!(RobotsDirective::parse_line("no colon here"), None);
    }
}
