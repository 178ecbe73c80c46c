//! Report building and rendering for the robotlens CLI
//!
//! Kept out of `main.rs` so it can be tested without running the binary.

use std::fmt::Write as FmtWrite;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use robotlens_core::access::{self, AccessLevel, CrawlerAccess};
use robotlens_core::{ParseIssue, ParsedRobots, RobotsUserAgentBlock};
use serde::Serialize;
use url::Url;

pub const APP_NAME: &str = "robotlens";

const DIVIDER: &str = "─────────────────────────────────────────────────────────────";
const LABEL_WIDTH: usize = 16;

/// Where the robots.txt document comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Stdin,
    Url(String),
    File(PathBuf),
}

impl Source {
    pub fn classify(input: &str) -> Self {
        if input == "-" {
            return Self::Stdin;
        }

        let lower = input.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Self::Url(input.to_string())
        } else {
            Self::File(PathBuf::from(input))
        }
    }

    pub fn label(&self) -> String {
        match self {
            Self::Stdin => "<stdin>".to_string(),
            Self::Url(url) => url.clone(),
            Self::File(path) => path.display().to_string(),
        }
    }
}

/// Whether `path` is allowed for `agent`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathVerdict {
    pub agent: String,
    pub path: String,
    pub allowed: bool,

    /// Agent group the decision came from, `None` when no rules apply
    pub matched_agent: Option<String>,
}

/// Everything the CLI prints
#[derive(Debug, Clone, Serialize)]
pub struct RobotsReport {
    pub source: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,

    pub parsed: ParsedRobots,

    pub sitemaps: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_crawlers: Option<Vec<CrawlerAccess>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub path_check: Option<PathVerdict>,
}

/// What to include beyond the parsed document
#[derive(Debug, Clone, Default)]
pub struct ReportOptions {
    pub ai_crawlers: bool,

    /// `(agent, path)` to check
    pub path_check: Option<(String, String)>,

    pub status_code: Option<u16>,
}

pub fn build_report(source: &str, parsed: ParsedRobots, options: &ReportOptions) -> RobotsReport {
    let sitemaps = parsed.sitemaps().into_iter().map(str::to_string).collect();

    let ai_crawlers = options
        .ai_crawlers
        .then(|| access::crawler_access(&parsed));

    let path_check = options.path_check.as_ref().map(|(agent, path)| PathVerdict {
        agent: agent.clone(),
        path: path.clone(),
        allowed: access::is_path_allowed(&parsed, path, agent),
        matched_agent: access::rules_for(&parsed, agent).map(|rules| rules.user_agent),
    });

    RobotsReport {
        source: source.to_string(),
        status_code: options.status_code,
        parsed,
        sitemaps,
        ai_crawlers,
        path_check,
    }
}

pub fn render_json(report: &RobotsReport) -> Result<String> {
    serde_json::to_string_pretty(report).context("failed to serialize report")
}

pub fn render_text(report: &RobotsReport) -> String {
    let mut output = String::new();
    let parsed = &report.parsed;

    push_section_header(&mut output, "🤖", &format!("robots.txt: {}", report.source));
    if let Some(status) = report.status_code {
        push_key_value(&mut output, "HTTP Status", &status.to_string());
    }
    push_key_value(
        &mut output,
        "User-agents",
        &parsed.user_agent_blocks.len().to_string(),
    );
    push_key_value(&mut output, "Errors", &parsed.errors().len().to_string());
    push_key_value(&mut output, "Warnings", &parsed.warnings().len().to_string());
    let _ = writeln!(&mut output);

    render_blocks(&mut output, &parsed.user_agent_blocks);

    if !parsed.orphaned_path_directives.is_empty() {
        push_section_header(&mut output, "📎", "Outside any user-agent group");
        for directive in &parsed.orphaned_path_directives {
            let _ = writeln!(&mut output, "  {directive}");
        }
        let _ = writeln!(&mut output);
    }

    if !report.sitemaps.is_empty() {
        push_section_header(&mut output, "🗺️", "Sitemaps");
        for sitemap in &report.sitemaps {
            let _ = writeln!(&mut output, "  • {sitemap}");
        }
        let _ = writeln!(&mut output);
    }

    render_issues(&mut output, &parsed.issues);

    if let Some(crawlers) = report.ai_crawlers.as_ref() {
        render_crawler_table(&mut output, crawlers);
    }

    if let Some(verdict) = report.path_check.as_ref() {
        push_section_header(&mut output, "🔎", "Path check");
        push_key_value(&mut output, "User-agent", &verdict.agent);
        push_key_value(&mut output, "Path", &verdict.path);
        push_key_value(
            &mut output,
            "Verdict",
            if verdict.allowed { "allowed" } else { "blocked" },
        );
        push_key_value(
            &mut output,
            "Matched group",
            verdict.matched_agent.as_deref().unwrap_or("none"),
        );
        let _ = writeln!(&mut output);
    }

    output
}

fn render_blocks(buf: &mut String, blocks: &[RobotsUserAgentBlock]) {
    push_section_header(buf, "📜", "User-agent groups");
    if blocks.is_empty() {
        let _ = writeln!(buf, "No user-agent groups found.");
    }
    for block in blocks {
        let _ = writeln!(buf, "User-agent: {}", block.user_agent);
        for directive in &block.directives {
            let _ = writeln!(buf, "  {directive}");
        }
    }
    let _ = writeln!(buf);
}

fn render_issues(buf: &mut String, issues: &[ParseIssue]) {
    if issues.is_empty() {
        return;
    }
    push_section_header(buf, "⚠️", "Issues");
    for issue in issues {
        let marker = if issue.is_error() { "✗" } else { "!" };
        let _ = writeln!(
            buf,
            "{marker} line {:>4}: {} ({})",
            issue.line_number, issue.reason, issue.line_content
        );
    }
    let _ = writeln!(buf);
}

fn render_crawler_table(buf: &mut String, crawlers: &[CrawlerAccess]) {
    push_section_header(buf, "🧠", "AI crawler access");
    let _ = writeln!(buf, "| Crawler | Access | Rules |");
    let _ = writeln!(buf, "|---|---|---|");
    for crawler in crawlers {
        let _ = writeln!(
            buf,
            "| {} | {} {} | {} |",
            crawler.name,
            access_icon(crawler.access),
            access_label(crawler.access),
            crawler.applicable_rules.as_deref().unwrap_or("-")
        );
    }
    let _ = writeln!(buf);
}

fn access_icon(access: AccessLevel) -> &'static str {
    match access {
        AccessLevel::Allowed => "✅",
        AccessLevel::Partial => "⚠️",
        AccessLevel::Blocked => "⛔",
        AccessLevel::Default => "➖",
    }
}

fn access_label(access: AccessLevel) -> &'static str {
    match access {
        AccessLevel::Allowed => "allowed",
        AccessLevel::Partial => "partial",
        AccessLevel::Blocked => "blocked",
        AccessLevel::Default => "default",
    }
}

fn push_section_header(buf: &mut String, icon: &str, title: &str) {
    let _ = writeln!(buf, "{DIVIDER}");
    let _ = writeln!(buf, "{icon} {title}");
    let _ = writeln!(buf, "{DIVIDER}");
}

fn push_key_value(buf: &mut String, label: &str, value: &str) {
    if value.is_empty() {
        return;
    }
    let _ = writeln!(buf, "• {:<width$} : {}", label, value, width = LABEL_WIDTH);
}

/// Resolve where `--save` writes: a path with an extension is used as-is,
/// anything else is treated as a directory.
pub fn build_output_path(base: &Path, source: &Source, extension: &str) -> PathBuf {
    if base.extension().is_some() {
        base.to_path_buf()
    } else {
        base.join(derive_output_filename(source, extension))
    }
}

fn derive_output_filename(source: &Source, extension: &str) -> String {
    let stem = match source {
        Source::Stdin => "stdin".to_string(),
        Source::Url(raw) => Url::parse(raw)
            .ok()
            .and_then(|url| url.host_str().map(sanitize_for_filename))
            .unwrap_or_else(|| "site".to_string()),
        Source::File(path) => path
            .file_stem()
            .map(|stem| sanitize_for_filename(&stem.to_string_lossy()))
            .unwrap_or_else(|| "robots".to_string()),
    };

    format!("{stem}__robots.{extension}")
}

fn sanitize_for_filename(input: &str) -> String {
    input
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
