//! Line-oriented robots.txt directive parser
//!
//! The parser never fails: malformed lines become [`ParseIssue`]s and the scan
//! carries on. Consecutive `User-agent` lines share the directives that follow
//! them, and a group is only emitted once it has at least one directive.

use std::borrow::Cow;
use std::fmt;

use tracing::{debug, trace};

use crate::directive::{RobotsDirective, RobotsDirectiveType};
use crate::events::{RobotsParsedEvent, UnknownDirectiveEvent};
use crate::issue::ParseIssue;
use crate::model::{ParsedRobots, RobotsUserAgentBlock};

const MISSING_COLON: &str = "Malformed line: missing colon separator";

type UnknownDirectiveHook<'h, C> =
    Box<dyn Fn(&mut UnknownDirectiveEvent<'_, C>) + Send + Sync + 'h>;
type ParsedHook<'h, C> = Box<dyn Fn(&mut RobotsParsedEvent<'_, C>) + Send + Sync + 'h>;

/// Parses robots.txt documents, optionally calling back into caller hooks.
///
/// `C` is an opaque context type handed through to the hooks untouched.
///
/// ```
/// use robotlens_core::RobotsDirectiveParser;
///
/// let parser = RobotsDirectiveParser::<()>::new()
///     .on_unknown_directive(|event| event.mark_handled());
///
/// let parsed = parser.parse("User-agent: *\nNoindex: /tmp\nDisallow: /admin", &(), None);
/// assert_eq!(parsed.user_agent_blocks.len(), 1);
/// assert!(parsed.issues.is_empty());
/// ```
pub struct RobotsDirectiveParser<'h, C: ?Sized = ()> {
    unknown_directive_hook: Option<UnknownDirectiveHook<'h, C>>,
    parsed_hook: Option<ParsedHook<'h, C>>,
}

impl<'h, C: ?Sized> RobotsDirectiveParser<'h, C> {
    pub fn new() -> Self {
        Self {
            unknown_directive_hook: None,
            parsed_hook: None,
        }
    }

    /// Called once per line whose directive type is not recognised
    pub fn on_unknown_directive<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut UnknownDirectiveEvent<'_, C>) + Send + Sync + 'h,
    {
        self.unknown_directive_hook = Some(Box::new(hook));
        self
    }

    /// Called once per parse with the finished result
    pub fn on_parsed<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut RobotsParsedEvent<'_, C>) + Send + Sync + 'h,
    {
        self.parsed_hook = Some(Box::new(hook));
        self
    }

    /// Parse a whole document.
    ///
    /// Lines are split on `\n`; use [`normalize_line_endings`] first for input
    /// that may use bare `\r` separators. `context` and `sales_channel_id` are
    /// only forwarded to the hooks.
    pub fn parse(&self, text: &str, context: &C, sales_channel_id: Option<&str>) -> ParsedRobots {
        let mut user_agent_blocks = Vec::new();
        let mut orphaned_path_directives = Vec::new();
        let mut issues = Vec::new();

        let mut open_agents: Vec<String> = Vec::new();
        let mut pending: Vec<RobotsDirective> = Vec::new();

        for (index, raw_line) in text.split('\n').enumerate() {
            let line_number = index + 1;
            let line = raw_line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            // Only the first colon separates; values such as URLs keep theirs
            let Some((directive, value)) = line.split_once(':') else {
                record(&mut issues, ParseIssue::error(MISSING_COLON, line_number, line));
                continue;
            };

            let directive = directive.trim();
            let value = value.trim();

            let Some(directive_type) = RobotsDirectiveType::try_from_insensitive(directive) else {
                let mut event = UnknownDirectiveEvent::new(
                    line_number,
                    line,
                    directive,
                    value,
                    !open_agents.is_empty(),
                    context,
                    sales_channel_id,
                );

                if let Some(hook) = &self.unknown_directive_hook {
                    hook(&mut event);
                }

                if let Some(issue) = event.into_outcome() {
                    record(&mut issues, issue);
                }
                continue;
            };

            if directive_type == RobotsDirectiveType::UserAgent {
                flush(&mut open_agents, &mut pending, &mut user_agent_blocks);
                open_agents.push(value.to_string());
                continue;
            }

            let directive = RobotsDirective::new(directive_type, value);

            if !open_agents.is_empty() {
                pending.push(directive);
            } else if directive_type.is_path_based() {
                orphaned_path_directives.push(directive);
            } else {
                record(
                    &mut issues,
                    ParseIssue::warning(
                        format!(
                            "Directive '{}' found outside user-agent block and will be ignored",
                            directive_type
                        ),
                        line_number,
                        line,
                    ),
                );
            }
        }

        flush(&mut open_agents, &mut pending, &mut user_agent_blocks);

        let parsed = ParsedRobots::new(user_agent_blocks, orphaned_path_directives, issues);

        debug!(
            blocks = parsed.user_agent_blocks.len(),
            orphaned = parsed.orphaned_path_directives.len(),
            issues = parsed.issues.len(),
            "parsed robots.txt"
        );

        match &self.parsed_hook {
            Some(hook) => {
                let mut event = RobotsParsedEvent::new(text, parsed, context, sales_channel_id);
                hook(&mut event);
                event.into_parsed()
            }
            None => parsed,
        }
    }
}

impl<C: ?Sized> Default for RobotsDirectiveParser<'_, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: ?Sized> fmt::Debug for RobotsDirectiveParser<'_, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RobotsDirectiveParser")
            .field("unknown_directive_hook", &self.unknown_directive_hook.is_some())
            .field("parsed_hook", &self.parsed_hook.is_some())
            .finish()
    }
}

/// Emit one block per open agent, but only once directives have accumulated
fn flush(
    open_agents: &mut Vec<String>,
    pending: &mut Vec<RobotsDirective>,
    blocks: &mut Vec<RobotsUserAgentBlock>,
) {
    if open_agents.is_empty() || pending.is_empty() {
        return;
    }

    debug!(agents = ?open_agents, directives = pending.len(), "closing user-agent group");

    for agent in open_agents.drain(..) {
        blocks.push(RobotsUserAgentBlock::new(agent, pending.clone()));
    }
    pending.clear();
}

fn record(issues: &mut Vec<ParseIssue>, issue: ParseIssue) {
    trace!(
        line = issue.line_number,
        severity = %issue.severity,
        reason = %issue.reason,
        "robots.txt issue"
    );
    issues.push(issue);
}

/// Parse with no hooks, no context and no sales channel
pub fn parse_robots(text: &str) -> ParsedRobots {
    RobotsDirectiveParser::<()>::new().parse(text, &(), None)
}

/// Convert `\r\n` and lone `\r` line endings to `\n`
pub fn normalize_line_endings(text: &str) -> Cow<'_, str> {
    if !text.contains('\r') {
        return Cow::Borrowed(text);
    }

    Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
}
