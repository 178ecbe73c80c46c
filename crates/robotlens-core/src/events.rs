//! Extension points invoked by [`RobotsDirectiveParser`](crate::RobotsDirectiveParser)
//!
//! Callers register plain closures on the parser. Each closure receives a
//! mutable event it may inspect and change:
//!
//! - [`UnknownDirectiveEvent`] fires once per line whose directive type is not
//!   recognised. Marking it handled suppresses the diagnostic; setting an issue
//!   replaces the default warning.
//! - [`RobotsParsedEvent`] fires once per parse with the finished result, which
//!   the hook may edit or replace wholesale.

use crate::issue::ParseIssue;
use crate::model::ParsedRobots;

/// Raised for a directive the parser does not know
#[derive(Debug)]
pub struct UnknownDirectiveEvent<'a, C: ?Sized = ()> {
    line_number: usize,
    line: &'a str,
    directive: &'a str,
    value: &'a str,
    inside_user_agent_block: bool,
    context: &'a C,
    sales_channel_id: Option<&'a str>,
    handled: bool,
    issue: Option<ParseIssue>,
}

impl<'a, C: ?Sized> UnknownDirectiveEvent<'a, C> {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        line_number: usize,
        line: &'a str,
        directive: &'a str,
        value: &'a str,
        inside_user_agent_block: bool,
        context: &'a C,
        sales_channel_id: Option<&'a str>,
    ) -> Self {
        Self {
            line_number,
            line,
            directive,
            value,
            inside_user_agent_block,
            context,
            sales_channel_id,
            handled: false,
            issue: None,
        }
    }

    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// The trimmed line
    pub fn line(&self) -> &'a str {
        self.line
    }

    /// Directive token as written, trimmed
    pub fn directive(&self) -> &'a str {
        self.directive
    }

    pub fn value(&self) -> &'a str {
        self.value
    }

    /// Whether a `User-agent` group was open when the line was reached
    pub fn inside_user_agent_block(&self) -> bool {
        self.inside_user_agent_block
    }

    pub fn context(&self) -> &'a C {
        self.context
    }

    pub fn sales_channel_id(&self) -> Option<&'a str> {
        self.sales_channel_id
    }

    /// Suppress any diagnostic for this line
    pub fn mark_handled(&mut self) {
        self.handled = true;
    }

    pub fn is_handled(&self) -> bool {
        self.handled
    }

    /// Record `issue` instead of the default warning
    pub fn set_issue(&mut self, issue: ParseIssue) {
        self.issue = Some(issue);
    }

    pub fn issue(&self) -> Option<&ParseIssue> {
        self.issue.as_ref()
    }

    /// What the parser should record once the hook has run
    pub(crate) fn into_outcome(self) -> Option<ParseIssue> {
        if self.handled {
            return None;
        }

        Some(self.issue.unwrap_or_else(|| {
            ParseIssue::warning(
                format!("Unknown directive type: '{}'", self.directive),
                self.line_number,
                self.line,
            )
        }))
    }
}

/// Raised after a document has been parsed
#[derive(Debug)]
pub struct RobotsParsedEvent<'a, C: ?Sized = ()> {
    text: &'a str,
    parsed: ParsedRobots,
    context: &'a C,
    sales_channel_id: Option<&'a str>,
}

impl<'a, C: ?Sized> RobotsParsedEvent<'a, C> {
    pub(crate) fn new(
        text: &'a str,
        parsed: ParsedRobots,
        context: &'a C,
        sales_channel_id: Option<&'a str>,
    ) -> Self {
        Self {
            text,
            parsed,
            context,
            sales_channel_id,
        }
    }

    /// The document exactly as handed to the parser
    pub fn text(&self) -> &'a str {
        self.text
    }

    pub fn parsed(&self) -> &ParsedRobots {
        &self.parsed
    }

    pub fn parsed_mut(&mut self) -> &mut ParsedRobots {
        &mut self.parsed
    }

    /// Swap in a different result, returning the previous one
    pub fn replace_parsed(&mut self, parsed: ParsedRobots) -> ParsedRobots {
        std::mem::replace(&mut self.parsed, parsed)
    }

    pub fn context(&self) -> &'a C {
        self.context
    }

    pub fn sales_channel_id(&self) -> Option<&'a str> {
        self.sales_channel_id
    }

    pub(crate) fn into_parsed(self) -> ParsedRobots {
        self.parsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issue::ParseIssueSeverity;

    fn event(context: &()) -> UnknownDirectiveEvent<'_> {
        UnknownDirectiveEvent::new(4, "Noindex: /x", "Noindex", "/x", true, context, Some("sc-1"))
    }

    #[test]
    fn test_unknown_event_defaults_to_warning() {
        let issue = event(&()).into_outcome().unwrap();

        assert_eq!(issue.severity, ParseIssueSeverity::Warning);
        assert_eq!(issue.reason, "Unknown directive type: 'Noindex'");
        assert_eq!(issue.line_number, 4);
        assert_eq!(issue.line_content, "Noindex: /x");
    }

    #[test]
    fn test_unknown_event_custom_issue() {
        let mut event = event(&());
        event.set_issue(ParseIssue::error("Noindex is not supported", 4, "Noindex: /x"));

        assert_eq!(event.issue().map(|i| i.severity), Some(ParseIssueSeverity::Error));
        let issue = event.into_outcome().unwrap();
        assert_eq!(issue.reason, "Noindex is not supported");
    }

    #[test]
    fn test_handled_wins_over_custom_issue() {
        let mut event = event(&());
        event.set_issue(ParseIssue::error("ignored", 4, "Noindex: /x"));
        event.mark_handled();

        assert!(event.is_handled());
        assert!(event.into_outcome().is_none());
    }

    #[test]
    fn test_accessors() {
        let event = event(&());

        assert_eq!(event.line_number(), 4);
        assert_eq!(event.directive(), "Noindex");
        assert_eq!(event.value(), "/x");
        assert!(event.inside_user_agent_block());
        assert_eq!(event.sales_channel_id(), Some("sc-1"));
    }

    #[test]
    fn test_parsed_event_replace() {
        let mut event = RobotsParsedEvent::new("", ParsedRobots::default(), &(), None);
        let replacement = ParsedRobots::new(
            Vec::new(),
            Vec::new(),
            vec![ParseIssue::warning("injected", 1, "")],
        );

        let previous = event.replace_parsed(replacement.clone());

        assert!(previous.is_empty());
        assert_eq!(event.parsed(), &replacement);
        assert_eq!(event.into_parsed(), replacement);
    }
}
