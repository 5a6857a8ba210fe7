//! Line-oriented parser for exported chat transcripts.
//!
//! Exports put one message per line, prefixed with a date, a time and the
//! sender. Lines without that prefix continue the previous message. Date and
//! time layouts vary with the exporting device's locale, so timestamps are
//! normalized against an ordered list of layouts and kept raw when none fits.

use chrono::NaiveDateTime;
use regex::Regex;
use tracing::{debug, warn};
use unicode_normalization::UnicodeNormalization;

use crate::error::Result;
use crate::models::{MessageTimestamp, ParsedMessage, SYSTEM_SENDER};

const MESSAGE_START_PATTERN: &str = r"^(?P<date>\d{1,2}[/\-]\d{1,2}[/\-]\d{2,4}|\d{4}-\d{1,2}-\d{1,2}),?\s*(?P<time>\d{1,2}:\d{2}(?::\d{2})?(?:\s*[APMapm]{2})?)\s*-\s*(?P<sender>[^:]+?):\s*(?P<message>.*)";

/// Some exports start with a UTF-8 byte order mark
const BYTE_ORDER_MARK: char = '\u{FEFF}';

/// Sender names the chat application uses for its own notices
const SYSTEM_ALIASES: [&str; 3] = ["system", "you", "group notification"];

/// Body fragments that identify group-management notices
const SYSTEM_ACTION_KEYWORDS: [&str; 5] = ["secured", "created group", "changed", "left group", "added"];

/// Width of the year token a timestamp layout expects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YearWidth {
    /// `2024`
    Four,
    /// `24`
    Two,
}

/// One accepted `"date, time"` layout
#[derive(Debug, Clone, Copy)]
pub struct TimestampFormat {
    /// `chrono` format string
    pub pattern: &'static str,
    /// Year width the date part must have for this layout to apply
    pub year_width: YearWidth,
}

const fn layout(pattern: &'static str, year_width: YearWidth) -> TimestampFormat {
    TimestampFormat { pattern, year_width }
}

/// Accepted timestamp layouts, tried in order
pub const TIMESTAMP_FORMATS: [TimestampFormat; 12] = [
    layout("%m/%d/%Y, %I:%M %p", YearWidth::Four),
    layout("%m/%d/%y, %I:%M %p", YearWidth::Two),
    layout("%m/%d/%Y, %I:%M:%S %p", YearWidth::Four),
    layout("%m/%d/%y, %I:%M:%S %p", YearWidth::Two),
    layout("%d/%m/%Y, %H:%M", YearWidth::Four),
    layout("%d/%m/%y, %H:%M", YearWidth::Two),
    layout("%d/%m/%Y, %H:%M:%S", YearWidth::Four),
    layout("%Y-%m-%d, %H:%M", YearWidth::Four),
    layout("%Y-%m-%d, %H:%M:%S", YearWidth::Four),
    layout("%m/%d/%Y, %H:%M", YearWidth::Four),
    layout("%m-%d-%Y, %I:%M %p", YearWidth::Four),
    layout("%d-%m-%Y, %H:%M", YearWidth::Four),
];

/// Messages recovered from an export plus the lines that could not be placed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseOutcome {
    /// Messages in export order
    pub messages: Vec<ParsedMessage>,
    /// Non-blank lines seen before the first message start
    pub failed_lines: Vec<String>,
}

impl ParseOutcome {
    /// Messages whose timestamp kept its raw form
    #[must_use]
    pub fn unparsed_timestamps(&self) -> usize {
        self.messages.iter().filter(|m| m.timestamp.is_unparsed()).count()
    }
}

/// Parser for chat export text
#[derive(Debug, Clone)]
pub struct ChatParser {
    start_regex: Regex,
    clock_regex: Regex,
}

impl ChatParser {
    /// Create a new parser
    pub fn new() -> Result<Self> {
        let start_regex = Regex::new(MESSAGE_START_PATTERN)?;
        let clock_regex = Regex::new(r"^(?P<clock>\d{1,2}:\d{2}(?::\d{2})?)\s*(?P<meridiem>[APMapm]{2})?$")?;

        Ok(Self {
            start_regex,
            clock_regex,
        })
    }

    /// Parse a whole export
    ///
    /// Blank lines are skipped. A line matching the message-start layout opens
    /// a new message; any other line is appended to the previous message, or
    /// recorded in `failed_lines` when no message has started yet.
    #[must_use]
    pub fn parse(&self, content: &str) -> ParseOutcome {
        let mut outcome = ParseOutcome::default();
        let content = content.strip_prefix(BYTE_ORDER_MARK).unwrap_or(content);

        for line in content.lines() {
            if line.trim().is_empty() {
                continue;
            }

            if let Some(message) = self.parse_start_line(line) {
                outcome.messages.push(message);
            } else if let Some(previous) = outcome.messages.last_mut() {
                previous.message.push('\n');
                previous.message.push_str(line.trim());
            } else {
                outcome.failed_lines.push(line.to_string());
            }
        }

        if !outcome.failed_lines.is_empty() {
            warn!(
                failed_lines = outcome.failed_lines.len(),
                "Lines before the first message could not be parsed"
            );
        }
        debug!(
            messages = outcome.messages.len(),
            unparsed_timestamps = outcome.unparsed_timestamps(),
            "Parsed chat export"
        );

        outcome
    }

    /// Parse a single message-start line
    #[must_use]
    pub fn parse_start_line(&self, line: &str) -> Option<ParsedMessage> {
        let captures = self.start_regex.captures(line)?;
        let date = captures.name("date")?.as_str();
        let time = captures.name("time")?.as_str();
        let raw_sender = captures.name("sender")?.as_str();
        let body = captures.name("message").map_or("", |m| m.as_str()).trim();

        let mut sender = normalize_sender(raw_sender);
        if is_system_message(&sender, body) {
            sender = SYSTEM_SENDER.to_string();
        }

        Some(ParsedMessage {
            timestamp: self.normalize_timestamp(date, time),
            raw_timestamp: format!("{date}, {time}"),
            sender,
            message: body.to_string(),
        })
    }

    /// Normalize a date and time token pair
    ///
    /// Returns [`MessageTimestamp::Unparsed`] carrying `"date, time"` when no
    /// layout fits.
    #[must_use]
    pub fn normalize_timestamp(&self, date: &str, time: &str) -> MessageTimestamp {
        let raw = format!("{date}, {time}");
        let Some(width) = year_width(date) else {
            return MessageTimestamp::Unparsed(raw);
        };

        let clock = self.normalize_clock(time.trim());
        let candidate = format!("{date}, {clock}");

        TIMESTAMP_FORMATS
            .iter()
            .filter(|format| format.year_width == width)
            .find_map(|format| NaiveDateTime::parse_from_str(&candidate, format.pattern).ok())
            .map_or(MessageTimestamp::Unparsed(raw), MessageTimestamp::Parsed)
    }

    /// Rewrite `10:30pm`, `10:30 PM` and `10:30\u{202f}PM` as `10:30 PM`
    fn normalize_clock(&self, time: &str) -> String {
        match self.clock_regex.captures(time) {
            Some(captures) => {
                let clock = captures.name("clock").map_or("", |m| m.as_str());
                match captures.name("meridiem") {
                    Some(meridiem) => format!("{clock} {}", meridiem.as_str().to_uppercase()),
                    None => clock.to_string(),
                }
            }
            None => time.to_string(),
        }
    }
}

/// Width of the year token in a date, if it is one we have layouts for
fn year_width(date: &str) -> Option<YearWidth> {
    let parts: Vec<&str> = date.split(['/', '-']).collect();
    let year = if parts.first().is_some_and(|p| p.chars().count() == 4) {
        parts.first()?
    } else {
        parts.last()?
    };

    match year.chars().count() {
        4 => Some(YearWidth::Four),
        2 => Some(YearWidth::Two),
        _ => None,
    }
}

/// Zero-width and bidi marks that exports sprinkle around names
const fn is_format_char(c: char) -> bool {
    matches!(c, '\u{00AD}' | '\u{200B}'..='\u{200F}' | '\u{202A}'..='\u{202E}' | '\u{2060}'..='\u{2064}' | '\u{FEFF}')
}

/// Keep printable characters, NFC-normalize and trim
#[must_use]
pub fn normalize_sender(raw: &str) -> String {
    let printable: String = raw
        .chars()
        .filter(|c| *c == ' ' || !(c.is_control() || c.is_whitespace() || is_format_char(*c)))
        .collect();

    printable.nfc().collect::<String>().trim().to_string()
}

/// True for application notices rather than participant messages
#[must_use]
pub fn is_system_message(sender: &str, body: &str) -> bool {
    let sender = sender.to_lowercase();
    if SYSTEM_ALIASES.contains(&sender.as_str()) {
        return true;
    }

    let body = body.to_lowercase();
    SYSTEM_ACTION_KEYWORDS.iter().any(|keyword| body.contains(keyword))
}
