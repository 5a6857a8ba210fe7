//! Data models for parsed and analyzed chat messages
//!
//! This module contains all data structures used throughout the application,
//! from the parser's raw message records to the per-run analysis result.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Name given to messages emitted by the chat application itself
pub const SYSTEM_SENDER: &str = "System";

/// Point in time of a message, as far as the export allowed recovering it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageTimestamp {
    /// Timestamp matched one of the known export formats
    Parsed(NaiveDateTime),
    /// No known format matched; the raw `"date, time"` string is kept
    Unparsed(String),
}

impl MessageTimestamp {
    /// Returns the parsed date-time, if any
    #[must_use]
    pub const fn parsed(&self) -> Option<&NaiveDateTime> {
        match self {
            Self::Parsed(dt) => Some(dt),
            Self::Unparsed(_) => None,
        }
    }

    /// True when normalization failed
    #[must_use]
    pub const fn is_unparsed(&self) -> bool {
        matches!(self, Self::Unparsed(_))
    }
}

impl fmt::Display for MessageTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parsed(dt) => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S")),
            Self::Unparsed(raw) => f.write_str(raw),
        }
    }
}

/// A single message recovered from a chat export
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedMessage {
    /// Normalized timestamp, or the raw string when normalization failed
    pub timestamp: MessageTimestamp,
    /// The original `"date, time"` substring
    pub raw_timestamp: String,
    /// Display name of the sender, or [`SYSTEM_SENDER`]
    pub sender: String,
    /// Message body, continuation lines joined with `\n`
    pub message: String,
}

/// Three-way sentiment label
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SentimentLabel {
    /// Positive sentiment
    Positive,
    /// Negative sentiment
    Negative,
    /// Neutral sentiment
    Neutral,
}

impl SentimentLabel {
    /// String form used in exports and explanations
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "Positive",
            Self::Negative => "Negative",
            Self::Neutral => "Neutral",
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Score boundaries that turn a score into a [`SentimentLabel`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabelThresholds {
    /// Scores at (or above) this value are positive
    pub positive: f64,
    /// Scores at (or below) this value are negative
    pub negative: f64,
    /// Whether the boundaries themselves belong to the polar labels
    pub inclusive: bool,
}

impl LabelThresholds {
    /// `>= 0.05` positive, `<= -0.05` negative
    pub const COMPOUND: Self = Self {
        positive: 0.05,
        negative: -0.05,
        inclusive: true,
    };

    /// `> 0.1` positive, `< -0.1` negative
    pub const POLARITY: Self = Self {
        positive: 0.1,
        negative: -0.1,
        inclusive: false,
    };

    /// Label a score
    #[must_use]
    pub fn label(&self, score: f64) -> SentimentLabel {
        let (is_positive, is_negative) = if self.inclusive {
            (score >= self.positive, score <= self.negative)
        } else {
            (score > self.positive, score < self.negative)
        };

        if is_positive {
            SentimentLabel::Positive
        } else if is_negative {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        }
    }
}

/// Output of a single sentiment scorer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentResult {
    /// Score in `[-1.0, 1.0]`
    pub score: f64,
    /// Label derived from the score
    pub label: SentimentLabel,
}

impl SentimentResult {
    /// Zero score, neutral label
    #[must_use]
    pub const fn neutral() -> Self {
        Self {
            score: 0.0,
            label: SentimentLabel::Neutral,
        }
    }

    /// Clamp a raw score into range and label it
    #[must_use]
    pub fn from_score(score: f64, thresholds: &LabelThresholds) -> Self {
        let score = if score.is_finite() { score.clamp(-1.0, 1.0) } else { 0.0 };
        Self {
            score,
            label: thresholds.label(score),
        }
    }
}

/// What happened when a scorer was asked about a message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ScorerOutcome {
    /// The scorer returned a result
    Scored(SentimentResult),
    /// The scorer failed; it contributes a neutral zero
    Degraded {
        /// Why the scorer could not be used
        reason: String,
    },
}

impl ScorerOutcome {
    /// The usable result, neutral when degraded
    #[must_use]
    pub const fn result(&self) -> SentimentResult {
        match self {
            Self::Scored(result) => *result,
            Self::Degraded { .. } => SentimentResult::neutral(),
        }
    }

    /// True when the scorer failed
    #[must_use]
    pub const fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded { .. })
    }
}

/// Likely cause when the two scorers disagree on the label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisagreementKind {
    /// Scores far apart: mixed or complex sentiment, possibly sarcasm or irony
    MixedSentiment,
    /// Scores close but on opposite sides of a neutral boundary
    NearNeutralBoundary,
}

impl DisagreementKind {
    /// Short human-readable descriptor
    #[must_use]
    pub const fn describe(&self) -> &'static str {
        match self {
            Self::MixedSentiment => "mixed/complex sentiment, possible sarcasm or irony",
            Self::NearNeutralBoundary => "both near neutral boundary, subtle indicators differ",
        }
    }
}

/// Weighted combination of the two scorers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnsembleResult {
    /// Weighted score
    pub score: f64,
    /// Label of the weighted score
    pub label: SentimentLabel,
    /// Confidence in `[0.0, 1.0]`, folding in scorer agreement
    pub confidence: f64,
    /// Set when the scorers' labels differ
    pub disagreement: Option<DisagreementKind>,
}

impl EnsembleResult {
    /// Zero score, neutral label, zero confidence
    #[must_use]
    pub const fn neutral() -> Self {
        Self {
            score: 0.0,
            label: SentimentLabel::Neutral,
            confidence: 0.0,
            disagreement: None,
        }
    }
}

/// Complete sentiment verdict for one message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentAnalysis {
    /// Compound/valence scorer outcome
    pub primary: ScorerOutcome,
    /// Polarity scorer outcome
    pub secondary: ScorerOutcome,
    /// Ensemble verdict
    pub ensemble: EnsembleResult,
}

impl SentimentAnalysis {
    /// All-zero, all-neutral analysis
    #[must_use]
    pub const fn neutral() -> Self {
        Self {
            primary: ScorerOutcome::Scored(SentimentResult::neutral()),
            secondary: ScorerOutcome::Scored(SentimentResult::neutral()),
            ensemble: EnsembleResult::neutral(),
        }
    }

    /// Number of scorers that degraded
    #[must_use]
    pub fn degraded_count(&self) -> usize {
        usize::from(self.primary.is_degraded()) + usize::from(self.secondary.is_degraded())
    }
}

/// Shape of a message's content
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    /// Ordinary text
    Text,
    /// Media placeholder
    Media,
    /// Nothing but emoji
    EmojiOnly,
    /// Contains a URL
    Link,
    /// Mentions a document file
    Document,
}

impl MessageType {
    /// Tag used in exports
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Media => "media",
            Self::EmojiOnly => "emoji_only",
            Self::Link => "link",
            Self::Document => "document",
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// URLs found in a message, grouped by what they point at
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaUrls {
    /// Image links
    pub images: Vec<String>,
    /// Video links
    pub videos: Vec<String>,
    /// Audio links
    pub audio: Vec<String>,
    /// Document links
    pub documents: Vec<String>,
    /// Any other links
    pub links: Vec<String>,
    /// The message is a media-omitted placeholder
    pub media_omitted: bool,
}

impl MediaUrls {
    /// Total number of URLs found
    #[must_use]
    pub fn url_count(&self) -> usize {
        self.images.len() + self.videos.len() + self.audio.len() + self.documents.len() + self.links.len()
    }
}

/// A value and how often it occurred
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedCount {
    /// Counted value (token, sender, emoji)
    pub value: String,
    /// Occurrences
    pub count: usize,
}

/// Emotion name mapped to its percentage of matched emotion cues
pub type EmotionDistribution = BTreeMap<String, f64>;

/// Per-message annotations produced by the NLP processor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageAnnotation {
    /// Content shape
    pub message_type: MessageType,
    /// Sentiment verdict
    pub sentiment: SentimentAnalysis,
    /// Emotion percentages
    pub emotions: EmotionDistribution,
    /// Most frequent keywords with counts
    pub keywords: Vec<RankedCount>,
    /// Emoji in text order
    pub emojis: Vec<String>,
    /// Categorized URLs
    pub media: MediaUrls,
    /// Detected language code
    pub language: Option<String>,
    /// Romanized Hindi/English code-mix detected
    pub is_hinglish: bool,
}

/// A parsed message together with its annotations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzedMessage {
    /// Position in the parsed message sequence
    pub index: usize,
    /// Normalized timestamp or raw fallback
    pub timestamp: MessageTimestamp,
    /// Original `"date, time"` substring
    pub raw_timestamp: String,
    /// Sender display name
    pub sender: String,
    /// Message body
    pub message: String,
    /// Annotations
    #[serde(flatten)]
    pub annotation: MessageAnnotation,
}

/// Mean sentiment over a run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverallSentiment {
    /// Mean ensemble score
    pub score: f64,
    /// Label of the mean score
    pub label: SentimentLabel,
    /// Number of messages contributing to the mean
    pub scored_messages: usize,
}

/// Messages sharing one ensemble label
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabelStats {
    /// Messages with the label
    pub count: usize,
    /// Mean ensemble score of those messages
    pub mean_score: f64,
}

/// A sender's activity and mean sentiment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SenderSentiment {
    /// Sender display name
    pub sender: String,
    /// Messages sent, media included
    pub messages: usize,
    /// Mean ensemble score over the sender's scored messages
    pub mean_sentiment: f64,
}

/// A message the scorers did not agree on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisagreementEntry {
    /// Position in the parsed message sequence
    pub index: usize,
    /// Sender display name
    pub sender: String,
    /// Message body, truncated
    pub text: String,
    /// Compound/valence scorer result
    pub primary: SentimentResult,
    /// Polarity scorer result
    pub secondary: SentimentResult,
    /// Ensemble verdict, including the disagreement kind
    pub ensemble: EnsembleResult,
}

/// Scorer disagreements over a run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DisagreementReport {
    /// Messages where both scorers produced a result
    pub compared_messages: usize,
    /// Messages with disagreeing labels
    pub count: usize,
    /// `count` as a percentage of `compared_messages`
    pub rate: f64,
    /// The disagreeing messages in chat order
    pub messages: Vec<DisagreementEntry>,
}

/// Emoji usage over a run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmojiUsage {
    /// Emoji occurrences
    pub total: usize,
    /// Distinct emoji
    pub unique: usize,
    /// Emoji each sender used, most used first
    pub by_sender: BTreeMap<String, Vec<String>>,
}

/// Parser and pipeline diagnostics for a run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseDiagnostics {
    /// Messages recognized by the parser
    pub parsed_messages: usize,
    /// Lines that could not be attached to any message
    pub failed_lines_count: usize,
    /// First few unparsed lines
    pub failed_lines_sample: Vec<String>,
    /// Messages skipped because their processing failed
    pub failed_messages: usize,
    /// Scorer calls that degraded to neutral
    pub degraded_scorer_calls: usize,
    /// Messages whose timestamp kept its raw form
    pub unparsed_timestamps: usize,
}

/// Complete result of analyzing one chat export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatAnalysis {
    /// Version tag of the processor that produced this result
    pub processing_version: String,
    /// Number of analyzed messages
    pub total_messages: usize,
    /// Mean sentiment
    pub overall_sentiment: OverallSentiment,
    /// Count and mean score per ensemble label
    pub sentiment_distribution: BTreeMap<SentimentLabel, LabelStats>,
    /// Mean per-message emotion percentages
    pub emotion_distribution: EmotionDistribution,
    /// Percentage of messages per detected language
    pub language_distribution: BTreeMap<String, f64>,
    /// Most frequent language
    pub primary_language: Option<String>,
    /// Messages flagged as Hindi/English code-mix
    pub hinglish_messages: usize,
    /// Messages per content shape
    pub message_type_distribution: BTreeMap<MessageType, usize>,
    /// Senders with the most messages
    pub most_active_senders: Vec<RankedCount>,
    /// Most active senders with their mean sentiment
    pub sender_sentiment: Vec<SenderSentiment>,
    /// Most used emoji
    pub top_emojis: Vec<RankedCount>,
    /// Emoji totals and per-sender preferences
    pub emoji_usage: EmojiUsage,
    /// Messages the scorers disagreed on
    pub disagreements: DisagreementReport,
    /// One-line topic summary
    pub summary: String,
    /// Analyzed messages in chat order
    pub messages: Vec<AnalyzedMessage>,
    /// Parser and pipeline diagnostics
    pub diagnostics: ParseDiagnostics,
}

/// Output format for exported analyses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Comma-separated values format
    Csv,
    /// Plain text format
    Txt,
    /// JSON format
    Json,
}

impl OutputFormat {
    /// Get the file extension for this format
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Txt => "txt",
            Self::Json => "json",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = crate::error::ChatSentimentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "txt" => Ok(Self::Txt),
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            other => Err(crate::error::ChatSentimentError::InvalidInput(format!(
                "Unknown output format: {other}. Must be one of: txt, csv, json"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compound_thresholds_are_inclusive() {
        let t = LabelThresholds::COMPOUND;
        assert_eq!(t.label(0.05), SentimentLabel::Positive);
        assert_eq!(t.label(-0.05), SentimentLabel::Negative);
        assert_eq!(t.label(0.049_99), SentimentLabel::Neutral);
    }

    #[test]
    fn test_polarity_thresholds_are_strict() {
        let t = LabelThresholds::POLARITY;
        assert_eq!(t.label(0.1), SentimentLabel::Neutral);
        assert_eq!(t.label(0.11), SentimentLabel::Positive);
        assert_eq!(t.label(-0.1), SentimentLabel::Neutral);
        assert_eq!(t.label(-0.11), SentimentLabel::Negative);
    }

    #[test]
    fn test_from_score_clamps_and_handles_nan() {
        let r = SentimentResult::from_score(3.0, &LabelThresholds::COMPOUND);
        assert!((r.score - 1.0).abs() < f64::EPSILON);
        let r = SentimentResult::from_score(f64::NAN, &LabelThresholds::COMPOUND);
        assert_eq!(r, SentimentResult::neutral());
    }

    #[test]
    fn test_degraded_outcome_is_neutral() {
        let outcome = ScorerOutcome::Degraded {
            reason: "boom".to_string(),
        };
        assert!(outcome.is_degraded());
        assert_eq!(outcome.result(), SentimentResult::neutral());
    }

    #[test]
    fn test_timestamp_display() {
        let dt = NaiveDateTime::parse_from_str("2024-08-15 22:30:00", "%Y-%m-%d %H:%M:%S")
            .expect("valid date");
        assert_eq!(MessageTimestamp::Parsed(dt).to_string(), "2024-08-15T22:30:00");
        assert_eq!(
            MessageTimestamp::Unparsed("31/31/2024, 10:30".to_string()).to_string(),
            "31/31/2024, 10:30"
        );
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("CSV".parse::<OutputFormat>().ok(), Some(OutputFormat::Csv));
        assert!("pdf".parse::<OutputFormat>().is_err());
    }
}
