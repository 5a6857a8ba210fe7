use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::models::LabelThresholds;
use crate::validation::InputValidator;

/// Application configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Log level, format and file
    pub logging: LoggingConfig,
    /// Per-message processing
    pub nlp: NlpConfig,
    /// Scorer thresholds and ensemble weights
    pub sentiment: SentimentConfig,
    /// Emotion lexicons
    pub emotions: EmotionConfig,
    /// Keyword extraction
    pub keywords: KeywordConfig,
    /// Explanation indicator words
    pub explain: ExplainConfig,
    /// Job execution and aggregate limits
    pub jobs: JobConfig,
    /// Export defaults
    pub export: ExportConfig,
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `trace`, `debug`, `info`, `warn` or `error`
    pub level: String,
    /// Optional daily-rolling JSON log file
    pub file_path: Option<String>,
    /// Console format, `text` or `json`
    pub format: String,
}

/// Per-message processing settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NlpConfig {
    /// Version tag stamped on every analysis
    pub processing_version: String,
    /// Longest text, in characters, the scorers accept
    pub max_text_length: usize,
    /// Run language detection on every message
    pub enable_language_detection: bool,
    /// Romanized Hindi words that mark a Hindi/English code-mixed message
    pub hinglish_markers: Vec<String>,
    /// Distinct markers needed before a message counts as code-mixed
    pub hinglish_min_matches: usize,
}

/// Weights and label boundaries for combining the two scorers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnsembleConfig {
    /// Weight of the valence scorer
    pub primary_weight: f64,
    /// Weight of the polarity scorer
    pub secondary_weight: f64,
    /// Label boundaries of the weighted score
    pub thresholds: LabelThresholds,
}

impl Default for EnsembleConfig {
    fn default() -> Self {
        Self {
            primary_weight: 0.6,
            secondary_weight: 0.4,
            thresholds: LabelThresholds::COMPOUND,
        }
    }
}

/// Sentiment scoring settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentConfig {
    /// Label boundaries of the compound/valence scorer
    pub primary_thresholds: LabelThresholds,
    /// Label boundaries of the polarity scorer
    pub secondary_thresholds: LabelThresholds,
    /// How the two scorers combine
    pub ensemble: EnsembleConfig,
}

/// Keywords and emoji that signal one emotion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmotionLexicon {
    /// Emotion name
    pub name: String,
    /// Cues, matched case-insensitively
    pub keywords: Vec<String>,
}

/// Emotion detection settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmotionConfig {
    /// Lexicons in reporting order
    pub lexicons: Vec<EmotionLexicon>,
}

/// Keyword extraction settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordConfig {
    /// Keywords kept per message
    pub top_k: usize,
    /// Shortest keyword, in characters
    pub min_length: usize,
    /// Words never reported as keywords
    pub stopwords: Vec<String>,
    /// Merge the `stop-words` English list into `stopwords`
    pub include_library_stopwords: bool,
    /// Number of whitespace tokens quoted in the run summary
    pub summary_topics: usize,
}

/// Explanation settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExplainConfig {
    /// Positive indicator words
    pub positive_words: Vec<String>,
    /// Negative indicator words
    pub negative_words: Vec<String>,
    /// Neutral indicator words
    pub neutral_words: Vec<String>,
    /// Indicators reported per polarity
    pub max_important_words: usize,
}

/// Job execution and aggregate settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobConfig {
    /// Messages scored at the same time
    pub max_concurrent_messages: usize,
    /// Time allowed for scoring one message
    pub scorer_timeout_ms: u64,
    /// Senders in the activity and sentiment rankings
    pub top_senders: usize,
    /// Emoji in the top-emoji ranking
    pub top_emojis: usize,
    /// Unparsed lines kept as a sample
    pub max_failed_line_samples: usize,
    /// Largest accepted export
    pub max_content_bytes: usize,
}

/// Export settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportConfig {
    /// `json`, `csv` or `txt`
    pub default_format: String,
    /// Directory timestamped exports are written under
    pub output_directory: String,
}

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(ToString::to_string).collect()
}

fn emotion(name: &str, keywords: &[&str]) -> EmotionLexicon {
    EmotionLexicon {
        name: name.to_string(),
        keywords: words(keywords),
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            logging: LoggingConfig {
                level: "info".to_string(),
                file_path: None,
                format: "text".to_string(),
            },
            nlp: NlpConfig {
                processing_version: "1.0".to_string(),
                max_text_length: 10000,
                enable_language_detection: true,
                hinglish_markers: words(&[
                    "acha", "bhai", "haan", "nahi", "kya", "ab", "phir", "aise", "bus", "bas",
                    "theek", "lo", "ho", "raha",
                ]),
                hinglish_min_matches: 2,
            },
            sentiment: SentimentConfig {
                primary_thresholds: LabelThresholds::COMPOUND,
                secondary_thresholds: LabelThresholds::POLARITY,
                ensemble: EnsembleConfig::default(),
            },
            emotions: EmotionConfig {
                lexicons: vec![
                    emotion(
                        "joy",
                        &["happy", "glad", "awesome", "great", "fantastic", "love", "excellent", "😊", "😄", "🎉"],
                    ),
                    emotion("anger", &["angry", "mad", "furious", "hate", "terrible", "worst", "😠", "🤬", "😤"]),
                    emotion("sadness", &["sad", "sorry", "hurt", "upset", "down", "depressed", "😢", "😭", "😔"]),
                    emotion("fear", &["afraid", "scared", "worried", "anxious", "nervous", "😨", "😰", "😟"]),
                    emotion("surprise", &["wow", "amazing", "shocking", "unexpected", "😲", "🤯", "😯"]),
                ],
            },
            keywords: KeywordConfig {
                top_k: 3,
                min_length: 4,
                stopwords: words(&[
                    "a", "an", "and", "are", "as", "at", "be", "but", "by", "for", "from", "has", "he", "in",
                    "is", "it", "its", "of", "on", "or", "that", "the", "to", "was", "will", "with", "you",
                    "your", "me", "i", "we", "they", "what", "which", "who", "when", "where", "why", "how",
                    "can", "could",
                ]),
                include_library_stopwords: false,
                summary_topics: 5,
            },
            explain: ExplainConfig {
                positive_words: words(&[
                    "good", "great", "excellent", "amazing", "awesome", "love", "happy", "wonderful",
                    "fantastic", "best", "perfect", "beautiful", "brilliant",
                ]),
                negative_words: words(&[
                    "bad", "terrible", "awful", "horrible", "hate", "sad", "angry", "worst", "disgusting",
                    "pathetic", "disappointing", "poor",
                ]),
                neutral_words: words(&[
                    "think", "believe", "seem", "appear", "maybe", "perhaps", "might", "probably",
                    "possibly", "consider", "could",
                ]),
                max_important_words: 10,
            },
            jobs: JobConfig {
                max_concurrent_messages: 8,
                scorer_timeout_ms: 2000,
                top_senders: 5,
                top_emojis: 10,
                max_failed_line_samples: 5,
                max_content_bytes: 50 * 1024 * 1024,
            },
            export: ExportConfig {
                default_format: "json".to_string(),
                output_directory: "./output".to_string(),
            },
        }
    }
}

impl AppConfig {
    /// Load configuration from multiple sources with precedence
    ///
    /// Built-in defaults are overridden by `config/default`, `config/local`,
    /// the optional `explicit` file and finally `CHAT_SENTIMENT__SECTION__KEY`
    /// environment variables.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let defaults = Config::try_from(&Self::default()).context("Failed to serialize default configuration")?;

        let mut builder = Config::builder()
            .add_source(defaults)
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false));

        if let Some(path) = explicit {
            builder = builder.add_source(File::from(path).required(true));
        }

        let config = builder
            .add_source(Environment::with_prefix("CHAT_SENTIMENT").separator("__").try_parsing(true))
            .build()
            .context("Failed to load configuration")?;

        let app_config: Self = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        app_config.validate()?;

        Ok(app_config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        // Validate logging config
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(anyhow::anyhow!(
                "Invalid log level: {}. Must be one of: {:?}",
                self.logging.level,
                valid_levels
            ));
        }

        let valid_formats = ["text", "json"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            return Err(anyhow::anyhow!(
                "Invalid log format: {}. Must be one of: {:?}",
                self.logging.format,
                valid_formats
            ));
        }

        // Validate NLP config
        if self.nlp.max_text_length == 0 {
            return Err(anyhow::anyhow!("max_text_length must be greater than 0"));
        }
        if self.nlp.processing_version.trim().is_empty() {
            return Err(anyhow::anyhow!("processing_version must not be empty"));
        }

        // Validate sentiment config
        for (name, thresholds) in [
            ("primary_thresholds", &self.sentiment.primary_thresholds),
            ("secondary_thresholds", &self.sentiment.secondary_thresholds),
            ("ensemble.thresholds", &self.sentiment.ensemble.thresholds),
        ] {
            InputValidator::validate_thresholds(thresholds).with_context(|| format!("Invalid {name}"))?;
        }

        let ensemble = &self.sentiment.ensemble;
        if ensemble.primary_weight < 0.0 || ensemble.secondary_weight < 0.0 {
            return Err(anyhow::anyhow!("ensemble weights must not be negative"));
        }
        if (ensemble.primary_weight + ensemble.secondary_weight - 1.0).abs() > 1e-6 {
            return Err(anyhow::anyhow!(
                "ensemble weights must sum to 1.0, got {}",
                ensemble.primary_weight + ensemble.secondary_weight
            ));
        }

        if self.emotions.lexicons.iter().any(|l| l.name.trim().is_empty()) {
            return Err(anyhow::anyhow!("emotion lexicon names must not be empty"));
        }

        // Validate ranking limits
        for (name, n) in [
            ("keywords.top_k", self.keywords.top_k),
            ("keywords.summary_topics", self.keywords.summary_topics),
            ("explain.max_important_words", self.explain.max_important_words),
            ("jobs.top_senders", self.jobs.top_senders),
            ("jobs.top_emojis", self.jobs.top_emojis),
            ("jobs.max_failed_line_samples", self.jobs.max_failed_line_samples),
        ] {
            InputValidator::validate_top_n(n).with_context(|| format!("Invalid {name}"))?;
        }

        // Validate job config
        if self.jobs.max_concurrent_messages == 0 {
            return Err(anyhow::anyhow!("max_concurrent_messages must be greater than 0"));
        }
        if self.jobs.scorer_timeout_ms == 0 {
            return Err(anyhow::anyhow!("scorer_timeout_ms must be greater than 0"));
        }
        if self.jobs.max_content_bytes == 0 {
            return Err(anyhow::anyhow!("max_content_bytes must be greater than 0"));
        }

        // Validate export config
        let valid_formats = ["txt", "csv", "json"];
        if !valid_formats.contains(&self.export.default_format.as_str()) {
            return Err(anyhow::anyhow!(
                "Invalid export format: {}. Must be one of: {:?}",
                self.export.default_format,
                valid_formats
            ));
        }

        Ok(())
    }

    /// Get log level from environment or config
    #[must_use]
    pub fn get_log_level(&self) -> String {
        std::env::var("RUST_LOG").unwrap_or_else(|_| self.logging.level.clone())
    }

    /// Render the effective configuration as YAML
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to render configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.keywords.top_k, 3);
        assert_eq!(config.emotions.lexicons.len(), 5);
        assert_eq!(config.emotions.lexicons[0].name, "joy");
    }

    #[test]
    fn test_config_validation() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_config() {
        let mut config = AppConfig::default();
        config.jobs.max_concurrent_messages = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_weights_must_sum_to_one() {
        let mut config = AppConfig::default();
        config.sentiment.ensemble.primary_weight = 0.9;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_inverted_thresholds_rejected() {
        let mut config = AppConfig::default();
        config.sentiment.primary_thresholds.negative = 0.5;
        assert!(config.validate().is_err());
    }
}
