use std::sync::Arc;

use tracing::debug;

use crate::config::AppConfig;
use crate::emoji::EmojiExtractor;
use crate::emotion::{EmotionDetector, EmotionModel};
use crate::ensemble::SentimentEnsemble;
use crate::error::{ChatSentimentError, Result};
use crate::explain::{Explainer, Explanation};
use crate::keywords::KeywordExtractor;
use crate::language::LanguageDetector;
use crate::media::MediaClassifier;
use crate::models::{EmotionDistribution, MessageAnnotation, MessageType, SentimentAnalysis};
use crate::scorers::{PolarityScorer, SentimentScorer, ValenceScorer};
use crate::validation::InputValidator;

/// NLP processor for per-message text analysis
///
/// Holds every per-message stage: sentiment scoring, emotion, keyword, emoji,
/// media and language annotation, plus the explainer.
pub struct NlpProcessor {
    /// Version tag stamped on every analysis
    pub version: String,
    sentiment: SentimentEnsemble,
    explainer: Explainer,
    emotions: Arc<dyn EmotionModel>,
    keywords: KeywordExtractor,
    emoji: EmojiExtractor,
    media: MediaClassifier,
    language: LanguageDetector,
}

impl NlpProcessor {
    /// Create a processor with the built-in lexical scorers
    pub fn new(version: &str, config: &AppConfig) -> Result<Self> {
        let primary = ValenceScorer::new(config.sentiment.primary_thresholds, config.nlp.max_text_length)?;
        let secondary = PolarityScorer::new(config.sentiment.secondary_thresholds, config.nlp.max_text_length)?;
        Self::with_scorers(version, config, Arc::new(primary), Arc::new(secondary))
    }

    /// Create a processor around caller-supplied scorers
    pub fn with_scorers(
        version: &str,
        config: &AppConfig,
        primary: Arc<dyn SentimentScorer>,
        secondary: Arc<dyn SentimentScorer>,
    ) -> Result<Self> {
        InputValidator::validate_processing_version(version)
            .map_err(|e| ChatSentimentError::InvalidConfig(e.to_string()))?;

        debug!(
            version,
            primary = primary.name(),
            secondary = secondary.name(),
            "Creating NLP processor"
        );

        Ok(Self {
            version: version.to_string(),
            sentiment: SentimentEnsemble::new(primary, secondary, config.sentiment.ensemble),
            explainer: Explainer::new(&config.explain, &config.sentiment)?,
            emotions: Arc::new(EmotionDetector::new(&config.emotions)),
            keywords: KeywordExtractor::new(&config.keywords)?,
            emoji: EmojiExtractor::new()?,
            media: MediaClassifier::new()?,
            language: LanguageDetector::new(&config.nlp)?,
        })
    }

    /// Replace the emotion stage
    #[must_use]
    pub fn with_emotion_model(mut self, emotions: Arc<dyn EmotionModel>) -> Self {
        self.emotions = emotions;
        self
    }

    /// Content shape of a message
    #[must_use]
    pub fn classify(&self, text: &str) -> MessageType {
        self.media.classify(text)
    }

    /// Sentiment of a message
    ///
    /// Attachment placeholders are neutral without consulting the scorers.
    #[must_use]
    pub fn analyze_sentiment(&self, text: &str) -> SentimentAnalysis {
        if MediaClassifier::is_media_placeholder(text) {
            return SentimentAnalysis::neutral();
        }
        self.sentiment.analyze(text)
    }

    /// Run every stage on one message
    #[must_use]
    pub fn process_text(&self, text: &str) -> MessageAnnotation {
        let sentiment = self.analyze_sentiment(text);
        self.annotate(text, sentiment)
    }

    /// Run every stage except sentiment, using an already computed verdict
    #[must_use]
    pub fn annotate(&self, text: &str, sentiment: SentimentAnalysis) -> MessageAnnotation {
        let message_type = self.classify(text);
        let emotions = if message_type == MessageType::Media {
            self.emotions.zero_distribution()
        } else {
            self.emotions.detect(text)
        };

        MessageAnnotation {
            message_type,
            sentiment,
            emotions,
            keywords: self.keywords.extract(text),
            emojis: self.emoji.extract(text),
            media: self.media.extract_urls(text),
            language: self.language.detect(text),
            is_hinglish: self.language.is_hinglish(text),
        }
    }

    /// Score a text and explain the verdict
    #[must_use]
    pub fn explain(&self, text: &str) -> Explanation {
        let analysis = self.sentiment.analyze(text);
        self.explainer.explain(text, &analysis)
    }

    /// Explain an existing verdict for `text`
    #[must_use]
    pub fn explain_analysis(&self, text: &str, analysis: &SentimentAnalysis) -> Explanation {
        self.explainer.explain(text, analysis)
    }

    /// The scorer ensemble
    #[must_use]
    pub const fn ensemble(&self) -> &SentimentEnsemble {
        &self.sentiment
    }

    /// Every configured emotion mapped to zero
    #[must_use]
    pub fn zero_emotions(&self) -> EmotionDistribution {
        self.emotions.zero_distribution()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SentimentLabel;

    fn processor() -> NlpProcessor {
        NlpProcessor::new("test_v1", &AppConfig::default()).expect("Failed to create NLP processor")
    }

    #[test]
    fn test_process_text() {
        let annotation = processor().process_text("I love this, it's awesome 😊 https://example.com");
        assert_eq!(annotation.message_type, MessageType::Link);
        assert_eq!(annotation.sentiment.ensemble.label, SentimentLabel::Positive);
        assert_eq!(annotation.emojis, vec!["😊"]);
        assert_eq!(annotation.media.links, vec!["https://example.com"]);
        assert!(annotation.emotions["joy"] > 0.0);
    }

    #[test]
    fn test_media_placeholder_is_neutral() {
        let annotation = processor().process_text("<Media omitted>");
        assert_eq!(annotation.message_type, MessageType::Media);
        assert_eq!(annotation.sentiment, SentimentAnalysis::neutral());
        assert!(annotation.media.media_omitted);
        assert!(annotation.emotions.values().all(|v| *v == 0.0));
    }

    #[test]
    fn test_invalid_version_rejected() {
        let result = NlpProcessor::new("bad version!", &AppConfig::default());
        assert!(matches!(result, Err(ChatSentimentError::InvalidConfig(_))));
    }

    #[test]
    fn test_explain() {
        let explanation = processor().explain("This is awesome!");
        assert_eq!(explanation.final_verdict.sentiment, SentimentLabel::Positive);
        assert_eq!(explanation.important_words.positive_indicators, vec!["awesome"]);
        assert!(explanation.disagreement.is_none());
    }
}
