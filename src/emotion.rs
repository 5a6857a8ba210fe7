use crate::config::EmotionConfig;
use crate::models::EmotionDistribution;

/// Emotion stage of the per-message pipeline
pub trait EmotionModel: Send + Sync {
    /// Every emotion this model reports, mapped to zero
    fn zero_distribution(&self) -> EmotionDistribution;

    /// Percentage per emotion for `text`
    fn detect(&self, text: &str) -> EmotionDistribution;
}

/// Keyword-count emotion detector
///
/// Each emotion's score is its share of all matched cues, as a percentage.
#[derive(Debug, Clone)]
pub struct EmotionDetector {
    lexicons: Vec<(String, Vec<String>)>,
}

impl EmotionDetector {
    /// Detector over the configured emotion lexicons
    #[must_use]
    pub fn new(config: &EmotionConfig) -> Self {
        let lexicons = config
            .lexicons
            .iter()
            .map(|lexicon| {
                let keywords = lexicon
                    .keywords
                    .iter()
                    .map(|k| k.to_lowercase())
                    .filter(|k| !k.is_empty())
                    .collect();
                (lexicon.name.clone(), keywords)
            })
            .collect();

        Self { lexicons }
    }

    /// Emotion names in configured order
    pub fn emotions(&self) -> impl Iterator<Item = &str> {
        self.lexicons.iter().map(|(name, _)| name.as_str())
    }

    /// Every emotion mapped to zero
    #[must_use]
    pub fn zero_distribution(&self) -> EmotionDistribution {
        self.emotions().map(|name| (name.to_string(), 0.0)).collect()
    }

    /// Percentage of matched cues per emotion
    ///
    /// Cues are counted as case-insensitive, non-overlapping substrings. All
    /// values are zero when nothing matched; otherwise they sum to 100.
    #[must_use]
    pub fn detect(&self, text: &str) -> EmotionDistribution {
        if text.trim().is_empty() {
            return self.zero_distribution();
        }

        let lower = text.to_lowercase();
        let counts: Vec<(&str, usize)> = self
            .lexicons
            .iter()
            .map(|(name, keywords)| {
                let count = keywords.iter().map(|k| lower.matches(k.as_str()).count()).sum();
                (name.as_str(), count)
            })
            .collect();

        let total: usize = counts.iter().map(|(_, c)| c).sum();
        if total == 0 {
            return self.zero_distribution();
        }

        counts
            .into_iter()
            .map(|(name, count)| (name.to_string(), count as f64 / total as f64 * 100.0))
            .collect()
    }
}

impl EmotionModel for EmotionDetector {
    fn zero_distribution(&self) -> EmotionDistribution {
        Self::zero_distribution(self)
    }

    fn detect(&self, text: &str) -> EmotionDistribution {
        Self::detect(self, text)
    }
}
