use std::collections::HashSet;

use regex::Regex;
use stop_words::{get, LANGUAGE};
use unicode_normalization::UnicodeNormalization;

use crate::config::KeywordConfig;
use crate::emoji::EmojiExtractor;
use crate::error::Result;
use crate::models::RankedCount;
use crate::utils::FrequencyCounter;

/// Frequency-based keyword extraction
#[derive(Debug, Clone)]
pub struct KeywordExtractor {
    stopwords: HashSet<String>,
    top_k: usize,
    min_length: usize,
    strip_regex: Regex,
    word_regex: Regex,
    emoji: EmojiExtractor,
}

impl KeywordExtractor {
    /// Extractor with the configured stopwords and limits
    pub fn new(config: &KeywordConfig) -> Result<Self> {
        let mut stopwords: HashSet<String> = config.stopwords.iter().map(|w| w.to_lowercase()).collect();
        if config.include_library_stopwords {
            stopwords.extend(get(LANGUAGE::English).iter().map(ToString::to_string));
        }

        Ok(Self {
            stopwords,
            top_k: config.top_k,
            min_length: config.min_length,
            strip_regex: Regex::new(r"https?\S+|www\S+|\S+@\S+")?,
            word_regex: Regex::new(r"\b\w+\b")?,
            emoji: EmojiExtractor::new()?,
        })
    }

    /// Candidate keyword tokens in text order
    ///
    /// URLs and e-mail addresses are dropped, emoji become their names, and
    /// stopwords and short tokens are filtered out.
    #[must_use]
    pub fn tokens(&self, text: &str) -> Vec<String> {
        let stripped = self.strip_regex.replace_all(text, "");
        let demojized = self.emoji.demojize(&stripped);
        let normalized: String = demojized.nfc().collect::<String>().to_lowercase();

        self.word_regex
            .find_iter(&normalized)
            .map(|m| m.as_str())
            .filter(|w| w.chars().count() >= self.min_length && !self.stopwords.contains(*w))
            .map(ToString::to_string)
            .collect()
    }

    /// Top keywords with the configured limit
    #[must_use]
    pub fn extract(&self, text: &str) -> Vec<RankedCount> {
        self.extract_top(text, self.top_k)
    }

    /// Up to `k` most frequent keywords; ties keep first-occurrence order
    #[must_use]
    pub fn extract_top(&self, text: &str, k: usize) -> Vec<RankedCount> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        let mut counter = FrequencyCounter::new();
        counter.extend(self.tokens(text));
        counter.most_common(k)
    }
}
