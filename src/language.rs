use std::collections::HashSet;

use regex::Regex;
use whatlang::detect;

use crate::config::NlpConfig;
use crate::error::Result;

/// Label used in aggregates for messages whose language was not detected
pub const UNKNOWN_LANGUAGE: &str = "unknown";

/// Per-message language annotation
#[derive(Debug, Clone)]
pub struct LanguageDetector {
    enabled: bool,
    hinglish_markers: HashSet<String>,
    hinglish_min_matches: usize,
    word_regex: Regex,
}

impl LanguageDetector {
    /// Detector with the configured Hinglish markers
    pub fn new(config: &NlpConfig) -> Result<Self> {
        Ok(Self {
            enabled: config.enable_language_detection,
            hinglish_markers: config.hinglish_markers.iter().map(|m| m.to_lowercase()).collect(),
            hinglish_min_matches: config.hinglish_min_matches,
            word_regex: Regex::new(r"\b[a-z]+\b")?,
        })
    }

    /// ISO 639-3 code of the text's language
    ///
    /// `None` when detection is disabled, the text is blank or no language
    /// could be determined.
    #[must_use]
    pub fn detect(&self, text: &str) -> Option<String> {
        if !self.enabled || text.trim().is_empty() {
            return None;
        }

        detect(text).map(|info| info.lang().code().to_string())
    }

    /// True when enough distinct romanized Hindi markers appear as words
    #[must_use]
    pub fn is_hinglish(&self, text: &str) -> bool {
        if self.hinglish_min_matches == 0 {
            return false;
        }

        let lower = text.to_lowercase();
        let found: HashSet<&str> = self
            .word_regex
            .find_iter(&lower)
            .map(|m| m.as_str())
            .filter(|word| self.hinglish_markers.contains(*word))
            .collect();

        found.len() >= self.hinglish_min_matches
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    fn detector() -> LanguageDetector {
        LanguageDetector::new(&AppConfig::default().nlp).expect("Failed to create language detector")
    }

    #[test]
    fn test_detects_english() {
        let lang = detector().detect("The weather is lovely today and we are going to the beach together");
        assert_eq!(lang.as_deref(), Some("eng"));
    }

    #[test]
    fn test_blank_text_has_no_language() {
        assert_eq!(detector().detect("   "), None);
    }

    #[test]
    fn test_disabled_detection() {
        let mut config = AppConfig::default().nlp;
        config.enable_language_detection = false;
        let detector = LanguageDetector::new(&config).expect("detector");
        assert_eq!(detector.detect("The weather is lovely today"), None);
    }

    #[test]
    fn test_hinglish_needs_two_distinct_markers() {
        let detector = detector();
        assert!(detector.is_hinglish("acha bhai, kal milte hain"));
        assert!(!detector.is_hinglish("acha acha"));
        // markers inside other words do not count
        assert!(!detector.is_hinglish("about the bush"));
    }
}
