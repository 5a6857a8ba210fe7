//! Lexical sentiment scorers.
//!
//! Two independent scorers sit behind [`SentimentScorer`]: a compound
//! valence scorer sensitive to emphasis and punctuation, and a plain polarity
//! averager. The ensemble combines them.

use std::collections::HashMap;

use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};

use crate::error::{ChatSentimentError, Result};
use crate::lexicon::{is_negation, PolarityLexicon, ValenceLexicon, BOOSTER_WORDS, INTENSIFIERS};
use crate::models::{LabelThresholds, SentimentResult};

/// Booster increment applied to a neighbouring sentiment word
const BOOSTER_INCREMENT: f64 = 0.293;
/// Added to an all-caps sentiment word when the text mixes case
const CAPS_INCREMENT: f64 = 0.733;
/// Multiplier for a negated sentiment word
const NEGATION_SCALAR: f64 = -0.74;
/// Per-`!` emphasis, counted up to four
const EXCLAMATION_INCREMENT: f64 = 0.292;
/// Per-`?` emphasis for two or three question marks
const QUESTION_INCREMENT: f64 = 0.18;
/// Emphasis for more than three question marks
const QUESTION_CAP: f64 = 0.96;
/// Normalization constant of the compound score
const NORMALIZATION_ALPHA: f64 = 15.0;
/// Multiplier for a negated polarity word
const POLARITY_NEGATION: f64 = -0.5;

/// A pure function from text to sentiment
pub trait SentimentScorer: Send + Sync {
    /// Short stable name used in logs and metrics
    fn name(&self) -> &'static str;

    /// Score a text
    fn score(&self, text: &str) -> Result<SentimentResult>;
}

fn check_length(text: &str, max: usize) -> Result<()> {
    let length = text.chars().count();
    if length > max {
        return Err(ChatSentimentError::TextTooLong { length, max });
    }
    Ok(())
}

/// Compound valence scorer
pub struct ValenceScorer {
    lexicon: ValenceLexicon,
    boosters: HashMap<&'static str, f64>,
    thresholds: LabelThresholds,
    max_text_length: usize,
    token_regex: Regex,
}

impl ValenceScorer {
    /// Scorer with the embedded lexicon
    pub fn new(thresholds: LabelThresholds, max_text_length: usize) -> Result<Self> {
        Self::with_lexicon(ValenceLexicon::default(), thresholds, max_text_length)
    }

    /// Scorer with a caller-supplied lexicon
    pub fn with_lexicon(lexicon: ValenceLexicon, thresholds: LabelThresholds, max_text_length: usize) -> Result<Self> {
        let token_regex = Regex::new(r"\p{Extended_Pictographic}|[\w']+")?;

        Ok(Self {
            lexicon,
            boosters: BOOSTER_WORDS.iter().copied().collect(),
            thresholds,
            max_text_length,
            token_regex,
        })
    }

    /// Unnormalized sum of token valences plus punctuation emphasis
    #[must_use]
    pub fn raw_valence(&self, text: &str) -> f64 {
        let tokens: Vec<&str> = self.token_regex.find_iter(text).map(|m| m.as_str()).collect();
        let lowered: Vec<String> = tokens.iter().map(|t| t.to_lowercase()).collect();
        let caps_differ = caps_differential(&tokens);

        let mut sentiments = Vec::with_capacity(tokens.len());
        for (i, token) in tokens.iter().enumerate() {
            if self.boosters.contains_key(lowered[i].as_str()) {
                sentiments.push(0.0);
                continue;
            }

            let Some(mut valence) = self.lexicon.get(&lowered[i]) else {
                sentiments.push(0.0);
                continue;
            };

            if caps_differ && is_all_caps(token) {
                valence += CAPS_INCREMENT.copysign(valence);
            }

            // Boosters in the three preceding tokens, decaying with distance
            for distance in 0..3 {
                let Some(j) = i.checked_sub(distance + 1) else {
                    break;
                };
                let mut scalar = self.booster_scalar(tokens[j], &lowered[j], valence, caps_differ);
                if distance == 1 {
                    scalar *= 0.95;
                } else if distance == 2 {
                    scalar *= 0.9;
                }
                valence += scalar;
            }

            let window = i.saturating_sub(3)..i;
            if lowered[window].iter().any(|t| is_negation(t)) {
                valence *= NEGATION_SCALAR;
            }

            sentiments.push(valence);
        }

        // "but" shifts weight to the clause that follows it
        if let Some(pivot) = lowered.iter().position(|t| t == "but") {
            for (i, sentiment) in sentiments.iter_mut().enumerate() {
                if i < pivot {
                    *sentiment *= 0.5;
                } else if i > pivot {
                    *sentiment *= 1.5;
                }
            }
        }

        let mut sum: f64 = sentiments.iter().sum();
        let emphasis = punctuation_emphasis(text);
        if sum > 0.0 {
            sum += emphasis;
        } else if sum < 0.0 {
            sum -= emphasis;
        }
        sum
    }

    fn booster_scalar(&self, token: &str, lowered: &str, valence: f64, caps_differ: bool) -> f64 {
        let Some(direction) = self.boosters.get(lowered) else {
            return 0.0;
        };

        let mut scalar = BOOSTER_INCREMENT * direction;
        if valence < 0.0 {
            scalar = -scalar;
        }
        if caps_differ && is_all_caps(token) {
            scalar += CAPS_INCREMENT.copysign(valence);
        }
        scalar
    }
}

/// `sum / sqrt(sum² + 15)`, clamped to `[-1, 1]`
#[must_use]
pub fn normalize_compound(sum: f64) -> f64 {
    (sum / (sum * sum + NORMALIZATION_ALPHA).sqrt()).clamp(-1.0, 1.0)
}

fn is_all_caps(token: &str) -> bool {
    token.chars().any(char::is_alphabetic) && !token.chars().any(char::is_lowercase)
}

/// Some but not all word tokens are upper case
fn caps_differential(tokens: &[&str]) -> bool {
    let words: Vec<&&str> = tokens.iter().filter(|t| t.chars().any(char::is_alphabetic)).collect();
    let caps = words.iter().filter(|t| is_all_caps(t)).count();
    caps > 0 && caps < words.len()
}

fn punctuation_emphasis(text: &str) -> f64 {
    let exclamations = text.matches('!').count().min(4);
    let questions = text.matches('?').count();

    let question_emphasis = match questions {
        0 | 1 => 0.0,
        2 | 3 => questions as f64 * QUESTION_INCREMENT,
        _ => QUESTION_CAP,
    };

    exclamations as f64 * EXCLAMATION_INCREMENT + question_emphasis
}

impl SentimentScorer for ValenceScorer {
    fn name(&self) -> &'static str {
        "valence"
    }

    fn score(&self, text: &str) -> Result<SentimentResult> {
        check_length(text, self.max_text_length)?;
        let compound = normalize_compound(self.raw_valence(text));
        Ok(SentimentResult::from_score(compound, &self.thresholds))
    }
}

/// Polarity averaging scorer
pub struct PolarityScorer {
    lexicon: PolarityLexicon,
    stems: HashMap<String, f64>,
    intensifiers: HashMap<&'static str, f64>,
    stemmer: Stemmer,
    thresholds: LabelThresholds,
    max_text_length: usize,
    word_regex: Regex,
}

impl PolarityScorer {
    /// Scorer with the embedded lexicon
    pub fn new(thresholds: LabelThresholds, max_text_length: usize) -> Result<Self> {
        Self::with_lexicon(PolarityLexicon::default(), thresholds, max_text_length)
    }

    /// Scorer with a caller-supplied lexicon
    pub fn with_lexicon(lexicon: PolarityLexicon, thresholds: LabelThresholds, max_text_length: usize) -> Result<Self> {
        let stemmer = Stemmer::create(Algorithm::English);
        let mut stems = HashMap::new();
        for (word, polarity) in lexicon.iter() {
            stems.entry(stemmer.stem(word).into_owned()).or_insert(polarity);
        }
        let word_regex = Regex::new(r"[\w']+")?;

        Ok(Self {
            lexicon,
            stems,
            intensifiers: INTENSIFIERS.iter().copied().collect(),
            stemmer,
            thresholds,
            max_text_length,
            word_regex,
        })
    }

    fn polarity_of(&self, word: &str) -> Option<f64> {
        self.lexicon
            .get(word)
            .or_else(|| self.stems.get(self.stemmer.stem(word).as_ref()).copied())
    }

    /// Mean polarity of sentiment-bearing words, unclamped
    #[must_use]
    pub fn raw_polarity(&self, text: &str) -> f64 {
        let words: Vec<String> = self
            .word_regex
            .find_iter(&text.to_lowercase())
            .map(|m| m.as_str().to_string())
            .collect();

        let mut total = 0.0;
        let mut count = 0usize;

        for (i, word) in words.iter().enumerate() {
            if self.intensifiers.contains_key(word.as_str()) {
                continue;
            }
            let Some(mut polarity) = self.polarity_of(word) else {
                continue;
            };

            if let Some(previous) = i.checked_sub(1).map(|j| words[j].as_str()) {
                if let Some(multiplier) = self.intensifiers.get(previous) {
                    polarity *= multiplier;
                }
            }

            let window = i.saturating_sub(2)..i;
            if words[window].iter().any(|w| is_negation(w)) {
                polarity *= POLARITY_NEGATION;
            }

            total += polarity;
            count += 1;
        }

        if count == 0 {
            0.0
        } else {
            total / count as f64
        }
    }
}

impl SentimentScorer for PolarityScorer {
    fn name(&self) -> &'static str {
        "polarity"
    }

    fn score(&self, text: &str) -> Result<SentimentResult> {
        check_length(text, self.max_text_length)?;
        Ok(SentimentResult::from_score(self.raw_polarity(text), &self.thresholds))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SentimentLabel;

    fn valence() -> ValenceScorer {
        ValenceScorer::new(LabelThresholds::COMPOUND, 10_000).expect("Failed to create valence scorer")
    }

    fn polarity() -> PolarityScorer {
        PolarityScorer::new(LabelThresholds::POLARITY, 10_000).expect("Failed to create polarity scorer")
    }

    #[test]
    fn test_valence_exclamation_emphasis() {
        let result = valence().score("This is awesome!").expect("score");
        assert!((result.score - 0.6588).abs() < 1e-3, "got {}", result.score);
        assert_eq!(result.label, SentimentLabel::Positive);
    }

    #[test]
    fn test_valence_plain_negative() {
        let result = valence().score("This is terrible.").expect("score");
        assert!((result.score + 0.5423).abs() < 1e-3, "got {}", result.score);
        assert_eq!(result.label, SentimentLabel::Negative);
    }

    #[test]
    fn test_valence_negation_flips() {
        let scorer = valence();
        let plain = scorer.score("this is good").expect("score");
        let negated = scorer.score("this is not good").expect("score");
        assert!(plain.score > 0.0);
        assert!(negated.score < 0.0);
    }

    #[test]
    fn test_valence_booster_and_caps_increase_intensity() {
        let scorer = valence();
        let base = scorer.score("the food was good").expect("score").score;
        let boosted = scorer.score("the food was very good").expect("score").score;
        let shouted = scorer.score("the food was GOOD").expect("score").score;
        assert!(boosted > base);
        assert!(shouted > base);
    }

    #[test]
    fn test_valence_but_shifts_weight() {
        let result = valence().score("the start was good but the ending was terrible").expect("score");
        assert_eq!(result.label, SentimentLabel::Negative);
    }

    #[test]
    fn test_valence_emoji() {
        let result = valence().score("see you soon 😊").expect("score");
        assert_eq!(result.label, SentimentLabel::Positive);
    }

    #[test]
    fn test_valence_neutral_text() {
        let result = valence().score("the meeting is at noon").expect("score");
        assert!(result.score.abs() < f64::EPSILON);
        assert_eq!(result.label, SentimentLabel::Neutral);
    }

    #[test]
    fn test_text_too_long_is_rejected() {
        let scorer = ValenceScorer::new(LabelThresholds::COMPOUND, 5).expect("scorer");
        let err = scorer.score("far too long").expect_err("should fail");
        assert!(matches!(err, ChatSentimentError::TextTooLong { length: 12, max: 5 }));
    }

    #[test]
    fn test_polarity_basic_words() {
        let scorer = polarity();
        assert!((scorer.score("This is awesome!").expect("score").score - 1.0).abs() < 1e-9);
        assert!((scorer.score("This is terrible.").expect("score").score + 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_polarity_negation_and_intensifier() {
        let scorer = polarity();
        let negated = scorer.score("not good").expect("score");
        assert!((negated.score + 0.35).abs() < 1e-9);
        let boosted = scorer.score("very good").expect("score");
        assert!((boosted.score - 0.91).abs() < 1e-9);
    }

    #[test]
    fn test_polarity_stemming_fallback() {
        let scorer = PolarityScorer::with_lexicon(
            PolarityLexicon::from_pairs([("disappoint", -0.6)]),
            LabelThresholds::POLARITY,
            100,
        )
        .expect("scorer");
        assert!(scorer.score("so disappointing").expect("score").score < 0.0);
    }

    #[test]
    fn test_polarity_strict_boundary() {
        let scorer = PolarityScorer::with_lexicon(
            PolarityLexicon::from_pairs([("fine", 0.1)]),
            LabelThresholds::POLARITY,
            100,
        )
        .expect("scorer");
        assert_eq!(scorer.score("fine").expect("score").label, SentimentLabel::Neutral);
    }
}
