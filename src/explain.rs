//! Human-readable explanations of sentiment verdicts.
//!
//! An [`Explanation`] shows what each scorer concluded and how sure it was,
//! whether the scorers disagreed and why that might be, and which words in
//! the text pushed the verdict one way or the other.

use std::collections::HashSet;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config::{ExplainConfig, SentimentConfig};
use crate::ensemble::disagreement_kind;
use crate::error::Result;
use crate::models::{DisagreementKind, LabelThresholds, ScorerOutcome, SentimentAnalysis, SentimentLabel, SentimentResult};
use crate::utils::{round2, round3};

/// Characters of the analyzed text quoted in an explanation
const PREVIEW_CHARS: usize = 100;

const PRIMARY_MODEL: &str = "Valence model";
const SECONDARY_MODEL: &str = "Polarity model";

/// Two scorers chose different labels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Disagreement {
    /// Label of the valence scorer
    pub primary_label: SentimentLabel,
    /// Label of the polarity scorer
    pub secondary_label: SentimentLabel,
    /// Likely cause
    pub kind: DisagreementKind,
    /// Human-readable cause
    pub possible_reason: String,
    /// What to do about it
    pub recommendation: String,
}

/// What one model concluded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelExplanation {
    /// Model score
    pub score: f64,
    /// Confidence derived from the score's magnitude
    pub confidence: f64,
    /// Model label
    pub label: SentimentLabel,
    /// One-sentence narrative
    pub explanation: String,
    /// Set when the model could not score the text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub degraded: Option<String>,
}

/// Narratives for both scorers and the ensemble
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerModelAnalysis {
    /// Valence scorer
    pub primary: ModelExplanation,
    /// Polarity scorer
    pub secondary: ModelExplanation,
    /// Weighted ensemble
    pub ensemble: ModelExplanation,
}

/// Bucketed agreement between the scorers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceLevel {
    /// Agreement above 0.8
    High,
    /// Agreement above 0.5
    Medium,
    /// Anything lower
    Low,
}

impl ConfidenceLevel {
    /// `> 0.8` high, `> 0.5` medium, low otherwise
    #[must_use]
    pub fn from_agreement(agreement: f64) -> Self {
        if agreement > 0.8 {
            Self::High
        } else if agreement > 0.5 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    /// Advice shown alongside the level
    #[must_use]
    pub const fn recommendation(&self) -> &'static str {
        match self {
            Self::High => "High confidence - reliable sentiment classification",
            Self::Medium => "Medium confidence - generally reliable with some uncertainty",
            Self::Low => "Low confidence - consider manual verification for this message",
        }
    }
}

/// How far the scorers agree and how much to trust the verdict
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceMetrics {
    /// `1 - |primary - secondary| / 2`
    pub model_agreement_score: f64,
    /// Bucketed agreement
    pub overall_confidence_level: ConfidenceLevel,
    /// Confidence of the valence scorer
    pub primary_confidence: f64,
    /// Confidence of the polarity scorer
    pub secondary_confidence: f64,
    /// Confidence of the ensemble
    pub ensemble_confidence: f64,
    /// Advice for the confidence level
    pub recommendation: String,
}

/// Indicator words found in the text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportantWords {
    /// Positive indicators in text order
    pub positive_indicators: Vec<String>,
    /// Negative indicators in text order
    pub negative_indicators: Vec<String>,
}

/// The ensemble's verdict
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FinalVerdict {
    /// Ensemble label
    pub sentiment: SentimentLabel,
    /// Ensemble score
    pub score: f64,
    /// Agreement-scaled ensemble confidence
    pub confidence: f64,
}

/// Complete rationale for one message's verdict
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Explanation {
    /// Start of the explained text
    pub text_preview: String,
    /// Per-model narratives
    pub per_model_analysis: PerModelAnalysis,
    /// Set when the scorers chose different labels
    pub disagreement: Option<Disagreement>,
    /// Agreement and confidence figures
    pub confidence_metrics: ConfidenceMetrics,
    /// Indicator words
    pub important_words: ImportantWords,
    /// Ensemble verdict
    pub final_verdict: FinalVerdict,
}

/// Which indicator word list to match against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorCategory {
    /// Positive indicator words
    Positive,
    /// Negative indicator words
    Negative,
    /// Neutral indicator words
    Neutral,
}

/// Confidence of a single score: distance from zero, scaled by 1.2 and capped
#[must_use]
pub fn model_confidence(score: f64) -> f64 {
    round2((score.abs() * 1.2).min(1.0))
}

/// `round2(max(0, 1 - |a - b| / 2))`
#[must_use]
pub fn agreement_score(primary: f64, secondary: f64) -> f64 {
    round2((1.0 - (primary - secondary).abs() / 2.0).max(0.0))
}

fn strength(confidence: f64) -> &'static str {
    if confidence > 0.7 {
        "strongly"
    } else if confidence > 0.4 {
        "moderately"
    } else {
        "slightly"
    }
}

/// Compare two scorer results; `None` when their labels agree
#[must_use]
pub fn find_disagreement(primary: &SentimentResult, secondary: &SentimentResult) -> Option<Disagreement> {
    let kind = disagreement_kind(primary, secondary)?;
    let possible_reason = match kind {
        DisagreementKind::MixedSentiment => {
            "Large difference in scores suggests mixed or complex sentiment. \
             Text may contain sarcasm, irony, or both positive and negative elements."
        }
        DisagreementKind::NearNeutralBoundary => {
            "Models are close but on opposite sides of neutral. \
             Text likely has subtle sentiment indicators that differ in interpretation."
        }
    };

    Some(Disagreement {
        primary_label: primary.label,
        secondary_label: secondary.label,
        kind,
        possible_reason: possible_reason.to_string(),
        recommendation: "Manual review recommended for this message".to_string(),
    })
}

/// Builds explanations from analyses
#[derive(Debug, Clone)]
pub struct Explainer {
    positive_words: HashSet<String>,
    negative_words: HashSet<String>,
    neutral_words: HashSet<String>,
    max_important_words: usize,
    primary_thresholds: LabelThresholds,
    secondary_thresholds: LabelThresholds,
    primary_weight: f64,
    secondary_weight: f64,
    word_regex: Regex,
}

impl Explainer {
    /// Explainer over the configured indicator words and scorer settings
    pub fn new(explain: &ExplainConfig, sentiment: &SentimentConfig) -> Result<Self> {
        let to_set = |words: &[String]| words.iter().map(|w| w.to_lowercase()).collect::<HashSet<_>>();

        Ok(Self {
            positive_words: to_set(&explain.positive_words),
            negative_words: to_set(&explain.negative_words),
            neutral_words: to_set(&explain.neutral_words),
            max_important_words: explain.max_important_words,
            primary_thresholds: sentiment.primary_thresholds,
            secondary_thresholds: sentiment.secondary_thresholds,
            primary_weight: sentiment.ensemble.primary_weight,
            secondary_weight: sentiment.ensemble.secondary_weight,
            word_regex: Regex::new(r"\b[a-z]+\b")?,
        })
    }

    /// Compare two raw scores, labelling each with its own scorer's thresholds
    #[must_use]
    pub fn find_disagreement_scores(&self, primary: f64, secondary: f64) -> Option<Disagreement> {
        find_disagreement(
            &SentimentResult::from_score(primary, &self.primary_thresholds),
            &SentimentResult::from_score(secondary, &self.secondary_thresholds),
        )
    }

    /// Indicator words of one category in text order, duplicates kept
    #[must_use]
    pub fn important_words(&self, text: &str, category: IndicatorCategory) -> Vec<String> {
        let words = match category {
            IndicatorCategory::Positive => &self.positive_words,
            IndicatorCategory::Negative => &self.negative_words,
            IndicatorCategory::Neutral => &self.neutral_words,
        };

        self.word_regex
            .find_iter(&text.to_lowercase())
            .map(|m| m.as_str())
            .filter(|word| words.contains(*word))
            .take(self.max_important_words)
            .map(ToString::to_string)
            .collect()
    }

    /// Agreement, bucketed level and per-model confidences
    #[must_use]
    pub fn confidence_metrics(&self, analysis: &SentimentAnalysis) -> ConfidenceMetrics {
        let primary = analysis.primary.result().score;
        let secondary = analysis.secondary.result().score;
        let agreement = agreement_score(primary, secondary);
        let level = ConfidenceLevel::from_agreement(agreement);

        ConfidenceMetrics {
            model_agreement_score: agreement,
            overall_confidence_level: level,
            primary_confidence: model_confidence(primary),
            secondary_confidence: model_confidence(secondary),
            ensemble_confidence: model_confidence(analysis.ensemble.score),
            recommendation: level.recommendation().to_string(),
        }
    }

    /// Full explanation of `analysis`, which must have been computed for `text`
    #[must_use]
    pub fn explain(&self, text: &str, analysis: &SentimentAnalysis) -> Explanation {
        let primary = analysis.primary.result();
        let secondary = analysis.secondary.result();
        let ensemble = &analysis.ensemble;

        let per_model_analysis = PerModelAnalysis {
            primary: model_explanation(PRIMARY_MODEL, &analysis.primary, primary_narrative),
            secondary: model_explanation(SECONDARY_MODEL, &analysis.secondary, secondary_narrative),
            ensemble: ModelExplanation {
                score: round3(ensemble.score),
                confidence: model_confidence(ensemble.score),
                label: ensemble.label,
                explanation: format!(
                    "Weighted combination of the valence model ({:.0}%) and the polarity model ({:.0}%)",
                    self.primary_weight * 100.0,
                    self.secondary_weight * 100.0
                ),
                degraded: None,
            },
        };

        Explanation {
            text_preview: text.chars().take(PREVIEW_CHARS).collect(),
            per_model_analysis,
            disagreement: find_disagreement(&primary, &secondary),
            confidence_metrics: self.confidence_metrics(analysis),
            important_words: ImportantWords {
                positive_indicators: self.important_words(text, IndicatorCategory::Positive),
                negative_indicators: self.important_words(text, IndicatorCategory::Negative),
            },
            final_verdict: FinalVerdict {
                sentiment: ensemble.label,
                score: ensemble.score,
                confidence: ensemble.confidence,
            },
        }
    }
}

fn model_explanation(
    model: &str,
    outcome: &ScorerOutcome,
    narrative: fn(&str, &SentimentResult) -> String,
) -> ModelExplanation {
    let result = outcome.result();
    let (explanation, degraded) = match outcome {
        ScorerOutcome::Scored(result) => (narrative(model, result), None),
        ScorerOutcome::Degraded { reason } => (
            format!("{model} could not score this text ({reason}); treated as neutral."),
            Some(reason.clone()),
        ),
    };

    ModelExplanation {
        score: round3(result.score),
        confidence: model_confidence(result.score),
        label: result.label,
        explanation,
        degraded,
    }
}

fn primary_narrative(model: &str, result: &SentimentResult) -> String {
    let strength = strength(model_confidence(result.score));
    let score = result.score;
    match result.label {
        SentimentLabel::Positive => format!(
            "{model} {strength} detects positive sentiment ({score:.2}). \
             Positive words, emphasis and punctuation outweigh negative cues."
        ),
        SentimentLabel::Negative => format!(
            "{model} {strength} detects negative sentiment ({score:.2}). \
             Negative words and intensifying punctuation dominate."
        ),
        SentimentLabel::Neutral => format!(
            "{model} detects neutral sentiment ({score:.2}). \
             Sentiment cues are mixed or absent."
        ),
    }
}

fn secondary_narrative(model: &str, result: &SentimentResult) -> String {
    let strength = strength(model_confidence(result.score));
    let score = result.score;
    match result.label {
        SentimentLabel::Positive => format!(
            "{model} {strength} detects positive sentiment ({score:.2}). \
             Average word polarity leans positive."
        ),
        SentimentLabel::Negative => format!(
            "{model} {strength} detects negative sentiment ({score:.2}). \
             Negative modifiers and sentiment-bearing words pull the average down."
        ),
        SentimentLabel::Neutral => format!(
            "{model} detects neutral sentiment ({score:.2}). \
             Text appears objective or lacks emotional indicators."
        ),
    }
}
