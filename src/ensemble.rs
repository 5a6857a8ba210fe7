//! Weighted combination of the two lexical scorers.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use tracing::warn;

use crate::config::EnsembleConfig;
use crate::metrics::MetricsCollector;
use crate::models::{DisagreementKind, EnsembleResult, ScorerOutcome, SentimentAnalysis, SentimentResult};
use crate::scorers::SentimentScorer;

/// Score gap above which a label disagreement counts as mixed sentiment
pub const MIXED_SENTIMENT_GAP: f64 = 0.5;

/// Classify a label disagreement between two scorer results
///
/// `None` when both scorers chose the same label.
#[must_use]
pub fn disagreement_kind(primary: &SentimentResult, secondary: &SentimentResult) -> Option<DisagreementKind> {
    if primary.label == secondary.label {
        return None;
    }

    if (primary.score - secondary.score).abs() > MIXED_SENTIMENT_GAP {
        Some(DisagreementKind::MixedSentiment)
    } else {
        Some(DisagreementKind::NearNeutralBoundary)
    }
}

/// Blend two scorer results into one verdict
///
/// Agreement shrinks confidence as the scores drift apart; a degraded scorer
/// should be passed in as [`SentimentResult::neutral`].
#[must_use]
pub fn combine(primary: &SentimentResult, secondary: &SentimentResult, config: &EnsembleConfig) -> EnsembleResult {
    let score = (primary.score * config.primary_weight + secondary.score * config.secondary_weight).clamp(-1.0, 1.0);
    let agreement = (1.0 - (primary.score - secondary.score).abs() / 2.0).clamp(0.0, 1.0);
    let confidence = (score.abs() * agreement).clamp(0.0, 1.0);

    EnsembleResult {
        score,
        label: config.thresholds.label(score),
        confidence,
        disagreement: disagreement_kind(primary, secondary),
    }
}

/// Runs both scorers on a text and combines them
#[derive(Clone)]
pub struct SentimentEnsemble {
    primary: Arc<dyn SentimentScorer>,
    secondary: Arc<dyn SentimentScorer>,
    config: EnsembleConfig,
    metrics: MetricsCollector,
}

impl SentimentEnsemble {
    /// Create an ensemble over two scorers
    #[must_use]
    pub fn new(primary: Arc<dyn SentimentScorer>, secondary: Arc<dyn SentimentScorer>, config: EnsembleConfig) -> Self {
        Self {
            primary,
            secondary,
            config,
            metrics: MetricsCollector::default(),
        }
    }

    /// Weights and thresholds in use
    #[must_use]
    pub const fn config(&self) -> &EnsembleConfig {
        &self.config
    }

    /// Score a text with both scorers
    ///
    /// Blank text is neutral without consulting the scorers. A scorer that
    /// errors or panics is reported as degraded and contributes a neutral zero.
    #[must_use]
    pub fn analyze(&self, text: &str) -> SentimentAnalysis {
        if text.trim().is_empty() {
            return SentimentAnalysis::neutral();
        }

        let primary = self.run_scorer(self.primary.as_ref(), text);
        let secondary = self.run_scorer(self.secondary.as_ref(), text);
        self.assemble(primary, secondary)
    }

    /// Combine two already-computed outcomes
    #[must_use]
    pub fn assemble(&self, primary: ScorerOutcome, secondary: ScorerOutcome) -> SentimentAnalysis {
        let ensemble = combine(&primary.result(), &secondary.result(), &self.config);
        SentimentAnalysis {
            primary,
            secondary,
            ensemble,
        }
    }

    /// Analysis used when scoring a message did not finish in time
    #[must_use]
    pub fn timed_out(&self) -> SentimentAnalysis {
        for scorer in [self.primary.name(), self.secondary.name()] {
            self.metrics.record_scorer_failure(scorer);
        }
        let reason = "timed out".to_string();
        self.assemble(
            ScorerOutcome::Degraded { reason: reason.clone() },
            ScorerOutcome::Degraded { reason },
        )
    }

    fn run_scorer(&self, scorer: &dyn SentimentScorer, text: &str) -> ScorerOutcome {
        let name = scorer.name();
        let reason = match catch_unwind(AssertUnwindSafe(|| scorer.score(text))) {
            Ok(Ok(result)) => return ScorerOutcome::Scored(result),
            Ok(Err(e)) => e.to_string(),
            Err(_) => "scorer panicked".to_string(),
        };

        warn!(scorer = name, reason = %reason, "Sentiment scorer degraded to neutral");
        self.metrics.record_scorer_failure(name);
        ScorerOutcome::Degraded { reason }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LabelThresholds, SentimentLabel};
    use proptest::prelude::*;

    fn result(score: f64, thresholds: &LabelThresholds) -> SentimentResult {
        SentimentResult::from_score(score, thresholds)
    }

    #[test]
    fn test_combine_weights() {
        let a = result(0.659, &LabelThresholds::COMPOUND);
        let b = result(1.0, &LabelThresholds::POLARITY);
        let combined = combine(&a, &b, &EnsembleConfig::default());
        assert!((combined.score - 0.7954).abs() < 1e-9);
        assert_eq!(combined.label, SentimentLabel::Positive);
        assert!(combined.disagreement.is_none());
    }

    #[test]
    fn test_confidence_shrinks_with_disagreement() {
        let config = EnsembleConfig::default();
        let agreeing = combine(
            &result(0.5, &LabelThresholds::COMPOUND),
            &result(0.5, &LabelThresholds::POLARITY),
            &config,
        );
        let diverging = combine(
            &result(0.9, &LabelThresholds::COMPOUND),
            &result(-0.1, &LabelThresholds::POLARITY),
            &config,
        );
        assert!((agreeing.confidence - 0.5).abs() < 1e-9);
        // score 0.5, agreement 0.5
        assert!((diverging.confidence - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_disagreement_kinds() {
        let mixed = disagreement_kind(
            &result(0.8, &LabelThresholds::COMPOUND),
            &result(-0.3, &LabelThresholds::POLARITY),
        );
        assert_eq!(mixed, Some(DisagreementKind::MixedSentiment));

        let boundary = disagreement_kind(
            &result(0.06, &LabelThresholds::COMPOUND),
            &result(0.06, &LabelThresholds::POLARITY),
        );
        assert_eq!(boundary, Some(DisagreementKind::NearNeutralBoundary));
    }

    proptest! {
        #[test]
        fn prop_combined_values_stay_in_range(a in -1.0f64..=1.0, b in -1.0f64..=1.0) {
            let combined = combine(
                &result(a, &LabelThresholds::COMPOUND),
                &result(b, &LabelThresholds::POLARITY),
                &EnsembleConfig::default(),
            );
            prop_assert!((-1.0..=1.0).contains(&combined.score));
            prop_assert!((0.0..=1.0).contains(&combined.confidence));
            prop_assert!((combined.score - (a * 0.6 + b * 0.4)).abs() < 1e-9);
        }

        #[test]
        fn prop_label_matches_thresholds(a in -1.0f64..=1.0, b in -1.0f64..=1.0) {
            let combined = combine(
                &result(a, &LabelThresholds::COMPOUND),
                &result(b, &LabelThresholds::POLARITY),
                &EnsembleConfig::default(),
            );
            let expected = if combined.score >= 0.05 {
                SentimentLabel::Positive
            } else if combined.score <= -0.05 {
                SentimentLabel::Negative
            } else {
                SentimentLabel::Neutral
            };
            prop_assert_eq!(combined.label, expected);
        }
    }
}
