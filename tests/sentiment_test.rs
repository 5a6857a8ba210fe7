//! Comprehensive unit tests for scorers.rs and ensemble.rs modules

use std::sync::Arc;

use chat_sentiment::config::EnsembleConfig;
use chat_sentiment::ensemble::{combine, disagreement_kind, SentimentEnsemble};
use chat_sentiment::error::ChatSentimentError;
use chat_sentiment::models::{DisagreementKind, LabelThresholds, ScorerOutcome, SentimentLabel, SentimentResult};
use chat_sentiment::scorers::{PolarityScorer, SentimentScorer, ValenceScorer};
use mockall::mock;
use proptest::prelude::*;

mock! {
    pub Scorer {}
    impl SentimentScorer for Scorer {
        fn name(&self) -> &'static str;
        fn score(&self, text: &str) -> chat_sentiment::Result<SentimentResult>;
    }
}

struct PanickingScorer;

impl SentimentScorer for PanickingScorer {
    fn name(&self) -> &'static str {
        "panicking"
    }

    fn score(&self, _text: &str) -> chat_sentiment::Result<SentimentResult> {
        panic!("scorer exploded")
    }
}

fn valence() -> ValenceScorer {
    ValenceScorer::new(LabelThresholds::COMPOUND, 10_000).expect("Failed to create valence scorer")
}

fn polarity() -> PolarityScorer {
    PolarityScorer::new(LabelThresholds::POLARITY, 10_000).expect("Failed to create polarity scorer")
}

fn fixed(name: &'static str, score: f64) -> MockScorer {
    let mut scorer = MockScorer::new();
    scorer.expect_name().return_const(name);
    scorer
        .expect_score()
        .returning(move |_| Ok(SentimentResult::from_score(score, &LabelThresholds::COMPOUND)));
    scorer
}

#[test]
fn test_scorer_names() {
    assert_eq!(valence().name(), "valence");
    assert_eq!(polarity().name(), "polarity");
}

#[test]
fn test_builtin_scorers_through_ensemble() {
    let ensemble = SentimentEnsemble::new(Arc::new(valence()), Arc::new(polarity()), EnsembleConfig::default());

    let positive = ensemble.analyze("This is awesome!");
    assert!((positive.ensemble.score - 0.7953).abs() < 1e-3, "got {}", positive.ensemble.score);
    assert_eq!(positive.ensemble.label, SentimentLabel::Positive);
    assert!(positive.ensemble.disagreement.is_none());

    let negative = ensemble.analyze("This is terrible.");
    assert_eq!(negative.ensemble.label, SentimentLabel::Negative);
    assert_eq!(negative.primary.result().label, SentimentLabel::Negative);
    assert_eq!(negative.secondary.result().label, SentimentLabel::Negative);
}

#[test]
fn test_overlong_text_degrades_both_scorers() {
    let ensemble = SentimentEnsemble::new(
        Arc::new(ValenceScorer::new(LabelThresholds::COMPOUND, 5).expect("scorer")),
        Arc::new(PolarityScorer::new(LabelThresholds::POLARITY, 5).expect("scorer")),
        EnsembleConfig::default(),
    );

    let analysis = ensemble.analyze("far too long");
    assert_eq!(analysis.degraded_count(), 2);
    assert!(matches!(analysis.primary, ScorerOutcome::Degraded { ref reason } if reason.contains("too long")));
    assert_eq!(analysis.ensemble.label, SentimentLabel::Neutral);
}

#[test]
fn test_scores_stay_in_range() {
    let text = "AMAZING!!! best best best love love love wonderful perfect!!!";
    let v = valence().score(text).expect("score");
    let p = polarity().score(text).expect("score");
    assert!((-1.0..=1.0).contains(&v.score));
    assert!((-1.0..=1.0).contains(&p.score));
}

#[test]
fn test_combine_weighted_average() {
    let primary = SentimentResult::from_score(0.6588, &LabelThresholds::COMPOUND);
    let secondary = SentimentResult::from_score(1.0, &LabelThresholds::POLARITY);
    let result = combine(&primary, &secondary, &EnsembleConfig::default());

    assert!((result.score - 0.79528).abs() < 1e-4);
    assert_eq!(result.label, SentimentLabel::Positive);
    assert!(result.disagreement.is_none());
}

#[test]
fn test_disagreement_kinds() {
    let positive = SentimentResult::from_score(0.6, &LabelThresholds::COMPOUND);
    let negative = SentimentResult::from_score(-0.6, &LabelThresholds::COMPOUND);
    let slightly = SentimentResult::from_score(0.06, &LabelThresholds::COMPOUND);
    let neutral = SentimentResult::from_score(0.0, &LabelThresholds::COMPOUND);

    assert_eq!(disagreement_kind(&positive, &negative), Some(DisagreementKind::MixedSentiment));
    assert_eq!(disagreement_kind(&slightly, &neutral), Some(DisagreementKind::NearNeutralBoundary));
    assert_eq!(disagreement_kind(&positive, &positive), None);
}

#[test]
fn test_ensemble_with_mock_scorers() {
    let ensemble = SentimentEnsemble::new(
        Arc::new(fixed("first", 0.5)),
        Arc::new(fixed("second", 0.5)),
        EnsembleConfig::default(),
    );

    let analysis = ensemble.analyze("anything");
    assert!((analysis.ensemble.score - 0.5).abs() < 1e-9);
    assert!((analysis.ensemble.confidence - 0.5).abs() < 1e-9);
    assert_eq!(analysis.degraded_count(), 0);
}

#[test]
fn test_blank_text_skips_scorers() {
    let mut primary = MockScorer::new();
    primary.expect_name().return_const("first");
    primary.expect_score().never();
    let mut secondary = MockScorer::new();
    secondary.expect_name().return_const("second");
    secondary.expect_score().never();

    let ensemble = SentimentEnsemble::new(Arc::new(primary), Arc::new(secondary), EnsembleConfig::default());
    let analysis = ensemble.analyze("   ");
    assert_eq!(analysis.ensemble.label, SentimentLabel::Neutral);
    assert!(analysis.ensemble.score.abs() < f64::EPSILON);
}

#[test]
fn test_failing_scorer_degrades_to_neutral() {
    let mut broken = MockScorer::new();
    broken.expect_name().return_const("broken");
    broken.expect_score().returning(|_| {
        Err(ChatSentimentError::Scorer {
            scorer: "broken",
            reason: "model unavailable".to_string(),
        })
    });

    let ensemble = SentimentEnsemble::new(
        Arc::new(broken),
        Arc::new(fixed("second", 1.0)),
        EnsembleConfig::default(),
    );
    let analysis = ensemble.analyze("text");

    assert!(analysis.primary.is_degraded());
    assert!(!analysis.secondary.is_degraded());
    assert!((analysis.ensemble.score - 0.4).abs() < 1e-9);
    assert_eq!(analysis.degraded_count(), 1);
}

#[test]
fn test_panicking_scorer_degrades_to_neutral() {
    let ensemble = SentimentEnsemble::new(
        Arc::new(fixed("first", -1.0)),
        Arc::new(PanickingScorer),
        EnsembleConfig::default(),
    );
    let analysis = ensemble.analyze("text");

    assert!(matches!(analysis.secondary, ScorerOutcome::Degraded { ref reason } if reason == "scorer panicked"));
    assert!((analysis.ensemble.score + 0.6).abs() < 1e-9);
    assert_eq!(analysis.ensemble.label, SentimentLabel::Negative);
}

#[test]
fn test_timed_out_is_fully_degraded() {
    let ensemble = SentimentEnsemble::new(
        Arc::new(fixed("first", 1.0)),
        Arc::new(fixed("second", 1.0)),
        EnsembleConfig::default(),
    );
    let analysis = ensemble.timed_out();
    assert_eq!(analysis.degraded_count(), 2);
    assert_eq!(analysis.ensemble.label, SentimentLabel::Neutral);
}

proptest! {
    #[test]
    fn test_combined_score_is_bounded(a in -1.0f64..=1.0, b in -1.0f64..=1.0) {
        let primary = SentimentResult::from_score(a, &LabelThresholds::COMPOUND);
        let secondary = SentimentResult::from_score(b, &LabelThresholds::POLARITY);
        let result = combine(&primary, &secondary, &EnsembleConfig::default());

        prop_assert!((-1.0..=1.0).contains(&result.score));
        prop_assert!((0.0..=1.0).contains(&result.confidence));
        prop_assert!(result.confidence <= result.score.abs() + 1e-12);
    }
}
