//! Run-level statistics over analyzed messages.

use std::collections::BTreeMap;

use crate::language::UNKNOWN_LANGUAGE;
use crate::models::{
    AnalyzedMessage, DisagreementEntry, DisagreementReport, EmojiUsage, EmotionDistribution, LabelStats,
    LabelThresholds, MessageType, OverallSentiment, RankedCount, SenderSentiment, SentimentLabel,
};
use crate::utils::FrequencyCounter;

/// Characters of message text kept in a disagreement entry
pub const DISAGREEMENT_TEXT_CHARS: usize = 100;

/// Attachment placeholders carry no text worth aggregating
fn has_content(message: &AnalyzedMessage) -> bool {
    message.annotation.message_type != MessageType::Media
}

/// Mean ensemble score over messages with content
#[must_use]
pub fn overall_sentiment(messages: &[AnalyzedMessage], thresholds: &LabelThresholds) -> OverallSentiment {
    let scores: Vec<f64> = messages
        .iter()
        .filter(|m| has_content(m))
        .map(|m| m.annotation.sentiment.ensemble.score)
        .collect();

    let score = if scores.is_empty() {
        0.0
    } else {
        scores.iter().sum::<f64>() / scores.len() as f64
    };

    OverallSentiment {
        score,
        label: thresholds.label(score),
        scored_messages: scores.len(),
    }
}

/// Mean of per-message emotion percentages over messages with content
///
/// `zero` provides the full set of emotion names.
#[must_use]
pub fn emotion_distribution(messages: &[AnalyzedMessage], zero: EmotionDistribution) -> EmotionDistribution {
    let mut totals = zero;
    let mut count = 0usize;

    for message in messages.iter().filter(|m| has_content(m)) {
        count += 1;
        for (emotion, value) in &message.annotation.emotions {
            *totals.entry(emotion.clone()).or_insert(0.0) += value;
        }
    }

    if count > 0 {
        for value in totals.values_mut() {
            *value /= count as f64;
        }
    }
    totals
}

/// Percentage of messages per language and the most common language
#[must_use]
pub fn language_distribution(messages: &[AnalyzedMessage]) -> (BTreeMap<String, f64>, Option<String>) {
    let mut counter = FrequencyCounter::new();
    for message in messages.iter().filter(|m| has_content(m) && !m.message.trim().is_empty()) {
        counter.add(message.annotation.language.as_deref().unwrap_or(UNKNOWN_LANGUAGE));
    }

    let ranked = counter.most_common(counter.len());
    let total: usize = ranked.iter().map(|r| r.count).sum();
    if total == 0 {
        return (BTreeMap::new(), None);
    }

    let distribution = ranked
        .iter()
        .map(|r| (r.value.clone(), r.count as f64 / total as f64 * 100.0))
        .collect();
    let primary = ranked.first().map(|r| r.value.clone());
    (distribution, primary)
}

/// Messages per content shape
#[must_use]
pub fn message_type_distribution(messages: &[AnalyzedMessage]) -> BTreeMap<MessageType, usize> {
    let mut distribution = BTreeMap::new();
    for message in messages {
        *distribution.entry(message.annotation.message_type).or_insert(0) += 1;
    }
    distribution
}

/// Senders with the most messages
#[must_use]
pub fn most_active_senders(messages: &[AnalyzedMessage], n: usize) -> Vec<RankedCount> {
    let mut counter = FrequencyCounter::new();
    counter.extend(messages.iter().map(|m| m.sender.as_str()));
    counter.most_common(n)
}

/// Most used emoji across all messages
#[must_use]
pub fn top_emojis(messages: &[AnalyzedMessage], n: usize) -> Vec<RankedCount> {
    let mut counter = FrequencyCounter::new();
    for message in messages {
        counter.extend(&message.annotation.emojis);
    }
    counter.most_common(n)
}

/// Message count and mean ensemble score per ensemble label
///
/// Labels with no messages are absent.
#[must_use]
pub fn sentiment_distribution(messages: &[AnalyzedMessage]) -> BTreeMap<SentimentLabel, LabelStats> {
    let mut sums: BTreeMap<SentimentLabel, (usize, f64)> = BTreeMap::new();
    for message in messages.iter().filter(|m| has_content(m)) {
        let ensemble = &message.annotation.sentiment.ensemble;
        let entry = sums.entry(ensemble.label).or_insert((0, 0.0));
        entry.0 += 1;
        entry.1 += ensemble.score;
    }

    sums.into_iter()
        .map(|(label, (count, total))| {
            (
                label,
                LabelStats {
                    count,
                    mean_score: total / count as f64,
                },
            )
        })
        .collect()
}

/// Most active senders with the mean ensemble score of their scored messages
///
/// A sender who only sent media has a mean of zero.
#[must_use]
pub fn sender_sentiment(messages: &[AnalyzedMessage], n: usize) -> Vec<SenderSentiment> {
    most_active_senders(messages, n)
        .into_iter()
        .map(|ranked| {
            let scores: Vec<f64> = messages
                .iter()
                .filter(|m| m.sender == ranked.value && has_content(m))
                .map(|m| m.annotation.sentiment.ensemble.score)
                .collect();
            let mean_sentiment = if scores.is_empty() {
                0.0
            } else {
                scores.iter().sum::<f64>() / scores.len() as f64
            };
            SenderSentiment {
                sender: ranked.value,
                messages: ranked.count,
                mean_sentiment,
            }
        })
        .collect()
}

/// Messages whose scorer labels differ, or whose primary label differs from the ensemble
///
/// Only messages where both scorers produced a result are compared.
#[must_use]
pub fn disagreement_report(messages: &[AnalyzedMessage]) -> DisagreementReport {
    let mut report = DisagreementReport::default();

    for message in messages.iter().filter(|m| has_content(m)) {
        let sentiment = &message.annotation.sentiment;
        if sentiment.degraded_count() > 0 {
            continue;
        }
        report.compared_messages += 1;

        let primary = sentiment.primary.result();
        let secondary = sentiment.secondary.result();
        if primary.label == secondary.label && primary.label == sentiment.ensemble.label {
            continue;
        }

        report.messages.push(DisagreementEntry {
            index: message.index,
            sender: message.sender.clone(),
            text: message.message.chars().take(DISAGREEMENT_TEXT_CHARS).collect(),
            primary,
            secondary,
            ensemble: sentiment.ensemble,
        });
    }

    report.count = report.messages.len();
    if report.compared_messages > 0 {
        report.rate = report.count as f64 / report.compared_messages as f64 * 100.0;
    }
    report
}

/// Emoji totals and each sender's emoji, most used first
#[must_use]
pub fn emoji_usage(messages: &[AnalyzedMessage]) -> EmojiUsage {
    let mut overall = FrequencyCounter::new();
    let mut per_sender: BTreeMap<&str, FrequencyCounter> = BTreeMap::new();

    for message in messages.iter().filter(|m| !m.annotation.emojis.is_empty()) {
        overall.extend(&message.annotation.emojis);
        per_sender
            .entry(message.sender.as_str())
            .or_default()
            .extend(&message.annotation.emojis);
    }

    EmojiUsage {
        total: messages.iter().map(|m| m.annotation.emojis.len()).sum(),
        unique: overall.len(),
        by_sender: per_sender
            .into_iter()
            .map(|(sender, counter)| {
                let ranked = counter.most_common(counter.len()).into_iter().map(|r| r.value).collect();
                (sender.to_string(), ranked)
            })
            .collect(),
    }
}

/// `"Summary topics: a, b, ..."` from the most frequent whitespace tokens
///
/// Empty when there is no text to summarize.
#[must_use]
pub fn topic_summary(messages: &[AnalyzedMessage], topics: usize) -> String {
    let mut counter = FrequencyCounter::new();
    for message in messages.iter().filter(|m| has_content(m)) {
        counter.extend(message.message.to_lowercase().split_whitespace());
    }

    if counter.is_empty() {
        return String::new();
    }

    let terms: Vec<String> = counter.most_common(topics).into_iter().map(|r| r.value).collect();
    format!("Summary topics: {}", terms.join(", "))
}
