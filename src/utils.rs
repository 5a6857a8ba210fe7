//! Utility functions for message processing.
//!
//! This module provides shared counting and rounding helpers used by the
//! keyword, emoji and aggregate stages.

use std::collections::HashMap;

use crate::models::RankedCount;

/// Counts occurrences while remembering the order values were first seen.
///
/// Ranking is stable: values with equal counts keep first-seen order.
#[derive(Debug, Clone, Default)]
pub struct FrequencyCounter {
    order: Vec<String>,
    counts: HashMap<String, usize>,
}

impl FrequencyCounter {
    /// Create an empty counter
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one occurrence of `value`
    pub fn add(&mut self, value: &str) {
        if let Some(count) = self.counts.get_mut(value) {
            *count += 1;
        } else {
            self.order.push(value.to_string());
            self.counts.insert(value.to_string(), 1);
        }
    }

    /// Count every item of an iterator
    pub fn extend<I, S>(&mut self, values: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for value in values {
            self.add(value.as_ref());
        }
    }

    /// Occurrences of `value`
    #[must_use]
    pub fn count(&self, value: &str) -> usize {
        self.counts.get(value).copied().unwrap_or(0)
    }

    /// Number of distinct values
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// True when nothing was counted
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Most frequent values.
    ///
    /// # Arguments
    ///
    /// * `n` - Maximum number of entries to return
    ///
    /// # Returns
    ///
    /// Up to `n` entries sorted by descending count, ties in first-seen order.
    #[must_use]
    pub fn most_common(&self, n: usize) -> Vec<RankedCount> {
        let mut ranked: Vec<RankedCount> = self
            .order
            .iter()
            .map(|value| RankedCount {
                value: value.clone(),
                count: self.count(value),
            })
            .collect();

        // sort_by is stable, so equal counts stay in insertion order
        ranked.sort_by(|a, b| b.count.cmp(&a.count));
        ranked.truncate(n);
        ranked
    }
}

/// Round to two decimal places.
#[must_use]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Round to three decimal places.
#[must_use]
pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
