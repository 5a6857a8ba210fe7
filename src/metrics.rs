use anyhow::Result;
use metrics::{counter, gauge, histogram};
use std::time::Duration;

/// Metrics collection and management
#[derive(Debug, Clone)]
pub struct MetricsCollector {
    // Parser metrics
    /// Lines the parser could not attach
    pub lines_failed_total: &'static str,
    /// Timestamps kept raw
    pub unparsed_timestamps_total: &'static str,

    // Message analysis metrics
    /// Messages analyzed
    pub messages_analyzed_total: &'static str,
    /// Messages skipped after a failure
    pub messages_failed_total: &'static str,
    /// Run duration in seconds
    pub analysis_duration: &'static str,
    /// Ensemble score distribution
    pub ensemble_scores: &'static str,

    // Scorer metrics
    /// Scorer calls that degraded, by scorer
    pub scorer_degraded_total: &'static str,

    // Job metrics
    /// Job state transitions, by status
    pub jobs_total: &'static str,
    /// Jobs currently processing
    pub jobs_in_flight: &'static str,

    // Export metrics
    /// Exports written, by format
    pub export_operations_total: &'static str,
    /// Export duration in seconds
    pub export_duration: &'static str,
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self {
            lines_failed_total: "chat_sentiment_lines_failed_total",
            unparsed_timestamps_total: "chat_sentiment_unparsed_timestamps_total",

            messages_analyzed_total: "chat_sentiment_messages_analyzed_total",
            messages_failed_total: "chat_sentiment_messages_failed_total",
            analysis_duration: "chat_sentiment_analysis_duration_seconds",
            ensemble_scores: "chat_sentiment_ensemble_scores",

            scorer_degraded_total: "chat_sentiment_scorer_degraded_total",

            jobs_total: "chat_sentiment_jobs_total",
            jobs_in_flight: "chat_sentiment_jobs_in_flight",

            export_operations_total: "chat_sentiment_export_operations_total",
            export_duration: "chat_sentiment_export_duration_seconds",
        }
    }
}

impl MetricsCollector {
    /// Install a no-op global recorder
    ///
    /// Fails if a recorder is already installed.
    pub fn init() -> Result<()> {
        metrics::set_global_recorder(metrics::NoopRecorder)
            .map_err(|_| anyhow::anyhow!("Failed to initialize metrics recorder: already installed"))?;

        Ok(())
    }

    /// Record the outcome of parsing one export
    pub fn record_parse(&self, failed_lines: usize, unparsed_timestamps: usize) {
        counter!(self.lines_failed_total).increment(failed_lines as u64);
        counter!(self.unparsed_timestamps_total).increment(unparsed_timestamps as u64);
    }

    /// Record a finished analysis run
    pub fn record_message_analysis(&self, analyzed: usize, failed: usize, duration: Duration) {
        counter!(self.messages_analyzed_total).increment(analyzed as u64);
        counter!(self.messages_failed_total).increment(failed as u64);
        histogram!(self.analysis_duration).record(duration.as_secs_f64());
    }

    /// Record one ensemble score
    pub fn record_sentiment(&self, score: f64) {
        histogram!(self.ensemble_scores).record(score);
    }

    /// Record a scorer call that degraded to neutral
    pub fn record_scorer_failure(&self, scorer: &str) {
        counter!(self.scorer_degraded_total, "scorer" => scorer.to_string()).increment(1);
    }

    /// Record a job reaching `status`
    pub fn record_job(&self, status: &str) {
        counter!(self.jobs_total, "status" => status.to_string()).increment(1);
    }

    /// Update the number of jobs currently processing
    pub fn set_jobs_in_flight(&self, count: usize) {
        gauge!(self.jobs_in_flight).set(count as f64);
    }

    /// Record export operation metrics
    pub fn record_export_operation(&self, format: &str, duration: Duration) {
        counter!(self.export_operations_total, "format" => format.to_string()).increment(1);
        histogram!(self.export_duration).record(duration.as_secs_f64());
    }
}
