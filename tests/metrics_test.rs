//! Comprehensive unit tests for metrics.rs and logging.rs modules

use std::time::Duration;

use chat_sentiment::logging::OperationTimer;
use chat_sentiment::metrics::MetricsCollector;

#[test]
fn test_metrics_collector_default_names() {
    let collector = MetricsCollector::default();
    assert_eq!(collector.lines_failed_total, "chat_sentiment_lines_failed_total");
    assert_eq!(collector.messages_analyzed_total, "chat_sentiment_messages_analyzed_total");
    assert_eq!(collector.scorer_degraded_total, "chat_sentiment_scorer_degraded_total");
    assert_eq!(collector.jobs_total, "chat_sentiment_jobs_total");
    assert_eq!(collector.export_operations_total, "chat_sentiment_export_operations_total");
}

#[test]
fn test_metric_names_share_prefix() {
    let collector = MetricsCollector::default();
    let names = [
        collector.lines_failed_total,
        collector.unparsed_timestamps_total,
        collector.messages_analyzed_total,
        collector.messages_failed_total,
        collector.analysis_duration,
        collector.ensemble_scores,
        collector.scorer_degraded_total,
        collector.jobs_total,
        collector.jobs_in_flight,
        collector.export_operations_total,
        collector.export_duration,
    ];
    assert!(names.iter().all(|name| name.starts_with("chat_sentiment_")));
}

#[test]
fn test_metrics_init_is_once_only() {
    // A recorder may already be installed by another test; a second install always fails
    let _ = MetricsCollector::init();
    assert!(MetricsCollector::init().is_err());
}

#[test]
fn test_recording_all_metrics() {
    let collector = MetricsCollector::default();
    collector.record_parse(2, 1);
    collector.record_message_analysis(10, 1, Duration::from_millis(150));
    collector.record_sentiment(0.42);
    collector.record_scorer_failure("valence");
    collector.record_job("completed");
    collector.set_jobs_in_flight(3);
    collector.record_export_operation("csv", Duration::from_millis(5));
}

#[test]
fn test_operation_timer() {
    let timer = OperationTimer::new("test_operation");
    std::thread::sleep(Duration::from_millis(10));
    assert!(timer.elapsed() >= Duration::from_millis(10));
    assert!(timer.finish() >= 10);
}
