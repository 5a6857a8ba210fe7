//! Whole-export analysis: parse, annotate every message, aggregate.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::aggregate;
use crate::config::{AppConfig, JobConfig};
use crate::error::{ChatSentimentError, Result};
use crate::logging::OperationTimer;
use crate::metrics::MetricsCollector;
use crate::models::{AnalyzedMessage, ChatAnalysis, MessageAnnotation, ParseDiagnostics, ParsedMessage};
use crate::nlp::NlpProcessor;
use crate::parser::{ChatParser, ParseOutcome};

/// Knobs for concurrent analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalyzeOptions {
    /// Messages scored at the same time
    pub max_concurrency: usize,
    /// Time allowed for scoring one message
    pub scorer_timeout: Duration,
}

impl AnalyzeOptions {
    /// Options from the job settings
    #[must_use]
    pub const fn from_config(config: &JobConfig) -> Self {
        Self {
            max_concurrency: config.max_concurrent_messages,
            scorer_timeout: Duration::from_millis(config.scorer_timeout_ms),
        }
    }
}

impl Default for AnalyzeOptions {
    fn default() -> Self {
        Self::from_config(&AppConfig::default().jobs)
    }
}

/// Analyzes complete chat exports
pub struct ChatAnalyzer {
    parser: ChatParser,
    processor: NlpProcessor,
    config: AppConfig,
    metrics: MetricsCollector,
}

impl ChatAnalyzer {
    /// Analyzer with the built-in scorers
    pub fn new(config: AppConfig) -> Result<Self> {
        let processor = NlpProcessor::new(&config.nlp.processing_version, &config)?;
        Self::with_processor(config, processor)
    }

    /// Analyzer around a prepared processor
    pub fn with_processor(config: AppConfig, processor: NlpProcessor) -> Result<Self> {
        Ok(Self {
            parser: ChatParser::new()?,
            processor,
            config,
            metrics: MetricsCollector::default(),
        })
    }

    /// The per-message processor
    #[must_use]
    pub const fn processor(&self) -> &NlpProcessor {
        &self.processor
    }

    /// The configuration the analyzer was built with
    #[must_use]
    pub const fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Parse without annotating
    #[must_use]
    pub fn parse(&self, content: &str) -> ParseOutcome {
        self.parser.parse(content)
    }

    /// Analyze an export on the current thread
    ///
    /// A message whose annotation panics is skipped and counted; the run
    /// continues. Fails only when the export holds no message at all.
    pub fn analyze(&self, content: &str) -> Result<ChatAnalysis> {
        let started = Instant::now();
        let timer = OperationTimer::new("analyze_chat");
        let outcome = self.parse_checked(content)?;

        let annotations: Vec<Option<MessageAnnotation>> = outcome
            .messages
            .iter()
            .enumerate()
            .map(|(index, message)| {
                catch_unwind(AssertUnwindSafe(|| self.processor.process_text(&message.message)))
                    .map_err(|_| warn!(index, "Message analysis panicked; skipping message"))
                    .ok()
            })
            .collect();

        let analysis = self.finish(outcome, annotations, started);
        timer.finish();
        Ok(analysis)
    }

    /// Analyze an export with per-message scoring on the blocking pool
    ///
    /// At most `options.max_concurrency` messages are scored at once. Scoring
    /// that exceeds `options.scorer_timeout` degrades that message's sentiment
    /// to neutral. Messages come back in export order.
    pub async fn analyze_concurrent(self: Arc<Self>, content: String, options: AnalyzeOptions) -> Result<ChatAnalysis> {
        let started = Instant::now();
        let outcome = self.parse_checked(&content)?;
        let semaphore = Arc::new(Semaphore::new(options.max_concurrency.max(1)));
        let mut tasks = JoinSet::new();

        for (index, message) in outcome.messages.iter().enumerate() {
            let analyzer = Arc::clone(&self);
            let semaphore = Arc::clone(&semaphore);
            let text = message.message.clone();

            tasks.spawn(async move {
                let Ok(_permit) = semaphore.acquire_owned().await else {
                    return (index, None);
                };
                let annotation = analyzer.annotate_with_timeout(index, text, options.scorer_timeout).await;
                (index, annotation)
            });
        }

        let mut annotations: Vec<Option<MessageAnnotation>> = (0..outcome.messages.len()).map(|_| None).collect();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, annotation)) => annotations[index] = annotation,
                Err(e) => warn!(error = %e, "Message task failed; skipping message"),
            }
        }

        Ok(self.finish(outcome, annotations, started))
    }

    async fn annotate_with_timeout(self: Arc<Self>, index: usize, text: String, timeout: Duration) -> Option<MessageAnnotation> {
        let scoring = {
            let analyzer = Arc::clone(&self);
            let text = text.clone();
            tokio::task::spawn_blocking(move || analyzer.processor.analyze_sentiment(&text))
        };

        let sentiment = match tokio::time::timeout(timeout, scoring).await {
            Ok(Ok(sentiment)) => sentiment,
            Ok(Err(e)) => {
                warn!(index, error = %e, "Sentiment task failed; skipping message");
                return None;
            }
            Err(_) => {
                warn!(index, timeout_ms = timeout.as_millis(), "Sentiment scoring timed out");
                self.processor.ensemble().timed_out()
            }
        };

        catch_unwind(AssertUnwindSafe(|| self.processor.annotate(&text, sentiment)))
            .map_err(|_| warn!(index, "Message annotation panicked; skipping message"))
            .ok()
    }

    fn parse_checked(&self, content: &str) -> Result<ParseOutcome> {
        let outcome = self.parser.parse(content);
        self.metrics
            .record_parse(outcome.failed_lines.len(), outcome.unparsed_timestamps());

        if outcome.messages.is_empty() {
            warn!(failed_lines = outcome.failed_lines.len(), "No valid messages found in chat export");
            return Err(ChatSentimentError::NoValidMessages {
                failed_lines: outcome.failed_lines.len(),
            });
        }
        Ok(outcome)
    }

    fn finish(&self, outcome: ParseOutcome, annotations: Vec<Option<MessageAnnotation>>, started: Instant) -> ChatAnalysis {
        let ParseOutcome { messages, failed_lines } = outcome;
        let parsed_messages = messages.len();
        let unparsed_timestamps = messages.iter().filter(|m| m.timestamp.is_unparsed()).count();

        let analyzed: Vec<AnalyzedMessage> = messages
            .into_iter()
            .zip(annotations)
            .enumerate()
            .filter_map(|(index, (message, annotation))| {
                annotation.map(|annotation| analyzed_message(index, message, annotation))
            })
            .collect();

        let failed_messages = parsed_messages - analyzed.len();
        let degraded_scorer_calls: usize = analyzed
            .iter()
            .map(|m| m.annotation.sentiment.degraded_count())
            .sum();
        for message in &analyzed {
            self.metrics.record_sentiment(message.annotation.sentiment.ensemble.score);
        }

        let jobs = &self.config.jobs;
        let (language_distribution, primary_language) = aggregate::language_distribution(&analyzed);

        let analysis = ChatAnalysis {
            processing_version: self.processor.version.clone(),
            total_messages: analyzed.len(),
            overall_sentiment: aggregate::overall_sentiment(&analyzed, &self.config.sentiment.ensemble.thresholds),
            sentiment_distribution: aggregate::sentiment_distribution(&analyzed),
            emotion_distribution: aggregate::emotion_distribution(&analyzed, self.processor.zero_emotions()),
            language_distribution,
            primary_language,
            hinglish_messages: analyzed.iter().filter(|m| m.annotation.is_hinglish).count(),
            message_type_distribution: aggregate::message_type_distribution(&analyzed),
            most_active_senders: aggregate::most_active_senders(&analyzed, jobs.top_senders),
            sender_sentiment: aggregate::sender_sentiment(&analyzed, jobs.top_senders),
            top_emojis: aggregate::top_emojis(&analyzed, jobs.top_emojis),
            emoji_usage: aggregate::emoji_usage(&analyzed),
            disagreements: aggregate::disagreement_report(&analyzed),
            summary: aggregate::topic_summary(&analyzed, self.config.keywords.summary_topics),
            diagnostics: ParseDiagnostics {
                parsed_messages,
                failed_lines_count: failed_lines.len(),
                failed_lines_sample: failed_lines.into_iter().take(jobs.max_failed_line_samples).collect(),
                failed_messages,
                degraded_scorer_calls,
                unparsed_timestamps,
            },
            messages: analyzed,
        };

        self.metrics
            .record_message_analysis(analysis.total_messages, failed_messages, started.elapsed());
        debug!(
            degraded_scorer_calls,
            unparsed_timestamps, "Aggregated chat analysis"
        );
        info!(
            total_messages = analysis.total_messages,
            failed_messages,
            overall = %analysis.overall_sentiment.label,
            "Analyzed chat export"
        );

        analysis
    }
}

fn analyzed_message(index: usize, message: ParsedMessage, annotation: MessageAnnotation) -> AnalyzedMessage {
    AnalyzedMessage {
        index,
        timestamp: message.timestamp,
        raw_timestamp: message.raw_timestamp,
        sender: message.sender,
        message: message.message,
        annotation,
    }
}
