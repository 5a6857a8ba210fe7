use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info};
use uuid::Uuid;

use crate::error::{ChatSentimentError, Result};
use crate::metrics::MetricsCollector;
use crate::pipeline::{AnalyzeOptions, ChatAnalyzer};
use crate::repository::{JobState, JobStore};
use crate::validation::InputValidator;

/// Interval between job-state checks in [`AnalysisService::wait_for`]
const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Runs chat analyses as background jobs
pub struct AnalysisService {
    analyzer: Arc<ChatAnalyzer>,
    store: Arc<dyn JobStore>,
    concurrency: Option<AnalyzeOptions>,
    metrics: MetricsCollector,
    in_flight: Arc<AtomicUsize>,
}

impl AnalysisService {
    /// Service scoring each job's messages concurrently with the configured timeout
    #[must_use]
    pub fn new(analyzer: Arc<ChatAnalyzer>, store: Arc<dyn JobStore>) -> Self {
        let options = AnalyzeOptions::from_config(&analyzer.config().jobs);
        Self {
            analyzer,
            store,
            concurrency: Some(options),
            metrics: MetricsCollector::default(),
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Score each job's messages concurrently with the given limits
    #[must_use]
    pub const fn with_concurrency(mut self, options: AnalyzeOptions) -> Self {
        self.concurrency = Some(options);
        self
    }

    /// Score each job's messages one at a time on the blocking pool
    ///
    /// Sequential jobs have no per-message scorer timeout: a hung scorer
    /// holds the job in processing until [`Self::wait_for`] gives up.
    #[must_use]
    pub const fn sequential(mut self) -> Self {
        self.concurrency = None;
        self
    }

    /// Accept a chat export and start analyzing it in the background
    ///
    /// Returns the job id once the job is recorded as processing. Errors and
    /// panics in the analysis end the job as failed.
    pub async fn submit(&self, content: String) -> Result<Uuid> {
        let max_bytes = self.analyzer.config().jobs.max_content_bytes;
        InputValidator::validate_chat_content(&content, max_bytes)
            .map_err(|e| ChatSentimentError::InvalidInput(e.to_string()))?;
        let content = InputValidator::sanitize_text(&content);

        let id = Uuid::new_v4();
        self.store.put(id, JobState::processing()).await?;
        self.metrics.record_job("processing");
        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.metrics.set_jobs_in_flight(running);
        info!(job_id = %id, bytes = content.len(), "Job submitted");

        let analyzer = Arc::clone(&self.analyzer);
        let store = Arc::clone(&self.store);
        let in_flight = Arc::clone(&self.in_flight);
        let metrics = self.metrics.clone();
        let concurrency = self.concurrency;

        tokio::spawn(async move {
            let work = match concurrency {
                Some(options) => tokio::spawn(analyzer.analyze_concurrent(content, options)),
                None => tokio::task::spawn_blocking(move || analyzer.analyze(&content)),
            };

            let state = match work.await {
                Ok(Ok(analysis)) => {
                    info!(job_id = %id, messages = analysis.total_messages, "Job completed");
                    JobState::completed(analysis)
                }
                Ok(Err(e)) => {
                    error!(job_id = %id, error = %e, "Job failed");
                    JobState::failed(e.to_string())
                }
                Err(e) => {
                    error!(job_id = %id, error = %e, "Job panicked");
                    JobState::failed(format!("analysis task panicked: {e}"))
                }
            };

            metrics.record_job(state.status());
            if let Err(e) = store.put(id, state).await {
                error!(job_id = %id, error = %e, "Failed to record job result");
            }
            let running = in_flight.fetch_sub(1, Ordering::SeqCst).saturating_sub(1);
            metrics.set_jobs_in_flight(running);
        });

        Ok(id)
    }

    /// Current state of a job
    pub async fn status(&self, id: Uuid) -> Result<JobState> {
        self.store.get(id).await
    }

    /// Wait until a job completes or fails
    pub async fn wait_for(&self, id: Uuid, timeout: Duration) -> Result<JobState> {
        tokio::time::timeout(timeout, self.poll_until_terminal(id))
            .await
            .map_err(|_| ChatSentimentError::JobTimeout(id.to_string()))?
    }

    async fn poll_until_terminal(&self, id: Uuid) -> Result<JobState> {
        loop {
            let state = self.store.get(id).await?;
            if state.is_terminal() {
                return Ok(state);
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    /// Every known job
    pub async fn list_jobs(&self) -> Result<Vec<(Uuid, JobState)>> {
        self.store.list().await
    }

    /// The analyzer jobs run on
    #[must_use]
    pub const fn analyzer(&self) -> &Arc<ChatAnalyzer> {
        &self.analyzer
    }
}
