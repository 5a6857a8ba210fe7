//! Job status storage.
//!
//! Each analysis run is tracked as a job whose state is replaced as a whole
//! on every transition, so readers never observe a half-written record.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{ChatSentimentError, Result};
use crate::models::ChatAnalysis;

/// Lifecycle of one analysis job
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum JobState {
    /// Accepted and running
    Processing {
        /// When the job was accepted
        started_at: DateTime<Utc>,
    },
    /// Finished with a result
    Completed {
        /// The analysis
        result: Arc<ChatAnalysis>,
        /// When the job finished
        finished_at: DateTime<Utc>,
    },
    /// Finished with an error
    Failed {
        /// Why the job failed
        error: String,
        /// When the job finished
        finished_at: DateTime<Utc>,
    },
}

impl JobState {
    /// A job accepted now
    #[must_use]
    pub fn processing() -> Self {
        Self::Processing { started_at: Utc::now() }
    }

    /// A job finished now with `result`
    #[must_use]
    pub fn completed(result: ChatAnalysis) -> Self {
        Self::Completed {
            result: Arc::new(result),
            finished_at: Utc::now(),
        }
    }

    /// A job finished now with `error`
    #[must_use]
    pub fn failed(error: impl Into<String>) -> Self {
        Self::Failed {
            error: error.into(),
            finished_at: Utc::now(),
        }
    }

    /// Status tag used in logs and metrics
    #[must_use]
    pub const fn status(&self) -> &'static str {
        match self {
            Self::Processing { .. } => "processing",
            Self::Completed { .. } => "completed",
            Self::Failed { .. } => "failed",
        }
    }

    /// True once the job can no longer change
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        !matches!(self, Self::Processing { .. })
    }
}

/// Async job storage backend
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Store `state` for `id`, replacing any previous state
    async fn put(&self, id: Uuid, state: JobState) -> Result<()>;

    /// Current state of a job
    async fn get(&self, id: Uuid) -> Result<JobState>;

    /// Every known job
    async fn list(&self) -> Result<Vec<(Uuid, JobState)>>;
}

/// In-memory job store
///
/// Jobs are lost when the store is dropped. Cheaply cloneable.
#[derive(Debug, Clone, Default)]
pub struct InMemoryJobStore {
    jobs: Arc<RwLock<HashMap<Uuid, JobState>>>,
}

impl InMemoryJobStore {
    /// Empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl JobStore for InMemoryJobStore {
    async fn put(&self, id: Uuid, state: JobState) -> Result<()> {
        let mut jobs = self.jobs.write().await;
        jobs.insert(id, state);
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<JobState> {
        let jobs = self.jobs.read().await;
        jobs.get(&id)
            .cloned()
            .ok_or_else(|| ChatSentimentError::JobNotFound(id.to_string()))
    }

    async fn list(&self) -> Result<Vec<(Uuid, JobState)>> {
        let jobs = self.jobs.read().await;
        let mut listed: Vec<(Uuid, JobState)> = jobs.iter().map(|(id, state)| (*id, state.clone())).collect();
        listed.sort_by_key(|(_, state)| match state {
            JobState::Processing { started_at } => *started_at,
            JobState::Completed { finished_at, .. } | JobState::Failed { finished_at, .. } => *finished_at,
        });
        Ok(listed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_replaces_state() {
        let store = InMemoryJobStore::new();
        let id = Uuid::new_v4();

        store.put(id, JobState::processing()).await.expect("put");
        assert_eq!(store.get(id).await.expect("get").status(), "processing");

        store.put(id, JobState::failed("boom")).await.expect("put");
        let state = store.get(id).await.expect("get");
        assert!(state.is_terminal());
        assert!(matches!(state, JobState::Failed { ref error, .. } if error == "boom"));
    }

    #[tokio::test]
    async fn test_unknown_job() {
        let store = InMemoryJobStore::new();
        let err = store.get(Uuid::new_v4()).await.expect_err("missing");
        assert!(matches!(err, ChatSentimentError::JobNotFound(_)));
    }

    #[tokio::test]
    async fn test_list() {
        let store = InMemoryJobStore::new();
        store.put(Uuid::new_v4(), JobState::processing()).await.expect("put");
        store.put(Uuid::new_v4(), JobState::failed("x")).await.expect("put");
        assert_eq!(store.list().await.expect("list").len(), 2);
    }
}
