//! Job storage
//!
//! [`JobStore`] is the seam the HTTP layer and the runner share. The
//! in-memory implementation keeps jobs for the life of the process.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::job::ResearchJob;
use crate::error::Result;

/// Keyed job storage with insertion-ordered listing
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Look up a job by id
    async fn get(&self, id: &str) -> Result<Option<ResearchJob>>;

    /// Insert or overwrite the job stored under `job.id`.
    ///
    /// Overwriting keeps the slot's original position in [`JobStore::recent`].
    async fn put(&self, job: ResearchJob) -> Result<()>;

    /// Up to `limit` most recently inserted jobs, oldest first
    async fn recent(&self, limit: usize) -> Result<Vec<ResearchJob>>;

    /// Number of stored jobs
    async fn len(&self) -> Result<usize>;
}

#[derive(Default)]
struct Inner {
    jobs: HashMap<String, ResearchJob>,
    order: Vec<String>,
}

/// Process-local store for testing and single-instance deployments
#[derive(Default)]
pub struct InMemoryJobStore {
    inner: RwLock<Inner>,
}

impl InMemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl JobStore for InMemoryJobStore {
    async fn get(&self, id: &str) -> Result<Option<ResearchJob>> {
        Ok(self.inner.read().await.jobs.get(id).cloned())
    }

    async fn put(&self, job: ResearchJob) -> Result<()> {
        let mut inner = self.inner.write().await;
        if !inner.jobs.contains_key(&job.id) {
            inner.order.push(job.id.clone());
        }
        inner.jobs.insert(job.id.clone(), job);
        Ok(())
    }

    async fn recent(&self, limit: usize) -> Result<Vec<ResearchJob>> {
        let inner = self.inner.read().await;
        let start = inner.order.len().saturating_sub(limit);
        Ok(inner.order[start..]
            .iter()
            .filter_map(|id| inner.jobs.get(id).cloned())
            .collect())
    }

    async fn len(&self) -> Result<usize> {
        Ok(self.inner.read().await.jobs.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jobs::{JobStatus, ResearchSubmission};
    use chrono::Utc;

    fn job(id: &str, topic: &str) -> ResearchJob {
        ResearchJob::processing(id, ResearchSubmission::new(topic, ["q"]), Utc::now())
    }

    #[tokio::test]
    async fn test_put_and_get() {
        let store = InMemoryJobStore::new();
        assert!(store.get("missing").await.unwrap().is_none());

        store.put(job("a", "A")).await.unwrap();
        assert_eq!(store.get("a").await.unwrap().unwrap().topic, "A");
        assert_eq!(store.len().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_recent_is_last_n_in_insertion_order() {
        let store = InMemoryJobStore::new();
        for i in 0..12 {
            store.put(job(&format!("job{:02}", i), "T")).await.unwrap();
        }

        let recent = store.recent(10).await.unwrap();
        let ids: Vec<_> = recent.iter().map(|j| j.id.as_str()).collect();
        assert_eq!(ids.len(), 10);
        assert_eq!(ids.first(), Some(&"job02"));
        assert_eq!(ids.last(), Some(&"job11"));

        assert_eq!(store.recent(50).await.unwrap().len(), 12);
    }

    #[tokio::test]
    async fn test_overwrite_keeps_position() {
        let store = InMemoryJobStore::new();
        store.put(job("a", "A")).await.unwrap();
        store.put(job("b", "B")).await.unwrap();

        let updated = job("a", "A2").fail("boom", Utc::now());
        store.put(updated).await.unwrap();

        let recent = store.recent(10).await.unwrap();
        assert_eq!(recent[0].id, "a");
        assert_eq!(recent[0].topic, "A2");
        assert_eq!(recent[0].status, JobStatus::Error);
        assert_eq!(store.len().await.unwrap(), 2);
    }
}
