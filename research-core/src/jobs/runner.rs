//! Background job execution
//!
//! Each accepted submission runs on its own tokio task. A semaphore bounds
//! how many run at once; the rest wait for a permit in submission order. A
//! supervising task records the terminal state whether the job returns an
//! error or panics.

use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::Instrument;

use super::ids::{Clock, JobIdGenerator, SystemClock};
use super::job::{JobReport, JobStatus, JobSummary, ResearchJob, ResearchSubmission};
use super::store::{InMemoryJobStore, JobStore};
use crate::config::{JobIdStrategy, ResearchConfig};
use crate::error::{Result, ResearchError};
use crate::research::ResearchAgent;

/// Builds a fresh agent for each job
pub type AgentFactory = Arc<dyn Fn() -> Result<ResearchAgent> + Send + Sync>;

/// Accepts research submissions and tracks them to completion
pub struct JobRunner {
    store: Arc<dyn JobStore>,
    factory: AgentFactory,
    ids: JobIdGenerator,
    clock: Arc<dyn Clock>,
    permits: Arc<Semaphore>,
    history_limit: usize,
}

impl JobRunner {
    /// Runner with an in-memory store, the system clock, timestamp ids,
    /// four concurrent jobs and a history of ten.
    pub fn new(factory: AgentFactory) -> Self {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        Self {
            store: Arc::new(InMemoryJobStore::new()),
            factory,
            ids: JobIdGenerator::new(JobIdStrategy::Timestamp, clock.clone()),
            clock,
            permits: Arc::new(Semaphore::new(4)),
            history_limit: 10,
        }
    }

    /// Runner whose jobs use Gemini agents built from `config`.
    pub fn from_config(config: &ResearchConfig) -> Self {
        let agent_config = config.clone();
        let factory: AgentFactory = Arc::new(move || ResearchAgent::from_config(&agent_config));

        Self::new(factory)
            .with_id_strategy(config.server.job_ids)
            .with_max_concurrent_jobs(config.server.max_concurrent_jobs)
            .with_history_limit(config.server.history_limit)
    }

    pub fn with_store(mut self, store: Arc<dyn JobStore>) -> Self {
        self.store = store;
        self
    }

    /// Replace the clock used for ids and timestamps
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.ids = JobIdGenerator::new(self.ids.strategy(), clock.clone());
        self.clock = clock;
        self
    }

    pub fn with_id_strategy(mut self, strategy: JobIdStrategy) -> Self {
        self.ids = JobIdGenerator::new(strategy, self.clock.clone());
        self
    }

    /// At least one job always runs
    pub fn with_max_concurrent_jobs(mut self, max: usize) -> Self {
        self.permits = Arc::new(Semaphore::new(max.max(1)));
        self
    }

    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    /// Validate and start a job, returning its id without waiting for it.
    ///
    /// # Errors
    ///
    /// Returns a validation error (and stores nothing) for a blank topic or
    /// an empty question list.
    pub async fn submit(&self, submission: ResearchSubmission) -> Result<String> {
        let submission = submission.normalize()?;
        let id = self.ids.generate();

        if self.store.get(&id).await?.is_some() {
            tracing::warn!(job_id = %id, "Job id collision, replacing earlier job");
        }

        let job = ResearchJob::processing(id.clone(), submission, self.clock.now());
        self.store.put(job.clone()).await?;
        tracing::info!(job_id = %id, topic = %job.topic, questions = job.questions.len(), "Research job accepted");

        self.spawn(job);
        Ok(id)
    }

    fn spawn(&self, job: ResearchJob) {
        let span = tracing::info_span!("research_job", job_id = %job.id);
        let permits = self.permits.clone();
        let factory = self.factory.clone();
        let topic = job.topic.clone();
        let questions = job.questions.clone();

        let worker = tokio::spawn(
            async move {
                let _permit = permits
                    .acquire_owned()
                    .await
                    .map_err(|_| ResearchError::Job("job pool is shut down".to_string()))?;
                let agent = factory()?;
                agent.run(&topic, &questions).await
            }
            .instrument(span.clone()),
        );

        let store = self.store.clone();
        let clock = self.clock.clone();
        tokio::spawn(
            async move {
                let finished = match worker.await {
                    Ok(Ok(outcome)) => {
                        tracing::info!("Research job completed");
                        job.complete(outcome, clock.now())
                    }
                    Ok(Err(e)) => {
                        tracing::error!(error = %e, "Research job failed");
                        job.fail(e.to_string(), clock.now())
                    }
                    Err(join_error) => {
                        let message = panic_message(join_error);
                        tracing::error!(error = %message, "Research job aborted");
                        job.fail(message, clock.now())
                    }
                };

                if let Err(e) = store.put(finished).await {
                    tracing::error!(error = %e, "Failed to record job result");
                }
            }
            .instrument(span),
        );
    }

    /// Current record of a job.
    ///
    /// # Errors
    ///
    /// Returns [`ResearchError::NotFound`] for an unknown id.
    pub async fn status(&self, id: &str) -> Result<ResearchJob> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| ResearchError::NotFound(id.to_string()))
    }

    /// Report of a completed job.
    ///
    /// # Errors
    ///
    /// Returns [`ResearchError::NotFound`] for an unknown id and
    /// [`ResearchError::NotReady`] while the job is not completed.
    pub async fn report(&self, id: &str) -> Result<JobReport> {
        let job = self.status(id).await?;
        match (job.status, job.report) {
            (JobStatus::Completed, Some(report)) => Ok(JobReport {
                report,
                topic: job.topic,
            }),
            _ => Err(ResearchError::NotReady(id.to_string())),
        }
    }

    /// Most recent jobs, oldest first
    pub async fn history(&self) -> Result<Vec<JobSummary>> {
        Ok(self
            .store
            .recent(self.history_limit)
            .await?
            .iter()
            .map(ResearchJob::summary)
            .collect())
    }

    /// Permits not currently held by running jobs
    pub fn available_slots(&self) -> usize {
        self.permits.available_permits()
    }
}

fn panic_message(error: tokio::task::JoinError) -> String {
    if error.is_cancelled() {
        return "Research task was cancelled".to_string();
    }
    let payload = error.into_panic();
    let detail = payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string());
    format!("Research task panicked: {}", detail)
}
