//! Research job lifecycle
//!
//! A submission becomes a [`ResearchJob`] in the `processing` state, runs in
//! the background, and ends either `completed` (with findings and report) or
//! `error` (with the error text). Terminal states are never left.

mod ids;
mod job;
mod runner;
mod store;

pub use ids::{Clock, FixedClock, JobIdGenerator, SystemClock};
pub use job::{JobReport, JobStatus, JobSummary, ResearchJob, ResearchSubmission};
pub use runner::{AgentFactory, JobRunner};
pub use store::{InMemoryJobStore, JobStore};
