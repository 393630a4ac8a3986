//! Job records and submissions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ResearchError};
use crate::research::{Findings, ResearchOutcome};

/// Job lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Processing,
    Completed,
    Error,
}

impl JobStatus {
    /// Completed and error are final
    pub fn is_terminal(&self) -> bool {
        !matches!(self, JobStatus::Processing)
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            JobStatus::Processing => "processing",
            JobStatus::Completed => "completed",
            JobStatus::Error => "error",
        };
        f.write_str(s)
    }
}

/// One research submission, from acceptance to its terminal state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchJob {
    pub id: String,
    pub topic: String,
    pub questions: Vec<String>,
    pub status: JobStatus,
    pub started_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<Findings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ResearchJob {
    /// Fresh job in the processing state
    pub fn processing(id: impl Into<String>, submission: ResearchSubmission, started_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            topic: submission.topic,
            questions: submission.questions,
            status: JobStatus::Processing,
            started_at,
            completed_at: None,
            results: None,
            report: None,
            error: None,
        }
    }

    /// Terminal success carrying the findings and report
    pub fn complete(self, outcome: ResearchOutcome, at: DateTime<Utc>) -> Self {
        Self {
            status: JobStatus::Completed,
            completed_at: Some(at),
            results: Some(outcome.findings),
            report: Some(outcome.report),
            error: None,
            ..self
        }
    }

    /// Terminal failure with the error text
    pub fn fail(self, error: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self {
            status: JobStatus::Error,
            completed_at: Some(at),
            error: Some(error.into()),
            ..self
        }
    }

    pub fn summary(&self) -> JobSummary {
        JobSummary {
            id: self.id.clone(),
            topic: self.topic.clone(),
            status: self.status,
            started_at: self.started_at,
            completed_at: self.completed_at,
        }
    }
}

/// History entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSummary {
    pub id: String,
    pub topic: String,
    pub status: JobStatus,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Report of a completed job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobReport {
    pub report: String,
    pub topic: String,
}

/// Request to start a job
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResearchSubmission {
    #[serde(default)]
    pub topic: String,
    #[serde(default)]
    pub questions: Vec<String>,
}

impl ResearchSubmission {
    pub fn new<I, S>(topic: impl Into<String>, questions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            topic: topic.into(),
            questions: questions.into_iter().map(Into::into).collect(),
        }
    }

    /// Trim the topic and every question, dropping blank questions.
    ///
    /// # Errors
    ///
    /// Returns a validation error when the topic is blank or no question
    /// survives.
    pub fn normalize(self) -> Result<Self> {
        let topic = self.topic.trim().to_string();
        let questions: Vec<String> = self
            .questions
            .iter()
            .map(|q| q.trim())
            .filter(|q| !q.is_empty())
            .map(str::to_string)
            .collect();

        if topic.is_empty() || questions.is_empty() {
            return Err(ResearchError::Validation(
                "Topic and questions are required".to_string(),
            ));
        }

        Ok(Self { topic, questions })
    }
}
