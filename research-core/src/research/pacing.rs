//! Pacing between sequential model calls

use async_trait::async_trait;
use std::sync::Mutex;
use std::time::Duration;

use crate::config::PacingConfig;
use crate::error::ResearchError;

/// Why a pause was taken
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PauseReason {
    /// Fixed gap after a successful question
    BetweenQuestions,
    /// Cooldown after a rate-limit or quota failure
    RateLimited,
}

/// Fixed-interval pacing with an escalated cooldown on rate limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacingPolicy {
    pub inter_question_delay: Duration,
    pub rate_limit_cooldown: Duration,
}

impl Default for PacingPolicy {
    fn default() -> Self {
        Self::from(&PacingConfig::default())
    }
}

impl From<&PacingConfig> for PacingPolicy {
    fn from(config: &PacingConfig) -> Self {
        Self {
            inter_question_delay: config.inter_question_delay,
            rate_limit_cooldown: config.rate_limit_cooldown,
        }
    }
}

impl PacingPolicy {
    /// No pauses at all
    pub fn none() -> Self {
        Self {
            inter_question_delay: Duration::ZERO,
            rate_limit_cooldown: Duration::ZERO,
        }
    }

    /// Pause after question `index` (0-based) of `total` succeeded.
    pub fn after_success(&self, index: usize, total: usize) -> Option<Duration> {
        (index + 1 < total).then_some(self.inter_question_delay)
    }

    /// Pause after a failed question.
    pub fn after_failure(&self, error: &ResearchError) -> Option<Duration> {
        error.is_rate_limit().then_some(self.rate_limit_cooldown)
    }
}

/// Something that can wait.
#[async_trait]
pub trait Pacer: Send + Sync {
    async fn pause(&self, duration: Duration, reason: PauseReason);
}

/// Sleeps on the tokio timer
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioPacer;

#[async_trait]
impl Pacer for TokioPacer {
    async fn pause(&self, duration: Duration, reason: PauseReason) {
        if duration.is_zero() {
            return;
        }
        match reason {
            PauseReason::BetweenQuestions => {
                tracing::info!(seconds = duration.as_secs_f64(), "Waiting to avoid rate limits")
            }
            PauseReason::RateLimited => {
                tracing::warn!(seconds = duration.as_secs_f64(), "Rate limit hit, cooling down")
            }
        }
        tokio::time::sleep(duration).await;
    }
}

/// Records pauses without waiting
#[derive(Debug, Default)]
pub struct RecordingPacer {
    pauses: Mutex<Vec<(PauseReason, Duration)>>,
}

impl RecordingPacer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pauses requested so far, oldest first
    pub fn pauses(&self) -> Vec<(PauseReason, Duration)> {
        self.pauses.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Pacer for RecordingPacer {
    async fn pause(&self, duration: Duration, reason: PauseReason) {
        if let Ok(mut pauses) = self.pauses.lock() {
            pauses.push((reason, duration));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_defaults() {
        let policy = PacingPolicy::default();
        assert_eq!(policy.after_success(0, 3), Some(Duration::from_secs(5)));
        assert_eq!(policy.after_success(2, 3), None);
        assert_eq!(policy.after_success(0, 1), None);

        let quota = ResearchError::Provider("Quota exceeded".to_string());
        assert_eq!(policy.after_failure(&quota), Some(Duration::from_secs(30)));
        let other = ResearchError::Provider("500".to_string());
        assert_eq!(policy.after_failure(&other), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_tokio_pacer_sleeps() {
        let start = tokio::time::Instant::now();
        TokioPacer
            .pause(Duration::from_secs(5), PauseReason::BetweenQuestions)
            .await;
        assert!(start.elapsed() >= Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_recording_pacer() {
        let pacer = RecordingPacer::new();
        pacer.pause(Duration::from_secs(30), PauseReason::RateLimited).await;
        assert_eq!(pacer.pauses(), vec![(PauseReason::RateLimited, Duration::from_secs(30))]);
    }
}
