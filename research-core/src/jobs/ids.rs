//! Clocks and job identifiers

use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex};

use crate::config::JobIdStrategy;

/// Source of the current time
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Settable clock for tests
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        if let Ok(mut current) = self.now.lock() {
            *current = now;
        }
    }

    pub fn advance(&self, by: chrono::Duration) {
        if let Ok(mut current) = self.now.lock() {
            *current += by;
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.lock().map(|n| *n).unwrap_or_else(|_| Utc::now())
    }
}

const ID_FORMAT: &str = "research_%Y%m%d_%H%M%S";

/// Produces job ids from the clock.
///
/// With [`JobIdStrategy::Timestamp`] two submissions in the same second get
/// the same id and the later one replaces the earlier job.
#[derive(Clone)]
pub struct JobIdGenerator {
    strategy: JobIdStrategy,
    clock: Arc<dyn Clock>,
}

impl JobIdGenerator {
    pub fn new(strategy: JobIdStrategy, clock: Arc<dyn Clock>) -> Self {
        Self { strategy, clock }
    }

    pub fn strategy(&self) -> JobIdStrategy {
        self.strategy
    }

    pub fn generate(&self) -> String {
        let base = self.clock.now().format(ID_FORMAT).to_string();
        match self.strategy {
            JobIdStrategy::Timestamp => base,
            JobIdStrategy::Unique => {
                let suffix = uuid::Uuid::new_v4().simple().to_string();
                format!("{}_{}", base, &suffix[..8])
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn clock() -> Arc<FixedClock> {
        Arc::new(FixedClock::new(
            Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap(),
        ))
    }

    #[test]
    fn test_timestamp_ids_collide_within_a_second() {
        let clock = clock();
        let ids = JobIdGenerator::new(JobIdStrategy::Timestamp, clock.clone());
        assert_eq!(ids.generate(), "research_20240309_070501");
        assert_eq!(ids.generate(), ids.generate());

        clock.advance(chrono::Duration::seconds(1));
        assert_eq!(ids.generate(), "research_20240309_070502");
    }

    #[test]
    fn test_unique_ids_differ() {
        let ids = JobIdGenerator::new(JobIdStrategy::Unique, clock());
        let a = ids.generate();
        let b = ids.generate();
        assert_ne!(a, b);
        assert!(a.starts_with("research_20240309_070501_"));
        assert_eq!(a.len(), "research_20240309_070501_".len() + 8);
    }
}
