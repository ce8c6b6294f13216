//! Retry policy for the job status poll loop

use std::time::Duration;

use rand::Rng;

use crate::model::PollingConfig;

/// Fixed-delay polling with a hard attempt ceiling
#[derive(Debug, Clone, PartialEq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_attempts: u32,
    /// Upper bound of a random delay added to each attempt
    pub jitter: Option<Duration>,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(2),
            max_attempts: 60,
            jitter: None,
        }
    }
}

impl From<&PollingConfig> for PollPolicy {
    fn from(config: &PollingConfig) -> Self {
        Self {
            interval: config.interval(),
            max_attempts: config.max_attempts.max(1),
            jitter: config.jitter(),
        }
    }
}

impl PollPolicy {
    /// Delay before the next status request
    pub fn delay(&self) -> Duration {
        match self.jitter {
            Some(jitter) if !jitter.is_zero() => {
                let extra = rand::thread_rng().gen_range(0..=jitter.as_millis() as u64);
                self.interval + Duration::from_millis(extra)
            }
            _ => self.interval,
        }
    }

    /// Nominal wait before giving up, jitter excluded
    pub fn ceiling(&self) -> Duration {
        self.interval * self.max_attempts
    }
}
