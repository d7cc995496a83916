//! Exponential backoff for transient cluster failures.
//!
//! One [`ExponentialBackoff`] is created per logical request, so the
//! interval sequence always restarts from `initial_interval_ms`.

use std::time::{Duration, Instant};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{EsinfoError, Result};

/// Retry policy parameters. Durations are milliseconds so the YAML stays flat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// First wait after a failed attempt.
    pub initial_interval_ms: u64,
    /// Growth factor applied after every wait.
    pub multiplier: f64,
    /// Jitter as a fraction of the current interval (0.0 = none).
    pub randomization_factor: f64,
    /// Upper bound for a single wait.
    pub max_interval_ms: u64,
    /// Give up once this much time has passed since the first attempt.
    pub max_elapsed_ms: u64,
    /// Give up after this many retries (attempts = retries + 1).
    pub max_retries: u32,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            initial_interval_ms: 500,
            multiplier: 1.5,
            randomization_factor: 0.5,
            max_interval_ms: 60_000,
            max_elapsed_ms: 15 * 60 * 1000,
            max_retries: 8,
        }
    }
}

impl RetryConfig {
    /// A policy that never retries.
    pub fn disabled() -> Self {
        Self {
            max_retries: 0,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.multiplier.is_finite() || self.multiplier < 1.0 {
            return Err(EsinfoError::Config(format!(
                "retry.multiplier must be a finite value >= 1.0, got {}",
                self.multiplier
            )));
        }
        if !(0.0..=1.0).contains(&self.randomization_factor) {
            return Err(EsinfoError::Config(format!(
                "retry.randomization_factor must be within 0.0..=1.0, got {}",
                self.randomization_factor
            )));
        }
        if self.max_interval_ms < self.initial_interval_ms {
            return Err(EsinfoError::Config(
                "retry.max_interval_ms must not be below retry.initial_interval_ms".to_string(),
            ));
        }
        Ok(())
    }
}

/// Backoff state for one request sequence.
#[derive(Debug)]
pub struct ExponentialBackoff {
    config: RetryConfig,
    current_interval: Duration,
    started: Instant,
    retries: u32,
}

impl ExponentialBackoff {
    pub fn new(config: &RetryConfig) -> Self {
        Self {
            config: config.clone(),
            current_interval: Duration::from_millis(config.initial_interval_ms),
            started: Instant::now(),
            retries: 0,
        }
    }

    /// Retries handed out so far.
    pub fn retries(&self) -> u32 {
        self.retries
    }

    /// Wait before the next attempt, or `None` once the policy is exhausted.
    pub fn next_backoff(&mut self) -> Option<Duration> {
        if self.retries >= self.config.max_retries {
            return None;
        }
        let max_elapsed = Duration::from_millis(self.config.max_elapsed_ms);
        if self.started.elapsed() >= max_elapsed {
            return None;
        }

        let wait = self.randomized(self.current_interval);
        self.grow();
        self.retries += 1;
        Some(wait)
    }

    fn grow(&mut self) {
        let max = Duration::from_millis(self.config.max_interval_ms);
        let grown = self.current_interval.as_secs_f64() * self.config.multiplier;
        let next = Duration::try_from_secs_f64(grown).unwrap_or(max);
        self.current_interval = next.min(max);
    }

    fn randomized(&self, interval: Duration) -> Duration {
        let factor = self.config.randomization_factor;
        if factor == 0.0 || interval.is_zero() {
            return interval;
        }
        let millis = interval.as_secs_f64() * 1000.0;
        let delta = factor * millis;
        let jittered = rand::thread_rng().gen_range((millis - delta)..=(millis + delta));
        Duration::try_from_secs_f64(jittered.max(0.0) / 1000.0).unwrap_or(interval)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deterministic(max_retries: u32) -> RetryConfig {
        RetryConfig {
            initial_interval_ms: 100,
            multiplier: 2.0,
            randomization_factor: 0.0,
            max_interval_ms: 500,
            max_elapsed_ms: 60_000,
            max_retries,
        }
    }

    #[test]
    fn test_intervals_grow_and_cap() {
        let mut backoff = ExponentialBackoff::new(&deterministic(6));
        let waits: Vec<u64> = std::iter::from_fn(|| backoff.next_backoff())
            .map(|d| d.as_millis() as u64)
            .collect();
        assert_eq!(waits, vec![100, 200, 400, 500, 500, 500]);
    }

    #[test]
    fn test_exhausted_after_max_retries() {
        let mut backoff = ExponentialBackoff::new(&deterministic(2));
        assert!(backoff.next_backoff().is_some());
        assert!(backoff.next_backoff().is_some());
        assert!(backoff.next_backoff().is_none());
        assert_eq!(backoff.retries(), 2);
    }

    #[test]
    fn test_new_sequence_starts_from_initial_interval() {
        let config = deterministic(5);
        let mut first = ExponentialBackoff::new(&config);
        first.next_backoff();
        first.next_backoff();

        let mut second = ExponentialBackoff::new(&config);
        assert_eq!(second.retries(), 0);
        assert_eq!(second.next_backoff(), Some(Duration::from_millis(100)));
    }

    #[test]
    fn test_max_elapsed_stops_retries() {
        let config = RetryConfig {
            max_elapsed_ms: 0,
            ..deterministic(10)
        };
        let mut backoff = ExponentialBackoff::new(&config);
        assert!(backoff.next_backoff().is_none());
    }

    #[test]
    fn test_jitter_stays_within_bounds() {
        let config = RetryConfig {
            randomization_factor: 0.5,
            ..deterministic(1)
        };
        for _ in 0..50 {
            let mut backoff = ExponentialBackoff::new(&config);
            let wait = backoff.next_backoff().unwrap().as_millis();
            assert!((49..=150).contains(&wait), "wait {} out of range", wait);
        }
    }

    #[test]
    fn test_validate_rejects_shrinking_multiplier() {
        let config = RetryConfig {
            multiplier: 0.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());
        assert!(RetryConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_non_finite_multiplier() {
        for multiplier in [f64::INFINITY, f64::NAN] {
            let config = RetryConfig {
                multiplier,
                ..Default::default()
            };
            assert!(config.validate().is_err());
        }

        let from_yaml: RetryConfig = serde_yaml::from_str("multiplier: .inf\n").unwrap();
        assert!(from_yaml.validate().is_err());
    }

    #[test]
    fn test_huge_multiplier_caps_instead_of_overflowing() {
        let config = RetryConfig {
            multiplier: 1e300,
            ..deterministic(4)
        };
        assert!(config.validate().is_ok());

        let mut backoff = ExponentialBackoff::new(&config);
        let waits: Vec<u64> = std::iter::from_fn(|| backoff.next_backoff())
            .map(|d| d.as_millis() as u64)
            .collect();
        assert_eq!(waits, vec![100, 500, 500, 500]);
    }

    #[test]
    fn test_interval_near_duration_limit_does_not_overflow() {
        let config = RetryConfig {
            initial_interval_ms: u64::MAX / 2,
            multiplier: 3.0,
            randomization_factor: 0.5,
            max_interval_ms: u64::MAX,
            max_elapsed_ms: u64::MAX,
            max_retries: 5,
        };
        assert!(config.validate().is_ok());

        let mut backoff = ExponentialBackoff::new(&config);
        let waits: Vec<Duration> = std::iter::from_fn(|| backoff.next_backoff()).collect();
        assert_eq!(waits.len(), 5);
    }

    #[test]
    fn test_disabled_never_retries() {
        let mut backoff = ExponentialBackoff::new(&RetryConfig::disabled());
        assert!(backoff.next_backoff().is_none());
    }
}
