//! Request pacing between URL pairs.
//!
//! The runner calls [`Pacer::pace`] once after every completed pair. The
//! default policy is a fixed sleep so target servers see at most one pair of
//! requests per delay window.

use std::future::Future;
use std::time::Duration;

/// Policy deciding how long to wait after a pair completes.
pub trait Pacer {
    fn pace(&self) -> impl Future<Output = ()> + Send;
}

/// Sleeps for a fixed duration after each pair.
#[derive(Debug, Clone, Copy)]
pub struct FixedDelay {
    delay: Duration,
}

impl FixedDelay {
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    #[must_use]
    pub fn from_millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }

    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl Pacer for FixedDelay {
    fn pace(&self) -> impl Future<Output = ()> + Send {
        let delay = self.delay;
        async move {
            if delay.is_zero() {
                return;
            }
            tracing::debug!(delay_ms = delay.as_millis(), "pacing before next pair");
            tokio::time::sleep(delay).await;
        }
    }
}

/// Does not wait at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelay;

impl Pacer for NoDelay {
    fn pace(&self) -> impl Future<Output = ()> + Send {
        std::future::ready(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn fixed_delay_sleeps_for_configured_duration() {
        let pacer = FixedDelay::from_millis(1000);
        let start = tokio::time::Instant::now();
        pacer.pace().await;
        assert!(start.elapsed() >= Duration::from_millis(1000));
    }

    #[tokio::test(start_paused = true)]
    async fn zero_fixed_delay_returns_immediately() {
        let pacer = FixedDelay::from_millis(0);
        let start = tokio::time::Instant::now();
        pacer.pace().await;
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test]
    async fn no_delay_returns_immediately() {
        NoDelay.pace().await;
    }

    #[test]
    fn fixed_delay_reports_its_duration() {
        assert_eq!(FixedDelay::from_millis(250).delay(), Duration::from_millis(250));
    }
}
