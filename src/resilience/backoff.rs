//! Fixed delay between upstream attempts.

use std::time::Duration;

/// Constant backoff; every retry waits the same interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedBackoff {
    delay: Duration,
}

impl FixedBackoff {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Suspend the current task for the backoff interval.
    pub async fn wait(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}

impl Default for FixedBackoff {
    fn default() -> Self {
        Self::new(Duration::from_millis(100))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[tokio::test]
    async fn test_wait_sleeps_for_delay() {
        let backoff = FixedBackoff::new(Duration::from_millis(20));
        let start = Instant::now();
        backoff.wait().await;
        assert!(start.elapsed() >= Duration::from_millis(20));
    }

    #[test]
    fn test_default_is_100ms() {
        assert_eq!(FixedBackoff::default().delay(), Duration::from_millis(100));
    }
}
