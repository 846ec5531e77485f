//! Tick source for the controller loop

use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

#[async_trait]
pub trait Ticker: Send + Sync {
    async fn wait(&self, duration: Duration);
}

/// Wall-clock pacing.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioTicker;

#[async_trait]
impl Ticker for TokioTicker {
    async fn wait(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Logical clock that never sleeps. Counts waits and the time they would
/// have taken.
#[derive(Debug, Default)]
pub struct InstantTicker {
    ticks: AtomicU64,
    elapsed_ms: AtomicU64,
}

impl InstantTicker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::Relaxed)
    }

    pub fn elapsed(&self) -> Duration {
        Duration::from_millis(self.elapsed_ms.load(Ordering::Relaxed))
    }
}

#[async_trait]
impl Ticker for InstantTicker {
    async fn wait(&self, duration: Duration) {
        self.ticks.fetch_add(1, Ordering::Relaxed);
        self.elapsed_ms.fetch_add(duration.as_millis() as u64, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instant_ticker_counts() {
        let ticker = InstantTicker::new();
        tokio_test::block_on(async {
            ticker.wait(Duration::from_millis(100)).await;
            ticker.wait(Duration::from_secs(1)).await;
        });
        assert_eq!(ticker.ticks(), 2);
        assert_eq!(ticker.elapsed(), Duration::from_millis(1100));
    }
}
