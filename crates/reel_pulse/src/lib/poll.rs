use std::time::Duration;

/// Attempt budget and spacing for a bounded poll/retry loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub max_attempts: u32,
    pub interval: Duration,
}

impl PollPolicy {
    pub const fn new(max_attempts: u32, interval: Duration) -> Self {
        Self {
            max_attempts,
            interval,
        }
    }

    /// Sleeps between attempts; never after the last one
    pub(crate) async fn pause_after(&self, attempt: u32) {
        if attempt < self.max_attempts {
            tokio::time::sleep(self.interval).await;
        }
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self::new(10, Duration::from_secs(5))
    }
}
