use std::time::Duration;

/// Fixed pause between consecutive requests of a batch.
///
/// Defaults to half a second. Tests use [`Pacing::none`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    pub interval: Duration,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(500),
        }
    }
}

impl Pacing {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    pub fn none() -> Self {
        Self::new(Duration::ZERO)
    }

    /// Delay to apply after item `done` (1-based) of `total`; none after the last.
    pub fn delay_after(&self, done: usize, total: usize) -> Option<Duration> {
        (done < total && !self.interval.is_zero()).then_some(self.interval)
    }

    pub fn wait_after(&self, done: usize, total: usize) {
        if let Some(d) = self.delay_after(done, total) {
            std::thread::sleep(d);
        }
    }
}
