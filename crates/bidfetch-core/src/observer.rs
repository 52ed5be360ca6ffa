//! Upward reporting channels: a human-readable log and a numeric progress.
//!
//! The pipeline runs on a worker thread; implementations must be callable
//! from there and hand data to whatever owns presentation.

use std::sync::Mutex;

/// Sink for run logs and progress. Both channels are append-only from the
/// pipeline's point of view.
pub trait RunObserver: Send + Sync {
    /// One human-readable status line.
    fn log(&self, line: String);

    /// `current` of `total` items of the active batch are done (1-based).
    fn progress(&self, current: usize, total: usize);

    /// Progress for the active batch is over; clear any indicator.
    fn reset_progress(&self) {}

    /// Every source document has been processed.
    fn finish(&self) {}
}

/// Everything an observer was told, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunEvent {
    Log(String),
    Progress { current: usize, total: usize },
    ResetProgress,
    Finished,
}

/// Observer that keeps every event in memory. Used by tests.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<RunEvent>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, event: RunEvent) {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(event);
    }

    pub fn events(&self) -> Vec<RunEvent> {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn lines(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                RunEvent::Log(line) => Some(line),
                _ => None,
            })
            .collect()
    }

    pub fn progress_calls(&self) -> Vec<(usize, usize)> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                RunEvent::Progress { current, total } => Some((current, total)),
                _ => None,
            })
            .collect()
    }
}

impl RunObserver for RecordingObserver {
    fn log(&self, line: String) {
        self.push(RunEvent::Log(line));
    }

    fn progress(&self, current: usize, total: usize) {
        self.push(RunEvent::Progress { current, total });
    }

    fn reset_progress(&self) {
        self.push(RunEvent::ResetProgress);
    }

    fn finish(&self) {
        self.push(RunEvent::Finished);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_observer_keeps_order() {
        let obs = RecordingObserver::new();
        obs.log("a".to_string());
        obs.progress(1, 2);
        obs.reset_progress();
        obs.log("b".to_string());
        obs.finish();
        assert_eq!(
            obs.events(),
            vec![
                RunEvent::Log("a".to_string()),
                RunEvent::Progress { current: 1, total: 2 },
                RunEvent::ResetProgress,
                RunEvent::Log("b".to_string()),
                RunEvent::Finished,
            ]
        );
        assert_eq!(obs.lines(), vec!["a", "b"]);
        assert_eq!(obs.progress_calls(), vec![(1, 2)]);
    }
}
