//! Per-widget session flags

use std::time::{Duration, Instant};

/// Minimum spacing between two accepted submissions
pub const MIN_SEND_INTERVAL: Duration = Duration::from_millis(1000);

/// Flags scoped to one widget instance, reset when the process restarts
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub is_listening: bool,
    last_sent: Option<Instant>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a submission at `now` unless it falls inside the rate-limit window.
    /// Returns false (and leaves the clock untouched) when the call must be dropped.
    pub fn try_accept(&mut self, now: Instant) -> bool {
        if let Some(last) = self.last_sent {
            if now.saturating_duration_since(last) < MIN_SEND_INTERVAL {
                return false;
            }
        }
        self.last_sent = Some(now);
        true
    }

    pub fn last_sent(&self) -> Option<Instant> {
        self.last_sent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_submission_accepted() {
        let mut session = SessionState::new();
        assert!(session.try_accept(Instant::now()));
    }

    #[test]
    fn test_submission_inside_window_dropped() {
        let mut session = SessionState::new();
        let start = Instant::now();
        assert!(session.try_accept(start));
        assert!(!session.try_accept(start + Duration::from_millis(999)));
        // dropped calls do not move the window
        assert_eq!(session.last_sent(), Some(start));
        assert!(session.try_accept(start + Duration::from_millis(1000)));
    }
}
