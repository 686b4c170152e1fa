//! Repeating poll timer driven by the UI event loop.

use std::time::{Duration, Instant};

/// Default polling period while playing.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(20);

/// A recurring callback scheduled on the same loop as the UI.
///
/// The timer does not own a thread. The loop calls [`PollTimer::fire`] and
/// acts when it returns `true`. The period is fixed: the next deadline is
/// computed from the moment of firing, with no drift correction.
#[derive(Debug, Clone)]
pub struct PollTimer {
    interval: Duration,
    next_due: Option<Instant>,
}

impl PollTimer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_due: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// (Re)starts the timer; the first fire is one interval from `now`.
    pub fn start(&mut self, now: Instant) {
        self.next_due = Some(now + self.interval);
    }

    pub fn stop(&mut self) {
        self.next_due = None;
    }

    pub fn is_running(&self) -> bool {
        self.next_due.is_some()
    }

    /// Returns `true` when the deadline has passed and schedules the next one.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.next_due {
            Some(due) if now >= due => {
                self.next_due = Some(now + self.interval);
                true
            }
            _ => false,
        }
    }

    /// Time left before the next fire, if running.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.next_due.map(|due| due.saturating_duration_since(now))
    }
}

impl Default for PollTimer {
    fn default() -> Self {
        Self::new(DEFAULT_POLL_INTERVAL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stopped_timer_never_fires() {
        let mut timer = PollTimer::default();
        assert!(!timer.fire(Instant::now() + Duration::from_secs(10)));
    }

    #[test]
    fn test_fires_once_per_deadline() {
        let start = Instant::now();
        let mut timer = PollTimer::new(Duration::from_millis(20));
        timer.start(start);

        assert!(!timer.fire(start + Duration::from_millis(5)));
        assert!(timer.fire(start + Duration::from_millis(20)));
        assert!(!timer.fire(start + Duration::from_millis(25)));
        assert!(timer.fire(start + Duration::from_millis(45)));
    }

    #[test]
    fn test_late_fire_does_not_catch_up() {
        let start = Instant::now();
        let mut timer = PollTimer::new(Duration::from_millis(20));
        timer.start(start);

        assert!(timer.fire(start + Duration::from_millis(100)));
        assert!(!timer.fire(start + Duration::from_millis(110)));
        assert_eq!(
            timer.remaining(start + Duration::from_millis(110)),
            Some(Duration::from_millis(10))
        );
    }
}
