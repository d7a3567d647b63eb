// Single-slot timers
//
// Deferred work (delayed effect rebuilds, debounced resize, toast expiry) is
// modelled as one pending deadline per purpose. Scheduling again cancels the
// previous deadline, so only the most recent request ever fires.

use std::time::{Duration, Instant};

/// A cancel-and-reschedule timer holding at most one deadline
#[derive(Debug, Clone, Default)]
pub struct Timer {
    deadline: Option<Instant>,
}

impl Timer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule the timer `delay` after `now`, replacing any pending deadline
    pub fn schedule(&mut self, now: Instant, delay: Duration) {
        self.deadline = Some(now + delay);
    }

    /// Drop the pending deadline, if any
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    #[cfg(test)]
    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Returns `true` exactly once when the deadline has passed
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

/// Coalesces a burst of values into the last one after a quiet period
#[derive(Debug, Clone)]
pub struct Debounce<T> {
    quiet: Duration,
    timer: Timer,
    latest: Option<T>,
}

impl<T> Debounce<T> {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            timer: Timer::new(),
            latest: None,
        }
    }

    /// Record a new value and restart the quiet period
    pub fn push(&mut self, value: T, now: Instant) {
        self.latest = Some(value);
        self.timer.schedule(now, self.quiet);
    }

    #[cfg(test)]
    pub fn is_pending(&self) -> bool {
        self.timer.is_pending()
    }

    /// Yield the last pushed value once the quiet period has elapsed
    pub fn fire(&mut self, now: Instant) -> Option<T> {
        if self.timer.fire(now) {
            self.latest.take()
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: Duration = Duration::from_millis(1);

    #[test]
    fn test_timer_fires_once_after_deadline() {
        let t0 = Instant::now();
        let mut timer = Timer::new();
        assert!(!timer.fire(t0));

        timer.schedule(t0, 100 * MS);
        assert!(timer.is_pending());
        assert!(!timer.fire(t0 + 99 * MS));
        assert!(timer.fire(t0 + 100 * MS));
        assert!(!timer.fire(t0 + 500 * MS));
        assert!(!timer.is_pending());
    }

    #[test]
    fn test_timer_reschedule_replaces_deadline() {
        let t0 = Instant::now();
        let mut timer = Timer::new();
        timer.schedule(t0, 100 * MS);
        timer.schedule(t0 + 80 * MS, 100 * MS);

        assert!(!timer.fire(t0 + 150 * MS));
        assert!(timer.fire(t0 + 180 * MS));
    }

    #[test]
    fn test_timer_cancel() {
        let t0 = Instant::now();
        let mut timer = Timer::new();
        timer.schedule(t0, 10 * MS);
        timer.cancel();
        assert!(!timer.fire(t0 + 1000 * MS));
    }

    #[test]
    fn test_debounce_only_last_value_fires() {
        let t0 = Instant::now();
        let mut debounce = Debounce::new(250 * MS);

        debounce.push(80, t0);
        debounce.push(100, t0 + 100 * MS);
        debounce.push(140, t0 + 200 * MS);

        // Quiet period restarts on every push
        assert_eq!(debounce.fire(t0 + 300 * MS), None);
        assert_eq!(debounce.fire(t0 + 450 * MS), Some(140));
        assert_eq!(debounce.fire(t0 + 900 * MS), None);
        assert!(!debounce.is_pending());
    }
}
