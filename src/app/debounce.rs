//! Trailing-edge debounce for URL writes.
//!
//! Range sliders emit a burst of updates while dragged. The store applies each
//! of them immediately, but the URL write is deferred until the burst has been
//! quiet for the configured delay. Time is passed in by the caller, which
//! keeps the debouncer deterministic under test.

use std::time::{Duration, Instant};

/// Result of polling a [`Debouncer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebounceState {
    /// Nothing scheduled.
    Idle,
    /// A write is scheduled; poll again after the remaining time.
    Waiting(Duration),
    /// The quiet period has elapsed; perform the write now.
    Due,
}

/// Deadline tracker for a single deferred action.
#[derive(Debug, Clone, Default)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    /// Creates a debouncer; a zero `delay` disables it.
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// Configured quiet period.
    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Returns false when writes should happen immediately.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        !self.delay.is_zero()
    }

    /// Returns true while a write is scheduled.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Pushes the deadline to `now + delay` and returns how long to wait.
    pub fn schedule(&mut self, now: Instant) -> Duration {
        self.deadline = Some(now + self.delay);
        self.delay
    }

    /// Checks the deadline against `now`, clearing it once due.
    pub fn poll(&mut self, now: Instant) -> DebounceState {
        match self.deadline {
            None => DebounceState::Idle,
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                DebounceState::Due
            }
            Some(deadline) => DebounceState::Waiting(deadline - now),
        }
    }

    /// Drops a scheduled write. Returns true if one was pending.
    pub fn cancel(&mut self) -> bool {
        self.deadline.take().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn burst_is_coalesced_into_one_due_poll() {
        let start = Instant::now();
        let mut debounce = Debouncer::new(Duration::from_millis(150));

        debounce.schedule(start);
        debounce.schedule(start + Duration::from_millis(100));
        assert_eq!(
            debounce.poll(start + Duration::from_millis(150)),
            DebounceState::Waiting(Duration::from_millis(100))
        );
        assert_eq!(debounce.poll(start + Duration::from_millis(250)), DebounceState::Due);
        assert_eq!(debounce.poll(start + Duration::from_millis(400)), DebounceState::Idle);
    }

    #[test]
    fn cancel_clears_deadline() {
        let mut debounce = Debouncer::new(Duration::from_millis(10));
        assert!(!debounce.cancel());
        debounce.schedule(Instant::now());
        assert!(debounce.is_pending());
        assert!(debounce.cancel());
        assert!(!debounce.is_pending());
    }

    #[test]
    fn zero_delay_is_disabled() {
        assert!(!Debouncer::new(Duration::ZERO).is_enabled());
        assert!(Debouncer::new(Duration::from_millis(1)).is_enabled());
    }
}
