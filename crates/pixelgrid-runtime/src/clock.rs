#![forbid(unsafe_code)]

//! Monotonic time sources for pumping the engine.
//!
//! The engine itself only understands "advance to time `t`". A host picks a
//! [`Clock`] and calls `Engine::pump` once per frame or event-loop turn.

use std::time::Duration;

use web_time::Instant;

/// Monotonic time since an arbitrary origin.
pub trait Clock {
    /// Current monotonic time.
    fn now_mono(&self) -> Duration;
}

/// Wall-clock backed source. Works on native targets and in the browser.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    /// Start counting from now.
    #[must_use]
    pub fn start() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::start()
    }
}

impl Clock for MonotonicClock {
    fn now_mono(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Clock controlled by the caller.
#[derive(Debug, Default, Clone)]
pub struct ManualClock {
    now: Duration,
}

impl ManualClock {
    /// A clock at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            now: Duration::ZERO,
        }
    }

    /// Set the current time.
    pub fn set(&mut self, now: Duration) {
        self.now = now;
    }

    /// Advance by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        self.now = self.now.saturating_add(dt);
    }
}

impl Clock for ManualClock {
    fn now_mono(&self) -> Duration {
        self.now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_advances() {
        let mut clock = ManualClock::new();
        clock.advance(Duration::from_millis(30));
        clock.advance(Duration::from_millis(12));
        assert_eq!(clock.now_mono(), Duration::from_millis(42));
        clock.set(Duration::from_secs(1));
        assert_eq!(clock.now_mono(), Duration::from_secs(1));
    }

    #[test]
    fn monotonic_clock_does_not_go_backwards() {
        let clock = MonotonicClock::start();
        let a = clock.now_mono();
        let b = clock.now_mono();
        assert!(b >= a);
    }
}
