#![forbid(unsafe_code)]

//! Scheduling abstraction.
//!
//! The engine never sleeps. It hands a [`TimerToken`] to a [`Scheduler`]
//! with a delay and keeps the returned [`TimerHandle`]; when the delay has
//! passed the host gives the handle and token back through
//! `Engine::dispatch`. Cancelling a handle must guarantee that dispatch is
//! never called for it, or, for hosts that cannot take a timer back, the
//! engine drops the late delivery itself.
//!
//! [`TimerQueue`] is the built-in scheduler: a deterministic queue driven by
//! explicit time advances, usable both as a fake clock in tests and as the
//! real scheduler when the host pumps it from a monotonic clock.
//!
//! # Invariants
//!
//! 1. Handles are unique for the lifetime of a queue.
//! 2. Timers fire in deadline order; equal deadlines fire in schedule order.
//! 3. A timer scheduled while another fires is relative to that firing time.
//! 4. A cancelled timer never comes out of [`TimerQueue::pop_due`].

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use pixelgrid_core::InstanceId;

/// Identifies one scheduled callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerHandle(u64);

impl TimerHandle {
    /// Wrap a host-assigned handle.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// What a timer does when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerAction {
    /// Light cell `i`.
    CellOn(usize),
    /// Darken cell `i`.
    CellOff(usize),
    /// The fade-in phase has held long enough.
    FadeInComplete,
    /// The fade-out phase and the inter-cycle gap are over.
    FadeOutComplete,
}

/// Payload carried by a scheduled callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerToken {
    /// Instance the callback belongs to.
    pub instance: InstanceId,
    /// Run generation of that instance when the callback was scheduled.
    pub generation: u64,
    /// Effect of the callback.
    pub action: TimerAction,
}

/// Host timer facility.
pub trait Scheduler {
    /// Arrange for `token` to be delivered after `delay`.
    fn schedule(&mut self, delay: Duration, token: TimerToken) -> TimerHandle;

    /// Withdraw a scheduled callback. Unknown or already-fired handles are ignored.
    fn cancel(&mut self, handle: TimerHandle);
}

// ---------------------------------------------------------------------------
// TimerQueue
// ---------------------------------------------------------------------------

/// A timer that came due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fired {
    /// Handle returned when the timer was scheduled.
    pub handle: TimerHandle,
    /// Queue time at which it was due.
    pub deadline: Duration,
    /// What the owning instance asked to be told.
    pub token: TimerToken,
}

/// Deterministic scheduler driven by explicit time advances.
#[derive(Debug, Default)]
pub struct TimerQueue {
    now: Duration,
    next_handle: u64,
    queue: BTreeMap<(Duration, TimerHandle), TimerToken>,
    deadlines: HashMap<TimerHandle, Duration>,
}

impl TimerQueue {
    /// An empty queue at time zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current queue time.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Number of scheduled timers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Whether nothing is scheduled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Whether `handle` is still scheduled.
    #[must_use]
    pub fn is_scheduled(&self, handle: TimerHandle) -> bool {
        self.deadlines.contains_key(&handle)
    }

    /// Earliest pending deadline.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.queue.keys().next().map(|&(deadline, _)| deadline)
    }

    /// Remove and return the earliest timer due at or before `until`,
    /// moving the queue's clock to its deadline.
    pub fn pop_due(&mut self, until: Duration) -> Option<Fired> {
        let (&(deadline, handle), _) = self.queue.first_key_value()?;
        if deadline > until {
            return None;
        }
        let token = self.queue.remove(&(deadline, handle))?;
        self.deadlines.remove(&handle);
        self.now = self.now.max(deadline);
        Some(Fired {
            handle,
            deadline,
            token,
        })
    }

    /// Move the clock forward to `to` without firing anything.
    ///
    /// Callers are expected to have drained [`pop_due`](Self::pop_due) first.
    pub fn settle(&mut self, to: Duration) {
        self.now = self.now.max(to);
    }
}

impl Scheduler for TimerQueue {
    fn schedule(&mut self, delay: Duration, token: TimerToken) -> TimerHandle {
        self.next_handle += 1;
        let handle = TimerHandle(self.next_handle);
        let deadline = self.now.saturating_add(delay);
        self.queue.insert((deadline, handle), token);
        self.deadlines.insert(handle, deadline);
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        if let Some(deadline) = self.deadlines.remove(&handle) {
            self.queue.remove(&(deadline, handle));
        }
    }
}
