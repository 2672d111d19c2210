#![forbid(unsafe_code)]

//! Virtual-time timer queue.
//!
//! A [`TimerQueue`] owns a logical clock that only moves when the host calls
//! [`TimerQueue::advance`] or [`TimerQueue::advance_to`]. Tests drive it
//! step by step; a real host pumps it from a [`MonotonicClock`].
//!
//! # Invariants
//!
//! 1. Timers fire in deadline order; equal deadlines fire in scheduling order.
//! 2. While a callback runs, [`TimerQueue::now`] equals that timer's deadline.
//! 3. A timer fires at most once, and never after it has been cancelled.
//! 4. Dropping a [`TimerHandle`] cancels its timer if it has not fired yet.
//! 5. Callbacks may schedule and cancel timers; a timer scheduled by a
//!    callback fires in the same `advance` call if its deadline is in range.
//!
//! # Failure Modes
//!
//! - Cancelling an already fired or cancelled timer is a no-op returning `false`.
//! - `advance_to` with a target in the past does not move the clock backwards.
//! - Dropping the queue while handles are alive is fine; the handles become inert.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::{Rc, Weak};
use std::time::Duration;

use ahash::AHashMap;
use web_time::Instant;

/// Identifier of a scheduled timer, unique within its queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

impl TimerId {
    #[inline]
    pub const fn id(self) -> u64 {
        self.0
    }
}

struct Entry {
    label: &'static str,
    callback: Box<dyn FnOnce()>,
}

#[derive(Default)]
struct QueueInner {
    now: Duration,
    next_id: u64,
    /// Keyed by `(deadline, id)`, which is exactly the firing order.
    due: BTreeMap<(Duration, TimerId), Entry>,
    deadlines: AHashMap<TimerId, Duration>,
}

impl QueueInner {
    fn take(&mut self, id: TimerId) -> Option<Entry> {
        let deadline = self.deadlines.remove(&id)?;
        self.due.remove(&(deadline, id))
    }
}

/// Shared handle to a virtual-time timer queue. Clones share the same queue.
#[derive(Clone, Default)]
pub struct TimerQueue {
    inner: Rc<RefCell<QueueInner>>,
}

impl fmt::Debug for TimerQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("TimerQueue")
            .field("now", &inner.now)
            .field("pending", &inner.due.len())
            .finish()
    }
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current logical time, measured from queue creation.
    pub fn now(&self) -> Duration {
        self.inner.borrow().now
    }

    /// Number of timers waiting to fire.
    pub fn pending(&self) -> usize {
        self.inner.borrow().due.len()
    }

    pub fn is_idle(&self) -> bool {
        self.pending() == 0
    }

    /// Deadline of the next timer to fire, if any.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.inner
            .borrow()
            .due
            .first_key_value()
            .map(|(&(deadline, _), _)| deadline)
    }

    /// Run `callback` once `delay` has elapsed on this queue's clock.
    ///
    /// The timer is cancelled if the returned handle is dropped first.
    #[must_use = "dropping the handle cancels the timer"]
    pub fn schedule(
        &self,
        delay: Duration,
        label: &'static str,
        callback: impl FnOnce() + 'static,
    ) -> TimerHandle {
        let mut inner = self.inner.borrow_mut();
        let id = TimerId(inner.next_id);
        inner.next_id += 1;
        let deadline = inner.now.saturating_add(delay);
        inner.due.insert(
            (deadline, id),
            Entry {
                label,
                callback: Box::new(callback),
            },
        );
        inner.deadlines.insert(id, deadline);

        tracing::trace!(
            timer = id.0,
            label,
            delay_ms = delay.as_millis() as u64,
            "timer scheduled"
        );

        TimerHandle {
            id,
            queue: Rc::downgrade(&self.inner),
        }
    }

    /// Cancel a timer by id. Returns `true` if it was still pending.
    pub fn cancel(&self, id: TimerId) -> bool {
        cancel_in(&self.inner, id)
    }

    /// Move the clock forward by `by`, firing every timer that comes due.
    ///
    /// Returns the number of callbacks run.
    pub fn advance(&self, by: Duration) -> usize {
        let target = self.now().saturating_add(by);
        self.advance_to(target)
    }

    /// Move the clock to `target`, firing every timer with a deadline at or
    /// before it.
    pub fn advance_to(&self, target: Duration) -> usize {
        let mut fired = 0;
        loop {
            let (id, entry) = {
                let mut inner = self.inner.borrow_mut();
                match inner.due.first_key_value() {
                    Some((&(deadline, _), _)) if deadline <= target => {}
                    _ => break,
                }
                let Some(((deadline, id), entry)) = inner.due.pop_first() else {
                    break;
                };
                inner.deadlines.remove(&id);
                inner.now = deadline;
                (id, entry)
            };

            tracing::trace!(timer = id.0, label = entry.label, "timer fired");
            (entry.callback)();
            fired += 1;
        }

        let mut inner = self.inner.borrow_mut();
        if target > inner.now {
            inner.now = target;
        }
        fired
    }

    /// Catch the queue up with a wall clock.
    pub fn pump(&self, clock: &MonotonicClock) -> usize {
        self.advance_to(clock.elapsed())
    }
}

fn cancel_in(inner: &RefCell<QueueInner>, id: TimerId) -> bool {
    // Drop the callback outside the borrow; its captures may touch the queue.
    let entry = inner.borrow_mut().take(id);
    match entry {
        Some(entry) => {
            tracing::trace!(timer = id.0, label = entry.label, "timer cancelled");
            drop(entry);
            true
        }
        None => false,
    }
}

/// Owner of a scheduled timer. Dropping it cancels the timer.
#[derive(Debug)]
pub struct TimerHandle {
    id: TimerId,
    queue: Weak<RefCell<QueueInner>>,
}

impl TimerHandle {
    #[inline]
    pub fn id(&self) -> TimerId {
        self.id
    }

    /// Whether the timer has neither fired nor been cancelled.
    pub fn is_pending(&self) -> bool {
        self.queue
            .upgrade()
            .is_some_and(|inner| inner.borrow().deadlines.contains_key(&self.id))
    }

    /// Deadline on the queue's clock, while pending.
    pub fn deadline(&self) -> Option<Duration> {
        let inner = self.queue.upgrade()?;
        inner.borrow().deadlines.get(&self.id).copied()
    }

    /// Cancel explicitly. Returns `true` if the timer was still pending.
    pub fn cancel(self) -> bool {
        // Drop runs afterwards and finds nothing left to cancel.
        self.cancel_inner()
    }

    fn cancel_inner(&self) -> bool {
        match self.queue.upgrade() {
            Some(inner) => cancel_in(&inner, self.id),
            None => false,
        }
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        self.cancel_inner();
    }
}

/// Elapsed wall-clock time since construction.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    start: Instant,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}
