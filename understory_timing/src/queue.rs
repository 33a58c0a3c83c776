// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Timer queue.

use smallvec::SmallVec;

use crate::Millis;

/// Identifies a scheduled timer for cancellation.
///
/// Tokens are never reused within one [`TimerQueue`], so a stale token can be
/// cancelled safely: it simply matches nothing.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerToken(u64);

impl TimerToken {
    /// Returns the raw token value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// A timer that came due.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fired<T> {
    /// The token of the timer; still valid for repeating timers.
    pub token: TimerToken,
    /// The deadline the timer was scheduled for.
    pub deadline: Millis,
    /// The payload supplied when scheduling.
    pub payload: T,
}

#[derive(Clone, Debug)]
struct Entry<T> {
    token: TimerToken,
    deadline: Millis,
    period: Option<Millis>,
    payload: T,
}

/// An ordered set of one-shot and repeating timers.
///
/// The queue never reads a clock: callers pass the current time to the
/// scheduling methods and to [`TimerQueue::pop_due`]. Timers with equal
/// deadlines fire in the order they were scheduled.
#[derive(Clone, Debug)]
pub struct TimerQueue<T> {
    entries: SmallVec<[Entry<T>; 8]>,
    next_token: u64,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TimerQueue<T> {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: SmallVec::new(),
            next_token: 0,
        }
    }

    /// Schedules a one-shot timer at an absolute deadline.
    pub fn schedule_at(&mut self, deadline: Millis, payload: T) -> TimerToken {
        self.push(deadline, None, payload)
    }

    /// Schedules a one-shot timer `delay` milliseconds after `now`.
    pub fn schedule_after(&mut self, now: Millis, delay: Millis, payload: T) -> TimerToken {
        self.push(now.saturating_add(delay), None, payload)
    }

    /// Schedules a repeating timer.
    ///
    /// The first firing happens `delay` milliseconds after `now`, then every
    /// `period` milliseconds. A zero period is treated as one millisecond.
    pub fn schedule_repeating(
        &mut self,
        now: Millis,
        delay: Millis,
        period: Millis,
        payload: T,
    ) -> TimerToken {
        self.push(now.saturating_add(delay), Some(period.max(1)), payload)
    }

    fn push(&mut self, deadline: Millis, period: Option<Millis>, payload: T) -> TimerToken {
        let token = TimerToken(self.next_token);
        self.next_token += 1;
        self.entries.push(Entry {
            token,
            deadline,
            period,
            payload,
        });
        token
    }

    /// Cancels a timer. Returns `true` if it was pending.
    pub fn cancel(&mut self, token: TimerToken) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.token != token);
        before != self.entries.len()
    }

    /// Cancels every timer whose payload does not satisfy `keep`.
    pub fn retain(&mut self, mut keep: impl FnMut(&T) -> bool) {
        self.entries.retain(|e| keep(&e.payload));
    }

    /// Removes all timers.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Returns `true` if the timer is still scheduled.
    #[must_use]
    pub fn is_pending(&self, token: TimerToken) -> bool {
        self.entries.iter().any(|e| e.token == token)
    }

    /// Returns the number of pending timers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no timers are pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the earliest pending deadline.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Millis> {
        self.entries.iter().map(|e| e.deadline).min()
    }

    fn earliest_due(&self, now: Millis) -> Option<usize> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.deadline <= now)
            .min_by_key(|(_, e)| (e.deadline, e.token))
            .map(|(i, _)| i)
    }
}

impl<T: Clone> TimerQueue<T> {
    /// Removes and returns the earliest timer due at `now`.
    ///
    /// Repeating timers are rescheduled one period after the deadline they
    /// fired for, so a late caller sees every missed tick in order.
    pub fn pop_due(&mut self, now: Millis) -> Option<Fired<T>> {
        let index = self.earliest_due(now)?;
        let entry = &mut self.entries[index];
        match entry.period {
            Some(period) => {
                let fired = Fired {
                    token: entry.token,
                    deadline: entry.deadline,
                    payload: entry.payload.clone(),
                };
                entry.deadline = entry.deadline.saturating_add(period);
                Some(fired)
            }
            None => {
                let entry = self.entries.remove(index);
                Some(Fired {
                    token: entry.token,
                    deadline: entry.deadline,
                    payload: entry.payload,
                })
            }
        }
    }
}
