// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! History retention rules for replaying subjects.
//!
//! A [`ReplayPolicy`] bounds what a *late* consumer sees when it attaches to a replaying
//! [`Subject`](crate::Subject). It never bounds the live backlog of a consumer that is
//! already attached.
//!
//! | Policy | A consumer attaching at `now` receives |
//! |--------|-----------------------------------------|
//! | [`unbounded`](ReplayPolicy::unbounded) | every item offered so far |
//! | [`max_size(n)`](ReplayPolicy::max_size) | the last `n` items offered |
//! | [`max_age(t)`](ReplayPolicy::max_age) | items offered in `(now - t, now]` |
//! | [`max_size_and_age(n, t)`](ReplayPolicy::max_size_and_age) | items satisfying both bounds |
//!
//! When both bounds are configured each one removes a prefix of the history, so the result
//! is the shorter of the two suffixes regardless of which rule is applied first.

use crate::clock::{Clock, SystemClock};
use core::time::Duration;
use std::sync::Arc;

/// How much history a replaying subject retains for late consumers.
#[derive(Clone, Debug)]
pub struct ReplayPolicy {
    max_size: Option<usize>,
    max_age: Option<Duration>,
    clock: Arc<dyn Clock>,
}

impl ReplayPolicy {
    /// Retain every item.
    #[must_use]
    pub fn unbounded() -> Self {
        Self {
            max_size: None,
            max_age: None,
            clock: Arc::new(SystemClock::new()),
        }
    }

    /// Retain the last `max_size` items. Zero retains nothing.
    #[must_use]
    pub fn max_size(max_size: usize) -> Self {
        Self::unbounded().with_max_size(max_size)
    }

    /// Retain items younger than `max_age`, measured with the system clock.
    #[must_use]
    pub fn max_age(max_age: Duration) -> Self {
        Self::unbounded().with_max_age(max_age)
    }

    /// Retain items younger than `max_age`, measured with `clock`.
    #[must_use]
    pub fn max_age_with_clock(max_age: Duration, clock: impl Clock) -> Self {
        Self::max_age(max_age).with_clock(clock)
    }

    /// Retain at most `max_size` items, none older than `max_age`.
    #[must_use]
    pub fn max_size_and_age(max_size: usize, max_age: Duration) -> Self {
        Self::unbounded()
            .with_max_size(max_size)
            .with_max_age(max_age)
    }

    /// Sets the count bound.
    #[must_use]
    pub fn with_max_size(mut self, max_size: usize) -> Self {
        self.max_size = Some(max_size);
        self
    }

    /// Sets the age bound.
    #[must_use]
    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = Some(max_age);
        self
    }

    /// Replaces the time source used for the age bound.
    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// The count bound, if any.
    #[must_use]
    pub const fn max_size_limit(&self) -> Option<usize> {
        self.max_size
    }

    /// The age bound, if any.
    #[must_use]
    pub const fn max_age_limit(&self) -> Option<Duration> {
        self.max_age
    }

    pub(crate) fn now(&self) -> Duration {
        self.clock.now()
    }

    /// Whether an item offered at `offered_at` is still replayable at `now`.
    pub(crate) fn is_fresh(&self, offered_at: Duration, now: Duration) -> bool {
        self.max_age
            .is_none_or(|max_age| now.saturating_sub(offered_at) < max_age)
    }
}

impl Default for ReplayPolicy {
    fn default() -> Self {
        Self::unbounded()
    }
}
