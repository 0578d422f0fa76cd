// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Time sources for age-bounded replay.
//!
//! A [`Clock`] returns a monotonic reading measured from an arbitrary, fixed origin.
//! Only differences between readings are meaningful.

use core::fmt::{self, Debug};
use core::time::Duration;
use std::time::Instant;

/// Monotonic time source.
pub trait Clock: Send + Sync + Debug + 'static {
    /// Current reading, measured from the clock's origin.
    fn now(&self) -> Duration;
}

/// Wall-clock backed [`Clock`] using `std::time::Instant`. The default time source.
#[derive(Clone, Copy, Debug)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    /// Creates a clock whose origin is the moment of construction.
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// [`Clock`] backed by `tokio::time::Instant`, so `tokio::time::pause()` and
/// `tokio::time::advance()` control it in tests.
#[cfg(feature = "runtime-tokio")]
#[derive(Clone, Copy, Debug)]
pub struct TokioClock {
    origin: tokio::time::Instant,
}

#[cfg(feature = "runtime-tokio")]
impl TokioClock {
    /// Creates a clock whose origin is the moment of construction.
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: tokio::time::Instant::now(),
        }
    }
}

#[cfg(feature = "runtime-tokio")]
impl Default for TokioClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "runtime-tokio")]
impl Clock for TokioClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Adapts a closure returning "now" into a [`Clock`].
///
/// ```
/// use railcast_core::{Clock, FnClock};
/// use std::time::Duration;
///
/// let clock = FnClock::new(|| Duration::from_secs(7));
/// assert_eq!(clock.now(), Duration::from_secs(7));
/// ```
pub struct FnClock<F> {
    now: F,
}

impl<F> FnClock<F>
where
    F: Fn() -> Duration + Send + Sync + 'static,
{
    /// Wraps `now`.
    pub fn new(now: F) -> Self {
        Self { now }
    }
}

impl<F> Debug for FnClock<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnClock").finish_non_exhaustive()
    }
}

impl<F> Clock for FnClock<F>
where
    F: Fn() -> Duration + Send + Sync + 'static,
{
    fn now(&self) -> Duration {
        (self.now)()
    }
}

impl<C: Clock + ?Sized> Clock for std::sync::Arc<C> {
    fn now(&self) -> Duration {
        (**self).now()
    }
}
