// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use futures::future::BoxFuture;
use std::sync::Arc;

/// An execution context a rail can be driven on.
///
/// `dispatch` must arrange for the future to be polled to completion. Different rails may
/// share one dispatcher or each get their own.
pub trait Dispatcher: Send + Sync + 'static {
    fn dispatch(&self, task: BoxFuture<'static, ()>);
}

impl<D: Dispatcher + ?Sized> Dispatcher for Arc<D> {
    fn dispatch(&self, task: BoxFuture<'static, ()>) {
        (**self).dispatch(task);
    }
}

impl<D: Dispatcher + ?Sized> Dispatcher for Box<D> {
    fn dispatch(&self, task: BoxFuture<'static, ()>) {
        (**self).dispatch(task);
    }
}

/// Adapts a closure into a [`Dispatcher`].
///
/// ```
/// use railcast_stream::FnDispatcher;
///
/// let dispatcher = FnDispatcher::new(|task| {
///     tokio::spawn(task);
/// });
/// # drop(dispatcher);
/// ```
#[derive(Clone)]
pub struct FnDispatcher<F> {
    spawn: F,
}

impl<F> FnDispatcher<F>
where
    F: Fn(BoxFuture<'static, ()>) + Send + Sync + 'static,
{
    pub const fn new(spawn: F) -> Self {
        Self { spawn }
    }
}

impl<F> Dispatcher for FnDispatcher<F>
where
    F: Fn(BoxFuture<'static, ()>) + Send + Sync + 'static,
{
    fn dispatch(&self, task: BoxFuture<'static, ()>) {
        (self.spawn)(task);
    }
}

impl<F> core::fmt::Debug for FnDispatcher<F> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FnDispatcher").finish_non_exhaustive()
    }
}

#[cfg(feature = "runtime-tokio")]
pub use tokio_dispatcher::TokioDispatcher;

#[cfg(feature = "runtime-tokio")]
mod tokio_dispatcher {
    use super::Dispatcher;
    use futures::future::BoxFuture;
    use railcast_core::{RailcastError, Result};
    use tokio::runtime::Handle;

    /// Spawns rail tasks on a tokio runtime.
    #[derive(Debug, Clone)]
    pub struct TokioDispatcher {
        handle: Handle,
    }

    impl TokioDispatcher {
        /// Spawns on the runtime behind `handle`.
        #[must_use]
        pub const fn new(handle: Handle) -> Self {
            Self { handle }
        }

        /// Spawns on the runtime the caller is running in.
        ///
        /// # Panics
        ///
        /// Panics when called outside of a tokio runtime, like [`Handle::current`].
        #[must_use]
        pub fn current() -> Self {
            Self::new(Handle::current())
        }

        /// Like [`current`](Self::current) but reports a missing runtime as an error.
        ///
        /// # Errors
        ///
        /// Returns [`RailcastError::StreamProcessingError`] outside of a tokio runtime.
        pub fn try_current() -> Result<Self> {
            Handle::try_current()
                .map(Self::new)
                .map_err(|e| RailcastError::stream_error(format!("no tokio runtime: {e}")))
        }
    }

    impl Dispatcher for TokioDispatcher {
        fn dispatch(&self, task: BoxFuture<'static, ()>) {
            self.handle.spawn(task);
        }
    }
}
