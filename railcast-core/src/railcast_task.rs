// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Owned background tasks with cooperative cancellation.

use crate::CancellationToken;
use core::future::Future;
use futures::future::{select, Either};
use futures::pin_mut;

/// Handle to a spawned background future that is cancelled when the handle is dropped.
///
/// The spawned future receives a [`CancellationToken`] for cooperative checks. It is
/// additionally raced against that token, so dropping the handle stops the future at its
/// next suspension point even if it never looks at the token.
///
/// # Example
///
/// ```rust
/// use railcast_core::RailcastTask;
///
/// # #[tokio::main]
/// # async fn main() {
/// let task = RailcastTask::spawn(|cancel| async move {
///     while !cancel.is_cancelled() {
///         tokio::task::yield_now().await;
///     }
/// });
///
/// // Dropping the handle cancels the work
/// drop(task);
/// # }
/// ```
#[derive(Debug)]
pub struct RailcastTask {
    cancel: CancellationToken,
}

impl RailcastTask {
    /// Spawn on the ambient tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics when called outside of a tokio runtime, like `tokio::spawn`.
    #[cfg(feature = "runtime-tokio")]
    pub fn spawn<F, Fut>(f: F) -> Self
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        Self::spawn_with(f, |future| {
            tokio::spawn(future);
        })
    }

    /// Spawn through a caller-supplied spawner.
    ///
    /// `spawner` receives the cancellable future and must arrange for it to be polled
    /// to completion, e.g. on a specific runtime handle or thread pool.
    pub fn spawn_with<F, Fut, Sp>(f: F, spawner: Sp) -> Self
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
        Sp: FnOnce(Box<dyn Future<Output = ()> + Send + Unpin + 'static>),
    {
        let cancel = CancellationToken::new();
        let work = f(cancel.clone());
        let token = cancel.clone();

        let future = Box::pin(async move {
            let cancelled = token.cancelled();
            pin_mut!(work);
            pin_mut!(cancelled);
            if let Either::Right(_) = select(work, cancelled).await {
                debug!("railcast task cancelled before completion");
            }
        });

        spawner(Box::new(future));

        Self { cancel }
    }

    /// Signal the task to stop without waiting for it.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Returns `true` once cancellation was requested via `cancel()` or drop.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

impl Drop for RailcastTask {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
