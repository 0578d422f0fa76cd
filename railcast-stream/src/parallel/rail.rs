// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use super::Dispatcher;
use async_channel::Receiver;
use core::future::Future;
use core::pin::Pin;
use core::task::{Context, Poll};
use futures::future::ready;
use futures::stream::{self, BoxStream};
use futures::{Stream, StreamExt};
use pin_project::pin_project;
use railcast_core::{RailcastError, RailcastTask, StreamItem};
use std::error::Error;
use std::sync::Arc;

/// One partition of a parallel fan-out.
///
/// Operators applied to a rail run inside the task that drives it, on the rail's
/// dispatcher. Any error ends the rail.
pub struct Rail<T> {
    index: usize,
    dispatcher: Arc<dyn Dispatcher>,
    prefetch: usize,
    stream: BoxStream<'static, StreamItem<T>>,
}

impl<T: Send + 'static> Rail<T> {
    pub(crate) fn new<S>(
        index: usize,
        dispatcher: Arc<dyn Dispatcher>,
        prefetch: usize,
        stream: S,
    ) -> Self
    where
        S: Stream<Item = StreamItem<T>> + Send + 'static,
    {
        Self {
            index,
            dispatcher,
            prefetch,
            stream: stream.boxed(),
        }
    }

    /// Position of this rail in its [`RailSet`](super::RailSet).
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    fn with_stream<U, S>(
        self,
        stream: impl FnOnce(BoxStream<'static, StreamItem<T>>) -> S,
    ) -> Rail<U>
    where
        U: Send + 'static,
        S: Stream<Item = StreamItem<U>> + Send + 'static,
    {
        Rail::new(
            self.index,
            self.dispatcher,
            self.prefetch,
            TerminateOnError::new(stream(self.stream)),
        )
    }

    /// Maps each value through an async, fallible function.
    ///
    /// An `Err` ends the rail with [`RailcastError::TransformFailure`] tagged with this
    /// rail's index.
    #[must_use]
    pub fn map<U, F, Fut, E>(self, f: F) -> Rail<U>
    where
        U: Send + 'static,
        F: Fn(T) -> Fut + Send + 'static,
        Fut: Future<Output = Result<U, E>> + Send + 'static,
        E: Error + Send + Sync + 'static,
    {
        let rail = self.index;
        self.with_stream(move |input| {
            input.then(move |item| {
                let mapped = match item {
                    StreamItem::Value(value) => Ok(f(value)),
                    StreamItem::Error(error) => Err(error),
                };
                async move {
                    match mapped {
                        Ok(future) => match future.await {
                            Ok(value) => StreamItem::Value(value),
                            Err(e) => {
                                StreamItem::Error(RailcastError::transform_failure(Some(rail), e))
                            }
                        },
                        Err(error) => StreamItem::Error(error),
                    }
                }
            })
        })
    }

    /// Keeps the values for which `predicate` returns `true`, in order.
    #[must_use]
    pub fn filter<F>(self, predicate: F) -> Self
    where
        F: Fn(&T) -> bool + Send + 'static,
    {
        self.with_stream(move |input| {
            input.filter(move |item| {
                ready(match item {
                    StreamItem::Value(value) => predicate(value),
                    StreamItem::Error(_) => true,
                })
            })
        })
    }

    /// Replaces each value with the items of the stream `f` returns for it (zero or more).
    #[must_use]
    pub fn transform<U, F, S>(self, f: F) -> Rail<U>
    where
        U: Send + 'static,
        F: Fn(T) -> S + Send + 'static,
        S: Stream<Item = StreamItem<U>> + Send + 'static,
    {
        self.with_stream(move |input| {
            input.flat_map(move |item| match item {
                StreamItem::Value(value) => f(value).left_stream(),
                StreamItem::Error(error) => {
                    stream::once(ready(StreamItem::Error(error))).right_stream()
                }
            })
        })
    }

    /// Consumes the rail from a task dispatched on its dispatcher.
    ///
    /// The task starts on the first poll of the returned stream and is cancelled when the
    /// stream is dropped.
    #[must_use]
    pub fn into_stream(self) -> DispatchedRail<T> {
        DispatchedRail {
            index: self.index,
            pending: Some(self),
            output: None,
        }
    }
}

impl<T> core::fmt::Debug for Rail<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Rail")
            .field("index", &self.index)
            .field("prefetch", &self.prefetch)
            .finish_non_exhaustive()
    }
}

/// Ends the inner stream after its first error.
#[pin_project]
struct TerminateOnError<S> {
    #[pin]
    inner: S,
    done: bool,
}

impl<S> TerminateOnError<S> {
    const fn new(inner: S) -> Self {
        Self { inner, done: false }
    }
}

impl<S, T> Stream for TerminateOnError<S>
where
    S: Stream<Item = StreamItem<T>>,
{
    type Item = StreamItem<T>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.project();

        if *this.done {
            return Poll::Ready(None);
        }

        match this.inner.poll_next(cx) {
            Poll::Ready(Some(StreamItem::Error(error))) => {
                *this.done = true;
                Poll::Ready(Some(StreamItem::Error(error)))
            }
            Poll::Ready(None) => {
                *this.done = true;
                Poll::Ready(None)
            }
            other => other,
        }
    }
}

struct Forwarding<T> {
    rx: Pin<Box<Receiver<StreamItem<T>>>>,
    _task: RailcastTask,
}

/// A rail driven on its dispatcher; see [`Rail::into_stream`].
pub struct DispatchedRail<T> {
    index: usize,
    pending: Option<Rail<T>>,
    output: Option<Forwarding<T>>,
}

impl<T> DispatchedRail<T> {
    /// Position of the underlying rail.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }
}

impl<T: Send + 'static> Stream for DispatchedRail<T> {
    type Item = StreamItem<T>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = &mut *self;

        if let Some(rail) = this.pending.take() {
            this.output = Some(dispatch(rail));
        }

        let Some(output) = this.output.as_mut() else {
            return Poll::Ready(None);
        };

        match output.rx.as_mut().poll_next(cx) {
            Poll::Ready(Some(StreamItem::Error(error))) => {
                this.output = None;
                Poll::Ready(Some(StreamItem::Error(error)))
            }
            Poll::Ready(None) => {
                this.output = None;
                Poll::Ready(None)
            }
            other => other,
        }
    }
}

impl<T> core::fmt::Debug for DispatchedRail<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DispatchedRail")
            .field("index", &self.index)
            .field("started", &self.pending.is_none())
            .finish_non_exhaustive()
    }
}

fn dispatch<T: Send + 'static>(rail: Rail<T>) -> Forwarding<T> {
    let (tx, rx) = async_channel::bounded(rail.prefetch);
    let Rail {
        index,
        dispatcher,
        stream: mut input,
        ..
    } = rail;

    let task = RailcastTask::spawn_with(
        move |_| async move {
            trace!("rail {index} started");
            while let Some(item) = input.next().await {
                let failed = item.is_error();
                if let StreamItem::Error(error) = &item {
                    warn!("rail {index} failed: {error}");
                }
                if tx.send(item).await.is_err() {
                    debug!("rail {index} consumer detached");
                    return;
                }
                if failed {
                    return;
                }
            }
            trace!("rail {index} completed");
        },
        move |future| dispatcher.dispatch(Box::pin(future)),
    );

    Forwarding {
        rx: Box::pin(rx),
        _task: task,
    }
}
